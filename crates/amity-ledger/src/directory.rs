//! Registered accounts.

use std::collections::HashMap;

use amity_shared::constants::MAX_NAME_LEN;
use amity_shared::types::Address;
use tracing::info;

use crate::context::Caller;
use crate::error::{LedgerError, Result};
use crate::models::{check_length, User};

/// Append-only registry of accounts, keyed by address and kept in
/// registration order.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: Vec<User>,
    /// address -> position in `users`
    index: HashMap<Address, usize>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the caller's account. An address can register exactly once.
    pub fn register(&mut self, caller: &Caller, name: &str) -> Result<()> {
        let address = caller.address();
        if self.index.contains_key(&address) {
            return Err(LedgerError::AlreadyRegistered);
        }
        check_length(name, MAX_NAME_LEN).map_err(LedgerError::InvalidName)?;

        self.index.insert(address, self.users.len());
        self.users.push(User {
            address,
            name: name.to_string(),
        });

        info!(user = %address.short(), name, total = self.users.len(), "user registered");
        Ok(())
    }

    pub fn get(&self, address: &Address) -> Option<&User> {
        self.index.get(address).map(|&i| &self.users[i])
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.index.contains_key(address)
    }

    /// The name `address` registered with.
    pub fn resolve_name(&self, address: &Address) -> Result<&str> {
        self.get(address)
            .map(|user| user.name.as_str())
            .ok_or(LedgerError::UNKNOWN_USER)
    }

    /// Every account in registration order.
    pub fn list_all(&self) -> &[User] {
        &self.users
    }

    /// The account registered `index`-th, counting from zero.
    pub fn user_at(&self, index: usize) -> Option<&User> {
        self.users.get(index)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
