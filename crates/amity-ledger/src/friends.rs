//! Mutual friendships between registered accounts.

use std::collections::HashMap;

use amity_shared::types::Address;
use tracing::info;

use crate::context::Caller;
use crate::directory::UserDirectory;
use crate::error::{LedgerError, Result};
use crate::models::FriendEdge;

/// Per-account friend lists. Every friendship is stored twice, once in each
/// endpoint's list, and both copies are written by the same call.
#[derive(Debug, Default)]
pub struct FriendGraph {
    edges: HashMap<Address, Vec<FriendEdge>>,
}

impl FriendGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Befriend `peer` on behalf of the caller.
    ///
    /// Checks run in order and the first failure wins: caller registered,
    /// peer registered, not the caller itself, not already friends.
    ///
    /// `_display_name` is accepted for interface compatibility only. The
    /// names stored on both edges are taken from the directory.
    pub fn add_friend(
        &mut self,
        directory: &UserDirectory,
        caller: &Caller,
        peer: &Address,
        _display_name: &str,
    ) -> Result<()> {
        let owner = directory
            .get(&caller.address())
            .ok_or(LedgerError::UNKNOWN_USER)?;
        let friend = directory.get(peer).ok_or(LedgerError::UnknownFriend)?;
        if owner.address == friend.address {
            return Err(LedgerError::SelfFriendship);
        }
        if self.are_friends(&owner.address, &friend.address) {
            return Err(LedgerError::AlreadyFriends);
        }

        self.edges
            .entry(owner.address)
            .or_default()
            .push(FriendEdge {
                address: friend.address,
                name: friend.name.clone(),
            });
        self.edges
            .entry(friend.address)
            .or_default()
            .push(FriendEdge {
                address: owner.address,
                name: owner.name.clone(),
            });

        info!(
            owner = %owner.address.short(),
            friend = %friend.address.short(),
            "friendship created"
        );
        Ok(())
    }

    /// The caller's friend list, oldest first. Empty if the caller has no
    /// friends or no account.
    pub fn list_friends(&self, caller: &Caller) -> &[FriendEdge] {
        self.friends_of(&caller.address())
    }

    pub fn friends_of(&self, address: &Address) -> &[FriendEdge] {
        self.edges.get(address).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `b` appears in `a`'s friend list.
    pub fn are_friends(&self, a: &Address, b: &Address) -> bool {
        self.friends_of(a).iter().any(|edge| edge.address == *b)
    }
}
