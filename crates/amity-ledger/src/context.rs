//! The authenticated caller of a ledger operation.

use amity_shared::types::Address;

/// Capability naming the account on whose behalf an operation runs.
///
/// The ledger never authenticates anyone itself; it trusts whatever
/// address the host wraps in a `Caller`. The type deliberately has no
/// serde implementation so it cannot be lifted out of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caller(Address);

impl Caller {
    /// Bind an address the host has already authenticated (for example by
    /// verifying a [`SignedCall`](amity_shared::SignedCall)).
    pub fn assume(address: Address) -> Self {
        Self(address)
    }

    pub fn address(&self) -> Address {
        self.0
    }
}
