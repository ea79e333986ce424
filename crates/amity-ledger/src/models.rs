//! Records held by the ledger.
//!
//! All of them are immutable once stored. They derive `Serialize` so the
//! host can hand them straight to clients.

use amity_shared::types::Address;
use serde::{Deserialize, Serialize};

use crate::error::LengthError;

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub address: Address,
    /// Name chosen at registration, 1..=32 bytes.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Friend edge
// ---------------------------------------------------------------------------

/// One side of a friendship, as stored in its owner's friend list.
///
/// `name` is the peer's registered name copied when the friendship was
/// created. It is a snapshot and is never refreshed from the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendEdge {
    pub address: Address,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A single chat message, stored in both participants' threads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub sender: Address,
    /// Message body, 1..=256 bytes.
    pub content: String,
}

/// Check that `text` is non-empty and at most `max` UTF-8 bytes long.
pub(crate) fn check_length(text: &str, max: usize) -> Result<(), LengthError> {
    match text.len() {
        0 => Err(LengthError::Empty),
        len if len > max => Err(LengthError::TooLong { len, max }),
        _ => Ok(()),
    }
}
