//! # amity-ledger
//!
//! The append-only social ledger: a directory of registered accounts, a
//! symmetric friendship graph between them, and per-pair message threads
//! readable only by friends.
//!
//! The crate holds no locks and performs no I/O. Every operation validates
//! all of its preconditions before touching state, so a failed call leaves
//! the ledger exactly as it was. The host that embeds a [`Ledger`] supplies
//! the authenticated [`Caller`] and runs one operation at a time.

pub mod context;
pub mod directory;
pub mod friends;
pub mod ledger;
pub mod messages;
pub mod models;

mod error;

pub use context::Caller;
pub use directory::UserDirectory;
pub use error::{ErrorKind, LedgerError, LengthError, Result};
pub use friends::FriendGraph;
pub use ledger::{Ledger, Outcome};
pub use messages::MessageLedger;
pub use models::*;
