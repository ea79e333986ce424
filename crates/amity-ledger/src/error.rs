use serde::Serialize;
use thiserror::Error;

/// Why a name or message body was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthError {
    #[error("is required")]
    Empty,

    #[error("cannot be longer than {max} characters")]
    TooLong { len: usize, max: usize },
}

/// Errors produced by ledger operations.
///
/// Every variant is a rejected precondition. None of them is transient, and
/// the ledger is never modified by a call that returns one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The caller already has an account.
    #[error("User already exist")]
    AlreadyRegistered,

    #[error("Name {0}")]
    InvalidName(LengthError),

    /// The caller (or the address being resolved) has no account.
    /// `onboarding` selects the longer reason used when reading messages.
    #[error("{}", unknown_user_reason(.onboarding))]
    UnknownUser { onboarding: bool },

    /// The counterparty has no account.
    #[error("Friend does not exist")]
    UnknownFriend,

    #[error("You cannot add yourself as a friend")]
    SelfFriendship,

    #[error("You are already friends")]
    AlreadyFriends,

    /// No friendship edge joins the two parties. Also returned when a
    /// caller targets itself with a message operation.
    #[error("You are not friends")]
    NotFriends,

    #[error("Message {0}")]
    InvalidMessage(LengthError),
}

fn unknown_user_reason(onboarding: &bool) -> &'static str {
    if *onboarding {
        "User does not exist. Create an account first."
    } else {
        "User does not exist"
    }
}

/// Field-less discriminant of [`LedgerError`], for matching and for the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AlreadyRegistered,
    InvalidName,
    UnknownUser,
    UnknownFriend,
    SelfFriendship,
    AlreadyFriends,
    NotFriends,
    InvalidMessage,
}

impl LedgerError {
    /// An unregistered caller, with the plain reason string.
    pub const UNKNOWN_USER: LedgerError = LedgerError::UnknownUser { onboarding: false };

    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::AlreadyRegistered => ErrorKind::AlreadyRegistered,
            LedgerError::InvalidName(_) => ErrorKind::InvalidName,
            LedgerError::UnknownUser { .. } => ErrorKind::UnknownUser,
            LedgerError::UnknownFriend => ErrorKind::UnknownFriend,
            LedgerError::SelfFriendship => ErrorKind::SelfFriendship,
            LedgerError::AlreadyFriends => ErrorKind::AlreadyFriends,
            LedgerError::NotFriends => ErrorKind::NotFriends,
            LedgerError::InvalidMessage(_) => ErrorKind::InvalidMessage,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LedgerError>;
