//! Message threads between friends.

use std::collections::HashMap;

use amity_shared::constants::MAX_MESSAGE_LEN;
use amity_shared::types::Address;
use tracing::info;

use crate::context::Caller;
use crate::directory::UserDirectory;
use crate::error::{LedgerError, Result};
use crate::friends::FriendGraph;
use crate::models::{check_length, Message};

/// Threads keyed by `(owner, peer)`.
///
/// A sent message is appended to the sender's thread with the receiver and
/// to the receiver's thread with the sender, so each participant reads both
/// directions of the conversation in send order.
#[derive(Debug, Default)]
pub struct MessageLedger {
    threads: HashMap<(Address, Address), Vec<Message>>,
}

impl MessageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `content` from the caller to `receiver`.
    ///
    /// Checks run in order: sender registered, receiver registered, the two
    /// are friends (which also rules out messaging oneself), content length.
    pub fn send_message(
        &mut self,
        directory: &UserDirectory,
        friends: &FriendGraph,
        caller: &Caller,
        receiver: &Address,
        content: &str,
    ) -> Result<()> {
        let sender = caller.address();
        if !directory.contains(&sender) {
            return Err(LedgerError::UNKNOWN_USER);
        }
        if !directory.contains(receiver) {
            return Err(LedgerError::UnknownFriend);
        }
        if !friends.are_friends(&sender, receiver) {
            return Err(LedgerError::NotFriends);
        }
        check_length(content, MAX_MESSAGE_LEN).map_err(LedgerError::InvalidMessage)?;

        let message = Message {
            sender,
            content: content.to_string(),
        };
        self.threads
            .entry((*receiver, sender))
            .or_default()
            .push(message.clone());
        let thread = self.threads.entry((sender, *receiver)).or_default();
        thread.push(message);

        info!(
            sender = %sender.short(),
            receiver = %receiver.short(),
            bytes = content.len(),
            thread_len = thread.len(),
            "message sent"
        );
        Ok(())
    }

    /// The caller's thread with `peer`, oldest first.
    ///
    /// A friendship with no messages yet yields an empty slice.
    pub fn get_messages(
        &self,
        directory: &UserDirectory,
        friends: &FriendGraph,
        caller: &Caller,
        peer: &Address,
    ) -> Result<&[Message]> {
        let owner = caller.address();
        if !directory.contains(&owner) {
            return Err(LedgerError::UnknownUser { onboarding: true });
        }
        if !directory.contains(peer) {
            return Err(LedgerError::UnknownFriend);
        }
        if !friends.are_friends(&owner, peer) {
            return Err(LedgerError::NotFriends);
        }

        Ok(self
            .threads
            .get(&(owner, *peer))
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }
}
