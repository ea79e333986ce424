//! The ledger facade.
//!
//! [`Ledger`] owns the three collections and wires their cross-checks
//! together: every operation consults the directory first, then the friend
//! graph where needed, and only then mutates its own collection.

use amity_shared::protocol::Call;
use amity_shared::types::Address;
use serde::Serialize;
use tracing::debug;

use crate::context::Caller;
use crate::directory::UserDirectory;
use crate::error::Result;
use crate::friends::FriendGraph;
use crate::messages::MessageLedger;
use crate::models::{FriendEdge, Message, User};

/// Process-wide ledger state. Starts empty and only ever grows.
#[derive(Debug, Default)]
pub struct Ledger {
    directory: UserDirectory,
    friends: FriendGraph,
    messages: MessageLedger,
}

/// Result of a successfully applied [`Call`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// A mutation committed.
    Done,
    Name(String),
    Exists(bool),
    Friends(Vec<FriendEdge>),
    Messages(Vec<Message>),
    Users(Vec<User>),
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, caller: &Caller, name: &str) -> Result<()> {
        self.directory.register(caller, name)
    }

    /// `display_name` is accepted but not stored; see [`FriendGraph::add_friend`].
    pub fn add_friend(&mut self, caller: &Caller, peer: &Address, display_name: &str) -> Result<()> {
        self.friends
            .add_friend(&self.directory, caller, peer, display_name)
    }

    pub fn send_message(&mut self, caller: &Caller, receiver: &Address, content: &str) -> Result<()> {
        self.messages
            .send_message(&self.directory, &self.friends, caller, receiver, content)
    }

    pub fn resolve_name(&self, address: &Address) -> Result<&str> {
        self.directory.resolve_name(address)
    }

    pub fn user_exists(&self, address: &Address) -> bool {
        self.directory.contains(address)
    }

    pub fn list_all(&self) -> &[User] {
        self.directory.list_all()
    }

    pub fn user_at(&self, index: usize) -> Option<&User> {
        self.directory.user_at(index)
    }

    pub fn user_count(&self) -> usize {
        self.directory.len()
    }

    pub fn list_friends(&self, caller: &Caller) -> &[FriendEdge] {
        self.friends.list_friends(caller)
    }

    pub fn get_messages(&self, caller: &Caller, peer: &Address) -> Result<&[Message]> {
        self.messages
            .get_messages(&self.directory, &self.friends, caller, peer)
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Apply one call on behalf of `caller`.
    ///
    /// Either the call's effects are fully applied or, on error, nothing
    /// changed.
    pub fn apply(&mut self, caller: &Caller, call: Call) -> Result<Outcome> {
        let name = call.name();
        let result = self.dispatch(caller, call);
        if let Err(ref e) = result {
            debug!(
                caller = %caller.address().short(),
                call = name,
                kind = ?e.kind(),
                reason = %e,
                "call rejected"
            );
        }
        result
    }

    fn dispatch(&mut self, caller: &Caller, call: Call) -> Result<Outcome> {
        match call {
            Call::Register { name } => self.register(caller, &name).map(|()| Outcome::Done),
            Call::AddFriend { peer, display_name } => self
                .add_friend(caller, &peer, &display_name)
                .map(|()| Outcome::Done),
            Call::SendMessage { receiver, content } => self
                .send_message(caller, &receiver, &content)
                .map(|()| Outcome::Done),
            Call::ResolveName { address } => self
                .resolve_name(&address)
                .map(|name| Outcome::Name(name.to_string())),
            Call::ListFriends => Ok(Outcome::Friends(self.list_friends(caller).to_vec())),
            Call::GetMessages { peer } => self
                .get_messages(caller, &peer)
                .map(|thread| Outcome::Messages(thread.to_vec())),
            Call::ListUsers => Ok(Outcome::Users(self.list_all().to_vec())),
            Call::UserExists { address } => Ok(Outcome::Exists(self.user_exists(&address))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, LedgerError};

    fn alice() -> Caller {
        Caller::assume(Address([0xa1; 32]))
    }

    fn bob() -> Caller {
        Caller::assume(Address([0xb0; 32]))
    }

    fn carol() -> Caller {
        Caller::assume(Address([0xc4; 32]))
    }

    fn register(name: &str) -> Call {
        Call::Register { name: name.into() }
    }

    #[test]
    fn alice_and_bob_scenario() {
        let mut ledger = Ledger::new();
        ledger.apply(&alice(), register("alice")).unwrap();
        ledger.apply(&bob(), register("bob")).unwrap();

        let befriend = Call::AddFriend {
            peer: bob().address(),
            display_name: "bobby".into(),
        };
        assert_eq!(ledger.apply(&alice(), befriend), Ok(Outcome::Done));

        let err = ledger
            .apply(
                &bob(),
                Call::AddFriend {
                    peer: alice().address(),
                    display_name: "al".into(),
                },
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyFriends);

        ledger
            .apply(
                &alice(),
                Call::SendMessage {
                    receiver: bob().address(),
                    content: "hi".into(),
                },
            )
            .unwrap();

        let thread = ledger
            .apply(
                &bob(),
                Call::GetMessages {
                    peer: alice().address(),
                },
            )
            .unwrap();
        assert_eq!(
            thread,
            Outcome::Messages(vec![Message {
                sender: alice().address(),
                content: "hi".into()
            }])
        );
    }

    #[test]
    fn unregistered_caller_cannot_befriend() {
        let mut ledger = Ledger::new();
        ledger.register(&bob(), "bob").unwrap();

        assert_eq!(
            ledger.add_friend(&alice(), &bob().address(), "fdfd"),
            Err(LedgerError::UNKNOWN_USER)
        );

        ledger.register(&alice(), "alice").unwrap();
        assert_eq!(
            ledger.add_friend(&alice(), &carol().address(), "fdfd"),
            Err(LedgerError::UnknownFriend)
        );
    }

    #[test]
    fn registration_checked_before_friendship() {
        let mut ledger = Ledger::new();
        ledger.register(&alice(), "alice").unwrap();

        let err = ledger
            .send_message(&carol(), &alice().address(), "hello")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownUser);

        let err = ledger
            .send_message(&alice(), &carol().address(), "hello")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownFriend);

        let err = ledger.get_messages(&carol(), &alice().address()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownUser);
    }

    #[test]
    fn failed_calls_leave_no_trace() {
        let mut ledger = Ledger::new();
        ledger.register(&alice(), "alice").unwrap();
        ledger.register(&bob(), "bob").unwrap();

        assert!(ledger.apply(&alice(), register("again")).is_err());
        assert!(ledger.apply(&carol(), register("")).is_err());
        assert!(ledger
            .apply(
                &alice(),
                Call::AddFriend {
                    peer: alice().address(),
                    display_name: String::new(),
                }
            )
            .is_err());
        assert!(ledger
            .apply(
                &alice(),
                Call::SendMessage {
                    receiver: bob().address(),
                    content: "hi".into(),
                }
            )
            .is_err());

        assert_eq!(ledger.user_count(), 2);
        assert_eq!(ledger.list_all().len(), 2);
        assert_eq!(ledger.resolve_name(&alice().address()), Ok("alice"));
        assert!(!ledger.user_exists(&carol().address()));
        assert!(ledger.list_friends(&alice()).is_empty());
        assert!(ledger.list_friends(&bob()).is_empty());
    }

    #[test]
    fn friend_names_are_snapshots_from_the_directory() {
        let mut ledger = Ledger::new();
        ledger.register(&alice(), "alice").unwrap();
        ledger.register(&bob(), "bob").unwrap();
        ledger
            .add_friend(&alice(), &bob().address(), "not bob")
            .unwrap();

        assert_eq!(ledger.list_friends(&alice())[0].name, "bob");
        assert_eq!(ledger.list_friends(&bob())[0].name, "alice");
    }

    #[test]
    fn queries_through_apply() {
        let mut ledger = Ledger::new();
        ledger.apply(&alice(), register("alice")).unwrap();
        ledger.apply(&bob(), register("bob")).unwrap();

        assert_eq!(
            ledger.apply(
                &carol(),
                Call::ResolveName {
                    address: bob().address()
                }
            ),
            Ok(Outcome::Name("bob".into()))
        );
        assert_eq!(
            ledger
                .apply(
                    &alice(),
                    Call::ResolveName {
                        address: carol().address()
                    }
                )
                .unwrap_err(),
            LedgerError::UNKNOWN_USER
        );
        assert_eq!(
            ledger.apply(
                &carol(),
                Call::UserExists {
                    address: alice().address()
                }
            ),
            Ok(Outcome::Exists(true))
        );
        assert_eq!(
            ledger.apply(&carol(), Call::ListFriends),
            Ok(Outcome::Friends(vec![]))
        );

        let Ok(Outcome::Users(users)) = ledger.apply(&carol(), Call::ListUsers) else {
            panic!("expected user list");
        };
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].address, alice().address());
        assert_eq!(users[1].name, "bob");
        assert_eq!(ledger.user_at(1), Some(&users[1]));
    }

    #[test]
    fn outcome_json_shape() {
        let json = serde_json::to_value(Outcome::Exists(true)).unwrap();
        assert_eq!(json, serde_json::json!({ "result": "exists", "value": true }));
        let json = serde_json::to_value(Outcome::Done).unwrap();
        assert_eq!(json, serde_json::json!({ "result": "done" }));
    }
}
