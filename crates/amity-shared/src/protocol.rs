use chrono::{DateTime, Duration, Utc};
use ed25519_dalek::Signature;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IdentityError;
use crate::identity::{verify_signature, Keypair};
use crate::types::Address;

/// Every operation a caller can ask the ledger to perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    /// Create the caller's account
    Register { name: String },

    /// Befriend a registered peer. `display_name` is the caller's own
    /// label for the peer and is not what the ledger stores.
    AddFriend { peer: Address, display_name: String },

    /// Append a message to the caller's thread with a friend
    SendMessage { receiver: Address, content: String },

    /// Look up the name registered for an address
    ResolveName { address: Address },

    /// The caller's friend list
    ListFriends,

    /// The caller's thread with a friend
    GetMessages { peer: Address },

    /// Every registered account, in registration order
    ListUsers,

    /// Whether an address has an account
    UserExists { address: Address },
}

impl Call {
    /// Whether the call changes ledger state when it succeeds
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::Register { .. } | Call::AddFriend { .. } | Call::SendMessage { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Call::Register { .. } => "register",
            Call::AddFriend { .. } => "add_friend",
            Call::SendMessage { .. } => "send_message",
            Call::ResolveName { .. } => "resolve_name",
            Call::ListFriends => "list_friends",
            Call::GetMessages { .. } => "get_messages",
            Call::ListUsers => "list_users",
            Call::UserExists { .. } => "user_exists",
        }
    }
}

/// A call bound to the caller that issued it.
///
/// The signature covers `caller || call_id || issued_at || call` in bincode
/// form, so a host that verifies it knows the call was issued by the holder
/// of `caller`'s key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedCall {
    pub caller: Address,
    /// Unique per call; hosts use it to reject replays.
    pub call_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub call: Call,
    pub signature: Vec<u8>,
}

#[derive(Serialize)]
struct SigningPayload<'a> {
    caller: &'a Address,
    call_id: &'a Uuid,
    issued_at: &'a DateTime<Utc>,
    call: &'a Call,
}

fn signing_payload(
    caller: &Address,
    call_id: &Uuid,
    issued_at: &DateTime<Utc>,
    call: &Call,
) -> Result<Vec<u8>, bincode::Error> {
    bincode::serialize(&SigningPayload {
        caller,
        call_id,
        issued_at,
        call,
    })
}

impl SignedCall {
    /// Sign `call` as the holder of `keypair`, stamped with the current time.
    pub fn sign(keypair: &Keypair, call: Call) -> Result<Self, IdentityError> {
        Self::sign_at(keypair, call, Utc::now())
    }

    pub fn sign_at(
        keypair: &Keypair,
        call: Call,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, IdentityError> {
        let caller = keypair.address();
        let call_id = Uuid::new_v4();
        let payload = signing_payload(&caller, &call_id, &issued_at, &call)?;
        let signature = keypair.sign(&payload);

        Ok(Self {
            caller,
            call_id,
            issued_at,
            call,
            signature: signature.to_bytes().to_vec(),
        })
    }

    /// Check that the signature was produced by `caller`.
    pub fn verify(&self) -> Result<(), IdentityError> {
        let signature =
            Signature::from_slice(&self.signature).map_err(|_| IdentityError::MalformedSignature)?;
        let payload = signing_payload(&self.caller, &self.call_id, &self.issued_at, &self.call)?;
        verify_signature(&self.caller, &payload, &signature)
    }

    /// Whether `issued_at` lies within `max_skew` of `now`, in either direction.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_skew: Duration) -> bool {
        let drift = now.signed_duration_since(self.issued_at);
        drift <= max_skew && drift >= -max_skew
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str) -> Call {
        Call::Register {
            name: name.to_string(),
        }
    }

    #[test]
    fn test_signed_call_verifies() {
        let kp = Keypair::generate();
        let signed = SignedCall::sign(&kp, register("alice")).unwrap();
        assert_eq!(signed.caller, kp.address());
        assert!(signed.verify().is_ok());
    }

    #[test]
    fn test_tampered_call_rejected() {
        let kp = Keypair::generate();
        let mut signed = SignedCall::sign(&kp, register("alice")).unwrap();
        signed.call = register("mallory");
        assert_eq!(signed.verify(), Err(IdentityError::BadSignature));
    }

    #[test]
    fn test_claimed_caller_must_match_key() {
        let kp = Keypair::generate();
        let other = Keypair::generate();
        let mut signed = SignedCall::sign(&kp, Call::ListFriends).unwrap();
        signed.caller = other.address();
        assert!(signed.verify().is_err());
    }

    #[test]
    fn test_truncated_signature_rejected() {
        let kp = Keypair::generate();
        let mut signed = SignedCall::sign(&kp, Call::ListUsers).unwrap();
        signed.signature.truncate(10);
        assert_eq!(signed.verify(), Err(IdentityError::MalformedSignature));
    }

    #[test]
    fn test_freshness_window() {
        let kp = Keypair::generate();
        let now = Utc::now();
        let skew = Duration::seconds(300);

        let recent = SignedCall::sign_at(&kp, Call::ListUsers, now - Duration::seconds(10)).unwrap();
        assert!(recent.is_fresh(now, skew));

        let old = SignedCall::sign_at(&kp, Call::ListUsers, now - Duration::seconds(301)).unwrap();
        assert!(!old.is_fresh(now, skew));

        let future = SignedCall::sign_at(&kp, Call::ListUsers, now + Duration::seconds(301)).unwrap();
        assert!(!future.is_fresh(now, skew));
    }

    #[test]
    fn test_call_json_shape() {
        let peer = Address([1u8; 32]);
        let call = Call::GetMessages { peer };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["op"], "get_messages");
        assert!(!call.is_mutation());
        assert!(Call::SendMessage {
            receiver: peer,
            content: "hi".into()
        }
        .is_mutation());
    }

    #[test]
    fn test_signed_call_survives_json() {
        let kp = Keypair::generate();
        let signed = SignedCall::sign(&kp, register("bob")).unwrap();
        let json = serde_json::to_string(&signed).unwrap();
        let restored: SignedCall = serde_json::from_str(&json).unwrap();
        assert!(restored.verify().is_ok());
    }
}
