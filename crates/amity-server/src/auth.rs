//! Caller authentication for submitted calls.
//!
//! A [`SignedCall`] is admitted when its Ed25519 signature verifies against
//! the claimed caller, its timestamp lies within the configured clock skew,
//! and its `(caller, call_id)` pair has not been admitted before. Admitted
//! ids are remembered until they could no longer pass the freshness check.

use std::collections::HashMap;
use std::sync::Arc;

use amity_ledger::Caller;
use amity_shared::types::Address;
use amity_shared::SignedCall;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ServerError;

/// Verifies signed calls and remembers recently admitted call ids.
#[derive(Clone)]
pub struct Authenticator {
    max_skew: Duration,
    /// (caller, call_id) -> issued_at of admitted calls
    seen: Arc<RwLock<HashMap<(Address, Uuid), DateTime<Utc>>>>,
}

impl Authenticator {
    pub fn new(max_skew: Duration) -> Self {
        Self {
            max_skew,
            seen: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Admit `signed` and hand back the caller it was issued by.
    pub async fn authenticate(&self, signed: &SignedCall) -> Result<Caller, ServerError> {
        self.authenticate_at(signed, Utc::now()).await
    }

    pub async fn authenticate_at(
        &self,
        signed: &SignedCall,
        now: DateTime<Utc>,
    ) -> Result<Caller, ServerError> {
        // 1. Cryptographic check.
        if let Err(e) = signed.verify() {
            warn!(caller = %signed.caller.short(), error = %e, "Rejected call with bad signature");
            return Err(e.into());
        }

        // 2. Freshness.
        if !signed.is_fresh(now, self.max_skew) {
            debug!(
                caller = %signed.caller.short(),
                issued_at = %signed.issued_at,
                "Rejected stale call"
            );
            return Err(ServerError::StaleCall);
        }

        // 3. Replay. Checked and recorded under one write lock so two copies
        //    of the same call cannot both get through.
        {
            let mut seen = self.seen.write().await;
            let key = (signed.caller, signed.call_id);
            if seen.contains_key(&key) {
                warn!(
                    caller = %signed.caller.short(),
                    call_id = %signed.call_id,
                    "Rejected replayed call"
                );
                return Err(ServerError::ReplayedCall);
            }
            seen.insert(key, signed.issued_at);
        }

        Ok(Caller::assume(signed.caller))
    }

    /// Forget call ids that are too old to pass the freshness check anyway.
    pub async fn purge_expired(&self) {
        self.purge_expired_at(Utc::now()).await;
    }

    pub async fn purge_expired_at(&self, now: DateTime<Utc>) {
        let mut seen = self.seen.write().await;
        let before = seen.len();
        let horizon = now - self.max_skew;
        seen.retain(|_, issued_at| *issued_at >= horizon);
        let removed = before - seen.len();
        if removed > 0 {
            debug!(removed, "Purged expired call ids");
        }
    }

    #[cfg(test)]
    async fn remembered(&self) -> usize {
        self.seen.read().await.len()
    }
}
