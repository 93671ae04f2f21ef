//! In-process OTP challenge store.
//!
//! The only cross-request mutable state in the service: one logical map from
//! principal id to live challenge, guarded by a mutex. Not durable — a
//! restart silently invalidates pending challenges and callers re-request a
//! code. Swapping in a distributed store means implementing
//! [`ChallengeStore`] elsewhere; call sites stay unchanged.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::ChallengeStore;
use crate::domain::types::{OTP_MAX_ATTEMPTS, OTP_SWEEP_INTERVAL_SECS, OTP_TTL_SECS, OtpChallenge};
use crate::error::AuthServiceError;

/// Uniformly random 6-digit code.
fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..=999_999).to_string()
}

#[derive(Clone, Default)]
pub struct InMemoryChallengeStore {
    entries: Arc<Mutex<HashMap<Uuid, OtpChallenge>>>,
}

impl InMemoryChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, OtpChallenge>>, AuthServiceError>
    {
        self.entries
            .lock()
            .map_err(|_| AuthServiceError::Internal(anyhow::anyhow!("challenge store poisoned")))
    }

    /// Whether a live (stored, possibly expired) challenge exists. Test hook.
    pub fn contains(&self, principal_id: Uuid) -> bool {
        self.entries
            .lock()
            .map(|map| map.contains_key(&principal_id))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ChallengeStore for InMemoryChallengeStore {
    async fn issue(&self, principal_id: Uuid) -> Result<String, AuthServiceError> {
        let code = generate_code();
        let challenge = OtpChallenge {
            code: code.clone(),
            expires_at: Utc::now() + chrono::Duration::seconds(OTP_TTL_SECS),
            failed_attempts: 0,
        };
        // Last write wins: re-issue replaces any prior unconsumed challenge.
        self.lock()?.insert(principal_id, challenge);
        Ok(code)
    }

    async fn verify(&self, principal_id: Uuid, code: &str) -> Result<bool, AuthServiceError> {
        let mut entries = self.lock()?;
        let Some(challenge) = entries.get_mut(&principal_id) else {
            return Ok(false);
        };
        if challenge.is_expired(Utc::now()) {
            entries.remove(&principal_id);
            return Ok(false);
        }
        if challenge.code == code {
            // Read-then-delete under the same lock: of two racing verifies,
            // at most one observes the entry.
            entries.remove(&principal_id);
            return Ok(true);
        }
        challenge.failed_attempts += 1;
        if challenge.failed_attempts >= OTP_MAX_ATTEMPTS {
            entries.remove(&principal_id);
        }
        Ok(false)
    }

    async fn sweep(&self) -> Result<usize, AuthServiceError> {
        let mut entries = self.lock()?;
        let now = Utc::now();
        let before = entries.len();
        entries.retain(|_, challenge| !challenge.is_expired(now));
        Ok(before - entries.len())
    }
}

/// Spawn the periodic expiry sweep. Owned by process lifecycle: started once
/// at startup, aborted on shutdown via the returned handle.
pub fn spawn_sweeper(store: InMemoryChallengeStore) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(OTP_SWEEP_INTERVAL_SECS));
        // First tick fires immediately; harmless on an empty map.
        loop {
            interval.tick().await;
            match store.sweep().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "swept expired challenges"),
                Err(e) => tracing::error!(error = %e, "challenge sweep failed"),
            }
        }
    })
}
