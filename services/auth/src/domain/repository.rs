#![allow(async_fn_in_trait)]

use uuid::Uuid;

use crate::domain::types::{EmployeeIdentity, NewOwnerIdentity, NewTenant, OwnerIdentity};
use crate::error::AuthServiceError;

/// Credential-store port for owner identities.
pub trait OwnerRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<OwnerIdentity>, AuthServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<OwnerIdentity>, AuthServiceError>;

    /// The stable lookup key once an external provider has been linked.
    async fn find_by_provider_subject(
        &self,
        subject: &str,
    ) -> Result<Option<OwnerIdentity>, AuthServiceError>;

    /// Record the provider subject on an existing owner. Idempotent.
    async fn link_provider_subject(
        &self,
        owner_id: Uuid,
        subject: &str,
    ) -> Result<(), AuthServiceError>;

    /// Create an owner together with its fresh tenant in one transaction.
    ///
    /// Concurrent duplicate provider callbacks race on this insert; the
    /// storage layer resolves the race via its unique constraints — on
    /// conflict the already-created owner is re-fetched and returned.
    async fn create_with_tenant(
        &self,
        owner: &NewOwnerIdentity,
        tenant: &NewTenant,
    ) -> Result<OwnerIdentity, AuthServiceError>;
}

/// Credential-store port for employee identities. Only active rows are
/// visible to login.
pub trait EmployeeRepository: Send + Sync {
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<EmployeeIdentity>, AuthServiceError>;
}

/// Short-lived one-time-code store, keyed by principal id.
///
/// The in-process implementation is intentionally non-durable (a restart
/// invalidates pending challenges); the port exists so a distributed store
/// can be swapped in without touching call sites.
pub trait ChallengeStore: Send + Sync {
    /// Generate, store, and return a fresh 6-digit code, overwriting any
    /// existing challenge for this principal.
    async fn issue(&self, principal_id: Uuid) -> Result<String, AuthServiceError>;

    /// Atomic read-then-delete: `true` exactly once for a live matching code.
    /// A mismatch retains the challenge (bounded by the attempt cap);
    /// expiry or cap exhaustion deletes it.
    async fn verify(&self, principal_id: Uuid, code: &str) -> Result<bool, AuthServiceError>;

    /// Remove expired entries; returns how many were dropped.
    async fn sweep(&self) -> Result<usize, AuthServiceError>;
}

/// Outbound email collaborator: deliver a message to an address.
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AuthServiceError>;
}
