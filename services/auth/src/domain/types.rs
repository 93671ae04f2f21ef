use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use reserva_auth_types::token::Role;

/// Tenant fields the identity core needs (labels and claims only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRef {
    pub id: Uuid,
    pub name: String,
}

/// Business-owner principal. Email is unique among owner identities; an
/// employee identity may carry the same email — never assume one principal
/// per email.
#[derive(Debug, Clone)]
pub struct OwnerIdentity {
    pub id: Uuid,
    pub email: String,
    /// Unset when created via an external provider.
    pub password_hash: Option<String>,
    pub provider_subject: Option<String>,
    pub role: Role,
    pub two_factor_enabled: bool,
    pub first_name: String,
    pub last_name: String,
    /// Zero-or-one tenant; superusers may have none.
    pub tenant: Option<TenantRef>,
}

/// Staff principal, consulted only for login. Always tenant-bound.
#[derive(Debug, Clone)]
pub struct EmployeeIdentity {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub tenant: TenantRef,
    /// Staff profile reference in the booking domain.
    pub employee_id: Uuid,
    pub first_name: String,
    pub last_name: String,
}

/// Caller-supplied hint when an email matches both principal namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalType {
    Owner,
    Employee,
}

/// Fields for creating an owner identity via the external provider path.
#[derive(Debug, Clone)]
pub struct NewOwnerIdentity {
    pub id: Uuid,
    pub email: String,
    pub provider_subject: String,
    pub first_name: String,
    pub last_name: String,
}

/// Fields for bootstrapping the fresh tenant that backs a provider-created owner.
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub id: Uuid,
    pub name: String,
    /// Base handle derived from the email local-part; the repository may
    /// suffix it to satisfy uniqueness.
    pub handle: String,
}

/// One-time second-factor code bound to a principal id. At most one live
/// challenge per principal — re-issue overwrites.
#[derive(Debug, Clone)]
pub struct OtpChallenge {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub failed_attempts: u8,
}

impl OtpChallenge {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Challenge time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 600;

/// Sweep interval for expired challenges, in seconds.
pub const OTP_SWEEP_INTERVAL_SECS: u64 = 300;

/// Failed verification attempts allowed before a challenge is discarded.
pub const OTP_MAX_ATTEMPTS: u8 = 5;

/// Pending-second-factor token lifetime in seconds.
pub const PENDING_TOKEN_TTL_SECS: u64 = 600;

/// Entitlement plan assigned to provider-bootstrapped tenants.
pub const DEFAULT_TENANT_PLAN: &str = "TRIAL";

/// Mask an email for the disambiguation payload: keep the first two characters
/// of the local part and the full domain (`jo***@example.com`).
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let visible: String = local.chars().take(2).collect();
            format!("{visible}***@{domain}")
        }
        None => "***".to_owned(),
    }
}
