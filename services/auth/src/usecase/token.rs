//! Token issuance and pending-token verification.
//!
//! The tenant id in session claims always comes from the principal's own
//! record, never from caller input — a forged tenant claim at issuance time
//! would otherwise defeat the tenant guard.

use jsonwebtoken::{EncodingKey, Header, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use reserva_auth_types::token::{
    PendingClaims, SessionClaims, TOKEN_TYPE_EMPLOYEE, TOKEN_TYPE_PENDING_2FA,
    validate_pending_token,
};

use crate::domain::types::{EmployeeIdentity, OwnerIdentity, PENDING_TOKEN_TTL_SECS, Role};
use crate::error::AuthServiceError;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

fn sign(claims: &impl serde::Serialize, secret: &str) -> Result<String, AuthServiceError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))
}

/// Mint a pending-second-factor token. Carries no tenant or role claims —
/// those are established from the identity record only after the challenge
/// is answered.
pub fn issue_pending_token(
    principal_id: Uuid,
    email: &str,
    secret: &str,
) -> Result<String, AuthServiceError> {
    let claims = PendingClaims {
        sub: principal_id.to_string(),
        email: email.to_owned(),
        token_type: TOKEN_TYPE_PENDING_2FA.to_owned(),
        exp: now_secs() + PENDING_TOKEN_TTL_SECS,
    };
    sign(&claims, secret)
}

/// Mint a full session token for an owner principal.
pub fn issue_owner_session(
    owner: &OwnerIdentity,
    secret: &str,
    ttl_secs: u64,
) -> Result<(String, u64), AuthServiceError> {
    let exp = now_secs() + ttl_secs;
    let claims = SessionClaims {
        sub: owner.id.to_string(),
        email: owner.email.clone(),
        tenant_id: owner.tenant.as_ref().map(|t| t.id.to_string()),
        role: owner.role,
        employee_id: None,
        token_type: None,
        exp,
    };
    Ok((sign(&claims, secret)?, exp))
}

/// Mint a full session token for an employee principal, including the
/// employee discriminant and staff-profile reference.
pub fn issue_employee_session(
    employee: &EmployeeIdentity,
    secret: &str,
    ttl_secs: u64,
) -> Result<(String, u64), AuthServiceError> {
    let exp = now_secs() + ttl_secs;
    let claims = SessionClaims {
        sub: employee.id.to_string(),
        email: employee.email.clone(),
        tenant_id: Some(employee.tenant.id.to_string()),
        role: Role::Employee,
        employee_id: Some(employee.employee_id.to_string()),
        token_type: Some(TOKEN_TYPE_EMPLOYEE.to_owned()),
        exp,
    };
    Ok((sign(&claims, secret)?, exp))
}

/// Validate a pending token and return the principal it binds.
///
/// Rejects session tokens (wrong discriminant) — a full credential must not
/// be replayable as a pending one to skip the second factor.
pub fn verify_pending(token: &str, secret: &str) -> Result<(Uuid, String), AuthServiceError> {
    validate_pending_token(token, secret).map_err(|e| {
        tracing::debug!(error = %e, "rejected pending token");
        AuthServiceError::InvalidToken
    })
}
