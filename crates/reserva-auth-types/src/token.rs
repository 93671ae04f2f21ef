//! JWT claim shapes and validation for session and pending-second-factor tokens.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// Discriminant claim value marking a pending-second-factor token.
pub const TOKEN_TYPE_PENDING_2FA: &str = "pending_2fa";

/// Discriminant claim value marking an employee session.
pub const TOKEN_TYPE_EMPLOYEE: &str = "employee";

/// Role carried in session-token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    TenantOwner,
    SuperAdmin,
    Employee,
}

impl Role {
    /// Wire/storage representation, identical to the claim encoding.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TenantOwner => "TENANT_OWNER",
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Employee => "EMPLOYEE",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TENANT_OWNER" => Ok(Self::TenantOwner),
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "EMPLOYEE" => Ok(Self::Employee),
            _ => Err(()),
        }
    }
}

/// Errors returned by token validation.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("wrong token type")]
    WrongType,
}

/// Full session-token claims.
///
/// `tenant_id` is nullable only for superusers. Employee sessions additionally
/// carry `employee_id` and `token_type: "employee"`.
///
/// [`Deserialize`] is always available — all consumers validate tokens.
/// [`Serialize`] requires the **`USE_ONLY_IN_AUTH_SERVICE`** cargo feature.
/// Only the auth service enables it because it is the sole token issuer.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct SessionClaims {
    /// Principal ID (UUID string).
    pub sub: String,
    pub email: String,
    #[serde(rename = "tenantId")]
    pub tenant_id: Option<String>,
    pub role: Role,
    #[serde(
        rename = "employeeId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub employee_id: Option<String>,
    /// `Some("employee")` for employee sessions, absent otherwise.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

/// Pending-second-factor token claims. Asserts "password check passed, second
/// factor outstanding" — insufficient for tenant-scoped access.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_AUTH_SERVICE", test), derive(Serialize))]
pub struct PendingClaims {
    pub sub: String,
    pub email: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub exp: u64,
}

/// Principal identity extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub principal_id: Uuid,
    pub email: String,
    pub tenant_id: Option<String>,
    pub role: Role,
    pub employee_id: Option<Uuid>,
    pub exp: u64,
}

// ── Core decode (private) ────────────────────────────────────────────────

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s — tolerates clock skew between services.
fn decode_jwt<C: serde::de::DeserializeOwned>(token: &str, secret: &str) -> Result<C, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<C>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature
        | jsonwebtoken::errors::ErrorKind::InvalidEcdsaKey
        | jsonwebtoken::errors::ErrorKind::InvalidRsaKey(_) => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(data.claims)
}

// ── Public: all consumers ────────────────────────────────────────────────

/// Validate a session bearer token, returning parsed identity.
///
/// This is the primary public API for token validation. The tenant guard
/// calls this on every tenant-scoped request.
///
/// A pending-second-factor token fails here: it carries no `role` claim, so
/// deserialization rejects it before any scope decision is made.
pub fn validate_session_token(token: &str, secret: &str) -> Result<SessionInfo, TokenError> {
    let claims: SessionClaims = decode_jwt(token, secret)?;
    if claims.token_type.as_deref() == Some(TOKEN_TYPE_PENDING_2FA) {
        return Err(TokenError::WrongType);
    }
    let principal_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    let employee_id = match claims.employee_id {
        Some(raw) => Some(raw.parse::<Uuid>().map_err(|_| TokenError::Malformed)?),
        None => None,
    };
    Ok(SessionInfo {
        principal_id,
        email: claims.email,
        tenant_id: claims.tenant_id,
        role: claims.role,
        employee_id,
        exp: claims.exp,
    })
}

/// Validate a pending-second-factor token, returning the principal it binds.
///
/// Rejects any token whose `type` claim is not `pending_2fa` — a full session
/// token must never stand in for a pending one (it would skip the second
/// factor), and vice versa.
pub fn validate_pending_token(token: &str, secret: &str) -> Result<(Uuid, String), TokenError> {
    let claims: PendingClaims = decode_jwt(token, secret)?;
    if claims.token_type != TOKEN_TYPE_PENDING_2FA {
        return Err(TokenError::WrongType);
    }
    let principal_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    Ok((principal_id, claims.email))
}
