//! Tenant access guard — the tenant-isolation boundary.
//!
//! [`TenantAccess`] is an extractor mounted on every tenant-scoped route. It
//! validates the `Authorization: Bearer` token and enforces that the token's
//! tenant claim matches the `tenant_id` path parameter. The tenant identifier
//! is always taken from the resource path, never from the request body.

use axum::extract::{FromRequestParts, RawPathParams};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http::header::AUTHORIZATION;
use http::request::Parts;

use crate::token::{Role, SessionInfo, validate_session_token};

/// Path parameter that names the tenant being accessed.
const TENANT_PARAM: &str = "tenant_id";

/// Provides the shared JWT secret to the guard. Implemented by each service's
/// app state.
pub trait JwtSecretProvider {
    fn jwt_secret(&self) -> &str;
}

/// Guard rejection. Bodies stay generic — which check failed is logged, not
/// reported to the caller.
#[derive(Debug, thiserror::Error)]
pub enum GuardRejection {
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
}

impl GuardRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
        }
    }
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
        };
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Validated caller identity for a tenant-scoped request.
///
/// Extraction succeeds only when the bearer token is valid and its tenant
/// claim equals the `{tenant_id}` path parameter (string comparison — claims
/// may originate from different storage representations). A `SUPER_ADMIN`
/// role bypasses the tenant comparison entirely.
#[derive(Debug, Clone)]
pub struct TenantAccess {
    pub session: SessionInfo,
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

impl<S> FromRequestParts<S> for TenantAccess
where
    S: JwtSecretProvider + Send + Sync,
{
    type Rejection = GuardRejection;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // In Rust 1.82+ precise capturing, `async fn` captures lifetimes differently,
    // causing E0195. Fix: return an explicit async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let token = bearer_token(parts).ok_or(GuardRejection::Unauthenticated)?;

            let session = validate_session_token(token, state.jwt_secret()).map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                GuardRejection::Unauthenticated
            })?;

            // Superusers may access any tenant.
            if session.role == Role::SuperAdmin {
                return Ok(Self { session });
            }

            let params = RawPathParams::from_request_parts(parts, state)
                .await
                .map_err(|_| GuardRejection::Forbidden)?;
            let requested = params
                .iter()
                .find(|(name, _)| *name == TENANT_PARAM)
                .map(|(_, value)| value)
                .ok_or(GuardRejection::Forbidden)?;

            match session.tenant_id.as_deref() {
                Some(claimed) if claimed == requested => Ok(Self { session }),
                _ => {
                    tracing::debug!(
                        principal = %session.principal_id,
                        requested_tenant = requested,
                        "tenant claim mismatch"
                    );
                    Err(GuardRejection::Forbidden)
                }
            }
        }
    }
}
