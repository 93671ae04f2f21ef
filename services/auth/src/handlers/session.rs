use axum::Json;
use serde::Serialize;

use reserva_auth_types::guard::TenantAccess;
use reserva_auth_types::token::Role;

// ── GET /tenants/{tenant_id}/session ──────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub principal_id: String,
    pub email: String,
    pub tenant_id: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
}

/// Echo of the validated claims for the requested tenant. The [`TenantAccess`]
/// extractor has already enforced token validity and tenant scope.
pub async fn get_session(access: TenantAccess) -> Json<SessionResponse> {
    let session = access.session;
    Json(SessionResponse {
        principal_id: session.principal_id.to_string(),
        email: session.email,
        tenant_id: session.tenant_id,
        role: session.role,
        employee_id: session.employee_id.map(|id| id.to_string()),
    })
}
