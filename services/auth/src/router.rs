use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use reserva_core::health::{healthz, readyz};
use reserva_core::middleware::request_id_layer;

use crate::handlers::{
    external::external_callback,
    login::{login, verify_second_factor},
    session::get_session,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Login + second factor
        .route("/auth/login", post(login))
        .route("/auth/login/verify", post(verify_second_factor))
        // External identity provider callback
        .route("/auth/external/callback", post(external_callback))
        // Tenant-scoped; guarded by the TenantAccess extractor
        .route("/tenants/{tenant_id}/session", get(get_session))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
