use axum::http::StatusCode;

/// `GET /healthz` — liveness. Answers as long as the process is serving.
pub async fn healthz() -> &'static str {
    "ok"
}

/// `GET /readyz` — readiness. Reserva services are ready once their router is
/// mounted; a service with heavier startup (pool warmup, migrations) mounts
/// its own handler instead.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}
