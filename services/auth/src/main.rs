use sea_orm::Database;
use tracing::info;

use reserva_auth::config::AuthConfig;
use reserva_auth::infra::challenge::{InMemoryChallengeStore, spawn_sweeper};
use reserva_auth::infra::mailer::HttpMailer;
use reserva_auth::router::build_router;
use reserva_auth::state::AppState;
use reserva_core::config::Config as _;

#[tokio::main]
async fn main() {
    reserva_core::tracing::init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let challenges = InMemoryChallengeStore::new();
    // Process-lifetime sweep of expired challenges; aborted on shutdown.
    let sweeper = spawn_sweeper(challenges.clone());

    let state = AppState {
        db,
        challenges,
        mailer: HttpMailer::new(config.mailer_url.clone()),
        jwt_secret: config.jwt_secret,
        web_app_url: config.web_app_url,
        session_ttl_secs: config.session_ttl_secs,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("auth service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");

    sweeper.abort();
}
