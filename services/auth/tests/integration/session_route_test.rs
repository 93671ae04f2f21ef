use axum_test::TestServer;
use sea_orm::DatabaseConnection;

use reserva_auth::infra::challenge::InMemoryChallengeStore;
use reserva_auth::infra::mailer::HttpMailer;
use reserva_auth::router::build_router;
use reserva_auth::state::AppState;
use reserva_auth::usecase::token::{
    issue_employee_session, issue_owner_session, issue_pending_token,
};
use reserva_auth_types::token::Role;

use crate::helpers::{SESSION_TTL, TEST_JWT_SECRET, employee, owner, tenant_a, tenant_b};

/// Router over a disconnected database: the session route reads claims only,
/// it never touches storage.
fn test_server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        challenges: InMemoryChallengeStore::new(),
        mailer: HttpMailer::new("http://127.0.0.1:0".to_owned()),
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        web_app_url: "https://app.reserva.example".to_owned(),
        session_ttl_secs: SESSION_TTL,
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn should_expose_health_endpoints() {
    let server = test_server();
    assert_eq!(server.get("/healthz").await.status_code(), 200);
    assert_eq!(server.get("/readyz").await.status_code(), 200);
}

#[tokio::test]
async fn should_echo_session_for_matching_tenant() {
    let alice = owner("alice@example.com", "owner-pw");
    let (token, _) = issue_owner_session(&alice, TEST_JWT_SECRET, SESSION_TTL).unwrap();
    let server = test_server();

    let response = server
        .get(&format!("/tenants/{}/session", tenant_a().id))
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<serde_json::Value>();
    assert_eq!(body["principalId"], alice.id.to_string());
    assert_eq!(body["tenantId"], tenant_a().id.to_string());
    assert_eq!(body["role"], "TENANT_OWNER");
}

#[tokio::test]
async fn should_forbid_cross_tenant_access() {
    let alice = owner("alice@example.com", "owner-pw");
    let (token, _) = issue_owner_session(&alice, TEST_JWT_SECRET, SESSION_TTL).unwrap();
    let server = test_server();

    let response = server
        .get(&format!("/tenants/{}/session", tenant_b().id))
        .authorization_bearer(&token)
        .await;

    assert_eq!(response.status_code(), 403);
}

#[tokio::test]
async fn should_scope_employee_session_to_its_tenant() {
    let eddie = employee("eddie@x.com", "staff-pw");
    let (token, _) = issue_employee_session(&eddie, TEST_JWT_SECRET, SESSION_TTL).unwrap();
    let server = test_server();

    let allowed = server
        .get(&format!("/tenants/{}/session", tenant_b().id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(allowed.status_code(), 200);
    let body = allowed.json::<serde_json::Value>();
    assert_eq!(body["employeeId"], eddie.employee_id.to_string());

    let denied = server
        .get(&format!("/tenants/{}/session", tenant_a().id))
        .authorization_bearer(&token)
        .await;
    assert_eq!(denied.status_code(), 403);
}

#[tokio::test]
async fn should_let_superadmin_into_any_tenant() {
    let mut root = owner("root@x.com", "owner-pw");
    root.role = Role::SuperAdmin;
    root.tenant = None;
    let (token, _) = issue_owner_session(&root, TEST_JWT_SECRET, SESSION_TTL).unwrap();
    let server = test_server();

    for tenant in [tenant_a(), tenant_b()] {
        let response = server
            .get(&format!("/tenants/{}/session", tenant.id))
            .authorization_bearer(&token)
            .await;
        assert_eq!(response.status_code(), 200);
    }
}

#[tokio::test]
async fn should_reject_missing_bearer_token() {
    let server = test_server();
    let response = server
        .get(&format!("/tenants/{}/session", tenant_a().id))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn should_reject_pending_token_on_tenant_routes() {
    let alice = owner("alice@example.com", "owner-pw");
    let pending = issue_pending_token(alice.id, &alice.email, TEST_JWT_SECRET).unwrap();
    let server = test_server();

    let response = server
        .get(&format!("/tenants/{}/session", tenant_a().id))
        .authorization_bearer(&pending)
        .await;

    // Password checked but second factor outstanding: not a session.
    assert_eq!(response.status_code(), 401);
}
