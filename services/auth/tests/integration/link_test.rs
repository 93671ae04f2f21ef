use reserva_auth::usecase::link::{
    LINKING_STATE_VERSION, LinkExternalIdentityUseCase, LinkInput, LinkingState,
    encode_linking_state,
};
use reserva_auth_types::token::{Role, validate_session_token};

use crate::helpers::{MockOwnerRepo, SESSION_TTL, TEST_JWT_SECRET, owner};

const WEB_APP_URL: &str = "https://app.reserva.example";

fn use_case(owners: MockOwnerRepo) -> LinkExternalIdentityUseCase<MockOwnerRepo> {
    LinkExternalIdentityUseCase {
        owners,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        session_ttl_secs: SESSION_TTL,
        web_app_url: WEB_APP_URL.to_owned(),
    }
}

fn callback(subject: &str, email: &str) -> LinkInput {
    LinkInput {
        provider_subject_id: subject.to_owned(),
        email: email.to_owned(),
        given_name: "Nia".to_owned(),
        family_name: "Okoye".to_owned(),
        linking_state: None,
    }
}

#[tokio::test]
async fn should_create_owner_and_tenant_on_first_callback() {
    let owners = MockOwnerRepo::empty();
    let uc = use_case(owners.clone());

    let output = uc.execute(callback("sub-1", "nia@x.com")).await.unwrap();

    assert_eq!(owners.count(), 1);
    let created = owners.owners.lock().unwrap()[0].clone();
    assert_eq!(created.provider_subject.as_deref(), Some("sub-1"));
    assert!(created.password_hash.is_none());
    assert_eq!(created.tenant.as_ref().unwrap().name, "Nia Okoye");

    let info = validate_session_token(&output.session.session_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.principal_id, created.id);
    assert_eq!(info.role, Role::TenantOwner);
    assert!(output
        .redirect_url
        .starts_with(&format!("{WEB_APP_URL}?token=")));
}

#[tokio::test]
async fn should_be_idempotent_across_repeated_callbacks() {
    let owners = MockOwnerRepo::empty();
    let uc = use_case(owners.clone());

    let first = uc.execute(callback("sub-1", "nia@x.com")).await.unwrap();
    let second = uc.execute(callback("sub-1", "nia@x.com")).await.unwrap();

    assert_eq!(owners.count(), 1);
    assert_eq!(first.session.principal.id, second.session.principal.id);
}

#[tokio::test]
async fn should_link_subject_to_existing_password_account() {
    let alice = owner("alice@example.com", "owner-pw");
    let owners = MockOwnerRepo::new(vec![alice.clone()]);
    let uc = use_case(owners.clone());

    let output = uc
        .execute(callback("sub-42", "alice@example.com"))
        .await
        .unwrap();

    // Linked in place, no second account.
    assert_eq!(owners.count(), 1);
    assert_eq!(output.session.principal.id, alice.id);
    let linked = owners.owners.lock().unwrap()[0].clone();
    assert_eq!(linked.provider_subject.as_deref(), Some("sub-42"));
    // The password credential survives the link.
    assert!(linked.password_hash.is_some());
}

#[tokio::test]
async fn should_prefer_subject_match_over_email_match() {
    let mut linked = owner("old-address@x.com", "owner-pw");
    linked.provider_subject = Some("sub-1".to_owned());
    let owners = MockOwnerRepo::new(vec![linked.clone()]);
    let uc = use_case(owners.clone());

    // Provider now reports a new email for the same subject.
    let output = uc.execute(callback("sub-1", "new-address@x.com")).await.unwrap();

    assert_eq!(owners.count(), 1);
    assert_eq!(output.session.principal.id, linked.id);
}

#[tokio::test]
async fn should_honor_signed_redirect_state() {
    let state = LinkingState {
        v: LINKING_STATE_VERSION,
        redirect_uri: Some("reserva-app://login".to_owned()),
    };
    let raw = encode_linking_state(&state, TEST_JWT_SECRET);
    let uc = use_case(MockOwnerRepo::empty());

    let output = uc
        .execute(LinkInput {
            linking_state: Some(raw),
            ..callback("sub-1", "nia@x.com")
        })
        .await
        .unwrap();

    assert!(output.redirect_url.starts_with("reserva-app://login?token="));
}

#[tokio::test]
async fn should_fall_back_to_web_app_url_for_forged_state() {
    let state = LinkingState {
        v: LINKING_STATE_VERSION,
        redirect_uri: Some("https://evil.example".to_owned()),
    };
    let raw = encode_linking_state(&state, "attacker-secret");
    let uc = use_case(MockOwnerRepo::empty());

    let output = uc
        .execute(LinkInput {
            linking_state: Some(raw),
            ..callback("sub-1", "nia@x.com")
        })
        .await
        .unwrap();

    assert!(output.redirect_url.starts_with(WEB_APP_URL));
}
