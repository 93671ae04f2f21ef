use reserva_auth::domain::repository::ChallengeStore as _;
use reserva_auth::error::AuthServiceError;
use reserva_auth::infra::challenge::InMemoryChallengeStore;
use reserva_auth::usecase::second_factor::{VerifySecondFactorInput, VerifySecondFactorUseCase};
use reserva_auth::usecase::token::{issue_owner_session, issue_pending_token};
use reserva_auth_types::token::{Role, validate_session_token};

use crate::helpers::{MockOwnerRepo, SESSION_TTL, TEST_JWT_SECRET, owner};

fn use_case(
    owners: MockOwnerRepo,
    challenges: InMemoryChallengeStore,
) -> VerifySecondFactorUseCase<MockOwnerRepo, InMemoryChallengeStore> {
    VerifySecondFactorUseCase {
        owners,
        challenges,
        jwt_secret: TEST_JWT_SECRET.to_owned(),
        session_ttl_secs: SESSION_TTL,
    }
}

#[tokio::test]
async fn should_exchange_pending_token_and_code_for_session() {
    let alice = owner("alice@example.com", "owner-pw");
    let challenges = InMemoryChallengeStore::new();
    let code = challenges.issue(alice.id).await.unwrap();
    let pending = issue_pending_token(alice.id, &alice.email, TEST_JWT_SECRET).unwrap();
    let uc = use_case(MockOwnerRepo::new(vec![alice.clone()]), challenges.clone());

    let bundle = uc
        .execute(VerifySecondFactorInput {
            pending_token: pending,
            code,
        })
        .await
        .unwrap();

    let info = validate_session_token(&bundle.session_token, TEST_JWT_SECRET).unwrap();
    assert_eq!(info.principal_id, alice.id);
    assert_eq!(info.role, Role::TenantOwner);
    assert!(challenges.is_empty());
}

#[tokio::test]
async fn should_consume_challenge_exactly_once() {
    let alice = owner("alice@example.com", "owner-pw");
    let challenges = InMemoryChallengeStore::new();
    let code = challenges.issue(alice.id).await.unwrap();
    let pending = issue_pending_token(alice.id, &alice.email, TEST_JWT_SECRET).unwrap();
    let uc = use_case(MockOwnerRepo::new(vec![alice]), challenges);

    uc.execute(VerifySecondFactorInput {
        pending_token: pending.clone(),
        code: code.clone(),
    })
    .await
    .unwrap();

    // Replaying the same token and code finds no pending challenge.
    let err = uc
        .execute(VerifySecondFactorInput {
            pending_token: pending,
            code,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidCode));
}

#[tokio::test]
async fn should_deny_wrong_code() {
    let alice = owner("alice@example.com", "owner-pw");
    let challenges = InMemoryChallengeStore::new();
    challenges.issue(alice.id).await.unwrap();
    let pending = issue_pending_token(alice.id, &alice.email, TEST_JWT_SECRET).unwrap();
    let uc = use_case(MockOwnerRepo::new(vec![alice]), challenges);

    let err = uc
        .execute(VerifySecondFactorInput {
            pending_token: pending,
            code: "000000".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidCode));
}

#[tokio::test]
async fn should_reject_session_token_in_place_of_pending() {
    let alice = owner("alice@example.com", "owner-pw");
    let challenges = InMemoryChallengeStore::new();
    let code = challenges.issue(alice.id).await.unwrap();
    let (session_token, _) = issue_owner_session(&alice, TEST_JWT_SECRET, SESSION_TTL).unwrap();
    let uc = use_case(MockOwnerRepo::new(vec![alice]), challenges);

    let err = uc
        .execute(VerifySecondFactorInput {
            pending_token: session_token,
            code,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidToken));
}

#[tokio::test]
async fn should_reject_garbage_pending_token() {
    let uc = use_case(MockOwnerRepo::empty(), InMemoryChallengeStore::new());

    let err = uc
        .execute(VerifySecondFactorInput {
            pending_token: "not-a-jwt".to_owned(),
            code: "123456".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidToken));
}

#[tokio::test]
async fn should_deny_when_principal_record_is_gone() {
    // Identity deleted between password check and code entry.
    let alice = owner("alice@example.com", "owner-pw");
    let challenges = InMemoryChallengeStore::new();
    let code = challenges.issue(alice.id).await.unwrap();
    let pending = issue_pending_token(alice.id, &alice.email, TEST_JWT_SECRET).unwrap();
    let uc = use_case(MockOwnerRepo::empty(), challenges);

    let err = uc
        .execute(VerifySecondFactorInput {
            pending_token: pending,
            code,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthServiceError::InvalidCredentials));
}
