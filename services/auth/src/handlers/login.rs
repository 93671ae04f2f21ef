use axum::{Json, extract::State, response::IntoResponse, response::Response};
use serde::{Deserialize, Serialize};

use crate::domain::types::PrincipalType;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginOutcome, LoginUseCase, ProfileOption};
use crate::usecase::second_factor::{VerifySecondFactorInput, VerifySecondFactorUseCase};

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub second_factor_code: Option<String>,
    pub principal_type_hint: Option<PrincipalType>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProfileSelectionResponse {
    requires_profile_selection: bool,
    profiles: Vec<ProfileOption>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TwoFactorResponse {
    requires_two_factor: bool,
    pending_token: String,
    message: String,
}

/// Disambiguation and second-factor requirements are successful responses
/// carrying a discriminant — only failed authentication is an error.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, AuthServiceError> {
    let usecase = LoginUseCase {
        owners: state.owner_repo(),
        employees: state.employee_repo(),
        challenges: state.challenges.clone(),
        mailer: state.mailer.clone(),
        jwt_secret: state.jwt_secret.clone(),
        session_ttl_secs: state.session_ttl_secs,
    };

    let outcome = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
            second_factor_code: body.second_factor_code,
            principal_type_hint: body.principal_type_hint,
        })
        .await?;

    Ok(match outcome {
        LoginOutcome::Disambiguation(profiles) => Json(ProfileSelectionResponse {
            requires_profile_selection: true,
            profiles,
        })
        .into_response(),
        LoginOutcome::ChallengeRequired {
            pending_token,
            message,
        } => Json(TwoFactorResponse {
            requires_two_factor: true,
            pending_token,
            message,
        })
        .into_response(),
        LoginOutcome::Session(bundle) => Json(bundle).into_response(),
    })
}

// ── POST /auth/login/verify ───────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub pending_token: String,
    pub code: String,
}

pub async fn verify_second_factor(
    State(state): State<AppState>,
    Json(body): Json<VerifyRequest>,
) -> Result<Response, AuthServiceError> {
    let usecase = VerifySecondFactorUseCase {
        owners: state.owner_repo(),
        challenges: state.challenges.clone(),
        jwt_secret: state.jwt_secret.clone(),
        session_ttl_secs: state.session_ttl_secs,
    };

    let bundle = usecase
        .execute(VerifySecondFactorInput {
            pending_token: body.pending_token,
            code: body.code,
        })
        .await?;

    Ok(Json(bundle).into_response())
}
