use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::link::{LinkExternalIdentityUseCase, LinkInput};
use crate::usecase::login::PrincipalPayload;

// ── POST /auth/external/callback ──────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalCallbackRequest {
    pub provider_subject_id: String,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub linking_state: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalCallbackResponse {
    pub session_token: String,
    pub principal: PrincipalPayload,
    /// Out-of-band redirect target; browser clients are sent here.
    pub redirect_url: String,
}

pub async fn external_callback(
    State(state): State<AppState>,
    Json(body): Json<ExternalCallbackRequest>,
) -> Result<Json<ExternalCallbackResponse>, AuthServiceError> {
    let usecase = LinkExternalIdentityUseCase {
        owners: state.owner_repo(),
        jwt_secret: state.jwt_secret.clone(),
        session_ttl_secs: state.session_ttl_secs,
        web_app_url: state.web_app_url.clone(),
    };

    let out = usecase
        .execute(LinkInput {
            provider_subject_id: body.provider_subject_id,
            email: body.email,
            given_name: body.given_name,
            family_name: body.family_name,
            linking_state: body.linking_state,
        })
        .await?;

    Ok(Json(ExternalCallbackResponse {
        session_token: out.session.session_token,
        principal: out.session.principal,
        redirect_url: out.redirect_url,
    }))
}
