//! External identity linking: merge a provider identity into an existing or
//! freshly created owner account, then issue a session.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::domain::repository::OwnerRepository;
use crate::domain::types::{NewOwnerIdentity, NewTenant};
use crate::error::AuthServiceError;
use crate::usecase::login::{SessionBundle, owner_session_bundle};

type HmacSha256 = Hmac<Sha256>;

/// Versioned, signed state blob carried through the provider round-trip.
/// Non-browser clients put their redirect target here; the HMAC tag prevents
/// open-redirect via a forged `redirect_uri`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkingState {
    pub v: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

pub const LINKING_STATE_VERSION: u8 = 1;

fn mac_tag(payload: &str, secret: &str) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Encode as `base64url(json).base64url(hmac-sha256)`.
pub fn encode_linking_state(state: &LinkingState, secret: &str) -> String {
    let json = serde_json::to_vec(state).expect("linking state serializes");
    let payload = URL_SAFE_NO_PAD.encode(json);
    let tag = URL_SAFE_NO_PAD.encode(mac_tag(&payload, secret));
    format!("{payload}.{tag}")
}

/// Decode and verify. Any failure — missing tag, bad signature, unknown
/// version, malformed JSON — yields `None`; callers fall back to the
/// configured web app URL rather than trusting the blob.
pub fn decode_linking_state(raw: &str, secret: &str) -> Option<LinkingState> {
    let (payload, tag) = raw.split_once('.')?;
    let supplied = URL_SAFE_NO_PAD.decode(tag).ok()?;
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    mac.verify_slice(&supplied).ok()?;
    let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let state: LinkingState = serde_json::from_slice(&json).ok()?;
    (state.v == LINKING_STATE_VERSION).then_some(state)
}

fn append_token(url: &str, token: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}token={token}")
}

/// Subdomain-safe handle from an email local-part: lowercase alphanumerics
/// and hyphens, dots folded to hyphens.
fn derive_handle(email: &str) -> String {
    let local = email.split_once('@').map(|(l, _)| l).unwrap_or(email);
    let handle: String = local
        .to_lowercase()
        .chars()
        .map(|c| if c == '.' || c == '_' { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    let handle = handle.trim_matches('-').to_owned();
    if handle.is_empty() {
        "business".to_owned()
    } else {
        handle
    }
}

pub struct LinkInput {
    pub provider_subject_id: String,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub linking_state: Option<String>,
}

pub struct LinkOutput {
    pub session: SessionBundle,
    /// Out-of-band redirect target with the session token appended.
    pub redirect_url: String,
}

pub struct LinkExternalIdentityUseCase<O>
where
    O: OwnerRepository,
{
    pub owners: O,
    pub jwt_secret: String,
    pub session_ttl_secs: u64,
    pub web_app_url: String,
}

impl<O> LinkExternalIdentityUseCase<O>
where
    O: OwnerRepository,
{
    pub async fn execute(&self, input: LinkInput) -> Result<LinkOutput, AuthServiceError> {
        // Subject id is the stable key once linked; email covers accounts
        // created before their first provider login.
        let existing = match self
            .owners
            .find_by_provider_subject(&input.provider_subject_id)
            .await?
        {
            Some(owner) => Some(owner),
            None => self.owners.find_by_email(&input.email).await?,
        };

        let owner = match existing {
            Some(mut owner) => {
                if owner.provider_subject.is_none() {
                    self.owners
                        .link_provider_subject(owner.id, &input.provider_subject_id)
                        .await?;
                    owner.provider_subject = Some(input.provider_subject_id.clone());
                }
                owner
            }
            None => {
                // Email is pre-verified by the provider. The repository
                // resolves concurrent duplicate callbacks via its unique
                // constraints (insert, on conflict re-fetch).
                let new_owner = NewOwnerIdentity {
                    id: Uuid::new_v4(),
                    email: input.email.clone(),
                    provider_subject: input.provider_subject_id.clone(),
                    first_name: input.given_name.clone(),
                    last_name: input.family_name.clone(),
                };
                let tenant = NewTenant {
                    id: Uuid::new_v4(),
                    name: format!("{} {}", input.given_name, input.family_name),
                    handle: derive_handle(&input.email),
                };
                self.owners.create_with_tenant(&new_owner, &tenant).await?
            }
        };

        let session = owner_session_bundle(&owner, &self.jwt_secret, self.session_ttl_secs)?;

        let target = input
            .linking_state
            .as_deref()
            .and_then(|raw| decode_linking_state(raw, &self.jwt_secret))
            .and_then(|state| state.redirect_uri)
            .unwrap_or_else(|| self.web_app_url.clone());
        let redirect_url = append_token(&target, &session.session_token);

        Ok(LinkOutput {
            session,
            redirect_url,
        })
    }
}
