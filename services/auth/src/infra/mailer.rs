//! Outbound email via the HTTP mail relay.

use serde::Serialize;

use crate::domain::repository::Mailer;
use crate::error::AuthServiceError;

#[derive(Serialize)]
struct SendRequest<'a> {
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Delivers messages through `POST {base_url}/send`.
#[derive(Clone)]
pub struct HttpMailer {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl HttpMailer {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), AuthServiceError> {
        let url = format!("{}/send", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&SendRequest { to, subject, body })
            .send()
            .await
            .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("mail relay request: {e}")))?;
        if !response.status().is_success() {
            return Err(AuthServiceError::Internal(anyhow::anyhow!(
                "mail relay returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
