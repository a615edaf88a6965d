//! Outbound Mail Relay
//!
//! Delivers activation mail through an HTTP mail relay (JSON POST).
//! Template rendering happens relay-side; this adapter only forwards the
//! template kind and its variables.

use crate::domain::repository::{EmailSender, MailMessage};
use crate::error::{AuthError, AuthResult};

/// HTTP relay mailer
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

impl EmailSender for HttpMailer {
    async fn send(&self, mail: &MailMessage) -> AuthResult<()> {
        let body = serde_json::json!({
            "to": mail.to.as_str(),
            "displayName": mail.display_name,
            "template": mail.template.to_string(),
            "activationUrl": mail.activation_url,
            "activationCode": mail.code.as_str(),
            "subject": mail.subject,
        });

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthError::EmailDelivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::EmailDelivery(format!(
                "Mail relay returned status: {}",
                response.status()
            )));
        }

        tracing::debug!(to = %mail.to, template = %mail.template, "Mail relayed");

        Ok(())
    }
}
