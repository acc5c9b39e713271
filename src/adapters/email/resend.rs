//! Resend implementation of the Mailer port.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::json;

use crate::config::EmailConfig;
use crate::ports::{MailError, Mailer};

const DEFAULT_API_URL: &str = "https://api.resend.com/emails";

/// Mail sender backed by the Resend HTTP API.
pub struct ResendMailer {
    client: reqwest::Client,
    config: EmailConfig,
    api_url: String,
}

impl ResendMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    /// Overrides the API URL (tests point this at a local server).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), MailError> {
        let api_key = match &self.config.resend_api_key {
            Some(key) if !key.expose_secret().is_empty() => key,
            _ => return Err(MailError::NotConfigured),
        };

        let payload = json!({
            "from": self.config.from_header(),
            "to": [to],
            "subject": subject,
            "text": body,
        });

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailError::Delivery(format!(
                "Resend returned HTTP {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let mailer = ResendMailer::new(EmailConfig::default());
        let err = mailer.send("a@b.test", "s", "b").await.unwrap_err();
        assert!(matches!(err, MailError::NotConfigured));
    }
}
