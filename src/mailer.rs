// src/mailer.rs

use crate::config::EmailConfig;
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

const BREVO_ENDPOINT: &str = "https://api.brevo.com/v3/smtp/email";

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Mailer not configured: {0}")]
    NotConfigured(&'static str),
}

pub struct BrevoMailer {
    api_key: String,
    sender_email: String,
    sender_name: String,
    client: Client,
}

#[derive(Serialize)]
struct BrevoSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct BrevoRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoPayload<'a> {
    sender: BrevoSender<'a>,
    to: Vec<BrevoRecipient<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

impl BrevoMailer {
    pub fn new(api_key: String, sender_email: String, sender_name: String) -> Result<Self, MailerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;
        Ok(Self {
            api_key,
            sender_email,
            sender_name,
            client,
        })
    }

    pub fn from_config(config: &EmailConfig) -> Result<Self, MailerError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(MailerError::NotConfigured("missing API key"))?;
        if config.sender_email.is_empty() {
            return Err(MailerError::NotConfigured("missing sender email"));
        }
        let sender_name = if config.sender_name.is_empty() {
            "Property Research".to_string()
        } else {
            config.sender_name.clone()
        };
        Self::new(api_key, config.sender_email.clone(), sender_name)
    }

    /// Sends one HTML message addressed to every recipient.
    pub fn send_report(&self, recipients: &[String], subject: &str, html: &str) -> Result<(), MailerError> {
        if recipients.is_empty() {
            return Err(MailerError::NotConfigured("no recipients"));
        }

        let payload = build_payload(&self.sender_name, &self.sender_email, recipients, subject, html);

        let resp = self
            .client
            .post(BREVO_ENDPOINT)
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| MailerError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_body = resp.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MailerError::ApiError(format!("{status}: {error_body}")));
        }

        tracing::info!(recipients = recipients.len(), "Email sent successfully");
        Ok(())
    }
}

fn build_payload<'a>(
    sender_name: &'a str,
    sender_email: &'a str,
    recipients: &'a [String],
    subject: &'a str,
    html: &'a str,
) -> BrevoPayload<'a> {
    BrevoPayload {
        sender: BrevoSender {
            name: sender_name,
            email: sender_email,
        },
        to: recipients
            .iter()
            .map(|email| BrevoRecipient { email })
            .collect(),
        subject,
        html_content: html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_matches_brevo_shape() {
        let recipients = vec!["a@example.com".to_string(), "b@example.com".to_string()];
        let payload = build_payload("Scout", "scout@example.com", &recipients, "Report", "<p>hi</p>");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["sender"]["email"], "scout@example.com");
        assert_eq!(json["to"][1]["email"], "b@example.com");
        assert_eq!(json["htmlContent"], "<p>hi</p>");
        assert_eq!(json["subject"], "Report");
    }

    #[test]
    fn unconfigured_mailer_is_rejected() {
        let config = EmailConfig {
            api_key: None,
            sender_email: "scout@example.com".into(),
            sender_name: String::new(),
            recipients: vec!["a@example.com".into()],
        };
        assert!(matches!(
            BrevoMailer::from_config(&config),
            Err(MailerError::NotConfigured(_))
        ));
    }
}
