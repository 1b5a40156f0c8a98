use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::EmailConfig;

/// One structured send request, as callers hand it to the mail client.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: Option<String>,
}

#[derive(Serialize)]
struct MailSendBody<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

/// Thin client for a SendGrid-compatible mail API.
pub struct SendGridClient {
    client: Client,
    base_url: String,
    api_key: String,
    from_address: String,
}

impl SendGridClient {
    pub fn new(config: &EmailConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .user_agent("Cyclery/1.0")
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build mail HTTP client: {e}"))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            from_address: config.from_address.clone(),
        })
    }

    pub async fn send(&self, message: &EmailMessage) -> Result<()> {
        let mut content = vec![Content {
            content_type: "text/plain",
            value: &message.text,
        }];

        if let Some(html) = &message.html {
            content.push(Content {
                content_type: "text/html",
                value: html,
            });
        }

        let body = MailSendBody {
            personalizations: vec![Personalization {
                to: vec![Address { email: &message.to }],
            }],
            from: Address {
                email: &self.from_address,
            },
            subject: &message.subject,
            content,
        };

        let url = format!("{}/mail/send", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Mail API request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            warn!("Mail API returned {}: {}", status, detail);
            anyhow::bail!("Mail API returned {status}");
        }

        info!(to = %message.to, subject = %message.subject, "Email queued");
        Ok(())
    }
}
