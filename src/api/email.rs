//! Outbound email delivery.
//!
//! Verification codes are dispatched **fire-and-forget**: the handler spawns a
//! detached task and responds immediately, so request latency is never coupled
//! to the mail provider. Delivery failures are logged and never retried here;
//! the user recovers by requesting a fresh code.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to_email: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Email delivery abstraction used by the dispatch task.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error to be logged by the dispatcher.
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Local dev sender that logs the payload instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to_email = %message.to_email,
            subject = %message.subject,
            body = %message.text_body,
            "email send stub"
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEmailAddress {
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiSendEmailBody {
    sender: ApiEmailAddress,
    to: Vec<ApiEmailAddress>,
    subject: String,
    html_content: String,
    text_content: String,
}

/// Sender backed by a transactional email HTTP API (Brevo-style payload).
pub struct ApiEmailSender {
    client: Client,
    endpoint: String,
    api_key: SecretString,
    sender_email: String,
    sender_name: Option<String>,
}

impl ApiEmailSender {
    /// Create a sender for the given endpoint and credentials.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        endpoint: String,
        api_key: SecretString,
        sender_email: String,
        sender_name: Option<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()
            .context("failed to build email HTTP client")?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            sender_email,
            sender_name,
        })
    }
}

#[async_trait]
impl EmailSender for ApiEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let body = ApiSendEmailBody {
            sender: ApiEmailAddress {
                email: self.sender_email.clone(),
                name: self.sender_name.clone(),
            },
            to: vec![ApiEmailAddress {
                email: message.to_email.clone(),
                name: None,
            }],
            subject: message.subject.clone(),
            html_content: message.html_body.clone(),
            text_content: message.text_body.clone(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .context("email API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!("email API returned {status}: {detail}"));
        }

        Ok(())
    }
}

/// Spawn a detached task that delivers the message without blocking the caller.
/// Failures are captured by the logging sink, never propagated.
pub fn dispatch(sender: Arc<dyn EmailSender>, message: EmailMessage) {
    tokio::spawn(async move {
        if let Err(err) = sender.send(&message).await {
            error!(to_email = %message.to_email, "failed to send email: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSender {
        sent: AtomicUsize,
    }

    #[async_trait]
    impl EmailSender for CountingSender {
        async fn send(&self, _message: &EmailMessage) -> Result<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to_email: "user@example.com".to_string(),
            subject: "Your verification code".to_string(),
            html_body: "<p>123456</p>".to_string(),
            text_body: "123456".to_string(),
        }
    }

    #[tokio::test]
    async fn log_sender_accepts_messages() {
        let sender = LogEmailSender;
        assert!(sender.send(&message()).await.is_ok());
    }

    #[tokio::test]
    async fn dispatch_does_not_block_on_delivery() {
        let sender = Arc::new(CountingSender {
            sent: AtomicUsize::new(0),
        });
        dispatch(sender.clone(), message());
        // The task runs in the background; yield until it lands.
        for _ in 0..100 {
            if sender.sent.load(Ordering::SeqCst) == 1 {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("detached email task never ran");
    }

    #[test]
    fn api_payload_uses_camel_case_fields() {
        let body = ApiSendEmailBody {
            sender: ApiEmailAddress {
                email: "no-reply@adopsiak.pl".to_string(),
                name: Some("Adopsiak".to_string()),
            },
            to: vec![ApiEmailAddress {
                email: "user@example.com".to_string(),
                name: None,
            }],
            subject: "subject".to_string(),
            html_content: "<p>hi</p>".to_string(),
            text_content: "hi".to_string(),
        };
        let value = serde_json::to_value(&body).expect("json");
        assert!(value.get("htmlContent").is_some());
        assert!(value.get("textContent").is_some());
        assert!(value["to"][0].get("name").is_none());
    }
}
