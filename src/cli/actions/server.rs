use crate::api::{
    self,
    email::{ApiEmailSender, EmailSender, LogEmailSender},
    handlers::{orders::OrderPolicy, otp::OtpConfig},
};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub otp_namespace: String,
    pub otp_ttl_seconds: i64,
    pub order_cooldown_seconds: i64,
    pub frontend_base_url: String,
    pub email_api_url: String,
    pub email_api_key: Option<String>,
    pub email_sender: String,
    pub email_sender_name: Option<String>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let otp_config = OtpConfig::new(args.otp_namespace, args.frontend_base_url)
        .with_code_ttl_seconds(args.otp_ttl_seconds);

    let order_policy = OrderPolicy::new(args.order_cooldown_seconds);

    // Without an API key there is nothing to authenticate against, so fall back
    // to the logging sender (local dev).
    let mailer: Arc<dyn EmailSender> = match args.email_api_key {
        Some(api_key) => Arc::new(ApiEmailSender::new(
            args.email_api_url,
            SecretString::from(api_key),
            args.email_sender,
            args.email_sender_name,
        )?),
        None => {
            info!("No email API key configured, logging emails instead of sending");
            Arc::new(LogEmailSender)
        }
    };

    api::new(args.port, args.dsn, otp_config, order_policy, mailer).await
}
