//! Email OTP verification flow.
//!
//! A code's lifecycle: issued by [`send::send`] (replacing any predecessor for
//! the same identifier), then either consumed exactly once by
//! [`check::check`], superseded by a newer `send`, or lazily invalidated once
//! `expires_at` passes. Raw codes only exist in the notification email; the
//! database holds the SHA-256 of `email|code`.

pub mod check;
pub mod send;
mod state;
mod storage;
pub mod types;
mod utils;

#[cfg(test)]
mod tests;

pub use state::OtpConfig;
pub(crate) use utils::{normalize_email, valid_email};

use crate::api::email::EmailSender;
use std::sync::Arc;

/// Shared OTP handler state: configuration plus the outbound email seam.
pub struct OtpState {
    config: OtpConfig,
    mailer: Arc<dyn EmailSender>,
}

impl OtpState {
    #[must_use]
    pub fn new(config: OtpConfig, mailer: Arc<dyn EmailSender>) -> Self {
        Self { config, mailer }
    }

    #[must_use]
    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    pub(crate) fn mailer(&self) -> Arc<dyn EmailSender> {
        self.mailer.clone()
    }
}
