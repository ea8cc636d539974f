//! # Adopsiak (Email OTP Verification & Order Intake)
//!
//! `adopsiak` backs the campaign order form: it proves control of an email
//! address with short-lived one-time passcodes (OTP) and accepts order
//! submissions tied to a verified address.
//!
//! ## OTP model
//!
//! - **Identifier:** every code is stored under `{namespace}:{email}` where the
//!   email is trimmed and lowercased. At most one active code exists per
//!   identifier; issuing a new code replaces the previous one.
//! - **Hashed at rest:** only the SHA-256 of `email|code` is persisted. The
//!   plaintext code exists solely in the outbound notification email.
//! - **Single-use:** a successful check deletes the row in the same statement
//!   that validates it. Expired codes are rejected lazily at check time; no
//!   background sweeper is needed.
//! - **Uniform failure:** "no such code", "expired", and "wrong code" are
//!   indistinguishable to callers. All three collapse into one generic error.
//!
//! ## Orders
//!
//! Order submissions are rate limited with a last-write lookback: a second
//! order from the same email inside the cooldown window is rejected with
//! `429 Too Many Requests`.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
