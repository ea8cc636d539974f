//! Command-line argument dispatch and server initialization.
//!
//! This module parses validated CLI arguments and maps them to the appropriate
//! action, such as starting the API server with its full configuration state.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{email, otp};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;

    let otp_opts = otp::Options::parse(matches)?;
    let email_opts = email::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        otp_namespace: otp_opts.namespace,
        otp_ttl_seconds: otp_opts.ttl_seconds,
        order_cooldown_seconds: otp_opts.order_cooldown_seconds,
        frontend_base_url: otp_opts.frontend_base_url,
        email_api_url: email_opts.api_url,
        email_api_key: email_opts.api_key,
        email_sender: email_opts.sender_email,
        email_sender_name: email_opts.sender_name,
    }))
}
