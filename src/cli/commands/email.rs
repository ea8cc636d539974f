use clap::{Arg, ArgMatches, Command};

pub const ARG_EMAIL_API_URL: &str = "email-api-url";
pub const ARG_EMAIL_API_KEY: &str = "email-api-key";
pub const ARG_EMAIL_SENDER: &str = "email-sender";
pub const ARG_EMAIL_SENDER_NAME: &str = "email-sender-name";

#[derive(Debug, Clone)]
pub struct Options {
    pub api_url: String,
    /// No API key means the logging sender is used (local dev).
    pub api_key: Option<String>,
    pub sender_email: String,
    pub sender_name: Option<String>,
}

impl Options {
    /// Parse email delivery arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        // Filter empty strings which clap might pass through if env vars are set to ""
        let get_non_empty = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
        };

        let api_url = get_non_empty(ARG_EMAIL_API_URL)
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_EMAIL_API_URL}"))?;
        let sender_email = get_non_empty(ARG_EMAIL_SENDER)
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_EMAIL_SENDER}"))?;

        Ok(Self {
            api_url,
            api_key: get_non_empty(ARG_EMAIL_API_KEY),
            sender_email,
            sender_name: get_non_empty(ARG_EMAIL_SENDER_NAME),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_EMAIL_API_URL)
                .long(ARG_EMAIL_API_URL)
                .help("Transactional email API endpoint")
                .env("ADOPSIAK_EMAIL_API_URL")
                .default_value("https://api.brevo.com/v3/smtp/email"),
        )
        .arg(
            Arg::new(ARG_EMAIL_API_KEY)
                .long(ARG_EMAIL_API_KEY)
                .help("Transactional email API key (unset: log emails instead of sending)")
                .env("ADOPSIAK_EMAIL_API_KEY"),
        )
        .arg(
            Arg::new(ARG_EMAIL_SENDER)
                .long(ARG_EMAIL_SENDER)
                .help("Sender address for verification emails")
                .env("ADOPSIAK_EMAIL_SENDER")
                .default_value("no-reply@adopsiak.pl"),
        )
        .arg(
            Arg::new(ARG_EMAIL_SENDER_NAME)
                .long(ARG_EMAIL_SENDER_NAME)
                .help("Sender display name for verification emails")
                .env("ADOPSIAK_EMAIL_SENDER_NAME"),
        )
}
