use clap::{Arg, ArgMatches, Command};

pub const ARG_OTP_NAMESPACE: &str = "otp-namespace";
pub const ARG_OTP_TTL_SECONDS: &str = "otp-ttl-seconds";
pub const ARG_ORDER_COOLDOWN_SECONDS: &str = "order-cooldown-seconds";
pub const ARG_FRONTEND_BASE_URL: &str = "frontend-base-url";

#[derive(Debug, Clone)]
pub struct Options {
    pub namespace: String,
    pub ttl_seconds: i64,
    pub order_cooldown_seconds: i64,
    pub frontend_base_url: String,
}

impl Options {
    /// Parse OTP/order arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let get_string = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        Ok(Self {
            namespace: get_string(ARG_OTP_NAMESPACE)?,
            ttl_seconds: matches
                .get_one::<i64>(ARG_OTP_TTL_SECONDS)
                .copied()
                .unwrap_or(600),
            order_cooldown_seconds: matches
                .get_one::<i64>(ARG_ORDER_COOLDOWN_SECONDS)
                .copied()
                .unwrap_or(300),
            frontend_base_url: get_string(ARG_FRONTEND_BASE_URL)?,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_OTP_NAMESPACE)
                .long(ARG_OTP_NAMESPACE)
                .help("Namespace tag prefixed to the email in verification identifiers")
                .env("ADOPSIAK_OTP_NAMESPACE")
                .default_value("adopsiak"),
        )
        .arg(
            Arg::new(ARG_OTP_TTL_SECONDS)
                .long(ARG_OTP_TTL_SECONDS)
                .help("Verification code TTL in seconds")
                .long_help(
                    "Verification code TTL in seconds. The same value drives both code expiry and the \"valid for N minutes\" copy in the notification email.",
                )
                .env("ADOPSIAK_OTP_TTL_SECONDS")
                .default_value("600")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_ORDER_COOLDOWN_SECONDS)
                .long(ARG_ORDER_COOLDOWN_SECONDS)
                .help("Cooldown between order submissions from the same email")
                .env("ADOPSIAK_ORDER_COOLDOWN_SECONDS")
                .default_value("300")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_FRONTEND_BASE_URL)
                .long(ARG_FRONTEND_BASE_URL)
                .help("Frontend base URL allowed by CORS")
                .env("ADOPSIAK_FRONTEND_BASE_URL")
                .default_value("https://adopsiak.pl"),
        )
}
