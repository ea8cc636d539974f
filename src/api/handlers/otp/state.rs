//! OTP configuration shared across send/check handlers.

const DEFAULT_CODE_TTL_SECONDS: i64 = 10 * 60;

#[derive(Clone, Debug)]
pub struct OtpConfig {
    namespace: String,
    frontend_base_url: String,
    code_ttl_seconds: i64,
}

impl OtpConfig {
    #[must_use]
    pub fn new(namespace: String, frontend_base_url: String) -> Self {
        Self {
            namespace,
            frontend_base_url,
            code_ttl_seconds: DEFAULT_CODE_TTL_SECONDS,
        }
    }

    #[must_use]
    pub fn with_code_ttl_seconds(mut self, seconds: i64) -> Self {
        self.code_ttl_seconds = seconds.max(1);
        self
    }

    pub(crate) fn namespace(&self) -> &str {
        &self.namespace
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    pub(super) fn code_ttl_seconds(&self) -> i64 {
        self.code_ttl_seconds
    }

    /// Minutes advertised in the notification email, derived from the same
    /// TTL that is enforced so the two can never disagree.
    pub(super) fn code_ttl_minutes(&self) -> i64 {
        (self.code_ttl_seconds + 59) / 60
    }
}
