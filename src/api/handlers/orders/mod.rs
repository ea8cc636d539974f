//! Campaign order intake.
//!
//! Submissions are tied to an email address and throttled with a per-email
//! cooldown: a second order inside the window is rejected with 429.

pub mod create;
pub mod list;
mod storage;
pub mod types;


/// Submission throttling policy for order intake.
#[derive(Clone, Debug)]
pub struct OrderPolicy {
    cooldown_seconds: i64,
}

impl OrderPolicy {
    #[must_use]
    pub fn new(cooldown_seconds: i64) -> Self {
        Self {
            cooldown_seconds: cooldown_seconds.max(0),
        }
    }

    pub(super) fn cooldown_seconds(&self) -> i64 {
        self.cooldown_seconds
    }
}
