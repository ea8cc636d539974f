//! API handlers for the OTP verification and order intake service.

pub mod health;
pub mod orders;
pub mod otp;
pub mod root;

#[cfg(test)]
pub(crate) mod test_db;
