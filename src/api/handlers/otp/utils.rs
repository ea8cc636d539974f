//! Helpers for email normalization, code generation, and hashing.

use anyhow::{Context, Result};
use rand::{RngCore, rngs::OsRng};
use regex::Regex;
use sha2::{Digest, Sha256};

/// Codes are 6 decimal digits, zero-padded.
pub(super) const CODE_RANGE: u32 = 1_000_000;

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// Submitted codes must be 4-10 ASCII digits; issued codes are always 6.
pub(super) fn valid_code_shape(code: &str) -> bool {
    (4..=10).contains(&code.len()) && code.bytes().all(|byte| byte.is_ascii_digit())
}

/// Lookup key for a verification record: `{namespace}:{normalized email}`.
pub(super) fn identifier(namespace: &str, email_normalized: &str) -> String {
    format!("{namespace}:{email_normalized}")
}

/// Generate a fresh 6-digit verification code, uniform over 000000-999999.
///
/// Rejection sampling keeps the modulo step unbiased.
pub(super) fn generate_code() -> Result<String> {
    // Largest multiple of CODE_RANGE that fits in u32; values above it are redrawn.
    const LIMIT: u32 = u32::MAX - (u32::MAX % CODE_RANGE);

    loop {
        let mut bytes = [0u8; 4];
        OsRng
            .try_fill_bytes(&mut bytes)
            .context("failed to generate verification code")?;
        let value = u32::from_be_bytes(bytes);
        if value < LIMIT {
            return Ok(format!("{:06}", value % CODE_RANGE));
        }
    }
}

/// Hash `email|code` so the raw code is never stored in the database.
pub(super) fn hash_code(email_normalized: &str, code: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(email_normalized.as_bytes());
    hasher.update(b"|");
    hasher.update(code.as_bytes());
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(
            normalize_email("  Zamowienia@Biblioteka.GDA.PL "),
            "zamowienia@biblioteka.gda.pl"
        );
    }

    #[test]
    fn email_shape_accepts_plus_tags_and_subdomains() {
        assert!(valid_email("jan.kowalski@example.com"));
        assert!(valid_email("zamowienia+adopsiak@biblioteka.gda.pl"));
    }

    #[test]
    fn email_shape_rejects_spaces_and_bare_domains() {
        assert!(!valid_email("jan kowalski@example.com"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("jan@"));
        assert!(!valid_email("jan@example"));
        assert!(!valid_email("jan.example.com"));
    }

    #[test]
    fn valid_code_shape_bounds() {
        assert!(valid_code_shape("1234"));
        assert!(valid_code_shape("123456"));
        assert!(valid_code_shape("1234567890"));
        assert!(!valid_code_shape("123"));
        assert!(!valid_code_shape("12345678901"));
        assert!(!valid_code_shape("12a456"));
        assert!(!valid_code_shape(""));
    }

    #[test]
    fn identifier_concatenates_namespace_and_email() {
        assert_eq!(identifier("adopsiak", "a@b.com"), "adopsiak:a@b.com");
    }

    #[test]
    fn generated_codes_are_six_ascii_digits() {
        for _ in 0..1_000 {
            let code = generate_code().expect("code");
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|byte| byte.is_ascii_digit()));
        }
    }

    #[test]
    fn generated_codes_cover_the_range_roughly_uniformly() {
        // Bucket by leading digit; with 20k draws each of the 10 buckets
        // expects ~2000 hits. A loose tolerance keeps the test deterministic
        // enough while still catching a biased generator.
        let mut buckets = [0u32; 10];
        let draws = 20_000;
        for _ in 0..draws {
            let code = generate_code().expect("code");
            let first = usize::from(code.as_bytes()[0] - b'0');
            buckets[first] += 1;
        }
        let expected = draws / 10;
        for (digit, &count) in buckets.iter().enumerate() {
            assert!(
                count > expected / 2 && count < expected * 2,
                "digit {digit} count {count} far from expected {expected}"
            );
        }
    }

    #[test]
    fn generated_codes_vary() {
        let codes: HashSet<String> = (0..100).map(|_| generate_code().expect("code")).collect();
        assert!(codes.len() > 50, "too many duplicate codes: {}", codes.len());
    }

    #[test]
    fn hash_code_is_stable_and_input_sensitive() {
        let first = hash_code("a@b.com", "123456");
        let second = hash_code("a@b.com", "123456");
        let other_code = hash_code("a@b.com", "654321");
        let other_email = hash_code("b@b.com", "123456");
        assert_eq!(first, second);
        assert_ne!(first, other_code);
        assert_ne!(first, other_email);
        assert_eq!(first.len(), 32);
    }
}
