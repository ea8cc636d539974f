//! OTP flow tests against a live database.

use super::check::check;
use super::storage::{consume_verification, replace_verification};
use super::types::CheckOtpRequest;
use super::utils::{hash_code, identifier, normalize_email};
use super::{OtpConfig, OtpState};
use crate::api::email::LogEmailSender;
use crate::api::handlers::test_db::TestDb;
use anyhow::{Context, Result};
use axum::Json;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

fn otp_state() -> Arc<OtpState> {
    let config = OtpConfig::new("adopsiak".to_string(), "https://adopsiak.pl".to_string());
    Arc::new(OtpState::new(config, Arc::new(LogEmailSender)))
}

#[test]
fn otp_state_exposes_config() {
    assert_eq!(otp_state().config().namespace(), "adopsiak");
}

async fn expire_record(pool: &sqlx::PgPool, record_identifier: &str) -> Result<()> {
    sqlx::query(
        "UPDATE email_verifications SET expires_at = NOW() - INTERVAL '1 second' WHERE identifier = $1",
    )
    .bind(record_identifier)
    .execute(pool)
    .await
    .context("failed to expire verification record")?;
    Ok(())
}

#[tokio::test]
async fn code_is_consumed_exactly_once() -> Result<()> {
    let Ok(db) = TestDb::new("adopsiak-otp").await else {
        return Ok(());
    };

    let email = normalize_email("alice@example.com");
    let record_identifier = identifier("adopsiak", &email);
    let value_hash = hash_code(&email, "123456");

    replace_verification(&db.pool, &record_identifier, &value_hash, 600).await?;

    let first = consume_verification(&db.pool, &record_identifier, &value_hash).await?;
    assert!(first);

    let second = consume_verification(&db.pool, &record_identifier, &value_hash).await?;
    assert!(!second);

    Ok(())
}

#[tokio::test]
async fn reissue_invalidates_previous_code() -> Result<()> {
    let Ok(db) = TestDb::new("adopsiak-otp").await else {
        return Ok(());
    };

    let email = normalize_email("bob@example.com");
    let record_identifier = identifier("adopsiak", &email);
    let old_hash = hash_code(&email, "111111");
    let new_hash = hash_code(&email, "222222");

    replace_verification(&db.pool, &record_identifier, &old_hash, 600).await?;
    replace_verification(&db.pool, &record_identifier, &new_hash, 600).await?;

    assert!(!consume_verification(&db.pool, &record_identifier, &old_hash).await?);
    assert!(consume_verification(&db.pool, &record_identifier, &new_hash).await?);

    Ok(())
}

#[tokio::test]
async fn expired_code_rejected_even_with_matching_value() -> Result<()> {
    let Ok(db) = TestDb::new("adopsiak-otp").await else {
        return Ok(());
    };

    let email = normalize_email("carol@example.com");
    let record_identifier = identifier("adopsiak", &email);
    let value_hash = hash_code(&email, "123456");

    replace_verification(&db.pool, &record_identifier, &value_hash, 600).await?;
    expire_record(&db.pool, &record_identifier).await?;

    assert!(!consume_verification(&db.pool, &record_identifier, &value_hash).await?);

    Ok(())
}

#[tokio::test]
async fn wrong_code_does_not_consume_the_record() -> Result<()> {
    let Ok(db) = TestDb::new("adopsiak-otp").await else {
        return Ok(());
    };

    let email = normalize_email("dora@example.com");
    let record_identifier = identifier("adopsiak", &email);
    let value_hash = hash_code(&email, "123456");
    let wrong_hash = hash_code(&email, "654321");

    replace_verification(&db.pool, &record_identifier, &value_hash, 600).await?;

    assert!(!consume_verification(&db.pool, &record_identifier, &wrong_hash).await?);
    // The record survives the failed attempt and the right code still works.
    assert!(consume_verification(&db.pool, &record_identifier, &value_hash).await?);

    Ok(())
}

#[tokio::test]
async fn check_handler_accepts_then_rejects_same_code() -> Result<()> {
    let Ok(db) = TestDb::new("adopsiak-otp").await else {
        return Ok(());
    };

    let state = otp_state();
    let email = normalize_email("eve@example.com");
    let record_identifier = identifier(state.config().namespace(), &email);
    let value_hash = hash_code(&email, "123456");

    replace_verification(&db.pool, &record_identifier, &value_hash, 600).await?;

    let request = || {
        Some(Json(CheckOtpRequest {
            email: "eve@example.com".to_string(),
            otp: "123456".to_string(),
        }))
    };

    let first = check(Extension(db.pool.clone()), Extension(state.clone()), request())
        .await
        .into_response();
    assert_eq!(first.status(), StatusCode::OK);

    let second = check(Extension(db.pool.clone()), Extension(state), request())
        .await
        .into_response();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
