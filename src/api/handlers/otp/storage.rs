//! Database helpers for verification records.

use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::Instrument;

/// Replace any active verification record for the identifier with a fresh one.
///
/// The delete and insert are deliberately separate statements: the design
/// tolerates a narrow race on reissue, and the last writer wins.
pub(super) async fn replace_verification(
    pool: &PgPool,
    identifier: &str,
    value_hash: &[u8],
    ttl_seconds: i64,
) -> Result<()> {
    let query = "DELETE FROM email_verifications WHERE identifier = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    sqlx::query(query)
        .bind(identifier)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to delete previous verification record")?;

    let query = r"
        INSERT INTO email_verifications (identifier, value, expires_at)
        VALUES ($1, $2, NOW() + ($3 * INTERVAL '1 second'))
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    sqlx::query(query)
        .bind(identifier)
        .bind(value_hash)
        .bind(ttl_seconds)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to insert verification record")?;

    Ok(())
}

/// Validate and consume a verification record in one statement.
///
/// "No such record", "expired", and "wrong code" all fall through to
/// `Ok(false)` here so the handler has a single failure path and callers can
/// not distinguish the causes.
pub(super) async fn consume_verification(
    pool: &PgPool,
    identifier: &str,
    value_hash: &[u8],
) -> Result<bool> {
    let query = r"
        DELETE FROM email_verifications
        WHERE identifier = $1
          AND value = $2
          AND expires_at > NOW()
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(identifier)
        .bind(value_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to consume verification record")?;

    Ok(row.is_some())
}
