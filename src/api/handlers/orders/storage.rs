//! Database helpers for order intake.

use anyhow::{Context, Result};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{CreateOrderRequest, Order};

/// Last-write lookback for the submission cooldown: true if the most recent
/// order for this email is younger than the window. Not a sliding-window
/// counter; only the latest record matters.
pub(super) async fn cooldown_active(
    pool: &PgPool,
    email: &str,
    cooldown_seconds: i64,
) -> Result<bool> {
    let query = r"
        SELECT 1
        FROM adopsiak_orders
        WHERE email = $1
          AND created_at > NOW() - ($2 * INTERVAL '1 second')
        ORDER BY created_at DESC
        LIMIT 1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .bind(cooldown_seconds)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to check order cooldown")?;
    Ok(row.is_some())
}

pub(super) async fn insert_order(
    pool: &PgPool,
    request: &CreateOrderRequest,
    email: &str,
    total_institutions: i32,
) -> Result<Uuid> {
    let query = r"
        INSERT INTO adopsiak_orders
            (city_or_municipality, shipping_address, delegate_name,
             delegate_phone1, delegate_phone2, libraries_count,
             kindergartens_count, total_institutions, delivery_date,
             protocol_text, protocol_email_recipient, email)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(&request.city_or_municipality)
        .bind(&request.shipping_address)
        .bind(&request.delegate_name)
        .bind(&request.delegate_phone1)
        .bind(&request.delegate_phone2)
        .bind(request.libraries_count)
        .bind(request.kindergartens_count)
        .bind(total_institutions)
        .bind(&request.delivery_date)
        .bind(&request.protocol_text)
        .bind(&request.protocol_email_recipient)
        .bind(email)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert order")?;

    Ok(row.get("id"))
}

pub(super) async fn list_orders(pool: &PgPool) -> Result<Vec<Order>> {
    let query = r"
        SELECT id, city_or_municipality, shipping_address, delegate_name,
               delegate_phone1, delegate_phone2, libraries_count,
               kindergartens_count, total_institutions, delivery_date,
               protocol_text, protocol_email_recipient, email, created_at
        FROM adopsiak_orders
        ORDER BY created_at DESC
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list orders")?;

    Ok(rows
        .into_iter()
        .map(|row| Order {
            id: row.get("id"),
            city_or_municipality: row.get("city_or_municipality"),
            shipping_address: row.get("shipping_address"),
            delegate_name: row.get("delegate_name"),
            delegate_phone1: row.get("delegate_phone1"),
            delegate_phone2: row.get("delegate_phone2"),
            libraries_count: row.get("libraries_count"),
            kindergartens_count: row.get("kindergartens_count"),
            total_institutions: row.get("total_institutions"),
            delivery_date: row.get("delivery_date"),
            protocol_text: row.get("protocol_text"),
            protocol_email_recipient: row.get("protocol_email_recipient"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        })
        .collect())
}
