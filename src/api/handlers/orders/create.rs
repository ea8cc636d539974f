//! Order submission endpoint with cooldown rate limiting.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use regex::Regex;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::api::handlers::otp::{normalize_email, valid_email};

use super::OrderPolicy;
use super::storage::{cooldown_active, insert_order};
use super::types::{CreateOrderRequest, CreateOrderResponse};
use crate::api::handlers::otp::types::ErrorResponse;

const TOO_MANY_REQUESTS_MESSAGE: &str = "too many requests";

/// E.164-style phone format used by the order form, e.g. +48600700800.
fn valid_phone(phone: &str) -> bool {
    Regex::new(r"^\+[1-9]\d{1,14}$").is_ok_and(|regex| regex.is_match(phone))
}

/// Field-level validation mirroring the order form contract.
/// Returns the first violation; the caller surfaces it as a 400.
fn validate(request: &CreateOrderRequest) -> Result<(), &'static str> {
    if request.city_or_municipality.trim().is_empty() {
        return Err("City/Municipality is required");
    }
    if request.shipping_address.trim().is_empty() {
        return Err("Shipping address is required");
    }
    if request.delegate_name.trim().is_empty() {
        return Err("Delegate name is required");
    }
    if !valid_phone(&request.delegate_phone1) {
        return Err("Invalid phone format (e.g., +48600700800)");
    }
    if let Some(phone2) = &request.delegate_phone2 {
        if !phone2.is_empty() && !valid_phone(phone2) {
            return Err("Invalid phone format");
        }
    }
    if request.libraries_count < 0
        || request.kindergartens_count < 0
        || request.total_institutions < 0
    {
        return Err("Counts must not be negative");
    }
    if let Some(recipient) = &request.protocol_email_recipient {
        if !recipient.is_empty() && !valid_email(&normalize_email(recipient)) {
            return Err("Invalid email");
        }
    }
    Ok(())
}

/// Total falls back to the sum of the per-kind counts when not provided.
fn effective_total(request: &CreateOrderRequest) -> i32 {
    if request.total_institutions > 0 {
        request.total_institutions
    } else {
        request.libraries_count + request.kindergartens_count
    }
}

/// Accept an order submission, enforcing the per-email cooldown.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order accepted", body = CreateOrderResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 429, description = "Cooldown active for this email", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn create(
    pool: Extension<PgPool>,
    policy: Extension<Arc<OrderPolicy>>,
    payload: Option<Json<CreateOrderRequest>>,
) -> impl IntoResponse {
    let request: CreateOrderRequest = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Missing payload")),
            )
                .into_response();
        }
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Email is required")),
        )
            .into_response();
    }

    if let Err(message) = validate(&request) {
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response();
    }

    match cooldown_active(&pool, &email, policy.cooldown_seconds()).await {
        Ok(true) => {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse::new(TOO_MANY_REQUESTS_MESSAGE)),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(err) => {
            error!("Failed to check order cooldown: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Order submission failed")),
            )
                .into_response();
        }
    }

    let total = effective_total(&request);
    match insert_order(&pool, &request, &email, total).await {
        Ok(id) => (
            StatusCode::CREATED,
            Json(CreateOrderResponse { success: true, id }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to insert order: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Order submission failed")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::OrderPolicy;
    use super::{CreateOrderRequest, create, effective_total, valid_phone, validate};
    use anyhow::Result;
    use axum::Json;
    use axum::extract::Extension;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;

    fn request() -> CreateOrderRequest {
        CreateOrderRequest {
            city_or_municipality: "Gdansk".to_string(),
            shipping_address: "ul. Dluga 1".to_string(),
            delegate_name: "Jan Kowalski".to_string(),
            delegate_phone1: "+48600700800".to_string(),
            delegate_phone2: None,
            libraries_count: 2,
            kindergartens_count: 3,
            total_institutions: 0,
            delivery_date: None,
            protocol_text: None,
            protocol_email_recipient: None,
            email: "jan@example.com".to_string(),
        }
    }

    #[test]
    fn phone_format_follows_e164() {
        assert!(valid_phone("+48600700800"));
        assert!(valid_phone("+12025550123"));
        assert!(!valid_phone("48600700800"));
        assert!(!valid_phone("+0600700800"));
        assert!(!valid_phone("+48 600 700 800"));
    }

    #[test]
    fn validate_accepts_complete_request() {
        assert_eq!(validate(&request()), Ok(()));
    }

    #[test]
    fn validate_rejects_missing_fields() {
        let mut bad = request();
        bad.city_or_municipality = "  ".to_string();
        assert!(validate(&bad).is_err());

        let mut bad = request();
        bad.delegate_phone1 = "not-a-phone".to_string();
        assert!(validate(&bad).is_err());

        let mut bad = request();
        bad.libraries_count = -1;
        assert!(validate(&bad).is_err());

        let mut bad = request();
        bad.protocol_email_recipient = Some("not-an-email".to_string());
        assert!(validate(&bad).is_err());
    }

    #[test]
    fn validate_allows_empty_optional_strings() {
        let mut ok = request();
        ok.delegate_phone2 = Some(String::new());
        ok.protocol_email_recipient = Some(String::new());
        assert_eq!(validate(&ok), Ok(()));
    }

    #[test]
    fn total_defaults_to_sum_of_counts() {
        let mut order = request();
        assert_eq!(effective_total(&order), 5);
        order.total_institutions = 7;
        assert_eq!(effective_total(&order), 7);
    }

    #[tokio::test]
    async fn create_missing_payload() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let response = create(
            Extension(pool),
            Extension(Arc::new(OrderPolicy::new(300))),
            None,
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn create_invalid_email() -> Result<()> {
        let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
        let mut bad = request();
        bad.email = "nope".to_string();
        let response = create(
            Extension(pool),
            Extension(Arc::new(OrderPolicy::new(300))),
            Some(Json(bad)),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        Ok(())
    }
}
