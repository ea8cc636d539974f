//! Order listing endpoint.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use tracing::error;

use super::storage::list_orders;
use super::types::Order;
use crate::api::handlers::otp::types::ErrorResponse;

/// Return every submitted order, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses(
        (status = 200, description = "All orders", body = [Order]),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "orders"
)]
pub async fn list(pool: Extension<PgPool>) -> impl IntoResponse {
    match list_orders(&pool).await {
        Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
        Err(err) => {
            error!("Failed to list orders: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to list orders")),
            )
                .into_response()
        }
    }
}
