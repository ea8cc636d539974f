//! OTP validation endpoint.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::OtpState;
use super::storage::consume_verification;
use super::types::{CheckOtpRequest, ErrorResponse, SuccessResponse};
use super::utils::{hash_code, identifier, normalize_email, valid_code_shape, valid_email};

/// Single generic message for every verification failure: no record, expired,
/// and wrong code must stay indistinguishable to callers.
const INVALID_CODE_MESSAGE: &str = "invalid or expired code";

/// Validate a submitted code and consume it on success (single-use).
#[utoipa::path(
    post,
    path = "/api/v1/email-otp/check",
    request_body = CheckOtpRequest,
    responses(
        (status = 200, description = "Code valid and consumed", body = SuccessResponse),
        (status = 400, description = "Invalid request or invalid/expired code", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "email-otp"
)]
pub async fn check(
    pool: Extension<PgPool>,
    state: Extension<Arc<OtpState>>,
    payload: Option<Json<CheckOtpRequest>>,
) -> impl IntoResponse {
    let request: CheckOtpRequest = match payload {
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
            Json(ErrorResponse::new("Invalid email address")),
        )
            .into_response();
    }

    let code = request.otp.trim();
    if !valid_code_shape(code) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid code format")),
        )
            .into_response();
    }

    let config = state.config();
    let identifier = identifier(config.namespace(), &email);
    let value_hash = hash_code(&email, code);

    // consume_verification merges all failure causes into Ok(false); the
    // response below is the only failure path callers can observe.
    match consume_verification(&pool, &identifier, &value_hash).await {
        Ok(true) => (StatusCode::OK, Json(SuccessResponse::ok())).into_response(),
        Ok(false) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(INVALID_CODE_MESSAGE)),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to check verification code: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Verification failed")),
            )
                .into_response()
        }
    }
}
