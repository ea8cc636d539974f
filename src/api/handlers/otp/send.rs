//! OTP issuance endpoint.

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::api::email::{self, EmailMessage};

use super::OtpState;
use super::storage::replace_verification;
use super::types::{ErrorResponse, SendOtpRequest, SuccessResponse};
use super::utils::{generate_code, hash_code, identifier, normalize_email, valid_email};

/// Issue a fresh verification code for the email and dispatch it.
///
/// Always answers the same way for known and unknown addresses, so the
/// endpoint leaks no account-enumeration signal.
#[utoipa::path(
    post,
    path = "/api/v1/email-otp/send",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "Code issued", body = SuccessResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "email-otp"
)]
pub async fn send(
    pool: Extension<PgPool>,
    state: Extension<Arc<OtpState>>,
    payload: Option<Json<SendOtpRequest>>,
) -> impl IntoResponse {
    let request: SendOtpRequest = match payload {
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

    let code = match generate_code() {
        Ok(code) => code,
        Err(err) => {
            error!("Failed to generate verification code: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Verification code issuance failed")),
            )
                .into_response();
        }
    };

    let config = state.config();
    let identifier = identifier(config.namespace(), &email);
    let value_hash = hash_code(&email, &code);

    if let Err(err) =
        replace_verification(&pool, &identifier, &value_hash, config.code_ttl_seconds()).await
    {
        error!("Failed to store verification record: {err}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Verification code issuance failed")),
        )
            .into_response();
    }

    // Fire-and-forget: the code is valid even if delivery fails.
    email::dispatch(state.mailer(), verification_message(&email, &code, config));

    (StatusCode::OK, Json(SuccessResponse::ok())).into_response()
}

fn verification_message(email: &str, code: &str, config: &super::OtpConfig) -> EmailMessage {
    let minutes = config.code_ttl_minutes();
    EmailMessage {
        to_email: email.to_string(),
        subject: "Your verification code".to_string(),
        html_body: format!(
            "<p>Your verification code is <strong>{code}</strong>.</p>\
             <p>The code is valid for {minutes} minutes and can be used once.</p>"
        ),
        text_body: format!(
            "Your verification code is {code}. The code is valid for {minutes} minutes and can be used once."
        ),
    }
}
