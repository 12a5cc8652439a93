//! Unified error handling for the gateway.
//!
//! All route handlers return `Result<T, GatewayError>`. The response body
//! for failures is always a [`CartErrorBody`], keyed so clients can
//! distinguish a stale cart identifier from everything else without
//! inspecting status codes.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tidewater_core::wire::CartErrorBody;

use crate::shopify::{FailureClass, ShopifyError, UserError, classify};

/// Application-level error type for the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed request from the client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(CartErrorBody {
                    error: message,
                    details: None,
                }),
            )
                .into_response(),
            Self::Shopify(err) => {
                let (status, body) = match classify(&err) {
                    FailureClass::InvalidCart => {
                        tracing::warn!(error = %err, "cart identifier rejected by Shopify");
                        (StatusCode::CONFLICT, CartErrorBody::invalid_cart())
                    }
                    FailureClass::Validation => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        CartErrorBody::shopify(user_error_messages(&err)),
                    ),
                    FailureClass::Unknown => {
                        tracing::error!(error = %err, "Shopify request failed");
                        (
                            StatusCode::BAD_GATEWAY,
                            CartErrorBody {
                                error: "Upstream error".to_string(),
                                details: None,
                            },
                        )
                    }
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

/// Result type alias for `GatewayError`.
pub type Result<T> = std::result::Result<T, GatewayError>;

fn user_error_messages(err: &ShopifyError) -> Vec<String> {
    match err {
        ShopifyError::UserErrors(errors) => {
            errors.iter().map(|UserError { message }| message.clone()).collect()
        }
        _ => vec![err.to_string()],
    }
}
