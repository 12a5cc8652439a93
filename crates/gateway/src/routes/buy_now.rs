//! Buy-now route handler.
//!
//! Express checkout for a single item: creates a throwaway one-line cart
//! and hands back its checkout URL. The tracked cart is untouched.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{GatewayError, Result};
use crate::state::AppState;

/// Request body for `POST /api/buy-now`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyNowRequest {
    /// Product variant to buy.
    pub variant_id: Option<String>,
}

/// Response body for `POST /api/buy-now`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyNowResponse {
    /// Checkout URL of the freshly created cart.
    pub checkout_url: String,
}

/// `POST /api/buy-now` - create a single-item cart and return its
/// checkout URL.
#[instrument(skip(state, request))]
pub async fn buy_now(
    State(state): State<AppState>,
    Json(request): Json<BuyNowRequest>,
) -> Result<Json<BuyNowResponse>> {
    let variant_id = request
        .variant_id
        .ok_or_else(|| GatewayError::BadRequest("Missing variantId".to_string()))?;

    let cart = state.storefront().cart_create(&variant_id).await?;

    Ok(Json(BuyNowResponse {
        checkout_url: cart.checkout_url,
    }))
}
