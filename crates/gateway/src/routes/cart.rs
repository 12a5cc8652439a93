//! Cart route handlers.
//!
//! One mutation endpoint and one read endpoint. The gateway holds no cart
//! state of its own: every request names the cart it operates on, so
//! responses always carry the fresh authoritative snapshot Shopify
//! returned for that exact mutation.

use axum::{Json, extract::Query, extract::State};
use serde::Deserialize;
use tidewater_core::CartId;
use tidewater_core::wire::{CartActionRequest, CartPayload, ValidatedAction};
use tracing::instrument;

use crate::error::{GatewayError, Result};
use crate::state::AppState;

/// Query parameters for `GET /api/cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuery {
    /// Cart identifier to fetch.
    pub cart_id: Option<CartId>,
}

/// `POST /api/cart` - perform one cart mutation.
///
/// Validates the action's field matrix, issues the matching Storefront
/// API mutation, and returns the resulting cart. Failures come back as a
/// keyed error body; a stale cart identifier maps to `invalid_cart`.
#[instrument(skip(state, request), fields(action = ?request.action))]
pub async fn mutate(
    State(state): State<AppState>,
    Json(request): Json<CartActionRequest>,
) -> Result<Json<CartPayload>> {
    let action = request
        .validate()
        .map_err(|e| GatewayError::BadRequest(e.to_string()))?;

    let client = state.storefront();
    let cart = match &action {
        ValidatedAction::Create { variant_id } => client.cart_create(variant_id).await?,
        ValidatedAction::Add {
            cart_id,
            variant_id,
        } => client.cart_lines_add(cart_id, variant_id).await?,
        ValidatedAction::Remove { cart_id, line_id } => {
            client.cart_lines_remove(cart_id, line_id).await?
        }
        ValidatedAction::Update {
            cart_id,
            line_id,
            quantity,
        } => client.cart_lines_update(cart_id, line_id, *quantity).await?,
    };

    Ok(Json(CartPayload { cart: Some(cart) }))
}

/// `GET /api/cart?cartId=...` - fetch a cart snapshot.
///
/// An identifier that no longer resolves yields `{"cart": null}` with
/// status 200, never an error: clients use that to discard stale
/// identifiers on startup.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<CartQuery>,
) -> Result<Json<CartPayload>> {
    let cart_id = query
        .cart_id
        .ok_or_else(|| GatewayError::BadRequest("Missing cartId".to_string()))?;

    let cart = state.storefront().cart(&cart_id).await?;
    Ok(Json(CartPayload { cart }))
}
