//! HTTP route handlers for the cart gateway.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health       - Health check
//!
//! # Cart
//! POST /api/cart     - Perform one cart mutation (create/add/remove/update)
//! GET  /api/cart     - Fetch a cart snapshot by cartId query parameter
//!
//! # Checkout
//! POST /api/buy-now  - Create a single-item cart and return its checkout URL
//! ```

pub mod buy_now;
pub mod cart;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::show).post(cart::mutate))
        .route("/buy-now", post(buy_now::buy_now))
}
