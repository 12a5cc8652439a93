//! Shopify Storefront API client for cart operations.
//!
//! # Architecture
//!
//! - Raw GraphQL documents with typed `serde` response structs
//! - Shopify is source of truth - the gateway holds no cart state
//! - Private access token for server-side operations only
//!
//! # Example
//!
//! ```rust,ignore
//! use tidewater_gateway::shopify::StorefrontClient;
//!
//! let client = StorefrontClient::new(&config.shopify);
//!
//! // Create a cart with one unit of a variant
//! let cart = client.cart_create("gid://shopify/ProductVariant/1").await?;
//!
//! // Add another unit to it
//! let cart = client.cart_lines_add(&cart.id, "gid://shopify/ProductVariant/2").await?;
//! ```

mod classify;
mod client;
mod convert;

pub use classify::{FailureClass, classify};
pub use client::StorefrontClient;

use thiserror::Error;

/// Errors that can occur when interacting with the Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_messages(.0))]
    GraphQL(Vec<String>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Mutation was rejected with user errors (e.g. invalid input,
    /// unknown merchandise, stale cart identifier).
    #[error("User errors: {}", format_user_errors(.0))]
    UserErrors(Vec<UserError>),

    /// The response parsed but the expected field was absent.
    #[error("Missing data in response: {0}")]
    MissingData(&'static str),
}

/// A `userErrors` entry returned by a cart mutation.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct UserError {
    /// Human-readable error message.
    pub message: String,
}

fn format_messages(messages: &[String]) -> String {
    if messages.is_empty() {
        return "(no error details provided)".to_string();
    }
    messages.join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}
