//! Maps Storefront API failures onto the gateway's response vocabulary.
//!
//! Clients need to distinguish exactly one failure from all others: the
//! tracked cart identifier no longer resolving to a usable cart. That
//! case comes back from Shopify as `userErrors` text rather than a
//! dedicated code, so the mapping is a phrase table.

use super::{ShopifyError, UserError};

/// `userErrors` message fragments that mean the cart identifier itself is
/// no longer usable (expired, completed, or malformed). Matched
/// case-insensitively as substrings.
const INVALID_CART_PHRASES: &[&str] = &["cart is locked", "invalid id"];

/// What a failed cart operation means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The cart identifier is stale; the caller should discard it and
    /// create a fresh cart.
    InvalidCart,
    /// Shopify rejected the requested change (bad merchandise, quantity
    /// rules) but the cart itself is fine.
    Validation,
    /// Transport, parse, or any other unclassified failure.
    Unknown,
}

/// Classify a Storefront API error.
#[must_use]
pub fn classify(error: &ShopifyError) -> FailureClass {
    match error {
        ShopifyError::UserErrors(errors) => classify_user_errors(errors),
        ShopifyError::Http(_)
        | ShopifyError::GraphQL(_)
        | ShopifyError::Parse(_)
        | ShopifyError::MissingData(_) => FailureClass::Unknown,
    }
}

fn classify_user_errors(errors: &[UserError]) -> FailureClass {
    let stale = errors.iter().any(|e| {
        let message = e.message.to_lowercase();
        INVALID_CART_PHRASES
            .iter()
            .any(|phrase| message.contains(phrase))
    });

    if stale {
        FailureClass::InvalidCart
    } else {
        FailureClass::Validation
    }
}
