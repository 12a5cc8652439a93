//! Wire contract between the sync engine and the cart gateway.
//!
//! This is the only wire-level boundary worth fixing precisely: both sides
//! serialize through these types, so the request a client builds is by
//! construction the request the gateway validates.
//!
//! ```text
//! POST /api/cart   { action, cartId, variantId?, lineId?, quantity? }
//! GET  /api/cart?cartId=...
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Cart, CartId, Intent};

/// Marker value for an unusable cart identifier in error bodies.
pub const INVALID_CART_ERROR: &str = "invalid_cart";

/// Marker value for backend validation rejections in error bodies.
pub const SHOPIFY_ERROR: &str = "Shopify error";

/// Mutation kinds accepted by `POST /api/cart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
    /// Create a new cart.
    Create,
    /// Add merchandise to an existing cart.
    Add,
    /// Remove a line.
    Remove,
    /// Set a line's quantity.
    Update,
}

/// A cart mutation request as it travels over the wire.
///
/// Field requirements depend on `action`; [`CartActionRequest::validate`]
/// enforces them and produces the typed form handlers work with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartActionRequest {
    /// Which mutation to perform.
    pub action: CartAction,
    /// Tracked cart identifier; must be null for `create`.
    pub cart_id: Option<CartId>,
    /// Merchandise reference (`create`/`add`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    /// Target line (`remove`/`update`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<String>,
    /// New quantity (`update`, positive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// A request that passed field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    /// Create a new single-line cart.
    Create {
        /// Product variant ID.
        variant_id: String,
    },
    /// Append one unit of merchandise.
    Add {
        /// Target cart.
        cart_id: CartId,
        /// Product variant ID.
        variant_id: String,
    },
    /// Delete a line.
    Remove {
        /// Target cart.
        cart_id: CartId,
        /// Line ID.
        line_id: String,
    },
    /// Set a line quantity.
    Update {
        /// Target cart.
        cart_id: CartId,
        /// Line ID.
        line_id: String,
        /// New quantity (>= 1).
        quantity: u32,
    },
}

/// Validation failures for [`CartActionRequest`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// A field the action needs was absent.
    #[error("missing field for {action}: {field}")]
    MissingField {
        /// Action being validated.
        action: &'static str,
        /// Missing field name.
        field: &'static str,
    },
    /// `create` must not carry a cart identifier.
    #[error("cartId must be null for create")]
    CartIdOnCreate,
    /// Update quantity must be a positive integer.
    #[error("quantity must be a positive integer")]
    NonPositiveQuantity,
}

impl CartActionRequest {
    /// Build the request for an [`Intent`] plus the currently known cart ID.
    #[must_use]
    pub fn from_intent(intent: &Intent, cart_id: Option<&CartId>) -> Self {
        match intent {
            Intent::Create { variant_id } => Self {
                action: CartAction::Create,
                cart_id: None,
                variant_id: Some(variant_id.clone()),
                line_id: None,
                quantity: None,
            },
            Intent::Add { variant_id } => Self {
                action: CartAction::Add,
                cart_id: cart_id.cloned(),
                variant_id: Some(variant_id.clone()),
                line_id: None,
                quantity: None,
            },
            Intent::Remove { line_id } => Self {
                action: CartAction::Remove,
                cart_id: cart_id.cloned(),
                variant_id: None,
                line_id: Some(line_id.clone()),
                quantity: None,
            },
            Intent::Update { line_id, quantity } => Self {
                action: CartAction::Update,
                cart_id: cart_id.cloned(),
                variant_id: None,
                line_id: Some(line_id.clone()),
                quantity: Some(*quantity),
            },
        }
    }

    /// Validate the per-action field matrix.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`] if a required field is absent, `cartId` is set
    /// on `create`, or an update quantity is not positive.
    pub fn validate(self) -> Result<ValidatedAction, WireError> {
        match self.action {
            CartAction::Create => {
                if self.cart_id.is_some() {
                    return Err(WireError::CartIdOnCreate);
                }
                Ok(ValidatedAction::Create {
                    variant_id: require(self.variant_id, "create", "variantId")?,
                })
            }
            CartAction::Add => Ok(ValidatedAction::Add {
                cart_id: require(self.cart_id, "add", "cartId")?,
                variant_id: require(self.variant_id, "add", "variantId")?,
            }),
            CartAction::Remove => Ok(ValidatedAction::Remove {
                cart_id: require(self.cart_id, "remove", "cartId")?,
                line_id: require(self.line_id, "remove", "lineId")?,
            }),
            CartAction::Update => {
                let quantity = require(self.quantity, "update", "quantity")?;
                if quantity == 0 {
                    return Err(WireError::NonPositiveQuantity);
                }
                Ok(ValidatedAction::Update {
                    cart_id: require(self.cart_id, "update", "cartId")?,
                    line_id: require(self.line_id, "update", "lineId")?,
                    quantity,
                })
            }
        }
    }
}

fn require<T>(value: Option<T>, action: &'static str, field: &'static str) -> Result<T, WireError> {
    value.ok_or(WireError::MissingField { action, field })
}

/// Successful (and read-path) response body: the cart, or null when the
/// queried identifier is unrecognized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartPayload {
    /// The authoritative cart snapshot, absent on an unrecognized read.
    pub cart: Option<Cart>,
}

/// Failure response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartErrorBody {
    /// Stable marker: [`INVALID_CART_ERROR`], [`SHOPIFY_ERROR`], or other.
    pub error: String,
    /// Backend-provided validation messages, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl CartErrorBody {
    /// Body reporting an unusable cart identifier.
    #[must_use]
    pub fn invalid_cart() -> Self {
        Self {
            error: INVALID_CART_ERROR.to_string(),
            details: None,
        }
    }

    /// Body reporting backend validation messages.
    #[must_use]
    pub fn shopify(details: Vec<String>) -> Self {
        Self {
            error: SHOPIFY_ERROR.to_string(),
            details: Some(details),
        }
    }
}
