//! Cart snapshot types.
//!
//! A [`Cart`] is the full authoritative state as last confirmed by the
//! backend. It is replaced wholesale on every successful mutation, never
//! patched field-by-field, which is what keeps the client consistent without
//! any cross-call transaction support on the backend.

use serde::{Deserialize, Serialize};

use super::id::CartId;

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

/// Cart cost summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCost {
    /// Subtotal before tax/shipping.
    pub subtotal_amount: Money,
}

/// Cost for a single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineCost {
    /// Total for the line (unit price x quantity, after discounts).
    pub total_amount: Money,
}

/// Merchandise referenced by a cart line (display fields only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMerchandise {
    /// Product variant ID.
    pub id: String,
    /// Variant title.
    pub title: String,
    /// Parent product title.
    pub product_title: String,
    /// Unit price.
    pub price: Money,
    /// Variant image URL, if any.
    pub image_url: Option<String>,
}

/// A line item in the cart.
///
/// Invariant: `quantity >= 1`. A line whose quantity is reduced to zero is
/// removed by the backend, never stored as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line ID, unique within the cart.
    pub id: String,
    /// Quantity (>= 1).
    pub quantity: u32,
    /// Line cost.
    pub cost: CartLineCost,
    /// Referenced merchandise.
    pub merchandise: CartMerchandise,
}

/// A full cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Checkout URL provided by the backend.
    pub checkout_url: String,
    /// Total item quantity across all lines.
    pub total_quantity: u32,
    /// Aggregate cost.
    pub cost: CartCost,
    /// Ordered cart lines.
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Find a line by its ID.
    #[must_use]
    pub fn find_line(&self, line_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == line_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cart() -> Cart {
        Cart {
            id: CartId::from("gid://cart/B"),
            checkout_url: "https://shop.example/checkout/B".to_string(),
            total_quantity: 3,
            cost: CartCost {
                subtotal_amount: Money {
                    amount: "42.00".to_string(),
                    currency_code: "USD".to_string(),
                },
            },
            lines: vec![CartLine {
                id: "line-1".to_string(),
                quantity: 3,
                cost: CartLineCost {
                    total_amount: Money {
                        amount: "42.00".to_string(),
                        currency_code: "USD".to_string(),
                    },
                },
                merchandise: CartMerchandise {
                    id: "variant-1".to_string(),
                    title: "Default Title".to_string(),
                    product_title: "Sea Salt".to_string(),
                    price: Money {
                        amount: "14.00".to_string(),
                        currency_code: "USD".to_string(),
                    },
                    image_url: Some("https://cdn.example/salt.jpg".to_string()),
                },
            }],
        }
    }

    #[test]
    fn test_cart_serializes_camel_case() {
        let json = serde_json::to_value(sample_cart()).expect("serialize");
        assert_eq!(json["checkoutUrl"], "https://shop.example/checkout/B");
        assert_eq!(json["totalQuantity"], 3);
        assert_eq!(json["cost"]["subtotalAmount"]["amount"], "42.00");
        assert_eq!(json["lines"][0]["merchandise"]["productTitle"], "Sea Salt");
    }

    #[test]
    fn test_cart_round_trips() {
        let cart = sample_cart();
        let json = serde_json::to_string(&cart).expect("serialize");
        let back: Cart = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, cart);
    }

    #[test]
    fn test_find_line() {
        let cart = sample_cart();
        assert!(cart.find_line("line-1").is_some());
        assert!(cart.find_line("line-2").is_none());
        assert!(!cart.is_empty());
    }
}
