//! Conversions from raw Storefront API response JSON to gateway types.
//!
//! The Storefront API nests cart lines inside connection edges and hides
//! merchandise behind a union; these types mirror that wire shape exactly
//! so `serde` can parse it, then flatten into [`tidewater_core::Cart`].

use serde::Deserialize;
use tidewater_core::{
    Cart, CartCost, CartId, CartLine, CartLineCost, CartMerchandise, Money,
};

/// A cart exactly as the Storefront API returns it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCart {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: i64,
    pub cost: RawCartCost,
    pub lines: RawLineConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCartCost {
    pub subtotal_amount: RawMoney,
}

#[derive(Debug, Deserialize)]
pub struct RawLineConnection {
    pub edges: Vec<RawLineEdge>,
}

#[derive(Debug, Deserialize)]
pub struct RawLineEdge {
    pub node: RawLine,
}

#[derive(Debug, Deserialize)]
pub struct RawLine {
    pub id: String,
    pub quantity: i64,
    pub cost: RawLineCost,
    pub merchandise: RawMerchandise,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLineCost {
    pub total_amount: RawMoney,
}

/// The `... on ProductVariant` fragment of a line's merchandise.
#[derive(Debug, Deserialize)]
pub struct RawMerchandise {
    pub id: String,
    pub title: String,
    pub price: RawMoney,
    pub product: RawProduct,
    pub image: Option<RawImage>,
}

#[derive(Debug, Deserialize)]
pub struct RawProduct {
    pub title: String,
    #[serde(rename = "featuredImage")]
    pub featured_image: Option<RawImage>,
}

#[derive(Debug, Deserialize)]
pub struct RawImage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMoney {
    pub amount: String,
    pub currency_code: String,
}

impl From<RawMoney> for Money {
    fn from(raw: RawMoney) -> Self {
        Self {
            amount: raw.amount,
            currency_code: raw.currency_code,
        }
    }
}

impl From<RawCart> for Cart {
    fn from(raw: RawCart) -> Self {
        Self {
            id: CartId::from(raw.id),
            checkout_url: raw.checkout_url,
            total_quantity: u32::try_from(raw.total_quantity).unwrap_or(0),
            cost: CartCost {
                subtotal_amount: raw.cost.subtotal_amount.into(),
            },
            lines: raw
                .lines
                .edges
                .into_iter()
                .map(|edge| edge.node.into())
                .collect(),
        }
    }
}

impl From<RawLine> for CartLine {
    fn from(raw: RawLine) -> Self {
        // Prefer the variant's own image and fall back to the product's
        // featured image.
        let image_url = raw
            .merchandise
            .image
            .map(|i| i.url)
            .or_else(|| raw.merchandise.product.featured_image.map(|i| i.url));

        Self {
            id: raw.id,
            quantity: u32::try_from(raw.quantity).unwrap_or(0),
            cost: CartLineCost {
                total_amount: raw.cost.total_amount.into(),
            },
            merchandise: CartMerchandise {
                id: raw.merchandise.id,
                title: raw.merchandise.title,
                product_title: raw.merchandise.product.title,
                price: raw.merchandise.price.into(),
                image_url,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE_CART_JSON: &str = r#"{
        "id": "gid://shopify/Cart/abc123",
        "checkoutUrl": "https://test.myshopify.com/cart/c/abc123",
        "totalQuantity": 3,
        "cost": {
            "subtotalAmount": { "amount": "45.00", "currencyCode": "USD" }
        },
        "lines": {
            "edges": [
                {
                    "node": {
                        "id": "gid://shopify/CartLine/line1",
                        "quantity": 3,
                        "cost": {
                            "totalAmount": { "amount": "45.00", "currencyCode": "USD" }
                        },
                        "merchandise": {
                            "id": "gid://shopify/ProductVariant/v1",
                            "title": "250g",
                            "price": { "amount": "15.00", "currencyCode": "USD" },
                            "product": {
                                "title": "Flaky Sea Salt",
                                "featuredImage": { "url": "https://cdn.example/salt.jpg" }
                            },
                            "image": null
                        }
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn test_parse_and_convert_cart() {
        let raw: RawCart = serde_json::from_str(SAMPLE_CART_JSON).unwrap();
        let cart: Cart = raw.into();

        assert_eq!(cart.id.as_str(), "gid://shopify/Cart/abc123");
        assert_eq!(cart.total_quantity, 3);
        assert_eq!(cart.cost.subtotal_amount.amount, "45.00");
        assert_eq!(cart.lines.len(), 1);

        let line = &cart.lines[0];
        assert_eq!(line.id, "gid://shopify/CartLine/line1");
        assert_eq!(line.quantity, 3);
        assert_eq!(line.merchandise.product_title, "Flaky Sea Salt");
        // Variant has no image of its own, so the product image wins.
        assert_eq!(
            line.merchandise.image_url.as_deref(),
            Some("https://cdn.example/salt.jpg")
        );
    }

    #[test]
    fn test_variant_image_preferred_over_product_image() {
        let raw = RawLine {
            id: "line1".to_string(),
            quantity: 1,
            cost: RawLineCost {
                total_amount: RawMoney {
                    amount: "5.00".to_string(),
                    currency_code: "USD".to_string(),
                },
            },
            merchandise: RawMerchandise {
                id: "v1".to_string(),
                title: "Default Title".to_string(),
                price: RawMoney {
                    amount: "5.00".to_string(),
                    currency_code: "USD".to_string(),
                },
                product: RawProduct {
                    title: "Sel Gris".to_string(),
                    featured_image: Some(RawImage {
                        url: "https://cdn.example/product.jpg".to_string(),
                    }),
                },
                image: Some(RawImage {
                    url: "https://cdn.example/variant.jpg".to_string(),
                }),
            },
        };

        let line: CartLine = raw.into();
        assert_eq!(
            line.merchandise.image_url.as_deref(),
            Some("https://cdn.example/variant.jpg")
        );
    }

    #[test]
    fn test_negative_quantity_clamps_to_zero() {
        let raw: RawCart = serde_json::from_str(
            &SAMPLE_CART_JSON.replace("\"totalQuantity\": 3", "\"totalQuantity\": -1"),
        )
        .unwrap();
        let cart: Cart = raw.into();
        assert_eq!(cart.total_quantity, 0);
    }
}
