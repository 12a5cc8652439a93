//! Shopify Storefront API client implementation.
//!
//! Sends raw GraphQL documents with `reqwest` 0.13 and parses responses
//! into typed structs. No caching: carts are mutable state and every
//! response must reflect the mutation that produced it.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tidewater_core::{Cart, CartId};
use tracing::debug;

use crate::config::ShopifyConfig;

use super::convert::RawCart;
use super::{ShopifyError, UserError};

/// The cart selection set shared by every query and mutation. Returned
/// carts must always carry the same shape so the client renders from one
/// conversion path.
const CART_FIELDS: &str = r"
  id
  checkoutUrl
  totalQuantity
  cost {
    subtotalAmount {
      amount
      currencyCode
    }
  }
  lines(first: 100) {
    edges {
      node {
        id
        quantity
        cost {
          totalAmount {
            amount
            currencyCode
          }
        }
        merchandise {
          ... on ProductVariant {
            id
            title
            price {
              amount
              currencyCode
            }
            product {
              title
              featuredImage {
                url
              }
            }
            image {
              url
            }
          }
        }
      }
    }
  }
";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API, scoped to cart operations.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
}

/// Envelope of every GraphQL response.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLResponseError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponseError {
    message: String,
}

/// The `cartCreate` / `cartLinesAdd` / etc. result object: a cart on
/// success, `userErrors` on rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutationResult {
    cart: Option<RawCart>,
    user_errors: Vec<UserError>,
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        let endpoint = format!(
            "https://{}/api/{}/graphql.json",
            config.store, config.api_version
        );

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint,
                access_token: config.storefront_private_token.expose_secret().to_string(),
            }),
        }
    }

    /// Execute a GraphQL document and parse the `data` payload.
    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, ShopifyError> {
        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            // Private access tokens use a different header than public tokens
            // See: https://shopify.dev/docs/storefronts/headless/building-with-the-storefront-api/getting-started
            .header("Shopify-Storefront-Private-Token", &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "query": query,
                "variables": variables,
            }))
            .send()
            .await?;

        let status = response.status();
        // Body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify API returned non-success status"
            );
            return Err(ShopifyError::GraphQL(vec![format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            )]));
        }

        let response: GraphQLResponse<T> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Shopify GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                body = %response_text.chars().take(500).collect::<String>(),
                "Shopify GraphQL response has no data and no errors"
            );
            ShopifyError::MissingData("data")
        })
    }

    /// Unwrap a mutation result into a cart, surfacing `userErrors`.
    fn unwrap_mutation(
        result: Option<MutationResult>,
        field: &'static str,
    ) -> Result<Cart, ShopifyError> {
        let result = result.ok_or(ShopifyError::MissingData(field))?;
        if !result.user_errors.is_empty() {
            return Err(ShopifyError::UserErrors(result.user_errors));
        }
        result
            .cart
            .map(Cart::from)
            .ok_or(ShopifyError::MissingData(field))
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Create a new cart holding one unit of the given variant.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if the request fails or the mutation is
    /// rejected with user errors.
    pub async fn cart_create(&self, variant_id: &str) -> Result<Cart, ShopifyError> {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            cart_create: Option<MutationResult>,
        }

        let query = format!(
            r"mutation cartCreate($input: CartInput!) {{
              cartCreate(input: $input) {{
                cart {{ {CART_FIELDS} }}
                userErrors {{ message }}
              }}
            }}"
        );
        let variables = serde_json::json!({
            "input": {
                "lines": [{ "merchandiseId": variant_id, "quantity": 1 }],
            },
        });

        let data: Data = self.execute(&query, variables).await?;
        Self::unwrap_mutation(data.cart_create, "cartCreate")
    }

    /// Add one unit of the given variant to an existing cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if the request fails or the mutation is
    /// rejected with user errors.
    pub async fn cart_lines_add(
        &self,
        cart_id: &CartId,
        variant_id: &str,
    ) -> Result<Cart, ShopifyError> {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            cart_lines_add: Option<MutationResult>,
        }

        let query = format!(
            r"mutation cartLinesAdd($cartId: ID!, $lines: [CartLineInput!]!) {{
              cartLinesAdd(cartId: $cartId, lines: $lines) {{
                cart {{ {CART_FIELDS} }}
                userErrors {{ message }}
              }}
            }}"
        );
        let variables = serde_json::json!({
            "cartId": cart_id,
            "lines": [{ "merchandiseId": variant_id, "quantity": 1 }],
        });

        let data: Data = self.execute(&query, variables).await?;
        Self::unwrap_mutation(data.cart_lines_add, "cartLinesAdd")
    }

    /// Remove a line from a cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if the request fails or the mutation is
    /// rejected with user errors.
    pub async fn cart_lines_remove(
        &self,
        cart_id: &CartId,
        line_id: &str,
    ) -> Result<Cart, ShopifyError> {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            cart_lines_remove: Option<MutationResult>,
        }

        let query = format!(
            r"mutation cartLinesRemove($cartId: ID!, $lineIds: [ID!]!) {{
              cartLinesRemove(cartId: $cartId, lineIds: $lineIds) {{
                cart {{ {CART_FIELDS} }}
                userErrors {{ message }}
              }}
            }}"
        );
        let variables = serde_json::json!({
            "cartId": cart_id,
            "lineIds": [line_id],
        });

        let data: Data = self.execute(&query, variables).await?;
        Self::unwrap_mutation(data.cart_lines_remove, "cartLinesRemove")
    }

    /// Set a line's quantity to an explicit value.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if the request fails or the mutation is
    /// rejected with user errors.
    pub async fn cart_lines_update(
        &self,
        cart_id: &CartId,
        line_id: &str,
        quantity: u32,
    ) -> Result<Cart, ShopifyError> {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Data {
            cart_lines_update: Option<MutationResult>,
        }

        let query = format!(
            r"mutation cartLinesUpdate($cartId: ID!, $lines: [CartLineUpdateInput!]!) {{
              cartLinesUpdate(cartId: $cartId, lines: $lines) {{
                cart {{ {CART_FIELDS} }}
                userErrors {{ message }}
              }}
            }}"
        );
        let variables = serde_json::json!({
            "cartId": cart_id,
            "lines": [{ "id": line_id, "quantity": quantity }],
        });

        let data: Data = self.execute(&query, variables).await?;
        Self::unwrap_mutation(data.cart_lines_update, "cartLinesUpdate")
    }

    /// Fetch a cart by identifier.
    ///
    /// Returns `Ok(None)` when the identifier no longer resolves to a
    /// cart. That case is routine (expired or completed carts) and must
    /// not surface as an error.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError` if the request or parse fails.
    pub async fn cart(&self, cart_id: &CartId) -> Result<Option<Cart>, ShopifyError> {
        #[derive(Debug, Deserialize)]
        struct Data {
            cart: Option<RawCart>,
        }

        let query = format!(
            r"query getCart($cartId: ID!) {{
              cart(id: $cartId) {{ {CART_FIELDS} }}
            }}"
        );
        let variables = serde_json::json!({ "cartId": cart_id });

        let data: Data = self.execute(&query, variables).await?;
        Ok(data.cart.map(Cart::from))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_mutation_surfaces_user_errors() {
        let result = MutationResult {
            cart: None,
            user_errors: vec![UserError {
                message: "Merchandise does not exist".to_string(),
            }],
        };

        let err = StorefrontClient::unwrap_mutation(Some(result), "cartLinesAdd").unwrap_err();
        assert!(matches!(err, ShopifyError::UserErrors(ref errors) if errors.len() == 1));
    }

    #[test]
    fn test_unwrap_mutation_missing_result() {
        let err = StorefrontClient::unwrap_mutation(None, "cartCreate").unwrap_err();
        assert!(matches!(err, ShopifyError::MissingData("cartCreate")));
    }

    #[test]
    fn test_unwrap_mutation_missing_cart_without_errors() {
        let result = MutationResult {
            cart: None,
            user_errors: vec![],
        };
        let err = StorefrontClient::unwrap_mutation(Some(result), "cartCreate").unwrap_err();
        assert!(matches!(err, ShopifyError::MissingData("cartCreate")));
    }

    #[test]
    fn test_mutation_result_parses_user_errors() {
        let json = r#"{"cart": null, "userErrors": [{"message": "Cart is locked"}]}"#;
        let result: MutationResult = serde_json::from_str(json).unwrap();
        assert!(result.cart.is_none());
        assert_eq!(result.user_errors[0].message, "Cart is locked");
    }
}
