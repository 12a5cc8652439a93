//! Boundary to the cart gateway.
//!
//! [`CartGateway`] is injectable so tests can script outcomes; the
//! production implementation is [`HttpGateway`], which speaks the wire
//! contract in [`tidewater_core::wire`] against the gateway binary.
//!
//! Note the signatures never return errors: the gateway boundary already
//! normalizes every failure mode into the [`Outcome`] vocabulary, so there
//! is nothing left to propagate.

use tidewater_core::wire::{CartActionRequest, CartErrorBody, CartPayload};
use tidewater_core::{CartId, FailureKind, FetchOutcome, Intent, Outcome, wire};
use tracing::warn;

/// One entry point per intent kind, plus the read-only startup fetch.
pub trait CartGateway {
    /// Create a new cart with one unit of the given merchandise.
    async fn create(&self, variant_id: &str) -> Outcome;
    /// Append one unit of merchandise to an existing cart.
    async fn add(&self, cart_id: &CartId, variant_id: &str) -> Outcome;
    /// Delete the named line.
    async fn remove(&self, cart_id: &CartId, line_id: &str) -> Outcome;
    /// Set a line's quantity to an explicit positive value.
    async fn update(&self, cart_id: &CartId, line_id: &str, quantity: u32) -> Outcome;
    /// Read-only snapshot retrieval, bypassing any cache.
    async fn fetch(&self, cart_id: &CartId) -> FetchOutcome;
}

/// HTTP implementation of [`CartGateway`] against the gateway's
/// `/api/cart` endpoint.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway client for the given base URL
    /// (e.g. `https://shop.example`).
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/cart", self.base_url.trim_end_matches('/'))
    }

    async fn mutate(&self, intent: &Intent, cart_id: Option<&CartId>) -> Outcome {
        let request = CartActionRequest::from_intent(intent, cart_id);

        let response = match self.client.post(self.endpoint()).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(kind = intent.kind(), error = %e, "cart mutation transport failure");
                return Outcome::Failure(FailureKind::Unknown);
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(kind = intent.kind(), error = %e, "cart mutation body read failure");
                return Outcome::Failure(FailureKind::Unknown);
            }
        };

        if status.is_success() {
            match serde_json::from_str::<CartPayload>(&body) {
                Ok(CartPayload { cart: Some(cart) }) => Outcome::Success(cart),
                Ok(CartPayload { cart: None }) | Err(_) => {
                    warn!(kind = intent.kind(), "cart mutation returned no cart");
                    Outcome::Failure(FailureKind::Unknown)
                }
            }
        } else {
            Outcome::Failure(classify_error_body(&body))
        }
    }
}

/// Map a non-success response body onto the failure vocabulary.
///
/// Unrecognized shapes fail safe toward `Unknown` - they are never treated
/// as success and never as an invalid cart.
fn classify_error_body(body: &str) -> FailureKind {
    match serde_json::from_str::<CartErrorBody>(body) {
        Ok(parsed) if parsed.error == wire::INVALID_CART_ERROR => FailureKind::InvalidCart,
        Ok(parsed) if parsed.error == wire::SHOPIFY_ERROR => FailureKind::Validation,
        Ok(_) | Err(_) => FailureKind::Unknown,
    }
}

impl CartGateway for HttpGateway {
    async fn create(&self, variant_id: &str) -> Outcome {
        self.mutate(
            &Intent::Create {
                variant_id: variant_id.to_string(),
            },
            None,
        )
        .await
    }

    async fn add(&self, cart_id: &CartId, variant_id: &str) -> Outcome {
        self.mutate(
            &Intent::Add {
                variant_id: variant_id.to_string(),
            },
            Some(cart_id),
        )
        .await
    }

    async fn remove(&self, cart_id: &CartId, line_id: &str) -> Outcome {
        self.mutate(
            &Intent::Remove {
                line_id: line_id.to_string(),
            },
            Some(cart_id),
        )
        .await
    }

    async fn update(&self, cart_id: &CartId, line_id: &str, quantity: u32) -> Outcome {
        self.mutate(
            &Intent::Update {
                line_id: line_id.to_string(),
                quantity,
            },
            Some(cart_id),
        )
        .await
    }

    async fn fetch(&self, cart_id: &CartId) -> FetchOutcome {
        let response = match self
            .client
            .get(self.endpoint())
            .query(&[("cartId", cart_id.as_str())])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "cart fetch transport failure");
                return FetchOutcome::Failed(FailureKind::Unknown);
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "cart fetch returned error status");
            return FetchOutcome::Failed(FailureKind::Unknown);
        }

        match response.json::<CartPayload>().await {
            Ok(CartPayload { cart: Some(cart) }) => FetchOutcome::Found(cart),
            // Absence is a missing cart, not a failure.
            Ok(CartPayload { cart: None }) => FetchOutcome::Missing,
            Err(e) => {
                warn!(error = %e, "cart fetch body parse failure");
                FetchOutcome::Failed(FailureKind::Unknown)
            }
        }
    }
}
