//! Shared fixtures for Tidewater integration tests.
//!
//! The engine-side tests run against [`ScriptedGateway`], a gateway double
//! whose outcomes are queued up front, so entire UI flows (bootstrap, busy
//! windows, invalid-cart recovery) execute deterministically without a
//! server. Gateway-side tests build an axum router directly and drive it
//! with `tower::ServiceExt::oneshot`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use secrecy::SecretString;
use tidewater_core::{
    Cart, CartCost, CartId, CartLine, CartLineCost, CartMerchandise, FailureKind, FetchOutcome,
    Money, Outcome,
};
use tidewater_engine::{CartGateway, CartRenderer};
use tidewater_gateway::config::{GatewayConfig, ShopifyConfig};
use tidewater_gateway::routes;
use tidewater_gateway::state::AppState;

// =============================================================================
// Cart Fixtures
// =============================================================================

/// A `Money` fixture in USD.
#[must_use]
pub fn money(amount: &str) -> Money {
    Money {
        amount: amount.to_string(),
        currency_code: "USD".to_string(),
    }
}

/// A one-line cart fixture.
#[must_use]
pub fn cart_with_line(cart_id: &str, line_id: &str, quantity: u32) -> Cart {
    Cart {
        id: CartId::from(cart_id),
        checkout_url: format!("https://shop.example/checkout/{cart_id}"),
        total_quantity: quantity,
        cost: CartCost {
            subtotal_amount: money("12.00"),
        },
        lines: vec![CartLine {
            id: line_id.to_string(),
            quantity,
            cost: CartLineCost {
                total_amount: money("12.00"),
            },
            merchandise: CartMerchandise {
                id: "variant-1".to_string(),
                title: "Default Title".to_string(),
                product_title: "Flaky Sea Salt".to_string(),
                price: money("12.00"),
                image_url: None,
            },
        }],
    }
}

/// An empty cart fixture.
#[must_use]
pub fn empty_cart(cart_id: &str) -> Cart {
    Cart {
        lines: Vec::new(),
        total_quantity: 0,
        ..cart_with_line(cart_id, "unused", 1)
    }
}

// =============================================================================
// Gateway Double
// =============================================================================

/// Gateway double with scripted outcomes and a call log.
///
/// Clones share the same script and log, so a test keeps one clone for
/// itself and hands the other to the controller. Mutations pop from the
/// front of the script; an exhausted script answers with an opaque failure
/// so a test that under-provisions outcomes fails loudly rather than
/// hanging.
#[derive(Default, Clone)]
pub struct ScriptedGateway {
    inner: Rc<ScriptedGatewayInner>,
}

#[derive(Default)]
struct ScriptedGatewayInner {
    outcomes: RefCell<VecDeque<Outcome>>,
    fetches: RefCell<VecDeque<FetchOutcome>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedGateway {
    /// An empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the outcome for the next mutation.
    pub fn push_outcome(&self, outcome: Outcome) {
        self.inner.outcomes.borrow_mut().push_back(outcome);
    }

    /// Queue the outcome for the next startup fetch.
    pub fn push_fetch(&self, outcome: FetchOutcome) {
        self.inner.fetches.borrow_mut().push_back(outcome);
    }

    /// The calls performed so far, in order, one formatted entry per call.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.borrow().clone()
    }

    fn next_outcome(&self) -> Outcome {
        self.inner
            .outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or(Outcome::Failure(FailureKind::Unknown))
    }
}

impl CartGateway for ScriptedGateway {
    async fn create(&self, variant_id: &str) -> Outcome {
        self.inner
            .calls
            .borrow_mut()
            .push(format!("create {variant_id}"));
        self.next_outcome()
    }

    async fn add(&self, cart_id: &CartId, variant_id: &str) -> Outcome {
        self.inner
            .calls
            .borrow_mut()
            .push(format!("add {cart_id} {variant_id}"));
        self.next_outcome()
    }

    async fn remove(&self, cart_id: &CartId, line_id: &str) -> Outcome {
        self.inner
            .calls
            .borrow_mut()
            .push(format!("remove {cart_id} {line_id}"));
        self.next_outcome()
    }

    async fn update(&self, cart_id: &CartId, line_id: &str, quantity: u32) -> Outcome {
        self.inner
            .calls
            .borrow_mut()
            .push(format!("update {cart_id} {line_id} {quantity}"));
        self.next_outcome()
    }

    async fn fetch(&self, cart_id: &CartId) -> FetchOutcome {
        self.inner
            .calls
            .borrow_mut()
            .push(format!("fetch {cart_id}"));
        self.inner
            .fetches
            .borrow_mut()
            .pop_front()
            .unwrap_or(FetchOutcome::Failed(FailureKind::Unknown))
    }
}

// =============================================================================
// Renderer Double
// =============================================================================

/// One observed render call: the snapshot's total quantity and busy flag.
pub type Frame = (Option<u32>, bool);

/// Renderer double that records every frame through a shared handle.
#[derive(Default)]
pub struct RecordingRenderer {
    frames: Rc<RefCell<Vec<Frame>>>,
}

impl RecordingRenderer {
    /// A fresh renderer with an empty frame log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for reading frames after the renderer moved into an engine.
    #[must_use]
    pub fn frames(&self) -> Rc<RefCell<Vec<Frame>>> {
        Rc::clone(&self.frames)
    }
}

impl CartRenderer for RecordingRenderer {
    fn render(&mut self, snapshot: Option<&Cart>, busy: bool) {
        self.frames
            .borrow_mut()
            .push((snapshot.map(|cart| cart.total_quantity), busy));
    }
}

// =============================================================================
// Gateway Router
// =============================================================================

/// A gateway router whose upstream credentials point at an unreachable
/// host. Suitable for exercising everything that resolves before the
/// Shopify request goes out.
#[must_use]
pub fn offline_gateway_router() -> axum::Router {
    let config = GatewayConfig {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
        port: 0,
        shopify: ShopifyConfig {
            store: "unreachable.invalid".to_string(),
            api_version: "2026-01".to_string(),
            storefront_private_token: SecretString::from("test-token"),
        },
    };
    axum::Router::new()
        .nest("/api", routes::api_routes())
        .with_state(AppState::new(config))
}
