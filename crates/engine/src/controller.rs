//! Async driver for the sync engine.
//!
//! The controller owns the engine and a [`CartGateway`]; it performs the
//! calls the engine requests and feeds outcomes back, looping so that the
//! one-shot invalid-cart recovery runs to completion inside a single
//! `handle` call. The network round trip is the only suspension point.

use std::time::Instant;

use tidewater_core::{Cart, FailureKind, Intent, Outcome};
use tracing::error;

use crate::engine::{CartRenderer, Dispatch, SyncEngine};
use crate::events::UiEvent;
use crate::gateway::CartGateway;
use crate::store::CartIdStore;

/// Session-lifetime cart controller: one per page, no teardown needed.
pub struct CartController<G, S, R> {
    engine: SyncEngine<S, R>,
    gateway: G,
}

impl<G, S, R> CartController<G, S, R>
where
    G: CartGateway,
    S: CartIdStore,
    R: CartRenderer,
{
    /// Create an idle controller.
    pub const fn new(gateway: G, store: S, renderer: R) -> Self {
        Self {
            engine: SyncEngine::new(store, renderer),
            gateway,
        }
    }

    /// Access the underlying engine state (snapshot, busy flag).
    pub const fn engine(&self) -> &SyncEngine<S, R> {
        &self.engine
    }

    /// The last-known-good snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Cart> {
        self.engine.snapshot()
    }

    /// Populate the snapshot on page load.
    ///
    /// Issues at most one fetch: none at all when no identifier is stored.
    pub async fn bootstrap(&mut self) {
        let outcome = match self.engine.bootstrap_call() {
            Some(cart_id) => Some(self.gateway.fetch(&cart_id).await),
            None => None,
        };
        self.engine.finish_bootstrap(outcome);
    }

    /// Handle a UI event with the current wall clock.
    pub async fn handle(&mut self, event: UiEvent) {
        self.handle_at(event, Instant::now()).await;
    }

    /// Handle a UI event at an explicit instant (virtual time in tests).
    pub async fn handle_at(&mut self, event: UiEvent, now: Instant) {
        let dispatch = self.engine.handle(event, now);
        self.drive(dispatch).await;
    }

    /// Fire a due debounced edit, if any. Call periodically from the UI's
    /// timer with the current wall clock.
    pub async fn tick(&mut self) {
        self.tick_at(Instant::now()).await;
    }

    /// [`Self::tick`] at an explicit instant.
    pub async fn tick_at(&mut self, now: Instant) {
        let dispatch = self.engine.poll(now);
        self.drive(dispatch).await;
    }

    async fn drive(&mut self, mut dispatch: Option<Dispatch>) {
        while let Some(call) = dispatch {
            let outcome = self.execute(&call).await;
            dispatch = self.engine.resolve(outcome);
        }
    }

    async fn execute(&self, call: &Dispatch) -> Outcome {
        match (&call.intent, call.cart_id.as_ref()) {
            (Intent::Create { variant_id }, _) => self.gateway.create(variant_id).await,
            (Intent::Add { variant_id }, Some(cart_id)) => {
                self.gateway.add(cart_id, variant_id).await
            }
            (Intent::Remove { line_id }, Some(cart_id)) => {
                self.gateway.remove(cart_id, line_id).await
            }
            (Intent::Update { line_id, quantity }, Some(cart_id)) => {
                self.gateway.update(cart_id, line_id, *quantity).await
            }
            (intent, None) => {
                // A line-targeted intent with no tracked identifier cannot
                // be expressed on the wire; resolve as an opaque failure so
                // the engine reverts and returns to idle.
                error!(kind = intent.kind(), "intent requires a cart id but none is tracked");
                Outcome::Failure(FailureKind::Unknown)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use tidewater_core::{CartCost, CartId, CartLine, CartLineCost, CartMerchandise, FetchOutcome, Money};

    use super::*;
    use crate::store::MemoryCartIdStore;

    struct NullRenderer;

    impl CartRenderer for NullRenderer {
        fn render(&mut self, _snapshot: Option<&Cart>, _busy: bool) {}
    }

    /// Gateway that reports every mutation as an invalid cart and records
    /// the calls it receives.
    #[derive(Default)]
    struct AlwaysInvalidGateway {
        calls: RefCell<Vec<String>>,
    }

    impl CartGateway for AlwaysInvalidGateway {
        async fn create(&self, variant_id: &str) -> Outcome {
            self.calls.borrow_mut().push(format!("create {variant_id}"));
            Outcome::Failure(FailureKind::InvalidCart)
        }

        async fn add(&self, _cart_id: &CartId, variant_id: &str) -> Outcome {
            self.calls.borrow_mut().push(format!("add {variant_id}"));
            Outcome::Failure(FailureKind::InvalidCart)
        }

        async fn remove(&self, _cart_id: &CartId, line_id: &str) -> Outcome {
            self.calls.borrow_mut().push(format!("remove {line_id}"));
            Outcome::Failure(FailureKind::InvalidCart)
        }

        async fn update(&self, _cart_id: &CartId, line_id: &str, quantity: u32) -> Outcome {
            self.calls
                .borrow_mut()
                .push(format!("update {line_id} {quantity}"));
            Outcome::Failure(FailureKind::InvalidCart)
        }

        async fn fetch(&self, _cart_id: &CartId) -> FetchOutcome {
            self.calls.borrow_mut().push("fetch".to_string());
            FetchOutcome::Failed(FailureKind::InvalidCart)
        }
    }

    fn sample_cart(id: &str) -> Cart {
        Cart {
            id: CartId::from(id),
            checkout_url: "https://shop.example/checkout".to_string(),
            total_quantity: 1,
            cost: CartCost {
                subtotal_amount: Money {
                    amount: "10.00".to_string(),
                    currency_code: "USD".to_string(),
                },
            },
            lines: vec![CartLine {
                id: "line-1".to_string(),
                quantity: 1,
                cost: CartLineCost {
                    total_amount: Money {
                        amount: "10.00".to_string(),
                        currency_code: "USD".to_string(),
                    },
                },
                merchandise: CartMerchandise {
                    id: "variant-1".to_string(),
                    title: "Default Title".to_string(),
                    product_title: "Sea Salt".to_string(),
                    price: Money {
                        amount: "10.00".to_string(),
                        currency_code: "USD".to_string(),
                    },
                    image_url: None,
                },
            }],
        }
    }

    /// Gateway whose first mutation reports an invalid cart and whose
    /// create-retry succeeds.
    struct RecoveringGateway {
        calls: RefCell<Vec<String>>,
    }

    impl CartGateway for RecoveringGateway {
        async fn create(&self, variant_id: &str) -> Outcome {
            self.calls.borrow_mut().push(format!("create {variant_id}"));
            Outcome::Success(sample_cart("gid://cart/B"))
        }

        async fn add(&self, _cart_id: &CartId, variant_id: &str) -> Outcome {
            self.calls.borrow_mut().push(format!("add {variant_id}"));
            Outcome::Failure(FailureKind::InvalidCart)
        }

        async fn remove(&self, _cart_id: &CartId, _line_id: &str) -> Outcome {
            unreachable!("not exercised")
        }

        async fn update(&self, _cart_id: &CartId, _line_id: &str, _quantity: u32) -> Outcome {
            unreachable!("not exercised")
        }

        async fn fetch(&self, _cart_id: &CartId) -> FetchOutcome {
            unreachable!("not exercised")
        }
    }

    #[tokio::test]
    async fn test_recovery_chain_runs_inside_one_handle_call() {
        let gateway = RecoveringGateway {
            calls: RefCell::new(Vec::new()),
        };
        let store = MemoryCartIdStore::with_id(CartId::from("gid://cart/A"));
        let mut controller = CartController::new(gateway, store, NullRenderer);

        controller
            .handle(UiEvent::AddToCart {
                variant_id: "variant-1".to_string(),
            })
            .await;

        assert_eq!(
            *controller.gateway.calls.borrow(),
            vec!["add variant-1".to_string(), "create variant-1".to_string()]
        );
        assert_eq!(
            controller.engine().tracked_id(),
            Some(CartId::from("gid://cart/B"))
        );
        assert!(!controller.engine().is_busy());
    }

    #[tokio::test]
    async fn test_always_invalid_backend_produces_exactly_one_retry() {
        let gateway = AlwaysInvalidGateway::default();
        let store = MemoryCartIdStore::with_id(CartId::from("gid://cart/A"));
        let mut controller = CartController::new(gateway, store, NullRenderer);

        controller
            .handle(UiEvent::AddToCart {
                variant_id: "variant-1".to_string(),
            })
            .await;

        // One original call plus one bounded retry, then idle. Never a loop.
        assert_eq!(
            *controller.gateway.calls.borrow(),
            vec!["add variant-1".to_string(), "create variant-1".to_string()]
        );
        assert!(!controller.engine().is_busy());
        assert!(controller.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_without_identifier_calls_nothing() {
        let gateway = AlwaysInvalidGateway::default();
        let mut controller =
            CartController::new(gateway, MemoryCartIdStore::new(), NullRenderer);

        controller.bootstrap().await;

        assert!(controller.gateway.calls.borrow().is_empty());
        assert!(controller.snapshot().is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_invalid_fetch_clears_store_without_retry() {
        let gateway = AlwaysInvalidGateway::default();
        let store = MemoryCartIdStore::with_id(CartId::from("gid://cart/A"));
        let mut controller = CartController::new(gateway, store, NullRenderer);

        controller.bootstrap().await;

        // The fetch is not subject to the create-retry path.
        assert_eq!(*controller.gateway.calls.borrow(), vec!["fetch".to_string()]);
        assert_eq!(controller.engine().tracked_id(), None);
        assert!(controller.snapshot().is_none());
    }
}
