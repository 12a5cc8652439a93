//! The cart synchronization state machine.
//!
//! Two states: `Idle` (no mutation in flight) and `Busy` (exactly one). The
//! busy flag is the sole mutual-exclusion primitive; intents arriving while
//! busy are dropped rather than queued, because the backend offers no
//! compare-and-swap on cart state and ordering beyond "one mutation completes
//! before the next is accepted" cannot be guaranteed anyway.
//!
//! The engine is sans-IO: it decides *what* gateway call to make and hands a
//! [`Dispatch`] to its driver, which performs the call and feeds the
//! [`Outcome`] back through [`SyncEngine::resolve`]. The debounce timer is
//! plain `Instant` arithmetic, so tests advance virtual time instead of
//! sleeping.

use std::time::{Duration, Instant};

use tidewater_core::{Cart, CartId, FailureKind, FetchOutcome, Intent, Outcome};
use tracing::{debug, warn};

use crate::events::{QuantityStep, UiEvent};
use crate::store::CartIdStore;

/// Quiescence window for free-text quantity edits. A new keystroke within
/// the window restarts it; the timer is reset, never accumulated.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

/// Consumer of cart snapshots.
///
/// The renderer only reads: it redraws from the snapshot and busy flag and
/// never mutates engine state. An absent snapshot (or an empty cart) must be
/// displayed as an explicit empty state.
pub trait CartRenderer {
    /// Redraw from the current snapshot and busy flag.
    fn render(&mut self, snapshot: Option<&Cart>, busy: bool);
}

/// A gateway call the engine wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// The intent to send.
    pub intent: Intent,
    /// The tracked cart identifier to send it against (`None` for create).
    pub cart_id: Option<CartId>,
}

/// The mutation chain currently in flight.
#[derive(Debug)]
struct InFlight {
    /// Intent currently awaiting its outcome (for diagnostics).
    intent: Intent,
    /// Merchandise reference that started the chain, kept so an invalid-cart
    /// failure can be recovered by recreating the cart from scratch.
    origin_variant: Option<String>,
    /// Whether the one bounded recovery attempt has been spent.
    recovered: bool,
}

/// A held quantity edit waiting out the quiescence window.
#[derive(Debug, Clone)]
struct PendingEdit {
    line_id: String,
    quantity: u32,
    deadline: Instant,
}

/// The cart synchronization engine.
///
/// Owns the authoritative snapshot, the busy flag, the identifier store, and
/// the pending debounced edit. Constructed once per session; runs for the
/// lifetime of the page with no terminal state.
pub struct SyncEngine<S, R> {
    store: S,
    renderer: R,
    snapshot: Option<Cart>,
    in_flight: Option<InFlight>,
    pending_edit: Option<PendingEdit>,
}

impl<S: CartIdStore, R: CartRenderer> SyncEngine<S, R> {
    /// Create an idle engine with an empty snapshot.
    pub const fn new(store: S, renderer: R) -> Self {
        Self {
            store,
            renderer,
            snapshot: None,
            in_flight: None,
            pending_edit: None,
        }
    }

    /// The last-known-good snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Cart> {
        self.snapshot.as_ref()
    }

    /// Whether a mutation is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether a quantity edit is waiting out the quiescence window.
    #[must_use]
    pub const fn has_pending_edit(&self) -> bool {
        self.pending_edit.is_some()
    }

    /// The identifier currently tracked by the store.
    #[must_use]
    pub fn tracked_id(&self) -> Option<CartId> {
        self.store.get()
    }

    // =========================================================================
    // Bootstrap
    // =========================================================================

    /// The identifier to fetch at startup, if one is stored.
    ///
    /// With no stored identifier there is nothing to fetch and zero gateway
    /// calls are made.
    #[must_use]
    pub fn bootstrap_call(&self) -> Option<CartId> {
        self.store.get()
    }

    /// Apply the startup fetch result (`None` when no identifier was stored).
    ///
    /// A missing cart or an invalid identifier clears the store; any other
    /// fetch failure fails open to an empty cart for this session without
    /// touching the stored identifier. The fetch never enters the
    /// create-retry path.
    pub fn finish_bootstrap(&mut self, outcome: Option<FetchOutcome>) {
        match outcome {
            Some(FetchOutcome::Found(cart)) => {
                debug!(cart_id = %cart.id, total_quantity = cart.total_quantity, "bootstrap: cart restored");
                self.snapshot = Some(cart);
            }
            Some(FetchOutcome::Missing | FetchOutcome::Failed(FailureKind::InvalidCart)) => {
                debug!("bootstrap: stored cart id no longer usable, clearing");
                self.store.clear();
                self.snapshot = None;
            }
            Some(FetchOutcome::Failed(kind)) => {
                warn!(?kind, "bootstrap fetch failed, starting session with empty cart");
                self.snapshot = None;
            }
            None => {
                self.snapshot = None;
            }
        }
        self.renderer.render(self.snapshot.as_ref(), false);
    }

    // =========================================================================
    // Dispatch (Idle -> Busy)
    // =========================================================================

    /// Normalize a UI event and, if it results in an immediate intent,
    /// dispatch it.
    ///
    /// Returns the gateway call to perform, or `None` when the event only
    /// armed the debounce window, was dropped because a mutation is already
    /// in flight, or normalized to nothing.
    pub fn handle(&mut self, event: UiEvent, now: Instant) -> Option<Dispatch> {
        match event {
            UiEvent::AddToCart { variant_id } => {
                let intent = if self.store.get().is_some() {
                    Intent::Add { variant_id }
                } else {
                    Intent::Create { variant_id }
                };
                self.dispatch(intent)
            }
            UiEvent::RemoveLine { line_id } => self.dispatch(Intent::Remove { line_id }),
            UiEvent::StepQuantity {
                line_id,
                step,
                input_value,
            } => {
                let intent = self.step_intent(&line_id, step, input_value.as_deref());
                self.dispatch(intent)
            }
            UiEvent::QuantityInput { line_id, value } => self.quantity_input(line_id, &value, now),
        }
    }

    /// Fire a due debounced edit. Call this from the driver's timer tick.
    pub fn poll(&mut self, now: Instant) -> Option<Dispatch> {
        if !self
            .pending_edit
            .as_ref()
            .is_some_and(|edit| edit.deadline <= now)
        {
            return None;
        }
        let edit = self.pending_edit.take()?;
        self.dispatch(Intent::Update {
            line_id: edit.line_id,
            quantity: edit.quantity,
        })
    }

    /// Derive the stepper intent for a line.
    ///
    /// The base quantity is the displayed input value when it parses, else
    /// the last authoritative quantity for the line, else 0 when the line is
    /// gone. A result of zero or less removes the line instead of storing a
    /// zero quantity.
    fn step_intent(&self, line_id: &str, step: QuantityStep, input_value: Option<&str>) -> Intent {
        let base: i64 = input_value
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(|| {
                self.snapshot
                    .as_ref()
                    .and_then(|cart| cart.find_line(line_id))
                    .map_or(0, |line| i64::from(line.quantity))
            });
        let next = match step {
            QuantityStep::Increment => base + 1,
            QuantityStep::Decrement => base - 1,
        };
        if next <= 0 {
            Intent::Remove {
                line_id: line_id.to_string(),
            }
        } else {
            Intent::Update {
                line_id: line_id.to_string(),
                quantity: u32::try_from(next).unwrap_or(u32::MAX),
            }
        }
    }

    /// Handle a free-text quantity keystroke.
    ///
    /// An explicit `0` bypasses the window and removes the line right away;
    /// a positive value restarts the window; anything unparseable cancels
    /// whatever was pending without dispatching.
    fn quantity_input(&mut self, line_id: String, value: &str, now: Instant) -> Option<Dispatch> {
        let trimmed = value.trim();
        if trimmed == "0" {
            self.pending_edit = None;
            return self.dispatch(Intent::Remove { line_id });
        }
        match trimmed.parse::<u32>() {
            Ok(quantity) if quantity >= 1 => {
                self.pending_edit = Some(PendingEdit {
                    line_id,
                    quantity,
                    deadline: now + DEBOUNCE_WINDOW,
                });
            }
            _ => {
                self.pending_edit = None;
            }
        }
        None
    }

    fn dispatch(&mut self, intent: Intent) -> Option<Dispatch> {
        if self.in_flight.is_some() {
            debug!(kind = intent.kind(), "intent dropped while busy");
            return None;
        }

        let cart_id = match intent {
            Intent::Create { .. } => None,
            _ => self.store.get(),
        };
        debug!(kind = intent.kind(), cart_id = ?cart_id, "dispatching intent");

        self.in_flight = Some(InFlight {
            origin_variant: intent.merchandise_ref().map(ToString::to_string),
            intent: intent.clone(),
            recovered: false,
        });
        self.renderer.render(self.snapshot.as_ref(), true);
        Some(Dispatch { intent, cart_id })
    }

    // =========================================================================
    // Resolve (Busy -> Idle)
    // =========================================================================

    /// Apply a gateway outcome.
    ///
    /// Returns a follow-up [`Dispatch`] only for the single bounded
    /// invalid-cart recovery; every other path returns the engine to idle.
    /// The busy flag is never left set across a failure.
    pub fn resolve(&mut self, outcome: Outcome) -> Option<Dispatch> {
        let Some(chain) = self.in_flight.take() else {
            warn!("outcome received with no intent in flight, discarding");
            return None;
        };

        match outcome {
            Outcome::Success(cart) => {
                if self.store.get().is_none() {
                    self.store.set(&cart.id);
                }
                debug!(
                    kind = chain.intent.kind(),
                    cart_id = %cart.id,
                    total_quantity = cart.total_quantity,
                    "mutation applied"
                );
                self.snapshot = Some(cart);
                self.renderer.render(self.snapshot.as_ref(), false);
                None
            }
            Outcome::Failure(FailureKind::InvalidCart) => {
                self.store.clear();
                match chain.origin_variant {
                    Some(variant_id) if !chain.recovered => {
                        warn!(
                            kind = chain.intent.kind(),
                            "backend reports invalid cart, recreating once"
                        );
                        let intent = Intent::Create {
                            variant_id: variant_id.clone(),
                        };
                        self.in_flight = Some(InFlight {
                            intent: intent.clone(),
                            origin_variant: Some(variant_id),
                            recovered: true,
                        });
                        Some(Dispatch {
                            intent,
                            cart_id: None,
                        })
                    }
                    _ => {
                        // Either a line-targeted intent with no recovery
                        // target, or the one retry was already spent.
                        warn!(
                            kind = chain.intent.kind(),
                            "invalid cart with no recovery target, reverting"
                        );
                        self.renderer.render(self.snapshot.as_ref(), false);
                        None
                    }
                }
            }
            Outcome::Failure(kind) => {
                warn!(?kind, intent = chain.intent.kind(), "mutation failed, reverting");
                self.renderer.render(self.snapshot.as_ref(), false);
                None
            }
        }
    }
}
