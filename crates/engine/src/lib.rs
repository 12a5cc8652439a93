//! Tidewater Engine - client-side cart synchronization.
//!
//! The engine sits between a UI and the cart gateway. It serializes user
//! intents into a single well-ordered stream of mutations, reconciles
//! optimistic UI with authoritative responses, and recovers automatically
//! when the backend reports the tracked cart identifier as invalid.
//!
//! # Architecture
//!
//! - [`engine::SyncEngine`] - synchronous, sans-IO state machine. Owns the
//!   cart snapshot, the busy flag, and the debounce window; suspension only
//!   ever happens outside it, so tests drive it with virtual time.
//! - [`controller::CartController`] - thin async driver that executes the
//!   gateway calls the engine requests and feeds outcomes back.
//! - [`gateway::CartGateway`] - injectable boundary to the backend proxy,
//!   with [`gateway::HttpGateway`] as the production implementation.
//! - [`store::CartIdStore`] - durable single-key storage for the cart
//!   identifier.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidewater_engine::{CartController, FileCartIdStore, HttpGateway, UiEvent};
//!
//! let gateway = HttpGateway::new("https://shop.example".to_string());
//! let store = FileCartIdStore::new("~/.cache/tidewater/cart-id".into());
//! let mut controller = CartController::new(gateway, store, renderer);
//!
//! controller.bootstrap().await;
//! controller.handle(UiEvent::AddToCart { variant_id: "gid://...".into() }).await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod controller;
pub mod engine;
pub mod events;
pub mod gateway;
pub mod store;

pub use controller::CartController;
pub use engine::{CartRenderer, DEBOUNCE_WINDOW, Dispatch, SyncEngine};
pub use events::{QuantityStep, UiEvent};
pub use gateway::{CartGateway, HttpGateway};
pub use store::{CartIdStore, FileCartIdStore, MemoryCartIdStore};
