//! Tidewater Core - Shared cart data contracts.
//!
//! This crate provides the types shared between the Tidewater components:
//! - `engine` - Client-side cart synchronization engine
//! - `gateway` - Server-side proxy to the Shopify Storefront API
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Both sides
//! of the cart wire contract serialize through the same definitions, so they
//! cannot drift apart.
//!
//! # Modules
//!
//! - [`types`] - Cart snapshots, intents, and outcomes
//! - [`wire`] - The engine/gateway request and response bodies

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod wire;

pub use types::*;
