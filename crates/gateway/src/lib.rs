//! Tidewater Gateway library.
//!
//! This crate provides the cart gateway as a library, allowing it to be
//! tested and reused. The gateway is a stateless per-request proxy: it
//! receives a cart intent, issues the corresponding Shopify Storefront API
//! mutation, classifies the result, and returns a normalized response.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod shopify;
pub mod state;
