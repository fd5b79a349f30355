//! Shopfront JSON API library.
//!
//! Serves the product catalog, order intake and SKU inventory over a
//! document store. The binary in `main.rs` wires configuration, logging and
//! Sentry around [`routes::app`]; the integration tests drive the same router
//! against substitute stores.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
pub use state::AppState;
