//! Shopfront Core - Shared domain types.
//!
//! This crate provides the records exchanged between the Shopfront API, its
//! CLI and its tests:
//! - `api` - JSON API over the document store
//! - `cli` - Migrations, catalog seeding and inspection
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Every type serializes to the exact document layout persisted in the store
//! (`camelCase` field names, `_id` for store-native identifiers).
//!
//! # Modules
//!
//! - [`types`] - Identifiers, catalog products, orders, SKUs and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
