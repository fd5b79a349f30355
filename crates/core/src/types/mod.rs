//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers and records for the catalog,
//! orders and inventory.

pub mod id;
pub mod order;
pub mod product;
pub mod sku;
pub mod status;

pub use id::*;
pub use order::{Address, Order, OrderItem, OrderRequest, UserDetails};
pub use product::{Product, ProductIdRecord, RawDocument};
pub use sku::{NewSku, Sku};
pub use status::*;
