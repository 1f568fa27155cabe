//! León de Guerrero Core - Shared types library.
//!
//! This crate provides common types used across all storefront components:
//! - `cart` - Durable, observable shopping-cart engine
//! - `catalog` - Product catalog sources (fixtures, `WPGraphQL`, `WooCommerce` REST)
//! - `cli` - Command-line front end for the cart and catalog
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, stock statuses and product snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
