//! León de Guerrero cart engine.
//!
//! Owns the shopper's cart: an ordered list of line items persisted under a
//! single storage key, derived totals that recompute on every mutation, and a
//! transient open/closed flag for the cart drawer.
//!
//! # Architecture
//!
//! - [`CartEngine`] is the only writer. Every mutation persists first and
//!   then commits to memory, so storage and memory never disagree.
//! - Storage is an injected [`KeyValueStore`] port: [`MemoryStore`] for tests
//!   and embedding, [`FileStore`] for the CLI.
//! - Derived views ([`CartEngine::total`], [`CartEngine::item_count`]) are
//!   [`Observable`]s; subscribers are called synchronously.
//!
//! # Example
//!
//! ```rust
//! use leon_cart::{CartEngine, MemoryStore};
//! use leon_core::Product;
//! use rust_decimal::Decimal;
//!
//! let mut cart = CartEngine::open(MemoryStore::new())?;
//! let espadin = Product::new("p1", "Espadín Clásico", "85.00");
//!
//! cart.add_to_cart(espadin.clone(), 2)?;
//! cart.add_one(espadin)?;
//! assert_eq!(cart.item_count(), 3);
//! assert_eq!(cart.total(), Decimal::new(25500, 2));
//!
//! cart.update_quantity("p1", 0)?;
//! assert!(cart.is_empty());
//! # Ok::<(), leon_cart::CartError>(())
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod engine;
pub mod error;
pub mod line_item;
pub mod observable;
pub mod storage;

pub use engine::{CART_STORAGE_KEY, CartEngine, Channel, PricePolicy, Subscription};
pub use error::{CartError, ParsePricePolicyError};
pub use line_item::{CartLineItem, CartSnapshot};
pub use observable::{ListenerId, Observable};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
