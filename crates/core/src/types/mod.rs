//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod page;
pub mod price;
pub mod product;
pub mod status;

pub use id::*;
pub use page::Page;
pub use price::{CurrencyCode, Price, PriceError, parse_price};
pub use product::{Product, ProductCategory, ProductImage, ProductionDetails, TastingNotes};
pub use status::*;
