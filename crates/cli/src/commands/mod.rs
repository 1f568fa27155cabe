//! CLI subcommand implementations.

pub mod cart;
pub mod catalog;

use leon_cart::CartError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// No product with the given slug in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No content page with the given slug.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Product exists but cannot be bought.
    #[error("Product is out of stock: {0}")]
    OutOfStock(String),

    /// Quantity argument out of range.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}
