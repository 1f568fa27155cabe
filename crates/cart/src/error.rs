//! Cart engine errors.

use leon_core::{PriceError, ProductId};
use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by cart mutations.
///
/// A mutation that fails leaves the cart exactly as it was.
#[derive(Debug, Error)]
pub enum CartError {
    /// Persisting the cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The product price could not be parsed and the engine runs with
    /// [`PricePolicy::Strict`](crate::PricePolicy::Strict).
    #[error("Invalid price for product {product_id}: {source}")]
    InvalidPrice {
        product_id: ProductId,
        #[source]
        source: PriceError,
    },

    /// The requested quantity does not fit in a line item.
    #[error("Quantity overflow for product {0}")]
    QuantityOverflow(ProductId),

    /// Quantity times unit price does not fit in a decimal.
    #[error("Subtotal overflow for product {0}")]
    SubtotalOverflow(ProductId),

    /// The sum of all subtotals does not fit in a decimal.
    #[error("Cart total overflow")]
    TotalOverflow,
}

/// Unrecognized [`PricePolicy`](crate::PricePolicy) name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid price policy '{0}', expected lenient or strict")]
pub struct ParsePricePolicyError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::QuantityOverflow(ProductId::new("p1"));
        assert_eq!(err.to_string(), "Quantity overflow for product p1");

        let err = CartError::InvalidPrice {
            product_id: ProductId::new("p2"),
            source: PriceError::Missing,
        };
        assert_eq!(err.to_string(), "Invalid price for product p2: price is missing");

        let err = CartError::SubtotalOverflow(ProductId::new("p3"));
        assert_eq!(err.to_string(), "Subtotal overflow for product p3");
    }

    #[test]
    fn test_parse_policy_error_display() {
        let err = ParsePricePolicyError("loose".to_string());
        assert_eq!(
            err.to_string(),
            "invalid price policy 'loose', expected lenient or strict"
        );
    }
}
