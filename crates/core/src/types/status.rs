//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Product stock status.
///
/// Serialized with the `WPGraphQL` enum spelling (`IN_STOCK`, ...). The
/// `WooCommerce` REST spelling (`instock`, ...) is accepted by [`FromStr`].
///
/// [`FromStr`]: std::str::FromStr
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
    OnBackorder,
}

impl StockStatus {
    /// Whether a shopper may put the product in the cart.
    ///
    /// Backordered products can still be bought.
    #[must_use]
    pub const fn is_purchasable(self) -> bool {
        !matches!(self, Self::OutOfStock)
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InStock => write!(f, "IN_STOCK"),
            Self::OutOfStock => write!(f, "OUT_OF_STOCK"),
            Self::OnBackorder => write!(f, "ON_BACKORDER"),
        }
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_STOCK" | "instock" => Ok(Self::InStock),
            "OUT_OF_STOCK" | "outofstock" => Ok(Self::OutOfStock),
            "ON_BACKORDER" | "onbackorder" => Ok(Self::OnBackorder),
            _ => Err(format!("invalid stock status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_serde() {
        let json = serde_json::to_string(&StockStatus::OnBackorder).unwrap();
        assert_eq!(json, "\"ON_BACKORDER\"");

        let status: StockStatus = serde_json::from_str("\"OUT_OF_STOCK\"").unwrap();
        assert_eq!(status, StockStatus::OutOfStock);
    }

    #[test]
    fn test_stock_status_from_rest_spelling() {
        assert_eq!("instock".parse(), Ok(StockStatus::InStock));
        assert_eq!("onbackorder".parse(), Ok(StockStatus::OnBackorder));
        assert!("discontinued".parse::<StockStatus>().is_err());
    }

    #[test]
    fn test_purchasable() {
        assert!(StockStatus::InStock.is_purchasable());
        assert!(StockStatus::OnBackorder.is_purchasable());
        assert!(!StockStatus::OutOfStock.is_purchasable());
    }
}
