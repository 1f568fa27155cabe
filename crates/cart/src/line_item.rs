//! Cart line items and snapshots.

use leon_core::{Price, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CartError;

/// One product in the cart with its quantity and denormalized subtotal.
///
/// `subtotal == quantity * unit price` holds for every line item the engine
/// hands out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product snapshot taken when the line was last added to.
    pub product: Product,
    /// Number of units, always at least 1.
    pub quantity: u32,
    /// `quantity * unit_price`.
    pub subtotal: Decimal,
}

impl CartLineItem {
    /// Create a line item, computing the subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::SubtotalOverflow`] if the subtotal does not fit
    /// in a [`Decimal`].
    pub fn new(product: Product, quantity: u32, unit_price: Decimal) -> Result<Self, CartError> {
        let subtotal = subtotal_of(&product, quantity, unit_price)?;
        Ok(Self {
            product,
            quantity,
            subtotal,
        })
    }

    /// Set the quantity and recompute the subtotal. On error the line is
    /// left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::SubtotalOverflow`] if the subtotal does not fit
    /// in a [`Decimal`].
    pub fn set_quantity(&mut self, quantity: u32, unit_price: Decimal) -> Result<(), CartError> {
        self.subtotal = subtotal_of(&self.product, quantity, unit_price)?;
        self.quantity = quantity;
        Ok(())
    }

    /// Subtotal as a displayable price.
    #[must_use]
    pub fn subtotal_price(&self) -> Price {
        Price::usd(self.subtotal)
    }
}

/// Point-in-time copy of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Line items in insertion order.
    pub items: Vec<CartLineItem>,
    /// Sum of all subtotals.
    pub total: Decimal,
    /// Sum of all quantities.
    pub item_count: u64,
}

impl CartSnapshot {
    /// Build a snapshot from line items, deriving the totals.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the subtotals do not sum to a
    /// representable [`Decimal`].
    pub fn from_items(items: Vec<CartLineItem>) -> Result<Self, CartError> {
        Ok(Self {
            total: total_of(&items).ok_or(CartError::TotalOverflow)?,
            item_count: item_count_of(&items),
            items,
        })
    }

    /// Total as a displayable price.
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::usd(self.total)
    }
}

fn subtotal_of(product: &Product, quantity: u32, unit_price: Decimal) -> Result<Decimal, CartError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| CartError::SubtotalOverflow(product.id.clone()))
}

/// Sum of subtotals, or `None` on overflow. Zero for an empty cart.
pub(crate) fn total_of(items: &[CartLineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.subtotal))
}

/// Sum of quantities. Zero for an empty cart.
pub(crate) fn item_count_of(items: &[CartLineItem]) -> u64 {
    items.iter().map(|line| u64::from(line.quantity)).sum()
}
