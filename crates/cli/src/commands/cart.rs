//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! leon cart add espadin-clasico -q 2
//! leon cart update 1 3
//! leon cart remove 1
//! leon cart show
//! leon cart clear
//! ```
//!
//! The cart is persisted under `LEON_DATA_DIR` between invocations.

use leon_cart::{CartEngine, CartSnapshot, KeyValueStore};
use leon_catalog::Catalog;
use leon_core::Price;

use super::CliError;

/// Log the cart contents and return a snapshot of them.
pub fn show<S: KeyValueStore>(engine: &CartEngine<S>) -> CartSnapshot {
    let snapshot = engine.get_cart();

    if snapshot.items.is_empty() {
        tracing::info!("Cart is empty");
        return snapshot;
    }

    for line in &snapshot.items {
        tracing::info!(
            id = %line.product.id,
            quantity = line.quantity,
            "{} x{} {}",
            line.product.name,
            line.quantity,
            line.subtotal_price()
        );
    }
    tracing::info!(
        items = snapshot.item_count,
        "Total: {}",
        snapshot.total_price()
    );
    snapshot
}

/// Look up a product by slug and add it to the cart.
///
/// # Errors
///
/// Returns an error if the product is unknown, out of stock, or the cart
/// cannot be persisted.
pub async fn add<S, C>(
    engine: &mut CartEngine<S>,
    catalog: &C,
    slug: &str,
    quantity: u32,
) -> Result<(), CliError>
where
    S: KeyValueStore,
    C: Catalog,
{
    if quantity == 0 {
        return Err(CliError::InvalidQuantity(
            "quantity must be at least 1".to_string(),
        ));
    }

    let product = catalog
        .product_by_slug(slug)
        .await
        .ok_or_else(|| CliError::ProductNotFound(slug.to_string()))?;

    if !product.is_purchasable() {
        return Err(CliError::OutOfStock(product.name));
    }

    let name = product.name.clone();
    let id = product.id.clone();
    engine.add_to_cart(product, quantity)?;

    let in_cart = engine.line(id.as_str()).map_or(0, |line| line.quantity);
    tracing::info!(%id, quantity, in_cart, "Added {name} to cart");
    show_total(engine);
    Ok(())
}

/// Remove a line item by product ID.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
pub fn remove<S: KeyValueStore>(
    engine: &mut CartEngine<S>,
    product_id: &str,
) -> Result<(), CliError> {
    if engine.line(product_id).is_none() {
        tracing::warn!(id = product_id, "Product is not in the cart");
        return Ok(());
    }

    engine.remove_from_cart(product_id)?;
    tracing::info!(id = product_id, "Removed from cart");
    show_total(engine);
    Ok(())
}

/// Set a line item's quantity; zero or less removes it.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
pub fn update<S: KeyValueStore>(
    engine: &mut CartEngine<S>,
    product_id: &str,
    quantity: i64,
) -> Result<(), CliError> {
    if engine.line(product_id).is_none() && quantity > 0 {
        tracing::warn!(id = product_id, "Product is not in the cart");
        return Ok(());
    }

    engine.update_quantity(product_id, quantity)?;
    if quantity <= 0 {
        tracing::info!(id = product_id, "Removed from cart");
    } else {
        tracing::info!(id = product_id, quantity, "Updated quantity");
    }
    show_total(engine);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the cart cannot be persisted.
pub fn clear<S: KeyValueStore>(engine: &mut CartEngine<S>) -> Result<(), CliError> {
    engine.clear_cart()?;
    tracing::info!("Cart cleared");
    Ok(())
}

fn show_total<S: KeyValueStore>(engine: &CartEngine<S>) {
    tracing::info!(
        items = engine.item_count(),
        "Cart total: {}",
        Price::usd(engine.total())
    );
}
