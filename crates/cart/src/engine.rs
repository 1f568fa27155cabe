//! The cart state engine.

use std::fmt;
use std::str::FromStr;

use leon_core::{Product, ProductId};
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::error::{CartError, ParsePricePolicyError};
use crate::line_item::{CartLineItem, CartSnapshot, item_count_of, total_of};
use crate::observable::{ListenerId, Observable};
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the serialized line items.
pub const CART_STORAGE_KEY: &str = "cart-items";

/// What to do when a product's price text cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricePolicy {
    /// Treat the price as zero and log a warning.
    #[default]
    Lenient,
    /// Reject the mutation with [`CartError::InvalidPrice`].
    Strict,
}

impl FromStr for PricePolicy {
    type Err = ParsePricePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(ParsePricePolicyError(s.to_string())),
        }
    }
}

/// Observable channels exposed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Items,
    Total,
    ItemCount,
    Open,
}

/// Handle returned by the `subscribe_*` methods; pass it to
/// [`CartEngine::unsubscribe`].
#[must_use = "dropping the handle makes it impossible to unsubscribe"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription {
    channel: Channel,
    id: ListenerId,
}

impl Subscription {
    /// Channel this subscription listens on.
    #[must_use]
    pub const fn channel(&self) -> Channel {
        self.channel
    }
}

/// Shopping cart backed by a [`KeyValueStore`].
///
/// Line items are unique by product ID and kept in insertion order. Every
/// mutation serializes the new item list, writes it to the store, and only
/// then updates memory and notifies subscribers. A failed write changes
/// nothing.
///
/// The open/closed flag is presentation state: it is never persisted and
/// starts closed for every engine.
pub struct CartEngine<S> {
    store: S,
    policy: PricePolicy,
    items: Observable<Vec<CartLineItem>>,
    total: Observable<Decimal>,
    item_count: Observable<u64>,
    is_open: Observable<bool>,
}

impl<S: KeyValueStore> CartEngine<S> {
    /// Load the cart from `store` with [`PricePolicy::Lenient`].
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the store cannot be read.
    pub fn open(store: S) -> Result<Self, CartError> {
        Self::with_policy(store, PricePolicy::default())
    }

    /// Load the cart from `store` with an explicit price policy.
    ///
    /// A missing key yields an empty cart. A stored value that does not
    /// decode is logged and replaced by an empty cart on the next write.
    /// Stored subtotals are never trusted: each one is recomputed from the
    /// stored product price under `policy`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the store cannot be read.
    pub fn with_policy(store: S, policy: PricePolicy) -> Result<Self, CartError> {
        let items = load_items(&store, policy)?;
        let total = total_of(&items).ok_or(CartError::TotalOverflow)?;
        debug!(lines = items.len(), ?policy, "Cart rehydrated");

        Ok(Self {
            total: Observable::new(total),
            item_count: Observable::new(item_count_of(&items)),
            items: Observable::new(items),
            is_open: Observable::new(false),
            store,
            policy,
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add `quantity` units of `product`.
    ///
    /// If the product is already in the cart its quantity is increased and
    /// the stored snapshot is replaced by `product`, so the subtotal always
    /// reflects the latest known price. Adding zero units does nothing.
    ///
    /// # Errors
    ///
    /// - [`CartError::InvalidPrice`] under [`PricePolicy::Strict`]
    /// - [`CartError::QuantityOverflow`] if the new quantity exceeds `u32::MAX`
    /// - [`CartError::SubtotalOverflow`] or [`CartError::TotalOverflow`] if
    ///   the amounts do not fit in a decimal
    /// - [`CartError::Storage`] if persisting fails
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(&mut self, product: Product, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            debug!("Ignoring add of zero units");
            return Ok(());
        }

        let unit_price = self.unit_price(&product)?;
        let mut items = self.items.get().clone();

        match items.iter_mut().find(|line| line.product.id == product.id) {
            Some(line) => {
                let merged = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| CartError::QuantityOverflow(product.id.clone()))?;
                line.product = product;
                line.set_quantity(merged, unit_price)?;
            }
            None => items.push(CartLineItem::new(product, quantity, unit_price)?),
        }

        self.commit(items)
    }

    /// Add a single unit of `product`.
    ///
    /// # Errors
    ///
    /// See [`CartEngine::add_to_cart`].
    pub fn add_one(&mut self, product: Product) -> Result<(), CartError> {
        self.add_to_cart(product, 1)
    }

    /// Remove the line for `product_id`. Absent products are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if persisting fails.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, product_id: &str) -> Result<(), CartError> {
        if self.line(product_id).is_none() {
            debug!("Product not in cart");
            return Ok(());
        }

        let items = self
            .items
            .get()
            .iter()
            .filter(|line| line.product.id.as_str() != product_id)
            .cloned()
            .collect();

        self.commit(items)
    }

    /// Set the quantity for `product_id`.
    ///
    /// A quantity of zero or below removes the line. The subtotal is
    /// recomputed from the stored product snapshot. Absent products are
    /// ignored.
    ///
    /// # Errors
    ///
    /// - [`CartError::QuantityOverflow`] if `quantity` exceeds `u32::MAX`
    /// - [`CartError::InvalidPrice`] under [`PricePolicy::Strict`]
    /// - [`CartError::SubtotalOverflow`] or [`CartError::TotalOverflow`] if
    ///   the amounts do not fit in a decimal
    /// - [`CartError::Storage`] if persisting fails
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_from_cart(product_id);
        }

        let quantity = u32::try_from(quantity)
            .map_err(|_| CartError::QuantityOverflow(ProductId::new(product_id)))?;

        let mut items = self.items.get().clone();
        let Some(line) = items
            .iter_mut()
            .find(|line| line.product.id.as_str() == product_id)
        else {
            debug!("Product not in cart");
            return Ok(());
        };

        let unit_price = self.unit_price(&line.product)?;
        line.set_quantity(quantity, unit_price)?;

        self.commit(items)
    }

    /// Remove every line. Calling it on an empty cart is harmless.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if persisting fails.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        self.commit(Vec::new())
    }

    /// Flip the open/closed flag.
    pub fn toggle_cart(&mut self) {
        let open = !*self.is_open.get();
        self.is_open.set(open);
    }

    /// Show the cart.
    pub fn open_cart(&mut self) {
        self.is_open.set(true);
    }

    /// Hide the cart.
    pub fn close_cart(&mut self) {
        self.is_open.set(false);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Consistent copy of the items and derived totals.
    #[must_use]
    pub fn get_cart(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.get().clone(),
            total: *self.total.get(),
            item_count: *self.item_count.get(),
        }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        self.items.get()
    }

    /// Line for `product_id`, if present.
    #[must_use]
    pub fn line(&self, product_id: &str) -> Option<&CartLineItem> {
        self.items
            .get()
            .iter()
            .find(|line| line.product.id.as_str() == product_id)
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        *self.total.get()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        *self.item_count.get()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.get().is_empty()
    }

    /// Whether the cart drawer is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        *self.is_open.get()
    }

    /// Price policy in effect.
    #[must_use]
    pub const fn policy(&self) -> PricePolicy {
        self.policy
    }

    /// Backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Subscribe to the item list. Called on every mutation.
    pub fn subscribe_items(
        &mut self,
        listener: impl FnMut(&Vec<CartLineItem>) + 'static,
    ) -> Subscription {
        Subscription {
            channel: Channel::Items,
            id: self.items.subscribe(listener),
        }
    }

    /// Subscribe to the cart total. Called when the total changes.
    pub fn subscribe_total(&mut self, listener: impl FnMut(&Decimal) + 'static) -> Subscription {
        Subscription {
            channel: Channel::Total,
            id: self.total.subscribe(listener),
        }
    }

    /// Subscribe to the item count. Called when the count changes.
    pub fn subscribe_item_count(&mut self, listener: impl FnMut(&u64) + 'static) -> Subscription {
        Subscription {
            channel: Channel::ItemCount,
            id: self.item_count.subscribe(listener),
        }
    }

    /// Subscribe to the open/closed flag. Called when it flips.
    pub fn subscribe_open(&mut self, listener: impl FnMut(&bool) + 'static) -> Subscription {
        Subscription {
            channel: Channel::Open,
            id: self.is_open.subscribe(listener),
        }
    }

    /// Remove a subscription. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        match subscription.channel {
            Channel::Items => self.items.unlisten(subscription.id),
            Channel::Total => self.total.unlisten(subscription.id),
            Channel::ItemCount => self.item_count.unlisten(subscription.id),
            Channel::Open => self.is_open.unlisten(subscription.id),
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn unit_price(&self, product: &Product) -> Result<Decimal, CartError> {
        resolve_unit_price(product, self.policy)
    }

    /// Persist `items`, then publish them and the derived views.
    fn commit(&mut self, items: Vec<CartLineItem>) -> Result<(), CartError> {
        let total = total_of(&items).ok_or(CartError::TotalOverflow)?;
        let item_count = item_count_of(&items);

        let encoded = serde_json::to_string(&items).map_err(StorageError::from)?;
        self.store.write(CART_STORAGE_KEY, &encoded)?;

        debug!(lines = items.len(), %total, item_count, "Cart committed");

        self.items.replace(items);
        self.total.set(total);
        self.item_count.set(item_count);
        Ok(())
    }
}

impl<S> fmt::Debug for CartEngine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartEngine")
            .field("policy", &self.policy)
            .field("items", &self.items)
            .field("total", &self.total)
            .field("item_count", &self.item_count)
            .field("is_open", &self.is_open)
            .finish_non_exhaustive()
    }
}

/// Unit price of `product`, applying `policy` to unparseable prices.
fn resolve_unit_price(product: &Product, policy: PricePolicy) -> Result<Decimal, CartError> {
    match product.unit_price() {
        Ok(price) => Ok(price),
        Err(source) => match policy {
            PricePolicy::Lenient => {
                warn!(
                    product_id = %product.id,
                    price = %product.price,
                    error = %source,
                    "Unparseable product price, using zero"
                );
                Ok(Decimal::ZERO)
            }
            PricePolicy::Strict => Err(CartError::InvalidPrice {
                product_id: product.id.clone(),
                source,
            }),
        },
    }
}

/// Read and decode the stored line items.
fn load_items(
    store: &impl KeyValueStore,
    policy: PricePolicy,
) -> Result<Vec<CartLineItem>, StorageError> {
    let Some(raw) = store.read(CART_STORAGE_KEY)? else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<CartLineItem>>(&raw) {
        Ok(items) => Ok(normalize(items, policy)),
        Err(e) => {
            warn!(error = %e, "Stored cart is unreadable, starting empty");
            Ok(Vec::new())
        }
    }
}

/// Restore the engine invariants on data written by someone else.
///
/// Zero-quantity lines are dropped and duplicate products fold into their
/// first line, keeping that line's snapshot. Every subtotal is then
/// recomputed from the kept snapshot. Lines whose price is rejected by
/// `policy`, or whose amounts overflow, are dropped.
fn normalize(items: Vec<CartLineItem>, policy: PricePolicy) -> Vec<CartLineItem> {
    let mut merged: Vec<CartLineItem> = Vec::with_capacity(items.len());

    for line in items {
        if line.quantity == 0 {
            warn!(product_id = %line.product.id, "Dropping stored line with zero quantity");
            continue;
        }

        match merged.iter_mut().find(|l| l.product.id == line.product.id) {
            Some(existing) => {
                warn!(product_id = %line.product.id, "Merging duplicate stored line");
                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
            None => merged.push(line),
        }
    }

    let mut out = Vec::with_capacity(merged.len());
    let mut total = Decimal::ZERO;
    for mut line in merged {
        let stored = line.subtotal;
        let quantity = line.quantity;
        let repriced = resolve_unit_price(&line.product, policy)
            .and_then(|price| line.set_quantity(quantity, price));
        if let Err(e) = repriced {
            warn!(product_id = %line.product.id, error = %e, "Dropping stored line");
            continue;
        }
        let Some(next) = total.checked_add(line.subtotal) else {
            warn!(product_id = %line.product.id, "Dropping stored line, cart total overflows");
            continue;
        };

        if stored != line.subtotal {
            debug!(
                product_id = %line.product.id,
                %stored,
                recomputed = %line.subtotal,
                "Corrected stored subtotal"
            );
        }
        total = next;
        out.push(line);
    }

    out
}
