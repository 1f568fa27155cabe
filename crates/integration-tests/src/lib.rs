//! Integration tests for the León de Guerrero storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p leon-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart engine over the file store
//! - `cart_subscriptions` - Observable views across mutations
//! - `catalog_cart` - Fixture catalog products flowing into the cart
//!
//! Shared helpers live here so each test binary stays small.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use leon_cart::{CartEngine, FileStore};
use leon_catalog::FixtureCatalog;
use leon_core::Product;

/// Product from the embedded fixtures.
///
/// # Panics
///
/// Panics if no fixture product has the slug.
#[must_use]
pub fn fixture(slug: &str) -> Product {
    FixtureCatalog::load()
        .find(slug)
        .cloned()
        .unwrap_or_else(|| panic!("no fixture product with slug {slug}"))
}

/// Open a cart engine persisting under `dir`.
///
/// # Panics
///
/// Panics if the stored cart cannot be read.
#[must_use]
pub fn open_cart(dir: &Path) -> CartEngine<FileStore> {
    CartEngine::open(FileStore::new(dir))
        .unwrap_or_else(|e| panic!("failed to open cart in {}: {e}", dir.display()))
}

/// Shared log of values seen by a listener.
#[derive(Debug)]
pub struct Recorder<T>(Rc<RefCell<Vec<T>>>);

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(Vec::new())))
    }
}

impl<T: Clone + 'static> Recorder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that appends every value it is called with.
    pub fn listener(&self) -> impl FnMut(&T) + 'static {
        let sink = Rc::clone(&self.0);
        move |value: &T| sink.borrow_mut().push(value.clone())
    }

    /// Values recorded so far.
    #[must_use]
    pub fn values(&self) -> Vec<T> {
        self.0.borrow().clone()
    }
}
