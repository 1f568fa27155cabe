//! Cache types for catalog API responses.

use leon_core::{Page, Product, ProductCategory};

use crate::fixtures::SiteSettings;

/// Cache key for catalog and content responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products,
    Product(String),
    Categories,
    Page(String),
    SiteSettings,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    Categories(Vec<ProductCategory>),
    Page(Box<Page>),
    SiteSettings(Box<SiteSettings>),
}

/// Build the response cache shared by the remote backends.
pub fn build(ttl: std::time::Duration) -> moka::future::Cache<CacheKey, CacheValue> {
    moka::future::Cache::builder()
        .max_capacity(1000)
        .time_to_live(ttl)
        .build()
}
