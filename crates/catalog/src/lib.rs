//! Product catalog sources for the storefront.
//!
//! # Architecture
//!
//! - [`Catalog`] is the contract the cart and CLI consume: fetch products,
//!   fetch one product by slug, fetch categories.
//! - Catalog unavailability degrades to "no products": the trait methods log
//!   failures and return empty collections or `None`. Each backend also has
//!   `try_*` methods that surface [`CatalogError`].
//! - Remote responses are cached in memory via `moka` (5 minute TTL by default).
//!
//! # Sources
//!
//! - [`FixtureCatalog`] - static fixtures embedded in the binary
//! - [`GraphqlCatalog`] - `WPGraphQL` with the `WooCommerce` extension
//! - [`RestCatalog`] - `WooCommerce` REST API (`wc/v3`)
//!
//! # Example
//!
//! ```rust,ignore
//! use leon_catalog::{Catalog, CatalogConfig, CatalogSource, filters};
//!
//! let config = CatalogConfig::from_env()?;
//! let catalog = CatalogSource::from_config(&config);
//!
//! let products = catalog.products().await;
//! let espadin = filters::filter_by_category(&products, "espadin");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod cache;
pub mod config;
pub mod filters;
pub mod fixtures;
pub mod graphql;
pub mod rest;
pub mod source;

use std::future::Future;

use leon_core::{Product, ProductCategory};
use thiserror::Error;

pub use config::{CatalogConfig, ConfigError, GraphqlConfig, RestConfig, SourceConfig, SourceKind};
pub use fixtures::{FixtureCatalog, SiteSettings, Stockist, StockistKind};
pub use graphql::GraphqlCatalog;
pub use rest::RestCatalog;
pub use source::CatalogSource;

/// Read access to the product catalog.
///
/// Implementations never fail: errors are logged and turned into empty
/// results so a catalog outage shows an empty shop instead of an error page.
pub trait Catalog: Send + Sync {
    /// All published products.
    fn products(&self) -> impl Future<Output = Vec<Product>> + Send;

    /// Product with the given slug, or `None` if missing or unavailable.
    fn product_by_slug(&self, slug: &str) -> impl Future<Output = Option<Product>> + Send;

    /// All non-empty product categories.
    fn categories(&self) -> impl Future<Output = Vec<ProductCategory>> + Send;
}

/// Errors that can occur when talking to a remote catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },

    /// Rate limited by the server.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

/// A GraphQL error returned by the catalog API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Log a failed fetch and fall back to the empty value.
pub(crate) fn or_empty<T: Default>(result: Result<T, CatalogError>, what: &str) -> T {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to fetch {what}");
        T::default()
    })
}

/// Keep the first `limit` characters of a response body for error messages.
pub(crate) fn truncate_body(body: &str, limit: usize) -> String {
    body.chars().take(limit).collect()
}
