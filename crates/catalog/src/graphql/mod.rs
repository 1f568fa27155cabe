//! `WPGraphQL` catalog client.
//!
//! Uses `graphql_client` request/response envelopes with `reqwest` 0.13 for
//! HTTP. Caches products and categories using `moka` (TTL from config).

mod conversions;
mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};
use leon_core::{Product, ProductCategory};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::cache::{self, CacheKey, CacheValue};
use crate::config::GraphqlConfig;
use crate::{Catalog, CatalogError, GraphQLError, GraphQLErrorLocation, or_empty, truncate_body};

use conversions::{convert_category, convert_product, convert_product_page};
use queries::{
    GetProductBySlug, GetProductCategories, GetProducts, PRODUCTS_PAGE_SIZE, get_product_by_slug,
    get_product_categories, get_products,
};

/// Upper bound on pages fetched for one product listing.
const MAX_PAGES: usize = 10;

// =============================================================================
// GraphqlCatalog
// =============================================================================

/// Client for a `WPGraphQL` + `WooCommerce` endpoint.
///
/// Cheap to clone; clones share the HTTP client and cache.
#[derive(Clone)]
pub struct GraphqlCatalog {
    inner: Arc<GraphqlCatalogInner>,
}

struct GraphqlCatalogInner {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for GraphqlCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlCatalog")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}

impl GraphqlCatalog {
    /// Create a new client.
    #[must_use]
    pub fn new(config: &GraphqlConfig, cache_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(GraphqlCatalogInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint.to_string(),
                auth_token: config.auth_token.clone(),
                cache: cache::build(cache_ttl),
            }),
        }
    }

    /// Execute a GraphQL query.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, CatalogError>
    where
        Q::Variables: serde::Serialize,
    {
        let request_body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("Content-Type", "application/json")
            .json(&request_body);
        if let Some(token) = &self.inner.auth_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %truncate_body(&response_text, 500),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: truncate_body(&response_text, 200),
            });
        }

        decode_response(&response_text)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get all published products, following pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    #[instrument(skip(self))]
    pub async fn try_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let mut products = Vec::new();
        let mut after = None;
        for _ in 0..MAX_PAGES {
            let variables = get_products::Variables {
                first: PRODUCTS_PAGE_SIZE,
                after: after.take(),
            };
            let data = self.execute::<GetProducts>(variables).await?;
            let (page, next) = convert_product_page(data);
            products.extend(page);

            match next {
                Some(cursor) => after = Some(cursor),
                None => break,
            }
        }
        if after.is_some() {
            tracing::warn!(count = products.len(), "Product listing truncated at page limit");
        }

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its slug.
    ///
    /// Returns `Ok(None)` if the CMS has no product with that slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn try_product_by_slug(&self, slug: &str) -> Result<Option<Product>, CatalogError> {
        let cache_key = CacheKey::Product(slug.to_string());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(Some(*product));
        }

        let variables = get_product_by_slug::Variables {
            slug: slug.to_string(),
        };
        let data = self.execute::<GetProductBySlug>(variables).await?;

        let Some(node) = data.product else {
            debug!("Product not found");
            return Ok(None);
        };
        let product = convert_product(node);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(Some(product))
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// Get all non-empty product categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn try_categories(&self) -> Result<Vec<ProductCategory>, CatalogError> {
        if let Some(CacheValue::Categories(categories)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let data = self
            .execute::<GetProductCategories>(get_product_categories::Variables)
            .await?;
        let categories: Vec<ProductCategory> = data
            .product_categories
            .unwrap_or_default()
            .nodes
            .into_iter()
            .map(convert_category)
            .collect();

        self.inner
            .cache
            .insert(
                CacheKey::Categories,
                CacheValue::Categories(categories.clone()),
            )
            .await;

        Ok(categories)
    }

    /// Clear all cached responses.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }
}

impl Catalog for GraphqlCatalog {
    async fn products(&self) -> Vec<Product> {
        or_empty(self.try_products().await, "products")
    }

    async fn product_by_slug(&self, slug: &str) -> Option<Product> {
        or_empty(self.try_product_by_slug(slug).await, "product")
    }

    async fn categories(&self) -> Vec<ProductCategory> {
        or_empty(self.try_categories().await, "product categories")
    }
}

/// Parse a GraphQL response body, surfacing GraphQL errors.
fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T, CatalogError> {
    let response: Response<T> = match serde_json::from_str(body) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(
                error = %e,
                body = %truncate_body(body, 500),
                "Failed to parse catalog GraphQL response"
            );
            return Err(CatalogError::Parse(e));
        }
    };

    if let Some(errors) = response.errors
        && !errors.is_empty()
    {
        tracing::debug!(errors = ?errors, "GraphQL errors in response");

        return Err(CatalogError::GraphQL(
            errors.into_iter().map(convert_graphql_error).collect(),
        ));
    }

    response.data.ok_or_else(|| {
        tracing::error!(
            body = %truncate_body(body, 500),
            "Catalog GraphQL response has no data and no errors"
        );
        CatalogError::GraphQL(vec![GraphQLError {
            message: "No data in response".to_string(),
            locations: vec![],
            path: vec![],
        }])
    })
}

fn convert_graphql_error(e: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: e.message,
        locations: e.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: e.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use url::Url;

    use super::conversions::{CategoriesData, ProductData};
    use super::*;

    #[test]
    fn test_decode_product() {
        let body = r#"{"data": {"product": {"id": "cHJvZHVjdDox", "name": "Espadín Clásico", "slug": "espadin-clasico", "price": "$85.00"}}}"#;
        let data: ProductData = decode_response(body).unwrap();
        let product = convert_product(data.product.unwrap());
        assert_eq!(product.slug, "espadin-clasico");
        assert_eq!(product.price, "$85.00");
    }

    #[test]
    fn test_decode_missing_product() {
        let data: ProductData = decode_response(r#"{"data": {"product": null}}"#).unwrap();
        assert!(data.product.is_none());
    }

    #[test]
    fn test_decode_graphql_errors() {
        let body = r#"{
            "data": null,
            "errors": [{
                "message": "Cannot query field \"sku\" on type \"Product\".",
                "locations": [{"line": 12, "column": 5}],
                "path": ["products", 0]
            }]
        }"#;
        let err = decode_response::<CategoriesData>(body).unwrap_err();
        let CatalogError::GraphQL(errors) = &err else {
            panic!("expected GraphQL error, got {err:?}");
        };
        assert_eq!(errors[0].locations[0].line, 12);
        assert_eq!(errors[0].path.len(), 2);
        assert!(err.to_string().contains("at line 12:5"));
    }

    #[test]
    fn test_decode_no_data() {
        let err = decode_response::<CategoriesData>(r"{}").unwrap_err();
        assert!(err.to_string().contains("No data in response"));
    }

    #[test]
    fn test_decode_invalid_json() {
        let err = decode_response::<CategoriesData>("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_empty() {
        let config = GraphqlConfig {
            endpoint: Url::parse("http://127.0.0.1:9/graphql").unwrap(),
            auth_token: None,
        };
        let catalog = GraphqlCatalog::new(&config, Duration::from_secs(60));

        assert!(catalog.try_products().await.is_err());
        assert!(catalog.products().await.is_empty());
        assert!(catalog.product_by_slug("espadin-clasico").await.is_none());
        assert!(catalog.categories().await.is_empty());
    }

    #[test]
    fn test_debug_hides_token() {
        let config = GraphqlConfig {
            endpoint: Url::parse("https://cms.example.com/graphql").unwrap(),
            auth_token: Some(SecretString::from("bearer_secret_value")),
        };
        let catalog = GraphqlCatalog::new(&config, Duration::from_secs(60));
        let debug_output = format!("{catalog:?}");
        assert!(debug_output.contains("cms.example.com"));
        assert!(!debug_output.contains("bearer_secret_value"));
    }
}
