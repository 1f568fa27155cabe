//! `WooCommerce` REST API catalog client (`/wp-json/wc/v3`).
//!
//! Authenticates with consumer key/secret query parameters when configured.
//! Shares the `moka` response cache layout with the GraphQL client. Content
//! pages and site settings come from the WordPress core and theme endpoints
//! on the same site.

mod conversions;

use std::sync::Arc;
use std::time::Duration;

use leon_core::{Page, Product, ProductCategory};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::cache::{self, CacheKey, CacheValue};
use crate::config::RestConfig;
use crate::fixtures::{FixtureCatalog, SiteSettings};
use crate::{Catalog, CatalogError, or_empty, truncate_body};

use conversions::{
    RestCategory, RestPage, RestProduct, convert_category, convert_page, convert_product,
};

const PRODUCTS_PATH: &str = "/wp-json/wc/v3/products";
const CATEGORIES_PATH: &str = "/wp-json/wc/v3/products/categories";
const PAGES_PATH: &str = "/wp-json/wp/v2/pages";
const SETTINGS_PATH: &str = "/wp-json/custom/v1/settings";
const PER_PAGE: &str = "100";

/// Client for the `WooCommerce` REST API.
///
/// Cheap to clone; clones share the HTTP client and cache.
#[derive(Clone)]
pub struct RestCatalog {
    inner: Arc<RestCatalogInner>,
}

struct RestCatalogInner {
    client: reqwest::Client,
    base_url: Url,
    credentials: Option<(String, SecretString)>,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for RestCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestCatalog")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.inner.credentials.is_some())
            .finish_non_exhaustive()
    }
}

impl RestCatalog {
    /// Create a new client.
    ///
    /// Credentials are only sent when both key and secret are configured.
    #[must_use]
    pub fn new(config: &RestConfig, cache_ttl: Duration) -> Self {
        let credentials = match (&config.consumer_key, &config.consumer_secret) {
            (Some(key), Some(secret)) => Some((key.clone(), secret.clone())),
            _ => None,
        };

        Self {
            inner: Arc::new(RestCatalogInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                credentials,
                cache: cache::build(cache_ttl),
            }),
        }
    }

    /// Build a request URL for `path` with query parameters and credentials.
    ///
    /// `path` is appended to the base URL, so sites installed in a
    /// subdirectory keep their prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL does not parse.
    pub fn endpoint_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, CatalogError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{path}"))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some((key, secret)) = &self.inner.credentials {
                query.append_pair("consumer_key", key);
                query.append_pair("consumer_secret", secret.expose_secret());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let url = self.endpoint_url(path, params)?;

        let response = self
            .inner
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                path,
                body = %truncate_body(&body, 500),
                "WooCommerce API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: truncate_body(&body, 200),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate_body(&body, 500),
                "Failed to parse WooCommerce response"
            );
            CatalogError::Parse(e)
        })
    }

    /// Get all published products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn try_products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let raw: Vec<RestProduct> = self
            .fetch(
                PRODUCTS_PATH,
                &[("per_page", PER_PAGE), ("status", "publish")],
            )
            .await?;
        let products: Vec<Product> = raw.into_iter().map(convert_product).collect();

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its slug.
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

        let raw: Vec<RestProduct> = self
            .fetch(PRODUCTS_PATH, &[("slug", slug), ("per_page", "1")])
            .await?;
        let Some(product) = raw.into_iter().next().map(convert_product) else {
            debug!("Product not found");
            return Ok(None);
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(Some(product))
    }

    /// Get all product categories that contain products.
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

        let raw: Vec<RestCategory> = self
            .fetch(CATEGORIES_PATH, &[("per_page", PER_PAGE)])
            .await?;
        let categories: Vec<ProductCategory> = raw
            .into_iter()
            .filter(|c| c.count > 0)
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

    /// Get a content page by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn try_page_by_slug(&self, slug: &str) -> Result<Option<Page>, CatalogError> {
        let cache_key = CacheKey::Page(slug.to_string());

        if let Some(CacheValue::Page(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for page");
            return Ok(Some(*page));
        }

        let raw: Vec<RestPage> = self
            .fetch(PAGES_PATH, &[("slug", slug), ("per_page", "1")])
            .await?;
        let Some(page) = raw.into_iter().next().map(convert_page) else {
            debug!("Page not found");
            return Ok(None);
        };

        self.inner
            .cache
            .insert(cache_key, CacheValue::Page(Box::new(page.clone())))
            .await;

        Ok(Some(page))
    }

    /// Get site-wide settings from the theme's settings endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response is missing
    /// required fields.
    #[instrument(skip(self))]
    pub async fn try_site_settings(&self) -> Result<SiteSettings, CatalogError> {
        if let Some(CacheValue::SiteSettings(settings)) =
            self.inner.cache.get(&CacheKey::SiteSettings).await
        {
            debug!("Cache hit for site settings");
            return Ok(*settings);
        }

        let settings: SiteSettings = self.fetch(SETTINGS_PATH, &[]).await?;

        self.inner
            .cache
            .insert(
                CacheKey::SiteSettings,
                CacheValue::SiteSettings(Box::new(settings.clone())),
            )
            .await;

        Ok(settings)
    }

    /// Content page by slug, or `None` when missing or unreachable.
    pub async fn page_by_slug(&self, slug: &str) -> Option<Page> {
        or_empty(self.try_page_by_slug(slug).await, "page")
    }

    /// Site settings, falling back to the embedded defaults when the
    /// endpoint is unavailable.
    pub async fn site_settings(&self) -> Option<SiteSettings> {
        or_empty(self.try_site_settings().await.map(Some), "site settings").or_else(|| {
            debug!("Using embedded site settings");
            FixtureCatalog::load().site().cloned()
        })
    }

    /// Clear all cached responses.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }
}

impl Catalog for RestCatalog {
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog(key: Option<&str>, secret: Option<&str>) -> RestCatalog {
        let config = RestConfig {
            base_url: Url::parse("https://shop.example.com").unwrap(),
            consumer_key: key.map(str::to_string),
            consumer_secret: secret.map(SecretString::from),
        };
        RestCatalog::new(&config, Duration::from_secs(60))
    }

    #[test]
    fn test_endpoint_url_with_credentials() {
        let catalog = catalog(Some("ck_123"), Some("cs_456"));
        let url = catalog
            .endpoint_url(PRODUCTS_PATH, &[("per_page", "100"), ("status", "publish")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://shop.example.com/wp-json/wc/v3/products?per_page=100&status=publish&consumer_key=ck_123&consumer_secret=cs_456"
        );
    }

    #[test]
    fn test_endpoint_url_without_credentials() {
        let catalog = catalog(Some("ck_123"), None);
        let url = catalog
            .endpoint_url(PRODUCTS_PATH, &[("slug", "madre dulce"), ("per_page", "1")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://shop.example.com/wp-json/wc/v3/products?slug=madre+dulce&per_page=1"
        );
    }

    #[test]
    fn test_endpoint_url_keeps_subdirectory() {
        let config = RestConfig {
            base_url: Url::parse("https://example.com/shop/").unwrap(),
            consumer_key: None,
            consumer_secret: None,
        };
        let catalog = RestCatalog::new(&config, Duration::from_secs(60));
        let url = catalog
            .endpoint_url(CATEGORIES_PATH, &[("per_page", "100")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/shop/wp-json/wc/v3/products/categories?per_page=100"
        );
    }

    #[test]
    fn test_endpoint_url_page_by_slug() {
        let catalog = catalog(Some("ck_123"), Some("cs_456"));
        let url = catalog
            .endpoint_url(PAGES_PATH, &[("slug", "our-story"), ("per_page", "1")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://shop.example.com/wp-json/wp/v2/pages?slug=our-story&per_page=1&consumer_key=ck_123&consumer_secret=cs_456"
        );
    }

    #[test]
    fn test_endpoint_url_site_settings() {
        let catalog = catalog(None, None);
        let url = catalog.endpoint_url(SETTINGS_PATH, &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://shop.example.com/wp-json/custom/v1/settings"
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let catalog = catalog(Some("ck_123"), Some("cs_super_secret"));
        let debug_output = format!("{catalog:?}");
        assert!(debug_output.contains("shop.example.com"));
        assert!(!debug_output.contains("cs_super_secret"));
    }

    #[tokio::test]
    async fn test_unreachable_site_degrades_to_empty() {
        let config = RestConfig {
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            consumer_key: None,
            consumer_secret: None,
        };
        let catalog = RestCatalog::new(&config, Duration::from_secs(60));

        assert!(catalog.products().await.is_empty());
        assert!(catalog.product_by_slug("madre-dulce").await.is_none());
        assert!(catalog.categories().await.is_empty());
        assert!(catalog.page_by_slug("our-story").await.is_none());

        let site = catalog.site_settings().await.unwrap();
        assert_eq!(site.name, "León de Guerrero");
        assert_eq!(site.tagline, "Spirit of the Warrior");
    }
}
