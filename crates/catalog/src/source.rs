//! Runtime selection of the catalog backend.

use leon_core::{Page, Product, ProductCategory};

use crate::config::{CatalogConfig, SourceConfig, SourceKind};
use crate::{Catalog, FixtureCatalog, GraphqlCatalog, RestCatalog, SiteSettings};

/// The configured catalog backend.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    Fixtures(FixtureCatalog),
    Graphql(GraphqlCatalog),
    Rest(RestCatalog),
}

impl CatalogSource {
    /// Build the backend selected by `config`.
    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Self {
        let source = match &config.source {
            SourceConfig::Fixtures => Self::Fixtures(FixtureCatalog::load()),
            SourceConfig::Graphql(graphql) => {
                Self::Graphql(GraphqlCatalog::new(graphql, config.cache_ttl))
            }
            SourceConfig::Rest(rest) => Self::Rest(RestCatalog::new(rest, config.cache_ttl)),
        };
        tracing::debug!(source = ?source.kind(), "Catalog source selected");
        source
    }

    /// Which backend is in use.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Fixtures(_) => SourceKind::Fixtures,
            Self::Graphql(_) => SourceKind::Graphql,
            Self::Rest(_) => SourceKind::Rest,
        }
    }

    /// Content page by slug. Only the REST backend serves pages.
    pub async fn page_by_slug(&self, slug: &str) -> Option<Page> {
        match self {
            Self::Rest(c) => c.page_by_slug(slug).await,
            Self::Fixtures(_) | Self::Graphql(_) => None,
        }
    }

    /// Site settings. Backends without a settings endpoint use the embedded
    /// ones.
    pub async fn site_settings(&self) -> Option<SiteSettings> {
        match self {
            Self::Rest(c) => c.site_settings().await,
            Self::Fixtures(c) => c.site().cloned(),
            Self::Graphql(_) => FixtureCatalog::load().site().cloned(),
        }
    }
}

impl Catalog for CatalogSource {
    async fn products(&self) -> Vec<Product> {
        match self {
            Self::Fixtures(c) => c.products().await,
            Self::Graphql(c) => c.products().await,
            Self::Rest(c) => c.products().await,
        }
    }

    async fn product_by_slug(&self, slug: &str) -> Option<Product> {
        match self {
            Self::Fixtures(c) => c.product_by_slug(slug).await,
            Self::Graphql(c) => c.product_by_slug(slug).await,
            Self::Rest(c) => c.product_by_slug(slug).await,
        }
    }

    async fn categories(&self) -> Vec<ProductCategory> {
        match self {
            Self::Fixtures(c) => c.categories().await,
            Self::Graphql(c) => c.categories().await,
            Self::Rest(c) => c.categories().await,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_config_uses_fixtures() {
        let source = CatalogSource::from_config(&CatalogConfig::default());
        assert_eq!(source.kind(), SourceKind::Fixtures);
        assert_eq!(source.products().await.len(), 6);
        assert_eq!(
            source.product_by_slug("ensamble-especial").await.unwrap().name,
            "Ensamble Especial"
        );
    }

    #[tokio::test]
    async fn test_fixture_content() {
        let source = CatalogSource::from_config(&CatalogConfig::default());
        assert!(source.page_by_slug("our-story").await.is_none());
        assert_eq!(
            source.site_settings().await.unwrap().email,
            "hola@leondeguerrero.com"
        );
    }

    #[test]
    fn test_graphql_config_selects_graphql() {
        let config = CatalogConfig::from_lookup(|key| match key {
            "LEON_CATALOG_SOURCE" => Some("graphql".to_string()),
            "WORDPRESS_API_URL" => Some("https://cms.example.com/graphql".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(CatalogSource::from_config(&config).kind(), SourceKind::Graphql);
    }
}
