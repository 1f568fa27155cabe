//! Catalog configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `LEON_CATALOG_SOURCE` - `fixtures` (default), `graphql` or `rest`
//! - `LEON_CATALOG_CACHE_TTL_SECS` - Remote response cache TTL (default: 300)
//!
//! ## `graphql`
//! - `WORDPRESS_API_URL` - `WPGraphQL` endpoint (required)
//! - `WORDPRESS_AUTH_TOKEN` - Bearer token (optional)
//!
//! ## `rest`
//! - `WP_BASE_URL` - `WordPress` site URL (required)
//! - `WP_CONSUMER_KEY` - `WooCommerce` consumer key (optional)
//! - `WP_CONSUMER_SECRET` - `WooCommerce` consumer secret (optional)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which backend serves the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceKind {
    /// Embedded fixtures.
    #[default]
    Fixtures,
    /// `WPGraphQL` endpoint.
    Graphql,
    /// `WooCommerce` REST API.
    Rest,
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixtures" | "static" => Ok(Self::Fixtures),
            "graphql" => Ok(Self::Graphql),
            "rest" => Ok(Self::Rest),
            other => Err(format!(
                "unknown catalog source '{other}' (expected fixtures, graphql or rest)"
            )),
        }
    }
}

/// Catalog configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Backend and its connection settings.
    pub source: SourceConfig,
    /// How long remote responses stay cached.
    pub cache_ttl: Duration,
}

/// Backend-specific settings.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    Fixtures,
    Graphql(GraphqlConfig),
    Rest(RestConfig),
}

impl SourceConfig {
    /// The backend this configuration selects.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Fixtures => SourceKind::Fixtures,
            Self::Graphql(_) => SourceKind::Graphql,
            Self::Rest(_) => SourceKind::Rest,
        }
    }
}

/// `WPGraphQL` endpoint configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct GraphqlConfig {
    /// GraphQL endpoint URL.
    pub endpoint: Url,
    /// Optional bearer token.
    pub auth_token: Option<SecretString>,
}

impl fmt::Debug for GraphqlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphqlConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// `WooCommerce` REST API configuration.
///
/// Implements `Debug` manually to redact the consumer secret.
#[derive(Clone)]
pub struct RestConfig {
    /// `WordPress` site URL.
    pub base_url: Url,
    /// Consumer key, sent as a query parameter.
    pub consumer_key: Option<String>,
    /// Consumer secret, sent as a query parameter.
    pub consumer_secret: Option<SecretString>,
}

impl fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url.as_str())
            .field("consumer_key", &self.consumer_key)
            .field(
                "consumer_secret",
                &self.consumer_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::Fixtures,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a selected backend is missing its URL or a
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let kind = env
            .optional("LEON_CATALOG_SOURCE")
            .map(|value| {
                value
                    .parse::<SourceKind>()
                    .map_err(|e| ConfigError::InvalidEnvVar("LEON_CATALOG_SOURCE".to_string(), e))
            })
            .transpose()?
            .unwrap_or_default();

        let cache_ttl = env
            .optional("LEON_CATALOG_CACHE_TTL_SECS")
            .map(|value| {
                value.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "LEON_CATALOG_CACHE_TTL_SECS".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);

        let source = match kind {
            SourceKind::Fixtures => SourceConfig::Fixtures,
            SourceKind::Graphql => SourceConfig::Graphql(GraphqlConfig {
                endpoint: env.required_url("WORDPRESS_API_URL")?,
                auth_token: env.optional("WORDPRESS_AUTH_TOKEN").map(SecretString::from),
            }),
            SourceKind::Rest => SourceConfig::Rest(RestConfig {
                base_url: env.required_url("WP_BASE_URL")?,
                consumer_key: env.optional("WP_CONSUMER_KEY"),
                consumer_secret: env.optional("WP_CONSUMER_SECRET").map(SecretString::from),
            }),
        };

        Ok(Self {
            source,
            cache_ttl: Duration::from_secs(cache_ttl),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable and parse it as an absolute URL.
    fn required_url(&self, key: &str) -> Result<Url, ConfigError> {
        let value = self
            .optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
        Url::parse(value.trim())
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CatalogConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CatalogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_to_fixtures() {
        let config = load(&[]).unwrap();
        assert_eq!(config.source.kind(), SourceKind::Fixtures);
        assert_eq!(config.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_graphql_source() {
        let config = load(&[
            ("LEON_CATALOG_SOURCE", "GraphQL"),
            ("WORDPRESS_API_URL", "https://cms.example.com/graphql"),
            ("WORDPRESS_AUTH_TOKEN", "tok_9f8e7d"),
            ("LEON_CATALOG_CACHE_TTL_SECS", "60"),
        ])
        .unwrap();

        let SourceConfig::Graphql(graphql) = &config.source else {
            panic!("expected graphql source, got {:?}", config.source);
        };
        assert_eq!(graphql.endpoint.as_str(), "https://cms.example.com/graphql");
        assert_eq!(
            graphql.auth_token.as_ref().unwrap().expose_secret(),
            "tok_9f8e7d"
        );
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_graphql_requires_endpoint() {
        let err = load(&[("LEON_CATALOG_SOURCE", "graphql")]).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("WORDPRESS_API_URL".to_string()));

        let err = load(&[
            ("LEON_CATALOG_SOURCE", "graphql"),
            ("WORDPRESS_API_URL", "   "),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_invalid_url() {
        let err = load(&[("LEON_CATALOG_SOURCE", "rest"), ("WP_BASE_URL", "not a url")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "WP_BASE_URL"));
    }

    #[test]
    fn test_invalid_source_and_ttl() {
        let err = load(&[("LEON_CATALOG_SOURCE", "magento")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnvVar(ref key, _) if key == "LEON_CATALOG_SOURCE"
        ));

        let err = load(&[("LEON_CATALOG_CACHE_TTL_SECS", "five")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_rest_config_debug_redacts_secret() {
        let config = load(&[
            ("LEON_CATALOG_SOURCE", "rest"),
            ("WP_BASE_URL", "https://shop.example.com"),
            ("WP_CONSUMER_KEY", "ck_public_value"),
            ("WP_CONSUMER_SECRET", "cs_super_secret_value"),
        ])
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("shop.example.com"));
        assert!(debug_output.contains("ck_public_value"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("cs_super_secret_value"));
    }

    #[test]
    fn test_graphql_config_debug_redacts_token() {
        let config = GraphqlConfig {
            endpoint: Url::parse("https://cms.example.com/graphql").unwrap(),
            auth_token: Some(SecretString::from("bearer_secret_value")),
        };
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("bearer_secret_value"));
    }
}
