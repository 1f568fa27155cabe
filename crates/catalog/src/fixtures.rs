//! Static catalog embedded in the binary.
//!
//! Used when no CMS is configured and as test data. The fixtures also carry
//! data the CMS does not model: stockist locations and site settings.

use leon_core::{Product, ProductCategory};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::Catalog;

const PRODUCTS_JSON: &str = include_str!("../fixtures/products.json");
const CATEGORIES_JSON: &str = include_str!("../fixtures/categories.json");
const STOCKISTS_JSON: &str = include_str!("../fixtures/stockists.json");
const SITE_JSON: &str = include_str!("../fixtures/site.json");

/// Kind of venue that carries the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockistKind {
    Bar,
    Retail,
}

impl std::fmt::Display for StockistKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bar => write!(f, "bar"),
            Self::Retail => write!(f, "retail"),
        }
    }
}

/// Map coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A bar or shop that stocks the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stockist {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StockistKind,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub hours: String,
    pub coordinates: Coordinates,
}

/// Social profile links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
}

/// Navigation menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub name: String,
    pub href: String,
}

/// Site-wide branding and contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub social: SocialLinks,
    #[serde(default)]
    pub navigation: Vec<NavLink>,
}

/// Catalog backed by the embedded fixtures.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    products: Vec<Product>,
    categories: Vec<ProductCategory>,
    stockists: Vec<Stockist>,
    site: Option<SiteSettings>,
}

impl FixtureCatalog {
    /// Parse the embedded fixtures.
    ///
    /// A fixture that fails to parse is logged and treated as empty.
    #[must_use]
    pub fn load() -> Self {
        Self {
            products: parse_or_default(PRODUCTS_JSON, "products"),
            categories: parse_or_default(CATEGORIES_JSON, "categories"),
            stockists: parse_or_default(STOCKISTS_JSON, "stockists"),
            site: parse_or_default(SITE_JSON, "site settings"),
        }
    }

    /// Build a catalog from explicit products and categories.
    #[must_use]
    pub const fn from_parts(products: Vec<Product>, categories: Vec<ProductCategory>) -> Self {
        Self {
            products,
            categories,
            stockists: Vec::new(),
            site: None,
        }
    }

    /// All products, in fixture order.
    #[must_use]
    pub fn all_products(&self) -> &[Product] {
        &self.products
    }

    /// Product with the given slug.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    /// Stockist locations.
    #[must_use]
    pub fn stockists(&self) -> &[Stockist] {
        &self.stockists
    }

    /// Site settings, if the fixture parsed.
    #[must_use]
    pub const fn site(&self) -> Option<&SiteSettings> {
        self.site.as_ref()
    }
}

impl Catalog for FixtureCatalog {
    async fn products(&self) -> Vec<Product> {
        self.products.clone()
    }

    async fn product_by_slug(&self, slug: &str) -> Option<Product> {
        self.find(slug).cloned()
    }

    async fn categories(&self) -> Vec<ProductCategory> {
        self.categories.clone()
    }
}

fn parse_or_default<T: DeserializeOwned + Default>(json: &str, what: &str) -> T {
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to parse {what} fixture");
        T::default()
    })
}
