//! Product snapshot as delivered by the catalog.
//!
//! A [`Product`] is a plain value: the cart stores a copy at add time and
//! never re-fetches it. Serialized field names are camelCase so carts written
//! by the JavaScript storefront (`cart-items` in `localStorage`) load as-is.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::{CategoryId, ImageId, ProductId};
use super::price::{PriceError, parse_price};
use super::status::StockStatus;

/// Product or gallery image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image ID.
    pub id: ImageId,
    /// Image URL.
    pub src: String,
    /// Alt text for accessibility.
    pub alt: String,
    /// Display name.
    pub name: String,
}

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCategory {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tasting notes for a spirit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TastingNotes {
    pub nose: String,
    pub palate: String,
    pub finish: String,
}

impl TastingNotes {
    /// Whether every note is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.nose, &self.palate, &self.finish]
            .iter()
            .all(|note| note.trim().is_empty())
    }
}

/// Who made a spirit and how.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductionDetails {
    pub master_distiller: String,
    /// Agave variety, e.g. "Espadín (Agave angustifolia)".
    pub agave: String,
    pub region: String,
    pub process: String,
}

impl ProductionDetails {
    /// Whether every field is blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.master_distiller, &self.agave, &self.region, &self.process]
            .iter()
            .all(|field| field.trim().is_empty())
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable product identity.
    pub id: ProductId,
    /// Numeric `WooCommerce` database ID, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<i64>,
    /// Product name.
    pub name: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    /// HTML description.
    #[serde(default)]
    pub description: String,
    /// Short HTML description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Current selling price as text (see [`parse_price`]).
    #[serde(default, deserialize_with = "price_text")]
    pub price: String,
    /// Regular (non-sale) price as text.
    #[serde(default, deserialize_with = "price_text")]
    pub regular_price: String,
    /// Sale price as text, if the product is discounted.
    #[serde(
        default,
        deserialize_with = "optional_price_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sale_price: Option<String>,
    /// Whether the sale price is in effect.
    #[serde(default)]
    pub on_sale: bool,
    /// Stock status.
    #[serde(default)]
    pub stock_status: StockStatus,
    /// Units in stock (if inventory tracking enabled).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i64>,
    /// Featured image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ProductImage>,
    /// Additional gallery images.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gallery_images: Vec<ProductImage>,
    /// Categories the product belongs to.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<ProductCategory>,
    /// SKU code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Whether the product is featured on the home page.
    #[serde(default)]
    pub featured: bool,
    /// Average review rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Number of reviews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,
    /// Alcohol by volume label, e.g. "45% ABV".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abv: Option<String>,
    /// Bottle size label, e.g. "750ml".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    /// Merchandising badge, e.g. "Top Rated".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasting_notes: Option<TastingNotes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_details: Option<ProductionDetails>,
}

impl Product {
    /// Create a minimal in-stock product with the given identity, name and price.
    ///
    /// The slug defaults to the ID and the regular price to `price`.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let price = price.into();
        Self {
            slug: id.as_str().to_owned(),
            id,
            database_id: None,
            name: name.into(),
            description: String::new(),
            short_description: None,
            regular_price: price.clone(),
            price,
            sale_price: None,
            on_sale: false,
            stock_status: StockStatus::InStock,
            stock_quantity: None,
            image: None,
            gallery_images: Vec::new(),
            categories: Vec::new(),
            sku: None,
            featured: false,
            average_rating: None,
            review_count: None,
            abv: None,
            volume: None,
            badge: None,
            tasting_notes: None,
            production_details: None,
        }
    }

    /// Parse the current selling price.
    ///
    /// # Errors
    ///
    /// Returns a [`PriceError`] if the price text is missing or malformed.
    pub fn unit_price(&self) -> Result<Decimal, PriceError> {
        parse_price(&self.price)
    }

    /// Whether the product belongs to the category with the given slug.
    #[must_use]
    pub fn in_category(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c.slug == slug)
    }

    /// Whether a shopper may add this product to the cart.
    #[must_use]
    pub const fn is_purchasable(&self) -> bool {
        self.stock_status.is_purchasable()
    }
}

/// Price fields arrive as strings from `WooCommerce` and as numbers from the
/// fixtures; keep them as text either way.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriceText {
    Text(String),
    Number(serde_json::Number),
}

impl From<PriceText> for String {
    fn from(value: PriceText) -> Self {
        match value {
            PriceText::Text(s) => s,
            PriceText::Number(n) => n.to_string(),
        }
    }
}

fn price_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<PriceText>::deserialize(deserializer)?
        .map(String::from)
        .unwrap_or_default())
}

fn optional_price_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<PriceText>::deserialize(deserializer)?
        .map(String::from)
        .filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_graphql_shape() {
        let json = r#"{
            "id": "cHJvZHVjdDox",
            "databaseId": 1,
            "name": "Espadín Clásico",
            "slug": "espadin-clasico",
            "description": "<p>Bold and earthy.</p>",
            "price": "$85.00",
            "regularPrice": "$85.00",
            "salePrice": null,
            "onSale": false,
            "stockStatus": "IN_STOCK",
            "featured": true
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id.as_str(), "cHJvZHVjdDox");
        assert_eq!(product.database_id, Some(1));
        assert_eq!(product.unit_price(), Ok(Decimal::new(8500, 2)));
        assert_eq!(product.sale_price, None);
        assert!(product.featured);
    }

    #[test]
    fn test_numeric_price_is_kept_as_text() {
        let json = r#"{"id": "2", "name": "Tobalá Silvestre", "price": 185.5, "salePrice": 165}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, "185.5");
        assert_eq!(product.sale_price.as_deref(), Some("165"));
        assert_eq!(product.unit_price(), Ok(Decimal::new(1855, 1)));
    }

    #[test]
    fn test_missing_price_defaults_to_empty() {
        let product: Product = serde_json::from_str(r#"{"id": "3", "name": "Mystery"}"#).unwrap();
        assert_eq!(product.price, "");
        assert_eq!(product.unit_price(), Err(PriceError::Missing));
        assert_eq!(product.stock_status, StockStatus::InStock);
    }

    #[test]
    fn test_empty_sale_price_is_none() {
        let json = r#"{"id": "4", "name": "Ensamble", "price": "120.00", "salePrice": ""}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.sale_price, None);
    }

    #[test]
    fn test_serialize_camel_case() {
        let mut product = Product::new("p1", "Madre Dulce", "70.00");
        product.on_sale = true;
        product.sale_price = Some("60.00".to_string());

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["regularPrice"], "70.00");
        assert_eq!(value["salePrice"], "60.00");
        assert_eq!(value["onSale"], true);
        assert_eq!(value["stockStatus"], "IN_STOCK");
        assert!(value.get("galleryImages").is_none());
    }

    #[test]
    fn test_in_category() {
        let mut product = Product::new("p1", "Espadín Clásico", "85.00");
        product.categories.push(ProductCategory {
            id: CategoryId::new("espadin"),
            name: "Espadín".to_string(),
            slug: "espadin".to_string(),
            description: None,
        });
        assert!(product.in_category("espadin"));
        assert!(!product.in_category("tobala"));
    }

    #[test]
    fn test_mezcal_attributes() {
        let json = r#"{
            "id": "1",
            "name": "Espadín Clásico",
            "price": "85.00",
            "abv": "45% ABV",
            "volume": "750ml",
            "badge": "Top Rated",
            "tastingNotes": {"nose": "Tropical Fruit, Damp Earth", "palate": "Rose Petals", "finish": "Sweet"},
            "productionDetails": {"masterDistiller": "Don Leoncio", "agave": "Espadín", "region": "Oaxaca"}
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.abv.as_deref(), Some("45% ABV"));
        assert_eq!(product.badge.as_deref(), Some("Top Rated"));
        let notes = product.tasting_notes.as_ref().unwrap();
        assert_eq!(notes.nose, "Tropical Fruit, Damp Earth");
        let details = product.production_details.as_ref().unwrap();
        assert_eq!(details.master_distiller, "Don Leoncio");
        assert_eq!(details.process, "");
        assert!(!details.is_empty());

        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["productionDetails"]["masterDistiller"], "Don Leoncio");
        assert!(Product::new("p2", "Plain", "1").badge.is_none());
        assert!(TastingNotes::default().is_empty());
    }
}
