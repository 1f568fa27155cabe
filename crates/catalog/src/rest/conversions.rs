//! `WooCommerce` REST (`wc/v3`) response types and conversions.

use leon_core::{
    CategoryId, ImageId, Page, PageId, Product, ProductCategory, ProductImage, ProductionDetails,
    TastingNotes,
};
use serde::Deserialize;

/// Bottle size assumed when the product has no `Volume` attribute.
const DEFAULT_VOLUME: &str = "750ml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestProduct {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub short_description: String,
    pub price: String,
    pub regular_price: String,
    pub sale_price: String,
    pub on_sale: bool,
    pub featured: bool,
    pub stock_status: String,
    pub stock_quantity: Option<i64>,
    pub sku: String,
    pub average_rating: String,
    pub rating_count: Option<i64>,
    pub images: Vec<RestImage>,
    pub categories: Vec<RestCategoryRef>,
    pub attributes: Vec<RestAttribute>,
    pub tags: Vec<RestTag>,
    pub meta_data: Vec<RestMeta>,
}

impl RestProduct {
    /// First option of the attribute called `name`.
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .and_then(|attr| attr.options.first())
            .and_then(|option| non_empty(option.clone()))
    }

    /// Text value of the custom field `key`, or empty.
    fn meta(&self, key: &str) -> String {
        match self.meta_data.iter().find(|m| m.key == key).map(|m| &m.value) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

/// Product attribute such as `ABV` or `Volume`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestAttribute {
    pub name: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestTag {
    pub name: String,
}

/// Custom field; values are arbitrary JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestMeta {
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestImage {
    pub id: i64,
    pub src: String,
    pub name: String,
    pub alt: String,
}

/// Category reference embedded in a product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestCategoryRef {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Category from `products/categories`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestCategory {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub count: i64,
}

/// Page from `wp/v2/pages`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestPage {
    pub id: i64,
    pub slug: String,
    pub title: Rendered,
    pub content: Rendered,
    pub excerpt: Rendered,
}

/// `{"rendered": "..."}` wrapper used by the WordPress core API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Rendered {
    pub rendered: String,
}

/// Convert a REST product to a domain product.
///
/// The first image becomes the featured image, the rest the gallery. Mezcal
/// details come from the `ABV` and `Volume` attributes, the first tag (as the
/// badge) and custom fields.
pub fn convert_product(product: RestProduct) -> Product {
    let abv = product.attribute("ABV");
    let volume = product
        .attribute("Volume")
        .unwrap_or_else(|| DEFAULT_VOLUME.to_string());
    let badge = product
        .tags
        .first()
        .and_then(|tag| non_empty(tag.name.clone()));
    let tasting_notes = TastingNotes {
        nose: product.meta("tasting_nose"),
        palate: product.meta("tasting_palate"),
        finish: product.meta("tasting_finish"),
    };
    let production_details = ProductionDetails {
        master_distiller: product.meta("master_distiller"),
        agave: product.meta("agave_type"),
        region: product.meta("region"),
        process: product.meta("process"),
    };

    let name = product.name;
    let mut images = product
        .images
        .into_iter()
        .map(|img| convert_image(img, &name));
    let image = images.next();
    let gallery_images = images.collect();

    let categories = product
        .categories
        .into_iter()
        .map(|c| ProductCategory {
            id: CategoryId::new(c.id.to_string()),
            name: c.name,
            slug: c.slug,
            description: None,
        })
        .collect();

    Product {
        id: product.id.to_string().into(),
        database_id: Some(product.id),
        slug: product.slug,
        description: product.description,
        short_description: non_empty(product.short_description),
        price: product.price,
        regular_price: product.regular_price,
        sale_price: non_empty(product.sale_price),
        on_sale: product.on_sale,
        stock_status: product.stock_status.parse().unwrap_or_default(),
        stock_quantity: product.stock_quantity,
        image,
        gallery_images,
        categories,
        sku: non_empty(product.sku),
        featured: product.featured,
        average_rating: product.average_rating.trim().parse().ok(),
        review_count: product.rating_count,
        abv,
        volume: Some(volume),
        badge,
        tasting_notes: (!tasting_notes.is_empty()).then_some(tasting_notes),
        production_details: (!production_details.is_empty()).then_some(production_details),
        name,
    }
}

pub fn convert_category(category: RestCategory) -> ProductCategory {
    ProductCategory {
        id: CategoryId::new(category.id.to_string()),
        name: category.name,
        slug: category.slug,
        description: non_empty(category.description),
    }
}

pub fn convert_page(page: RestPage) -> Page {
    Page {
        id: PageId::new(page.id.to_string()),
        slug: page.slug,
        title: page.title.rendered,
        content: page.content.rendered,
        excerpt: page.excerpt.rendered,
    }
}

fn convert_image(img: RestImage, product_name: &str) -> ProductImage {
    ProductImage {
        id: ImageId::new(img.id.to_string()),
        src: img.src,
        alt: non_empty(img.alt).unwrap_or_else(|| product_name.to_string()),
        name: non_empty(img.name).unwrap_or_else(|| product_name.to_string()),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use leon_core::StockStatus;
    use rust_decimal::Decimal;

    use super::*;

    const PRODUCT_JSON: &str = r#"{
        "id": 42,
        "name": "Jabalí Premium",
        "slug": "jabali-premium",
        "type": "simple",
        "status": "publish",
        "featured": false,
        "description": "<p>Wild jabalí agave.</p>",
        "short_description": "",
        "sku": "LDG-JAB",
        "price": "250.00",
        "regular_price": "250.00",
        "sale_price": "",
        "on_sale": false,
        "average_rating": "4.50",
        "rating_count": 3,
        "stock_quantity": null,
        "stock_status": "outofstock",
        "categories": [{"id": 17, "name": "Jabalí", "slug": "jabali"}],
        "images": [
            {"id": 101, "src": "https://shop.example.com/jabali.jpg", "name": "jabali", "alt": ""},
            {"id": 102, "src": "https://shop.example.com/jabali-2.jpg", "name": "", "alt": "Back label"}
        ],
        "attributes": [
            {"id": 1, "name": "ABV", "options": ["49% ABV"]},
            {"id": 2, "name": "Volume", "options": ["500ml"]}
        ],
        "tags": [{"id": 9, "name": "Limited", "slug": "limited"}],
        "meta_data": [
            {"id": 1, "key": "tasting_nose", "value": "Intense Tropical Fruit"},
            {"id": 2, "key": "tasting_palate", "value": "Oily, Herbal"},
            {"id": 3, "key": "master_distiller", "value": "Don Leoncio"},
            {"id": 4, "key": "agave_type", "value": "Jabalí (Agave convallis)"},
            {"id": 5, "key": "_edit_lock", "value": {"time": 1}}
        ]
    }"#;

    #[test]
    fn test_convert_product() {
        let rest: RestProduct = serde_json::from_str(PRODUCT_JSON).unwrap();
        let product = convert_product(rest);

        assert_eq!(product.id.as_str(), "42");
        assert_eq!(product.database_id, Some(42));
        assert_eq!(product.unit_price(), Ok(Decimal::new(25000, 2)));
        assert_eq!(product.sale_price, None);
        assert_eq!(product.short_description, None);
        assert_eq!(product.stock_status, StockStatus::OutOfStock);
        assert!(!product.is_purchasable());
        assert_eq!(product.average_rating, Some(4.5));
        assert_eq!(product.review_count, Some(3));
        assert!(product.in_category("jabali"));
    }

    #[test]
    fn test_mezcal_details_from_attributes_and_meta() {
        let rest: RestProduct = serde_json::from_str(PRODUCT_JSON).unwrap();
        let product = convert_product(rest);

        assert_eq!(product.abv.as_deref(), Some("49% ABV"));
        assert_eq!(product.volume.as_deref(), Some("500ml"));
        assert_eq!(product.badge.as_deref(), Some("Limited"));

        let notes = product.tasting_notes.unwrap();
        assert_eq!(notes.nose, "Intense Tropical Fruit");
        assert_eq!(notes.palate, "Oily, Herbal");
        assert_eq!(notes.finish, "");

        let details = product.production_details.unwrap();
        assert_eq!(details.master_distiller, "Don Leoncio");
        assert_eq!(details.agave, "Jabalí (Agave convallis)");
        assert_eq!(details.region, "");
    }

    #[test]
    fn test_first_image_is_featured() {
        let rest: RestProduct = serde_json::from_str(PRODUCT_JSON).unwrap();
        let product = convert_product(rest);

        let image = product.image.as_ref().unwrap();
        assert_eq!(image.id.as_str(), "101");
        assert_eq!(image.alt, "Jabalí Premium");
        assert_eq!(image.name, "jabali");

        assert_eq!(product.gallery_images.len(), 1);
        assert_eq!(product.gallery_images[0].alt, "Back label");
        assert_eq!(product.gallery_images[0].name, "Jabalí Premium");
    }

    #[test]
    fn test_sparse_product() {
        let rest: RestProduct = serde_json::from_str(r#"{"id": 7, "name": "Sample"}"#).unwrap();
        let product = convert_product(rest);
        assert_eq!(product.stock_status, StockStatus::InStock);
        assert!(product.image.is_none());
        assert_eq!(product.average_rating, None);
        assert_eq!(product.volume.as_deref(), Some("750ml"));
        assert_eq!(product.abv, None);
        assert_eq!(product.badge, None);
        assert_eq!(product.tasting_notes, None);
        assert_eq!(product.production_details, None);
    }

    #[test]
    fn test_backorder_status() {
        let rest: RestProduct =
            serde_json::from_str(r#"{"id": 8, "name": "Ensamble", "stock_status": "onbackorder"}"#)
                .unwrap();
        assert_eq!(convert_product(rest).stock_status, StockStatus::OnBackorder);
    }

    #[test]
    fn test_convert_category() {
        let rest: RestCategory = serde_json::from_str(
            r#"{"id": 15, "name": "Espadín", "slug": "espadin", "description": "", "count": 2}"#,
        )
        .unwrap();
        let category = convert_category(rest);
        assert_eq!(category.id.as_str(), "15");
        assert_eq!(category.description, None);
    }

    #[test]
    fn test_convert_page() {
        let rest: RestPage = serde_json::from_str(
            r#"{
                "id": 12,
                "slug": "our-story",
                "status": "publish",
                "title": {"rendered": "Our Story"},
                "content": {"rendered": "<p>Four generations in Santiago Matatlán.</p>", "protected": false}
            }"#,
        )
        .unwrap();
        let page = convert_page(rest);
        assert_eq!(page.id.as_str(), "12");
        assert_eq!(page.title, "Our Story");
        assert!(page.content.contains("Matatlán"));
        assert_eq!(page.excerpt, "");
    }
}
