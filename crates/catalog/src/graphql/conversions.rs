//! `WPGraphQL` response types and their conversion to domain types.

use leon_core::{CategoryId, ImageId, Product, ProductCategory, ProductImage, StockStatus};
use serde::Deserialize;

/// `{ nodes: [...] }` connection wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Nodes<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsData {
    pub products: Option<ProductConnection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConnection {
    #[serde(default)]
    pub nodes: Vec<ProductNode>,
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductData {
    pub product: Option<ProductNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesData {
    pub product_categories: Option<Nodes<CategoryNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub database_id: Option<i64>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    #[serde(default)]
    pub on_sale: bool,
    #[serde(default)]
    pub featured: bool,
    pub average_rating: Option<f64>,
    pub review_count: Option<i64>,
    pub price: Option<String>,
    pub regular_price: Option<String>,
    pub sale_price: Option<String>,
    pub stock_status: Option<String>,
    pub stock_quantity: Option<i64>,
    pub image: Option<ImageNode>,
    #[serde(default)]
    pub gallery_images: Option<Nodes<ImageNode>>,
    #[serde(default)]
    pub product_categories: Option<Nodes<CategoryNode>>,
    pub sku: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub id: String,
    pub source_url: Option<String>,
    pub alt_text: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryNode {
    pub id: String,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Convert a product node to a domain product.
///
/// Image alt text and name fall back to the product name when blank.
pub fn convert_product(node: ProductNode) -> Product {
    let name = node.name.unwrap_or_default();
    let image = node.image.map(|img| convert_image(img, &name));
    let gallery_images = node
        .gallery_images
        .unwrap_or_default()
        .nodes
        .into_iter()
        .map(|img| convert_image(img, &name))
        .collect();
    let categories = node
        .product_categories
        .unwrap_or_default()
        .nodes
        .into_iter()
        .map(convert_category)
        .collect();

    Product {
        id: node.id.into(),
        database_id: node.database_id,
        slug: node.slug.unwrap_or_default(),
        description: node.description.unwrap_or_default(),
        short_description: non_blank(node.short_description),
        price: node.price.unwrap_or_default(),
        regular_price: node.regular_price.unwrap_or_default(),
        sale_price: non_blank(node.sale_price),
        on_sale: node.on_sale,
        stock_status: node
            .stock_status
            .and_then(|s| s.parse().ok())
            .unwrap_or_default(),
        stock_quantity: node.stock_quantity,
        image,
        gallery_images,
        categories,
        sku: non_blank(node.sku),
        featured: node.featured,
        average_rating: node.average_rating,
        review_count: node.review_count,
        abv: None,
        volume: None,
        badge: None,
        tasting_notes: None,
        production_details: None,
        name,
    }
}

/// Convert one page of products.
///
/// Returns the products and the cursor of the next page, if there is one.
pub fn convert_product_page(data: ProductsData) -> (Vec<Product>, Option<String>) {
    let Some(connection) = data.products else {
        return (Vec::new(), None);
    };
    let next = connection
        .page_info
        .filter(|info| info.has_next_page)
        .and_then(|info| info.end_cursor);
    let products = connection.nodes.into_iter().map(convert_product).collect();
    (products, next)
}

pub fn convert_category(node: CategoryNode) -> ProductCategory {
    ProductCategory {
        id: CategoryId::new(node.id),
        name: node.name.unwrap_or_default(),
        slug: node.slug.unwrap_or_default(),
        description: non_blank(node.description),
    }
}

fn convert_image(node: ImageNode, product_name: &str) -> ProductImage {
    ProductImage {
        id: ImageId::new(node.id),
        src: node.source_url.unwrap_or_default(),
        alt: non_blank(node.alt_text).unwrap_or_else(|| product_name.to_string()),
        name: non_blank(node.title).unwrap_or_else(|| product_name.to_string()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
