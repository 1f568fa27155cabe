//! Product list filters used by the shop pages and the CLI.

use leon_core::Product;

/// Products in the category with the given slug.
///
/// An empty slug or `all` matches every product.
#[must_use]
pub fn filter_by_category<'a>(products: &'a [Product], slug: &str) -> Vec<&'a Product> {
    let slug = slug.trim();
    if slug.is_empty() || slug.eq_ignore_ascii_case("all") {
        return products.iter().collect();
    }
    products.iter().filter(|p| p.in_category(slug)).collect()
}

/// Featured products.
#[must_use]
pub fn featured(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.featured).collect()
}

/// Products with a sale price in effect.
#[must_use]
pub fn on_sale(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.on_sale).collect()
}
