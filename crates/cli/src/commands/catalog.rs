//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! leon catalog products --category espadin
//! leon catalog products --featured
//! leon catalog product tobala-silvestre
//! leon catalog categories
//! leon catalog stockists
//! leon catalog page our-story
//! leon catalog site
//! ```

use leon_catalog::{Catalog, CatalogSource, FixtureCatalog, SiteSettings, Stockist, filters};
use leon_core::{Page, Price, Product, ProductCategory, parse_price};

use super::CliError;

/// Filters for the product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub featured: bool,
    pub on_sale: bool,
}

/// List products matching `filter`.
pub async fn products<C: Catalog>(catalog: &C, filter: &ProductFilter) -> Vec<Product> {
    let all = catalog.products().await;

    let mut selected = filters::filter_by_category(&all, filter.category.as_deref().unwrap_or(""));
    if filter.featured {
        selected.retain(|p| p.featured);
    }
    if filter.on_sale {
        selected.retain(|p| p.on_sale);
    }

    if selected.is_empty() {
        tracing::info!("No products found");
    }
    for product in &selected {
        log_product_line(product);
    }

    selected.into_iter().cloned().collect()
}

/// Show one product in detail.
///
/// # Errors
///
/// Returns an error if no product has the given slug.
pub async fn product<C: Catalog>(catalog: &C, slug: &str) -> Result<Product, CliError> {
    let product = catalog
        .product_by_slug(slug)
        .await
        .ok_or_else(|| CliError::ProductNotFound(slug.to_string()))?;

    log_product_line(&product);
    if let Some(regular) = product.sale_price.as_ref().and(display_price(&product.regular_price)) {
        tracing::info!("Regular price: {regular}");
    }
    let categories: Vec<&str> = product.categories.iter().map(|c| c.name.as_str()).collect();
    tracing::info!(
        stock = %product.stock_status,
        quantity = ?product.stock_quantity,
        categories = %categories.join(", "),
        "{}",
        product.description
    );
    if let Some(abv) = &product.abv {
        tracing::info!(
            volume = product.volume.as_deref().unwrap_or_default(),
            badge = product.badge.as_deref().unwrap_or_default(),
            "ABV: {abv}"
        );
    }
    if let Some(notes) = &product.tasting_notes {
        tracing::info!(
            palate = %notes.palate,
            finish = %notes.finish,
            "Nose: {}",
            notes.nose
        );
    }
    if let Some(details) = &product.production_details {
        tracing::info!(
            agave = %details.agave,
            region = %details.region,
            process = %details.process,
            "Master distiller: {}",
            details.master_distiller
        );
    }
    Ok(product)
}

/// List product categories.
pub async fn categories<C: Catalog>(catalog: &C) -> Vec<ProductCategory> {
    let categories = catalog.categories().await;
    if categories.is_empty() {
        tracing::info!("No categories found");
    }
    for category in &categories {
        tracing::info!(slug = %category.slug, "{}", category.name);
    }
    categories
}

/// List stockist locations from the embedded fixtures.
pub fn stockists(fixtures: &FixtureCatalog) -> Vec<Stockist> {
    for stockist in fixtures.stockists() {
        tracing::info!(
            kind = %stockist.kind,
            phone = %stockist.phone,
            hours = %stockist.hours,
            "{}: {}, {}, {} {}",
            stockist.name,
            stockist.address,
            stockist.city,
            stockist.state,
            stockist.zip_code
        );
    }
    fixtures.stockists().to_vec()
}

/// Show a content page by slug.
///
/// # Errors
///
/// Returns an error if the page does not exist or cannot be fetched.
pub async fn page(catalog: &CatalogSource, slug: &str) -> Result<Page, CliError> {
    let page = catalog
        .page_by_slug(slug)
        .await
        .ok_or_else(|| CliError::PageNotFound(slug.to_string()))?;
    tracing::info!(slug = %page.slug, "{}", page.title);
    tracing::info!("{}", page.content);
    Ok(page)
}

/// Show site branding and contact details.
pub async fn site(catalog: &CatalogSource) -> Option<SiteSettings> {
    let Some(site) = catalog.site_settings().await else {
        tracing::warn!("No site settings available");
        return None;
    };
    tracing::info!(
        email = %site.email,
        phone = %site.phone,
        "{}: {}",
        site.name,
        site.tagline
    );
    for link in &site.navigation {
        tracing::info!(href = %link.href, "{}", link.name);
    }
    Some(site)
}

fn log_product_line(product: &Product) {
    let price = display_price(&product.price).unwrap_or_else(|| product.price.clone());
    tracing::info!(
        slug = %product.slug,
        on_sale = product.on_sale,
        purchasable = product.is_purchasable(),
        "{} {}",
        product.name,
        price
    );
}

fn display_price(text: &str) -> Option<String> {
    parse_price(text).ok().map(|amount| Price::usd(amount).display())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn slugs(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.slug.as_str()).collect()
    }

    #[tokio::test]
    async fn test_products_unfiltered() {
        let catalog = FixtureCatalog::load();
        let listed = products(&catalog, &ProductFilter::default()).await;
        assert_eq!(listed.len(), 6);
    }

    #[tokio::test]
    async fn test_products_by_category() {
        let catalog = FixtureCatalog::load();
        let filter = ProductFilter {
            category: Some("espadin".to_string()),
            ..ProductFilter::default()
        };
        let listed = products(&catalog, &filter).await;
        assert_eq!(slugs(&listed), vec!["espadin-clasico", "madre-dulce"]);
    }

    #[tokio::test]
    async fn test_products_featured_on_sale() {
        let catalog = FixtureCatalog::load();
        let filter = ProductFilter {
            featured: true,
            on_sale: true,
            ..ProductFilter::default()
        };
        let listed = products(&catalog, &filter).await;
        assert_eq!(slugs(&listed), vec!["tobala-silvestre"]);
    }

    #[tokio::test]
    async fn test_product_detail() {
        let catalog = FixtureCatalog::load();
        let tobala = product(&catalog, "tobala-silvestre").await.unwrap();
        assert_eq!(tobala.regular_price, "185.00");

        let err = product(&catalog, "pulque").await.unwrap_err();
        assert!(matches!(err, CliError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn test_categories_and_stockists() {
        let catalog = FixtureCatalog::load();
        assert_eq!(categories(&catalog).await.len(), 5);
        assert_eq!(stockists(&catalog).len(), 4);
    }

    #[tokio::test]
    async fn test_product_detail_carries_tasting_notes() {
        let catalog = FixtureCatalog::load();
        let tepeztate = product(&catalog, "tepeztate-anejo").await.unwrap();
        assert!(tepeztate.abv.is_some());
        assert!(tepeztate.tasting_notes.is_some());
    }

    #[tokio::test]
    async fn test_page_and_site_from_fixtures() {
        let source = CatalogSource::from_config(&leon_catalog::CatalogConfig::default());

        let err = page(&source, "our-story").await.unwrap_err();
        assert!(matches!(err, CliError::PageNotFound(ref slug) if slug == "our-story"));

        let settings = site(&source).await.unwrap();
        assert_eq!(settings.name, "León de Guerrero");
        assert_eq!(settings.navigation.len(), 5);
    }

    #[test]
    fn test_display_price() {
        assert_eq!(display_price("85.00").as_deref(), Some("$85.00"));
        assert_eq!(display_price("$1,250.5").as_deref(), Some("$1250.50"));
        assert_eq!(display_price("call us"), None);
    }
}
