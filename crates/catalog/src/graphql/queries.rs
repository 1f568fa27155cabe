//! `WPGraphQL` query definitions for `WooCommerce` products.
//!
//! The CMS schema is not checked in, so the `GraphQLQuery` impls are written
//! by hand instead of derived; response types live in `conversions`.

use graphql_client::{GraphQLQuery, QueryBody};
use serde::Serialize;

use super::conversions::{CategoriesData, ProductData, ProductsData};

const PRODUCT_FIELDS: &str = r"
    id
    databaseId
    name
    slug
    description
    shortDescription
    onSale
    featured
    averageRating
    reviewCount
    ... on SimpleProduct {
      price
      regularPrice
      salePrice
      stockStatus
      stockQuantity
    }
    image {
      id
      sourceUrl
      altText
      title
    }
    galleryImages {
      nodes {
        id
        sourceUrl
        altText
        title
      }
    }
    productCategories {
      nodes {
        id
        name
        slug
        description
      }
    }
    sku
";

/// Page size used for product listings.
pub const PRODUCTS_PAGE_SIZE: i64 = 100;

// Product queries
pub struct GetProducts;

pub mod get_products {
    use super::Serialize;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub first: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub after: Option<String>,
    }
}

impl GraphQLQuery for GetProducts {
    type Variables = get_products::Variables;
    type ResponseData = ProductsData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_products_query(),
            operation_name: "GetProducts",
        }
    }
}

pub struct GetProductBySlug;

pub mod get_product_by_slug {
    use super::Serialize;

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub slug: String,
    }
}

impl GraphQLQuery for GetProductBySlug {
    type Variables = get_product_by_slug::Variables;
    type ResponseData = ProductData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: get_product_by_slug_query(),
            operation_name: "GetProductBySlug",
        }
    }
}

// Category queries
pub struct GetProductCategories;

pub mod get_product_categories {
    use super::Serialize;

    #[derive(Debug, Clone, Default, Serialize)]
    pub struct Variables;
}

impl GraphQLQuery for GetProductCategories {
    type Variables = get_product_categories::Variables;
    type ResponseData = CategoriesData;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: GET_PRODUCT_CATEGORIES,
            operation_name: "GetProductCategories",
        }
    }
}

const GET_PRODUCT_CATEGORIES: &str = r"
  query GetProductCategories {
    productCategories(first: 100, where: { hideEmpty: true }) {
      nodes {
        id
        name
        slug
        description
      }
    }
  }
";

// `QueryBody::query` is `&'static str`; the product queries share a field
// list, so they are assembled once into statics.
fn get_products_query() -> &'static str {
    static QUERY: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    QUERY.get_or_init(|| {
        format!(
            r#"
  query GetProducts($first: Int = 100, $after: String) {{
    products(first: $first, after: $after, where: {{ status: "publish" }}) {{
      nodes {{{PRODUCT_FIELDS}}}
      pageInfo {{
        hasNextPage
        endCursor
      }}
    }}
  }}
"#
        )
    })
}

fn get_product_by_slug_query() -> &'static str {
    static QUERY: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    QUERY.get_or_init(|| {
        format!(
            r"
  query GetProductBySlug($slug: ID!) {{
    product(id: $slug, idType: SLUG) {{{PRODUCT_FIELDS}}}
  }}
"
        )
    })
}
