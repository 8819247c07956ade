//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use freshcart_core::{BrandId, CategoryId, ProductId};

use crate::api::{PageMetadata, Product, ProductQuery};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::{Layout, ProductCard, stored_wishlist};

/// Listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub brand: Option<String>,
    pub category: Option<String>,
    /// Title filter, applied to the fetched page.
    pub q: Option<String>,
    pub page: Option<u32>,
}

impl ListingQuery {
    fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn to_api_query(&self) -> ProductQuery {
        let mut query = ProductQuery::default().with_page(self.page.unwrap_or(1));
        if let Some(brand) = non_empty(self.brand.as_deref()) {
            query = query.with_brand(BrandId::new(brand));
        }
        if let Some(category) = non_empty(self.category.as_deref()) {
            query = query.with_category(CategoryId::new(category));
        }
        query
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Keep the products whose title contains `search`, ignoring case.
#[must_use]
pub fn filter_by_title(products: Vec<Product>, search: Option<&str>) -> Vec<Product> {
    let Some(search) = search else {
        return products;
    };
    let needle = search.to_lowercase();
    products
        .into_iter()
        .filter(|product| product.title.to_lowercase().contains(&needle))
        .collect()
}

/// Pagination controls for the listing.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    /// Query string shared by every page link, without `page`.
    base_query: String,
}

impl Pagination {
    fn new(metadata: Option<&PageMetadata>, query: &ListingQuery) -> Self {
        let mut params = Vec::new();
        for (name, value) in [
            ("brand", query.brand.as_deref()),
            ("category", query.category.as_deref()),
            ("q", query.search()),
        ] {
            if let Some(value) = non_empty(value) {
                params.push(format!("{name}={}", urlencoding::encode(value)));
            }
        }

        let (current_page, total_pages) = metadata.map_or((1, 1), |m| {
            (m.current_page.max(1), m.number_of_pages.max(1))
        });

        Self {
            current_page,
            total_pages,
            base_query: params.join("&"),
        }
    }

    /// Numbered page links.
    #[must_use]
    pub fn pages(&self) -> Vec<PageLink> {
        (1..=self.total_pages)
            .map(|number| PageLink {
                number,
                href: self.href(number),
                current: number == self.current_page,
            })
            .collect()
    }

    #[must_use]
    pub fn prev_href(&self) -> Option<String> {
        (self.current_page > 1).then(|| self.href(self.current_page - 1))
    }

    #[must_use]
    pub fn next_href(&self) -> Option<String> {
        (self.current_page < self.total_pages).then(|| self.href(self.current_page + 1))
    }

    /// Link to `page` with the listing's filters.
    fn href(&self, page: u32) -> String {
        if self.base_query.is_empty() {
            format!("/products?page={page}")
        } else {
            format!("/products?{}&page={page}", self.base_query)
        }
    }
}

/// One numbered pagination link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: u32,
    pub href: String,
    pub current: bool,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
    pub search: String,
    pub brand: String,
    pub category: String,
    pub pagination: Pagination,
}

/// Display the product listing.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse> {
    let response = state.api().products(&query.to_api_query()).await?;
    let pagination = Pagination::new(response.metadata.as_ref(), &query);
    let products = filter_by_title(response.data, query.search());

    let wishlist = stored_wishlist(&session).await?;

    Ok(ProductsIndexTemplate {
        layout: Layout::load(&session, "/products").await?,
        products: ProductCard::list(&products, &wishlist),
        search: query.search().unwrap_or_default().to_string(),
        brand: query.brand.clone().unwrap_or_default(),
        category: query.category.clone().unwrap_or_default(),
        pagination,
    })
}

/// Detail query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    /// Index into the gallery for the main image.
    pub image: Option<usize>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub layout: Layout,
    pub product: Product,
    pub gallery: Vec<String>,
    pub selected_image: usize,
    pub in_wishlist: bool,
    /// This page's path, posted back as `return_to`.
    pub return_to: String,
}

impl ProductShowTemplate {
    #[must_use]
    pub fn main_image(&self) -> &str {
        self.gallery
            .get(self.selected_image)
            .map_or(self.product.image_cover.as_str(), String::as_str)
    }
}

/// Display a product.
#[instrument(skip(state, session, uri))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> Result<impl IntoResponse> {
    let product = state.api().product(&ProductId::new(id)).await?;

    let gallery = product.gallery();
    let selected_image = query
        .image
        .filter(|i| *i < gallery.len())
        .unwrap_or_default();
    let in_wishlist = stored_wishlist(&session).await?.contains(&product.id);
    let return_to = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), ToString::to_string);

    Ok(ProductShowTemplate {
        layout: Layout::load(&session, uri.path()).await?,
        product,
        gallery,
        selected_image,
        in_wishlist,
        return_to,
    })
}

#[cfg(test)]
mod tests {
    use freshcart_core::Price;

    use super::*;

    fn product(title: &str) -> Product {
        Product {
            id: ProductId::new(title),
            title: title.to_string(),
            slug: String::new(),
            description: String::new(),
            quantity: 1,
            sold: None,
            price: Price::from_pounds(100),
            price_after_discount: None,
            image_cover: String::new(),
            images: Vec::new(),
            ratings_average: 0.0,
            ratings_quantity: 0,
            category: None,
            brand: None,
            subcategory: Vec::new(),
        }
    }

    #[test]
    fn test_filter_by_title_is_case_insensitive() {
        let products = vec![product("Woman Shawl"), product("Men Tshirt"), product("SHAWL wrap")];

        let filtered = filter_by_title(products, Some("shawl"));
        let titles: Vec<_> = filtered.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["Woman Shawl", "SHAWL wrap"]);
    }

    #[test]
    fn test_filter_by_title_without_search_keeps_all() {
        let products = vec![product("a"), product("b")];
        assert_eq!(filter_by_title(products, None).len(), 2);
    }

    #[test]
    fn test_listing_query_ignores_blank_filters() {
        let query = ListingQuery {
            brand: Some("  ".to_string()),
            category: Some("6439d58a0049ad0b52b9003f".to_string()),
            q: Some(" ".to_string()),
            page: Some(2),
        };
        assert_eq!(query.search(), None);
        assert_eq!(
            query.to_api_query().to_params(),
            vec![
                ("category[in]", "6439d58a0049ad0b52b9003f".to_string()),
                ("page", "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_pagination_links_keep_filters() {
        let query = ListingQuery {
            brand: Some("64089bbe24b25627a253158b".to_string()),
            category: None,
            q: Some("red shirt".to_string()),
            page: None,
        };
        let metadata = PageMetadata {
            current_page: 1,
            number_of_pages: 3,
            limit: 40,
            next_page: Some(2),
            prev_page: None,
        };

        let pagination = Pagination::new(Some(&metadata), &query);
        assert_eq!(pagination.prev_href(), None);
        assert_eq!(
            pagination.next_href().as_deref(),
            Some("/products?brand=64089bbe24b25627a253158b&q=red%20shirt&page=2")
        );

        let pages = pagination.pages();
        assert_eq!(pages.len(), 3);
        assert!(pages[0].current);
        assert_eq!(
            pages[2].href,
            "/products?brand=64089bbe24b25627a253158b&q=red%20shirt&page=3"
        );
    }

    #[test]
    fn test_pagination_defaults_to_single_page() {
        let pagination = Pagination::new(None, &ListingQuery::default());
        assert_eq!(pagination.total_pages, 1);
        assert_eq!(pagination.next_href(), None);
        assert_eq!(pagination.pages()[0].href, "/products?page=1");
    }
}
