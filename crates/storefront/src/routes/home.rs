//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::{Category, ProductQuery};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::{Layout, ProductCard, stored_wishlist};

/// Products shown under "Featured Products".
const FEATURED_PRODUCTS: u32 = 8;

/// Categories shown under "Shop by Category".
const FEATURED_CATEGORIES: usize = 6;

/// A selling point on the home page: `(icon, title, detail)`.
pub const FEATURES: [(&str, &str, &str); 4] = [
    ("🚚", "Free Shipping", "On orders over 500 EGP"),
    ("🔒", "Secure Payment", "100% secure checkout"),
    ("💬", "24/7 Support", "Dedicated support"),
    ("↩", "Easy Returns", "30 day return policy"),
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub categories: Vec<Category>,
    pub products: Vec<ProductCard>,
    pub features: &'static [(&'static str, &'static str, &'static str)],
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let query = ProductQuery::default().with_limit(FEATURED_PRODUCTS);
    let (products, mut categories) =
        tokio::try_join!(state.api().products(&query), state.api().categories())?;
    categories.truncate(FEATURED_CATEGORIES);

    let wishlist = stored_wishlist(&session).await?;

    Ok(HomeTemplate {
        layout: Layout::load(&session, "/").await?,
        categories,
        products: ProductCard::list(&products.data, &wishlist),
        features: &FEATURES,
    })
}
