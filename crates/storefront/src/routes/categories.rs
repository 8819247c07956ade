//! Category route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use freshcart_core::CategoryId;

use crate::api::{Category, ProductQuery, Subcategory};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::{Layout, ProductCard, stored_wishlist};

/// Category grid template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub layout: Layout,
    pub categories: Vec<Category>,
}

/// Category detail template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub layout: Layout,
    pub category: Category,
    pub subcategories: Vec<Subcategory>,
    pub products: Vec<ProductCard>,
}

/// Display all categories.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let categories = state.api().categories().await?;

    Ok(CategoriesIndexTemplate {
        layout: Layout::load(&session, "/categories").await?,
        categories,
    })
}

/// Display a category with its subcategories and products.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = CategoryId::new(id);
    let query = ProductQuery::default().with_category(id.clone());
    let (category, subcategories, products) = tokio::try_join!(
        state.api().category(&id),
        state.api().subcategories(&id),
        state.api().products(&query),
    )?;

    let wishlist = stored_wishlist(&session).await?;
    let path = format!("/categories/{id}");

    Ok(CategoryShowTemplate {
        layout: Layout::load(&session, &path).await?,
        category,
        subcategories,
        products: ProductCard::list(&products.data, &wishlist),
    })
}
