//! Brand route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tower_sessions::Session;
use tracing::instrument;

use freshcart_core::BrandId;

use crate::api::{Brand, ProductQuery};
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::{Layout, ProductCard, stored_wishlist};

/// Brand grid template.
#[derive(Template, WebTemplate)]
#[template(path = "brands/index.html")]
pub struct BrandsIndexTemplate {
    pub layout: Layout,
    pub brands: Vec<Brand>,
}

/// Brand detail template.
#[derive(Template, WebTemplate)]
#[template(path = "brands/show.html")]
pub struct BrandShowTemplate {
    pub layout: Layout,
    pub brand: Brand,
    pub products: Vec<ProductCard>,
}

/// Display all brands.
#[instrument(skip(state, session))]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let brands = state.api().brands().await?;

    Ok(BrandsIndexTemplate {
        layout: Layout::load(&session, "/brands").await?,
        brands,
    })
}

/// Display a brand with its products.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = BrandId::new(id);
    let query = ProductQuery::default().with_brand(id.clone());
    let (brand, products) =
        tokio::try_join!(state.api().brand(&id), state.api().products(&query))?;

    let wishlist = stored_wishlist(&session).await?;
    let path = format!("/brands/{id}");

    Ok(BrandShowTemplate {
        layout: Layout::load(&session, &path).await?,
        brand,
        products: ProductCard::list(&products.data, &wishlist),
    })
}
