//! Wishlist route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use freshcart_core::ProductId;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::services::WishlistService;
use crate::state::AppState;

use super::{Layout, ProductCard, safe_return_to};

/// Wishlist toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub product_id: String,
    pub return_to: Option<String>,
}

/// Wishlist page template.
#[derive(Template, WebTemplate)]
#[template(path = "wishlist/show.html")]
pub struct WishlistTemplate {
    pub layout: Layout,
    pub products: Vec<ProductCard>,
}

/// Display the wishlist, refreshed from the API.
#[instrument(skip_all)]
pub async fn show(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let wishlist = WishlistService::new(state.api(), &session).refresh().await?;
    let products = wishlist
        .items
        .into_iter()
        .map(|product| ProductCard {
            product,
            in_wishlist: true,
        })
        .collect();

    Ok(WishlistTemplate {
        layout: Layout::load(&session, "/wishlist").await?,
        products,
    })
}

/// Add or remove a product, then go back to the page the form was on.
///
/// Anonymous visitors get the "Please login first" flash.
#[instrument(skip(state, session))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ToggleForm>,
) -> Result<Response> {
    WishlistService::new(state.api(), &session)
        .toggle(&ProductId::new(form.product_id))
        .await?;
    Ok(Redirect::to(&safe_return_to(form.return_to.as_deref())).into_response())
}
