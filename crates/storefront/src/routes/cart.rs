//! Cart route handlers.
//!
//! The cart lives in the commerce API; the session keeps a snapshot for the
//! navbar badge, refreshed by every mutation and by the cart page itself.

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
use crate::models::CartSnapshot;
use crate::services::CartService;
use crate::state::AppState;

use super::{Layout, safe_return_to};

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub return_to: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub count: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: Option<CartSnapshot>,
}

impl CartShowTemplate {
    /// Lines to render; none for a missing or empty cart.
    #[must_use]
    pub fn lines(&self) -> &[crate::models::CartLine] {
        self.cart.as_ref().map_or(&[], |cart| cart.lines.as_slice())
    }
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display the cart page, refreshed from the API.
#[instrument(skip_all)]
pub async fn show(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.api(), &session)
        .refresh()
        .await?
        .filter(|cart| !cart.is_empty());

    Ok(CartShowTemplate {
        layout: Layout::load(&session, "/cart").await?,
        cart,
    })
}

/// Add one unit of a product, then go back to the page the form was on.
///
/// Anonymous visitors get the "Please login first" flash.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    CartService::new(state.api(), &session)
        .add(&ProductId::new(form.product_id))
        .await?;
    Ok(Redirect::to(&safe_return_to(form.return_to.as_deref())).into_response())
}

/// Set a line's quantity.
#[instrument(skip_all)]
pub async fn update(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    CartService::new(state.api(), &session)
        .update_quantity(&ProductId::new(form.product_id), form.count)
        .await?;
    Ok(Redirect::to("/cart").into_response())
}

/// Remove a line.
#[instrument(skip_all)]
pub async fn remove(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    CartService::new(state.api(), &session)
        .remove(&ProductId::new(form.product_id))
        .await?;
    Ok(Redirect::to("/cart").into_response())
}

/// Empty the cart.
#[instrument(skip_all)]
pub async fn clear(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response> {
    CartService::new(state.api(), &session).clear().await?;
    Ok(Redirect::to("/cart").into_response())
}

/// Cart count badge, from the stored snapshot.
#[instrument(skip_all)]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<impl IntoResponse> {
    let count = CartService::new(state.api(), &session)
        .snapshot()
        .await?
        .map_or(0, |cart| cart.item_count);

    Ok(CartCountTemplate { count })
}
