//! Saved address route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use freshcart_core::AddressId;

use crate::api::{Address, NewAddress};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::services::{flash, session_token};
use crate::state::AppState;

use super::Layout;

/// New address form data.
#[derive(Debug, Deserialize)]
pub struct AddressForm {
    pub name: String,
    pub details: String,
    pub phone: String,
    pub city: String,
}

/// Address book template.
#[derive(Template, WebTemplate)]
#[template(path = "addresses/index.html")]
pub struct AddressesTemplate {
    pub layout: Layout,
    pub addresses: Vec<Address>,
}

/// Display saved addresses.
#[instrument(skip_all)]
pub async fn index(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response> {
    let Some(token) = session_token(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let addresses = state.api().addresses(&token).await?;

    Ok(AddressesTemplate {
        layout: Layout::load(&session, "/addresses").await?,
        addresses,
    }
    .into_response())
}

/// Save a new address.
#[instrument(skip_all)]
pub async fn create(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddressForm>,
) -> Result<Response> {
    let Some(token) = session_token(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let address = NewAddress {
        name: form.name.trim(),
        details: form.details.trim(),
        phone: form.phone.trim(),
        city: form.city.trim(),
    };

    match state.api().add_address(&token, &address).await {
        Ok(_) => flash::success(&session, "Address added!").await?,
        Err(e) => {
            warn!(error = %e, "Failed to add address");
            let message = e.user_message().unwrap_or("Failed to add address");
            flash::error(&session, message).await?;
        }
    }
    Ok(Redirect::to("/addresses").into_response())
}

/// Remove a saved address.
#[instrument(skip_all, fields(address_id = %id))]
pub async fn delete(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(token) = session_token(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    match state.api().remove_address(&token, &AddressId::new(id)).await {
        Ok(_) => flash::success(&session, "Address removed").await?,
        Err(e) => {
            warn!(error = %e, "Failed to remove address");
            flash::error(&session, "Failed to remove address").await?;
        }
    }
    Ok(Redirect::to("/addresses").into_response())
}
