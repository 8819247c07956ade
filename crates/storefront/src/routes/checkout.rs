//! Checkout route handlers.
//!
//! Cash orders are placed directly against the cart. Card payments open a
//! hosted checkout session and redirect the customer to it; the payment page
//! sends them back to the storefront's public base URL.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use freshcart_core::PaymentMethod;

use crate::api::{ApiError, ShippingAddress};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{ApiToken, CartSnapshot, Flash};
use crate::services::{CartService, flash, session_token};
use crate::state::AppState;

use super::Layout;

/// Checkout form data.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
}

impl CheckoutForm {
    /// The shipping address, or `None` when any field is blank.
    #[must_use]
    pub fn shipping_address(&self) -> Option<ShippingAddress> {
        let details = self.details.trim();
        let phone = self.phone.trim();
        let city = self.city.trim();
        if details.is_empty() || phone.is_empty() || city.is_empty() {
            return None;
        }
        Some(ShippingAddress {
            details: details.to_string(),
            phone: phone.to_string(),
            city: city.to_string(),
        })
    }

    #[must_use]
    pub fn is_cash(&self) -> bool {
        self.payment_method == PaymentMethod::Cash
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub cart: CartSnapshot,
    pub form: CheckoutForm,
}

/// Refreshed cart, or `None` when there is nothing to check out.
async fn checkout_cart(state: &AppState, session: &Session) -> Result<Option<CartSnapshot>> {
    Ok(CartService::new(state.api(), session)
        .refresh()
        .await?
        .filter(|cart| !cart.is_empty() && cart.cart_id.is_some()))
}

/// Display the checkout form.
#[instrument(skip_all)]
pub async fn show(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response> {
    let Some(cart) = checkout_cart(&state, &session).await? else {
        return Ok(Redirect::to("/cart").into_response());
    };

    Ok(CheckoutTemplate {
        layout: Layout::load(&session, "/checkout").await?,
        cart,
        form: CheckoutForm::default(),
    }
    .into_response())
}

/// Re-render the form with its input and an error, keeping any pending flash.
async fn rerender(
    session: &Session,
    cart: CartSnapshot,
    form: CheckoutForm,
    message: &str,
) -> Result<Response> {
    let mut layout = Layout::load(session, "/checkout").await?;
    layout.push_flash(Flash::error(message));
    Ok(CheckoutTemplate { layout, cart, form }.into_response())
}

/// Place the order.
#[instrument(skip_all)]
pub async fn submit(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let (Some(token), Some(cart)) = (
        session_token(&session).await?,
        checkout_cart(&state, &session).await?,
    ) else {
        return Ok(Redirect::to("/cart").into_response());
    };

    let Some(address) = form.shipping_address() else {
        return rerender(&session, cart, form, "Please fill all shipping details").await;
    };

    match form.payment_method {
        PaymentMethod::Cash => match place_cash_order(&state, &token, &cart, address).await {
            Ok(()) => {
                flash::success(&session, "Order placed successfully!").await?;
                CartService::new(state.api(), &session).refresh().await?;
                Ok(Redirect::to("/orders").into_response())
            }
            Err(e) => {
                warn!(error = %e, "Cash order failed");
                let message = e.user_message().unwrap_or("Failed to place order").to_string();
                rerender(&session, cart, form, &message).await
            }
        },
        PaymentMethod::Card => match start_card_payment(&state, &token, &cart).await {
            Ok(Some(url)) => {
                add_breadcrumb("checkout", "Redirected to card payment", None);
                Ok(Redirect::to(&url).into_response())
            }
            Ok(None) => {
                rerender(&session, cart, form, "Failed to create checkout session").await
            }
            Err(e) => {
                warn!(error = %e, "Checkout session failed");
                let message = e.user_message().unwrap_or("Failed to place order").to_string();
                rerender(&session, cart, form, &message).await
            }
        },
    }
}

async fn place_cash_order(
    state: &AppState,
    token: &ApiToken,
    cart: &CartSnapshot,
    address: ShippingAddress,
) -> std::result::Result<(), ApiError> {
    let Some(cart_id) = &cart.cart_id else {
        return Err(ApiError::UnexpectedResponse("cart has no id".to_string()));
    };
    state.api().create_cash_order(token, cart_id, address).await?;
    info!(cart_id = %cart_id, "Cash order placed");
    Ok(())
}

/// The hosted payment page URL, if the API returned one.
async fn start_card_payment(
    state: &AppState,
    token: &ApiToken,
    cart: &CartSnapshot,
) -> std::result::Result<Option<String>, ApiError> {
    let Some(cart_id) = &cart.cart_id else {
        return Ok(None);
    };
    let response = state
        .api()
        .checkout_session(token, cart_id, &state.config().base_url)
        .await?;

    Ok(response
        .session
        .and_then(|session| session.url)
        .filter(|url| !url.is_empty()))
}
