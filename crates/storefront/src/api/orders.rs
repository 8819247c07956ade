//! Order endpoints.

use reqwest::Method;
use tracing::instrument;

use freshcart_core::{CartId, UserId};

use crate::models::ApiToken;

use super::types::{CheckoutSessionResponse, Order, OrderRequest, ShippingAddress};
use super::{ApiClient, ApiError, segment};

impl ApiClient {
    /// List a customer's orders.
    ///
    /// This endpoint returns a bare JSON array, not an envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn user_orders(
        &self,
        token: &ApiToken,
        user_id: &UserId,
    ) -> Result<Vec<Order>, ApiError> {
        let path = format!("/api/v1/orders/user/{}", segment(user_id.as_str()));
        self.send(self.request(Method::GET, &path, Some(token)))
            .await
    }

    /// Place a cash-on-delivery order for the whole cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the order or the request fails.
    #[instrument(skip(self, token, shipping_address), fields(cart_id = %cart_id))]
    pub async fn create_cash_order(
        &self,
        token: &ApiToken,
        cart_id: &CartId,
        shipping_address: ShippingAddress,
    ) -> Result<serde_json::Value, ApiError> {
        let path = format!("/api/v1/orders/{}", segment(cart_id.as_str()));
        let request = self
            .request(Method::POST, &path, Some(token))
            .json(&OrderRequest { shipping_address });
        self.send(request).await
    }

    /// Open a hosted card-payment session for the cart.
    ///
    /// `return_url` is the storefront origin the payment page sends the
    /// customer back to.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the session or the request fails.
    #[instrument(skip(self, token), fields(cart_id = %cart_id))]
    pub async fn checkout_session(
        &self,
        token: &ApiToken,
        cart_id: &CartId,
        return_url: &str,
    ) -> Result<CheckoutSessionResponse, ApiError> {
        let path = format!("/api/v1/orders/checkout-session/{}", segment(cart_id.as_str()));
        let request = self
            .request(Method::POST, &path, Some(token))
            .query(&[("url", return_url)])
            .json(&OrderRequest {
                shipping_address: ShippingAddress::online(),
            });
        self.send(request).await
    }
}
