//! Cart endpoints. Never cached.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use freshcart_core::ProductId;

use crate::models::ApiToken;

use super::types::{CartResponse, MessageResponse};
use super::{ApiClient, ApiError, segment};

impl ApiClient {
    /// Get the customer's cart.
    ///
    /// The API answers 404 when the customer has never had a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no cart or the request fails.
    #[instrument(skip_all)]
    pub async fn cart(&self, token: &ApiToken) -> Result<CartResponse, ApiError> {
        self.send(self.request(Method::GET, "/api/v1/cart", Some(token)))
            .await
    }

    /// Add one unit of a product to the cart.
    ///
    /// The response carries an unpopulated cart, so only its message is kept;
    /// callers refresh with [`ApiClient::cart`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the product or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        token: &ApiToken,
        product_id: &ProductId,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .request(Method::POST, "/api/v1/cart", Some(token))
            .json(&json!({ "productId": product_id }));
        self.send(request).await
    }

    /// Set the quantity of a cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not in the cart or the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn update_cart_item(
        &self,
        token: &ApiToken,
        product_id: &ProductId,
        count: u32,
    ) -> Result<CartResponse, ApiError> {
        let path = format!("/api/v1/cart/{}", segment(product_id.as_str()));
        let request = self
            .request(Method::PUT, &path, Some(token))
            .json(&json!({ "count": count.to_string() }));
        self.send(request).await
    }

    /// Remove a product from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_cart_item(
        &self,
        token: &ApiToken,
        product_id: &ProductId,
    ) -> Result<CartResponse, ApiError> {
        let path = format!("/api/v1/cart/{}", segment(product_id.as_str()));
        self.send(self.request(Method::DELETE, &path, Some(token)))
            .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn clear_cart(&self, token: &ApiToken) -> Result<MessageResponse, ApiError> {
        self.send(self.request(Method::DELETE, "/api/v1/cart", Some(token)))
            .await
    }
}
