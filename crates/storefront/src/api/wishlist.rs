//! Wishlist endpoints. Never cached.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use freshcart_core::ProductId;

use crate::models::ApiToken;

use super::types::{ListResponse, MessageResponse, Product};
use super::{ApiClient, ApiError, segment};

impl ApiClient {
    /// Get the customer's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn wishlist(&self, token: &ApiToken) -> Result<ListResponse<Product>, ApiError> {
        self.send(self.request(Method::GET, "/api/v1/wishlist", Some(token)))
            .await
    }

    /// Add a product to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add_to_wishlist(
        &self,
        token: &ApiToken,
        product_id: &ProductId,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .request(Method::POST, "/api/v1/wishlist", Some(token))
            .json(&json!({ "productId": product_id }));
        self.send(request).await
    }

    /// Remove a product from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_from_wishlist(
        &self,
        token: &ApiToken,
        product_id: &ProductId,
    ) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/v1/wishlist/{}", segment(product_id.as_str()));
        self.send(self.request(Method::DELETE, &path, Some(token)))
            .await
    }
}
