//! Saved address endpoints.

use reqwest::Method;
use tracing::instrument;

use freshcart_core::AddressId;

use crate::models::ApiToken;

use super::types::{Address, ListResponse, NewAddress};
use super::{ApiClient, ApiError, segment};

impl ApiClient {
    /// List saved addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip_all)]
    pub async fn addresses(&self, token: &ApiToken) -> Result<Vec<Address>, ApiError> {
        let response: ListResponse<Address> = self
            .send(self.request(Method::GET, "/api/v1/addresses", Some(token)))
            .await?;
        Ok(response.data)
    }

    /// Save a new address. Returns the full updated list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the address or the request fails.
    #[instrument(skip(self, token, address), fields(city = %address.city))]
    pub async fn add_address(
        &self,
        token: &ApiToken,
        address: &NewAddress<'_>,
    ) -> Result<Vec<Address>, ApiError> {
        let request = self
            .request(Method::POST, "/api/v1/addresses", Some(token))
            .json(address);
        let response: ListResponse<Address> = self.send(request).await?;
        Ok(response.data)
    }

    /// Delete a saved address. Returns the remaining addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(address_id = %id))]
    pub async fn remove_address(
        &self,
        token: &ApiToken,
        id: &AddressId,
    ) -> Result<Vec<Address>, ApiError> {
        let path = format!("/api/v1/addresses/{}", segment(id.as_str()));
        let response: ListResponse<Address> = self
            .send(self.request(Method::DELETE, &path, Some(token)))
            .await?;
        Ok(response.data)
    }
}
