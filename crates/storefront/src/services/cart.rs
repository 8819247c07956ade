//! Cart service.
//!
//! Keeps the session's [`CartSnapshot`] in line with the API. Mutations call
//! the API, report the outcome as a flash and refresh the snapshot; a failed
//! mutation leaves the snapshot as it was.

use tower_sessions::Session;
use tracing::{instrument, warn};

use freshcart_core::ProductId;

use crate::api::ApiClient;
use crate::error::add_breadcrumb;
use crate::models::{CartSnapshot, session_keys};

use super::{flash, session_token};

type SessionResult<T> = Result<T, tower_sessions::session::Error>;

/// Cart operations for one session.
pub struct CartService<'a> {
    api: &'a ApiClient,
    session: &'a Session,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(api: &'a ApiClient, session: &'a Session) -> Self {
        Self { api, session }
    }

    /// Last stored snapshot, without a network call.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn snapshot(&self) -> SessionResult<Option<CartSnapshot>> {
        self.session.get::<CartSnapshot>(session_keys::CART).await
    }

    /// Re-fetch the cart and store it.
    ///
    /// Anonymous sessions and failed fetches store "no cart"; the API answers
    /// a customer who never had a cart with an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> SessionResult<Option<CartSnapshot>> {
        let Some(token) = session_token(self.session).await? else {
            self.store(None).await?;
            return Ok(None);
        };

        let snapshot = match self.api.cart(&token).await {
            Ok(response) => Some(CartSnapshot::from(response)),
            Err(e) => {
                tracing::debug!(error = %e, "No cart for session");
                None
            }
        };

        self.store(snapshot.clone()).await?;
        Ok(snapshot)
    }

    /// Add one unit of a product.
    ///
    /// Returns whether the API accepted the change.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add(&self, product_id: &ProductId) -> SessionResult<bool> {
        let Some(token) = session_token(self.session).await? else {
            flash::error(self.session, "Please login first").await?;
            return Ok(false);
        };

        match self.api.add_to_cart(&token, product_id).await {
            Ok(_) => {
                add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));
                flash::success(self.session, "Added to cart!").await?;
                self.refresh().await?;
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Failed to add to cart");
                flash::error(self.session, "Failed to add to cart").await?;
                Ok(false)
            }
        }
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&self, product_id: &ProductId) -> SessionResult<bool> {
        let Some(token) = session_token(self.session).await? else {
            return Ok(false);
        };

        match self.api.remove_cart_item(&token, product_id).await {
            Ok(_) => {
                flash::success(self.session, "Removed from cart").await?;
                self.refresh().await?;
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Failed to remove from cart");
                flash::error(self.session, "Failed to remove from cart").await?;
                Ok(false)
            }
        }
    }

    /// Set a line's quantity. `count` is raised to at least 1.
    ///
    /// Succeeds silently; only failures flash.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_quantity(&self, product_id: &ProductId, count: u32) -> SessionResult<bool> {
        let Some(token) = session_token(self.session).await? else {
            return Ok(false);
        };

        match self
            .api
            .update_cart_item(&token, product_id, count.max(1))
            .await
        {
            Ok(_) => {
                self.refresh().await?;
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Failed to update quantity");
                flash::error(self.session, "Failed to update quantity").await?;
                Ok(false)
            }
        }
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> SessionResult<bool> {
        let Some(token) = session_token(self.session).await? else {
            return Ok(false);
        };

        match self.api.clear_cart(&token).await {
            Ok(_) => {
                self.store(None).await?;
                flash::success(self.session, "Cart cleared").await?;
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Failed to clear cart");
                flash::error(self.session, "Failed to clear cart").await?;
                Ok(false)
            }
        }
    }

    async fn store(&self, snapshot: Option<CartSnapshot>) -> SessionResult<()> {
        match snapshot {
            Some(snapshot) => self.session.insert(session_keys::CART, snapshot).await,
            None => {
                self.session
                    .remove::<CartSnapshot>(session_keys::CART)
                    .await?;
                Ok(())
            }
        }
    }
}
