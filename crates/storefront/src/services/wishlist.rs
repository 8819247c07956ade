//! Wishlist service.

use tower_sessions::Session;
use tracing::{instrument, warn};

use freshcart_core::ProductId;

use crate::api::ApiClient;
use crate::models::{WishlistSnapshot, session_keys};

use super::{flash, session_token};

type SessionResult<T> = Result<T, tower_sessions::session::Error>;

/// Wishlist operations for one session.
pub struct WishlistService<'a> {
    api: &'a ApiClient,
    session: &'a Session,
}

impl<'a> WishlistService<'a> {
    /// Create a new wishlist service.
    #[must_use]
    pub const fn new(api: &'a ApiClient, session: &'a Session) -> Self {
        Self { api, session }
    }

    /// Last stored snapshot; empty when none was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn snapshot(&self) -> SessionResult<WishlistSnapshot> {
        Ok(self
            .session
            .get::<WishlistSnapshot>(session_keys::WISHLIST)
            .await?
            .unwrap_or_default())
    }

    /// Whether a product is in the stored wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn is_in_wishlist(&self, product_id: &ProductId) -> SessionResult<bool> {
        Ok(self.snapshot().await?.contains(product_id))
    }

    /// Re-fetch the wishlist and store it. Failures store an empty wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be written.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> SessionResult<WishlistSnapshot> {
        let snapshot = match session_token(self.session).await? {
            Some(token) => match self.api.wishlist(&token).await {
                Ok(response) => WishlistSnapshot::from(response),
                Err(e) => {
                    warn!(error = %e, "Failed to fetch wishlist");
                    WishlistSnapshot::default()
                }
            },
            None => WishlistSnapshot::default(),
        };

        self.session
            .insert(session_keys::WISHLIST, &snapshot)
            .await?;
        Ok(snapshot)
    }

    /// Add the product if absent, remove it if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn toggle(&self, product_id: &ProductId) -> SessionResult<bool> {
        let Some(token) = session_token(self.session).await? else {
            flash::error(self.session, "Please login first").await?;
            return Ok(false);
        };

        let result = if self.is_in_wishlist(product_id).await? {
            self.api
                .remove_from_wishlist(&token, product_id)
                .await
                .map(|_| "Removed from wishlist")
        } else {
            self.api
                .add_to_wishlist(&token, product_id)
                .await
                .map(|_| "Added to wishlist!")
        };

        match result {
            Ok(message) => {
                flash::success(self.session, message).await?;
                self.refresh().await?;
                Ok(true)
            }
            Err(e) => {
                warn!(error = %e, "Failed to update wishlist");
                flash::error(self.session, "Failed to update wishlist").await?;
                Ok(false)
            }
        }
    }
}
