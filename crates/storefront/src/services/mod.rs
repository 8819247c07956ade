//! Session-scoped services over the commerce API.
//!
//! # Services
//!
//! - `auth` - Sign-in, registration, password flows; owns the token
//! - `cart` - Cart snapshot and mutations
//! - `wishlist` - Wishlist snapshot and toggling
//! - `flash` - One-shot feedback messages
//!
//! Each service borrows the [`ApiClient`](crate::api::ApiClient) and the
//! request's [`Session`](tower_sessions::Session). The cart and wishlist
//! snapshots are rebuilt after every mutation and whenever the token changes.

pub mod auth;
pub mod cart;
pub mod flash;
pub mod wishlist;

pub use auth::{AuthError, AuthService, Registration};
pub use cart::CartService;
pub use wishlist::WishlistService;

use tower_sessions::Session;

use crate::models::ApiToken;

/// The token of the signed-in customer, if any.
///
/// Applies the same expiry rule as [`auth::current_user`]: an expired token
/// signs the session out and is never sent to the API.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn session_token(
    session: &Session,
) -> Result<Option<ApiToken>, tower_sessions::session::Error> {
    Ok(auth::usable_auth(session).await?.map(|auth| auth.token))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use freshcart_core::{Price, UserId};

    use super::*;
    use crate::models::session::tests::token_with_payload;
    use crate::models::{AuthSession, CartSnapshot, CurrentUser, session_keys};

    async fn signed_in_session(exp: i64) -> Session {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let auth = AuthSession {
            token: token_with_payload(&serde_json::json!({ "id": "u1", "exp": exp })),
            user: CurrentUser {
                id: UserId::new("u1"),
                name: "Mona".to_string(),
                role: "user".to_string(),
            },
            verified_remotely: false,
        };
        session.insert(session_keys::AUTH, auth).await.unwrap();
        session
            .insert(
                session_keys::CART,
                CartSnapshot {
                    cart_id: None,
                    item_count: 1,
                    total: Price::from_pounds(10),
                    lines: vec![],
                },
            )
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_session_token_while_valid() {
        let session = signed_in_session(i64::MAX).await;
        assert!(session_token(&session).await.unwrap().is_some());
        assert!(session.get::<CartSnapshot>(session_keys::CART).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_expired_session_token_signs_out() {
        let session = signed_in_session(1_000).await;

        assert!(session_token(&session).await.unwrap().is_none());
        assert!(
            session
                .get::<AuthSession>(session_keys::AUTH)
                .await
                .unwrap()
                .is_none()
        );
        assert!(session.get::<CartSnapshot>(session_keys::CART).await.unwrap().is_none());
    }
}
