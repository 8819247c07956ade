//! Authentication extractors.
//!
//! Provides extractors for gating route handlers on the session's sign-in
//! state. All of them read the [`Session`] that `SessionManagerLayer` puts in
//! the request extensions.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::CurrentUser;
use crate::services::auth::current_user;

/// Extractor that requires a signed-in customer.
///
/// If the customer is not logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Extractor for pages only guests should see (login, register...).
///
/// Signed-in customers are redirected home.
pub struct GuestOnly;

/// Rejection for the extractors in this module.
#[derive(Debug)]
pub enum AuthRejection {
    /// Anonymous visitor on a protected page.
    RedirectToLogin,
    /// Signed-in customer on a guest-only page.
    RedirectHome,
    /// The session layer is missing or the store failed.
    SessionUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/login").into_response(),
            Self::RedirectHome => Redirect::to("/").into_response(),
            Self::SessionUnavailable => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Resolve the session's customer, treating store failures as fatal.
async fn resolve_user(parts: &Parts) -> Result<Option<CurrentUser>, AuthRejection> {
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::SessionUnavailable)?;

    current_user(session).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to read auth state from session");
        AuthRejection::SessionUnavailable
    })
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        resolve_user(parts)
            .await?
            .map(Self)
            .ok_or(AuthRejection::RedirectToLogin)
    }
}

impl<S> FromRequestParts<S> for GuestOnly
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match resolve_user(parts).await? {
            Some(_) => Err(AuthRejection::RedirectHome),
            None => Ok(Self),
        }
    }
}
