//! Authentication service.
//!
//! Owns the customer's token in the session. Every change of token (sign-in,
//! registration, password change, sign-out) re-synchronises the cart and
//! wishlist snapshots, since both belong to the token's customer.

use thiserror::Error;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use freshcart_core::{Email, EmailError};

use crate::api::{ApiClient, ApiError, SignupRequest};
use crate::error::{clear_sentry_user, set_sentry_user};
use crate::models::{
    ApiToken, AuthSession, CartSnapshot, CurrentUser, PasswordReset, ResetStep,
    WishlistSnapshot, session_keys,
};

use super::{CartService, WishlistService};

/// Default message after requesting a reset code.
pub const RESET_CODE_SENT: &str = "Reset code sent to your email";

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password and confirmation differ.
    #[error("Passwords don't match")]
    PasswordMismatch,

    /// No signed-in customer in the session.
    #[error("not signed in")]
    NotSignedIn,

    /// The API returned a token the storefront cannot read.
    #[error("token could not be decoded")]
    InvalidToken,

    /// A forgot-password step was submitted before the previous one.
    #[error("password reset step out of order")]
    ResetOutOfOrder,

    /// The commerce API rejected the call.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Session store failure.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl AuthError {
    /// Feedback for the customer, or `fallback` when there is nothing better.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::InvalidEmail(_) => "Please enter a valid email address".to_string(),
            Self::PasswordMismatch => self.to_string(),
            Self::ResetOutOfOrder => "Please start the password reset again".to_string(),
            Self::Api(e) => e.user_message().unwrap_or(fallback).to_string(),
            Self::NotSignedIn | Self::InvalidToken | Self::Session(_) => fallback.to_string(),
        }
    }
}

/// Registration form input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub re_password: String,
    pub phone: String,
}

/// Authentication operations for one session.
pub struct AuthService<'a> {
    api: &'a ApiClient,
    session: &'a Session,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(api: &'a ApiClient, session: &'a Session) -> Self {
        Self { api, session }
    }

    // =========================================================================
    // Sign-in State
    // =========================================================================

    /// The signed-in customer; see [`current_user`].
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn current_user(&self) -> Result<Option<CurrentUser>, AuthError> {
        current_user(self.session).await
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Api` with `ApiError::Unauthorized` for bad
    /// credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let email = Email::parse(email)?;
        let response = self.api.signin(email.as_str(), password).await?;
        self.establish(ApiToken::new(response.token)).await
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordMismatch` before calling the API when the
    /// confirmation differs.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: &Registration) -> Result<CurrentUser, AuthError> {
        if form.password != form.re_password {
            return Err(AuthError::PasswordMismatch);
        }
        let email = Email::parse(&form.email)?;

        let response = self
            .api
            .signup(&SignupRequest {
                name: form.name.trim(),
                email: email.as_str(),
                password: &form.password,
                re_password: &form.re_password,
                phone: form.phone.trim(),
            })
            .await?;

        self.establish(ApiToken::new(response.token)).await
    }

    /// Sign out. Nothing is sent to the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.clear().await?;
        self.session.cycle_id().await?;
        Ok(())
    }

    /// Change the signed-in customer's password and adopt the new token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordMismatch`, `AuthError::NotSignedIn`, or the
    /// API's rejection.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        current_password: &str,
        password: &str,
        re_password: &str,
    ) -> Result<CurrentUser, AuthError> {
        if password != re_password {
            return Err(AuthError::PasswordMismatch);
        }
        let auth = self
            .session
            .get::<AuthSession>(session_keys::AUTH)
            .await?
            .ok_or(AuthError::NotSignedIn)?;

        let response = self
            .api
            .change_password(&auth.token, current_password, password, re_password)
            .await?;

        self.establish(ApiToken::new(response.token)).await
    }

    // =========================================================================
    // Forgot-password Wizard
    // =========================================================================

    /// Current wizard state; a fresh wizard starts at [`ResetStep::Email`].
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be read.
    pub async fn reset_state(&self) -> Result<PasswordReset, AuthError> {
        Ok(self
            .session
            .get::<PasswordReset>(session_keys::PASSWORD_RESET)
            .await?
            .unwrap_or_default())
    }

    /// Step 1: email a reset code. Returns the message to show.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is invalid or the API refuses it.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<String, AuthError> {
        let email = Email::parse(email)?;
        let response = self.api.forgot_password(email.as_str()).await?;

        self.session
            .insert(
                session_keys::PASSWORD_RESET,
                PasswordReset {
                    email: email.into_inner(),
                    step: ResetStep::Code,
                },
            )
            .await?;

        Ok(response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| RESET_CODE_SENT.to_string()))
    }

    /// Step 2: check the emailed code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ResetOutOfOrder` unless a code was requested, or the
    /// API's rejection of the code.
    #[instrument(skip_all)]
    pub async fn verify_reset_code(&self, code: &str) -> Result<(), AuthError> {
        let mut state = self.reset_state().await?;
        if state.step != ResetStep::Code {
            return Err(AuthError::ResetOutOfOrder);
        }

        self.api.verify_reset_code(code.trim()).await?;

        state.step = ResetStep::Reset;
        self.session
            .insert(session_keys::PASSWORD_RESET, state)
            .await?;
        Ok(())
    }

    /// Step 3: set the new password for the email from step 1.
    ///
    /// The customer is not signed in; they log in with the new password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ResetOutOfOrder` unless the code was verified, or
    /// the API's rejection.
    #[instrument(skip_all)]
    pub async fn reset_password(&self, new_password: &str) -> Result<(), AuthError> {
        let state = self.reset_state().await?;
        if state.step != ResetStep::Reset {
            return Err(AuthError::ResetOutOfOrder);
        }

        self.api.reset_password(&state.email, new_password).await?;

        self.session
            .remove::<PasswordReset>(session_keys::PASSWORD_RESET)
            .await?;
        Ok(())
    }

    /// Abandon the wizard.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn restart_reset(&self) -> Result<(), AuthError> {
        self.session
            .remove::<PasswordReset>(session_keys::PASSWORD_RESET)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Store a new token, then rebuild the snapshots for its customer.
    async fn establish(&self, token: ApiToken) -> Result<CurrentUser, AuthError> {
        let (user, verified_remotely) = match CurrentUser::from_token(&token) {
            Some(user) => (user, false),
            None => {
                warn!("Token did not decode locally, asking the API");
                let verified = self.api.verify_token(&token).await.map_err(|e| {
                    warn!(error = %e, "Token verification failed");
                    AuthError::InvalidToken
                })?;
                (CurrentUser::from(verified.decoded), true)
            }
        };

        self.session.cycle_id().await?;
        self.session
            .insert(
                session_keys::AUTH,
                AuthSession {
                    token,
                    user: user.clone(),
                    verified_remotely,
                },
            )
            .await?;
        set_sentry_user(&user.id, &user.name);
        info!(user_id = %user.id, "Customer signed in");

        self.resync().await?;
        Ok(user)
    }

    async fn resync(&self) -> Result<(), AuthError> {
        CartService::new(self.api, self.session).refresh().await?;
        WishlistService::new(self.api, self.session).refresh().await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), AuthError> {
        Ok(clear(self.session).await?)
    }
}

/// The signed-in customer.
///
/// A stored token that has expired, or no longer decodes although it did at
/// sign-in, signs the session out.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn current_user(session: &Session) -> Result<Option<CurrentUser>, AuthError> {
    Ok(usable_auth(session).await?.map(|auth| auth.user))
}

/// The stored sign-in, or `None` once its token can no longer be sent.
///
/// An unusable token signs the session out, so every caller sees the
/// visitor as anonymous.
pub(crate) async fn usable_auth(
    session: &Session,
) -> Result<Option<AuthSession>, tower_sessions::session::Error> {
    let Some(auth) = session.get::<AuthSession>(session_keys::AUTH).await? else {
        return Ok(None);
    };

    if auth.is_usable_at(chrono::Utc::now().timestamp()) {
        Ok(Some(auth))
    } else {
        info!(user_id = %auth.user.id, "Stored token expired, signing out");
        clear(session).await?;
        Ok(None)
    }
}

async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<AuthSession>(session_keys::AUTH).await?;
    session.remove::<CartSnapshot>(session_keys::CART).await?;
    session
        .remove::<WishlistSnapshot>(session_keys::WISHLIST)
        .await?;
    clear_sentry_user();
    Ok(())
}
