//! Authentication endpoints.

use reqwest::Method;
use serde_json::json;
use tracing::instrument;

use crate::models::ApiToken;

use super::types::{AuthResponse, MessageResponse, SignupRequest, VerifyTokenResponse};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` when the API refuses the account (e.g.
    /// "Account Already Exists"), or another error if the request fails.
    #[instrument(skip(self, signup), fields(email = %signup.email))]
    pub async fn signup(&self, signup: &SignupRequest<'_>) -> Result<AuthResponse, ApiError> {
        let request = self
            .request(Method::POST, "/api/v1/auth/signup", None)
            .json(signup);
        self.send(request).await
    }

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn signin(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let request = self
            .request(Method::POST, "/api/v1/auth/signin", None)
            .json(&json!({ "email": email, "password": password }));
        self.send(request).await
    }

    /// Ask the API to email a password reset code.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is unknown or the request fails.
    #[instrument(skip(self))]
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let request = self
            .request(Method::POST, "/api/v1/auth/forgotPasswords", None)
            .json(&json!({ "email": email }));
        self.send(request).await
    }

    /// Check a reset code received by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is invalid or expired.
    #[instrument(skip(self, reset_code))]
    pub async fn verify_reset_code(&self, reset_code: &str) -> Result<MessageResponse, ApiError> {
        let request = self
            .request(Method::POST, "/api/v1/auth/verifyResetCode", None)
            .json(&json!({ "resetCode": reset_code }));
        self.send(request).await
    }

    /// Set a new password after the reset code was verified.
    ///
    /// The API answers with a fresh token; the storefront does not sign the
    /// customer in with it.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the reset.
    #[instrument(skip(self, new_password))]
    pub async fn reset_password(
        &self,
        email: &str,
        new_password: &str,
    ) -> Result<serde_json::Value, ApiError> {
        let request = self
            .request(Method::PUT, "/api/v1/auth/resetPassword", None)
            .json(&json!({ "email": email, "newPassword": new_password }));
        self.send(request).await
    }

    /// Change the signed-in customer's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the current password is wrong or the request fails.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        token: &ApiToken,
        current_password: &str,
        password: &str,
        re_password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let request = self
            .request(Method::PUT, "/api/v1/users/changeMyPassword", Some(token))
            .json(&json!({
                "currentPassword": current_password,
                "password": password,
                "rePassword": re_password,
            }));
        self.send(request).await
    }

    /// Ask the API to decode a token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` if the token is invalid or expired.
    #[instrument(skip_all)]
    pub async fn verify_token(&self, token: &ApiToken) -> Result<VerifyTokenResponse, ApiError> {
        self.send(self.request(Method::GET, "/api/v1/auth/verifyToken", Some(token)))
            .await
    }
}
