//! Authentication route handlers.
//!
//! Handles login, registration, logout, the three-step forgot-password
//! wizard, and password changes. Every post redirects; outcomes travel to the
//! next page as a flash.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{instrument, warn};

use crate::error::Result;
use crate::filters;
use crate::middleware::{GuestOnly, RequireAuth};
use crate::models::ResetStep;
use crate::services::{AuthError, AuthService, Registration, flash};
use crate::state::AppState;

use super::Layout;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub re_password: String,
    pub phone: String,
}

impl From<RegisterForm> for Registration {
    fn from(form: RegisterForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            password: form.password,
            re_password: form.re_password,
            phone: form.phone,
        }
    }
}

/// Forgot password step 1.
#[derive(Debug, Deserialize)]
pub struct ForgotEmailForm {
    pub email: String,
}

/// Forgot password step 2.
#[derive(Debug, Deserialize)]
pub struct ResetCodeForm {
    pub reset_code: String,
}

/// Forgot password step 3.
#[derive(Debug, Deserialize)]
pub struct NewPasswordForm {
    pub new_password: String,
}

/// Change password form data.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub password: String,
    pub re_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
}

/// Forgot password page template; shows the wizard's current step.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub layout: Layout,
    pub step: ResetStep,
    pub email: String,
}

impl ForgotPasswordTemplate {
    #[must_use]
    pub fn is_step(&self, step: &str) -> bool {
        matches!(
            (self.step, step),
            (ResetStep::Email, "email") | (ResetStep::Code, "code") | (ResetStep::Reset, "reset")
        )
    }
}

/// Change password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/change_password.html")]
pub struct ChangePasswordTemplate {
    pub layout: Layout,
}

/// Flash an auth failure, keeping session store failures as errors.
async fn flash_failure(session: &Session, err: AuthError, fallback: &str) -> Result<()> {
    if let AuthError::Session(e) = err {
        return Err(e.into());
    }
    warn!(error = %err, "Auth action failed");
    flash::error(session, err.user_message(fallback)).await?;
    Ok(())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
#[instrument(skip_all)]
pub async fn login_page(_guest: GuestOnly, session: Session) -> Result<impl IntoResponse> {
    Ok(LoginTemplate {
        layout: Layout::load(&session, "/login").await?,
    })
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    _guest: GuestOnly,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.api(), &session);

    match auth.login(&form.email, &form.password).await {
        Ok(_) => {
            flash::success(&session, "Welcome back!").await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            flash_failure(&session, e, "Login failed").await?;
            Ok(Redirect::to("/login").into_response())
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
#[instrument(skip_all)]
pub async fn register_page(_guest: GuestOnly, session: Session) -> Result<impl IntoResponse> {
    Ok(RegisterTemplate {
        layout: Layout::load(&session, "/register").await?,
    })
}

/// Handle registration form submission. A new account is signed in at once.
#[instrument(skip_all)]
pub async fn register(
    _guest: GuestOnly,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.api(), &session);

    match auth.register(&Registration::from(form)).await {
        Ok(_) => {
            flash::success(&session, "Account created successfully!").await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            flash_failure(&session, e, "Registration failed").await?;
            Ok(Redirect::to("/register").into_response())
        }
    }
}

/// Handle logout.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, session: Session) -> Result<Response> {
    AuthService::new(state.api(), &session).logout().await?;
    Ok(Redirect::to("/login").into_response())
}

// =============================================================================
// Forgot Password Routes
// =============================================================================

/// Display the wizard at its current step.
#[instrument(skip_all)]
pub async fn forgot_page(
    _guest: GuestOnly,
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    let reset = AuthService::new(state.api(), &session).reset_state().await?;

    Ok(ForgotPasswordTemplate {
        layout: Layout::load(&session, "/forgot-password").await?,
        step: reset.step,
        email: reset.email,
    })
}

/// Step 1: request a reset code by email.
#[instrument(skip_all)]
pub async fn forgot_email(
    _guest: GuestOnly,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ForgotEmailForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.api(), &session);

    match auth.forgot_password(&form.email).await {
        Ok(message) => flash::success(&session, message).await?,
        Err(e) => flash_failure(&session, e, "Failed to send reset code").await?,
    }
    Ok(Redirect::to("/forgot-password").into_response())
}

/// Step 2: verify the emailed code.
#[instrument(skip_all)]
pub async fn forgot_code(
    _guest: GuestOnly,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ResetCodeForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.api(), &session);

    match auth.verify_reset_code(&form.reset_code).await {
        Ok(()) => flash::success(&session, "Code verified!").await?,
        Err(e) => flash_failure(&session, e, "Invalid code").await?,
    }
    Ok(Redirect::to("/forgot-password").into_response())
}

/// Step 3: set the new password, then send the customer to log in.
#[instrument(skip_all)]
pub async fn forgot_reset(
    _guest: GuestOnly,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NewPasswordForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.api(), &session);

    match auth.reset_password(&form.new_password).await {
        Ok(()) => {
            flash::success(&session, "Password reset successfully! Please login.").await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => {
            flash_failure(&session, e, "Failed to reset password").await?;
            Ok(Redirect::to("/forgot-password").into_response())
        }
    }
}

/// Go back to step 1.
#[instrument(skip_all)]
pub async fn forgot_restart(State(state): State<AppState>, session: Session) -> Result<Response> {
    AuthService::new(state.api(), &session)
        .restart_reset()
        .await?;
    Ok(Redirect::to("/forgot-password").into_response())
}

// =============================================================================
// Change Password Routes
// =============================================================================

/// Display the change password page.
#[instrument(skip_all)]
pub async fn change_password_page(
    RequireAuth(_user): RequireAuth,
    session: Session,
) -> Result<impl IntoResponse> {
    Ok(ChangePasswordTemplate {
        layout: Layout::load(&session, "/change-password").await?,
    })
}

/// Handle change password form submission.
#[instrument(skip_all)]
pub async fn change_password(
    RequireAuth(_user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Response> {
    let auth = AuthService::new(state.api(), &session);

    match auth
        .change_password(&form.current_password, &form.password, &form.re_password)
        .await
    {
        Ok(_) => flash::success(&session, "Password changed successfully!").await?,
        Err(e) => flash_failure(&session, e, "Failed to change password").await?,
    }
    Ok(Redirect::to("/change-password").into_response())
}
