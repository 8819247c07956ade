//! Flash messages: set by an action, shown once by the next rendered page.

use tower_sessions::Session;

use crate::models::{Flash, session_keys};

/// Store a success message.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn success(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    set(session, Flash::success(message)).await
}

/// Store an error message.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn error(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    set(session, Flash::error(message)).await
}

/// Store a flash, replacing any pending one.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set(session: &Session, flash: Flash) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, flash).await
}

/// Remove and return the pending flash.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn take(session: &Session) -> Result<Option<Flash>, tower_sessions::session::Error> {
    session.remove::<Flash>(session_keys::FLASH).await
}
