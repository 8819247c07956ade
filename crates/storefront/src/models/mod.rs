//! Session-held state for the storefront.

pub mod session;

pub use session::keys as session_keys;
pub use session::{
    ApiToken, AuthSession, CartLine, CartSnapshot, CurrentUser, Flash, FlashKind, PasswordReset,
    ProductSummary, ResetStep, TokenClaims, WishlistSnapshot,
};
