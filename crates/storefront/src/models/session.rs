//! Session-related types.
//!
//! Everything the storefront remembers about a browser lives in the
//! tower-sessions record under the keys in [`keys`]: the customer's API
//! token and decoded identity, the last cart and wishlist responses, a
//! pending flash message and the forgot-password wizard state.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use freshcart_core::{CartId, Price, ProductId, UserId};

use crate::api::{CartItem, CartResponse, ListResponse, Product};

// =============================================================================
// Token
// =============================================================================

/// The customer's bearer token for the commerce API.
///
/// `Debug` is redacted; use [`ApiToken::expose`] only where the raw value is
/// sent to the API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiToken(String);

impl ApiToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken([REDACTED])")
    }
}

/// Claims the API puts in its JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Decode the payload segment of a JWT.
    ///
    /// The signature is not checked; the API verifies every token it is sent.
    /// Returns `None` for anything that is not a three-segment token with a
    /// JSON payload carrying at least an `id`.
    #[must_use]
    pub fn decode(token: &ApiToken) -> Option<Self> {
        let mut segments = token.expose().split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return None;
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Whether `exp` is set and not after `now` (Unix seconds).
    #[must_use]
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp.is_some_and(|exp| exp <= now)
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Signed-in customer's identity, decoded from the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub role: String,
}

impl CurrentUser {
    /// Decode the identity from a token, treating expired tokens as absent.
    #[must_use]
    pub fn from_token(token: &ApiToken) -> Option<Self> {
        Self::from_token_at(token, chrono::Utc::now().timestamp())
    }

    fn from_token_at(token: &ApiToken, now: i64) -> Option<Self> {
        TokenClaims::decode(token)
            .filter(|claims| !claims.is_expired_at(now))
            .map(Self::from)
    }
}

impl From<TokenClaims> for CurrentUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            id: claims.id,
            name: claims.name,
            role: claims.role,
        }
    }
}

/// What a successful sign-in stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: ApiToken,
    pub user: CurrentUser,
    /// The token only decoded through `GET /auth/verifyToken`.
    #[serde(default)]
    pub verified_remotely: bool,
}

impl AuthSession {
    /// Whether the token can still be sent at `now` (Unix seconds).
    ///
    /// A token that decodes must not be expired. One that never decoded
    /// locally stays usable only if the API vouched for it at sign-in.
    #[must_use]
    pub fn is_usable_at(&self, now: i64) -> bool {
        TokenClaims::decode(&self.token)
            .map_or(self.verified_remotely, |claims| !claims.is_expired_at(now))
    }
}

// =============================================================================
// Cart & Wishlist Snapshots
// =============================================================================

/// The last cart the API returned for this session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub cart_id: Option<CartId>,
    /// `numOfCartItems`: distinct products, not units.
    pub item_count: u32,
    pub total: Price,
    pub lines: Vec<CartLine>,
}

/// A cart line whose product still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    pub image: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub count: u32,
    pub unit_price: Price,
    /// Units left in stock; the increase control stops here.
    pub stock: i64,
}

impl CartLine {
    fn from_item(item: CartItem) -> Option<Self> {
        let product = item.product?;
        Some(Self {
            product_id: product.id,
            title: product.title,
            image: product.image_cover,
            category: product.category.map(|c| c.name),
            brand: product.brand.map(|b| b.name),
            count: item.count,
            unit_price: item.price,
            stock: product.quantity,
        })
    }

    /// Whether the line already holds every unit in stock.
    #[must_use]
    pub fn at_stock_limit(&self) -> bool {
        i64::from(self.count) >= self.stock
    }

    /// `unit_price * count`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.count)
    }
}

impl CartSnapshot {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<CartResponse> for CartSnapshot {
    fn from(response: CartResponse) -> Self {
        let cart_id = response.cart_id.or(Some(response.data.id));
        Self {
            cart_id,
            item_count: response.num_of_cart_items,
            total: response.data.total_cart_price,
            lines: response
                .data
                .products
                .into_iter()
                .filter_map(CartLine::from_item)
                .collect(),
        }
    }
}

/// The last wishlist the API returned for this session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistSnapshot {
    pub product_ids: Vec<ProductId>,
    pub items: Vec<ProductSummary>,
}

impl WishlistSnapshot {
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.product_ids.contains(product_id)
    }
}

impl From<ListResponse<Product>> for WishlistSnapshot {
    fn from(response: ListResponse<Product>) -> Self {
        let items: Vec<ProductSummary> = response.data.iter().map(ProductSummary::from).collect();
        Self {
            product_ids: items.iter().map(|item| item.id.clone()).collect(),
            items,
        }
    }
}

/// What a product card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub category: Option<String>,
    pub price: Price,
    pub sale_price: Option<Price>,
    /// Average rating, one decimal place.
    pub rating: String,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            image: product.image_cover.clone(),
            category: product.category.as_ref().map(|c| c.name.clone()),
            price: product.price,
            sale_price: product.price_after_discount,
            rating: format!("{:.1}", product.ratings_average),
        }
    }
}

// =============================================================================
// Flash & Wizard State
// =============================================================================

/// Kind of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    /// CSS modifier class.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "flash-success",
            Self::Error => "flash-error",
        }
    }
}

/// One-shot feedback message shown on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// Step of the forgot-password wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetStep {
    #[default]
    Email,
    Code,
    Reset,
}

/// Forgot-password wizard state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
    /// Email entered in the first step.
    pub email: String,
    pub step: ResetStep,
}

/// Session keys.
pub mod keys {
    /// [`super::AuthSession`] of the signed-in customer.
    pub const AUTH: &str = "auth";

    /// [`super::CartSnapshot`].
    pub const CART: &str = "cart";

    /// [`super::WishlistSnapshot`].
    pub const WISHLIST: &str = "wishlist";

    /// Pending [`super::Flash`].
    pub const FLASH: &str = "flash";

    /// [`super::PasswordReset`] wizard state.
    pub const PASSWORD_RESET: &str = "password_reset";
}
