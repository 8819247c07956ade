//! DTOs mirroring the commerce API's JSON.
//!
//! Field names follow the wire format (`camelCase`, `_id` for object IDs).
//! Nothing here is validated by the storefront: list fields default to empty
//! and optional scalars to `None`, so a partial document still renders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use freshcart_core::{
    AddressId, BrandId, CartId, CartItemId, CategoryId, DeliveryStatus, PaymentMethod,
    PaymentStatus, Price, ProductId, SubcategoryId, UserId,
};

use crate::models::TokenClaims;

// =============================================================================
// Envelopes
// =============================================================================

/// Paginated list envelope: `{ results, metadata, data: [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    /// Number of items in `data` (absent on some endpoints).
    #[serde(default)]
    pub results: Option<u32>,
    /// Pagination info (absent on unpaginated endpoints).
    #[serde(default)]
    pub metadata: Option<PageMetadata>,
    /// The items.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Single-document envelope: `{ data: {...} }`.
#[derive(Debug, Clone, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageMetadata {
    pub current_page: u32,
    pub number_of_pages: u32,
    pub limit: u32,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
}

/// Acknowledgement body for mutations whose payload the storefront ignores.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageResponse {
    pub status: Option<String>,
    pub status_msg: Option<String>,
    pub message: Option<String>,
}

// =============================================================================
// Auth
// =============================================================================

/// Response of signin, signup and change-password.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub token: String,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// User summary returned alongside a token.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthUser {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Response of `GET /auth/verifyToken`.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyTokenResponse {
    pub decoded: TokenClaims,
}

/// Body for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub re_password: &'a str,
    pub phone: &'a str,
}

// =============================================================================
// Catalog
// =============================================================================

/// A product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Units in stock.
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub sold: Option<i64>,
    pub price: Price,
    #[serde(default)]
    pub price_after_discount: Option<Price>,
    #[serde(default)]
    pub image_cover: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub ratings_average: f64,
    #[serde(default)]
    pub ratings_quantity: u32,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub brand: Option<Brand>,
    #[serde(default)]
    pub subcategory: Vec<Subcategory>,
}

impl Product {
    /// The price a customer pays now (the discounted price when on sale).
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.price_after_discount.unwrap_or(self.price)
    }

    /// Whether a discounted price is set.
    #[must_use]
    pub const fn on_sale(&self) -> bool {
        self.price_after_discount.is_some()
    }

    /// Whether any stock is left.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Gallery images, falling back to the cover when the gallery is empty.
    #[must_use]
    pub fn gallery(&self) -> Vec<String> {
        if self.images.is_empty() {
            vec![self.image_cover.clone()]
        } else {
            self.images.clone()
        }
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: String,
}

/// A subcategory; `category` is the parent's ID, not a populated document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Subcategory {
    #[serde(rename = "_id")]
    pub id: SubcategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub category: Option<CategoryId>,
}

/// A brand.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Brand {
    #[serde(rename = "_id")]
    pub id: BrandId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub image: String,
}

// =============================================================================
// Cart
// =============================================================================

/// Response of `GET/PUT/DELETE /cart`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    #[serde(default)]
    pub num_of_cart_items: u32,
    #[serde(default)]
    pub cart_id: Option<CartId>,
    pub data: Cart,
}

/// A customer's cart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id")]
    pub id: CartId,
    #[serde(default)]
    pub cart_owner: Option<UserId>,
    #[serde(default)]
    pub products: Vec<CartItem>,
    #[serde(default)]
    pub total_cart_price: Price,
}

/// A cart (or order) line.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: CartItemId,
    #[serde(default)]
    pub count: u32,
    /// Unit price at the time the line was last touched.
    #[serde(default)]
    pub price: Price,
    /// Populated product; `None` when the product has since been deleted.
    #[serde(default)]
    pub product: Option<CartProduct>,
}

/// Product summary as populated inside cart and order lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProduct {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub image_cover: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub brand: Option<Brand>,
}

// =============================================================================
// Addresses
// =============================================================================

/// A saved address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: AddressId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub city: String,
}

/// Body for `POST /addresses`.
#[derive(Debug, Clone, Serialize)]
pub struct NewAddress<'a> {
    pub name: &'a str,
    pub details: &'a str,
    pub phone: &'a str,
    pub city: &'a str,
}

/// Shipping address embedded in an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShippingAddress {
    pub details: String,
    pub phone: String,
    pub city: String,
}

impl ShippingAddress {
    /// Placeholder address the API requires for hosted (card) checkout.
    #[must_use]
    pub fn online() -> Self {
        Self {
            details: "online".to_string(),
            phone: "000".to_string(),
            city: "online".to_string(),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: freshcart_core::OrderId,
    /// Sequential order number shown to customers.
    #[serde(rename = "id", default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub cart_items: Vec<CartItem>,
    #[serde(default)]
    pub tax_price: Price,
    #[serde(default)]
    pub shipping_price: Price,
    #[serde(default)]
    pub total_order_price: Price,
    #[serde(default)]
    pub payment_method_type: PaymentMethod,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    #[must_use]
    pub const fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::from_flag(self.is_paid)
    }

    #[must_use]
    pub const fn delivery_status(&self) -> DeliveryStatus {
        DeliveryStatus::from_flag(self.is_delivered)
    }
}

/// Body for order creation endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub shipping_address: ShippingAddress,
}

/// Response of `POST /orders/checkout-session/{cartId}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutSessionResponse {
    pub session: Option<CheckoutSession>,
}

/// Hosted payment session.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckoutSession {
    pub url: Option<String>,
}
