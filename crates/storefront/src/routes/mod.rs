//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                           - Home page
//!
//! # Catalog
//! GET  /products                   - Product listing (?brand, ?category, ?q, ?page)
//! GET  /products/{id}              - Product detail (?image)
//! GET  /categories                 - Category grid
//! GET  /categories/{id}            - Category detail
//! GET  /brands                     - Brand grid
//! GET  /brands/{id}                - Brand detail
//!
//! # Auth (guest only, posts rate limited)
//! GET  /login                      - Login page
//! POST /login                      - Login action
//! GET  /register                   - Register page
//! POST /register                   - Register action
//! GET  /forgot-password            - Reset wizard (current step)
//! POST /forgot-password/email      - Step 1: send code
//! POST /forgot-password/code       - Step 2: verify code
//! POST /forgot-password/reset      - Step 3: new password
//! POST /forgot-password/restart    - Back to step 1
//! POST /logout                     - Logout action
//!
//! # Account (requires auth)
//! GET  /change-password            - Change password page
//! POST /change-password            - Change password action
//! GET  /cart                       - Cart page
//! POST /cart/add                   - Add to cart (redirects to return_to)
//! POST /cart/update                - Set quantity
//! POST /cart/remove                - Remove line
//! POST /cart/clear                 - Empty cart
//! GET  /cart/count                 - Cart count badge (fragment)
//! GET  /wishlist                   - Wishlist page
//! POST /wishlist/toggle            - Add/remove (redirects to return_to)
//! GET  /checkout                   - Checkout form
//! POST /checkout                   - Place order / start card payment
//! GET  /orders                     - Order history
//! GET  /addresses                  - Saved addresses
//! POST /addresses                  - Add address
//! POST /addresses/{id}/delete      - Remove address
//! ```

pub mod addresses;
pub mod auth;
pub mod brands;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;
pub mod wishlist;

use axum::{
    Router,
    routing::{get, post},
};
use tower_sessions::Session;

use crate::api::Product;
use crate::middleware::auth_rate_limiter;
use crate::models::{CartSnapshot, CurrentUser, Flash, ProductSummary, WishlistSnapshot};
use crate::services::{auth::current_user, flash};
use crate::state::AppState;

// =============================================================================
// Shared View Data
// =============================================================================

/// Main navigation: `(href, label)`.
pub const NAV_LINKS: [(&str, &str); 4] = [
    ("/", "Home"),
    ("/products", "Products"),
    ("/categories", "Categories"),
    ("/brands", "Brands"),
];

/// Everything the shared page layout shows.
#[derive(Debug, Clone)]
pub struct Layout {
    /// Request path, for highlighting the active nav link.
    pub path: String,
    pub user: Option<CurrentUser>,
    /// Navbar badge: `numOfCartItems` of the stored snapshot.
    pub cart_count: u32,
    /// Messages to show: the pending flash taken by [`Layout::load`], then
    /// any the handler adds for this render.
    pub flashes: Vec<Flash>,
}

impl Layout {
    /// Gather layout data for a full page render, consuming the pending flash.
    ///
    /// Call this only on the path that renders; a handler that redirects
    /// instead must leave the flash for the next page.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store fails.
    pub async fn load(session: &Session, path: &str) -> crate::error::Result<Self> {
        let user = current_user(session).await?;
        let cart_count = session
            .get::<CartSnapshot>(crate::models::session_keys::CART)
            .await?
            .map_or(0, |cart| cart.item_count);
        let flashes = flash::take(session).await?.into_iter().collect();

        Ok(Self {
            path: path.to_string(),
            user,
            cart_count,
            flashes,
        })
    }

    /// Show `flash` on this render after any pending one.
    pub fn push_flash(&mut self, flash: Flash) {
        self.flashes.push(flash);
    }

    /// Whether `href` is the active nav entry.
    #[must_use]
    pub fn is_active(&self, href: &str) -> bool {
        if href == "/" {
            self.path == "/"
        } else {
            self.path == href || self.path.starts_with(&format!("{href}/"))
        }
    }

    #[must_use]
    pub const fn nav_links(&self) -> &'static [(&'static str, &'static str)] {
        &NAV_LINKS
    }
}

/// A product card with its wishlist state.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub product: ProductSummary,
    pub in_wishlist: bool,
}

impl ProductCard {
    /// Build cards for `products`, marking those in `wishlist`.
    #[must_use]
    pub fn list(products: &[Product], wishlist: &WishlistSnapshot) -> Vec<Self> {
        products
            .iter()
            .map(|product| Self {
                in_wishlist: wishlist.contains(&product.id),
                product: ProductSummary::from(product),
            })
            .collect()
    }
}

/// The session's wishlist snapshot, for marking product cards.
pub(crate) async fn stored_wishlist(session: &Session) -> crate::error::Result<WishlistSnapshot> {
    Ok(session
        .get::<WishlistSnapshot>(crate::models::session_keys::WISHLIST)
        .await?
        .unwrap_or_default())
}

/// Accept only local absolute paths as redirect targets.
///
/// `//host` and `/\host` are protocol-relative to browsers, so both are
/// rejected along with anything not starting with `/`.
#[must_use]
pub fn safe_return_to(return_to: Option<&str>) -> String {
    match return_to.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Catalog routes (public).
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/categories", get(categories::index))
        .route("/categories/{id}", get(categories::show))
        .route("/brands", get(brands::index))
        .route("/brands/{id}", get(brands::show))
}

/// Auth pages and the posts that forward credentials.
///
/// The posts are rate limited per client IP when `rate_limit` is set.
pub fn auth_routes(rate_limit: bool) -> Router<AppState> {
    let posts = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/forgot-password/email", post(auth::forgot_email))
        .route("/forgot-password/code", post(auth::forgot_code))
        .route("/forgot-password/reset", post(auth::forgot_reset));
    let posts = if rate_limit {
        posts.layer(auth_rate_limiter())
    } else {
        posts
    };

    Router::new()
        .route("/login", get(auth::login_page))
        .route("/register", get(auth::register_page))
        .route("/forgot-password", get(auth::forgot_page))
        .route("/forgot-password/restart", post(auth::forgot_restart))
        .route("/logout", post(auth::logout))
        .route(
            "/change-password",
            get(auth::change_password_page).post(auth::change_password),
        )
        .merge(posts)
}

/// Cart routes.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Account routes (all require auth except the public-page actions, which
/// answer anonymous visitors with a flash).
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(wishlist::show))
        .route("/wishlist/toggle", post(wishlist::toggle))
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/orders", get(orders::index))
        .route(
            "/addresses",
            get(addresses::index).post(addresses::create),
        )
        .route("/addresses/{id}/delete", post(addresses::delete))
}

/// Create all routes for the storefront.
pub fn routes(rate_limit: bool) -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .merge(auth_routes(rate_limit))
        .nest("/cart", cart_routes())
        .merge(account_routes())
}
