//! Full router against a mock commerce API.
//!
//! Requests go through every layer with `oneshot`; the session cookie is
//! carried by hand between requests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use freshcart_storefront::app;
use freshcart_storefront::config::{ApiConfig, StorefrontConfig};
use freshcart_storefront::state::AppState;

const USER_ID: &str = "6407cf6f515bdcf347c09f17";
const PRODUCT_ID: &str = "6428ebc6dc1175abc65ca0b9";

// =============================================================================
// Helpers
// =============================================================================

fn storefront(server: &MockServer) -> Router {
    let config = StorefrontConfig {
        api: ApiConfig {
            base_url: server.uri(),
            ..ApiConfig::default()
        },
        // The governor key extractor needs a peer address `oneshot` does not provide
        rate_limit: false,
        ..StorefrontConfig::default()
    };
    app(AppState::new(config).expect("state builds"))
}

/// A JWT for the test customer under `name`, expiring at `exp`. The
/// signature is junk.
fn token_for(name: &str, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({ "id": USER_ID, "name": name, "role": "user", "iat": 1_700_000_000, "exp": exp })
            .to_string(),
    );
    format!("{header}.{payload}.signature")
}

fn customer_token() -> String {
    token_for("Test Shopper", 4_102_444_800)
}

fn product_json(title: &str) -> serde_json::Value {
    json!({
        "_id": PRODUCT_ID,
        "title": title,
        "quantity": 10,
        "price": 149,
        "imageCover": "https://img/cover.jpeg",
        "images": ["https://img/1.jpeg"]
    })
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": 1,
            "metadata": { "currentPage": 1, "numberOfPages": 1, "limit": 40 },
            "data": [product_json("Woman Shawl")]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": 1,
            "data": [{ "_id": "6439d58a0049ad0b52b9003f", "name": "Women Fashion", "image": "https://img/cat.png" }]
        })))
        .mount(server)
        .await;
}

async fn mount_signin(server: &MockServer) {
    mount_signin_token(server, &customer_token()).await;
    mount_empty_wishlist(server).await;
}

async fn mount_signin_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "success",
            "user": { "name": "Test Shopper", "email": "shopper@example.com", "role": "user" },
            "token": token
        })))
        .mount(server)
        .await;
}

async fn mount_empty_wishlist(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "count": 0,
            "data": []
        })))
        .mount(server)
        .await;
}

fn cart_json() -> serde_json::Value {
    json!({
        "status": "success",
        "numOfCartItems": 2,
        "cartId": "6601a2b3c4d5e6f7a8b9c0d1",
        "data": {
            "_id": "6601a2b3c4d5e6f7a8b9c0d1",
            "cartOwner": USER_ID,
            "products": [{
                "_id": "6601a2b3c4d5e6f7a8b9c0d2",
                "count": 2,
                "price": 149,
                "product": {
                    "_id": PRODUCT_ID,
                    "title": "Woman Shawl",
                    "imageCover": "https://img/cover.jpeg",
                    "quantity": 10
                }
            }],
            "totalCartPrice": 298
        }
    })
}

async fn mount_cart(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json()))
        .mount(server)
        .await;
}

async fn mount_no_cart(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/cart"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": "error",
            "message": format!("No cart exist for this user: {USER_ID}")
        })))
        .mount(server)
        .await;
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("router is infallible")
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// `name=value` of the session cookie the response set.
fn session_cookie(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("fc_session="))
        .and_then(|v| v.split(';').next())
        .expect("session cookie set")
        .to_string()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn sign_in(app: &Router) -> String {
    let response = send(
        app,
        post_form(
            "/login",
            "email=shopper%40example.com&password=Secret123",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    session_cookie(&response)
}

// =============================================================================
// Health & Layers
// =============================================================================

#[tokio::test]
async fn test_health_sets_security_headers() {
    let server = MockServer::start().await;
    let app = storefront(&server);

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("content-security-policy"));
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_reflects_api() {
    let server = MockServer::start().await;
    let app = storefront(&server);

    let response = send(&app, get("/health/ready", None)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    mount_catalog(&server).await;
    let response = send(&app, get("/health/ready", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_home_renders_products_and_categories() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let app = storefront(&server);

    let response = send(&app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Woman Shawl"));
    assert!(body.contains("Women Fashion"));
    assert!(body.contains("Free Shipping"));
}

#[tokio::test]
async fn test_products_search_filters_titles() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let app = storefront(&server);

    let response = send(&app, get("/products?q=shawl", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Woman Shawl"));

    let response = send(&app, get("/products?q=laptop", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!body_text(response).await.contains("Woman Shawl"));
}

// =============================================================================
// Access Control
// =============================================================================

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let server = MockServer::start().await;
    let app = storefront(&server);

    for uri in ["/cart", "/wishlist", "/checkout", "/orders", "/addresses", "/change-password"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login", "{uri}");
    }
}

#[tokio::test]
async fn test_guest_pages_redirect_signed_in_customers_home() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_no_cart(&server).await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;

    for uri in ["/login", "/register", "/forgot-password"] {
        let response = send(&app, get(uri, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/", "{uri}");
    }
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_failed_login_flashes_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/signin"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "statusMsg": "fail",
            "message": "Incorrect email or password"
        })))
        .mount(&server)
        .await;
    let app = storefront(&server);

    let response = send(
        &app,
        post_form("/login", "email=shopper%40example.com&password=nope", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let cookie = session_cookie(&response);

    let response = send(&app, get("/login", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Incorrect email or password"));

    // The flash is shown once
    let response = send(&app, get("/login", Some(&cookie))).await;
    assert!(!body_text(response).await.contains("Incorrect email or password"));
}

#[tokio::test]
async fn test_invalid_email_is_rejected_before_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/signin"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let response = send(
        &app,
        post_form("/login", "email=not-an-email&password=Secret123", None),
    )
    .await;
    assert_eq!(location(&response), "/login");
    let cookie = session_cookie(&response);

    let response = send(&app, get("/login", Some(&cookie))).await;
    assert!(body_text(response).await.contains("Please enter a valid email address"));
}

#[tokio::test]
async fn test_logout_signs_out() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_no_cart(&server).await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let response = send(&app, post_form("/logout", "", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let response = send(&app, get("/orders", Some(&cookie))).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords_before_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/signup"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let form = "name=Test+Shopper&email=shopper%40example.com&password=Secret123&re_password=Secret124&phone=01010700700";
    let response = send(&app, post_form("/register", form, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/register");
    let cookie = session_cookie(&response);

    let body = body_text(send(&app, get("/register", Some(&cookie))).await).await;
    // The apostrophe is HTML-escaped
    assert!(body.contains("Passwords don"));
    assert!(body.contains("t match"));
}

#[tokio::test]
async fn test_expired_token_is_treated_as_signed_out() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let expiring = token_for("Expiring Shopper", chrono::Utc::now().timestamp() + 2);
    mount_signin_token(&server, &expiring).await;
    mount_empty_wishlist(&server).await;
    mount_no_cart(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/cart"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    tokio::time::sleep(Duration::from_secs(3)).await;

    let form = format!("product_id={PRODUCT_ID}&return_to=%2Fproducts");
    let response = send(&app, post_form("/cart/add", &form, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");

    let body = body_text(send(&app, get("/products", Some(&cookie))).await).await;
    assert!(body.contains("Please login first"));
    assert!(!body.contains("Expiring Shopper"));

    let response = send(&app, get("/orders", Some(&cookie))).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_change_password_keeps_customer_signed_in_with_new_token() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_no_cart(&server).await;
    let renamed = token_for("Renamed Shopper", 4_102_444_800);
    Mock::given(method("PUT"))
        .and(path("/api/v1/users/changeMyPassword"))
        .and(wiremock::matchers::header("token", customer_token().as_str()))
        .and(body_json(json!({
            "currentPassword": "Secret123",
            "password": "NewSecret1",
            "rePassword": "NewSecret1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "success",
            "token": renamed
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/orders/user/{USER_ID}")))
        .and(wiremock::matchers::header("token", renamed.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let response = send(
        &app,
        post_form(
            "/change-password",
            "current_password=Secret123&password=NewSecret1&re_password=NewSecret1",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/change-password");
    // The session id is cycled when the new token is stored
    let cookie = session_cookie(&response);

    let response = send(&app, get("/orders", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Password changed successfully!"));
    assert!(body.contains("Renamed Shopper"));
}

// =============================================================================
// Forgot Password
// =============================================================================

#[tokio::test]
async fn test_reset_steps_out_of_order_restart_the_wizard() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/verifyResetCode"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/auth/resetPassword"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = storefront(&server);

    for (uri, form) in [
        ("/forgot-password/code", "reset_code=123456"),
        ("/forgot-password/reset", "new_password=NewSecret1"),
    ] {
        let response = send(&app, post_form(uri, form, None)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/forgot-password", "{uri}");
        let cookie = session_cookie(&response);

        let body = body_text(send(&app, get("/forgot-password", Some(&cookie))).await).await;
        assert!(body.contains("Please start the password reset again"), "{uri}");
    }
}

#[tokio::test]
async fn test_forgot_password_wizard_resets_and_sends_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/forgotPasswords"))
        .and(body_json(json!({ "email": "shopper@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "statusMsg": "success",
            "message": "Reset code sent to your email"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/auth/verifyResetCode"))
        .and(body_json(json!({ "resetCode": "123456" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "Success" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/auth/resetPassword"))
        .and(body_json(json!({ "email": "shopper@example.com", "newPassword": "NewSecret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": customer_token() })))
        .expect(1)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let response = send(
        &app,
        post_form("/forgot-password/email", "email=shopper%40example.com", None),
    )
    .await;
    assert_eq!(location(&response), "/forgot-password");
    let cookie = session_cookie(&response);

    let body = body_text(send(&app, get("/forgot-password", Some(&cookie))).await).await;
    assert!(body.contains("Reset code sent to your email"));

    let response = send(
        &app,
        post_form("/forgot-password/code", "reset_code=123456", Some(&cookie)),
    )
    .await;
    assert_eq!(location(&response), "/forgot-password");

    let body = body_text(send(&app, get("/forgot-password", Some(&cookie))).await).await;
    assert!(body.contains("Code verified!"));

    // The email from step 1 is what the reset sends
    let response = send(
        &app,
        post_form("/forgot-password/reset", "new_password=NewSecret1", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let body = body_text(send(&app, get("/login", Some(&cookie))).await).await;
    assert!(body.contains("Password reset successfully! Please login."));
}

// =============================================================================
// Cart & Checkout
// =============================================================================

#[tokio::test]
async fn test_anonymous_add_to_cart_asks_for_login() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let app = storefront(&server);

    let form = format!("product_id={PRODUCT_ID}&return_to=%2Fproducts");
    let response = send(&app, post_form("/cart/add", &form, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");
    let cookie = session_cookie(&response);

    let response = send(&app, get("/products", Some(&cookie))).await;
    assert!(body_text(response).await.contains("Please login first"));
}

#[tokio::test]
async fn test_add_to_cart_ignores_offsite_return_to() {
    let server = MockServer::start().await;
    let app = storefront(&server);

    let form = format!("product_id={PRODUCT_ID}&return_to=%2F%2Fevil.example");
    let response = send(&app, post_form("/cart/add", &form, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_cart_page_lists_lines() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_cart(&server).await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let response = send(&app, get("/cart", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Woman Shawl"));
    assert!(body.contains("298 EGP"));
}

#[tokio::test]
async fn test_increase_is_disabled_at_stock_limit() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    let mut cart = cart_json();
    cart["data"]["products"][0]["product"]["quantity"] = json!(2);
    Mock::given(method("GET"))
        .and(path("/api/v1/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart))
        .mount(&server)
        .await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let body = body_text(send(&app, get("/cart", Some(&cookie))).await).await;
    assert!(body.contains(r#"aria-label="Increase quantity" disabled"#));
}

#[tokio::test]
async fn test_cart_count_fragment() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_cart(&server).await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let response = send(&app, get("/cart/count", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(">2<"));
}

#[tokio::test]
async fn test_quantity_below_one_is_sent_as_one() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_cart(&server).await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/cart/{PRODUCT_ID}")))
        .and(body_json(json!({ "count": "1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json()))
        .expect(1)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let form = format!("product_id={PRODUCT_ID}&count=0");
    let response = send(&app, post_form("/cart/update", &form, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");
}

#[tokio::test]
async fn test_remove_from_cart_flashes_and_returns_to_cart() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_cart(&server).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/cart/{PRODUCT_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json()))
        .expect(1)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let form = format!("product_id={PRODUCT_ID}");
    let response = send(&app, post_form("/cart/remove", &form, Some(&cookie))).await;
    assert_eq!(location(&response), "/cart");

    let body = body_text(send(&app, get("/cart", Some(&cookie))).await).await;
    assert!(body.contains("Removed from cart"));
}

#[tokio::test]
async fn test_clear_cart_drops_snapshot() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_cart(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "success" })))
        .expect(1)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let body = body_text(send(&app, get("/cart/count", Some(&cookie))).await).await;
    assert!(body.contains(">2<"));

    let response = send(&app, post_form("/cart/clear", "", Some(&cookie))).await;
    assert_eq!(location(&response), "/cart");

    // The badge reads the snapshot without asking the API
    let body = body_text(send(&app, get("/cart/count", Some(&cookie))).await).await;
    assert!(!body.contains(">2<"));

    let body = body_text(send(&app, get("/cart", Some(&cookie))).await).await;
    assert!(body.contains("Cart cleared"));
}

#[tokio::test]
async fn test_checkout_without_cart_redirects_to_cart() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_no_cart(&server).await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let response = send(&app, get("/checkout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/cart");
}

#[tokio::test]
async fn test_checkout_with_blank_address_rerenders_form() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_cart(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders/6601a2b3c4d5e6f7a8b9c0d1"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let response = send(
        &app,
        post_form(
            "/checkout",
            "payment_method=cash&details=12+Nile+St&phone=&city=Cairo",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("Please fill all shipping details"));
    assert!(body.contains("12 Nile St"));
    // The sign-in flash still pending is shown alongside the error
    assert!(body.contains("Welcome back!"));
}

#[tokio::test]
async fn test_cash_checkout_places_order() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_cart(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders/6601a2b3c4d5e6f7a8b9c0d1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "status": "success",
            "data": { "_id": "6601a2b3c4d5e6f752b90051", "totalOrderPrice": 298 }
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let response = send(
        &app,
        post_form(
            "/checkout",
            "payment_method=cash&details=12+Nile+St&phone=01010700700&city=Cairo",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/orders");
}

#[tokio::test]
async fn test_card_checkout_redirects_to_payment_page() {
    let server = MockServer::start().await;
    mount_signin(&server).await;
    mount_cart(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/orders/checkout-session/6601a2b3c4d5e6f7a8b9c0d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "session": { "url": "https://checkout.stripe.com/c/pay/cs_test" }
        })))
        .mount(&server)
        .await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let response = send(
        &app,
        post_form(
            "/checkout",
            "payment_method=online&details=12+Nile+St&phone=01010700700&city=Cairo",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "https://checkout.stripe.com/c/pay/cs_test");
}

// =============================================================================
// Wishlist
// =============================================================================

#[tokio::test]
async fn test_wishlist_toggle_adds_missing_product() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_signin(&server).await;
    mount_no_cart(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/wishlist"))
        .and(body_json(json!({ "productId": PRODUCT_ID })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Product added successfully to your wishlist",
            "data": [PRODUCT_ID]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let form = format!("product_id={PRODUCT_ID}&return_to=%2Fproducts");
    let response = send(&app, post_form("/wishlist/toggle", &form, Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");

    let body = body_text(send(&app, get("/products", Some(&cookie))).await).await;
    assert!(body.contains("Added to wishlist!"));
}

#[tokio::test]
async fn test_wishlist_toggle_removes_present_product_and_refreshes() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    mount_signin_token(&server, &customer_token()).await;
    mount_no_cart(&server).await;
    // Once at sign-in, once after the removal
    Mock::given(method("GET"))
        .and(path("/api/v1/wishlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "count": 1,
            "data": [product_json("Woman Shawl")]
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/wishlist/{PRODUCT_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Product removed successfully to your wishlist",
            "data": []
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/wishlist"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let app = storefront(&server);

    let cookie = sign_in(&app).await;
    let form = format!("product_id={PRODUCT_ID}&return_to=%2Fproducts");
    let response = send(&app, post_form("/wishlist/toggle", &form, Some(&cookie))).await;
    assert_eq!(location(&response), "/products");

    let body = body_text(send(&app, get("/products", Some(&cookie))).await).await;
    assert!(body.contains("Removed from wishlist"));
}
