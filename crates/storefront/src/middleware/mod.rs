//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (fills the span field, echoes `x-request-id`)
//! 4. Security headers (CSP, frame and isolation policies)
//! 5. Session layer (tower-sessions with an in-memory store)
//! 6. Rate limiting (governor; auth form posts only)
//!
//! The auth extractors in [`auth`] run per handler, inside all of the above.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{GuestOnly, RequireAuth};
pub use rate_limit::auth_rate_limiter;
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::{SecurityHeaders, security_headers_middleware};
pub use session::create_session_layer;
