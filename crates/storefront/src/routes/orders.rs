//! Order history route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::api::Order;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::services::session_token;
use crate::state::AppState;

use super::Layout;

/// Order display data for templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    /// Short reference: the last 8 characters of the order's object ID.
    pub reference: String,
    pub date: String,
    pub paid: bool,
    pub payment_status: &'static str,
    pub delivered: bool,
    pub delivery_status: &'static str,
    pub payment_method: &'static str,
    pub total: String,
    /// `(image, title)` of each line.
    pub thumbnails: Vec<(String, String)>,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        let id = order.id.as_str();
        let reference = id
            .char_indices()
            .rev()
            .nth(7)
            .map_or(id, |(start, _)| &id[start..])
            .to_string();

        Self {
            reference,
            date: order
                .created_at
                .map(|at| at.format("%-d %b %Y").to_string())
                .unwrap_or_default(),
            paid: order.is_paid,
            payment_status: order.payment_status().label(),
            delivered: order.is_delivered,
            delivery_status: order.delivery_status().label(),
            payment_method: order.payment_method_type.label(),
            total: order.total_order_price.to_string(),
            thumbnails: order
                .cart_items
                .iter()
                .filter_map(|item| item.product.as_ref())
                .map(|product| (product.image_cover.clone(), product.title.clone()))
                .collect(),
        }
    }
}

/// Newest first; orders without a date go last.
fn newest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub layout: Layout,
    pub orders: Vec<OrderView>,
}

/// Display the signed-in customer's orders.
#[instrument(skip_all)]
pub async fn index(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response> {
    let Some(token) = session_token(&session).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let orders = state.api().user_orders(&token, &user.id).await?;
    let orders = newest_first(orders).iter().map(OrderView::from).collect();

    Ok(OrdersTemplate {
        layout: Layout::load(&session, "/orders").await?,
        orders,
    }
    .into_response())
}
