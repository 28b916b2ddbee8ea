//! Order Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use agrimart::orders::{Actor, OrderStatus};
use agrimart_app::domain::orders::{
    data::{DEFAULT_PAGE_LIMIT, OrdersQuery},
    records::OrderPage,
};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Orders Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// Newest first
    pub orders: Vec<OrderResponse>,
    pub pagination: PaginationResponse,
}

/// Pagination Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaginationResponse {
    pub page: u32,
    pub limit: u32,

    /// Orders matching the filters across all pages
    pub total: u64,

    pub pages: u64,
}

impl From<OrderPage> for OrdersResponse {
    fn from(page: OrderPage) -> Self {
        OrdersResponse {
            orders: page.orders.into_iter().map(Into::into).collect(),
            pagination: PaginationResponse {
                page: page.page,
                limit: page.limit,
                total: page.total,
                pages: page.pages,
            },
        }
    }
}

fn parse_role(role: Option<String>) -> Result<Actor, StatusError> {
    match role.as_deref() {
        None | Some("buyer") => Ok(Actor::Buyer),
        Some("seller") => Ok(Actor::Seller),
        Some(_) => Err(StatusError::bad_request().brief("role must be buyer or seller")),
    }
}

/// Order Index Handler
///
/// Lists orders the caller bought (`role=buyer`, the default) or sells (`role=seller`).
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    role: QueryParam<String, false>,
    status: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let query = OrdersQuery {
        role: parse_role(role.into_inner())?,
        status: status
            .into_inner()
            .map(|status| status.parse::<OrderStatus>())
            .transpose()
            .or_400("unknown order status")?,
        page: page.into_inner().unwrap_or(1),
        limit: limit.into_inner().unwrap_or(DEFAULT_PAGE_LIMIT),
    };

    let page = state
        .app
        .orders
        .list_orders(user, query)
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}
