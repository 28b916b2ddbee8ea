//! Cancel Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Cancel Order Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CancelOrderRequest {
    /// Kept on the status history entry
    pub reason: Option<String>,
}

/// Cancel Order Handler
///
/// Either party may cancel before the order ships. Reserved stock is returned
/// and a completed payment becomes refunded.
#[endpoint(
    tags("orders"),
    summary = "Cancel Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cancelled order"),
        (status_code = StatusCode::FORBIDDEN, description = "Not the buyer or seller"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order can no longer be cancelled"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<CancelOrderRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let order = state
        .app
        .orders
        .cancel_order(user, order.into_inner().into(), json.into_inner().reason)
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
