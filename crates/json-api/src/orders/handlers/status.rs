//! Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use agrimart::orders::OrderStatus;
use agrimart_app::domain::orders::data::StatusChange;

use crate::{
    extensions::*,
    orders::{errors::into_status_error, models::OrderResponse},
    state::State,
};

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateStatusRequest {
    /// Next status; `cancelled` cancels the order
    pub status: String,
    pub note: Option<String>,
}

impl TryFrom<UpdateStatusRequest> for StatusChange {
    type Error = StatusError;

    fn try_from(request: UpdateStatusRequest) -> Result<Self, Self::Error> {
        Ok(StatusChange {
            status: request
                .status
                .parse::<OrderStatus>()
                .or_400("unknown order status")?,
            note: request.note,
        })
    }
}

/// Update Order Status Handler
///
/// Sellers move orders one step along their lifecycle.
#[endpoint(
    tags("orders"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated order"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::FORBIDDEN, description = "Not permitted"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let change = StatusChange::try_from(json.into_inner())?;
    let status = change.status;

    let order = state
        .app
        .orders
        .update_status(user, order.into_inner().into(), change)
        .await
        .map_err(into_status_error)?;

    info!(order_uuid = %order.uuid, %status, "order status updated");

    Ok(Json(order.into()))
}
