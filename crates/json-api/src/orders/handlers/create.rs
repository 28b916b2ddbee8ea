//! Checkout Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use agrimart::orders::PaymentMethod;
use agrimart_app::domain::orders::data::NewCheckout;

use crate::{
    extensions::*,
    observability::{CheckoutOutcome, record_checkout},
    orders::{
        errors::{checkout_outcome, into_status_error},
        models::{DeliveryAddressPayload, OrderResponse},
    },
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    pub delivery_address: DeliveryAddressPayload,

    /// `cod`, `upi`, `razorpay` or `bank_transfer`
    pub payment_method: String,

    /// Required for `upi`
    pub upi_id: Option<String>,

    pub notes: Option<String>,
}

impl CheckoutRequest {
    fn into_checkout(self) -> Result<NewCheckout, StatusError> {
        Ok(NewCheckout {
            payment_method: self
                .payment_method
                .parse::<PaymentMethod>()
                .or_400("unknown payment method")?,
            delivery_address: self.delivery_address.into(),
            upi_id: self.upi_id,
            notes: self.notes,
        })
    }
}

/// Checkout Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    /// One order per seller in the cart
    pub orders: Vec<OrderResponse>,
}

/// Checkout Handler
///
/// Turns the caller's cart into one order per seller. Either every order is
/// created and the cart emptied, or nothing changes.
#[endpoint(
    tags("orders"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Orders created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or invalid details"),
        (status_code = StatusCode::NOT_FOUND, description = "Product no longer available"),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let buyer = depot.user_uuid_or_401()?;

    let checkout = json.into_inner().into_checkout().inspect_err(|_| {
        record_checkout(CheckoutOutcome::Rejected);
    })?;

    let orders = match state
        .app
        .orders
        .checkout(buyer, checkout, Timestamp::now())
        .await
    {
        Ok(orders) => orders,
        Err(error) => {
            record_checkout(checkout_outcome(&error));

            return Err(into_status_error(error));
        }
    };

    record_checkout(CheckoutOutcome::Completed);

    res.status_code(StatusCode::CREATED);

    Ok(Json(CheckoutResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}
