//! Order Payment Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agrimart_app::domain::orders::{data::NewPayment, records::PaymentReceipt};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentRequest {
    /// Amount in paise; must equal the order total
    pub amount: u64,
    pub transaction_id: Option<String>,
}

impl From<PaymentRequest> for NewPayment {
    fn from(request: PaymentRequest) -> Self {
        NewPayment {
            amount: request.amount,
            transaction_id: request.transaction_id,
        }
    }
}

/// Payment Receipt Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentReceiptResponse {
    pub order_uuid: Uuid,
    pub payment_status: String,
    pub order_status: String,
    pub amount: u64,
    pub paid_at: Option<String>,
}

impl From<PaymentReceipt> for PaymentReceiptResponse {
    fn from(receipt: PaymentReceipt) -> Self {
        PaymentReceiptResponse {
            order_uuid: receipt.order_uuid.into(),
            payment_status: receipt.payment_status.to_string(),
            order_status: receipt.order_status.to_string(),
            amount: receipt.amount,
            paid_at: receipt.paid_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Order Payment Handler
///
/// Records the buyer's payment. Paying a placed order confirms it.
#[endpoint(
    tags("orders"),
    summary = "Pay for Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Payment recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Amount does not match the total"),
        (status_code = StatusCode::FORBIDDEN, description = "Not the buyer"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::CONFLICT, description = "Order cannot be paid"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<PaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<PaymentReceiptResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let buyer = depot.user_uuid_or_401()?;

    let receipt = state
        .app
        .orders
        .process_payment(buyer, order.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(receipt.into()))
}

#[cfg(test)]
mod tests {
    use agrimart::orders::{OrderStatus, PaymentStatus};
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use agrimart_app::domain::orders::{
        MockOrdersService, OrdersServiceError, records::OrderUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, orders_service};

    use super::*;

    fn make_service(repo: MockOrdersService) -> Service {
        orders_service(repo, Router::with_path("orders/{order}/payment").post(handler))
    }

    #[tokio::test]
    async fn test_exact_payment_returns_receipt() -> TestResult {
        let uuid = OrderUuid::new();

        let mut repo = MockOrdersService::new();

        repo.expect_process_payment()
            .once()
            .withf(move |buyer, o, payment| {
                *buyer == TEST_USER_UUID
                    && *o == uuid
                    && *payment
                        == NewPayment {
                            amount: 260_00,
                            transaction_id: Some("TXN-1".to_string()),
                        }
            })
            .return_once(move |_, _, _| {
                Ok(PaymentReceipt {
                    order_uuid: uuid,
                    payment_status: PaymentStatus::Completed,
                    order_status: OrderStatus::Confirmed,
                    amount: 260_00,
                    paid_at: Some(Timestamp::UNIX_EPOCH),
                })
            });

        let mut res = TestClient::post(format!("http://example.com/orders/{uuid}/payment"))
            .json(&json!({ "amount": 260_00, "transaction_id": "TXN-1" }))
            .send(&make_service(repo))
            .await;

        let body: PaymentReceiptResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.payment_status, "completed");
        assert_eq!(body.order_status, "confirmed");

        Ok(())
    }

    #[tokio::test]
    async fn test_wrong_amount_returns_400() -> TestResult {
        let uuid = OrderUuid::new();

        let mut repo = MockOrdersService::new();

        repo.expect_process_payment().once().return_once(|_, _, _| {
            Err(OrdersServiceError::InvalidInput(
                "payment of 25999 does not match order total 26000".to_string(),
            ))
        });

        let res = TestClient::post(format!("http://example.com/orders/{uuid}/payment"))
            .json(&json!({ "amount": 259_99 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_paying_cancelled_order_returns_409() -> TestResult {
        let uuid = OrderUuid::new();

        let mut repo = MockOrdersService::new();

        repo.expect_process_payment().once().return_once(|_, _, _| {
            Err(OrdersServiceError::InvalidTransition(
                "order is cancelled and cannot be paid".to_string(),
            ))
        });

        let res = TestClient::post(format!("http://example.com/orders/{uuid}/payment"))
            .json(&json!({ "amount": 100 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
