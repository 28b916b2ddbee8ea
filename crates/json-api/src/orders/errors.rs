//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use agrimart_app::domain::orders::OrdersServiceError;

use crate::observability::CheckoutOutcome;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::Forbidden => {
            StatusError::forbidden().brief("Not permitted on this order")
        }
        OrdersServiceError::SelfTradeForbidden => {
            StatusError::forbidden().brief("Sellers cannot buy their own products")
        }
        OrdersServiceError::InvalidInput(message) => StatusError::bad_request().brief(message),
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::InsufficientStock { .. } => {
            StatusError::conflict().brief(error.to_string())
        }
        OrdersServiceError::InvalidTransition(message) => StatusError::conflict().brief(message),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::Pricing(source) => {
            error!("failed to price order: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// Metric label for a failed checkout.
pub(crate) fn checkout_outcome(error: &OrdersServiceError) -> CheckoutOutcome {
    match error {
        OrdersServiceError::Pricing(_) | OrdersServiceError::Sql(_) => CheckoutOutcome::Failed,
        _ => CheckoutOutcome::Rejected,
    }
}
