//! Orders service errors.

use agrimart::{
    checkout::CheckoutError,
    orders::{PaymentError, TransitionError},
    pricing::PricingError,
};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::products::records::ProductUuid;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order or product not found")]
    NotFound,

    #[error("not permitted on this order")]
    Forbidden,

    #[error("sellers cannot buy their own products")]
    SelfTradeForbidden,

    #[error("{0}")]
    InvalidInput(String),

    #[error("product {product}: requested {requested}, only {available} in stock")]
    InsufficientStock {
        product: ProductUuid,
        requested: u64,
        available: u64,
    },

    #[error("{0}")]
    InvalidTransition(String),

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("pricing error")]
    Pricing(#[from] PricingError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<TransitionError> for OrdersServiceError {
    fn from(error: TransitionError) -> Self {
        match error {
            TransitionError::NotPermitted { .. } => Self::Forbidden,
            TransitionError::Illegal { .. } => Self::InvalidTransition(error.to_string()),
        }
    }
}

impl From<PaymentError> for OrdersServiceError {
    fn from(error: PaymentError) -> Self {
        match error {
            PaymentError::OrderClosed(_) => Self::InvalidTransition(error.to_string()),
            PaymentError::MissingUpiId | PaymentError::AmountMismatch { .. } => {
                Self::InvalidInput(error.to_string())
            }
        }
    }
}

impl From<CheckoutError> for OrdersServiceError {
    fn from(error: CheckoutError) -> Self {
        match error {
            CheckoutError::EmptyCart => Self::InvalidInput(error.to_string()),
            CheckoutError::Pricing(error) => Self::Pricing(error),
        }
    }
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
