//! Carts service errors.

use agrimart::{pricing::PricingError, stock::StockError};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart already exists")]
    AlreadyExists,

    #[error("cart item or product not found")]
    NotFound,

    #[error("sellers cannot buy their own products")]
    SelfTradeForbidden,

    #[error("{0}")]
    InvalidInput(String),

    #[error("requested {requested}, only {available} in stock")]
    InsufficientStock { requested: u64, available: u64 },

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

impl From<StockError> for CartsServiceError {
    fn from(error: StockError) -> Self {
        match error {
            StockError::Insufficient {
                requested,
                available,
            } => Self::InsufficientStock {
                requested,
                available,
            },
            StockError::ZeroQuantity | StockError::Overflow => Self::InvalidInput(error.to_string()),
        }
    }
}

impl From<Error> for CartsServiceError {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_errors_map_to_cart_errors() {
        assert!(matches!(
            CartsServiceError::from(StockError::Insufficient {
                requested: 3,
                available: 2
            }),
            CartsServiceError::InsufficientStock {
                requested: 3,
                available: 2
            }
        ));
        assert!(matches!(
            CartsServiceError::from(StockError::ZeroQuantity),
            CartsServiceError::InvalidInput(_)
        ));
    }
}
