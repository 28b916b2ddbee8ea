//! Product Errors

use salvo::http::StatusError;
use tracing::error;

use agrimart_app::domain::products::ProductsServiceError;

pub(crate) fn into_status_error(error: ProductsServiceError) -> StatusError {
    match error {
        ProductsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Product already exists")
        }
        ProductsServiceError::NotFound => StatusError::not_found().brief("Product not found"),
        ProductsServiceError::Forbidden => {
            StatusError::forbidden().brief("Product belongs to another seller")
        }
        ProductsServiceError::InvalidReference
        | ProductsServiceError::MissingRequiredData
        | ProductsServiceError::InvalidData
        | ProductsServiceError::OutOfRange(_) => {
            StatusError::bad_request().brief("Invalid product payload")
        }
        ProductsServiceError::Pricing(source) => StatusError::bad_request().brief(source.to_string()),
        ProductsServiceError::Sql(source) => {
            error!("product storage failure: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use agrimart::pricing::PricingError;
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn errors_map_to_statuses() {
        let cases = [
            (ProductsServiceError::NotFound, StatusCode::NOT_FOUND),
            (ProductsServiceError::Forbidden, StatusCode::FORBIDDEN),
            (ProductsServiceError::AlreadyExists, StatusCode::CONFLICT),
            (ProductsServiceError::InvalidData, StatusCode::BAD_REQUEST),
            (
                ProductsServiceError::Pricing(PricingError::DiscountOutOfRange(120)),
                StatusCode::BAD_REQUEST,
            ),
            (
                ProductsServiceError::Sql(sqlx::Error::PoolClosed),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(into_status_error(error).code, expected);
        }
    }
}
