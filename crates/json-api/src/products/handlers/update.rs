//! Update Product Handler

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

use agrimart_app::domain::products::data::ProductUpdate;
use jiff::Timestamp;

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        get::ProductResponse,
        models::{DiscountPayload, parse_discount},
    },
    state::State,
};

const fn listed() -> bool {
    true
}

/// Update Product Request
///
/// Replaces every field; an omitted discount clears it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
    pub title: String,
    pub price: u64,
    pub discount: Option<DiscountPayload>,
    pub stock: u64,
    #[serde(default = "listed")]
    pub active: bool,
}

impl TryFrom<UpdateProductRequest> for ProductUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateProductRequest) -> Result<Self, Self::Error> {
        Ok(ProductUpdate {
            title: request.title,
            price: request.price,
            discount: parse_discount(request.discount).or_400("invalid discount expiry")?,
            stock: request.stock,
            active: request.active,
        })
    }
}

/// Product Update Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::FORBIDDEN, description = "Product belongs to another seller"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(product, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        product_uuid = tracing::field::Empty,
        price = tracing::field::Empty,
        stock = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let seller = depot.user_uuid_or_401()?;
    let request = json.into_inner();
    let product = product.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(seller));
    span.record("product_uuid", tracing::field::display(product));
    span.record("price", tracing::field::display(request.price));
    span.record("stock", tracing::field::display(request.stock));

    let updated = state
        .app
        .products
        .update_product(seller, product.into(), request.try_into()?)
        .await
        .map_err(into_status_error)?;

    tracing::info!(product_uuid = %product, price = updated.price, "updated product");

    ProductResponse::priced_at(updated, Timestamp::now())
        .map(Json)
        .or_500("failed to price product")
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use agrimart_app::domain::products::{
        MockProductsService, ProductsServiceError, records::ProductUuid,
    };

    use crate::test_helpers::{TEST_USER_UUID, make_product, products_service};

    use super::*;

    fn make_service(repo: MockProductsService) -> Service {
        products_service(repo, Router::with_path("products/{product}").put(handler))
    }

    fn wheat_update() -> ProductUpdate {
        ProductUpdate {
            title: "Wheat".to_string(),
            price: 200,
            discount: None,
            stock: 7,
            active: true,
        }
    }

    #[tokio::test]
    async fn test_update_product_success() -> TestResult {
        let uuid = ProductUuid::new();

        let mut product = make_product(uuid, TEST_USER_UUID);

        product.price = 200;

        let mut repo = MockProductsService::new();

        repo.expect_update_product()
            .once()
            .withf(move |seller, u, update| {
                *seller == TEST_USER_UUID && *u == uuid && *update == wheat_update()
            })
            .return_once(move |_, _, _| Ok(product));

        let mut res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({ "title": "Wheat", "price": 200, "stock": 7 }))
            .send(&make_service(repo))
            .await;

        let body: ProductResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.price, 200);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_invalid_uuid_returns_400() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_update_product().never();

        let res = TestClient::put("http://example.com/products/123")
            .json(&json!({ "title": "Wheat", "price": 200, "stock": 7 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_someone_elses_product_returns_403() -> TestResult {
        let uuid = ProductUuid::new();

        let mut repo = MockProductsService::new();

        repo.expect_update_product()
            .once()
            .return_once(|_, _, _| Err(ProductsServiceError::Forbidden));

        let res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({ "title": "Wheat", "price": 200, "stock": 7 }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
