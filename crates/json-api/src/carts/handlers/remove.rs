//! Remove Cart Item Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
///
/// Removing a product that is not in the cart still succeeds.
#[endpoint(
    tags("cart"),
    summary = "Remove Cart Item",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .remove_item(user, product.into_inner().into(), Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use agrimart_app::domain::{carts::MockCartsService, products::records::ProductUuid};

    use crate::test_helpers::{TEST_USER_UUID, carts_service, make_cart};

    use super::*;

    fn make_service(repo: MockCartsService) -> Service {
        carts_service(repo, Router::with_path("cart/remove/{product}").delete(handler))
    }

    #[tokio::test]
    async fn test_remove_returns_200() -> TestResult {
        let product = ProductUuid::new();
        let cart = make_cart(TEST_USER_UUID);

        let mut repo = MockCartsService::new();

        repo.expect_remove_item()
            .once()
            .withf(move |user, p, _| *user == TEST_USER_UUID && *p == product)
            .return_once(move |_, _, _| Ok(cart));

        let res = TestClient::delete(format!("http://example.com/cart/remove/{product}"))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_remove_invalid_uuid_returns_400() -> TestResult {
        let mut repo = MockCartsService::new();

        repo.expect_remove_item().never();

        let res = TestClient::delete("http://example.com/cart/remove/rice")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
