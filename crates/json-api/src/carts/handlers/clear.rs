//! Clear Cart Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Clear Cart Handler
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .clear_cart(user, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use agrimart_app::domain::{carts::MockCartsService, charges::ChargesRecord};

    use crate::test_helpers::{TEST_USER_UUID, carts_service, make_cart};

    use super::*;

    #[tokio::test]
    async fn test_clear_returns_empty_cart() -> TestResult {
        let mut cart = make_cart(TEST_USER_UUID);

        cart.items.clear();
        cart.summary = ChargesRecord::default();
        cart.total_items = 0;
        cart.total_amount = 0;

        let mut repo = MockCartsService::new();

        repo.expect_clear_cart()
            .once()
            .withf(|user, _| *user == TEST_USER_UUID)
            .return_once(move |_, _| Ok(cart));

        let mut res = TestClient::delete("http://example.com/cart/clear")
            .send(&carts_service(
                repo,
                Router::with_path("cart/clear").delete(handler),
            ))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.items.is_empty(), "cleared cart should have no lines");
        assert_eq!(body.total_amount, 0);

        Ok(())
    }
}
