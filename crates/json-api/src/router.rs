//! App Router

use salvo::Router;

use crate::{auth, carts, orders, products};

/// Every authenticated API route.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .push(Router::with_path("add").post(carts::add::handler))
                .push(Router::with_path("update").put(carts::update::handler))
                .push(Router::with_path("remove/{product}").delete(carts::remove::handler))
                .push(Router::with_path("clear").delete(carts::clear::handler)),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("status").put(orders::status::handler))
                        .push(Router::with_path("payment").post(orders::payment::handler))
                        .push(Router::with_path("cancel").put(orders::cancel::handler)),
                ),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{product}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
}
