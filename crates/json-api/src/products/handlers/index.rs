//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*,
    products::{errors::into_status_error, get::ProductResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Returns every listed product.
#[endpoint(
    tags("products"),
    summary = "List Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.user_uuid_or_401()?;
    let point_in_time = at.into_point_in_time()?;

    let products = state
        .app
        .products
        .list_products()
        .await
        .map_err(into_status_error)?
        .into_iter()
        .map(|product| ProductResponse::priced_at(product, point_in_time))
        .collect::<Result<Vec<_>, _>>()
        .or_500("failed to price products")?;

    Ok(Json(ProductsResponse { products }))
}
