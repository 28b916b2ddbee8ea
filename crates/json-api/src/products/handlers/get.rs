//! Get Product Handler

use std::{string::ToString, sync::Arc};

use jiff::Timestamp;
use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agrimart::pricing::PricingError;
use agrimart_app::domain::products::records::ProductRecord;

use crate::{
    extensions::*,
    products::{errors::into_status_error, models::DiscountPayload},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductResponse {
    /// The unique identifier of the product
    pub uuid: Uuid,

    /// The user selling the product
    pub seller_uuid: Uuid,

    /// Product title
    pub title: String,

    /// Listed price in paise
    pub price: u64,

    /// Price charged right now, with any active discount applied
    pub final_price: u64,

    /// Current discount, if any
    pub discount: Option<DiscountPayload>,

    /// Units on the shelf
    pub stock: u64,

    /// Whether the product is listed for sale
    pub active: bool,

    /// The date and time the product was created
    pub created_at: String,

    /// The date and time the product was last updated
    pub updated_at: String,
}

impl ProductResponse {
    /// Render a product priced at `point_in_time`.
    pub(crate) fn priced_at(
        product: ProductRecord,
        point_in_time: Timestamp,
    ) -> Result<Self, PricingError> {
        Ok(ProductResponse {
            final_price: product.final_price(point_in_time)?,
            uuid: product.uuid.into(),
            seller_uuid: product.seller_uuid.into(),
            title: product.title,
            price: product.price,
            discount: product.discount.map(Into::into),
            stock: product.stock,
            active: product.active,
            created_at: product.created_at.to_string(),
            updated_at: product.updated_at.to_string(),
        })
    }
}

/// Get Product Handler
///
/// Returns a product with its final price at `at`, defaulting to now.
#[endpoint(
    tags("products"),
    summary = "Get Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    depot.user_uuid_or_401()?;
    let point_in_time = at.into_point_in_time()?;

    let product = state
        .app
        .products
        .get_product(product.into_inner().into())
        .await
        .map_err(into_status_error)?;

    ProductResponse::priced_at(product, point_in_time)
        .map(Json)
        .or_500("failed to price product")
}
