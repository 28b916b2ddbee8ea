//! Create Product Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agrimart_app::domain::{
    products::{data::NewProduct, records::ProductUuid},
    users::records::UserUuid,
};

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        models::{DiscountPayload, parse_discount},
    },
    state::State,
};

/// Create Product Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProductRequest {
    /// Client-chosen identifier; generated when omitted
    pub uuid: Option<Uuid>,
    pub title: String,
    /// Price in paise
    pub price: u64,
    pub discount: Option<DiscountPayload>,
    pub stock: u64,
}

impl CreateProductRequest {
    fn into_new_product(self, seller: UserUuid) -> Result<NewProduct, StatusError> {
        Ok(NewProduct {
            uuid: self.uuid.map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            seller_uuid: seller,
            title: self.title,
            price: self.price,
            discount: parse_discount(self.discount).or_400("invalid discount expiry")?,
            stock: self.stock,
        })
    }
}

/// Product Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductCreatedResponse {
    /// Created product UUID
    pub uuid: Uuid,
}

/// Create Product Handler
///
/// The caller becomes the product's seller.
#[endpoint(
    tags("products"),
    summary = "Create Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::CONFLICT, description = "Product already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let seller = depot.user_uuid_or_401()?;
    let product = json.into_inner().into_new_product(seller)?;

    let uuid = state
        .app
        .products
        .create_product(product)
        .await
        .map_err(into_status_error)?
        .uuid;

    res.add_header(LOCATION, format!("/products/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(ProductCreatedResponse { uuid: uuid.into() }))
}
