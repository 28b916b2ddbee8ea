//! Get Cart Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agrimart_app::domain::carts::records::{CartItemRecord, CartRecord};

use crate::{
    carts::errors::into_status_error, charges::ChargesResponse, extensions::*, state::State,
};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The items in the cart, oldest first
    pub items: Vec<CartItemResponse>,

    /// Charges if the cart were checked out now
    pub summary: ChargesResponse,

    /// Units across all lines
    pub total_items: u64,

    /// Sum of line totals in paise
    pub total_amount: u64,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        CartResponse {
            uuid: cart.uuid.into(),
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            summary: cart.summary.into(),
            total_items: cart.total_items,
            total_amount: cart.total_amount,
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The product in the cart item
    pub product_uuid: Uuid,

    /// The seller of the product
    pub seller_uuid: Uuid,

    /// Product title
    pub title: String,

    /// Units in the cart
    pub quantity: u32,

    /// Chosen variant, e.g. a pack size
    pub variant: Option<String>,

    /// Current final unit price in paise
    pub unit_price: u64,

    /// Unit price times quantity
    pub line_total: u64,

    /// Units the seller has on the shelf
    pub stock: u64,

    /// Whether the product is still listed; unlisted lines are not counted in the summary
    pub available: bool,

    /// The date and time the line was first added
    pub added_at: String,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        Self {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            seller_uuid: item.seller_uuid.into(),
            title: item.title,
            quantity: item.quantity,
            variant: item.variant,
            unit_price: item.unit_price,
            line_total: item.line_total,
            stock: item.stock,
            available: item.available,
            added_at: item.added_at.to_string(),
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart, creating it on first access.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;
    let point_in_time = at.into_point_in_time()?;

    let cart = state
        .app
        .carts
        .get_cart(user, point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
