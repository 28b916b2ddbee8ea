//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{charges::ChargesRecord, products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
///
/// Lines are priced at the products' current final prices.
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<CartItemRecord>,
    pub summary: ChargesRecord,
    pub total_items: u64,
    pub total_amount: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// CartItem Record
#[derive(Debug, Clone)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub seller_uuid: UserUuid,
    pub title: String,
    pub quantity: u32,
    pub variant: Option<String>,
    pub unit_price: u64,
    pub line_total: u64,
    pub stock: u64,
    /// `false` once the product is deactivated or deleted; such lines are left out of
    /// the summary and counters and fail checkout.
    pub available: bool,
    pub added_at: Timestamp,
}
