//! Products Data

use crate::domain::{
    products::records::{ProductDiscountRecord, ProductUuid},
    users::records::UserUuid,
};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub seller_uuid: UserUuid,
    pub title: String,
    pub price: u64,
    pub discount: Option<ProductDiscountRecord>,
    pub stock: u64,
}

/// Product Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub title: String,
    pub price: u64,
    pub discount: Option<ProductDiscountRecord>,
    pub stock: u64,
    pub active: bool,
}
