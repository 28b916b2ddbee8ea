//! Cart Data

use crate::domain::products::records::ProductUuid;

/// Line to add to a cart, or to increment if the product is already there.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub variant: Option<String>,
}
