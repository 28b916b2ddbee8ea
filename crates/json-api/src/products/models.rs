//! Product Models

use agrimart_app::domain::products::records::ProductDiscountRecord;
use jiff::Timestamp;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Percentage discount with its expiry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountPayload {
    /// Percentage off, 0 to 100
    pub percent: u8,

    /// RFC 3339 instant after which the discount no longer applies
    pub expires_at: String,
}

impl DiscountPayload {
    pub(crate) fn into_record(self) -> Result<ProductDiscountRecord, jiff::Error> {
        Ok(ProductDiscountRecord {
            percent: self.percent,
            expires_at: self.expires_at.parse::<Timestamp>()?,
        })
    }
}

impl From<ProductDiscountRecord> for DiscountPayload {
    fn from(discount: ProductDiscountRecord) -> Self {
        DiscountPayload {
            percent: discount.percent,
            expires_at: discount.expires_at.to_string(),
        }
    }
}

/// Parse an optional discount payload.
pub(crate) fn parse_discount(
    discount: Option<DiscountPayload>,
) -> Result<Option<ProductDiscountRecord>, jiff::Error> {
    discount.map(DiscountPayload::into_record).transpose()
}
