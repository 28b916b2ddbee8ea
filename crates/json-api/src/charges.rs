//! Charge summaries shared by cart and order responses.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use agrimart_app::domain::charges::ChargesRecord;

/// Charges in paise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ChargesResponse {
    /// Sum of line totals
    pub subtotal: u64,

    /// Flat fee, waived above the free-delivery threshold
    pub delivery_charge: u64,

    /// Tax on the subtotal
    pub tax: u64,

    /// Subtotal plus delivery plus tax
    pub total: u64,
}

impl From<ChargesRecord> for ChargesResponse {
    fn from(summary: ChargesRecord) -> Self {
        Self {
            subtotal: summary.subtotal,
            delivery_charge: summary.delivery_charge,
            tax: summary.tax,
            total: summary.total,
        }
    }
}
