//! Charges Records

use agrimart::{
    charges::OrderSummary,
    pricing::{PricingError, minor_units},
};

/// Subtotal, delivery, tax and total in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChargesRecord {
    pub subtotal: u64,
    pub delivery_charge: u64,
    pub tax: u64,
    pub total: u64,
}

impl TryFrom<&OrderSummary> for ChargesRecord {
    type Error = PricingError;

    fn try_from(summary: &OrderSummary) -> Result<Self, Self::Error> {
        Ok(Self {
            subtotal: minor_units(&summary.subtotal)?,
            delivery_charge: minor_units(&summary.delivery_charge)?,
            tax: minor_units(&summary.tax)?,
            total: minor_units(&summary.total)?,
        })
    }
}

/// Convert a stored `BIGINT` into an unsigned amount.
pub(crate) fn decode_u64(column: &str, value: i64) -> sqlx::Result<u64> {
    u64::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Convert a stored `INTEGER` quantity into an unsigned count.
pub(crate) fn decode_u32(column: &str, value: i32) -> sqlx::Result<u32> {
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Convert an unsigned amount into a `BIGINT` bind value.
pub(crate) fn encode_i64(column: &str, value: u64) -> sqlx::Result<i64> {
    i64::try_from(value).map_err(|e| sqlx::Error::Encode(format!("{column}: {e}").into()))
}

#[cfg(test)]
mod tests {
    use agrimart::{charges::ChargePolicy, pricing::amount_from_minor};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn summary_converts_to_minor_units() -> TestResult {
        let summary = ChargePolicy::default().summarise(amount_from_minor(200_00)?)?;

        assert_eq!(
            ChargesRecord::try_from(&summary)?,
            ChargesRecord {
                subtotal: 200_00,
                delivery_charge: 50_00,
                tax: 10_00,
                total: 260_00,
            }
        );

        Ok(())
    }

    #[test]
    fn negative_columns_fail_to_decode() {
        assert!(decode_u64("stock", -1).is_err());
        assert!(decode_u32("quantity", -1).is_err());
        assert!(encode_i64("price", u64::MAX).is_err());
    }
}
