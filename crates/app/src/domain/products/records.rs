//! Product Records

use agrimart::pricing::{
    Amount, Discount, PricingError, amount_from_minor, final_price, minor_units,
};
use jiff::Timestamp;

use crate::{domain::users::records::UserUuid, uuids::TypedUuid};

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Percentage discount with its expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductDiscountRecord {
    pub percent: u8,
    pub expires_at: Timestamp,
}

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub seller_uuid: UserUuid,
    pub title: String,
    pub price: u64,
    pub discount: Option<ProductDiscountRecord>,
    pub stock: u64,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ProductDiscountRecord {
    /// Validated core discount.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::DiscountOutOfRange`] above 100%.
    pub fn to_discount(self) -> Result<Discount, PricingError> {
        Discount::new(self.percent, self.expires_at)
    }
}

/// Price charged at `at` for a stored price and discount.
///
/// # Errors
///
/// Returns an error if the stored price or discount is out of range.
pub fn price_at(
    price: u64,
    discount: Option<ProductDiscountRecord>,
    at: Timestamp,
) -> Result<Amount, PricingError> {
    let discount = discount.map(ProductDiscountRecord::to_discount).transpose()?;

    final_price(amount_from_minor(price)?, discount.as_ref(), at)
}

impl ProductRecord {
    /// Price charged at `at`, with any active discount applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored price or discount is out of range.
    pub fn unit_price(&self, at: Timestamp) -> Result<Amount, PricingError> {
        price_at(self.price, self.discount, at)
    }

    /// [`Self::unit_price`] in minor units.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored price or discount is out of range.
    pub fn final_price(&self, at: Timestamp) -> Result<u64, PricingError> {
        minor_units(&self.unit_price(at)?)
    }

    /// Listed, not deleted, and so purchasable.
    pub fn is_available(&self) -> bool {
        self.active && self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use super::*;

    fn product(price: u64, discount: Option<ProductDiscountRecord>) -> ProductRecord {
        let now = Timestamp::now();

        ProductRecord {
            uuid: ProductUuid::new(),
            seller_uuid: UserUuid::new(),
            title: "Basmati rice".to_string(),
            price,
            discount,
            stock: 10,
            active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn final_price_applies_active_discount() -> TestResult {
        let now = Timestamp::now();
        let record = product(
            80_00,
            Some(ProductDiscountRecord {
                percent: 25,
                expires_at: now + SignedDuration::from_hours(2),
            }),
        );

        assert_eq!(record.final_price(now)?, 60_00);
        assert_eq!(record.final_price(now + SignedDuration::from_hours(3))?, 80_00);

        Ok(())
    }

    #[test]
    fn final_price_without_discount_is_price() -> TestResult {
        assert_eq!(product(12_50, None).final_price(Timestamp::now())?, 12_50);

        Ok(())
    }

    #[test]
    fn out_of_range_discount_is_an_error() {
        let record = product(
            100,
            Some(ProductDiscountRecord {
                percent: 150,
                expires_at: Timestamp::now(),
            }),
        );

        assert_eq!(
            record.final_price(Timestamp::now()),
            Err(PricingError::DiscountOutOfRange(150))
        );
    }
}
