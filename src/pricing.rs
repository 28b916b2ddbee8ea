//! Pricing

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money, MoneyError,
    iso::{self, Currency},
};
use thiserror::Error;

/// Currency every marketplace amount is held in.
pub const CURRENCY: &Currency = iso::INR;

/// A monetary amount in the marketplace currency.
pub type Amount = Money<'static, Currency>;

/// Errors raised while pricing products, lines and orders.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Discounts are whole percentages between 0 and 100.
    #[error("discount of {0}% is outside 0..=100")]
    DiscountOutOfRange(u8),

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Minor unit arithmetic overflowed.
    #[error("amount overflowed")]
    Overflow,

    /// A stored amount cannot be negative.
    #[error("amount {0} is negative")]
    Negative(i64),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Percentage discount on a product, valid until `expires_at`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Discount {
    percent_points: u8,
    percent: Percentage,
    expires_at: Timestamp,
}

impl Discount {
    /// Create a discount of `percent_points` percent.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::DiscountOutOfRange`] above 100%.
    pub fn new(percent_points: u8, expires_at: Timestamp) -> Result<Self, PricingError> {
        if percent_points > 100 {
            return Err(PricingError::DiscountOutOfRange(percent_points));
        }

        Ok(Self {
            percent_points,
            percent: Percentage::from(Decimal::new(i64::from(percent_points), 2)),
            expires_at,
        })
    }

    /// Whole percent taken off the price.
    pub fn percent_points(&self) -> u8 {
        self.percent_points
    }

    /// When the discount stops applying.
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// A discount applies strictly before its expiry.
    pub fn is_active_at(&self, at: Timestamp) -> bool {
        at < self.expires_at
    }
}

/// Build an amount from stored minor units.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] when the value does not fit an `i64`.
pub fn amount_from_minor(minor: u64) -> Result<Amount, PricingError> {
    let minor = i64::try_from(minor).map_err(|_overflow| PricingError::Overflow)?;

    Ok(Money::from_minor(minor, CURRENCY))
}

/// Minor units of an amount, for storage.
///
/// # Errors
///
/// Returns [`PricingError::Negative`] for amounts below zero.
pub fn minor_units(amount: &Amount) -> Result<u64, PricingError> {
    let minor = amount.to_minor_units();

    u64::try_from(minor).map_err(|_negative| PricingError::Negative(minor))
}

/// Price a product at a point in time, applying its discount while it is active.
///
/// # Errors
///
/// Returns an error if the discount cannot be represented in minor units.
pub fn final_price(
    price: Amount,
    discount: Option<&Discount>,
    at: Timestamp,
) -> Result<Amount, PricingError> {
    match discount {
        Some(discount) if discount.is_active_at(at) => {
            let off = percent_of_minor(&discount.percent, price.to_minor_units())?;

            Ok(price.sub(Money::from_minor(off, price.currency()))?)
        }
        Some(_) | None => Ok(price),
    }
}

/// Unit price multiplied by quantity.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the total does not fit in minor units.
pub fn line_total(unit_price: Amount, quantity: u32) -> Result<Amount, PricingError> {
    unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .map(|minor| Money::from_minor(minor, unit_price.currency()))
        .ok_or(PricingError::Overflow)
}

/// Sum of line totals; zero when there are none.
///
/// # Errors
///
/// Returns an error if money arithmetic fails.
pub fn subtotal<I>(line_totals: I) -> Result<Amount, PricingError>
where
    I: IntoIterator<Item = Amount>,
{
    line_totals
        .into_iter()
        .try_fold(Money::from_minor(0, CURRENCY), |acc, line| {
            acc.add(line).map_err(PricingError::from)
        })
}

/// Apply a percentage to a minor unit amount, rounding half away from zero.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the result is not representable.
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE)
        .checked_mul(minor)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};
    use testresult::TestResult;

    use super::*;

    fn rupees(whole: i64) -> Amount {
        Money::from_minor(whole * 100, CURRENCY)
    }

    #[test]
    fn discount_applies_before_expiry() -> TestResult {
        let now = Timestamp::now();
        let discount = Discount::new(10, now + SignedDuration::from_hours(1))?;

        let price = final_price(rupees(100), Some(&discount), now)?;

        assert_eq!(price, rupees(90));

        Ok(())
    }

    #[test]
    fn discount_ignored_at_and_after_expiry() -> TestResult {
        let now = Timestamp::now();
        let discount = Discount::new(25, now)?;

        assert_eq!(final_price(rupees(100), Some(&discount), now)?, rupees(100));
        assert_eq!(
            final_price(
                rupees(100),
                Some(&discount),
                now + SignedDuration::from_secs(1)
            )?,
            rupees(100)
        );

        Ok(())
    }

    #[test]
    fn no_discount_keeps_price() -> TestResult {
        assert_eq!(
            final_price(rupees(42), None, Timestamp::now())?,
            rupees(42)
        );

        Ok(())
    }

    #[test]
    fn discount_rounds_half_away_from_zero() -> TestResult {
        let now = Timestamp::now();
        let discount = Discount::new(15, now + SignedDuration::from_hours(1))?;

        // 15% of 0.99 is 14.85 paise, rounded to 15.
        let price = final_price(Money::from_minor(99, CURRENCY), Some(&discount), now)?;

        assert_eq!(price.to_minor_units(), 84);

        Ok(())
    }

    #[test]
    fn full_discount_is_free() -> TestResult {
        let now = Timestamp::now();
        let discount = Discount::new(100, now + SignedDuration::from_hours(1))?;

        assert_eq!(
            final_price(rupees(30), Some(&discount), now)?.to_minor_units(),
            0
        );

        Ok(())
    }

    #[test]
    fn discount_above_hundred_is_rejected() {
        let result = Discount::new(101, Timestamp::now());

        assert_eq!(result, Err(PricingError::DiscountOutOfRange(101)));
    }

    #[test]
    fn line_total_multiplies_quantity() -> TestResult {
        assert_eq!(line_total(rupees(100), 2)?, rupees(200));
        assert_eq!(line_total(rupees(100), 0)?, rupees(0));

        Ok(())
    }

    #[test]
    fn line_total_overflow_is_an_error() {
        let unit = Money::from_minor(i64::MAX, CURRENCY);

        assert_eq!(line_total(unit, 2), Err(PricingError::Overflow));
    }

    #[test]
    fn subtotal_of_nothing_is_zero() -> TestResult {
        assert_eq!(subtotal([])?, rupees(0));

        Ok(())
    }

    #[test]
    fn subtotal_sums_lines() -> TestResult {
        assert_eq!(subtotal([rupees(100), rupees(250)])?, rupees(350));

        Ok(())
    }

    #[test]
    fn minor_unit_conversions() -> TestResult {
        assert_eq!(minor_units(&amount_from_minor(12_345)?)?, 12_345);
        assert_eq!(amount_from_minor(u64::MAX), Err(PricingError::Overflow));
        assert_eq!(
            minor_units(&Money::from_minor(-1, CURRENCY)),
            Err(PricingError::Negative(-1))
        );

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let percent = Percentage::from(2.0);

        assert_eq!(
            percent_of_minor(&percent, i64::MAX),
            Err(PricingError::PercentConversion)
        );
    }
}
