//! Delivery and tax charges on top of a subtotal.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::Money;

use crate::pricing::{Amount, CURRENCY, PricingError, percent_of_minor};

/// Default flat delivery fee: 50.00.
pub const DEFAULT_DELIVERY_FEE_MINOR: i64 = 50_00;

/// Default subtotal above which delivery is free: 500.00.
pub const DEFAULT_FREE_DELIVERY_THRESHOLD_MINOR: i64 = 500_00;

/// Default tax rate in whole percent.
pub const DEFAULT_TAX_RATE_PERCENT: u8 = 5;

/// Flat delivery fee, free-delivery threshold and tax rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargePolicy {
    delivery_fee: Amount,
    free_delivery_threshold: Amount,
    tax_rate: Percentage,
}

impl ChargePolicy {
    /// Build a policy from minor unit amounts and a whole percent tax rate.
    pub fn new(delivery_fee_minor: i64, free_delivery_threshold_minor: i64, tax_percent: u8) -> Self {
        Self {
            delivery_fee: Money::from_minor(delivery_fee_minor, CURRENCY),
            free_delivery_threshold: Money::from_minor(free_delivery_threshold_minor, CURRENCY),
            tax_rate: Percentage::from(Decimal::new(i64::from(tax_percent), 2)),
        }
    }

    /// Delivery charge for a subtotal.
    ///
    /// Nothing is charged for an empty subtotal or one above the threshold.
    pub fn delivery_charge(&self, subtotal: &Amount) -> Amount {
        let minor = subtotal.to_minor_units();

        if minor == 0 || minor > self.free_delivery_threshold.to_minor_units() {
            Money::from_minor(0, CURRENCY)
        } else {
            self.delivery_fee
        }
    }

    /// Tax on a subtotal.
    ///
    /// # Errors
    ///
    /// Returns an error if the tax cannot be represented in minor units.
    pub fn tax(&self, subtotal: &Amount) -> Result<Amount, PricingError> {
        let minor = percent_of_minor(&self.tax_rate, subtotal.to_minor_units())?;

        Ok(Money::from_minor(minor, CURRENCY))
    }

    /// Full breakdown for a subtotal.
    ///
    /// # Errors
    ///
    /// Returns an error if tax or total arithmetic fails.
    pub fn summarise(&self, subtotal: Amount) -> Result<OrderSummary, PricingError> {
        let delivery_charge = self.delivery_charge(&subtotal);
        let tax = self.tax(&subtotal)?;
        let total = subtotal.add(delivery_charge)?.add(tax)?;

        Ok(OrderSummary {
            subtotal,
            delivery_charge,
            tax,
            total,
        })
    }
}

impl Default for ChargePolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_DELIVERY_FEE_MINOR,
            DEFAULT_FREE_DELIVERY_THRESHOLD_MINOR,
            DEFAULT_TAX_RATE_PERCENT,
        )
    }
}

/// Subtotal, delivery, tax and grand total of a cart or order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSummary {
    /// Sum of line totals.
    pub subtotal: Amount,

    /// Flat delivery fee, or zero.
    pub delivery_charge: Amount,

    /// Tax on the subtotal.
    pub tax: Amount,

    /// Subtotal plus delivery plus tax.
    pub total: Amount,
}

impl OrderSummary {
    /// Summary of an empty cart.
    pub fn empty() -> Self {
        let zero = Money::from_minor(0, CURRENCY);

        Self {
            subtotal: zero,
            delivery_charge: zero,
            tax: zero,
            total: zero,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn rupees(whole: i64) -> Amount {
        Money::from_minor(whole * 100, CURRENCY)
    }

    #[test]
    fn small_order_pays_delivery_and_tax() -> TestResult {
        let summary = ChargePolicy::default().summarise(rupees(200))?;

        assert_eq!(summary.subtotal, rupees(200));
        assert_eq!(summary.delivery_charge, rupees(50));
        assert_eq!(summary.tax, rupees(10));
        assert_eq!(summary.total, rupees(260));

        Ok(())
    }

    #[test]
    fn threshold_itself_still_pays_delivery() -> TestResult {
        let summary = ChargePolicy::default().summarise(rupees(500))?;

        assert_eq!(summary.delivery_charge, rupees(50));
        assert_eq!(summary.total, rupees(575));

        Ok(())
    }

    #[test]
    fn delivery_waived_above_threshold() -> TestResult {
        let summary = ChargePolicy::default().summarise(Money::from_minor(500_01, CURRENCY))?;

        assert_eq!(summary.delivery_charge, rupees(0));
        assert_eq!(summary.tax.to_minor_units(), 25_00);

        Ok(())
    }

    #[test]
    fn empty_subtotal_is_free() -> TestResult {
        let summary = ChargePolicy::default().summarise(rupees(0))?;

        assert_eq!(summary, OrderSummary::empty());

        Ok(())
    }

    #[test]
    fn custom_policy_is_honoured() -> TestResult {
        let policy = ChargePolicy::new(20_00, 100_00, 12);
        let summary = policy.summarise(rupees(50))?;

        assert_eq!(summary.delivery_charge, rupees(20));
        assert_eq!(summary.tax, rupees(6));
        assert_eq!(summary.total, rupees(76));

        Ok(())
    }
}
