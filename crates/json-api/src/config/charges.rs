//! Charges Config

use agrimart::charges::{
    ChargePolicy, DEFAULT_DELIVERY_FEE_MINOR, DEFAULT_FREE_DELIVERY_THRESHOLD_MINOR,
    DEFAULT_TAX_RATE_PERCENT,
};
use clap::Args;

/// Delivery fee and tax settings, in minor units (paise) where applicable.
#[derive(Debug, Args)]
pub struct ChargesConfig {
    /// Flat delivery fee charged below the free delivery threshold
    #[arg(
        long,
        env = "DELIVERY_FEE_MINOR",
        default_value_t = DEFAULT_DELIVERY_FEE_MINOR,
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    pub delivery_fee_minor: i64,

    /// Subtotal at or above which delivery is free
    #[arg(
        long,
        env = "FREE_DELIVERY_THRESHOLD_MINOR",
        default_value_t = DEFAULT_FREE_DELIVERY_THRESHOLD_MINOR,
        value_parser = clap::value_parser!(i64).range(0..)
    )]
    pub free_delivery_threshold_minor: i64,

    /// Tax rate as a whole percentage of the subtotal
    #[arg(
        long,
        env = "TAX_RATE_PERCENT",
        default_value_t = DEFAULT_TAX_RATE_PERCENT,
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub tax_rate_percent: u8,
}

impl ChargesConfig {
    #[must_use]
    pub fn policy(&self) -> ChargePolicy {
        ChargePolicy::new(
            self.delivery_fee_minor,
            self.free_delivery_threshold_minor,
            self.tax_rate_percent,
        )
    }
}
