//! Agrimart
//!
//! Marketplace rules for agricultural produce: pricing, delivery and tax charges, stock checks,
//! per-seller checkout and the order and payment lifecycles.

pub mod charges;
pub mod checkout;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod stock;
