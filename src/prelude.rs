//! Agrimart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    charges::{ChargePolicy, OrderSummary},
    checkout::{CheckoutError, CheckoutLine, DraftItem, SellerOrderDraft, split_by_seller},
    orders::{
        Actor, OrderStatus, PaymentError, PaymentMethod, PaymentStatus, Settlement,
        TransitionError, settle,
    },
    pricing::{Amount, CURRENCY, Discount, PricingError, amount_from_minor, final_price, minor_units},
    stock::{StockError, ensure_available, merged_quantity},
};
