//! Orders

pub mod payment;
pub mod status;

pub use payment::{
    ParsePaymentError, PaymentError, PaymentMethod, PaymentStatus, Settlement, settle,
};
pub use status::{Actor, OrderStatus, ParseOrderStatusError, TransitionError};
