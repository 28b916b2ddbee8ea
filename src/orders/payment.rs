//! Payment sub-state

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{orders::status::OrderStatus, pricing::Amount};

/// How the buyer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    Cod,

    /// UPI transfer; needs the payer's UPI id.
    Upi,

    /// Razorpay gateway.
    Razorpay,

    /// Direct bank transfer.
    BankTransfer,
}

/// Payment state, tracked apart from the order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Nothing received yet.
    Pending,

    /// Paid in full.
    Completed,

    /// Attempt failed.
    Failed,

    /// Money returned after cancellation.
    Refunded,
}

/// Rejected payment data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// UPI payments need a UPI id.
    #[error("a UPI id is required for UPI payments")]
    MissingUpiId,

    /// Submitted amount differs from the order total.
    #[error("payment of {submitted} does not match order total {expected}")]
    AmountMismatch {
        /// Order total in minor units.
        expected: i64,

        /// Submitted amount in minor units.
        submitted: u64,
    },

    /// Cancelled and returned orders take no payments.
    #[error("order is {0} and cannot be paid")]
    OrderClosed(OrderStatus),
}

/// Unknown payment method or status name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown payment value \"{0}\"")]
pub struct ParsePaymentError(pub String);

/// Result of accepting a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// New payment status.
    pub payment_status: PaymentStatus,

    /// Set when the payment also moves the order forward.
    pub order_status: Option<OrderStatus>,
}

impl PaymentMethod {
    /// Every method.
    pub const ALL: [Self; 4] = [Self::Cod, Self::Upi, Self::Razorpay, Self::BankTransfer];

    /// Stored and wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cod => "cod",
            Self::Upi => "upi",
            Self::Razorpay => "razorpay",
            Self::BankTransfer => "bank_transfer",
        }
    }

    /// Check the data the method needs at checkout.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentError::MissingUpiId`] for UPI without a non-blank id.
    pub fn validate(self, upi_id: Option<&str>) -> Result<(), PaymentError> {
        if self == Self::Upi && upi_id.is_none_or(|id| id.trim().is_empty()) {
            return Err(PaymentError::MissingUpiId);
        }

        Ok(())
    }
}

impl PaymentStatus {
    /// Every status.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Completed, Self::Failed, Self::Refunded];

    /// Stored and wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }

    /// Payment status once the order is cancelled.
    pub fn after_cancellation(self) -> Self {
        match self {
            Self::Completed => Self::Refunded,
            other => other,
        }
    }

    /// Payment status once the order is delivered; cash is collected at the door.
    pub fn after_delivery(self, method: PaymentMethod) -> Self {
        match (self, method) {
            (Self::Pending, PaymentMethod::Cod) => Self::Completed,
            (status, _) => status,
        }
    }
}

/// Accept a payment against an order.
///
/// The submitted amount is in minor units as the buyer sent it and must equal the order
/// total exactly. A `placed` order advances to `confirmed`.
///
/// # Errors
///
/// - [`PaymentError::OrderClosed`] for cancelled or returned orders.
/// - [`PaymentError::AmountMismatch`] when the amounts differ.
pub fn settle(
    status: OrderStatus,
    expected: &Amount,
    submitted: u64,
) -> Result<Settlement, PaymentError> {
    if matches!(status, OrderStatus::Cancelled | OrderStatus::Returned) {
        return Err(PaymentError::OrderClosed(status));
    }

    let expected = expected.to_minor_units();

    if u64::try_from(expected).ok() != Some(submitted) {
        return Err(PaymentError::AmountMismatch {
            expected,
            submitted,
        });
    }

    Ok(Settlement {
        payment_status: PaymentStatus::Completed,
        order_status: (status == OrderStatus::Placed).then_some(OrderStatus::Confirmed),
    })
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ParsePaymentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == value)
            .ok_or_else(|| ParsePaymentError(value.to_string()))
    }
}

impl FromStr for PaymentStatus {
    type Err = ParsePaymentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParsePaymentError(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::Money;
    use testresult::TestResult;

    use crate::pricing::CURRENCY;

    use super::*;

    #[test]
    fn upi_requires_an_id() {
        assert_eq!(
            PaymentMethod::Upi.validate(None),
            Err(PaymentError::MissingUpiId)
        );
        assert_eq!(
            PaymentMethod::Upi.validate(Some("  ")),
            Err(PaymentError::MissingUpiId)
        );
        assert_eq!(PaymentMethod::Upi.validate(Some("farmer@upi")), Ok(()));
    }

    #[test]
    fn other_methods_need_nothing() {
        for method in [
            PaymentMethod::Cod,
            PaymentMethod::Razorpay,
            PaymentMethod::BankTransfer,
        ] {
            assert_eq!(method.validate(None), Ok(()));
        }
    }

    #[test]
    fn exact_payment_confirms_placed_order() -> TestResult {
        let total = Money::from_minor(260_00, CURRENCY);

        let settlement = settle(OrderStatus::Placed, &total, 260_00)?;

        assert_eq!(settlement.payment_status, PaymentStatus::Completed);
        assert_eq!(settlement.order_status, Some(OrderStatus::Confirmed));

        Ok(())
    }

    #[test]
    fn payment_leaves_later_statuses_alone() -> TestResult {
        let total = Money::from_minor(260_00, CURRENCY);

        let settlement = settle(OrderStatus::Processing, &total, 260_00)?;

        assert_eq!(settlement.order_status, None);

        Ok(())
    }

    #[test]
    fn mismatched_amount_is_rejected() {
        let total = Money::from_minor(260_00, CURRENCY);

        assert_eq!(
            settle(OrderStatus::Placed, &total, 259_99),
            Err(PaymentError::AmountMismatch {
                expected: 260_00,
                submitted: 259_99,
            })
        );
    }

    #[test]
    fn amount_beyond_any_total_is_a_mismatch() {
        let total = Money::from_minor(260_00, CURRENCY);

        assert_eq!(
            settle(OrderStatus::Placed, &total, u64::MAX),
            Err(PaymentError::AmountMismatch {
                expected: 260_00,
                submitted: u64::MAX,
            })
        );
    }

    #[test]
    fn closed_orders_take_no_payment() {
        let total = Money::from_minor(100, CURRENCY);

        assert_eq!(
            settle(OrderStatus::Cancelled, &total, 100),
            Err(PaymentError::OrderClosed(OrderStatus::Cancelled))
        );
    }

    #[test]
    fn cancellation_refunds_only_completed_payments() {
        assert_eq!(
            PaymentStatus::Completed.after_cancellation(),
            PaymentStatus::Refunded
        );
        assert_eq!(
            PaymentStatus::Pending.after_cancellation(),
            PaymentStatus::Pending
        );
    }

    #[test]
    fn cash_on_delivery_completes_on_delivery() {
        assert_eq!(
            PaymentStatus::Pending.after_delivery(PaymentMethod::Cod),
            PaymentStatus::Completed
        );
        assert_eq!(
            PaymentStatus::Pending.after_delivery(PaymentMethod::Upi),
            PaymentStatus::Pending
        );
    }
}
