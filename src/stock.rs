//! Stock checks for cart mutations.

use thiserror::Error;

/// Why a quantity cannot be placed in a cart.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StockError {
    /// Quantities start at one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// More was requested than the product has on hand.
    #[error("requested {requested}, only {available} available")]
    Insufficient {
        /// Quantity the cart line would hold.
        requested: u64,

        /// Stock on hand when checked.
        available: u64,
    },

    /// Quantity does not fit in a cart line.
    #[error("quantity overflowed")]
    Overflow,
}

/// Quantity a cart line would hold after adding `added` to an existing line.
///
/// # Errors
///
/// - [`StockError::ZeroQuantity`] when nothing is added.
/// - [`StockError::Overflow`] when the sum does not fit.
pub fn merged_quantity(existing: Option<u32>, added: u32) -> Result<u32, StockError> {
    if added == 0 {
        return Err(StockError::ZeroQuantity);
    }

    existing
        .unwrap_or_default()
        .checked_add(added)
        .ok_or(StockError::Overflow)
}

/// Check a line quantity against the stock on hand.
///
/// # Errors
///
/// Returns [`StockError::Insufficient`] when `requested` exceeds `available`.
pub fn ensure_available(requested: u32, available: u64) -> Result<(), StockError> {
    let requested = u64::from(requested);

    if requested > available {
        return Err(StockError::Insufficient {
            requested,
            available,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_line_takes_added_quantity() -> TestResult {
        assert_eq!(merged_quantity(None, 3)?, 3);

        Ok(())
    }

    #[test]
    fn existing_line_is_incremented() -> TestResult {
        assert_eq!(merged_quantity(Some(2), 3)?, 5);

        Ok(())
    }

    #[test]
    fn zero_is_rejected() {
        assert_eq!(merged_quantity(Some(2), 0), Err(StockError::ZeroQuantity));
    }

    #[test]
    fn overflow_is_rejected() {
        assert_eq!(merged_quantity(Some(u32::MAX), 1), Err(StockError::Overflow));
    }

    #[test]
    fn exact_stock_is_available() {
        assert_eq!(ensure_available(2, 2), Ok(()));
    }

    #[test]
    fn over_stock_is_insufficient() {
        assert_eq!(
            ensure_available(3, 2),
            Err(StockError::Insufficient {
                requested: 3,
                available: 2
            })
        );
    }
}
