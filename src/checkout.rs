//! Checkout
//!
//! Splits a priced cart into one draft order per seller. Persisting the drafts and
//! reserving stock is the caller's job.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    charges::{ChargePolicy, OrderSummary},
    pricing::{Amount, PricingError, line_total, subtotal},
};

/// Lines most sellers have in one order.
const INLINE_LINES: usize = 8;

/// Why a cart cannot be checked out.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// Line or summary arithmetic failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A cart line with the price it is bought at.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutLine<S, P> {
    /// Seller of the product.
    pub seller: S,

    /// Product being bought.
    pub product: P,

    /// Product title at checkout.
    pub title: String,

    /// Final unit price at checkout.
    pub unit_price: Amount,

    /// Units bought.
    pub quantity: u32,
}

impl<S, P> CheckoutLine<S, P> {
    /// Unit price times quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit.
    pub fn line_total(&self) -> Result<Amount, PricingError> {
        line_total(self.unit_price, self.quantity)
    }
}

/// Line snapshot kept on an order.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftItem<P> {
    /// Product bought.
    pub product: P,

    /// Title at checkout.
    pub title: String,

    /// Unit price at checkout.
    pub unit_price: Amount,

    /// Units bought.
    pub quantity: u32,

    /// Unit price times quantity.
    pub line_total: Amount,
}

/// One seller's share of a checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct SellerOrderDraft<S, P> {
    /// Seller the order goes to.
    pub seller: S,

    /// That seller's lines only.
    pub items: SmallVec<[DraftItem<P>; INLINE_LINES]>,

    /// Charges on those lines.
    pub summary: OrderSummary,
}

/// Group checkout lines by seller and price each group.
///
/// Drafts come out ordered by seller; lines keep their cart order within a seller.
///
/// # Errors
///
/// - [`CheckoutError::EmptyCart`] when there are no lines.
/// - [`CheckoutError::Pricing`] when line or summary arithmetic fails.
pub fn split_by_seller<S, P, I>(
    lines: I,
    policy: &ChargePolicy,
) -> Result<Vec<SellerOrderDraft<S, P>>, CheckoutError>
where
    S: Ord,
    I: IntoIterator<Item = CheckoutLine<S, P>>,
{
    let mut groups: BTreeMap<S, SmallVec<[DraftItem<P>; INLINE_LINES]>> = BTreeMap::new();

    for line in lines {
        let line_total = line.line_total()?;

        groups.entry(line.seller).or_default().push(DraftItem {
            product: line.product,
            title: line.title,
            unit_price: line.unit_price,
            quantity: line.quantity,
            line_total,
        });
    }

    if groups.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    groups
        .into_iter()
        .map(|(seller, items)| {
            let summary = policy.summarise(subtotal(items.iter().map(|item| item.line_total))?)?;

            Ok(SellerOrderDraft {
                seller,
                items,
                summary,
            })
        })
        .collect()
}
