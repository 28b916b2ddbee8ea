//! Order Data

use agrimart::orders::{Actor, OrderStatus, PaymentMethod};

/// Default page size for order listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Largest page size for order listings.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Where an order is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAddress {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl DeliveryAddress {
    /// Name of the first blank field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("street", &self.street),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// Checkout request for the buyer's whole cart.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCheckout {
    pub delivery_address: DeliveryAddress,
    pub payment_method: PaymentMethod,
    pub upi_id: Option<String>,
    pub notes: Option<String>,
}

/// Filters and paging for order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrdersQuery {
    /// List orders the user bought, or orders the user sells.
    pub role: Actor,
    pub status: Option<OrderStatus>,
    pub page: u32,
    pub limit: u32,
}

impl OrdersQuery {
    /// Query clamped to valid paging bounds.
    #[must_use]
    pub fn normalised(self) -> Self {
        Self {
            page: self.page.max(1),
            limit: self.limit.clamp(1, MAX_PAGE_LIMIT),
            ..self
        }
    }

    /// Rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for OrdersQuery {
    fn default() -> Self {
        Self {
            role: Actor::Buyer,
            status: None,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

/// Requested status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub note: Option<String>,
}

/// Payment submitted by the buyer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    /// Amount in minor units; must equal the order total.
    pub amount: u64,
    pub transaction_id: Option<String>,
}
