//! Order Records

use agrimart::orders::{Actor, OrderStatus, PaymentMethod, PaymentStatus};
use jiff::Timestamp;

use crate::{
    domain::{
        charges::ChargesRecord, orders::data::DeliveryAddress, products::records::ProductUuid,
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Status History UUID
pub type StatusHistoryUuid = TypedUuid<StatusHistoryRecord>;

/// Order Record
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub buyer_uuid: UserUuid,
    pub seller_uuid: UserUuid,
    pub status: OrderStatus,
    pub items: Vec<OrderItemRecord>,
    pub summary: ChargesRecord,
    pub delivery_address: DeliveryAddress,
    pub payment: PaymentRecord,
    pub history: Vec<StatusHistoryRecord>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderRecord {
    /// The role `user` plays on this order, if any.
    pub fn actor(&self, user: UserUuid) -> Option<Actor> {
        if user == self.seller_uuid {
            Some(Actor::Seller)
        } else if user == self.buyer_uuid {
            Some(Actor::Buyer)
        } else {
            None
        }
    }
}

/// Payment state of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub upi_id: Option<String>,
    pub transaction_id: Option<String>,
    pub paid_at: Option<Timestamp>,
}

/// Line snapshot taken at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub title: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub line_total: u64,
}

/// One entry of an order's append-only status log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusHistoryRecord {
    pub uuid: StatusHistoryUuid,
    pub status: OrderStatus,
    pub note: Option<String>,
    pub actor_uuid: UserUuid,
    pub created_at: Timestamp,
}

/// One page of an order listing.
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<OrderRecord>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

/// Outcome of a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    pub order_uuid: OrderUuid,
    pub payment_status: PaymentStatus,
    pub order_status: OrderStatus,
    pub amount: u64,
    pub paid_at: Option<Timestamp>,
}
