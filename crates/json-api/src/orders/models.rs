//! Order Models

use std::string::ToString;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use agrimart_app::domain::orders::{
    data::DeliveryAddress,
    records::{OrderItemRecord, OrderRecord, PaymentRecord, StatusHistoryRecord},
};

use crate::charges::ChargesResponse;

/// Delivery address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct DeliveryAddressPayload {
    pub name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl From<DeliveryAddressPayload> for DeliveryAddress {
    fn from(address: DeliveryAddressPayload) -> Self {
        DeliveryAddress {
            name: address.name,
            phone: address.phone,
            street: address.street,
            city: address.city,
            state: address.state,
            pincode: address.pincode,
        }
    }
}

impl From<DeliveryAddress> for DeliveryAddressPayload {
    fn from(address: DeliveryAddress) -> Self {
        DeliveryAddressPayload {
            name: address.name,
            phone: address.phone,
            street: address.street,
            city: address.city,
            state: address.state,
            pincode: address.pincode,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub buyer_uuid: Uuid,
    pub seller_uuid: Uuid,

    /// Current lifecycle status, e.g. `placed` or `ready_to_ship`
    pub status: String,

    /// Line snapshot taken at checkout
    pub items: Vec<OrderItemResponse>,

    pub summary: ChargesResponse,
    pub delivery_address: DeliveryAddressPayload,
    pub payment: PaymentResponse,

    /// Every status the order has been in, oldest first
    pub history: Vec<StatusHistoryResponse>,

    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            buyer_uuid: order.buyer_uuid.into(),
            seller_uuid: order.seller_uuid.into(),
            status: order.status.to_string(),
            items: order.items.into_iter().map(Into::into).collect(),
            summary: order.summary.into(),
            delivery_address: order.delivery_address.into(),
            payment: order.payment.into(),
            history: order.history.into_iter().map(Into::into).collect(),
            notes: order.notes,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub product_uuid: Uuid,
    pub title: String,

    /// Unit price in paise at checkout
    pub unit_price: u64,

    pub quantity: u32,
    pub line_total: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            title: item.title,
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total,
        }
    }
}

/// Payment Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentResponse {
    /// `cod`, `upi`, `razorpay` or `bank_transfer`
    pub method: String,

    /// `pending`, `completed`, `failed` or `refunded`
    pub status: String,

    pub upi_id: Option<String>,
    pub transaction_id: Option<String>,
    pub paid_at: Option<String>,
}

impl From<PaymentRecord> for PaymentResponse {
    fn from(payment: PaymentRecord) -> Self {
        PaymentResponse {
            method: payment.method.to_string(),
            status: payment.status.to_string(),
            upi_id: payment.upi_id,
            transaction_id: payment.transaction_id,
            paid_at: payment.paid_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Status History Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusHistoryResponse {
    pub status: String,
    pub note: Option<String>,

    /// The user who made the change
    pub actor_uuid: Uuid,

    pub created_at: String,
}

impl From<StatusHistoryRecord> for StatusHistoryResponse {
    fn from(entry: StatusHistoryRecord) -> Self {
        StatusHistoryResponse {
            status: entry.status.to_string(),
            note: entry.note,
            actor_uuid: entry.actor_uuid.into(),
            created_at: entry.created_at.to_string(),
        }
    }
}
