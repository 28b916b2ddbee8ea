//! Orders Repository

use agrimart::orders::{Actor, OrderStatus, PaymentMethod, PaymentStatus};
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    domain::{
        charges::{ChargesRecord, decode_u64, encode_i64},
        orders::{
            data::{DeliveryAddress, OrdersQuery},
            records::{OrderRecord, OrderUuid, PaymentRecord},
        },
        users::records::UserUuid,
    },
    uuids::to_uuids,
};

use super::decode_parsed;

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const GET_ORDERS_SQL: &str = include_str!("../sql/get_orders.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("../sql/count_orders.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("../sql/update_order_status.sql");
const RECORD_PAYMENT_SQL: &str = include_str!("../sql/record_payment.sql");

/// Columns written when a checkout creates an order.
#[derive(Debug)]
pub(crate) struct NewOrderRow<'a> {
    pub uuid: OrderUuid,
    pub buyer_uuid: UserUuid,
    pub seller_uuid: UserUuid,
    pub summary: ChargesRecord,
    pub delivery_address: &'a DeliveryAddress,
    pub payment_method: PaymentMethod,
    pub upi_id: Option<&'a str>,
    pub notes: Option<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrderRow<'_>,
    ) -> Result<(), sqlx::Error> {
        let address = order.delivery_address;

        query(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.buyer_uuid.into_uuid())
            .bind(order.seller_uuid.into_uuid())
            .bind(encode_i64("subtotal", order.summary.subtotal)?)
            .bind(encode_i64("delivery_charge", order.summary.delivery_charge)?)
            .bind(encode_i64("tax", order.summary.tax)?)
            .bind(encode_i64("total_amount", order.summary.total)?)
            .bind(address.name.as_str())
            .bind(address.phone.as_str())
            .bind(address.street.as_str())
            .bind(address.city.as_str())
            .bind(address.state.as_str())
            .bind(address.pincode.as_str())
            .bind(order.payment_method.as_str())
            .bind(order.upi_id)
            .bind(order.notes)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Order without items or history.
    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Orders in the order the uuids were given.
    pub(crate) async fn get_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDERS_SQL)
            .bind(to_uuids(orders.iter().copied()))
            .fetch_all(&mut **tx)
            .await
    }

    /// Fetch an order and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// One page of the user's orders, newest first.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        orders: &OrdersQuery,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(role_name(orders.role))
            .bind(orders.status.map(OrderStatus::as_str))
            .bind(i64::from(orders.limit))
            .bind(encode_i64("offset", orders.offset())?)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        orders: &OrdersQuery,
    ) -> Result<u64, sqlx::Error> {
        let count = query_scalar::<Postgres, i64>(COUNT_ORDERS_SQL)
            .bind(user.into_uuid())
            .bind(role_name(orders.role))
            .bind(orders.status.map(OrderStatus::as_str))
            .fetch_one(&mut **tx)
            .await?;

        decode_u64("count", count)
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        payment_status: PaymentStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(payment_status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Mark the order paid. Returns the payment time.
    pub(crate) async fn record_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        payment_status: PaymentStatus,
        transaction_id: Option<&str>,
    ) -> Result<Timestamp, sqlx::Error> {
        let paid_at = query_scalar::<Postgres, SqlxTimestamp>(RECORD_PAYMENT_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(payment_status.as_str())
            .bind(transaction_id)
            .fetch_one(&mut **tx)
            .await?;

        Ok(paid_at.to_jiff())
    }
}

fn role_name(role: Actor) -> &'static str {
    match role {
        Actor::Buyer => "buyer",
        Actor::Seller => "seller",
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            buyer_uuid: UserUuid::from_uuid(row.try_get("buyer_uuid")?),
            seller_uuid: UserUuid::from_uuid(row.try_get("seller_uuid")?),
            status: decode_parsed("status", row.try_get("status")?)?,
            items: Vec::new(),
            summary: ChargesRecord {
                subtotal: decode_u64("subtotal", row.try_get("subtotal")?)?,
                delivery_charge: decode_u64("delivery_charge", row.try_get("delivery_charge")?)?,
                tax: decode_u64("tax", row.try_get("tax")?)?,
                total: decode_u64("total_amount", row.try_get("total_amount")?)?,
            },
            delivery_address: DeliveryAddress {
                name: row.try_get("delivery_name")?,
                phone: row.try_get("delivery_phone")?,
                street: row.try_get("delivery_street")?,
                city: row.try_get("delivery_city")?,
                state: row.try_get("delivery_state")?,
                pincode: row.try_get("delivery_pincode")?,
            },
            payment: PaymentRecord {
                method: decode_parsed("payment_method", row.try_get("payment_method")?)?,
                status: decode_parsed("payment_status", row.try_get("payment_status")?)?,
                upi_id: row.try_get("upi_id")?,
                transaction_id: row.try_get("transaction_id")?,
                paid_at: row
                    .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                    .map(SqlxTimestamp::to_jiff),
            },
            history: Vec::new(),
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
