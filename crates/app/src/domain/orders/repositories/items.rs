//! Order Items Repository

use agrimart::{
    checkout::DraftItem,
    pricing::{Amount, minor_units},
};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    domain::{
        charges::{decode_u32, decode_u64, encode_i64},
        orders::records::{OrderItemRecord, OrderItemUuid, OrderUuid},
        products::records::ProductUuid,
    },
    uuids::to_uuids,
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("../sql/list_order_items.sql");
const RESTORE_ORDER_STOCK_SQL: &str = include_str!("../sql/restore_order_stock.sql");

/// An item tagged with the order it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct OrderItemRow {
    pub order_uuid: OrderUuid,
    pub item: OrderItemRecord,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Snapshot the draft lines onto the order, keeping their order.
    pub(crate) async fn create_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[DraftItem<ProductUuid>],
    ) -> Result<(), sqlx::Error> {
        for (position, item) in items.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|e| sqlx::Error::Encode(format!("position: {e}").into()))?;
            let quantity = i32::try_from(item.quantity)
                .map_err(|e| sqlx::Error::Encode(format!("quantity: {e}").into()))?;

            query(CREATE_ORDER_ITEM_SQL)
                .bind(OrderItemUuid::new().into_uuid())
                .bind(order.into_uuid())
                .bind(position)
                .bind(item.product.into_uuid())
                .bind(item.title.as_str())
                .bind(encode_amount("unit_price", &item.unit_price)?)
                .bind(quantity)
                .bind(encode_amount("line_total", &item.line_total)?)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderItemRow>, sqlx::Error> {
        query_as::<Postgres, OrderItemRow>(LIST_ORDER_ITEMS_SQL)
            .bind(to_uuids(orders.iter().copied()))
            .fetch_all(&mut **tx)
            .await
    }

    /// Put every item of the order back on the shelf.
    pub(crate) async fn restore_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RESTORE_ORDER_STOCK_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn encode_amount(column: &str, amount: &Amount) -> sqlx::Result<i64> {
    let minor =
        minor_units(amount).map_err(|e| sqlx::Error::Encode(format!("{column}: {e}").into()))?;

    encode_i64(column, minor)
}

impl<'r> FromRow<'r, PgRow> for OrderItemRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderItemRecord {
                uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                title: row.try_get("title")?,
                unit_price: decode_u64("unit_price", row.try_get("unit_price")?)?,
                quantity: decode_u32("quantity", row.try_get("quantity")?)?,
                line_total: decode_u64("line_total", row.try_get("line_total")?)?,
            },
        })
    }
}
