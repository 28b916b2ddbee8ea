//! Status History Repository

use agrimart::orders::OrderStatus;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    domain::{
        orders::records::{OrderUuid, StatusHistoryRecord, StatusHistoryUuid},
        users::records::UserUuid,
    },
    uuids::to_uuids,
};

use super::decode_parsed;

const CREATE_STATUS_HISTORY_SQL: &str = include_str!("../sql/create_status_history.sql");
const LIST_STATUS_HISTORY_SQL: &str = include_str!("../sql/list_status_history.sql");

/// A history entry tagged with the order it belongs to.
#[derive(Debug, Clone)]
pub(crate) struct StatusHistoryRow {
    pub order_uuid: OrderUuid,
    pub entry: StatusHistoryRecord,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgStatusHistoryRepository;

impl PgStatusHistoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn append(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        note: Option<&str>,
        actor: UserUuid,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_STATUS_HISTORY_SQL)
            .bind(StatusHistoryUuid::new().into_uuid())
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(note)
            .bind(actor.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Entries for every given order, oldest first.
    pub(crate) async fn list(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<StatusHistoryRow>, sqlx::Error> {
        query_as::<Postgres, StatusHistoryRow>(LIST_STATUS_HISTORY_SQL)
            .bind(to_uuids(orders.iter().copied()))
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for StatusHistoryRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            entry: StatusHistoryRecord {
                uuid: StatusHistoryUuid::from_uuid(row.try_get("uuid")?),
                status: decode_parsed("status", row.try_get("status")?)?,
                note: row.try_get("note")?,
                actor_uuid: UserUuid::from_uuid(row.try_get("actor_uuid")?),
                created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            },
        })
    }
}
