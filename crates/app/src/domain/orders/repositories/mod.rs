//! Orders Repositories

mod history;
mod items;
mod orders;

use std::{error::Error, str::FromStr};

pub(crate) use history::PgStatusHistoryRepository;
pub(crate) use items::PgOrderItemsRepository;
pub(crate) use orders::{NewOrderRow, PgOrdersRepository};

/// Parse a `TEXT` enum column.
fn decode_parsed<T>(column: &str, value: &str) -> sqlx::Result<T>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
{
    value.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
