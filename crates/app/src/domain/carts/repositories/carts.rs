//! Carts Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    carts::records::CartUuid,
    charges::{decode_u64, encode_i64},
    users::records::UserUuid,
};

const ENSURE_CART_SQL: &str = include_str!("../sql/ensure_cart.sql");
const LOCK_CART_SQL: &str = include_str!("../sql/lock_cart.sql");
const UPDATE_CART_TOTALS_SQL: &str = include_str!("../sql/update_cart_totals.sql");

/// Stored cart row without its lines.
#[derive(Debug, Clone)]
pub(crate) struct CartRow {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub total_items: u64,
    pub total_amount: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Fetch the user's cart, creating it on first use. The row stays locked until the
    /// transaction ends.
    pub(crate) async fn ensure_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<CartRow, sqlx::Error> {
        query_as::<Postgres, CartRow>(ENSURE_CART_SQL)
            .bind(CartUuid::new().into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock an existing cart without creating one.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Option<CartRow>, sqlx::Error> {
        query_as::<Postgres, CartRow>(LOCK_CART_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn update_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        total_items: u64,
        total_amount: u64,
    ) -> Result<CartRow, sqlx::Error> {
        query_as::<Postgres, CartRow>(UPDATE_CART_TOTALS_SQL)
            .bind(cart.into_uuid())
            .bind(encode_i64("total_items", total_items)?)
            .bind(encode_i64("total_amount", total_amount)?)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CartRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            total_items: decode_u64("total_items", row.try_get("total_items")?)?,
            total_amount: decode_u64("total_amount", row.try_get("total_amount")?)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
