//! Cart Items Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::{
    carts::records::{CartItemUuid, CartUuid},
    charges::{decode_u32, decode_u64},
    products::{
        records::{ProductDiscountRecord, ProductUuid},
        repository::decode_discount,
    },
    users::records::UserUuid,
};

const LIST_CART_ITEMS_SQL: &str = include_str!("../sql/list_cart_items.sql");
const GET_CART_ITEM_QUANTITY_SQL: &str = include_str!("../sql/get_cart_item_quantity.sql");
const UPSERT_CART_ITEM_SQL: &str = include_str!("../sql/upsert_cart_item.sql");
const UPDATE_CART_ITEM_SQL: &str = include_str!("../sql/update_cart_item.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");
const CLEAR_CART_ITEMS_SQL: &str = include_str!("../sql/clear_cart_items.sql");

/// A cart line joined with the product's current listing.
#[derive(Debug, Clone)]
pub(crate) struct CartLine {
    pub uuid: CartItemUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub variant: Option<String>,
    pub added_at: Timestamp,
    pub seller_uuid: UserUuid,
    pub title: String,
    pub price: u64,
    pub discount: Option<ProductDiscountRecord>,
    pub stock: u64,
    pub available: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartLine>, sqlx::Error> {
        query_as::<Postgres, CartLine>(LIST_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Quantity already in the cart for a product.
    pub(crate) async fn get_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<Option<u32>, sqlx::Error> {
        let quantity = query_scalar::<Postgres, i32>(GET_CART_ITEM_QUANTITY_SQL)
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        quantity
            .map(|quantity| decode_u32("quantity", quantity))
            .transpose()
    }

    pub(crate) async fn upsert_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
        quantity: i32,
        variant: Option<String>,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_CART_ITEM_SQL)
            .bind(CartItemUuid::new().into_uuid())
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .bind(quantity)
            .bind(variant)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn update_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
        quantity: i32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_CART_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .bind(quantity)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn clear_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: decode_u32("quantity", row.try_get("quantity")?)?,
            variant: row.try_get("variant")?,
            added_at: row.try_get::<SqlxTimestamp, _>("added_at")?.to_jiff(),
            seller_uuid: UserUuid::from_uuid(row.try_get("seller_uuid")?),
            title: row.try_get("title")?,
            price: decode_u64("price", row.try_get("price")?)?,
            discount: decode_discount(row)?,
            stock: decode_u64("stock", row.try_get("stock")?)?,
            available: row.try_get("available")?,
        })
    }
}
