//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    charges::{decode_u64, encode_i64},
    products::{
        data::{NewProduct, ProductUpdate},
        records::{ProductDiscountRecord, ProductRecord, ProductUuid},
    },
    users::records::UserUuid,
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const GET_AVAILABLE_PRODUCT_SQL: &str = include_str!("sql/get_available_product.sql");
const LOCK_PRODUCT_SQL: &str = include_str!("sql/lock_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");
const RESERVE_STOCK_SQL: &str = include_str!("sql/reserve_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Active, non-deleted product, if any.
    pub(crate) async fn find_available_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(GET_AVAILABLE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch a product and hold its row lock until the transaction ends.
    pub(crate) async fn lock_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(LOCK_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        let (discount_percent, discount_expires_at) = discount_columns(product.discount);

        query_as::<Postgres, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.seller_uuid.into_uuid())
            .bind(product.title)
            .bind(encode_i64("price", product.price)?)
            .bind(discount_percent)
            .bind(discount_expires_at)
            .bind(encode_i64("stock", product.stock)?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, sqlx::Error> {
        let (discount_percent, discount_expires_at) = discount_columns(update.discount);

        query_as::<Postgres, ProductRecord>(UPDATE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .bind(update.title)
            .bind(encode_i64("price", update.price)?)
            .bind(discount_percent)
            .bind(discount_expires_at)
            .bind(encode_i64("stock", update.stock)?)
            .bind(update.active)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(product.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Take `quantity` units off the shelf if that many are on hand.
    ///
    /// Returns `None` without changing anything when the product is unavailable or short.
    pub(crate) async fn reserve_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<Option<ProductRecord>, sqlx::Error> {
        query_as::<Postgres, ProductRecord>(RESERVE_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(i64::from(quantity))
            .fetch_optional(&mut **tx)
            .await
    }
}

fn discount_columns(
    discount: Option<ProductDiscountRecord>,
) -> (Option<i16>, Option<SqlxTimestamp>) {
    discount.map_or((None, None), |discount| {
        (
            Some(i16::from(discount.percent)),
            Some(SqlxTimestamp::from(discount.expires_at)),
        )
    })
}

/// Read the nullable discount column pair.
pub(crate) fn decode_discount(row: &PgRow) -> sqlx::Result<Option<ProductDiscountRecord>> {
    let percent: Option<i16> = row.try_get("discount_percent")?;
    let expires_at: Option<SqlxTimestamp> = row.try_get("discount_expires_at")?;

    let (Some(percent), Some(expires_at)) = (percent, expires_at) else {
        return Ok(None);
    };

    Ok(Some(ProductDiscountRecord {
        percent: u8::try_from(percent).map_err(|e| sqlx::Error::ColumnDecode {
            index: "discount_percent".to_string(),
            source: Box::new(e),
        })?,
        expires_at: expires_at.to_jiff(),
    }))
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            seller_uuid: UserUuid::from_uuid(row.try_get("seller_uuid")?),
            title: row.try_get("title")?,
            price: decode_u64("price", row.try_get("price")?)?,
            discount: decode_discount(row)?,
            stock: decode_u64("stock", row.try_get("stock")?)?,
            active: row.try_get("active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
