//! Carts service.

use agrimart::{
    charges::ChargePolicy,
    pricing::{line_total, minor_units, subtotal},
    stock::{ensure_available, merged_quantity},
};
use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        carts::{
            data::NewCartItem,
            errors::CartsServiceError,
            records::{CartItemRecord, CartRecord},
            repositories::{CartLine, CartRow, PgCartItemsRepository, PgCartsRepository},
        },
        charges::ChargesRecord,
        products::{
            records::{ProductUuid, price_at},
            repository::PgProductsRepository,
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    policy: ChargePolicy,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db, policy: ChargePolicy) -> Self {
        Self {
            db,
            policy,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    /// Price the cart's lines, refresh its cached counters and build the record.
    async fn refresh(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &CartRow,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError> {
        let lines = self.items_repository.list_items(tx, cart.uuid).await?;

        let mut items = Vec::with_capacity(lines.len());
        let mut totals = Vec::with_capacity(lines.len());
        let mut total_items = 0_u64;

        for line in lines {
            let unit_price = price_at(line.price, line.discount, point_in_time)?;
            let total = line_total(unit_price, line.quantity)?;

            if line.available {
                total_items += u64::from(line.quantity);
                totals.push(total);
            }

            items.push(priced_item(line, minor_units(&unit_price)?, minor_units(&total)?));
        }

        let summary = self.policy.summarise(subtotal(totals)?)?;
        let summary = ChargesRecord::try_from(&summary)?;

        let cart = self
            .carts_repository
            .update_totals(tx, cart.uuid, total_items, summary.subtotal)
            .await?;

        Ok(CartRecord {
            uuid: cart.uuid,
            user_uuid: cart.user_uuid,
            items,
            summary,
            total_items: cart.total_items,
            total_amount: cart.total_amount,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        })
    }
}

fn priced_item(line: CartLine, unit_price: u64, line_total: u64) -> CartItemRecord {
    CartItemRecord {
        uuid: line.uuid,
        product_uuid: line.product_uuid,
        seller_uuid: line.seller_uuid,
        title: line.title,
        quantity: line.quantity,
        variant: line.variant,
        unit_price,
        line_total,
        stock: line.stock,
        available: line.available,
        added_at: line.added_at,
    }
}

/// Quantities are stored as `INTEGER`.
fn storable(quantity: u32) -> Result<i32, CartsServiceError> {
    i32::try_from(quantity)
        .map_err(|_overflow| CartsServiceError::InvalidInput("quantity is too large".to_string()))
}

fn normalise_variant(variant: Option<String>) -> Option<String> {
    variant
        .map(|variant| variant.trim().to_string())
        .filter(|variant| !variant.is_empty())
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(
        &self,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.ensure_cart(&mut tx, user).await?;
        let cart = self.refresh(&mut tx, &cart, point_in_time).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.ensure_cart(&mut tx, user).await?;

        let product = self
            .products_repository
            .find_available_product(&mut tx, item.product_uuid)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        if product.seller_uuid == user {
            return Err(CartsServiceError::SelfTradeForbidden);
        }

        let existing = self
            .items_repository
            .get_quantity(&mut tx, cart.uuid, product.uuid)
            .await?;

        let quantity = merged_quantity(existing, item.quantity)?;

        ensure_available(quantity, product.stock)?;

        self.items_repository
            .upsert_item(
                &mut tx,
                cart.uuid,
                product.uuid,
                storable(quantity)?,
                normalise_variant(item.variant),
            )
            .await?;

        let cart = self.refresh(&mut tx, &cart, point_in_time).await?;

        tx.commit().await?;

        debug!(cart = %cart.uuid, product = %product.uuid, quantity, "cart item added");

        Ok(cart)
    }

    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.ensure_cart(&mut tx, user).await?;

        if quantity == 0 {
            let rows_affected = self
                .items_repository
                .delete_item(&mut tx, cart.uuid, product)
                .await?;

            if rows_affected == 0 {
                return Err(CartsServiceError::NotFound);
            }
        } else {
            let available = self
                .products_repository
                .find_available_product(&mut tx, product)
                .await?
                .ok_or(CartsServiceError::NotFound)?;

            ensure_available(quantity, available.stock)?;

            let rows_affected = self
                .items_repository
                .update_quantity(&mut tx, cart.uuid, product, storable(quantity)?)
                .await?;

            if rows_affected == 0 {
                return Err(CartsServiceError::NotFound);
            }
        }

        let cart = self.refresh(&mut tx, &cart, point_in_time).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.ensure_cart(&mut tx, user).await?;

        self.items_repository
            .delete_item(&mut tx, cart.uuid, product)
            .await?;

        let cart = self.refresh(&mut tx, &cart, point_in_time).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn clear_cart(
        &self,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.carts_repository.ensure_cart(&mut tx, user).await?;

        self.items_repository.clear_items(&mut tx, cart.uuid).await?;

        let cart = self.refresh(&mut tx, &cart, point_in_time).await?;

        tx.commit().await?;

        Ok(cart)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the user's cart, creating it on first access.
    async fn get_cart(
        &self,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Add a product to the cart, or increment its line.
    async fn add_item(
        &self,
        user: UserUuid,
        item: NewCartItem,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Set a line's quantity; zero removes the line.
    async fn update_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        quantity: u32,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove a product's line if present.
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Remove every line and zero the counters.
    async fn clear_cart(
        &self,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError>;
}
