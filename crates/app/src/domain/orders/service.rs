//! Orders service.
//!
//! Checkout turns a cart into one order per seller inside a single transaction: stock is
//! reserved line by line, and any failure rolls back every reservation and order.

use std::collections::HashMap;

use agrimart::{
    charges::ChargePolicy,
    checkout::{CheckoutLine, split_by_seller},
    orders::{OrderStatus, PaymentMethod, settle},
    pricing::amount_from_minor,
};
use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::{
        carts::repositories::{PgCartItemsRepository, PgCartsRepository},
        charges::ChargesRecord,
        orders::{
            data::{NewCheckout, NewPayment, OrdersQuery, StatusChange},
            errors::OrdersServiceError,
            records::{OrderPage, OrderRecord, OrderUuid, PaymentReceipt},
            repositories::{
                NewOrderRow, PgOrderItemsRepository, PgOrdersRepository,
                PgStatusHistoryRepository,
            },
        },
        products::{records::ProductUuid, repository::PgProductsRepository},
        users::records::UserUuid,
    },
};

const PLACED_NOTE: &str = "Order placed";
const PAID_NOTE: &str = "Payment received";

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    policy: ChargePolicy,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    history_repository: PgStatusHistoryRepository,
    carts_repository: PgCartsRepository,
    cart_items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, policy: ChargePolicy) -> Self {
        Self {
            db,
            policy,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            history_repository: PgStatusHistoryRepository::new(),
            carts_repository: PgCartsRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    /// Attach items and status history to bare order rows.
    async fn hydrate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut orders: Vec<OrderRecord>,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        if orders.is_empty() {
            return Ok(orders);
        }

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let mut items: HashMap<OrderUuid, Vec<_>> = HashMap::new();
        for row in self.items_repository.list_items(tx, &uuids).await? {
            items.entry(row.order_uuid).or_default().push(row.item);
        }

        let mut history: HashMap<OrderUuid, Vec<_>> = HashMap::new();
        for row in self.history_repository.list(tx, &uuids).await? {
            history.entry(row.order_uuid).or_default().push(row.entry);
        }

        for order in &mut orders {
            order.items = items.remove(&order.uuid).unwrap_or_default();
            order.history = history.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    async fn hydrate_one(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let order = self.orders_repository.get_order(tx, order).await?;

        self.hydrate(tx, vec![order])
            .await?
            .pop()
            .ok_or(OrdersServiceError::NotFound)
    }

    /// Explain why a stock reservation matched no row.
    async fn reservation_failure(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u32,
    ) -> OrdersServiceError {
        match self
            .products_repository
            .find_available_product(tx, product)
            .await
        {
            Ok(Some(listed)) => OrdersServiceError::InsufficientStock {
                product,
                requested: u64::from(quantity),
                available: listed.stock,
            },
            Ok(None) => OrdersServiceError::NotFound,
            Err(error) => error.into(),
        }
    }
}

fn validate_checkout(checkout: &NewCheckout) -> Result<(), OrdersServiceError> {
    if let Some(field) = checkout.delivery_address.missing_field() {
        return Err(OrdersServiceError::InvalidInput(format!(
            "delivery address {field} is required"
        )));
    }

    checkout
        .payment_method
        .validate(checkout.upi_id.as_deref())?;

    Ok(())
}

fn trimmed(value: Option<&String>) -> Option<&str> {
    value.map(|value| value.trim()).filter(|value| !value.is_empty())
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn checkout(
        &self,
        buyer: UserUuid,
        checkout: NewCheckout,
        point_in_time: Timestamp,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        validate_checkout(&checkout)?;

        let mut tx = self.db.begin().await?;

        let cart = self
            .carts_repository
            .lock_cart(&mut tx, buyer)
            .await?
            .ok_or_else(|| OrdersServiceError::InvalidInput("cart is empty".to_string()))?;

        let mut lines = self.cart_items_repository.list_items(&mut tx, cart.uuid).await?;

        // Reserve in product order so concurrent checkouts lock rows in the same sequence.
        lines.sort_by_key(|line| line.product_uuid);

        let mut checkout_lines = Vec::with_capacity(lines.len());

        for line in lines {
            let Some(product) = self
                .products_repository
                .reserve_stock(&mut tx, line.product_uuid, line.quantity)
                .await?
            else {
                return Err(self
                    .reservation_failure(&mut tx, line.product_uuid, line.quantity)
                    .await);
            };

            if product.seller_uuid == buyer {
                return Err(OrdersServiceError::SelfTradeForbidden);
            }

            checkout_lines.push(CheckoutLine {
                seller: product.seller_uuid,
                product: product.uuid,
                unit_price: product.unit_price(point_in_time)?,
                title: product.title,
                quantity: line.quantity,
            });
        }

        let drafts = split_by_seller(checkout_lines, &self.policy)?;

        let upi_id = match checkout.payment_method {
            PaymentMethod::Upi => trimmed(checkout.upi_id.as_ref()),
            _ => None,
        };
        let notes = trimmed(checkout.notes.as_ref());

        let mut uuids = Vec::with_capacity(drafts.len());

        for draft in &drafts {
            let order = OrderUuid::new();

            self.orders_repository
                .create_order(
                    &mut tx,
                    NewOrderRow {
                        uuid: order,
                        buyer_uuid: buyer,
                        seller_uuid: draft.seller,
                        summary: ChargesRecord::try_from(&draft.summary)?,
                        delivery_address: &checkout.delivery_address,
                        payment_method: checkout.payment_method,
                        upi_id,
                        notes,
                    },
                )
                .await?;

            self.items_repository
                .create_items(&mut tx, order, &draft.items)
                .await?;

            self.history_repository
                .append(&mut tx, order, OrderStatus::Placed, Some(PLACED_NOTE), buyer)
                .await?;

            uuids.push(order);
        }

        self.cart_items_repository
            .clear_items(&mut tx, cart.uuid)
            .await?;
        self.carts_repository
            .update_totals(&mut tx, cart.uuid, 0, 0)
            .await?;

        let orders = self.orders_repository.get_orders(&mut tx, &uuids).await?;
        let orders = self.hydrate(&mut tx, orders).await?;

        tx.commit().await?;

        info!(buyer = %buyer, orders = orders.len(), "checkout completed");

        Ok(orders)
    }

    async fn list_orders(
        &self,
        user: UserUuid,
        query: OrdersQuery,
    ) -> Result<OrderPage, OrdersServiceError> {
        let query = query.normalised();

        let mut tx = self.db.begin().await?;

        let total = self
            .orders_repository
            .count_orders(&mut tx, user, &query)
            .await?;
        let orders = self
            .orders_repository
            .list_orders(&mut tx, user, &query)
            .await?;
        let orders = self.hydrate(&mut tx, orders).await?;

        tx.commit().await?;

        Ok(OrderPage {
            orders,
            page: query.page,
            limit: query.limit,
            total,
            pages: total.div_ceil(u64::from(query.limit)),
        })
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.hydrate_one(&mut tx, order).await?;

        tx.commit().await?;

        if order.actor(user).is_none() {
            return Err(OrdersServiceError::Forbidden);
        }

        Ok(order)
    }

    async fn update_status(
        &self,
        user: UserUuid,
        order: OrderUuid,
        change: StatusChange,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if change.status == OrderStatus::Cancelled {
            return self.cancel_order(user, order, change.note).await;
        }

        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;
        let actor = current.actor(user).ok_or(OrdersServiceError::Forbidden)?;
        let next = current.status.transition(change.status, actor)?;

        let payment_status = if next == OrderStatus::Delivered {
            current.payment.status.after_delivery(current.payment.method)
        } else {
            current.payment.status
        };

        self.orders_repository
            .update_status(&mut tx, order, next, payment_status)
            .await?;
        self.history_repository
            .append(&mut tx, order, next, trimmed(change.note.as_ref()), user)
            .await?;

        let updated = self.hydrate_one(&mut tx, order).await?;

        tx.commit().await?;

        info!(order = %order, from = %current.status, to = %next, "order status changed");

        Ok(updated)
    }

    async fn process_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
        payment: NewPayment,
    ) -> Result<PaymentReceipt, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;

        if current.buyer_uuid != user {
            return Err(OrdersServiceError::Forbidden);
        }

        let settlement = settle(
            current.status,
            &amount_from_minor(current.summary.total)?,
            payment.amount,
        )?;

        let order_status = settlement.order_status.unwrap_or(current.status);

        let paid_at = self
            .orders_repository
            .record_payment(
                &mut tx,
                order,
                order_status,
                settlement.payment_status,
                trimmed(payment.transaction_id.as_ref()),
            )
            .await?;

        if let Some(next) = settlement.order_status {
            self.history_repository
                .append(&mut tx, order, next, Some(PAID_NOTE), user)
                .await?;
        }

        tx.commit().await?;

        info!(order = %order, amount = payment.amount, status = %order_status, "payment recorded");

        Ok(PaymentReceipt {
            order_uuid: order,
            payment_status: settlement.payment_status,
            order_status,
            amount: payment.amount,
            paid_at: Some(paid_at),
        })
    }

    async fn cancel_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
        reason: Option<String>,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.orders_repository.lock_order(&mut tx, order).await?;
        let actor = current.actor(user).ok_or(OrdersServiceError::Forbidden)?;
        let next = current.status.transition(OrderStatus::Cancelled, actor)?;

        let restored = self.items_repository.restore_stock(&mut tx, order).await?;

        self.orders_repository
            .update_status(&mut tx, order, next, current.payment.status.after_cancellation())
            .await?;
        self.history_repository
            .append(&mut tx, order, next, trimmed(reason.as_ref()), user)
            .await?;

        let cancelled = self.hydrate_one(&mut tx, order).await?;

        tx.commit().await?;

        debug!(order = %order, products = restored, "stock restored");
        info!(order = %order, actor = %actor, "order cancelled");

        Ok(cancelled)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Turns the buyer's cart into one order per seller and empties the cart.
    ///
    /// All or nothing: if any line cannot be reserved, no order is created and no stock
    /// changes.
    async fn checkout(
        &self,
        buyer: UserUuid,
        checkout: NewCheckout,
        point_in_time: Timestamp,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Lists orders the user bought or sells, newest first.
    async fn list_orders(
        &self,
        user: UserUuid,
        query: OrdersQuery,
    ) -> Result<OrderPage, OrdersServiceError>;

    /// Retrieves an order visible to its buyer and seller only.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Moves an order along its lifecycle. Cancellation is routed to
    /// [`OrdersService::cancel_order`].
    async fn update_status(
        &self,
        user: UserUuid,
        order: OrderUuid,
        change: StatusChange,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Records the buyer's payment of the exact order total.
    async fn process_payment(
        &self,
        user: UserUuid,
        order: OrderUuid,
        payment: NewPayment,
    ) -> Result<PaymentReceipt, OrdersServiceError>;

    /// Cancels an order and returns its stock to the shelf.
    async fn cancel_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
        reason: Option<String>,
    ) -> Result<OrderRecord, OrdersServiceError>;
}
