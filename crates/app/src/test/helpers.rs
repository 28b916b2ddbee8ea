//! Test Helpers

use agrimart::orders::PaymentMethod;
use jiff::Timestamp;

use crate::{
    domain::{
        carts::{CartsService, CartsServiceError, data::NewCartItem, records::CartRecord},
        orders::{
            OrdersService, OrdersServiceError,
            data::{DeliveryAddress, NewCheckout},
            records::OrderRecord,
        },
        products::{
            ProductsService, ProductsServiceError,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        users::records::UserUuid,
    },
    test::TestContext,
};

pub(crate) async fn create_product(
    ctx: &TestContext,
    seller: UserUuid,
    price: u64,
    stock: u64,
) -> Result<ProductRecord, ProductsServiceError> {
    ctx.products
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            seller_uuid: seller,
            title: "Basmati rice".to_string(),
            price,
            discount: None,
            stock,
        })
        .await
}

pub(crate) async fn add_item(
    ctx: &TestContext,
    user: UserUuid,
    product: ProductUuid,
    quantity: u32,
) -> Result<CartRecord, CartsServiceError> {
    ctx.carts
        .add_item(
            user,
            NewCartItem {
                product_uuid: product,
                quantity,
                variant: None,
            },
            Timestamp::now(),
        )
        .await
}

pub(crate) fn delivery_address() -> DeliveryAddress {
    DeliveryAddress {
        name: "Ravi Kumar".to_string(),
        phone: "9876543210".to_string(),
        street: "4 Market Yard".to_string(),
        city: "Pune".to_string(),
        state: "Maharashtra".to_string(),
        pincode: "411037".to_string(),
    }
}

pub(crate) async fn checkout(
    ctx: &TestContext,
    buyer: UserUuid,
    payment_method: PaymentMethod,
) -> Result<Vec<OrderRecord>, OrdersServiceError> {
    ctx.orders
        .checkout(
            buyer,
            NewCheckout {
                delivery_address: delivery_address(),
                payment_method,
                upi_id: None,
                notes: None,
            },
            Timestamp::now(),
        )
        .await
}
