//! Test helpers.

use std::sync::Arc;

use agrimart::orders::{OrderStatus, PaymentMethod, PaymentStatus};
use agrimart_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartItemUuid, CartRecord, CartUuid},
        },
        charges::ChargesRecord,
        orders::{
            MockOrdersService,
            data::DeliveryAddress,
            records::{
                OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid, PaymentRecord,
                StatusHistoryRecord, StatusHistoryUuid,
            },
        },
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        users::{MockUsersService, records::UserUuid},
    },
};
use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_users_mock() -> MockUsersService {
    let mut users = MockUsersService::new();

    users.expect_create_user().never();
    users.expect_get_user().never();

    users
}

fn strict_products_mock() -> MockProductsService {
    let mut products = MockProductsService::new();

    products.expect_list_products().never();
    products.expect_get_product().never();
    products.expect_create_product().never();
    products.expect_update_product().never();
    products.expect_delete_product().never();

    products
}

fn strict_carts_mock() -> MockCartsService {
    let mut carts = MockCartsService::new();

    carts.expect_get_cart().never();
    carts.expect_add_item().never();
    carts.expect_update_item().never();
    carts.expect_remove_item().never();
    carts.expect_clear_cart().never();

    carts
}

fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_checkout().never();
    orders.expect_list_orders().never();
    orders.expect_get_order().never();
    orders.expect_update_status().never();
    orders.expect_process_payment().never();
    orders.expect_cancel_order().never();

    orders
}

fn strict_app() -> AppContext {
    AppContext {
        users: Arc::new(strict_users_mock()),
        products: Arc::new(strict_products_mock()),
        carts: Arc::new(strict_carts_mock()),
        orders: Arc::new(strict_orders_mock()),
        auth: Arc::new(strict_auth_mock()),
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    State::from_app_context(AppContext {
        auth: Arc::new(auth),
        ..strict_app()
    })
}

pub(crate) fn state_with_products(products: MockProductsService) -> Arc<State> {
    State::from_app_context(AppContext {
        products: Arc::new(products),
        ..strict_app()
    })
}

pub(crate) fn state_with_carts(carts: MockCartsService) -> Arc<State> {
    State::from_app_context(AppContext {
        carts: Arc::new(carts),
        ..strict_app()
    })
}

pub(crate) fn state_with_orders(orders: MockOrdersService) -> Arc<State> {
    State::from_app_context(AppContext {
        orders: Arc::new(orders),
        ..strict_app()
    })
}

fn authenticated_service(state: Arc<State>, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_user)
            .push(route),
    )
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    authenticated_service(state_with_products(products), route)
}

pub(crate) fn carts_service(carts: MockCartsService, route: Router) -> Service {
    authenticated_service(state_with_carts(carts), route)
}

pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    authenticated_service(state_with_orders(orders), route)
}

pub(crate) fn make_product(uuid: ProductUuid, seller: UserUuid) -> ProductRecord {
    ProductRecord {
        uuid,
        seller_uuid: seller,
        title: "Basmati rice".to_string(),
        price: 100_00,
        discount: None,
        stock: 2,
        active: true,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

fn scenario_charges() -> ChargesRecord {
    ChargesRecord {
        subtotal: 200_00,
        delivery_charge: 50_00,
        tax: 10_00,
        total: 260_00,
    }
}

/// Two units of a 100 rupee product.
pub(crate) fn make_cart(user: UserUuid) -> CartRecord {
    CartRecord {
        uuid: CartUuid::new(),
        user_uuid: user,
        items: vec![CartItemRecord {
            uuid: CartItemUuid::new(),
            product_uuid: ProductUuid::new(),
            seller_uuid: UserUuid::new(),
            title: "Basmati rice".to_string(),
            quantity: 2,
            variant: None,
            unit_price: 100_00,
            line_total: 200_00,
            stock: 2,
            available: true,
            added_at: Timestamp::UNIX_EPOCH,
        }],
        summary: scenario_charges(),
        total_items: 2,
        total_amount: 200_00,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// A freshly placed cash-on-delivery order for the cart above.
pub(crate) fn make_order(buyer: UserUuid, seller: UserUuid) -> OrderRecord {
    OrderRecord {
        uuid: OrderUuid::new(),
        buyer_uuid: buyer,
        seller_uuid: seller,
        status: OrderStatus::Placed,
        items: vec![OrderItemRecord {
            uuid: OrderItemUuid::new(),
            product_uuid: ProductUuid::new(),
            title: "Basmati rice".to_string(),
            unit_price: 100_00,
            quantity: 2,
            line_total: 200_00,
        }],
        summary: scenario_charges(),
        delivery_address: DeliveryAddress {
            name: "Asha Patil".to_string(),
            phone: "9876543210".to_string(),
            street: "12 Market Road".to_string(),
            city: "Nashik".to_string(),
            state: "Maharashtra".to_string(),
            pincode: "422001".to_string(),
        },
        payment: PaymentRecord {
            method: PaymentMethod::Cod,
            status: PaymentStatus::Pending,
            upi_id: None,
            transaction_id: None,
            paid_at: None,
        },
        history: vec![StatusHistoryRecord {
            uuid: StatusHistoryUuid::new(),
            status: OrderStatus::Placed,
            note: None,
            actor_uuid: buyer,
            created_at: Timestamp::UNIX_EPOCH,
        }],
        notes: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}
