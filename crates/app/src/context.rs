//! App Context

use std::sync::Arc;

use agrimart::charges::ChargePolicy;
use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        orders::{OrdersService, PgOrdersService},
        products::{PgProductsService, ProductsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrations(#[source] MigrateError),
}

/// Every service the API needs, behind trait objects so handlers can be tested with mocks.
#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub products: Arc<dyn ProductsService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Build application context from a database URL, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting or migrating fails.
    pub async fn from_database_url(
        url: &str,
        max_connections: u32,
        policy: ChargePolicy,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect_with(url, max_connections)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrations)?;

        let db = Db::new(pool.clone());

        Ok(Self {
            users: Arc::new(PgUsersService::new(pool.clone())),
            products: Arc::new(PgProductsService::new(db.clone())),
            carts: Arc::new(PgCartsService::new(db.clone(), policy)),
            orders: Arc::new(PgOrdersService::new(db, policy)),
            auth: Arc::new(PgAuthService::new(pool)),
        })
    }
}
