//! Per-test databases inside one shared PostgreSQL container.

use std::env;

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};
use tracing::warn;
use uuid::Uuid;

use crate::database::migrate;

const USER: &str = "agrimart_test";
const PASSWORD: &str = "agrimart_test_password";

static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

/// Names of databases waiting to be dropped.
static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name(USER)
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(name) = receiver.recv().await {
            if let Err(error) = drop_database(&name).await {
                warn!("failed to drop test database {name}: {error}");
            }
        }
    });

    sender
}

async fn database_url(name: &str) -> String {
    let container = POSTGRES_CONTAINER
        .get_or_init(init_postgres_container)
        .await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get container port");

    let host = env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".into());

    format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{name}")
}

async fn drop_database(name: &str) -> Result<(), sqlx::Error> {
    let mut conn = PgConnection::connect(&database_url("postgres").await).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{name}\" WITH (FORCE)"))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

/// A freshly migrated database, dropped in the background once this goes out of scope.
///
/// Services commit normally; isolation comes from each test owning its database.
#[derive(Debug, Clone)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub async fn new() -> Self {
        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        // Simple uuids are hex only, so the name needs no escaping.
        let name = format!("agrimart_test_{}", Uuid::now_v7().simple());

        let mut admin = PgConnection::connect(&database_url("postgres").await)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut admin)
            .await
            .expect("Failed to create test database");

        admin
            .close()
            .await
            .expect("Failed to close admin connection");

        let pool = PgPool::connect(&database_url(&name).await)
            .await
            .expect("Failed to create pool for database");

        migrate(&pool)
            .await
            .expect("Failed to run migrations on database");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_create_the_marketplace_tables() {
        let test_db = TestDb::new().await;

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::TEXT FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_name <> '_sqlx_migrations' \
             ORDER BY table_name",
        )
        .fetch_all(test_db.pool())
        .await
        .expect("Failed to list tables");

        for table in [
            "api_tokens",
            "cart_items",
            "carts",
            "order_items",
            "order_status_history",
            "orders",
            "products",
            "users",
        ] {
            assert!(
                tables.iter().any(|name| name == table),
                "missing table {table}, found {tables:?}"
            );
        }
    }

    #[tokio::test]
    async fn each_test_gets_its_own_database() {
        let first = TestDb::new().await;
        let second = TestDb::new().await;

        sqlx::query("CREATE TABLE scratch (id INTEGER)")
            .execute(first.pool())
            .await
            .expect("Failed to create table");

        let result = sqlx::query("SELECT COUNT(*) FROM scratch")
            .fetch_one(second.pool())
            .await;

        assert!(result.is_err(), "second database should not see the table");
    }
}
