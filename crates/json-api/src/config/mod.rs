//! Server configuration module

use clap::Parser;

use crate::config::{
    charges::ChargesConfig,
    db::DatabaseConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod charges;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod server;

/// Agrimart JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "agrimart-json", about = "Agrimart JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request logging and metrics settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Delivery and tax settings applied to carts and orders.
    #[command(flatten)]
    pub charges: ChargesConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_when_only_the_database_is_given() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "agrimart-json",
            "--database-url",
            "postgres://localhost/agrimart",
        ])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:8698");
        assert_eq!(config.charges.delivery_fee_minor, 50_00);
        assert_eq!(config.charges.free_delivery_threshold_minor, 500_00);
        assert_eq!(config.charges.tax_rate_percent, 5);
        assert_eq!(config.database.database_max_connections, 10);
        assert_eq!(
            config.server.shutdown_grace(),
            Some(std::time::Duration::from_secs(30))
        );

        Ok(())
    }

    #[test]
    fn zero_grace_waits_for_every_request() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "agrimart-json",
            "--database-url",
            "postgres://localhost/agrimart",
            "--shutdown-grace-seconds",
            "0",
        ])?;

        assert_eq!(config.server.shutdown_grace(), None);

        Ok(())
    }

    #[test]
    fn tax_rate_above_hundred_is_rejected() {
        let result = ServerConfig::try_parse_from([
            "agrimart-json",
            "--database-url",
            "postgres://localhost/agrimart",
            "--tax-rate-percent",
            "101",
        ]);

        assert!(result.is_err(), "expected tax rate to be rejected");
    }
}
