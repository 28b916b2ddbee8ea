//! Shared fixtures for service-level integration tests.

mod db;
pub mod helpers;

pub use context::TestContext;
