//! Marketplace Domain Concerns

pub mod carts;
pub mod charges;
pub mod orders;
pub mod products;
pub mod users;
