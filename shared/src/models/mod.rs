//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL). Money is `Decimal`, sent as a JSON number.

pub mod customer;
pub mod order;
pub mod product;
pub mod report;
pub mod restaurant;

// Re-exports
pub use customer::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use restaurant::*;
