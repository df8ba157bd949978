//! Shared types for the delivery platform
//!
//! Domain models, the order status state machine, the unified error system,
//! and small time/ID utilities used by the server and its tests.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
