//! Order lifecycle
//!
//! Orders move through a fixed status graph. Every status change is checked
//! against [`OrderStatus::allowed_transitions`] before anything is written.

mod status;

pub use status::{InvalidTransition, OrderStatus};
