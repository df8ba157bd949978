//! delivery-server - food delivery backend
//!
//! # Modules
//!
//! - [`api`] - HTTP routes and handlers
//! - [`services`] - order placement and lifecycle
//! - [`db`] - PostgreSQL queries
//! - [`config`] - environment configuration
//! - [`logger`] - tracing setup

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod seed;
pub mod services;
pub mod state;
pub mod utils;

pub use config::Config;
pub use error::{BoxError, ServiceError, ServiceResult};
pub use state::AppState;
