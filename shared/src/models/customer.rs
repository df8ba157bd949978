//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity
///
/// Customers are never removed. Deactivation clears `active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub name: String,
    /// Unique across all customers
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub active: bool,
    /// Registration time (Unix millis)
    pub registered_at: i64,
}

/// Register customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Update customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
