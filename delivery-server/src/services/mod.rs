//! Business workflows that span several tables

pub mod order;
