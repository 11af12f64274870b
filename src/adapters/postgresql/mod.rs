//! PostgreSQL database integration
//!
//! Reads clients, products and service orders from the business database.

pub mod client;
mod models;
pub mod store;

pub use client::PostgreSQLClient;
pub use store::PostgreSQLStore;
