//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check and service banner
//! - [`auth`] - login and profile
//! - [`products`] - product catalog
//! - [`categories`] - category management
//! - [`customers`] - customer directory
//! - [`orders`] - order lifecycle
//! - [`invoices`] - invoicing
//! - [`suppliers`] - supplier directory
//! - [`stock_movements`] - manual stock adjustments
//! - [`reports`] - dashboard, sales and inventory reports
//! - [`settings`] - shop settings singleton

pub mod auth;
pub mod health;

// Resource APIs
pub mod categories;
pub mod customers;
pub mod invoices;
pub mod orders;
pub mod products;
pub mod reports;
pub mod settings;
pub mod stock_movements;
pub mod suppliers;
