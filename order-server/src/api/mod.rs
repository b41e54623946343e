//! API routes
//!
//! - [`health`] - health checks
//! - [`orders`] - order lifecycle
//! - [`kitchen_orders`] - FIFO kitchen queue
//! - [`tables`] - dining tables, status history, closing a table
//! - [`categories`] - menu categories
//! - [`menu_items`] - regular menu
//! - [`specials`] - special dishes
//! - [`sync`] - catalog download for offline clients

pub mod health;

// Orders
pub mod kitchen_orders;
pub mod orders;

// Location
pub mod tables;

// Catalog
pub mod categories;
pub mod menu_items;
pub mod specials;
pub mod sync;

pub use crate::utils::AppResult;
