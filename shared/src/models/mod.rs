//! Data models
//!
//! Shared between the order server and its HTTP clients.
//! All IDs are `i64` snowflakes, timestamps are Unix milliseconds.

pub mod catalog;
pub mod category;
pub mod dining_table;
pub mod menu_item;
pub mod special_dish;

// Re-exports
pub use catalog::*;
pub use category::*;
pub use dining_table::*;
pub use menu_item::*;
pub use special_dish::*;
