//! Order engine
//!
//! - [`aggregation`] derives an order's status from its items
//! - [`priority`] derives kitchen wait time and priority
//! - [`lifecycle`] holds the explicit state machine
//! - [`manager`] runs every mutating operation in one redb transaction and
//!   broadcasts [`shared::order::OrderEvent`]s after commit

pub mod aggregation;
pub mod lifecycle;
pub mod manager;
pub mod money;
pub mod priority;
pub mod storage;

pub use manager::{ManagerError, ManagerResult, OrderFilter, OrdersManager};
pub use storage::OrderStorage;
