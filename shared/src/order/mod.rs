//! Order domain types
//!
//! - Status enums for orders, items and kitchen priority
//! - The persisted order snapshot
//! - Request/response payloads for lifecycle operations
//! - Events broadcast after each committed operation

pub mod event;
pub mod snapshot;
pub mod status;
pub mod types;

// Re-exports
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use snapshot::{Order, OrderItem};
pub use status::{ItemStatus, OrderStatus, Priority};
pub use types::*;
