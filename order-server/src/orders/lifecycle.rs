//! Order state machine
//!
//! ```text
//! pending/confirmed ──► preparing ──► ready ──► delivered
//!        │                  │  ▲        │
//!        └────► cancelled ◄─┘  └────────┘ (new item regresses ready)
//! ```
//!
//! `preparing`, `ready` and `pending` are normally reached through item
//! aggregation. `delivered` and `cancelled` are explicit and terminal.

use shared::order::{ItemStatus, OrderStatus};

/// Standard successors of a status
pub fn successors(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match from {
        Pending => &[Confirmed, Preparing, Cancelled],
        Confirmed => &[Preparing, Cancelled],
        Preparing => &[Ready, Cancelled],
        Ready => &[Delivered, Preparing],
        Delivered | Cancelled => &[],
    }
}

/// Whether `from -> to` is an edge of the state machine
pub fn is_standard_transition(from: OrderStatus, to: OrderStatus) -> bool {
    successors(from).contains(&to)
}

/// Item status forced onto every item by an explicit order status change
pub fn forced_item_status(to: OrderStatus) -> Option<ItemStatus> {
    match to {
        OrderStatus::Ready => Some(ItemStatus::Ready),
        OrderStatus::Delivered => Some(ItemStatus::Delivered),
        _ => None,
    }
}

/// Moving into `ready` is the "order completed" signal
pub fn completes(from: OrderStatus, to: OrderStatus) -> bool {
    from != OrderStatus::Ready && to == OrderStatus::Ready
}
