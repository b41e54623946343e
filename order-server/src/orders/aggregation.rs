//! Order status aggregation
//!
//! The order status shown to the kitchen is derived from its item statuses:
//!
//! | Items | Order |
//! |-------|-------|
//! | none | `pending` |
//! | all `ready`/`delivered` | `ready` |
//! | any `preparing` | `preparing` |
//! | otherwise | `pending` |
//!
//! The result never depends on item order and is never terminal.

use shared::order::{ItemStatus, OrderStatus};

/// Derive the order status from a multiset of item statuses
pub fn aggregate<I>(statuses: I) -> OrderStatus
where
    I: IntoIterator<Item = ItemStatus>,
{
    let mut any = false;
    let mut all_done = true;
    let mut any_preparing = false;

    for status in statuses {
        any = true;
        all_done &= status.is_done();
        any_preparing |= status == ItemStatus::Preparing;
    }

    if !any {
        OrderStatus::Pending
    } else if all_done {
        OrderStatus::Ready
    } else if any_preparing {
        OrderStatus::Preparing
    } else {
        OrderStatus::Pending
    }
}

/// Status an order should hold after its items changed
///
/// A staff-confirmed order is not pulled back to `pending`; everything else
/// follows [`aggregate`].
pub fn derive_status<I>(current: OrderStatus, statuses: I) -> OrderStatus
where
    I: IntoIterator<Item = ItemStatus>,
{
    match aggregate(statuses) {
        OrderStatus::Pending if current == OrderStatus::Confirmed => OrderStatus::Confirmed,
        derived => derived,
    }
}
