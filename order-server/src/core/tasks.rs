//! Background tasks
//!
//! The order event listener writes every committed [`OrderEvent`] to the
//! `order_events` log target. Completions are logged at info level so the
//! pass can be traced without a front end attached.

use crate::orders::OrdersManager;
use shared::order::{EventPayload, OrderEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Spawn the order event listener
///
/// The task ends when the manager (and with it the sender) is dropped.
pub fn spawn_event_listener(orders: &OrdersManager) -> JoinHandle<()> {
    let mut rx = orders.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(target: "order_events", skipped, "Event listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
        tracing::debug!(target: "order_events", "Event listener stopped");
    })
}

fn log_event(event: &OrderEvent) {
    match &event.payload {
        EventPayload::OrderCompleted {} => tracing::info!(
            target: "order_events",
            table_id = event.table_id,
            order_id = ?event.order_id,
            "Order ready for pickup"
        ),
        EventPayload::TableClosed {
            order_ids,
            final_total,
            ..
        } => tracing::info!(
            target: "order_events",
            table_id = event.table_id,
            orders = order_ids.len(),
            final_total = %final_total,
            "Table closed"
        ),
        _ => tracing::debug!(
            target: "order_events",
            event_type = %event.event_type(),
            table_id = event.table_id,
            order_id = ?event.order_id,
            "Order event"
        ),
    }
}
