//! Order events - facts broadcast after a lifecycle operation commits

use super::status::{ItemStatus, OrderStatus};
use super::types::PaymentMethod;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderEvent {
    /// Event unique ID
    pub event_id: String,
    /// Server timestamp (Unix milliseconds)
    pub timestamp: i64,
    pub table_id: i64,
    /// Absent for table-level events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    pub payload: EventPayload,
}

/// Event type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderEventType {
    OrderCreated,
    ItemsAdded,
    ItemStatusChanged,
    OrderStatusChanged,
    /// Order moved into `ready`; the kitchen signal for waitstaff
    OrderCompleted,
    TableClosed,
}

impl std::fmt::Display for OrderEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderEventType::OrderCreated => write!(f, "ORDER_CREATED"),
            OrderEventType::ItemsAdded => write!(f, "ITEMS_ADDED"),
            OrderEventType::ItemStatusChanged => write!(f, "ITEM_STATUS_CHANGED"),
            OrderEventType::OrderStatusChanged => write!(f, "ORDER_STATUS_CHANGED"),
            OrderEventType::OrderCompleted => write!(f, "ORDER_COMPLETED"),
            OrderEventType::TableClosed => write!(f, "TABLE_CLOSED"),
        }
    }
}

/// Event payload variants
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPayload {
    OrderCreated {
        table_number: String,
        item_count: usize,
        #[serde(with = "rust_decimal::serde::float")]
        total: Decimal,
    },

    ItemsAdded {
        item_ids: Vec<i64>,
        #[serde(with = "rust_decimal::serde::float")]
        total: Decimal,
    },

    ItemStatusChanged {
        item_id: i64,
        previous: ItemStatus,
        current: ItemStatus,
    },

    OrderStatusChanged {
        previous: OrderStatus,
        current: OrderStatus,
    },

    OrderCompleted {},

    TableClosed {
        order_ids: Vec<i64>,
        payment_method: PaymentMethod,
        #[serde(with = "rust_decimal::serde::float")]
        final_total: Decimal,
    },
}

impl EventPayload {
    pub fn event_type(&self) -> OrderEventType {
        match self {
            Self::OrderCreated { .. } => OrderEventType::OrderCreated,
            Self::ItemsAdded { .. } => OrderEventType::ItemsAdded,
            Self::ItemStatusChanged { .. } => OrderEventType::ItemStatusChanged,
            Self::OrderStatusChanged { .. } => OrderEventType::OrderStatusChanged,
            Self::OrderCompleted {} => OrderEventType::OrderCompleted,
            Self::TableClosed { .. } => OrderEventType::TableClosed,
        }
    }
}

impl OrderEvent {
    /// Create a new event stamped with the current server time
    pub fn new(table_id: i64, order_id: Option<i64>, payload: EventPayload) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: crate::util::now_millis(),
            table_id,
            order_id,
            payload,
        }
    }

    pub fn event_type(&self) -> OrderEventType {
        self.payload.event_type()
    }
}
