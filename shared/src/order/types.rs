//! Request and response types for order operations

use super::snapshot::Order;
use super::status::Priority;
use crate::models::CatalogRef;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment method recorded when a table is closed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
}

/// Item to add to an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub catalog_ref: CatalogRef,
    pub quantity: i32,
    pub special_instructions: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub table_id: i64,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    pub notes: Option<String>,
}

/// Add items payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddItemsRequest {
    pub items: Vec<OrderItemInput>,
}

/// Status change payload for orders and items
///
/// Kept as a raw string so unrecognized values map to `InvalidStatus`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

/// Close table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloseTableRequest {
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub tip: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub discount: Option<Decimal>,
}

/// Summary returned by close table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableClosure {
    pub table_id: i64,
    pub table_number: String,
    pub order_ids: Vec<i64>,
    pub orders_closed: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tip: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_total: Decimal,
    pub payment_method: PaymentMethod,
    /// Whether the table went back to `available`
    pub table_released: bool,
    pub closed_at: i64,
}

/// Result of an item status update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemStatusResult {
    pub order: Order,
    /// True only when this update moved the order into `ready`
    pub order_completed: bool,
}

/// Order as shown on the kitchen display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenOrder {
    #[serde(flatten)]
    pub order: Order,
    pub wait_minutes: i64,
    pub priority: Priority,
}
