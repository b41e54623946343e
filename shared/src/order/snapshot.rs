//! Order snapshot - the persisted state of an order
//!
//! Money fields are written as JSON numbers, both on the wire and in redb,
//! so they pass through `f64`. The server caps unit prices at 10,000,000 and
//! quantities at 999, which keeps every line total within 15 significant
//! digits where that round trip is exact at cent precision.

use super::status::{ItemStatus, OrderStatus};
use super::types::PaymentMethod;
use crate::models::CatalogRef;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Sequential within the owning order (1, 2, ...)
    pub id: i64,
    pub catalog_ref: CatalogRef,
    /// Name snapshot at the time the item was ordered
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub quantity: i32,
    /// Unit price snapshot from the catalog
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,
}

impl OrderItem {
    /// `unit_price * quantity`, `None` on overflow
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Order snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: i64,
    pub table_id: i64,
    /// Table number at the time the order was opened
    pub table_number: String,
    pub status: OrderStatus,
    /// Items in kitchen ticket order
    pub items: Vec<OrderItem>,
    /// Sum of quantity * unit_price over all items
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Set when the table is closed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    pub created_at: i64,
    pub modified_at: i64,
}

impl Order {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Id for the next appended item
    pub fn next_item_id(&self) -> i64 {
        self.items.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }

    pub fn item(&self, item_id: i64) -> Option<&OrderItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: i64) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    pub fn item_statuses(&self) -> impl Iterator<Item = ItemStatus> + '_ {
        self.items.iter().map(|i| i.status)
    }

    /// Recompute `total` from the items
    ///
    /// Returns `None` and leaves `total` untouched if the sum overflows.
    pub fn recalculate_total(&mut self) -> Option<Decimal> {
        let total = self
            .items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))?;
        self.total = total;
        Some(total)
    }
}
