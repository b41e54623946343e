//! OrdersManager - order lifecycle operations and event generation
//!
//! Every mutating operation follows the same flow:
//!
//! ```text
//! operation(args)
//!     ├─ 1. Validate input (status strings, quantities, text lengths)
//!     ├─ 2. Begin write transaction
//!     ├─ 3. Load the order / table, reject terminal orders
//!     ├─ 4. Mutate the snapshot, re-run item aggregation
//!     ├─ 5. Persist order (+ open index) and any table status change
//!     ├─ 6. Commit transaction
//!     └─ 7. Broadcast event(s)
//! ```
//!
//! An error at any step drops the transaction, so nothing is applied.

mod error;
pub use error::*;

use super::aggregation::derive_status;
use super::storage::OrderStorage;
use super::money::{self, AmountError};
use super::{lifecycle, priority};
use crate::db::DbService;
use crate::db::repository::DiningTableRepository;
use crate::services::CatalogService;
use crate::utils::validation::check_order_text;
use redb::WriteTransaction;
use rust_decimal::Decimal;
use shared::models::TableStatus;
use shared::order::{
    CloseTableRequest, EventPayload, ItemStatus, ItemStatusResult, KitchenOrder, Order,
    OrderEvent, OrderItem, OrderItemInput, OrderStatus, TableClosure,
};
use shared::util::now_millis;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Default page size for order listings
pub const DEFAULT_LIST_LIMIT: usize = 50;
/// Largest page size accepted for order listings
pub const MAX_LIST_LIMIT: usize = 500;

/// Actor recorded on table status changes made by the engine
const SYSTEM_ACTOR: &str = "system";

/// Order listing filter
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub table_id: Option<i64>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// OrdersManager for order lifecycle operations
///
/// The `epoch` field is a unique identifier generated on each startup.
/// Event subscribers use it to detect server restarts.
pub struct OrdersManager {
    storage: OrderStorage,
    catalog: CatalogService,
    tables: DiningTableRepository,
    event_tx: broadcast::Sender<OrderEvent>,
    /// Server instance epoch
    epoch: String,
    /// Whether finishing the last open order frees the table
    release_table_on_close: bool,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &"<OrderStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("epoch", &self.epoch)
            .field("release_table_on_close", &self.release_table_on_close)
            .finish()
    }
}

impl OrdersManager {
    /// Create a manager over an opened database
    pub fn new(db: DbService, release_table_on_close: bool) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, release_table_on_close, "OrdersManager started with new epoch");
        Self {
            storage: OrderStorage::new(db.clone()),
            catalog: CatalogService::new(db.clone()),
            tables: DiningTableRepository::new(db),
            event_tx,
            epoch,
            release_table_on_close,
        }
    }

    /// Create an OrdersManager with existing storage (for testing)
    #[cfg(test)]
    pub fn with_storage(storage: OrderStorage) -> Self {
        Self::new(storage.db().clone(), true)
    }

    /// Get the server epoch (unique instance ID)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to order events
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    // ========== Lifecycle operations ==========

    /// Open a new order on a table
    ///
    /// Prices and names are snapshotted from the catalog. An `available`
    /// table becomes `occupied`.
    pub fn create_order(
        &self,
        table_id: i64,
        items: &[OrderItemInput],
        notes: Option<String>,
    ) -> ManagerResult<Order> {
        check_order_text(&notes, "notes").map_err(ManagerError::Validation)?;

        let txn = self.storage.begin_write()?;
        let mut table = self
            .tables
            .find_by_id_txn(&txn, table_id)?
            .filter(|t| t.is_active)
            .ok_or(ManagerError::TableNotFound(table_id))?;
        if table.status == TableStatus::OutOfService {
            return Err(ManagerError::TableUnavailable(table_id));
        }

        let items = self.build_items(&txn, items, 1)?;
        let now = now_millis();
        let mut order = Order {
            id: self.storage.next_order_id_txn(&txn)?,
            table_id,
            table_number: table.number.clone(),
            status: OrderStatus::Pending,
            items,
            total: Decimal::ZERO,
            notes,
            payment_method: None,
            created_at: now,
            modified_at: now,
        };
        order
            .recalculate_total()
            .ok_or(ManagerError::InvalidAmount(AmountError::Overflow))?;

        if table.status == TableStatus::Available {
            self.tables.set_status_txn(
                &txn,
                &mut table,
                TableStatus::Occupied,
                Some(SYSTEM_ACTOR.to_string()),
                Some(format!("order {} opened", order.id)),
            )?;
        }
        self.storage.store_order_txn(&txn, &order)?;
        txn.commit()?;

        tracing::info!(
            order_id = order.id,
            table_id,
            items = order.items.len(),
            total = %order.total,
            "Order created"
        );
        self.broadcast([OrderEvent::new(
            table_id,
            Some(order.id),
            EventPayload::OrderCreated {
                table_number: order.table_number.clone(),
                item_count: order.items.len(),
                total: order.total,
            },
        )]);
        Ok(order)
    }

    /// Append items to an open order
    ///
    /// New items start `pending`, so a `ready` order falls back to `pending`.
    pub fn add_items(&self, order_id: i64, items: &[OrderItemInput]) -> ManagerResult<Order> {
        if items.is_empty() {
            return Err(ManagerError::EmptyItems);
        }

        let txn = self.storage.begin_write()?;
        let mut order = self.load_mutable(&txn, order_id)?;

        let new_items = self.build_items(&txn, items, order.next_item_id())?;
        let item_ids: Vec<i64> = new_items.iter().map(|i| i.id).collect();
        order.items.extend(new_items);
        order
            .recalculate_total()
            .ok_or(ManagerError::InvalidAmount(AmountError::Overflow))?;

        let previous = order.status;
        order.status = derive_status(previous, order.item_statuses());
        order.modified_at = now_millis();

        self.storage.store_order_txn(&txn, &order)?;
        txn.commit()?;

        tracing::info!(
            order_id,
            added = item_ids.len(),
            total = %order.total,
            status = %order.status,
            "Items added"
        );
        let mut events = vec![OrderEvent::new(
            order.table_id,
            Some(order_id),
            EventPayload::ItemsAdded {
                item_ids,
                total: order.total,
            },
        )];
        if previous != order.status {
            events.push(status_changed(&order, previous));
        }
        self.broadcast(events);
        Ok(order)
    }

    /// Set one item's kitchen status and re-derive the order status
    ///
    /// `order_completed` is true only when this update moved the order into
    /// `ready`.
    pub fn update_item_status(
        &self,
        order_id: i64,
        item_id: i64,
        status: &str,
    ) -> ManagerResult<ItemStatusResult> {
        let status: ItemStatus = status
            .parse()
            .map_err(|_| ManagerError::InvalidStatus(status.to_string()))?;

        let txn = self.storage.begin_write()?;
        let mut order = self.load_mutable(&txn, order_id)?;

        let item = order
            .item_mut(item_id)
            .ok_or(ManagerError::ItemNotFound { order_id, item_id })?;
        let previous_item = item.status;
        item.status = status;

        let previous = order.status;
        order.status = derive_status(previous, order.item_statuses());
        order.modified_at = now_millis();
        let order_completed = lifecycle::completes(previous, order.status);

        self.storage.store_order_txn(&txn, &order)?;
        txn.commit()?;

        tracing::info!(
            order_id,
            item_id,
            from = %previous_item,
            to = %status,
            order_status = %order.status,
            "Item status updated"
        );

        let mut events = vec![OrderEvent::new(
            order.table_id,
            Some(order_id),
            EventPayload::ItemStatusChanged {
                item_id,
                previous: previous_item,
                current: status,
            },
        )];
        if previous != order.status {
            events.push(status_changed(&order, previous));
        }
        if order_completed {
            tracing::info!(order_id, table_id = order.table_id, "Order completed");
            events.push(completed(&order));
        }
        self.broadcast(events);

        Ok(ItemStatusResult {
            order,
            order_completed,
        })
    }

    /// Explicit status override
    ///
    /// `ready` and `delivered` force every item to the matching status. A
    /// terminal status frees the table once it has no other open orders.
    pub fn update_order_status(&self, order_id: i64, status: &str) -> ManagerResult<Order> {
        let target: OrderStatus = status
            .parse()
            .map_err(|_| ManagerError::InvalidStatus(status.to_string()))?;

        let txn = self.storage.begin_write()?;
        let mut order = self.load_mutable(&txn, order_id)?;

        let previous = order.status;
        if previous == target {
            return Ok(order);
        }
        if !lifecycle::is_standard_transition(previous, target) {
            tracing::warn!(
                order_id,
                from = %previous,
                to = %target,
                "Order status override outside the standard lifecycle"
            );
        }

        if let Some(forced) = lifecycle::forced_item_status(target) {
            for item in &mut order.items {
                item.status = forced;
            }
        }
        order.status = target;
        order.modified_at = now_millis();

        self.storage.store_order_txn(&txn, &order)?;
        let table_released = if target.is_terminal() {
            self.release_table_if_idle_txn(&txn, order.table_id, &format!("order {} {}", order_id, target))?
        } else {
            false
        };
        txn.commit()?;

        tracing::info!(
            order_id,
            table_id = order.table_id,
            from = %previous,
            to = %target,
            table_released,
            "Order status updated"
        );

        let mut events = vec![status_changed(&order, previous)];
        if lifecycle::completes(previous, target) {
            events.push(completed(&order));
        }
        self.broadcast(events);
        Ok(order)
    }

    /// Settle every open order on a table
    ///
    /// Orders and their items become `delivered` with the payment method
    /// recorded; the final amount is `base + tip - discount`.
    pub fn close_table(
        &self,
        table_id: i64,
        request: &CloseTableRequest,
    ) -> ManagerResult<TableClosure> {
        let tip = request.tip.unwrap_or(Decimal::ZERO);
        let discount = request.discount.unwrap_or(Decimal::ZERO);

        let txn = self.storage.begin_write()?;
        let table = self
            .tables
            .find_by_id_txn(&txn, table_id)?
            .ok_or(ManagerError::TableNotFound(table_id))?;

        let mut orders = self.storage.open_orders_for_table_txn(&txn, table_id)?;
        if orders.is_empty() {
            return Err(ManagerError::NoOpenOrders(table_id));
        }

        let base_total = money::checked_sum(orders.iter().map(|o| o.total))
            .map(money::to_money)
            .map_err(ManagerError::InvalidAmount)?;
        let final_total =
            money::closing_total(base_total, tip, discount).map_err(ManagerError::InvalidAmount)?;

        let now = now_millis();
        let mut previous_statuses = Vec::with_capacity(orders.len());
        for order in &mut orders {
            previous_statuses.push(order.status);
            for item in &mut order.items {
                item.status = ItemStatus::Delivered;
            }
            order.status = OrderStatus::Delivered;
            order.payment_method = Some(request.payment_method);
            order.modified_at = now;
            self.storage.store_order_txn(&txn, order)?;
        }

        let table_released = self.release_table_if_idle_txn(&txn, table_id, "table closed")?;
        txn.commit()?;

        let order_ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        tracing::info!(
            table_id,
            orders = order_ids.len(),
            base_total = %base_total,
            final_total = %final_total,
            payment_method = ?request.payment_method,
            table_released,
            "Table closed"
        );

        let mut events: Vec<OrderEvent> = orders
            .iter()
            .zip(previous_statuses)
            .map(|(order, previous)| status_changed(order, previous))
            .collect();
        events.push(OrderEvent::new(
            table_id,
            None,
            EventPayload::TableClosed {
                order_ids: order_ids.clone(),
                payment_method: request.payment_method,
                final_total,
            },
        ));
        self.broadcast(events);

        Ok(TableClosure {
            table_id,
            table_number: table.number,
            orders_closed: order_ids.len(),
            order_ids,
            base_total,
            tip,
            discount,
            final_total,
            payment_method: request.payment_method,
            table_released,
            closed_at: now,
        })
    }

    // ========== Queries ==========

    /// Active orders, oldest first, with wait time and priority at `now`
    pub fn kitchen_queue(&self, now: i64) -> ManagerResult<Vec<KitchenOrder>> {
        let mut orders: Vec<Order> = self
            .storage
            .open_orders()?
            .into_iter()
            .filter(|o| o.status.is_active())
            .collect();
        orders.sort_by_key(|o| (o.created_at, o.id));

        Ok(orders
            .into_iter()
            .map(|order| {
                let (wait_minutes, priority) = priority::derive(order.created_at, now);
                KitchenOrder {
                    order,
                    wait_minutes,
                    priority,
                }
            })
            .collect())
    }

    pub fn get_order(&self, order_id: i64) -> ManagerResult<Order> {
        self.storage
            .get_order(order_id)?
            .ok_or(ManagerError::OrderNotFound(order_id))
    }

    /// Orders matching the filter, newest first
    pub fn list_orders(&self, filter: &OrderFilter) -> ManagerResult<Vec<Order>> {
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_LIST_LIMIT)
            .min(MAX_LIST_LIMIT);
        let offset = filter.offset.unwrap_or(0);

        let mut orders: Vec<Order> = self
            .storage
            .all_orders()?
            .into_iter()
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .filter(|o| filter.table_id.is_none_or(|t| o.table_id == t))
            .collect();
        orders.sort_by_key(|o| std::cmp::Reverse((o.created_at, o.id)));

        Ok(orders.into_iter().skip(offset).take(limit).collect())
    }

    /// Open orders of a table, newest first
    pub fn orders_for_table(&self, table_id: i64) -> ManagerResult<Vec<Order>> {
        if self.tables.find_by_id(table_id)?.is_none() {
            return Err(ManagerError::TableNotFound(table_id));
        }
        let mut orders = self.storage.open_orders_for_table(table_id)?;
        orders.reverse();
        Ok(orders)
    }

    // ========== Internals ==========

    fn load_mutable(&self, txn: &WriteTransaction, order_id: i64) -> ManagerResult<Order> {
        let order = self
            .storage
            .get_order_txn(txn, order_id)?
            .ok_or(ManagerError::OrderNotFound(order_id))?;
        if order.is_terminal() {
            return Err(ManagerError::InvalidState {
                order_id,
                status: order.status,
            });
        }
        Ok(order)
    }

    /// Resolve inputs into `pending` items numbered from `first_id`
    fn build_items(
        &self,
        txn: &WriteTransaction,
        inputs: &[OrderItemInput],
        first_id: i64,
    ) -> ManagerResult<Vec<OrderItem>> {
        let mut items = Vec::with_capacity(inputs.len());
        for (id, input) in (first_id..).zip(inputs) {
            if !money::is_valid_quantity(input.quantity) {
                return Err(ManagerError::InvalidQuantity {
                    quantity: input.quantity,
                    max: money::MAX_QUANTITY,
                });
            }
            check_order_text(&input.special_instructions, "special_instructions")
                .map_err(ManagerError::Validation)?;

            let resolved = self
                .catalog
                .resolve_txn(txn, &input.catalog_ref)?
                .ok_or(ManagerError::CatalogItemNotFound(input.catalog_ref))?;
            money::check_price(resolved.unit_price).map_err(ManagerError::InvalidAmount)?;

            items.push(OrderItem {
                id,
                catalog_ref: input.catalog_ref,
                name: resolved.name,
                category_name: resolved.category_name,
                quantity: input.quantity,
                unit_price: resolved.unit_price,
                status: ItemStatus::Pending,
                special_instructions: input.special_instructions.clone(),
            });
        }
        Ok(items)
    }

    /// Set an occupied table back to `available` when nothing is open on it
    ///
    /// Must run after the finishing order was stored so the open index is
    /// current. Tables in `cleaning` or `out_of_service` are left alone.
    fn release_table_if_idle_txn(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
        reason: &str,
    ) -> ManagerResult<bool> {
        if !self.release_table_on_close {
            return Ok(false);
        }
        if !self
            .storage
            .open_orders_for_table_txn(txn, table_id)?
            .is_empty()
        {
            return Ok(false);
        }
        let Some(mut table) = self.tables.find_by_id_txn(txn, table_id)? else {
            return Ok(false);
        };
        if table.status != TableStatus::Occupied {
            return Ok(false);
        }
        self.tables.set_status_txn(
            txn,
            &mut table,
            TableStatus::Available,
            Some(SYSTEM_ACTOR.to_string()),
            Some(reason.to_string()),
        )?;
        Ok(true)
    }

    fn broadcast(&self, events: impl IntoIterator<Item = OrderEvent>) {
        for event in events {
            tracing::debug!(
                event_type = %event.event_type(),
                table_id = event.table_id,
                order_id = ?event.order_id,
                "Broadcasting order event"
            );
            // No receivers is fine
            let _ = self.event_tx.send(event);
        }
    }
}

fn status_changed(order: &Order, previous: OrderStatus) -> OrderEvent {
    OrderEvent::new(
        order.table_id,
        Some(order.id),
        EventPayload::OrderStatusChanged {
            previous,
            current: order.status,
        },
    )
}

fn completed(order: &Order) -> OrderEvent {
    OrderEvent::new(order.table_id, Some(order.id), EventPayload::OrderCompleted {})
}

#[cfg(test)]
mod tests;
