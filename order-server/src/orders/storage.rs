//! Order persistence on redb
//!
//! Orders are stored as JSON snapshots keyed by id. The `open_orders` index
//! holds every non-terminal order (`order_id -> table_id`) and is kept in
//! step with the snapshot on each write, so kitchen and table lookups never
//! scan closed orders.

use crate::db::{
    DbService, OPEN_ORDERS_TABLE, ORDERS_TABLE, StorageResult, get_json, next_sequence, put_json,
    scan_json,
};
use redb::{ReadableTable, WriteTransaction};
use shared::order::Order;

const ORDER_SEQUENCE: &str = "order_id";

#[derive(Clone, Debug)]
pub struct OrderStorage {
    db: DbService,
}

impl OrderStorage {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DbService {
        &self.db
    }

    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        self.db.begin_write()
    }

    // ========== Reads ==========

    pub fn get_order(&self, order_id: i64) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        get_json(&orders, order_id)
    }

    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: i64,
    ) -> StorageResult<Option<Order>> {
        let orders = txn.open_table(ORDERS_TABLE)?;
        get_json(&orders, order_id)
    }

    /// Every stored order, in id order
    pub fn all_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        scan_json(&orders)
    }

    /// Non-terminal orders, in id order
    pub fn open_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(OPEN_ORDERS_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        let mut result = Vec::new();
        for entry in index.iter()? {
            let (order_id, _table_id) = entry?;
            if let Some(order) = get_json::<Order, _>(&orders, order_id.value())? {
                result.push(order);
            }
        }
        Ok(result)
    }

    /// Non-terminal orders of one table, oldest first
    pub fn open_orders_for_table(&self, table_id: i64) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(OPEN_ORDERS_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        collect_for_table(&index, &orders, table_id)
    }

    pub fn open_orders_for_table_txn(
        &self,
        txn: &WriteTransaction,
        table_id: i64,
    ) -> StorageResult<Vec<Order>> {
        let index = txn.open_table(OPEN_ORDERS_TABLE)?;
        let orders = txn.open_table(ORDERS_TABLE)?;
        collect_for_table(&index, &orders, table_id)
    }

    // ========== Writes ==========

    /// Allocate the next order id (1, 2, ...)
    pub fn next_order_id_txn(&self, txn: &WriteTransaction) -> StorageResult<i64> {
        next_sequence(txn, ORDER_SEQUENCE)
    }

    /// Persist an order snapshot and update the open index
    pub fn store_order_txn(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        {
            let mut orders = txn.open_table(ORDERS_TABLE)?;
            put_json(&mut orders, order.id, order)?;
        }
        let mut index = txn.open_table(OPEN_ORDERS_TABLE)?;
        if order.is_terminal() {
            index.remove(order.id)?;
        } else {
            index.insert(order.id, order.table_id)?;
        }
        Ok(())
    }
}

fn collect_for_table<I, O>(index: &I, orders: &O, table_id: i64) -> StorageResult<Vec<Order>>
where
    I: ReadableTable<i64, i64>,
    O: ReadableTable<i64, &'static [u8]>,
{
    let mut result = Vec::new();
    for entry in index.iter()? {
        let (order_id, owner) = entry?;
        if owner.value() != table_id {
            continue;
        }
        if let Some(order) = get_json::<Order, _>(orders, order_id.value())? {
            result.push(order);
        }
    }
    result.sort_by_key(|o| (o.created_at, o.id));
    Ok(result)
}
