//! Database Module
//!
//! Embedded redb database shared by orders, tables and the catalog.
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | `Order` (JSON) | Order snapshots |
//! | `open_orders` | `order_id` | `table_id` | Index of non-terminal orders |
//! | `dining_tables` | `table_id` | `DiningTable` (JSON) | Tables |
//! | `table_history` | `(table_id, change_id)` | `TableStatusChange` (JSON) | Status audit trail |
//! | `categories` | `category_id` | `Category` (JSON) | Menu categories |
//! | `menu_items` | `item_id` | `MenuItem` (JSON) | Regular menu |
//! | `special_dishes` | `special_id` | `SpecialDish` (JSON) | Specials |
//! | `counters` | name | `i64` | Sequences (order ids) |
//!
//! Every mutating operation runs in a single write transaction. redb
//! serializes writers, so a read-modify-write inside one transaction cannot
//! lose a concurrent update.

pub mod repository;

use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, Table, TableDefinition,
    WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

pub(crate) const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

pub(crate) const OPEN_ORDERS_TABLE: TableDefinition<i64, i64> =
    TableDefinition::new("open_orders");

pub(crate) const DINING_TABLES_TABLE: TableDefinition<i64, &[u8]> =
    TableDefinition::new("dining_tables");

pub(crate) const TABLE_HISTORY_TABLE: TableDefinition<(i64, i64), &[u8]> =
    TableDefinition::new("table_history");

pub(crate) const CATEGORIES_TABLE: TableDefinition<i64, &[u8]> =
    TableDefinition::new("categories");

pub(crate) const MENU_ITEMS_TABLE: TableDefinition<i64, &[u8]> =
    TableDefinition::new("menu_items");

pub(crate) const SPECIAL_DISHES_TABLE: TableDefinition<i64, &[u8]> =
    TableDefinition::new("special_dishes");

pub(crate) const COUNTERS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("counters");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for shared::AppError {
    fn from(err: StorageError) -> Self {
        shared::AppError::database(err.to_string())
    }
}

/// Database service - owns the redb handle
#[derive(Clone)]
pub struct DbService {
    db: Arc<Database>,
}

impl std::fmt::Debug for DbService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbService").field("db", &"<redb>").finish()
    }
}

impl DbService {
    /// Open or create the database at the given path
    ///
    /// Parent directories are created when missing. Commits use redb's
    /// default immediate durability.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init_tables(&db)?;
        tracing::info!(path = %path.display(), "Database opened");
        Ok(Self { db: Arc::new(db) })
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init_tables(&db)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn init_tables(db: &Database) -> StorageResult<()> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(OPEN_ORDERS_TABLE)?;
            let _ = write_txn.open_table(DINING_TABLES_TABLE)?;
            let _ = write_txn.open_table(TABLE_HISTORY_TABLE)?;
            let _ = write_txn.open_table(CATEGORIES_TABLE)?;
            let _ = write_txn.open_table(MENU_ITEMS_TABLE)?;
            let _ = write_txn.open_table(SPECIAL_DISHES_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction (MVCC snapshot)
    pub fn begin_read(&self) -> StorageResult<ReadTransaction> {
        Ok(self.db.begin_read()?)
    }
}

// ========== JSON value helpers ==========

/// Read and decode one JSON value by id
pub(crate) fn get_json<T, R>(table: &R, id: i64) -> StorageResult<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<i64, &'static [u8]>,
{
    match table.get(id)? {
        Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
        None => Ok(None),
    }
}

/// Decode every value of a table, in key order
pub(crate) fn scan_json<T, R>(table: &R) -> StorageResult<Vec<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<i64, &'static [u8]>,
{
    let mut values = Vec::new();
    for result in table.iter()? {
        let (_key, value) = result?;
        values.push(serde_json::from_slice(value.value())?);
    }
    Ok(values)
}

/// Increment a named counter and return the new value (starts at 1)
pub(crate) fn next_sequence(txn: &WriteTransaction, name: &str) -> StorageResult<i64> {
    let mut counters = txn.open_table(COUNTERS_TABLE)?;
    let next = counters.get(name)?.map(|v| v.value()).unwrap_or(0) + 1;
    counters.insert(name, next)?;
    Ok(next)
}

/// Encode and insert one JSON value
pub(crate) fn put_json<T: Serialize>(
    table: &mut Table<'_, i64, &'static [u8]>,
    id: i64,
    value: &T,
) -> StorageResult<()> {
    let bytes = serde_json::to_vec(value)?;
    table.insert(id, bytes.as_slice())?;
    Ok(())
}
