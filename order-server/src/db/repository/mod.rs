//! Repository Module
//!
//! CRUD over the redb tables for dining tables and the catalog. Each
//! repository method opens its own transaction; the `*_txn` variants join a
//! caller's write transaction so the order engine can update tables and
//! orders atomically.

// Location
pub mod dining_table;

// Catalog
pub mod category;
pub mod menu_item;
pub mod special_dish;

// Re-exports
pub use category::CategoryRepository;
pub use dining_table::{DiningTableRepository, TableFilter};
pub use menu_item::MenuItemRepository;
pub use special_dish::SpecialDishRepository;

use super::StorageError;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("Table number already exists: {0}")]
    TableNumberExists(String),

    #[error("Table has open orders: {0}")]
    TableOccupied(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("Category name already exists: {0}")]
    CategoryNameExists(String),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    #[error("Special dish not found: {0}")]
    SpecialNotFound(i64),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

macro_rules! impl_from_redb {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for RepoError {
                fn from(err: $err) -> Self {
                    RepoError::Storage(err.into())
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
    serde_json::Error,
);

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, format!("Table {} not found", id))
                    .with_detail("table_id", id)
            }
            RepoError::TableNumberExists(number) => AppError::with_message(
                ErrorCode::TableNumberExists,
                format!("A table with number '{}' already exists", number),
            )
            .with_detail("number", number),
            RepoError::TableOccupied(id) => AppError::with_message(
                ErrorCode::TableOccupied,
                format!("Table {} has open orders", id),
            )
            .with_detail("table_id", id),
            RepoError::CategoryNotFound(id) => AppError::with_message(
                ErrorCode::CategoryNotFound,
                format!("Category {} not found", id),
            )
            .with_detail("category_id", id),
            RepoError::CategoryNameExists(name) => AppError::with_message(
                ErrorCode::CategoryNameExists,
                format!("Category '{}' already exists", name),
            )
            .with_detail("name", name),
            RepoError::MenuItemNotFound(id) => AppError::with_message(
                ErrorCode::MenuItemNotFound,
                format!("Menu item {} not found", id),
            )
            .with_detail("menu_item_id", id),
            RepoError::SpecialNotFound(id) => AppError::with_message(
                ErrorCode::SpecialNotFound,
                format!("Special dish {} not found", id),
            )
            .with_detail("special_id", id),
            RepoError::Storage(e) => e.into(),
        }
    }
}
