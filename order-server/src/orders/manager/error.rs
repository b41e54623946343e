use crate::db::StorageError;
use crate::db::repository::RepoError;
use crate::orders::money::AmountError;
use shared::models::CatalogRef;
use shared::order::OrderStatus;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Item {item_id} not found in order {order_id}")]
    ItemNotFound { order_id: i64, item_id: i64 },

    #[error("Catalog item not found: {0}")]
    CatalogItemNotFound(CatalogRef),

    #[error("Order {order_id} is {status} and can no longer change")]
    InvalidState { order_id: i64, status: OrderStatus },

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("Table {0} is not accepting orders")]
    TableUnavailable(i64),

    #[error("Table {0} has no open orders")]
    NoOpenOrders(i64),

    #[error("Order must contain at least one item")]
    EmptyItems,

    #[error("Invalid quantity {quantity}: must be between 1 and {max}")]
    InvalidQuantity { quantity: i32, max: i32 },

    #[error("Invalid amount: {0}")]
    InvalidAmount(AmountError),

    #[error("Validation failed: {0}")]
    Validation(String),
}

macro_rules! impl_from_redb {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for ManagerError {
                fn from(err: $err) -> Self {
                    ManagerError::Storage(err.into())
                }
            }
        )*
    };
}

impl_from_redb!(redb::TransactionError, redb::TableError, redb::CommitError);

/// Result type for manager operations
pub type ManagerResult<T> = Result<T, ManagerError>;

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Storage(e) => e.into(),
            ManagerError::Repo(e) => e.into(),
            ManagerError::OrderNotFound(id) => {
                AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
                    .with_detail("order_id", id)
            }
            ManagerError::ItemNotFound { order_id, item_id } => AppError::with_message(
                ErrorCode::OrderItemNotFound,
                format!("Item {} not found in order {}", item_id, order_id),
            )
            .with_detail("order_id", order_id)
            .with_detail("item_id", item_id),
            ManagerError::CatalogItemNotFound(catalog_ref) => AppError::with_message(
                ErrorCode::CatalogItemNotFound,
                format!("Catalog item {} not found", catalog_ref),
            )
            .with_detail("catalog_ref", catalog_ref.to_string()),
            ManagerError::InvalidState { order_id, status } => AppError::with_message(
                ErrorCode::OrderInvalidState,
                format!("Order {} is {} and can no longer change", order_id, status),
            )
            .with_detail("order_id", order_id)
            .with_detail("status", status.as_str()),
            ManagerError::InvalidStatus(value) => AppError::invalid_status(value),
            ManagerError::TableNotFound(id) => {
                AppError::with_message(ErrorCode::TableNotFound, format!("Table {} not found", id))
                    .with_detail("table_id", id)
            }
            ManagerError::TableUnavailable(id) => AppError::with_message(
                ErrorCode::TableUnavailable,
                format!("Table {} is not accepting orders", id),
            )
            .with_detail("table_id", id),
            ManagerError::NoOpenOrders(id) => AppError::with_message(
                ErrorCode::NoOpenOrders,
                format!("Table {} has no open orders", id),
            )
            .with_detail("table_id", id),
            ManagerError::EmptyItems => AppError::new(ErrorCode::OrderEmpty),
            ManagerError::InvalidQuantity { quantity, max } => AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("Invalid quantity {}: must be between 1 and {}", quantity, max),
            )
            .with_detail("quantity", quantity),
            ManagerError::InvalidAmount(e) => {
                AppError::with_message(ErrorCode::ValueOutOfRange, e.to_string())
            }
            ManagerError::Validation(msg) => AppError::validation(msg),
        }
    }
}
