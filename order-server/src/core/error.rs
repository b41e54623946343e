use crate::db::StorageError;
use thiserror::Error;

/// Errors that stop the server from starting or serving
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Router not initialized")]
    RouterNotInitialized,
}

pub type Result<T> = std::result::Result<T, ServerError>;
