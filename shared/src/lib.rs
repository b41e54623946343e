//! Shared types for the Comanda order server
//!
//! Common types used by the server and its HTTP clients: error codes and
//! response envelopes, table and catalog models, and the order domain types.

pub mod error;
pub mod models;
pub mod order;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
