//! Unified error codes
//!
//! This module defines all error codes returned by the order server.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 7xxx: Table errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, JavaScript front ends, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order item not found
    OrderItemNotFound = 4002,
    /// Operation not allowed in the order's current (terminal) state
    OrderInvalidState = 4003,
    /// Unrecognized order or item status value
    InvalidStatus = 4004,
    /// Order has no items where at least one is required
    OrderEmpty = 4005,
    /// Table has no open orders to close
    NoOpenOrders = 4006,

    // ==================== 6xxx: Catalog ====================
    /// Catalog reference does not resolve in its namespace
    CatalogItemNotFound = 6001,
    /// Menu item not found
    MenuItemNotFound = 6002,
    /// Special dish not found
    SpecialNotFound = 6003,
    /// Invalid price
    InvalidPrice = 6004,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category name already exists
    CategoryNameExists = 6102,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table has open orders
    TableOccupied = 7002,
    /// A table with this number and kind already exists
    TableNumberExists = 7003,
    /// Table is inactive or out of service
    TableUnavailable = 7004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this represents success
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get the default (English) message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field is missing",
            Self::ValueOutOfRange => "Value is out of range",

            // Order
            Self::OrderNotFound => "Order not found",
            Self::OrderItemNotFound => "Order item not found",
            Self::OrderInvalidState => "Operation not allowed in the current order state",
            Self::InvalidStatus => "Invalid status",
            Self::OrderEmpty => "Order has no items",
            Self::NoOpenOrders => "No open orders for this table",

            // Catalog
            Self::CatalogItemNotFound => "Catalog item not found",
            Self::MenuItemNotFound => "Menu item not found",
            Self::SpecialNotFound => "Special dish not found",
            Self::InvalidPrice => "Invalid price",
            Self::CategoryNotFound => "Category not found",
            Self::CategoryNameExists => "Category name already exists",

            // Table
            Self::TableNotFound => "Table not found",
            Self::TableOccupied => "Table has open orders",
            Self::TableNumberExists => "A table with this number already exists",
            Self::TableUnavailable => "Table is not available",

            // System
            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            7 => Self::RequiredField,
            8 => Self::ValueOutOfRange,

            4001 => Self::OrderNotFound,
            4002 => Self::OrderItemNotFound,
            4003 => Self::OrderInvalidState,
            4004 => Self::InvalidStatus,
            4005 => Self::OrderEmpty,
            4006 => Self::NoOpenOrders,

            6001 => Self::CatalogItemNotFound,
            6002 => Self::MenuItemNotFound,
            6003 => Self::SpecialNotFound,
            6004 => Self::InvalidPrice,
            6101 => Self::CategoryNotFound,
            6102 => Self::CategoryNameExists,

            7001 => Self::TableNotFound,
            7002 => Self::TableOccupied,
            7003 => Self::TableNumberExists,
            7004 => Self::TableUnavailable,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ConfigError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
