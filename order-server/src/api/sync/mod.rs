//! Catalog Sync API Module
//!
//! One-call download of the catalog for clients that cache it offline.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/sync", get(handler::catalog))
}
