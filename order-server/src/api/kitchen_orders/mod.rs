//! Kitchen Orders API Module
//!
//! FIFO queue of active orders with wait time and priority computed at
//! request time.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/kitchen-orders", kitchen_routes())
}

fn kitchen_routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::list))
}
