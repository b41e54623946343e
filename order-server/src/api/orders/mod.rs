//! Order API Module
//!
//! Every mutation goes through the OrdersManager.

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

/// Order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/items", post(handler::add_items))
        .route("/{id}/status", patch(handler::update_status))
        .route(
            "/{id}/items/{item_id}/status",
            patch(handler::update_item_status),
        )
}
