//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::orders::OrderFilter;
use crate::utils::{AppError, AppResult};
use shared::order::{
    AddItemsRequest, CreateOrderRequest, ItemStatusResult, Order, OrderStatus, StatusUpdate,
};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct OrderQuery {
    pub status: Option<String>,
    pub table_id: Option<i64>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl OrderQuery {
    fn into_filter(self) -> AppResult<OrderFilter> {
        let status = self
            .status
            .map(|s| s.parse::<OrderStatus>().map_err(|_| AppError::invalid_status(s)))
            .transpose()?;
        Ok(OrderFilter {
            status,
            table_id: self.table_id,
            limit: self.limit,
            offset: self.offset,
        })
    }
}

/// GET /api/orders - list orders, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let filter = query.into_filter()?;
    let orders = state.orders.list_orders(&filter)?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get_order(id)?))
}

/// POST /api/orders - open an order on a table
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .create_order(payload.table_id, &payload.items, payload.notes)?;
    Ok(Json(order))
}

/// POST /api/orders/:id/items - append items
pub async fn add_items(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AddItemsRequest>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.add_items(id, &payload.items)?))
}

/// PATCH /api/orders/:id/status - explicit status change
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.update_order_status(id, &payload.status)?))
}

/// PATCH /api/orders/:id/items/:item_id/status - kitchen item progress
pub async fn update_item_status(
    State(state): State<ServerState>,
    Path((id, item_id)): Path<(i64, i64)>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<ItemStatusResult>> {
    let result = state
        .orders
        .update_item_status(id, item_id, &payload.status)?;
    Ok(Json(result))
}
