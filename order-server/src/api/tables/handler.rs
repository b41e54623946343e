//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{DiningTableRepository, RepoError, TableFilter};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_capacity, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{
    DiningTable, DiningTableCreate, DiningTableUpdate, TableKind, TableStats, TableStatus,
    TableStatusChange, TableStatusUpdate,
};
use shared::order::{CloseTableRequest, Order, TableClosure};

/// Query params for listing tables
#[derive(Debug, Deserialize)]
pub struct TableQuery {
    pub kind: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

impl TableQuery {
    fn into_filter(self) -> AppResult<TableFilter> {
        let kind = self
            .kind
            .map(|k| {
                k.parse::<TableKind>()
                    .map_err(|_| AppError::validation(format!("Invalid table kind: {}", k)))
            })
            .transpose()?;
        let status = self
            .status
            .map(|s| s.parse::<TableStatus>().map_err(|_| AppError::invalid_status(s)))
            .transpose()?;
        Ok(TableFilter {
            kind,
            status,
            include_inactive: self.include_inactive,
        })
    }
}

/// GET /api/tables - list tables by kind, then number
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<TableQuery>,
) -> AppResult<Json<Vec<DiningTable>>> {
    let filter = query.into_filter()?;
    let repo = DiningTableRepository::new(state.db.clone());
    Ok(Json(repo.find_all(&filter)?))
}

/// GET /api/tables/stats
pub async fn stats(State(state): State<ServerState>) -> AppResult<Json<TableStats>> {
    let repo = DiningTableRepository::new(state.db.clone());
    Ok(Json(repo.stats()?))
}

/// GET /api/tables/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.find_by_id(id)?.ok_or(RepoError::TableNotFound(id))?;
    Ok(Json(table))
}

/// POST /api/tables
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_required_text(&payload.number, "number", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.location, "location", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_capacity(payload.capacity)?;

    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.create(payload)?;
    tracing::info!(table_id = table.id, number = %table.number, kind = %table.kind, "Table created");
    Ok(Json(table))
}

/// PUT /api/tables/:id - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    if let Some(number) = &payload.number {
        validate_required_text(number, "number", MAX_SHORT_TEXT_LEN)?;
    }
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.location, "location", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(capacity) = payload.capacity {
        validate_capacity(capacity)?;
    }

    let repo = DiningTableRepository::new(state.db.clone());
    Ok(Json(repo.update(id, payload)?))
}

/// DELETE /api/tables/:id - soft delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = DiningTableRepository::new(state.db.clone());
    repo.delete(id)?;
    tracing::info!(table_id = id, "Table deleted");
    Ok(Json(true))
}

/// PATCH /api/tables/:id/status - manual status change
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TableStatusUpdate>,
) -> AppResult<Json<DiningTable>> {
    let status: TableStatus = payload
        .status
        .parse()
        .map_err(|_| AppError::invalid_status(payload.status.clone()))?;
    validate_optional_text(&payload.changed_by, "changed_by", MAX_NAME_LEN)?;
    validate_optional_text(&payload.reason, "reason", MAX_NOTE_LEN)?;

    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.set_status(id, status, payload.changed_by, payload.reason)?;
    Ok(Json(table))
}

/// GET /api/tables/:id/history - status changes, newest first
pub async fn history(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<TableStatusChange>>> {
    let repo = DiningTableRepository::new(state.db.clone());
    if repo.find_by_id(id)?.is_none() {
        return Err(RepoError::TableNotFound(id).into());
    }
    Ok(Json(repo.history(id)?))
}

/// GET /api/tables/:id/orders - open orders, newest first
pub async fn orders(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.orders.orders_for_table(id)?))
}

/// POST /api/tables/:id/close - settle every open order
pub async fn close(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CloseTableRequest>,
) -> AppResult<Json<TableClosure>> {
    Ok(Json(state.orders.close_table(id, &payload)?))
}
