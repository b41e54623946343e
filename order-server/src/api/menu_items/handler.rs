//! Menu Item API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::repository::{MenuItemRepository, RepoError};
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_required_text,
};
use shared::models::{AvailabilityUpdate, MenuItem, MenuItemCreate, MenuItemUpdate};

#[derive(Debug, Deserialize)]
pub struct MenuItemQuery {
    pub category_id: Option<i64>,
    pub available: Option<bool>,
}

/// GET /api/menu-items - optionally by category and availability
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<MenuItemQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let mut items = repo.find_all(query.category_id)?;
    if let Some(available) = query.available {
        items.retain(|i| i.is_available == available);
    }
    Ok(Json(items))
}

/// GET /api/menu-items/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.find_by_id(id)?.ok_or(RepoError::MenuItemNotFound(id))?;
    Ok(Json(item))
}

/// POST /api/menu-items
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_price(payload.price)?;

    let repo = MenuItemRepository::new(state.db.clone());
    let item = repo.create(payload)?;
    tracing::info!(menu_item_id = item.id, name = %item.name, price = %item.price, "Menu item created");
    Ok(Json(item))
}

/// PUT /api/menu-items/:id - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }

    let repo = MenuItemRepository::new(state.db.clone());
    Ok(Json(repo.update(id, payload)?))
}

/// PATCH /api/menu-items/:id/availability
pub async fn set_availability(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AvailabilityUpdate>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.db.clone());
    Ok(Json(repo.set_availability(id, payload.is_available)?))
}

/// DELETE /api/menu-items/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = MenuItemRepository::new(state.db.clone());
    repo.delete(id)?;
    tracing::info!(menu_item_id = id, "Menu item deleted");
    Ok(Json(true))
}
