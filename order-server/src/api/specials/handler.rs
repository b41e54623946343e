//! Special Dish API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::repository::{RepoError, SpecialDishRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::models::{AvailabilityUpdate, SpecialDish, SpecialDishCreate, SpecialDishUpdate};
use shared::util::now_millis;

fn validate_window(valid_from: Option<i64>, valid_until: Option<i64>) -> AppResult<()> {
    if let (Some(from), Some(until)) = (valid_from, valid_until)
        && from > until
    {
        return Err(AppError::validation("valid_from must not be after valid_until"));
    }
    Ok(())
}

/// GET /api/specials
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<SpecialDish>>> {
    let repo = SpecialDishRepository::new(state.db.clone());
    Ok(Json(repo.find_all(None)?))
}

/// GET /api/specials/available - offered right now
pub async fn list_available(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<SpecialDish>>> {
    let repo = SpecialDishRepository::new(state.db.clone());
    Ok(Json(repo.find_available(now_millis())?))
}

/// GET /api/specials/category/:category_id
pub async fn list_by_category(
    State(state): State<ServerState>,
    Path(category_id): Path<i64>,
) -> AppResult<Json<Vec<SpecialDish>>> {
    let repo = SpecialDishRepository::new(state.db.clone());
    Ok(Json(repo.find_all(Some(category_id))?))
}

/// GET /api/specials/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<SpecialDish>> {
    let repo = SpecialDishRepository::new(state.db.clone());
    let dish = repo.find_by_id(id)?.ok_or(RepoError::SpecialNotFound(id))?;
    Ok(Json(dish))
}

/// POST /api/specials
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SpecialDishCreate>,
) -> AppResult<Json<SpecialDish>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_price(payload.price)?;
    validate_window(payload.valid_from, payload.valid_until)?;

    let repo = SpecialDishRepository::new(state.db.clone());
    let dish = repo.create(payload)?;
    tracing::info!(special_id = dish.id, name = %dish.name, price = %dish.price, "Special dish created");
    Ok(Json(dish))
}

/// PUT /api/specials/:id - partial update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SpecialDishUpdate>,
) -> AppResult<Json<SpecialDish>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
    }
    validate_window(payload.valid_from, payload.valid_until)?;

    let repo = SpecialDishRepository::new(state.db.clone());
    Ok(Json(repo.update(id, payload)?))
}

/// PATCH /api/specials/:id/availability
pub async fn set_availability(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AvailabilityUpdate>,
) -> AppResult<Json<SpecialDish>> {
    let repo = SpecialDishRepository::new(state.db.clone());
    Ok(Json(repo.set_availability(id, payload.is_available)?))
}

/// DELETE /api/specials/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = SpecialDishRepository::new(state.db.clone());
    repo.delete(id)?;
    tracing::info!(special_id = id, "Special dish deleted");
    Ok(Json(true))
}
