use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::CatalogSnapshot;
use shared::util::now_millis;

/// GET /api/sync - categories, full menu and the specials offered now
pub async fn catalog(State(state): State<ServerState>) -> AppResult<Json<CatalogSnapshot>> {
    let snapshot = state.catalog.snapshot(now_millis())?;
    tracing::debug!(
        categories = snapshot.categories.len(),
        menu_items = snapshot.menu_items.len(),
        specials = snapshot.specials.len(),
        "Catalog sync served"
    );
    Ok(Json(snapshot))
}
