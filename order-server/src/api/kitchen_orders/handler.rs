use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::order::KitchenOrder;
use shared::util::now_millis;

/// GET /api/kitchen-orders - active orders, oldest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<KitchenOrder>>> {
    let queue = state.orders.kitchen_queue(now_millis())?;
    Ok(Json(queue))
}
