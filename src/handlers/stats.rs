use axum::{extract::State, Json};
use chrono::Utc;

use crate::engine::UserStats;
use crate::state::AppState;

use super::ApiError;

/// GET /api/stats
pub async fn user_stats(State(state): State<AppState>) -> Result<Json<UserStats>, ApiError> {
  Ok(Json(state.engine.user_stats(Utc::now())?))
}
