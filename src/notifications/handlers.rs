use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use super::{repo, repo_types::Notification};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    users::services::require_active,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_mine))
        .route("/notifications/read-all", put(mark_all_read))
        .route("/notifications/:id/read", put(mark_read))
}

#[instrument(skip(state))]
pub async fn list_mine(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<Notification>>> {
    Ok(Json(repo::list_for_user(&state.db, caller.id).await?))
}

#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Notification>> {
    require_active(&state.db, caller.id).await?;
    repo::mark_read(&state.db, id, caller.id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Notification"))
}

#[instrument(skip(state))]
pub async fn mark_all_read(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Value>> {
    require_active(&state.db, caller.id).await?;
    let updated = repo::mark_all_read(&state.db, caller.id).await?;
    Ok(Json(json!({ "updated": updated })))
}
