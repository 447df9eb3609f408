use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateSkillRequest, SearchQuery, SkillListQuery},
    repo,
    repo_types::{Skill, SkillChanges},
    services::SearchFilter,
};
use crate::{
    auth::AuthUser,
    error::{is_foreign_key_violation, AppError, AppResult},
    state::AppState,
    users::{
        dto::UserProfile,
        services::{load_profiles, require_active},
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/skills", get(list_my_skills).post(create_skill))
        .route("/skills/search", get(search))
        .route("/skills/:id", put(update_skill).delete(delete_skill))
}

#[instrument(skip(state))]
pub async fn list_my_skills(
    State(state): State<AppState>,
    caller: AuthUser,
    Query(query): Query<SkillListQuery>,
) -> AppResult<Json<Vec<Skill>>> {
    Ok(Json(repo::list_by_user(&state.db, caller.id, query.kind).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_skill(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(mut payload): Json<CreateSkillRequest>,
) -> AppResult<(StatusCode, Json<Skill>)> {
    payload.validate()?;
    require_active(&state.db, caller.id).await?;
    let skill = repo::create(&state.db, caller.id, &payload).await?;
    info!(user_id = %caller.id, skill_id = %skill.id, kind = ?skill.kind, "skill created");
    Ok((StatusCode::CREATED, Json(skill)))
}

#[instrument(skip(state, changes))]
pub async fn update_skill(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(changes): Json<SkillChanges>,
) -> AppResult<Json<Skill>> {
    if changes.is_empty() {
        return Err(AppError::BadRequest("No valid fields to update".into()));
    }
    if matches!(changes.name.as_deref(), Some(n) if n.trim().is_empty()) {
        return Err(AppError::field("name", "Skill name cannot be empty"));
    }
    require_active(&state.db, caller.id).await?;
    let skill = repo::update(&state.db, id, caller.id, &changes)
        .await?
        .ok_or(AppError::NotFound("Skill"))?;
    Ok(Json(skill))
}

#[instrument(skip(state))]
pub async fn delete_skill(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    require_active(&state.db, caller.id).await?;
    repo::delete(&state.db, id, caller.id)
        .await
        .map_err(delete_error)?
        .ok_or(AppError::NotFound("Skill"))?;
    info!(user_id = %caller.id, skill_id = %id, "skill deleted");
    Ok(Json(json!({ "message": "Skill deleted successfully" })))
}

/// Skills named by a swap request stay until that request is gone.
fn delete_error(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        AppError::Conflict("Skill is part of a swap request and cannot be deleted".into())
    } else {
        AppError::Database(err)
    }
}

#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    _caller: AuthUser,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<UserProfile>>> {
    let filter = SearchFilter::from(query);
    let users = repo::search_users(&state.db, &filter).await?;
    Ok(Json(load_profiles(&state.db, users).await?))
}
