use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::CreateRatingRequest,
    repo,
    repo_types::{AdminRatingView, Rating, RatingView},
    services,
};
use crate::{
    auth::{AdminUser, AuthUser},
    error::AppResult,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ratings", post(create_rating))
        .route("/ratings/user/:id", get(ratings_for_user))
        .route("/ratings/all", get(all_ratings))
}

#[instrument(skip(state, payload))]
pub async fn create_rating(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(mut payload): Json<CreateRatingRequest>,
) -> AppResult<(StatusCode, Json<Rating>)> {
    payload.validate()?;
    let rating = services::submit_rating(&state.db, caller.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

#[instrument(skip(state))]
pub async fn ratings_for_user(
    State(state): State<AppState>,
    _caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<RatingView>>> {
    Ok(Json(repo::list_for_user(&state.db, id).await?))
}

#[instrument(skip(state))]
pub async fn all_ratings(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<AdminRatingView>>> {
    Ok(Json(repo::list_all(&state.db).await?))
}
