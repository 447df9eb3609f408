use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateSwapRequest, SwapInbox, UpdateStatusRequest},
    repo,
    repo_types::{SwapRequest, SwapView},
    services,
};
use crate::{
    auth::{AdminUser, AuthUser},
    error::AppResult,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/swaps", post(create_swap))
        .route("/swaps/my-swaps", get(my_swaps))
        .route("/swaps/inbox", get(inbox))
        .route("/swaps/all", get(all_swaps))
        .route("/swaps/:id/status", put(update_status))
        .route("/swaps/:id", delete(delete_swap))
}

#[instrument(skip(state, payload))]
pub async fn create_swap(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(payload): Json<CreateSwapRequest>,
) -> AppResult<(StatusCode, Json<SwapRequest>)> {
    let swap = services::create_swap(&state.db, caller.id, &payload).await?;
    Ok((StatusCode::CREATED, Json(swap)))
}

#[instrument(skip(state))]
pub async fn my_swaps(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<SwapView>>> {
    Ok(Json(repo::list_for_user(&state.db, caller.id).await?))
}

#[instrument(skip(state))]
pub async fn inbox(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<SwapInbox<SwapView>>> {
    let swaps = repo::list_for_user(&state.db, caller.id).await?;
    Ok(Json(SwapInbox::partition(caller.id, swaps)))
}

#[instrument(skip(state))]
pub async fn all_swaps(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<Vec<SwapView>>> {
    Ok(Json(repo::list_all(&state.db).await?))
}

#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<SwapRequest>> {
    let swap = services::change_status(&state.db, caller.id, id, payload.status).await?;
    Ok(Json(swap))
}

#[instrument(skip(state))]
pub async fn delete_swap(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    services::delete_swap(&state.db, caller.id, id).await?;
    Ok(Json(json!({ "message": "Swap request deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use crate::app::build_app;
    use crate::state::AppState;
    use crate::testing::bearer;
    use crate::users::repo_types::UserRole;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;
    use uuid::Uuid;

    #[tokio::test]
    async fn admin_listing_is_forbidden_to_users() {
        let state = AppState::fake();
        let token = bearer(&state, Uuid::new_v4(), UserRole::User);
        let res = build_app(state)
            .oneshot(
                Request::get("/api/v1/swaps/all")
                    .header("authorization", token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn creating_requires_authentication() {
        let res = build_app(AppState::fake())
            .oneshot(
                Request::post("/api/v1/swaps")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_status_is_rejected_before_db() {
        let state = AppState::fake();
        let token = bearer(&state, Uuid::new_v4(), UserRole::User);
        let res = build_app(state)
            .oneshot(
                Request::put(format!("/api/v1/swaps/{}/status", Uuid::new_v4()))
                    .header("authorization", token)
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"status":"archived"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
