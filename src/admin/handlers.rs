use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{validate_changes, CreateMessageRequest},
    repo,
    repo_types::{AdminMessage, MessageChanges, PlatformStats},
    services,
};
use crate::{
    auth::{AdminUser, AuthUser},
    error::{AppError, AppResult},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/messages", get(list_messages).post(create_message))
        .route("/admin/messages/:id", put(update_message).delete(delete_message))
        .route("/admin/stats", get(stats))
}

#[instrument(skip(state))]
pub async fn list_messages(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<AdminMessage>>> {
    Ok(Json(repo::list(&state.db, !caller.is_admin()).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_message(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(mut payload): Json<CreateMessageRequest>,
) -> AppResult<(StatusCode, Json<AdminMessage>)> {
    payload.validate()?;
    let message = services::create_message(&state.db, &payload).await?;
    info!(admin_id = %admin.id, message_id = %message.id, "admin message published");
    Ok((StatusCode::CREATED, Json(message)))
}

#[instrument(skip(state, changes))]
pub async fn update_message(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(mut changes): Json<MessageChanges>,
) -> AppResult<Json<AdminMessage>> {
    validate_changes(&mut changes)?;
    repo::update(&state.db, id, &changes)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("Admin message"))
}

#[instrument(skip(state))]
pub async fn delete_message(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    repo::delete(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("Admin message"))?;
    Ok(Json(json!({ "message": "Admin message deleted successfully" })))
}

#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> AppResult<Json<PlatformStats>> {
    Ok(Json(repo::stats(&state.db).await?))
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
    async fn only_admins_publish() {
        let state = AppState::fake();
        let token = bearer(&state, Uuid::new_v4(), UserRole::User);
        let res = build_app(state)
            .oneshot(
                Request::post("/api/v1/admin/messages")
                    .header("authorization", token)
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"Hi","content":"there"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn empty_update_is_a_bad_request() {
        let state = AppState::fake();
        let token = bearer(&state, Uuid::new_v4(), UserRole::Admin);
        let res = build_app(state)
            .oneshot(
                Request::put(format!("/api/v1/admin/messages/{}", Uuid::new_v4()))
                    .header("authorization", token)
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"id":"nope"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stats_are_admin_only() {
        let state = AppState::fake();
        let token = bearer(&state, Uuid::new_v4(), UserRole::User);
        let res = build_app(state)
            .oneshot(
                Request::get("/api/v1/admin/stats")
                    .header("authorization", token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
