use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{validate_profile_changes, BanResponse, UserProfile},
    repo_types::{ProfileChanges, User},
    services::{check_ban_target, load_profile, load_profiles, require_active},
};
use crate::{
    auth::{handlers::register, AdminUser, AuthUser},
    error::{AppError, AppResult},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(register))
        .route("/users/:id", get(get_user).put(update_user))
        .route("/users/:id/ban", put(ban_user))
        .route("/users/:id/unban", put(unban_user))
}

/// Admins see every non-admin account; members see listed ones only.
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<Vec<UserProfile>>> {
    let users = User::list(&state.db, !caller.is_admin()).await?;
    Ok(Json(load_profiles(&state.db, users).await?))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserProfile>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .filter(|u| u.is_listed() || u.id == caller.id || caller.is_admin())
        .ok_or(AppError::NotFound("User"))?;
    Ok(Json(load_profile(&state.db, user).await?))
}

#[instrument(skip(state, changes))]
pub async fn update_user(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<Uuid>,
    Json(mut changes): Json<ProfileChanges>,
) -> AppResult<Json<UserProfile>> {
    if caller.id != id {
        return Err(AppError::Forbidden("You can only edit your own profile".into()));
    }
    validate_profile_changes(&mut changes)?;
    require_active(&state.db, caller.id).await?;

    let user = User::update_profile(&state.db, id, &changes)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    info!(user_id = %id, "profile updated");
    Ok(Json(load_profile(&state.db, user).await?))
}

#[instrument(skip(state))]
pub async fn ban_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BanResponse>> {
    if admin.id == id {
        return Err(AppError::BadRequest("Admins cannot ban themselves".into()));
    }
    set_active(&state, admin.id, id, false).await
}

#[instrument(skip(state))]
pub async fn unban_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BanResponse>> {
    set_active(&state, admin.id, id, true).await
}

async fn set_active(
    state: &AppState,
    admin_id: Uuid,
    id: Uuid,
    active: bool,
) -> AppResult<Json<BanResponse>> {
    let target = User::find_by_id(&state.db, id).await?;
    check_ban_target(admin_id, target.as_ref(), active)?;
    let user = User::set_active(&state.db, id, active)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    info!(%admin_id, user_id = %id, active, "user active flag changed");
    Ok(Json(user.into()))
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
    async fn listing_requires_authentication() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/api/v1/users").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn ban_is_admin_only() {
        let state = AppState::fake();
        let token = bearer(&state, Uuid::new_v4(), UserRole::User);
        let res = build_app(state)
            .oneshot(
                Request::put(format!("/api/v1/users/{}/ban", Uuid::new_v4()))
                    .header("authorization", token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_cannot_ban_self() {
        let state = AppState::fake();
        let me = Uuid::new_v4();
        let token = bearer(&state, me, UserRole::Admin);
        let res = build_app(state)
            .oneshot(
                Request::put(format!("/api/v1/users/{me}/ban"))
                    .header("authorization", token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn editing_someone_else_is_forbidden() {
        let state = AppState::fake();
        let token = bearer(&state, Uuid::new_v4(), UserRole::User);
        let res = build_app(state)
            .oneshot(
                Request::put(format!("/api/v1/users/{}", Uuid::new_v4()))
                    .header("authorization", token)
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"name":"Hijack"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
