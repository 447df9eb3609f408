use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{AuthResponse, LoginRequest, OAuthCallbackRequest, RefreshRequest, RegisterRequest},
    extractors::AuthUser,
    jwt::JwtKeys,
    oauth::Provider,
    services,
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::{dto::UserProfile, repo_types::User, services::load_profile},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/oauth/:provider/callback", post(oauth_callback))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    payload.validate()?;
    let user = services::register(&state.db, payload).await?;
    let keys = JwtKeys::from_ref(&state);
    Ok((StatusCode::CREATED, Json(services::issue_tokens(&keys, user)?)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = services::authenticate(&state.db, &payload.email, &payload.password).await?;
    let keys = JwtKeys::from_ref(&state);
    Ok(Json(services::issue_tokens(&keys, user)?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|e| AppError::Unauthorized(e.to_string()))?;

    // Role and ban state are re-read so a refresh never outlives a ban.
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    services::ensure_can_sign_in(&user)?;

    Ok(Json(services::issue_tokens(&keys, user)?))
}

#[instrument(skip(state, payload))]
pub async fn oauth_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Json(payload): Json<OAuthCallbackRequest>,
) -> AppResult<Json<AuthResponse>> {
    let provider = match provider.as_str() {
        "google" => Provider::Google,
        "apple" => Provider::Apple,
        _ => return Err(AppError::NotFound("OAuth provider")),
    };
    if !state.identity.is_enabled(provider) {
        return Err(AppError::BadRequest(format!(
            "{} sign-in is not configured",
            provider.as_str()
        )));
    }
    if payload.code.trim().is_empty() {
        return Err(AppError::field("code", "Authorization code is required"));
    }

    let profile = state
        .identity
        .exchange_code(provider, payload.code.trim())
        .await
        .map_err(|e| {
            warn!(error = ?e, provider = provider.as_str(), "oauth exchange failed");
            AppError::Unauthorized("OAuth sign-in failed".into())
        })?;

    let user =
        services::find_or_create_oauth_user(&state.db, provider, &profile, payload.name.as_deref())
            .await?;
    let keys = JwtKeys::from_ref(&state);
    Ok(Json(services::issue_tokens(&keys, user)?))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    caller: AuthUser,
) -> AppResult<Json<UserProfile>> {
    let user = User::find_by_id(&state.db, caller.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    Ok(Json(load_profile(&state.db, user).await?))
}

#[cfg(test)]
mod tests {
    use crate::app::build_app;
    use crate::state::AppState;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn me_requires_a_token() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(Request::get("/api/v1/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn register_rejects_invalid_fields_before_db() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(post_json(
                "/api/v1/auth/register",
                r#"{"name":"A","email":"nope","password":"short"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["fields"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn login_rejects_malformed_email_before_db() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(post_json(
                "/api/v1/auth/login",
                r#"{"email":"not-an-email","password":"whatever1"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refresh_rejects_garbage_token() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(post_json("/api/v1/auth/refresh", r#"{"refresh_token":"abc"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_oauth_provider_is_not_found() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(post_json("/api/v1/auth/oauth/myspace/callback", r#"{"code":"x"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn oauth_callback_requires_code() {
        let app = build_app(AppState::fake());
        let res = app
            .oneshot(post_json("/api/v1/auth/oauth/google/callback", r#"{"code":"  "}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
