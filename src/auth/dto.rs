use serde::{Deserialize, Serialize};

use super::password::MIN_PASSWORD_LEN;
use super::services::{is_valid_email, normalize_email};
use crate::error::{AppResult, Validator};
use crate::users::repo_types::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub location: Option<String>,
    pub profile_photo: Option<String>,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    pub availability: Vec<String>,
}

fn default_public() -> bool {
    true
}

impl RegisterRequest {
    pub fn validate(&mut self) -> AppResult<()> {
        self.email = normalize_email(&self.email);
        self.name = self.name.trim().to_string();
        Validator::new()
            .check(!self.name.is_empty(), "name", "Name is required")
            .check(is_valid_email(&self.email), "email", "Invalid email")
            .check(
                self.password.chars().count() >= MIN_PASSWORD_LEN,
                "password",
                "Password must be at least 8 characters",
            )
            .finish()
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for token refresh.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Body posted to an OAuth callback. Apple only sends the name on first
/// authorization, so the client may forward it.
#[derive(Debug, Deserialize)]
pub struct OAuthCallbackRequest {
    pub code: String,
    pub name: Option<String>,
}

/// Response returned after login, register, refresh or OAuth.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}
