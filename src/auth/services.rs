use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use tracing::{info, warn};

use super::dto::{AuthResponse, RegisterRequest};
use super::jwt::JwtKeys;
use super::oauth::{OAuthProfile, Provider};
use super::password::{hash_password_blocking, verify_password_blocking};
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::users::repo_types::{NewUser, User, UserRole};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Banned accounts cannot obtain tokens or act with ones issued earlier.
pub fn ensure_can_sign_in(user: &User) -> AppResult<()> {
    if !user.is_active {
        warn!(user_id = %user.id, "disabled account refused");
        return Err(AppError::Forbidden("Account is disabled".into()));
    }
    Ok(())
}

pub fn issue_tokens(keys: &JwtKeys, user: User) -> AppResult<AuthResponse> {
    let access_token = keys.sign_access(user.id, user.role)?;
    let refresh_token = keys.sign_refresh(user.id, user.role)?;
    Ok(AuthResponse {
        access_token,
        refresh_token,
        user,
    })
}

pub async fn register(db: &PgPool, req: RegisterRequest) -> AppResult<User> {
    if User::find_by_email(db, &req.email).await?.is_some() {
        warn!(email = %req.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password_blocking(req.password).await?;
    let new = NewUser {
        name: req.name,
        email: req.email,
        password_hash: Some(hash),
        location: req.location,
        profile_photo: req.profile_photo,
        is_public: req.is_public,
        availability: req.availability,
        role: UserRole::User,
    };
    let user = User::create(db, &new).await.map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict("Email already registered".into())
        } else {
            AppError::from(e)
        }
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Local credential login. Disabled accounts are refused before the
/// password is looked at.
pub async fn authenticate(db: &PgPool, email: &str, password: &str) -> AppResult<User> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AppError::field("email", "Invalid email"));
    }

    let Some(user) = User::find_by_email(db, &email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };
    ensure_can_sign_in(&user)?;

    let Some(hash) = user.password_hash.clone() else {
        warn!(user_id = %user.id, "password login on oauth-only account");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };
    if !verify_password_blocking(password.to_string(), hash).await? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(user)
}

/// Defaults for an account first seen through an OAuth provider.
pub fn oauth_new_user(provider: Provider, profile: &OAuthProfile, name_hint: Option<&str>) -> NewUser {
    let name = profile
        .name
        .as_deref()
        .or(name_hint)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(provider.fallback_name())
        .to_string();
    NewUser {
        name,
        email: normalize_email(&profile.email),
        password_hash: None,
        location: None,
        profile_photo: profile.picture.clone(),
        is_public: true,
        availability: vec!["Weekdays".into()],
        role: UserRole::User,
    }
}

/// Log into the account matching the provider email, creating it on first
/// sight.
pub async fn find_or_create_oauth_user(
    db: &PgPool,
    provider: Provider,
    profile: &OAuthProfile,
    name_hint: Option<&str>,
) -> AppResult<User> {
    let new = oauth_new_user(provider, profile, name_hint);
    if !is_valid_email(&new.email) {
        return Err(AppError::Unauthorized("Provider returned no usable email".into()));
    }

    if let Some(user) = User::find_by_email(db, &new.email).await? {
        ensure_can_sign_in(&user)?;
        info!(user_id = %user.id, provider = provider.as_str(), "oauth login");
        return Ok(user);
    }

    let user = match User::create(db, &new).await {
        Ok(user) => user,
        // A concurrent callback created the account first.
        Err(e) if is_unique_violation(&e) => User::find_by_email(db, &new.email)
            .await?
            .ok_or(AppError::NotFound("User"))?,
        Err(e) => return Err(e.into()),
    };
    ensure_can_sign_in(&user)?;
    info!(user_id = %user.id, provider = provider.as_str(), "oauth user created");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::user;

    fn profile(name: Option<&str>) -> OAuthProfile {
        OAuthProfile {
            email: " New.Person@Gmail.com".into(),
            name: name.map(Into::into),
            picture: Some("https://example.com/p.png".into()),
        }
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.de"));
    }

    #[test]
    fn oauth_defaults_are_permissive() {
        let new = oauth_new_user(Provider::Google, &profile(Some("New Person")), None);
        assert_eq!(new.email, "new.person@gmail.com");
        assert_eq!(new.name, "New Person");
        assert_eq!(new.role, UserRole::User);
        assert!(new.is_public);
        assert!(new.password_hash.is_none());
        assert_eq!(new.availability, vec!["Weekdays".to_string()]);
        assert_eq!(new.profile_photo.as_deref(), Some("https://example.com/p.png"));
    }

    #[test]
    fn oauth_name_falls_back_to_hint_then_provider() {
        let hinted = oauth_new_user(Provider::Apple, &profile(None), Some("Hinted"));
        assert_eq!(hinted.name, "Hinted");
        let fallback = oauth_new_user(Provider::Apple, &profile(None), Some("  "));
        assert_eq!(fallback.name, "Apple User");
    }

    #[test]
    fn banned_user_cannot_sign_in() {
        let mut banned = user("Mallory");
        banned.is_active = false;
        assert!(matches!(ensure_can_sign_in(&banned), Err(AppError::Forbidden(_))));
        assert!(ensure_can_sign_in(&user("Alice")).is_ok());
    }

    #[test]
    fn issued_tokens_carry_role() {
        let keys = JwtKeys::from_config(&crate::config::JwtConfig {
            secret: "s".into(),
            issuer: "i".into(),
            audience: "a".into(),
            ttl_minutes: 5,
            refresh_ttl_minutes: 10,
        });
        let admin = crate::testing::admin("Root");
        let id = admin.id;
        let resp = issue_tokens(&keys, admin).unwrap();
        let claims = keys.verify(&resp.access_token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, UserRole::Admin);
        assert!(keys.verify_refresh(&resp.refresh_token).is_ok());
    }
}
