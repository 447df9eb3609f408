use tracing::{info, warn};
use uuid::Uuid;

use super::{now, MarketStore};
use crate::{
    auth::{
        dto::RegisterRequest,
        oauth::{OAuthProfile, Provider},
        password::{hash_password, verify_password},
        services::{ensure_can_sign_in, is_valid_email, normalize_email, oauth_new_user},
    },
    error::{AppError, AppResult},
    users::{
        dto::validate_profile_changes,
        repo_types::{NewUser, ProfileChanges, UserRole},
    },
};

impl MarketStore {
    /// Sign up with a local password and start a session for the new user.
    pub fn register(&self, mut req: RegisterRequest) -> AppResult<Self> {
        req.validate()?;
        if self.users.iter().any(|u| u.email == req.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        let new = NewUser {
            name: req.name,
            email: req.email,
            password_hash: Some(hash_password(&req.password)?),
            location: req.location,
            profile_photo: req.profile_photo,
            is_public: req.is_public,
            availability: req.availability,
            role: UserRole::User,
        };
        let user = new.into_user(Uuid::new_v4(), now());
        let mut next = self.clone();
        next.current_user = Some(user.id);
        next.users.push(user);
        Ok(next)
    }

    pub fn login(&self, email: &str, password: &str) -> AppResult<Self> {
        let email = normalize_email(email);
        let user = self
            .users
            .iter()
            .find(|u| u.email == email)
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;
        ensure_can_sign_in(user)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;
        if !verify_password(password, hash)? {
            warn!(user_id = %user.id, "store login invalid password");
            return Err(AppError::Unauthorized("Invalid credentials".into()));
        }

        let mut next = self.clone();
        next.current_user = Some(user.id);
        Ok(next)
    }

    /// Sign in with a provider profile, reusing the account that owns the
    /// email or creating exactly one new member.
    pub fn login_with_oauth(
        &self,
        provider: Provider,
        profile: &OAuthProfile,
        name_hint: Option<&str>,
    ) -> AppResult<Self> {
        let new = oauth_new_user(provider, profile, name_hint);
        if !is_valid_email(&new.email) {
            return Err(AppError::Unauthorized("Provider returned no usable email".into()));
        }

        let mut next = self.clone();
        match self.users.iter().find(|u| u.email == new.email) {
            Some(existing) => {
                ensure_can_sign_in(existing)?;
                next.current_user = Some(existing.id);
            }
            None => {
                let user = new.into_user(Uuid::new_v4(), now());
                info!(user_id = %user.id, provider = provider.as_str(), "store oauth user created");
                next.current_user = Some(user.id);
                next.users.push(user);
            }
        }
        Ok(next)
    }

    pub fn logout(&self) -> Self {
        let mut next = self.clone();
        next.current_user = None;
        next
    }

    pub fn update_profile(&self, mut changes: ProfileChanges) -> AppResult<Self> {
        validate_profile_changes(&mut changes)?;
        let id = self.caller()?.id;
        let mut next = self.clone();
        let user = next.user_mut(id)?;
        changes.apply(user);
        user.updated_at = now();
        Ok(next)
    }
}
