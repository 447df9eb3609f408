use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>, // absent for OAuth-only accounts
    pub location: Option<String>,
    pub profile_photo: Option<String>,
    pub is_public: bool,
    pub availability: Vec<String>,
    pub rating: f64,
    pub total_swaps: i32,
    pub is_active: bool,
    pub role: UserRole,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Whether other members may see this user in listings and search.
    pub fn is_listed(&self) -> bool {
        self.is_public && self.is_active && !self.is_admin()
    }
}

/// Fields needed to insert a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub location: Option<String>,
    pub profile_photo: Option<String>,
    pub is_public: bool,
    pub availability: Vec<String>,
    pub role: UserRole,
}

impl NewUser {
    pub fn into_user(self, id: Uuid, now: OffsetDateTime) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            location: self.location,
            profile_photo: self.profile_photo,
            is_public: self.is_public,
            availability: self.availability,
            rating: 0.0,
            total_swaps: 0,
            is_active: true,
            role: self.role,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Self-service profile changes; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub location: Option<String>,
    pub profile_photo: Option<String>,
    pub is_public: Option<bool>,
    pub availability: Option<Vec<String>>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.profile_photo.is_none()
            && self.is_public.is_none()
            && self.availability.is_none()
    }

    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(location) = &self.location {
            user.location = Some(location.clone());
        }
        if let Some(photo) = &self.profile_photo {
            user.profile_photo = Some(photo.clone());
        }
        if let Some(is_public) = self.is_public {
            user.is_public = is_public;
        }
        if let Some(availability) = &self.availability {
            user.availability = availability.clone();
        }
    }
}
