//! Fixtures shared by unit tests.

use std::borrow::Cow;
use std::fmt;

use axum::extract::FromRef;
use sqlx::error::{DatabaseError, ErrorKind};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;
use crate::skills::repo_types::{Skill, SkillKind, SkillLevel};
use crate::state::AppState;
use crate::users::repo_types::{NewUser, User, UserRole};

pub fn user(name: &str) -> User {
    NewUser {
        name: name.into(),
        email: format!("{}@example.com", name.to_lowercase()),
        password_hash: None,
        location: None,
        profile_photo: None,
        is_public: true,
        availability: vec!["Weekends".into()],
        role: UserRole::User,
    }
    .into_user(Uuid::new_v4(), OffsetDateTime::now_utc())
}

pub fn admin(name: &str) -> User {
    let mut admin = user(name);
    admin.role = UserRole::Admin;
    admin
}

pub fn skill(owner: &User, name: &str, category: &str, level: SkillLevel, kind: SkillKind) -> Skill {
    let now = OffsetDateTime::now_utc();
    Skill {
        id: Uuid::new_v4(),
        user_id: owner.id,
        name: name.into(),
        description: format!("{name} lessons"),
        category: category.into(),
        level,
        kind,
        created_at: now,
        updated_at: now,
    }
}

/// `Authorization` header value carrying a fresh access token.
pub fn bearer(state: &AppState, user_id: Uuid, role: UserRole) -> String {
    let token = JwtKeys::from_ref(state)
        .sign_access(user_id, role)
        .expect("sign access token");
    format!("Bearer {token}")
}

/// Database error carrying only a SQLSTATE code.
#[derive(Debug)]
struct SqlState(&'static str);

impl fmt::Display for SqlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sqlstate {}", self.0)
    }
}

impl std::error::Error for SqlState {}

impl DatabaseError for SqlState {
    fn message(&self) -> &str {
        "constraint violation"
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.0))
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        match self.0 {
            "23505" => ErrorKind::UniqueViolation,
            "23503" => ErrorKind::ForeignKeyViolation,
            _ => ErrorKind::Other,
        }
    }
}

pub fn db_error(code: &'static str) -> sqlx::Error {
    sqlx::Error::from(SqlState(code))
}
