use std::collections::HashMap;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::dto::UserProfile;
use super::repo_types::User;
use crate::auth::services::ensure_can_sign_in;
use crate::error::{AppError, AppResult};
use crate::skills::{repo as skills_repo, repo_types::{Skill, SkillKind}};

/// Pair each user with their skills, keeping the order of `users`.
pub fn attach_skills(users: Vec<User>, skills: Vec<Skill>) -> Vec<UserProfile> {
    let mut by_owner: HashMap<Uuid, (Vec<Skill>, Vec<Skill>)> = HashMap::new();
    for skill in skills {
        let entry = by_owner.entry(skill.user_id).or_default();
        match skill.kind {
            SkillKind::Offered => entry.0.push(skill),
            SkillKind::Wanted => entry.1.push(skill),
        }
    }
    users
        .into_iter()
        .map(|user| {
            let (skills_offered, skills_wanted) = by_owner.remove(&user.id).unwrap_or_default();
            UserProfile {
                user,
                skills_offered,
                skills_wanted,
            }
        })
        .collect()
}

/// Only member accounts can be banned or unbanned, and never by themselves.
pub fn check_ban_target(admin_id: Uuid, target: Option<&User>, active: bool) -> AppResult<()> {
    let target = target.ok_or(AppError::NotFound("User"))?;
    if target.id == admin_id && !active {
        return Err(AppError::BadRequest("Admins cannot ban themselves".into()));
    }
    if target.is_admin() {
        return Err(AppError::BadRequest("Admin accounts cannot be moderated".into()));
    }
    Ok(())
}

/// Load the acting user, refusing accounts banned after their token was
/// issued.
pub async fn require_active(db: &PgPool, id: Uuid) -> AppResult<User> {
    let user = User::find_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    ensure_can_sign_in(&user)?;
    Ok(user)
}

pub async fn require_active_tx(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> AppResult<User> {
    let user = User::find_by_id_tx(tx, id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    ensure_can_sign_in(&user)?;
    Ok(user)
}

pub async fn load_profiles(db: &PgPool, users: Vec<User>) -> Result<Vec<UserProfile>, sqlx::Error> {
    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let skills = if ids.is_empty() {
        Vec::new()
    } else {
        skills_repo::list_for_users(db, &ids).await?
    };
    Ok(attach_skills(users, skills))
}

pub async fn load_profile(db: &PgPool, user: User) -> Result<UserProfile, sqlx::Error> {
    let skills = skills_repo::list_by_user(db, user.id, None).await?;
    let (skills_offered, skills_wanted) = skills
        .into_iter()
        .partition(|s| s.kind == SkillKind::Offered);
    Ok(UserProfile {
        user,
        skills_offered,
        skills_wanted,
    })
}
