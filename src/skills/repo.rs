use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::dto::CreateSkillRequest;
use super::repo_types::{Skill, SkillChanges, SkillKind};
use super::services::SearchFilter;
use crate::users::repo_types::User;

pub async fn create(
    db: &PgPool,
    user_id: Uuid,
    req: &CreateSkillRequest,
) -> Result<Skill, sqlx::Error> {
    sqlx::query_as::<_, Skill>(
        r#"
        INSERT INTO skills (id, user_id, name, description, category, level, kind)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&req.name)
    .bind(&req.description)
    .bind(&req.category)
    .bind(req.level)
    .bind(req.kind)
    .fetch_one(db)
    .await
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    kind: Option<SkillKind>,
) -> Result<Vec<Skill>, sqlx::Error> {
    sqlx::query_as::<_, Skill>(
        r#"
        SELECT *
          FROM skills
         WHERE user_id = $1
           AND ($2::skill_kind IS NULL OR kind = $2)
         ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .fetch_all(db)
    .await
}

/// All skills owned by any of `user_ids`, newest first.
pub async fn list_for_users(db: &PgPool, user_ids: &[Uuid]) -> Result<Vec<Skill>, sqlx::Error> {
    sqlx::query_as::<_, Skill>(
        r#"
        SELECT *
          FROM skills
         WHERE user_id = ANY($1)
         ORDER BY created_at DESC
        "#,
    )
    .bind(user_ids)
    .fetch_all(db)
    .await
}

pub async fn find_by_id_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<Skill>, sqlx::Error> {
    sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

/// Owner-scoped update; `None` when the skill is absent or not owned.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    changes: &SkillChanges,
) -> Result<Option<Skill>, sqlx::Error> {
    sqlx::query_as::<_, Skill>(
        r#"
        UPDATE skills
           SET name = COALESCE($3, name),
               description = COALESCE($4, description),
               category = COALESCE($5, category),
               level = COALESCE($6, level),
               updated_at = NOW()
         WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&changes.name)
    .bind(&changes.description)
    .bind(&changes.category)
    .bind(changes.level)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<Skill>, sqlx::Error> {
    sqlx::query_as::<_, Skill>("DELETE FROM skills WHERE id = $1 AND user_id = $2 RETURNING *")
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
}

/// Listed users matching `filter`. A name hit alone is enough unless the
/// filter also names a category or level; those must hold on an offered skill.
pub async fn search_users(db: &PgPool, filter: &SearchFilter) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT u.*
          FROM users u
         WHERE u.is_public AND u.is_active AND u.role = 'user'
           AND (
                ($2::text IS NULL AND $3::skill_level IS NULL
                     AND ($1::text IS NULL OR u.name ILIKE $1))
                OR EXISTS (
                    SELECT 1
                      FROM skills s
                     WHERE s.user_id = u.id
                       AND s.kind = 'offered'
                       AND ($1::text IS NULL
                            OR s.name ILIKE $1
                            OR s.description ILIKE $1
                            OR u.name ILIKE $1)
                       AND ($2::text IS NULL OR s.category = $2)
                       AND ($3::skill_level IS NULL OR s.level = $3)
                )
           )
         ORDER BY u.created_at DESC
        "#,
    )
    .bind(filter.like_pattern())
    .bind(&filter.category)
    .bind(filter.level)
    .fetch_all(db)
    .await
}
