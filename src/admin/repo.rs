use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::dto::CreateMessageRequest;
use super::repo_types::{AdminMessage, MessageChanges, PlatformStats};

pub async fn create_tx(
    tx: &mut Transaction<'_, Postgres>,
    req: &CreateMessageRequest,
) -> Result<AdminMessage, sqlx::Error> {
    sqlx::query_as::<_, AdminMessage>(
        r#"
        INSERT INTO admin_messages (id, title, content, kind, is_active)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.title)
    .bind(&req.content)
    .bind(req.kind)
    .bind(req.is_active)
    .fetch_one(&mut **tx)
    .await
}

pub async fn list(db: &PgPool, active_only: bool) -> Result<Vec<AdminMessage>, sqlx::Error> {
    sqlx::query_as::<_, AdminMessage>(
        r#"
        SELECT *
          FROM admin_messages
         WHERE is_active OR NOT $1
         ORDER BY created_at DESC
        "#,
    )
    .bind(active_only)
    .fetch_all(db)
    .await
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    changes: &MessageChanges,
) -> Result<Option<AdminMessage>, sqlx::Error> {
    sqlx::query_as::<_, AdminMessage>(
        r#"
        UPDATE admin_messages
           SET title = COALESCE($2, title),
               content = COALESCE($3, content),
               kind = COALESCE($4, kind),
               is_active = COALESCE($5, is_active)
         WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.title)
    .bind(&changes.content)
    .bind(changes.kind)
    .bind(changes.is_active)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<Option<AdminMessage>, sqlx::Error> {
    sqlx::query_as::<_, AdminMessage>("DELETE FROM admin_messages WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn stats(db: &PgPool) -> Result<PlatformStats, sqlx::Error> {
    sqlx::query_as::<_, PlatformStats>(
        r#"
        SELECT u.total_users, u.active_users, u.banned_users, u.public_users,
               k.total_skills,
               w.total_swaps, w.pending_swaps, w.accepted_swaps,
               w.completed_swaps, w.rejected_swaps, w.cancelled_swaps
          FROM (SELECT COUNT(*) AS total_users,
                       COUNT(*) FILTER (WHERE is_active) AS active_users,
                       COUNT(*) FILTER (WHERE NOT is_active) AS banned_users,
                       COUNT(*) FILTER (WHERE is_public) AS public_users
                  FROM users
                 WHERE role = 'user') u,
               (SELECT COUNT(*) AS total_skills FROM skills) k,
               (SELECT COUNT(*) AS total_swaps,
                       COUNT(*) FILTER (WHERE status = 'pending') AS pending_swaps,
                       COUNT(*) FILTER (WHERE status = 'accepted') AS accepted_swaps,
                       COUNT(*) FILTER (WHERE status = 'completed') AS completed_swaps,
                       COUNT(*) FILTER (WHERE status = 'rejected') AS rejected_swaps,
                       COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled_swaps
                  FROM swap_requests) w
        "#,
    )
    .fetch_one(db)
    .await
}
