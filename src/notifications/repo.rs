use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{NewNotification, Notification};

pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    new: &NewNotification,
) -> Result<Notification, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        r#"
        INSERT INTO notifications (id, user_id, title, message, kind, related_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.user_id)
    .bind(&new.title)
    .bind(&new.message)
    .bind(new.kind)
    .bind(new.related_id)
    .fetch_one(&mut **tx)
    .await
}

/// Deliver an admin message to every active non-admin user. Returns the
/// number of recipients.
pub async fn broadcast_admin_message_tx(
    tx: &mut Transaction<'_, Postgres>,
    message_id: Uuid,
    title: &str,
    content: &str,
) -> Result<u64, sqlx::Error> {
    let done = sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, title, message, kind, related_id)
        SELECT gen_random_uuid(), u.id, $1, $2, 'admin_message', $3
          FROM users u
         WHERE u.is_active AND u.role = 'user'
        "#,
    )
    .bind(title)
    .bind(content)
    .bind(message_id)
    .execute(&mut **tx)
    .await?;
    Ok(done.rows_affected())
}

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        r#"
        SELECT *
          FROM notifications
         WHERE user_id = $1
         ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn mark_read(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(
        r#"
        UPDATE notifications
           SET is_read = TRUE
         WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn mark_all_read(db: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let done = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(done.rows_affected())
}
