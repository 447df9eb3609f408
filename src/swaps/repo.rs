use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::dto::CreateSwapRequest;
use super::repo_types::{SwapRequest, SwapStatus, SwapView};

const VIEW_SELECT: &str = r#"
    SELECT sr.*,
           rq.name AS requester_name,
           rq.profile_photo AS requester_photo,
           rc.name AS receiver_name,
           rc.profile_photo AS receiver_photo,
           os.name AS offered_skill_name,
           ws.name AS wanted_skill_name
      FROM swap_requests sr
      JOIN users rq ON rq.id = sr.requester_id
      JOIN users rc ON rc.id = sr.receiver_id
      JOIN skills os ON os.id = sr.offered_skill_id
      JOIN skills ws ON ws.id = sr.wanted_skill_id
"#;

pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    requester_id: Uuid,
    req: &CreateSwapRequest,
) -> Result<SwapRequest, sqlx::Error> {
    sqlx::query_as::<_, SwapRequest>(
        r#"
        INSERT INTO swap_requests
            (id, requester_id, receiver_id, offered_skill_id, wanted_skill_id, message)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(requester_id)
    .bind(req.receiver_id)
    .bind(req.offered_skill_id)
    .bind(req.wanted_skill_id)
    .bind(&req.message)
    .fetch_one(&mut **tx)
    .await
}

/// Row lock held until the transaction ends.
pub async fn lock_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<SwapRequest>, sqlx::Error> {
    sqlx::query_as::<_, SwapRequest>("SELECT * FROM swap_requests WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
}

pub async fn set_status_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
    status: SwapStatus,
) -> Result<SwapRequest, sqlx::Error> {
    sqlx::query_as::<_, SwapRequest>(
        "UPDATE swap_requests SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(status)
    .fetch_one(&mut **tx)
    .await
}

pub async fn delete_tx(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM swap_requests WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<SwapRequest>, sqlx::Error> {
    sqlx::query_as::<_, SwapRequest>("SELECT * FROM swap_requests WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Swaps where `user_id` is requester or receiver, newest first.
pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<SwapView>, sqlx::Error> {
    let sql = format!(
        "{VIEW_SELECT} WHERE sr.requester_id = $1 OR sr.receiver_id = $1 ORDER BY sr.created_at DESC"
    );
    sqlx::query_as::<_, SwapView>(&sql)
        .bind(user_id)
        .fetch_all(db)
        .await
}

pub async fn list_all(db: &PgPool) -> Result<Vec<SwapView>, sqlx::Error> {
    let sql = format!("{VIEW_SELECT} ORDER BY sr.created_at DESC");
    sqlx::query_as::<_, SwapView>(&sql).fetch_all(db).await
}
