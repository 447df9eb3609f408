use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{AdminRatingView, Rating, RatingView};

pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    swap_id: Uuid,
    rater_id: Uuid,
    rated_user_id: Uuid,
    score: i16,
    feedback: &str,
) -> Result<Rating, sqlx::Error> {
    sqlx::query_as::<_, Rating>(
        r#"
        INSERT INTO ratings (id, swap_id, rater_id, rated_user_id, rating, feedback)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(swap_id)
    .bind(rater_id)
    .bind(rated_user_id)
    .bind(score)
    .bind(feedback)
    .fetch_one(&mut **tx)
    .await
}

/// Mean of every rating `user_id` has received, rounded to one decimal.
pub async fn average_for_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<Option<f64>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<f64>>(
        "SELECT ROUND(AVG(rating), 1)::DOUBLE PRECISION FROM ratings WHERE rated_user_id = $1",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
}

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<RatingView>, sqlx::Error> {
    sqlx::query_as::<_, RatingView>(
        r#"
        SELECT r.*, u.name AS rater_name, u.profile_photo AS rater_photo
          FROM ratings r
          JOIN users u ON u.id = r.rater_id
         WHERE r.rated_user_id = $1
         ORDER BY r.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn list_all(db: &PgPool) -> Result<Vec<AdminRatingView>, sqlx::Error> {
    sqlx::query_as::<_, AdminRatingView>(
        r#"
        SELECT r.*, rater.name AS rater_name, rated.name AS rated_user_name
          FROM ratings r
          JOIN users rater ON rater.id = r.rater_id
          JOIN users rated ON rated.id = r.rated_user_id
         ORDER BY r.created_at DESC
        "#,
    )
    .fetch_all(db)
    .await
}
