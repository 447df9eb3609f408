use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::{dto::CreateRatingRequest, repo, repo_types::Rating};
use crate::{
    error::{is_unique_violation, AppError, AppResult},
    notifications::{repo as notifications_repo, services as notify},
    swaps::{
        repo as swaps_repo,
        repo_types::{SwapRequest, SwapStatus},
    },
    users::{repo_types::User, services::require_active},
};

pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 5;

/// Mean of `scores` rounded half up to one decimal; `0.0` for no ratings.
///
/// Rounds in integer tenths so `.x5` means never fall the wrong way, which
/// matches `ROUND(AVG(rating), 1)` in Postgres.
pub fn aggregate(scores: &[i16]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: i64 = scores.iter().map(|&s| i64::from(s)).sum();
    let n = scores.len() as i64;
    let tenths = (sum * 20 + n) / (2 * n);
    tenths as f64 / 10.0
}

/// Resolve who `rater_id` is rating on `swap`, or why they may not.
pub fn rated_party(swap: &SwapRequest, rater_id: Uuid, rated_user_id: Option<Uuid>) -> AppResult<Uuid> {
    let other = swap
        .counterpart(rater_id)
        .ok_or_else(|| AppError::Forbidden("Only swap participants can rate".into()))?;
    if swap.status != SwapStatus::Completed {
        return Err(AppError::Conflict("Only completed swaps can be rated".into()));
    }
    match rated_user_id {
        Some(id) if id != other => Err(AppError::field(
            "rated_user_id",
            "Rated user must be the other participant",
        )),
        _ => Ok(other),
    }
}

pub async fn submit_rating(
    db: &PgPool,
    rater_id: Uuid,
    req: &CreateRatingRequest,
) -> AppResult<Rating> {
    let rater = require_active(db, rater_id).await?;
    let swap = swaps_repo::find_by_id(db, req.swap_id)
        .await?
        .ok_or(AppError::NotFound("Swap request"))?;
    let rated_user_id = rated_party(&swap, rater_id, req.rated_user_id)?;

    let mut tx = db.begin().await?;

    // Concurrent raters of the same user serialize here.
    User::lock_tx(&mut tx, rated_user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let rating = repo::insert_tx(&mut tx, swap.id, rater_id, rated_user_id, req.rating, &req.feedback)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!(swap_id = %swap.id, rater_id = %rater_id, "duplicate rating");
                AppError::Conflict("You have already rated this swap".into())
            } else {
                AppError::Database(e)
            }
        })?;

    let average = repo::average_for_tx(&mut tx, rated_user_id).await?.unwrap_or(0.0);
    User::set_rating_tx(&mut tx, rated_user_id, average).await?;

    notifications_repo::insert_tx(
        &mut tx,
        &notify::rating_received(rated_user_id, &rater.name, rating.rating, swap.id),
    )
    .await?;
    tx.commit().await?;

    info!(rating_id = %rating.id, rated_user_id = %rated_user_id, average, "rating submitted");
    Ok(rating)
}
