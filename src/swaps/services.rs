use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{
    dto::CreateSwapRequest,
    lifecycle::{self, Outcome},
    repo,
    repo_types::{SwapRequest, SwapStatus},
};
use crate::{
    error::{AppError, AppResult},
    notifications::{repo as notifications_repo, repo_types::NewNotification, services as notify},
    skills::{repo as skills_repo, repo_types::Skill},
    users::{repo_types::User, services::require_active_tx},
};

/// Checks that hold before a request can be created.
pub fn check_new_swap(
    requester_id: Uuid,
    receiver: Option<&User>,
    offered: Option<&Skill>,
    wanted: Option<&Skill>,
) -> AppResult<()> {
    let receiver = match receiver {
        Some(r) if r.id == requester_id => {
            return Err(AppError::BadRequest("Cannot request a swap with yourself".into()))
        }
        Some(r) if r.is_active => r,
        _ => return Err(AppError::BadRequest("Receiver is not available".into())),
    };
    if !offered.is_some_and(|s| s.user_id == requester_id) {
        return Err(AppError::BadRequest("Offered skill does not belong to you".into()));
    }
    if !wanted.is_some_and(|s| s.user_id == receiver.id) {
        return Err(AppError::BadRequest("Wanted skill does not belong to the receiver".into()));
    }
    Ok(())
}

/// The notification a status change sends, if any.
pub fn status_notification(
    swap: &SwapRequest,
    actor_id: Uuid,
    actor_name: &str,
    to: SwapStatus,
) -> Option<NewNotification> {
    match to {
        SwapStatus::Accepted => Some(notify::swap_accepted(swap.requester_id, actor_name, swap.id)),
        SwapStatus::Rejected => Some(notify::swap_rejected(swap.requester_id, actor_name, swap.id)),
        SwapStatus::Completed => swap
            .counterpart(actor_id)
            .map(|other| notify::swap_completed(other, actor_name, swap.id)),
        SwapStatus::Pending | SwapStatus::Cancelled => None,
    }
}

pub async fn create_swap(
    db: &PgPool,
    requester_id: Uuid,
    req: &CreateSwapRequest,
) -> AppResult<SwapRequest> {
    let mut tx = db.begin().await?;

    let requester = require_active_tx(&mut tx, requester_id).await?;
    let receiver = User::find_by_id_tx(&mut tx, req.receiver_id).await?;
    let offered = skills_repo::find_by_id_tx(&mut tx, req.offered_skill_id).await?;
    let wanted = skills_repo::find_by_id_tx(&mut tx, req.wanted_skill_id).await?;
    check_new_swap(requester_id, receiver.as_ref(), offered.as_ref(), wanted.as_ref())?;

    let swap = repo::insert_tx(&mut tx, requester_id, req).await?;
    notifications_repo::insert_tx(
        &mut tx,
        &notify::swap_requested(swap.receiver_id, &requester.name, swap.id),
    )
    .await?;
    tx.commit().await?;

    info!(swap_id = %swap.id, requester_id = %swap.requester_id, receiver_id = %swap.receiver_id, "swap requested");
    Ok(swap)
}

pub async fn change_status(
    db: &PgPool,
    actor_id: Uuid,
    swap_id: Uuid,
    to: SwapStatus,
) -> AppResult<SwapRequest> {
    let mut tx = db.begin().await?;

    let actor = require_active_tx(&mut tx, actor_id).await?;
    let swap = repo::lock_tx(&mut tx, swap_id)
        .await?
        .ok_or(AppError::NotFound("Swap request"))?;

    let status = match lifecycle::plan(&swap, actor_id, to)? {
        Outcome::Unchanged => {
            tx.commit().await?;
            return Ok(swap);
        }
        Outcome::Changed(status) => status,
    };

    let updated = repo::set_status_tx(&mut tx, swap.id, status).await?;
    if let Some(note) = status_notification(&updated, actor_id, &actor.name, status) {
        notifications_repo::insert_tx(&mut tx, &note).await?;
    }
    if status == SwapStatus::Completed {
        User::increment_total_swaps_tx(&mut tx, &[updated.requester_id, updated.receiver_id])
            .await?;
    }
    tx.commit().await?;

    info!(swap_id = %updated.id, from = %swap.status, to = %status, actor_id = %actor_id, "swap status changed");
    Ok(updated)
}

pub async fn delete_swap(db: &PgPool, actor_id: Uuid, swap_id: Uuid) -> AppResult<()> {
    let mut tx = db.begin().await?;
    require_active_tx(&mut tx, actor_id).await?;
    let swap = repo::lock_tx(&mut tx, swap_id)
        .await?
        .ok_or(AppError::NotFound("Swap request"))?;
    lifecycle::can_delete(&swap, actor_id)?;
    repo::delete_tx(&mut tx, swap.id).await?;
    tx.commit().await?;
    info!(swap_id = %swap_id, actor_id = %actor_id, "swap deleted");
    Ok(())
}
