use sqlx::PgPool;
use tracing::info;

use super::{
    dto::CreateMessageRequest,
    repo,
    repo_types::{AdminMessage, PlatformStats},
};
use crate::{
    error::AppResult,
    notifications::repo as notifications_repo,
    skills::repo_types::Skill,
    swaps::repo_types::{SwapRequest, SwapStatus},
    users::repo_types::User,
};

/// Dashboard counters over already loaded rows.
pub fn platform_stats(users: &[User], skills: &[Skill], swaps: &[SwapRequest]) -> PlatformStats {
    let members: Vec<&User> = users.iter().filter(|u| !u.is_admin()).collect();
    let count_users = |f: fn(&User) -> bool| members.iter().filter(|&&u| f(u)).count() as i64;
    let count_swaps = |status: SwapStatus| swaps.iter().filter(|s| s.status == status).count() as i64;
    PlatformStats {
        total_users: members.len() as i64,
        active_users: count_users(|u| u.is_active),
        banned_users: count_users(|u| !u.is_active),
        public_users: count_users(|u| u.is_public),
        total_skills: skills.len() as i64,
        total_swaps: swaps.len() as i64,
        pending_swaps: count_swaps(SwapStatus::Pending),
        accepted_swaps: count_swaps(SwapStatus::Accepted),
        completed_swaps: count_swaps(SwapStatus::Completed),
        rejected_swaps: count_swaps(SwapStatus::Rejected),
        cancelled_swaps: count_swaps(SwapStatus::Cancelled),
    }
}

/// Store a message and, when it is active, notify every active user.
pub async fn create_message(db: &PgPool, req: &CreateMessageRequest) -> AppResult<AdminMessage> {
    let mut tx = db.begin().await?;
    let message = repo::create_tx(&mut tx, req).await?;
    let recipients = if message.is_active {
        notifications_repo::broadcast_admin_message_tx(
            &mut tx,
            message.id,
            &message.title,
            &message.content,
        )
        .await?
    } else {
        0
    };
    tx.commit().await?;
    info!(message_id = %message.id, recipients, "admin message created");
    Ok(message)
}
