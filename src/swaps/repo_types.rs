use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "swap_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

impl SwapStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwapStatus::Pending => "pending",
            SwapStatus::Accepted => "accepted",
            SwapStatus::Rejected => "rejected",
            SwapStatus::Completed => "completed",
            SwapStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SwapStatus::Rejected | SwapStatus::Completed | SwapStatus::Cancelled
        )
    }
}

impl fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SwapRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub receiver_id: Uuid,
    pub offered_skill_id: Uuid,
    pub wanted_skill_id: Uuid,
    pub message: String,
    pub status: SwapStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl SwapRequest {
    /// The participant on the other side from `user_id`, if they take part.
    pub fn counterpart(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.requester_id {
            Some(self.receiver_id)
        } else if user_id == self.receiver_id {
            Some(self.requester_id)
        } else {
            None
        }
    }
}

impl AsRef<SwapRequest> for SwapRequest {
    fn as_ref(&self) -> &SwapRequest {
        self
    }
}

/// A swap request joined with party and skill display data.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SwapView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub swap: SwapRequest,
    pub requester_name: String,
    pub requester_photo: Option<String>,
    pub receiver_name: String,
    pub receiver_photo: Option<String>,
    pub offered_skill_name: String,
    pub wanted_skill_name: String,
}

impl AsRef<SwapRequest> for SwapView {
    fn as_ref(&self) -> &SwapRequest {
        &self.swap
    }
}
