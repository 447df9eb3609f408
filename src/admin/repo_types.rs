use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "message_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Info,
    Warning,
    Error,
    Success,
}

/// A platform-wide announcement.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminMessage {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Moderation dashboard counters. User counts cover member accounts only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, FromRow)]
pub struct PlatformStats {
    pub total_users: i64,
    pub active_users: i64,
    pub banned_users: i64,
    pub public_users: i64,
    pub total_skills: i64,
    pub total_swaps: i64,
    pub pending_swaps: i64,
    pub accepted_swaps: i64,
    pub completed_swaps: i64,
    pub rejected_swaps: i64,
    pub cancelled_swaps: i64,
}

/// Partial update; only these fields are editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<MessageKind>,
    pub is_active: Option<bool>,
}

impl MessageChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.kind.is_none() && self.is_active.is_none()
    }

    pub fn apply(&self, message: &mut AdminMessage) {
        if let Some(title) = &self.title {
            message.title = title.clone();
        }
        if let Some(content) = &self.content {
            message.content = content.clone();
        }
        if let Some(kind) = self.kind {
            message.kind = kind;
        }
        if let Some(active) = self.is_active {
            message.is_active = active;
        }
    }
}
