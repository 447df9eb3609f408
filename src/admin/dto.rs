use serde::Deserialize;

use super::repo_types::{MessageChanges, MessageKind};
use crate::error::{AppError, AppResult, Validator};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessageRequest {
    pub title: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CreateMessageRequest {
    pub fn validate(&mut self) -> AppResult<()> {
        self.title = self.title.trim().to_string();
        self.content = self.content.trim().to_string();
        Validator::new()
            .check(!self.title.is_empty(), "title", "Title is required")
            .check(!self.content.is_empty(), "content", "Content is required")
            .finish()
    }
}

pub fn validate_changes(changes: &mut MessageChanges) -> AppResult<()> {
    if changes.is_empty() {
        return Err(AppError::BadRequest("No valid fields to update".into()));
    }
    if let Some(title) = changes.title.as_mut() {
        *title = title.trim().to_string();
    }
    if let Some(content) = changes.content.as_mut() {
        *content = content.trim().to_string();
    }
    Validator::new()
        .check(
            changes.title.as_deref().map_or(true, |t| !t.is_empty()),
            "title",
            "Title cannot be empty",
        )
        .check(
            changes.content.as_deref().map_or(true, |c| !c.is_empty()),
            "content",
            "Content cannot be empty",
        )
        .finish()
}
