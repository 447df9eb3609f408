use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "skill_level")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

/// Whether the owner teaches the skill or wants to learn it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "skill_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillKind {
    Offered,
    Wanted,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub level: SkillLevel,
    #[serde(rename = "type")]
    pub kind: SkillKind,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Editable skill fields. The kind is fixed at creation and is not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<SkillLevel>,
}

impl SkillChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.level.is_none()
    }

    pub fn apply(&self, skill: &mut Skill) {
        if let Some(name) = &self.name {
            skill.name = name.clone();
        }
        if let Some(description) = &self.description {
            skill.description = description.clone();
        }
        if let Some(category) = &self.category {
            skill.category = category.clone();
        }
        if let Some(level) = self.level {
            skill.level = level;
        }
    }
}
