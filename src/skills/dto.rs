use serde::Deserialize;

use super::repo_types::{SkillKind, SkillLevel};
use super::services::SearchFilter;
use crate::error::{AppResult, Validator};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub level: SkillLevel,
    #[serde(rename = "type")]
    pub kind: SkillKind,
}

impl CreateSkillRequest {
    pub fn validate(&mut self) -> AppResult<()> {
        self.name = self.name.trim().to_string();
        self.category = self.category.trim().to_string();
        Validator::new()
            .check(!self.name.is_empty(), "name", "Skill name is required")
            .check(!self.category.is_empty(), "category", "Category is required")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct SkillListQuery {
    #[serde(rename = "type")]
    pub kind: Option<SkillKind>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub level: Option<SkillLevel>,
}

impl From<SearchQuery> for SearchFilter {
    fn from(query: SearchQuery) -> Self {
        SearchFilter::new(query.q, query.category, query.level)
    }
}
