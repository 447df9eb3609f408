use super::repo_types::{Skill, SkillKind, SkillLevel};
use crate::users::repo_types::User;

/// Discovery filter over listed users and their offered skills.
///
/// All parts are optional and AND-combined. An empty filter keeps every listed
/// user. The term matches the user's name or an offered skill's name or
/// description; category and level must hold for the same offered skill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub term: Option<String>,
    pub category: Option<String>,
    pub level: Option<SkillLevel>,
}

impl SearchFilter {
    pub fn new(term: Option<String>, category: Option<String>, level: Option<SkillLevel>) -> Self {
        Self {
            term: non_blank(term),
            category: non_blank(category),
            level,
        }
    }

    /// ILIKE pattern for the text term with LIKE metacharacters escaped.
    pub fn like_pattern(&self) -> Option<String> {
        self.term.as_deref().map(|term| {
            let mut escaped = String::with_capacity(term.len() + 2);
            escaped.push('%');
            for ch in term.chars() {
                if matches!(ch, '\\' | '%' | '_') {
                    escaped.push('\\');
                }
                escaped.push(ch);
            }
            escaped.push('%');
            escaped
        })
    }

    /// True when no part of the filter is set.
    pub fn is_empty(&self) -> bool {
        self.term.is_none() && self.category.is_none() && self.level.is_none()
    }

    /// Whether a part of the filter constrains individual skills.
    fn constrains_skills(&self) -> bool {
        self.category.is_some() || self.level.is_some()
    }

    pub fn matches(&self, user: &User, skills: &[Skill]) -> bool {
        if !user.is_listed() {
            return false;
        }
        if self.is_empty() {
            return true;
        }
        let term = self.term.as_deref().map(str::to_lowercase);
        let name_hit = term
            .as_deref()
            .is_some_and(|t| user.name.to_lowercase().contains(t));
        if name_hit && !self.constrains_skills() {
            return true;
        }

        skills
            .iter()
            .filter(|s| s.user_id == user.id && s.kind == SkillKind::Offered)
            .any(|s| {
                let text_ok = match term.as_deref() {
                    None => true,
                    Some(t) => {
                        name_hit
                            || s.name.to_lowercase().contains(t)
                            || s.description.to_lowercase().contains(t)
                    }
                };
                let category_ok = self.category.as_deref().map_or(true, |c| s.category == c);
                let level_ok = self.level.map_or(true, |l| s.level == l);
                text_ok && category_ok && level_ok
            })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
