use serde::Serialize;
use uuid::Uuid;

use super::repo_types::{ProfileChanges, User};
use crate::error::{AppError, AppResult, Validator};
use crate::skills::repo_types::Skill;

/// A user together with their offered and wanted skills.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub skills_offered: Vec<Skill>,
    pub skills_wanted: Vec<Skill>,
}

#[derive(Debug, Serialize)]
pub struct BanResponse {
    pub id: Uuid,
    pub is_active: bool,
}

impl From<User> for BanResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            is_active: user.is_active,
        }
    }
}

pub fn validate_profile_changes(changes: &mut ProfileChanges) -> AppResult<()> {
    if changes.is_empty() {
        return Err(AppError::BadRequest("No valid fields to update".into()));
    }
    if let Some(name) = changes.name.as_mut() {
        *name = name.trim().to_string();
    }
    if let Some(tags) = changes.availability.as_mut() {
        tags.iter_mut().for_each(|t| *t = t.trim().to_string());
        tags.retain(|t| !t.is_empty());
    }
    Validator::new()
        .check(
            changes.name.as_deref().map_or(true, |n| !n.is_empty()),
            "name",
            "Name cannot be empty",
        )
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_changes_are_rejected() {
        let err = validate_profile_changes(&mut ProfileChanges::default()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn blank_name_is_a_field_error() {
        let mut changes = ProfileChanges {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(matches!(
            validate_profile_changes(&mut changes),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn availability_tags_are_trimmed() {
        let mut changes = ProfileChanges {
            availability: Some(vec![" Weekends ".into(), "".into(), "Evenings".into()]),
            ..Default::default()
        };
        validate_profile_changes(&mut changes).expect("valid");
        assert_eq!(
            changes.availability,
            Some(vec!["Weekends".to_string(), "Evenings".to_string()])
        );
    }

    #[test]
    fn profile_serializes_flat_without_password() {
        let mut user = crate::testing::user("Alice");
        user.password_hash = Some("secret-hash".into());
        let json = serde_json::to_value(UserProfile {
            user,
            skills_offered: vec![],
            skills_wanted: vec![],
        })
        .unwrap();
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["role"], "user");
        assert!(json.get("password_hash").is_none());
        assert!(json["skills_offered"].as_array().unwrap().is_empty());
    }
}
