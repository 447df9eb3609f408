use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub swap_id: Uuid,
    pub rater_id: Uuid,
    pub rated_user_id: Uuid,
    pub rating: i16,
    pub feedback: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A received rating shown on a profile.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RatingView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub rating: Rating,
    pub rater_name: String,
    pub rater_photo: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminRatingView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub rating: Rating,
    pub rater_name: String,
    pub rated_user_name: String,
}
