use serde::Deserialize;
use uuid::Uuid;

use super::services::{MAX_SCORE, MIN_SCORE};
use crate::error::{AppResult, Validator};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRatingRequest {
    pub swap_id: Uuid,
    pub rated_user_id: Option<Uuid>,
    pub rating: i16,
    #[serde(default)]
    pub feedback: String,
}

impl CreateRatingRequest {
    pub fn validate(&mut self) -> AppResult<()> {
        self.feedback = self.feedback.trim().to_string();
        Validator::new()
            .check(
                (MIN_SCORE..=MAX_SCORE).contains(&self.rating),
                "rating",
                "Rating must be between 1 and 5",
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(rating: i16) -> CreateRatingRequest {
        CreateRatingRequest {
            swap_id: Uuid::new_v4(),
            rated_user_id: None,
            rating,
            feedback: "  great mentor ".into(),
        }
    }

    #[test]
    fn scores_outside_range_are_rejected() {
        for bad in [0, 6, -1, 7] {
            assert!(request(bad).validate().is_err(), "{bad} accepted");
        }
        for good in 1..=5 {
            assert!(request(good).validate().is_ok());
        }
    }

    #[test]
    fn feedback_is_trimmed() {
        let mut req = request(4);
        req.validate().unwrap();
        assert_eq!(req.feedback, "great mentor");
    }
}
