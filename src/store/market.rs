use uuid::Uuid;

use super::{now, MarketStore};
use crate::{
    error::{AppError, AppResult},
    notifications::services as notify,
    ratings::{
        dto::CreateRatingRequest,
        repo_types::Rating,
        services::{aggregate, rated_party},
    },
    skills::{dto::CreateSkillRequest, repo_types::Skill},
    swaps::{
        dto::CreateSwapRequest,
        lifecycle::{self, Outcome},
        repo_types::{SwapRequest, SwapStatus},
        services::{check_new_swap, status_notification},
    },
};

impl MarketStore {
    pub fn add_skill(&self, mut req: CreateSkillRequest) -> AppResult<Self> {
        req.validate()?;
        let owner = self.caller()?.id;
        let at = now();
        let skill = Skill {
            id: Uuid::new_v4(),
            user_id: owner,
            name: req.name,
            description: req.description,
            category: req.category,
            level: req.level,
            kind: req.kind,
            created_at: at,
            updated_at: at,
        };
        let mut next = self.clone();
        next.skills.push(skill);
        Ok(next)
    }

    pub fn send_swap_request(&self, req: CreateSwapRequest) -> AppResult<Self> {
        let requester = self.caller()?;
        let find_skill = |id: Uuid| self.skills.iter().find(|s| s.id == id);
        check_new_swap(
            requester.id,
            self.user(req.receiver_id),
            find_skill(req.offered_skill_id),
            find_skill(req.wanted_skill_id),
        )?;

        let at = now();
        let swap = SwapRequest {
            id: Uuid::new_v4(),
            requester_id: requester.id,
            receiver_id: req.receiver_id,
            offered_skill_id: req.offered_skill_id,
            wanted_skill_id: req.wanted_skill_id,
            message: req.message,
            status: SwapStatus::Pending,
            created_at: at,
            updated_at: at,
        };
        let note = notify::swap_requested(swap.receiver_id, &requester.name, swap.id);

        let mut next = self.clone();
        next.swaps.push(swap);
        next.notify(note);
        Ok(next)
    }

    pub fn update_swap_status(&self, swap_id: Uuid, to: SwapStatus) -> AppResult<Self> {
        let actor = self.caller()?;
        let swap = self.swap(swap_id).ok_or(AppError::NotFound("Swap request"))?;

        let status = match lifecycle::plan(swap, actor.id, to)? {
            Outcome::Unchanged => return Ok(self.clone()),
            Outcome::Changed(status) => status,
        };

        let mut updated = swap.clone();
        updated.status = status;
        updated.updated_at = now();
        let note = status_notification(&updated, actor.id, &actor.name, status);

        let mut next = self.clone();
        if status == SwapStatus::Completed {
            for party in [updated.requester_id, updated.receiver_id] {
                next.user_mut(party)?.total_swaps += 1;
            }
        }
        if let Some(note) = note {
            next.notify(note);
        }
        if let Some(slot) = next.swaps.iter_mut().find(|s| s.id == swap_id) {
            *slot = updated;
        }
        Ok(next)
    }

    /// Record a rating and recompute the rated member's aggregate from every
    /// rating they have received.
    pub fn submit_rating(&self, mut req: CreateRatingRequest) -> AppResult<Self> {
        req.validate()?;
        let rater = self.caller()?;
        let swap = self.swap(req.swap_id).ok_or(AppError::NotFound("Swap request"))?;
        let rated_user_id = rated_party(swap, rater.id, req.rated_user_id)?;
        if self
            .ratings
            .iter()
            .any(|r| r.swap_id == swap.id && r.rater_id == rater.id)
        {
            return Err(AppError::Conflict("You have already rated this swap".into()));
        }

        let rating = Rating {
            id: Uuid::new_v4(),
            swap_id: swap.id,
            rater_id: rater.id,
            rated_user_id,
            rating: req.rating,
            feedback: req.feedback,
            created_at: now(),
        };
        let note = notify::rating_received(rated_user_id, &rater.name, rating.rating, swap.id);

        let mut next = self.clone();
        next.ratings.push(rating);
        let scores: Vec<i16> = next
            .ratings
            .iter()
            .filter(|r| r.rated_user_id == rated_user_id)
            .map(|r| r.rating)
            .collect();
        let user = next.user_mut(rated_user_id)?;
        user.rating = aggregate(&scores);
        user.updated_at = now();
        next.notify(note);
        Ok(next)
    }
}
