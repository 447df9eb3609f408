//! Who may move a swap request between which statuses.
//!
//! ```text
//! pending --accept--> accepted --complete--> completed
//!    |--reject--> rejected
//!    `--cancel--> cancelled
//! ```

use uuid::Uuid;

use super::repo_types::{SwapRequest, SwapStatus};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Requester,
    Receiver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Changed(SwapStatus),
    /// The swap already sits in the requested terminal status.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("not a participant in this swap")]
    NotParticipant,
    #[error("only the {required} may move this swap to {to}")]
    WrongParty { required: &'static str, to: SwapStatus },
    #[error("cannot move a {from} swap to {to}")]
    Invalid { from: SwapStatus, to: SwapStatus },
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotParticipant => AppError::NotFound("Swap request"),
            TransitionError::WrongParty { .. } => AppError::Forbidden(err.to_string()),
            TransitionError::Invalid { .. } => AppError::Conflict(err.to_string()),
        }
    }
}

pub fn party_of(swap: &SwapRequest, user_id: Uuid) -> Option<Party> {
    if user_id == swap.requester_id {
        Some(Party::Requester)
    } else if user_id == swap.receiver_id {
        Some(Party::Receiver)
    } else {
        None
    }
}

/// Decide what a status update by `actor` does to `swap`.
pub fn plan(swap: &SwapRequest, actor: Uuid, to: SwapStatus) -> Result<Outcome, TransitionError> {
    let party = party_of(swap, actor).ok_or(TransitionError::NotParticipant)?;
    let from = swap.status;

    if from == to && from.is_terminal() {
        return Ok(Outcome::Unchanged);
    }

    let required = match (from, to) {
        (SwapStatus::Pending, SwapStatus::Accepted | SwapStatus::Rejected) => Some(Party::Receiver),
        (SwapStatus::Pending, SwapStatus::Cancelled) => Some(Party::Requester),
        (SwapStatus::Accepted, SwapStatus::Completed) => None,
        _ => return Err(TransitionError::Invalid { from, to }),
    };

    match required {
        Some(Party::Receiver) if party != Party::Receiver => Err(TransitionError::WrongParty {
            required: "receiver",
            to,
        }),
        Some(Party::Requester) if party != Party::Requester => Err(TransitionError::WrongParty {
            required: "requester",
            to,
        }),
        _ => Ok(Outcome::Changed(to)),
    }
}

/// Requests may be deleted by their requester until they are accepted.
pub fn can_delete(swap: &SwapRequest, actor: Uuid) -> Result<(), AppError> {
    if swap.requester_id != actor {
        return Err(AppError::NotFound("Swap request"));
    }
    match swap.status {
        SwapStatus::Pending | SwapStatus::Rejected | SwapStatus::Cancelled => Ok(()),
        status => Err(AppError::Conflict(format!("cannot delete a {status} swap"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn swap(status: SwapStatus) -> SwapRequest {
        let now = OffsetDateTime::now_utc();
        SwapRequest {
            id: Uuid::new_v4(),
            requester_id: Uuid::new_v4(),
            receiver_id: Uuid::new_v4(),
            offered_skill_id: Uuid::new_v4(),
            wanted_skill_id: Uuid::new_v4(),
            message: String::new(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    const ALL: [SwapStatus; 5] = [
        SwapStatus::Pending,
        SwapStatus::Accepted,
        SwapStatus::Rejected,
        SwapStatus::Completed,
        SwapStatus::Cancelled,
    ];

    #[test]
    fn happy_path() {
        let s = swap(SwapStatus::Pending);
        assert_eq!(
            plan(&s, s.receiver_id, SwapStatus::Accepted),
            Ok(Outcome::Changed(SwapStatus::Accepted))
        );
        let s = swap(SwapStatus::Accepted);
        for actor in [s.requester_id, s.receiver_id] {
            assert_eq!(
                plan(&s, actor, SwapStatus::Completed),
                Ok(Outcome::Changed(SwapStatus::Completed))
            );
        }
    }

    #[test]
    fn only_receiver_answers_and_only_requester_cancels() {
        let s = swap(SwapStatus::Pending);
        assert!(matches!(
            plan(&s, s.requester_id, SwapStatus::Accepted),
            Err(TransitionError::WrongParty { required: "receiver", .. })
        ));
        assert!(matches!(
            plan(&s, s.requester_id, SwapStatus::Rejected),
            Err(TransitionError::WrongParty { .. })
        ));
        assert!(matches!(
            plan(&s, s.receiver_id, SwapStatus::Cancelled),
            Err(TransitionError::WrongParty { required: "requester", .. })
        ));
        assert_eq!(
            plan(&s, s.requester_id, SwapStatus::Cancelled),
            Ok(Outcome::Changed(SwapStatus::Cancelled))
        );
    }

    #[test]
    fn outsiders_are_not_participants() {
        let s = swap(SwapStatus::Pending);
        assert_eq!(
            plan(&s, Uuid::new_v4(), SwapStatus::Accepted),
            Err(TransitionError::NotParticipant)
        );
    }

    #[test]
    fn terminal_states_never_change() {
        for from in ALL.into_iter().filter(SwapStatus::is_terminal) {
            let s = swap(from);
            for to in ALL {
                for actor in [s.requester_id, s.receiver_id] {
                    match plan(&s, actor, to) {
                        Ok(Outcome::Unchanged) => assert_eq!(from, to),
                        Ok(Outcome::Changed(_)) => panic!("{from} -> {to} must not apply"),
                        Err(e) => assert!(matches!(e, TransitionError::Invalid { .. })),
                    }
                }
            }
        }
    }

    #[test]
    fn skipping_acceptance_is_invalid() {
        let s = swap(SwapStatus::Pending);
        assert_eq!(
            plan(&s, s.receiver_id, SwapStatus::Completed),
            Err(TransitionError::Invalid {
                from: SwapStatus::Pending,
                to: SwapStatus::Completed
            })
        );
        let s = swap(SwapStatus::Accepted);
        assert!(plan(&s, s.requester_id, SwapStatus::Cancelled).is_err());
        assert!(plan(&s, s.receiver_id, SwapStatus::Pending).is_err());
    }

    #[test]
    fn errors_map_to_http_taxonomy() {
        use axum::http::StatusCode;
        assert_eq!(AppError::from(TransitionError::NotParticipant).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(TransitionError::WrongParty { required: "receiver", to: SwapStatus::Accepted }).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(TransitionError::Invalid { from: SwapStatus::Completed, to: SwapStatus::Pending }).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn deletion_rules() {
        let s = swap(SwapStatus::Pending);
        assert!(can_delete(&s, s.requester_id).is_ok());
        assert!(matches!(can_delete(&s, s.receiver_id), Err(AppError::NotFound(_))));
        let s = swap(SwapStatus::Accepted);
        assert!(matches!(can_delete(&s, s.requester_id), Err(AppError::Conflict(_))));
    }
}
