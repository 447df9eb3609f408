use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{SwapRequest, SwapStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSwapRequest {
    pub receiver_id: Uuid,
    pub offered_skill_id: Uuid,
    pub wanted_skill_id: Uuid,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: SwapStatus,
}

/// A user's swaps grouped the way the dashboard shows them.
#[derive(Debug, Clone, Serialize)]
pub struct SwapInbox<T> {
    pub incoming_pending: Vec<T>,
    pub outgoing_pending: Vec<T>,
    pub active: Vec<T>,
    pub completed: Vec<T>,
}

impl<T> Default for SwapInbox<T> {
    fn default() -> Self {
        Self {
            incoming_pending: Vec::new(),
            outgoing_pending: Vec::new(),
            active: Vec::new(),
            completed: Vec::new(),
        }
    }
}

impl<T: AsRef<SwapRequest>> SwapInbox<T> {
    /// Sort `swaps` into buckets from `user_id`'s point of view. Rejected and
    /// cancelled requests, and swaps the user is not part of, are dropped.
    pub fn partition(user_id: Uuid, swaps: impl IntoIterator<Item = T>) -> Self {
        let mut inbox = Self::default();
        for item in swaps {
            let swap = item.as_ref();
            if swap.counterpart(user_id).is_none() {
                continue;
            }
            match swap.status {
                SwapStatus::Pending if swap.receiver_id == user_id => inbox.incoming_pending.push(item),
                SwapStatus::Pending => inbox.outgoing_pending.push(item),
                SwapStatus::Accepted => inbox.active.push(item),
                SwapStatus::Completed => inbox.completed.push(item),
                SwapStatus::Rejected | SwapStatus::Cancelled => {}
            }
        }
        inbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn swap(requester_id: Uuid, receiver_id: Uuid, status: SwapStatus) -> SwapRequest {
        let now = OffsetDateTime::now_utc();
        SwapRequest {
            id: Uuid::new_v4(),
            requester_id,
            receiver_id,
            offered_skill_id: Uuid::new_v4(),
            wanted_skill_id: Uuid::new_v4(),
            message: String::new(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn inbox_buckets_follow_direction_and_status() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let swaps = vec![
            swap(other, me, SwapStatus::Pending),
            swap(me, other, SwapStatus::Pending),
            swap(other, me, SwapStatus::Accepted),
            swap(me, other, SwapStatus::Completed),
            swap(me, other, SwapStatus::Cancelled),
            swap(other, Uuid::new_v4(), SwapStatus::Pending),
        ];
        let inbox = SwapInbox::partition(me, swaps);
        assert_eq!(inbox.incoming_pending.len(), 1);
        assert_eq!(inbox.outgoing_pending.len(), 1);
        assert_eq!(inbox.active.len(), 1);
        assert_eq!(inbox.completed.len(), 1);
        assert_eq!(inbox.incoming_pending[0].receiver_id, me);
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(serde_json::from_str::<UpdateStatusRequest>(r#"{"status":"archived"}"#).is_err());
        let req: UpdateStatusRequest = serde_json::from_str(r#"{"status":"accepted"}"#).unwrap();
        assert_eq!(req.status, SwapStatus::Accepted);
    }
}
