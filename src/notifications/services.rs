//! Notification text for every side effect that informs a user.

use uuid::Uuid;

use super::repo_types::{NewNotification, NotificationKind};

pub fn swap_requested(receiver_id: Uuid, requester_name: &str, swap_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: receiver_id,
        title: "New Swap Request".into(),
        message: format!("{requester_name} wants to exchange skills with you"),
        kind: NotificationKind::SwapRequest,
        related_id: Some(swap_id),
    }
}

pub fn swap_accepted(requester_id: Uuid, receiver_name: &str, swap_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: requester_id,
        title: "Swap Request Accepted".into(),
        message: format!("{receiver_name} accepted your swap request"),
        kind: NotificationKind::SwapAccepted,
        related_id: Some(swap_id),
    }
}

pub fn swap_rejected(requester_id: Uuid, receiver_name: &str, swap_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: requester_id,
        title: "Swap Request Declined".into(),
        message: format!("{receiver_name} declined your swap request"),
        kind: NotificationKind::SwapRejected,
        related_id: Some(swap_id),
    }
}

pub fn swap_completed(other_party: Uuid, actor_name: &str, swap_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: other_party,
        title: "Swap Completed".into(),
        message: format!("Your skill exchange with {actor_name} has been completed"),
        kind: NotificationKind::SwapCompleted,
        related_id: Some(swap_id),
    }
}

pub fn rating_received(rated_user: Uuid, rater_name: &str, score: i16, swap_id: Uuid) -> NewNotification {
    NewNotification {
        user_id: rated_user,
        title: "New Rating Received".into(),
        message: format!("{rater_name} rated your skill exchange ({score} stars)"),
        kind: NotificationKind::RatingReceived,
        related_id: Some(swap_id),
    }
}

pub fn admin_broadcast(user_id: Uuid, title: &str, content: &str, message_id: Uuid) -> NewNotification {
    NewNotification {
        user_id,
        title: title.to_string(),
        message: content.to_string(),
        kind: NotificationKind::AdminMessage,
        related_id: Some(message_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texts_name_the_other_party() {
        let swap = Uuid::new_v4();
        let to = Uuid::new_v4();
        let n = swap_requested(to, "Alice", swap);
        assert_eq!(n.user_id, to);
        assert_eq!(n.message, "Alice wants to exchange skills with you");
        assert_eq!(n.related_id, Some(swap));

        assert_eq!(swap_accepted(to, "Bob", swap).kind, NotificationKind::SwapAccepted);
        assert_eq!(
            swap_completed(to, "Bob", swap).message,
            "Your skill exchange with Bob has been completed"
        );
        assert_eq!(
            rating_received(to, "Bob", 4, swap).message,
            "Bob rated your skill exchange (4 stars)"
        );
    }
}
