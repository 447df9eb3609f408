use uuid::Uuid;

use super::{now, MarketStore};
use crate::{
    admin::{
        dto::{validate_changes, CreateMessageRequest},
        repo_types::{AdminMessage, MessageChanges, PlatformStats},
        services::platform_stats,
    },
    error::{AppError, AppResult},
    notifications::{repo_types::NewNotification, services as notify},
    users::{repo_types::UserRole, services::check_ban_target},
};

impl MarketStore {
    pub fn ban_user(&self, id: Uuid) -> AppResult<Self> {
        self.set_active(id, false)
    }

    pub fn unban_user(&self, id: Uuid) -> AppResult<Self> {
        self.set_active(id, true)
    }

    fn set_active(&self, id: Uuid, active: bool) -> AppResult<Self> {
        let admin = self.admin()?;
        check_ban_target(admin.id, self.user(id), active)?;
        let mut next = self.clone();
        let user = next.user_mut(id)?;
        user.is_active = active;
        user.updated_at = now();
        Ok(next)
    }

    pub fn stats(&self) -> AppResult<PlatformStats> {
        self.admin()?;
        Ok(platform_stats(&self.users, &self.skills, &self.swaps))
    }

    /// Publish a message; active ones reach every active member at once.
    pub fn send_admin_message(&self, mut req: CreateMessageRequest) -> AppResult<Self> {
        self.admin()?;
        req.validate()?;
        let message = AdminMessage {
            id: Uuid::new_v4(),
            title: req.title,
            content: req.content,
            kind: req.kind,
            is_active: req.is_active,
            created_at: now(),
        };

        let notes: Vec<NewNotification> = if message.is_active {
            self.users
                .iter()
                .filter(|u| u.is_active && u.role == UserRole::User)
                .map(|u| notify::admin_broadcast(u.id, &message.title, &message.content, message.id))
                .collect()
        } else {
            Vec::new()
        };

        let mut next = self.clone();
        next.admin_messages.push(message);
        notes.into_iter().for_each(|n| next.notify(n));
        Ok(next)
    }

    pub fn update_admin_message(&self, id: Uuid, mut changes: MessageChanges) -> AppResult<Self> {
        self.admin()?;
        validate_changes(&mut changes)?;
        let mut next = self.clone();
        let message = next
            .admin_messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(AppError::NotFound("Admin message"))?;
        changes.apply(message);
        Ok(next)
    }

    pub fn delete_admin_message(&self, id: Uuid) -> AppResult<Self> {
        self.admin()?;
        if !self.admin_messages.iter().any(|m| m.id == id) {
            return Err(AppError::NotFound("Admin message"));
        }
        let mut next = self.clone();
        next.admin_messages.retain(|m| m.id != id);
        Ok(next)
    }

    pub fn mark_notification_read(&self, id: Uuid) -> AppResult<Self> {
        let me = self.caller()?.id;
        let mut next = self.clone();
        let note = next
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.user_id == me)
            .ok_or(AppError::NotFound("Notification"))?;
        note.is_read = true;
        Ok(next)
    }

    pub fn mark_all_notifications_read(&self) -> AppResult<Self> {
        let me = self.caller()?.id;
        let mut next = self.clone();
        next.notifications
            .iter_mut()
            .filter(|n| n.user_id == me)
            .for_each(|n| n.is_read = true);
        Ok(next)
    }
}
