//! In-memory application state for a single client session.
//!
//! `MarketStore` holds every entity the client has loaded. Mutations never
//! touch `self`; each returns the next store or the error that stopped it,
//! applying the same rules the HTTP services enforce.

mod market;
mod moderation;
mod session;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    admin::repo_types::AdminMessage,
    auth::services::ensure_can_sign_in,
    error::{AppError, AppResult},
    notifications::repo_types::{NewNotification, Notification},
    ratings::repo_types::Rating,
    skills::{repo_types::Skill, services::SearchFilter},
    swaps::{dto::SwapInbox, repo_types::SwapRequest},
    users::{dto::UserProfile, repo_types::User, services::attach_skills},
};

#[derive(Debug, Clone, Default)]
pub struct MarketStore {
    current_user: Option<Uuid>,
    users: Vec<User>,
    skills: Vec<Skill>,
    swaps: Vec<SwapRequest>,
    ratings: Vec<Rating>,
    admin_messages: Vec<AdminMessage>,
    notifications: Vec<Notification>,
}

impl MarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.and_then(|id| self.user(id))
    }

    pub fn user(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn swaps(&self) -> &[SwapRequest] {
        &self.swaps
    }

    pub fn swap(&self, id: Uuid) -> Option<&SwapRequest> {
        self.swaps.iter().find(|s| s.id == id)
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn admin_messages(&self) -> &[AdminMessage] {
        &self.admin_messages
    }

    /// The signed-in user's notifications, newest first.
    pub fn notifications(&self) -> Vec<&Notification> {
        let Some(me) = self.current_user else {
            return Vec::new();
        };
        let mut mine: Vec<&Notification> =
            self.notifications.iter().filter(|n| n.user_id == me).collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        mine
    }

    pub fn unread_count(&self) -> usize {
        self.notifications().iter().filter(|n| !n.is_read).count()
    }

    /// Listed users whose offered skills satisfy `filter`.
    pub fn search(&self, filter: &SearchFilter) -> Vec<UserProfile> {
        let hits: Vec<User> = self
            .users
            .iter()
            .filter(|u| filter.matches(u, &self.skills))
            .cloned()
            .collect();
        self.profiles(hits)
    }

    /// Users the signed-in member may browse. Admins see every non-admin.
    pub fn visible_users(&self) -> Vec<UserProfile> {
        let is_admin = self.current_user().is_some_and(User::is_admin);
        let visible: Vec<User> = self
            .users
            .iter()
            .filter(|u| if is_admin { !u.is_admin() } else { u.is_listed() })
            .cloned()
            .collect();
        self.profiles(visible)
    }

    pub fn inbox(&self) -> AppResult<SwapInbox<&SwapRequest>> {
        let me = self.caller()?.id;
        let mut swaps: Vec<&SwapRequest> = self.swaps.iter().collect();
        swaps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(SwapInbox::partition(me, swaps))
    }

    pub fn visible_admin_messages(&self) -> Vec<&AdminMessage> {
        let is_admin = self.current_user().is_some_and(User::is_admin);
        self.admin_messages
            .iter()
            .filter(|m| is_admin || m.is_active)
            .collect()
    }

    fn profiles(&self, users: Vec<User>) -> Vec<UserProfile> {
        attach_skills(users, self.skills.clone())
    }

    /// The signed-in user, refused once banned.
    fn caller(&self) -> AppResult<&User> {
        let user = self
            .current_user()
            .ok_or_else(|| AppError::Unauthorized("Not signed in".into()))?;
        ensure_can_sign_in(user)?;
        Ok(user)
    }

    fn admin(&self) -> AppResult<&User> {
        let caller = self.caller()?;
        if !caller.is_admin() {
            return Err(AppError::Forbidden("Admin access required".into()));
        }
        Ok(caller)
    }

    fn user_mut(&mut self, id: Uuid) -> AppResult<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AppError::NotFound("User"))
    }

    fn notify(&mut self, note: NewNotification) {
        self.notifications
            .push(note.into_notification(Uuid::new_v4(), now()));
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::skills::repo_types::{SkillKind, SkillLevel};
    use crate::testing;

    impl MarketStore {
        /// Switch the session without going through a login flow.
        pub(crate) fn signed_in_as(&self, id: Uuid) -> Self {
            let mut next = self.clone();
            next.current_user = Some(id);
            next
        }

        pub(crate) fn with_user(mut self, user: User) -> Self {
            self.users.push(user);
            self
        }

        pub(crate) fn with_skill(mut self, skill: Skill) -> Self {
            self.skills.push(skill);
            self
        }
    }

    /// Alice offers Photoshop and wants Python; Bob offers Python.
    pub(crate) struct Market {
        pub store: MarketStore,
        pub alice: User,
        pub bob: User,
        pub admin: User,
        pub photoshop: Skill,
        pub python: Skill,
    }

    pub(crate) fn market() -> Market {
        let alice = testing::user("Alice");
        let bob = testing::user("Bob");
        let admin = testing::admin("Root");
        let photoshop = testing::skill(&alice, "Photoshop", "Design", SkillLevel::Advanced, SkillKind::Offered);
        let wants_python = testing::skill(&alice, "Python", "Programming", SkillLevel::Beginner, SkillKind::Wanted);
        let python = testing::skill(&bob, "Python", "Programming", SkillLevel::Expert, SkillKind::Offered);
        let store = MarketStore::new()
            .with_user(alice.clone())
            .with_user(bob.clone())
            .with_user(admin.clone())
            .with_skill(photoshop.clone())
            .with_skill(wants_python)
            .with_skill(python.clone());
        Market {
            store,
            alice,
            bob,
            admin,
            photoshop,
            python,
        }
    }
}
