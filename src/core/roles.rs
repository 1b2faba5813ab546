//! Role and blacklist mutators.
//!
//! Mutations only touch memory. Callers persist with
//! [`StateStore::save_users`] after a change.

use crate::core::state::StateStore;
use crate::entities::{UserId, UserRecord};
use std::collections::BTreeMap;
use tracing::info;

/// Result of adding to or removing from a membership collection.
///
/// Duplicates and misses are reported, never treated as errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MembershipChange {
    /// Newly added
    Added,
    /// Was already present; nothing changed
    AlreadyExists,
    /// Removed
    Removed,
    /// Was not present; nothing changed
    NotFound,
}

impl MembershipChange {
    /// Whether the collection changed and should be saved
    #[must_use]
    pub const fn changed(self) -> bool {
        matches!(self, Self::Added | Self::Removed)
    }
}

fn insert(map: &mut BTreeMap<UserId, UserRecord>, user_id: UserId, name: &str) -> MembershipChange {
    if map.contains_key(&user_id) {
        MembershipChange::AlreadyExists
    } else {
        map.insert(user_id, UserRecord::new(name));
        MembershipChange::Added
    }
}

fn remove(map: &mut BTreeMap<UserId, UserRecord>, user_id: UserId) -> MembershipChange {
    if map.remove(&user_id).is_some() {
        MembershipChange::Removed
    } else {
        MembershipChange::NotFound
    }
}

/// Registers a bot admin
pub async fn add_admin(state: &StateStore, user_id: UserId, name: &str) -> MembershipChange {
    let change = insert(&mut state.roles.write().await.admins, user_id, name);
    info!(user_id, ?change, "add_admin");
    change
}

/// Removes a bot admin
pub async fn remove_admin(state: &StateStore, user_id: UserId) -> MembershipChange {
    let change = remove(&mut state.roles.write().await.admins, user_id);
    info!(user_id, ?change, "remove_admin");
    change
}

/// Registers a bot user
pub async fn add_user(state: &StateStore, user_id: UserId, name: &str) -> MembershipChange {
    let change = insert(&mut state.roles.write().await.users, user_id, name);
    info!(user_id, ?change, "add_user");
    change
}

/// Removes a bot user
pub async fn remove_user(state: &StateStore, user_id: UserId) -> MembershipChange {
    let change = remove(&mut state.roles.write().await.users, user_id);
    info!(user_id, ?change, "remove_user");
    change
}

/// Admins in id order
pub async fn list_admins(state: &StateStore) -> Vec<(UserId, UserRecord)> {
    let roles = state.roles.read().await;
    roles.admins.iter().map(|(id, r)| (*id, r.clone())).collect()
}

/// Registered users in id order
pub async fn list_users(state: &StateStore) -> Vec<(UserId, UserRecord)> {
    let roles = state.roles.read().await;
    roles.users.iter().map(|(id, r)| (*id, r.clone())).collect()
}

/// Adds or removes `user_id` from the blacklist. Returns true if the user is
/// blacklisted afterwards.
pub async fn toggle_blacklist(state: &StateStore, user_id: UserId) -> bool {
    let mut roles = state.roles.write().await;
    let blacklisted = if roles.blacklist.remove(&user_id) {
        false
    } else {
        roles.blacklist.insert(user_id);
        true
    };
    info!(user_id, blacklisted, "toggle_blacklist");
    blacklisted
}

/// Current owner id
pub async fn owner(state: &StateStore) -> Option<UserId> {
    state.roles.read().await.owner
}

/// Installs `user_id` as owner if none is set. Returns true if it was installed.
pub async fn seed_owner(state: &StateStore, user_id: UserId) -> bool {
    let mut roles = state.roles.write().await;
    if roles.owner.is_some() {
        return false;
    }
    roles.owner = Some(user_id);
    info!(user_id, "Seeded bot owner");
    true
}
