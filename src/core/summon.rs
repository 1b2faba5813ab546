//! Summon lists - each user's ordered, duplicate-free list of people to ping.
//! Callers persist with [`StateStore::save_summons`] after a change.

use crate::core::roles::MembershipChange;
use crate::core::state::StateStore;
use crate::entities::UserId;

/// Appends `target` to the owner's list unless already present
pub async fn add(state: &StateStore, owner: UserId, target: UserId) -> MembershipChange {
    let mut summons = state.summons.write().await;
    let list = summons.entry(owner).or_default();
    if list.contains(&target) {
        MembershipChange::AlreadyExists
    } else {
        list.push(target);
        MembershipChange::Added
    }
}

/// Removes `target` from the owner's list, preserving the order of the rest
pub async fn remove(state: &StateStore, owner: UserId, target: UserId) -> MembershipChange {
    let mut summons = state.summons.write().await;
    match summons.get_mut(&owner) {
        Some(list) if list.contains(&target) => {
            list.retain(|id| *id != target);
            MembershipChange::Removed
        }
        _ => MembershipChange::NotFound,
    }
}

/// Empties the owner's list. Returns false if they never had one.
pub async fn clear(state: &StateStore, owner: UserId) -> bool {
    state
        .summons
        .write()
        .await
        .get_mut(&owner)
        .map(Vec::clear)
        .is_some()
}

/// The owner's list in insertion order
pub async fn list(state: &StateStore, owner: UserId) -> Vec<UserId> {
    state
        .summons
        .read()
        .await
        .get(&owner)
        .cloned()
        .unwrap_or_default()
}
