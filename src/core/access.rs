//! Access control - the liveness/ban gate in front of every general command,
//! plus the role predicates used by admin and owner commands.

use crate::core::state::StateStore;
use crate::entities::UserId;
use std::fmt;
use tracing::debug;

/// Why a command was refused
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenyReason {
    /// The bot is paused
    Paused,
    /// The user is blacklisted
    Blacklisted,
    /// Access is restricted and the user holds no role
    NotPermitted,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Paused => "The bot is currently paused.",
            Self::Blacklisted => "You are blacklisted from using this bot.",
            Self::NotPermitted => "You do not have permission to use this command.",
        };
        f.write_str(text)
    }
}

/// Outcome of [`check_access`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessDecision {
    /// The command may run
    Allow,
    /// The command must not run
    Deny(DenyReason),
}

impl AccessDecision {
    /// Whether the decision is [`AccessDecision::Allow`]
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Role a command can require on top of [`check_access`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Only the owner
    Owner,
    /// An admin or the owner
    Admin,
}

/// Decides whether `user_id` may run a general command.
///
/// Checked in order: paused (denies everyone, the owner included),
/// blacklist, open access, registered role.
pub async fn check_access(state: &StateStore, user_id: UserId) -> AccessDecision {
    let decision = if state.is_paused() {
        AccessDecision::Deny(DenyReason::Paused)
    } else {
        let roles = state.roles.read().await;
        if roles.blacklist.contains(&user_id) {
            AccessDecision::Deny(DenyReason::Blacklisted)
        } else if !state.is_global_restricted() || roles.is_registered(user_id) {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny(DenyReason::NotPermitted)
        }
    };
    debug!(user_id, ?decision, "Access check");
    decision
}

/// Whether `user_id` is the bot owner
pub async fn is_owner(state: &StateStore, user_id: UserId) -> bool {
    state.roles.read().await.is_owner(user_id)
}

/// Whether `user_id` is a bot admin (the owner is not implicitly an admin)
pub async fn is_admin(state: &StateStore, user_id: UserId) -> bool {
    state.roles.read().await.admins.contains_key(&user_id)
}

/// Whether `user_id` satisfies `requirement`
pub async fn has_role(state: &StateStore, user_id: UserId, requirement: RoleRequirement) -> bool {
    let roles = state.roles.read().await;
    match requirement {
        RoleRequirement::Owner => roles.is_owner(user_id),
        RoleRequirement::Admin => roles.is_owner(user_id) || roles.admins.contains_key(&user_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::roles::{self, MembershipChange};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_open_access_allows_strangers() {
        let (_dir, state) = setup_test_state();
        for user_id in [1, 2, 999_999] {
            assert_eq!(check_access(&state, user_id).await, AccessDecision::Allow);
        }
    }

    #[tokio::test]
    async fn test_blacklist_overrides_every_role() {
        let (_dir, state) = setup_roles_state(1, &[2], &[3]).await;
        for user_id in [1, 2, 3, 4] {
            roles::toggle_blacklist(&state, user_id).await;
        }

        for restricted in [false, true] {
            state.set_global_restricted(restricted);
            for user_id in [1, 2, 3, 4] {
                assert_eq!(
                    check_access(&state, user_id).await,
                    AccessDecision::Deny(DenyReason::Blacklisted)
                );
            }
        }
    }

    #[tokio::test]
    async fn test_pause_denies_owner_too() {
        let (_dir, state) = setup_roles_state(1, &[2], &[3]).await;
        state.set_paused(true);

        for user_id in [1, 2, 3, 4] {
            assert_eq!(
                check_access(&state, user_id).await,
                AccessDecision::Deny(DenyReason::Paused)
            );
        }

        state.set_paused(false);
        assert!(check_access(&state, 1).await.is_allowed());
    }

    #[tokio::test]
    async fn test_restricted_mode_requires_registration() {
        let (_dir, state) = setup_roles_state(1, &[2], &[3]).await;
        state.set_global_restricted(true);

        assert!(check_access(&state, 1).await.is_allowed());
        assert!(check_access(&state, 2).await.is_allowed());
        assert!(check_access(&state, 3).await.is_allowed());
        assert_eq!(
            check_access(&state, 4).await,
            AccessDecision::Deny(DenyReason::NotPermitted)
        );
    }

    #[tokio::test]
    async fn test_toggle_access_then_register_scenario() {
        let (_dir, state) = setup_roles_state(1, &[2], &[]).await;
        let stranger = 500;
        assert!(check_access(&state, stranger).await.is_allowed());

        // admin runs toggle_access
        assert!(has_role(&state, 2, RoleRequirement::Admin).await);
        assert!(state.toggle_global_restricted());
        assert_eq!(
            check_access(&state, stranger).await,
            AccessDecision::Deny(DenyReason::NotPermitted)
        );

        assert_eq!(
            roles::add_user(&state, stranger, "newbie").await,
            MembershipChange::Added
        );
        assert!(check_access(&state, stranger).await.is_allowed());
    }

    #[tokio::test]
    async fn test_role_requirements() {
        let (_dir, state) = setup_roles_state(1, &[2], &[3]).await;

        assert!(has_role(&state, 1, RoleRequirement::Owner).await);
        assert!(has_role(&state, 1, RoleRequirement::Admin).await);
        assert!(!has_role(&state, 2, RoleRequirement::Owner).await);
        assert!(has_role(&state, 2, RoleRequirement::Admin).await);
        assert!(!has_role(&state, 3, RoleRequirement::Admin).await);

        assert!(is_owner(&state, 1).await);
        assert!(!is_admin(&state, 1).await);
        assert!(is_admin(&state, 2).await);
    }
}
