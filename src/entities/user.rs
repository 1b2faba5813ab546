//! Role membership records - persisted as `user_ids.json`.

use super::{UserId, lenient};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Snapshot of a member's display name taken when they were registered
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Display name at registration time
    #[serde(default)]
    pub name: String,
}

impl UserRecord {
    /// Creates a record for the given display name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Owner, admins, registered users and the blacklist.
///
/// Membership is not exclusive: one id may be owner, admin and user at once.
/// Blacklist membership overrides every other role in access checks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSets {
    /// Bot owner, if one has been configured
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub owner: Option<UserId>,
    /// Bot-level admins
    #[serde(default)]
    pub admins: BTreeMap<UserId, UserRecord>,
    /// Registered users
    #[serde(default)]
    pub users: BTreeMap<UserId, UserRecord>,
    /// Users barred from every command
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub blacklist: BTreeSet<UserId>,
}

impl RoleSets {
    /// Whether `user_id` is the owner
    #[must_use]
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner == Some(user_id)
    }

    /// Whether `user_id` is owner, admin or registered user
    #[must_use]
    pub fn is_registered(&self, user_id: UserId) -> bool {
        self.is_owner(user_id)
            || self.admins.contains_key(&user_id)
            || self.users.contains_key(&user_id)
    }
}
