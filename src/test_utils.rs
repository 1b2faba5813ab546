//! Shared test utilities for `guildkeeper`.
//!
//! Every helper builds a [`StateStore`] rooted in a fresh temporary directory,
//! so tests can persist and reload without touching the real data directory.
//! Keep the returned `TempDir` alive for as long as the store is used.

#![allow(clippy::unwrap_used)]

use crate::core::snipe::EvictionPolicy;
use crate::core::{roles, state::StateStore};
use crate::entities::UserRecord;
use crate::storage::DataFiles;
use tempfile::TempDir;

/// Creates an empty store in a new temporary directory.
pub fn setup_test_state() -> (TempDir, StateStore) {
    let dir = tempfile::tempdir().unwrap();
    let state = StateStore::new(DataFiles::new(dir.path()), EvictionPolicy::default());
    (dir, state)
}

/// Clock used when reloading a store in tests
pub const TEST_NOW: i64 = 1_700_000_000;

/// Opens a second store over the same directory and loads everything from disk
/// at [`TEST_NOW`]. Used to prove that a mutation was persisted.
pub async fn reload_state(dir: &TempDir) -> StateStore {
    let state = StateStore::new(DataFiles::new(dir.path()), EvictionPolicy::default());
    state.load_all(TEST_NOW).await;
    state
}

/// Creates a store with an owner plus the given admins and registered users.
///
/// # Defaults
/// * names: `admin<id>` / `user<id>`
/// * access: unrestricted, not paused
pub async fn setup_roles_state(owner: u64, admins: &[u64], users: &[u64]) -> (TempDir, StateStore) {
    let (dir, state) = setup_test_state();
    roles::seed_owner(&state, owner).await;
    {
        let mut sets = state.roles.write().await;
        for id in admins {
            sets.admins.insert(*id, UserRecord::new(format!("admin{id}")));
        }
        for id in users {
            sets.users.insert(*id, UserRecord::new(format!("user{id}")));
        }
    }
    (dir, state)
}

/// Creates a store where each `(user, wallet)` pair already has an account
/// with that wallet and an empty bank.
pub async fn setup_with_wallets(wallets: &[(u64, i64)]) -> (TempDir, StateStore) {
    let (dir, state) = setup_test_state();
    for &(user_id, wallet) in wallets {
        state
            .update_account(user_id, |account| {
                account.wallet = wallet;
                Ok(())
            })
            .await
            .unwrap();
    }
    (dir, state)
}
