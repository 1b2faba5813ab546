//! The state store - single in-memory owner of every mutable collection.
//!
//! One `StateStore` is constructed at startup, filled by [`StateStore::load_all`]
//! and shared (behind an `Arc`) with every command handler. Durable datasets
//! are written back through the [`JsonStore`] by the `save_*` methods; the
//! AFK map, snipe caches and global flags only live for the process lifetime.
//!
//! Each collection sits behind its own `RwLock`, so reads run concurrently
//! and a mutation holds exclusive access to its dataset for the duration of
//! one synchronous read-modify-write.

use crate::config::Settings;
use crate::core::snipe::{EvictionPolicy, SnipeCache};
use crate::entities::{
    Birthdays, CurrencyAccount, CurrencyAccounts, DeletedMessage, EditedMessage, GuildId,
    LootTables, RoleSets, Shop, SummonLists, UserId,
};
use crate::errors::Result;
use crate::storage::{DataFiles, Dataset, JsonStore};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

/// In-memory registry of users, roles, balances, caches and flags.
#[derive(Debug)]
pub struct StateStore {
    store: JsonStore,
    pub(crate) roles: RwLock<RoleSets>,
    pub(crate) currency: RwLock<CurrencyAccounts>,
    pub(crate) summons: RwLock<SummonLists>,
    pub(crate) birthdays: RwLock<Birthdays>,
    pub(crate) shop: RwLock<Shop>,
    pub(crate) loot_tables: RwLock<LootTables>,
    pub(crate) afk: RwLock<HashMap<UserId, String>>,
    deleted: RwLock<HashMap<GuildId, SnipeCache<DeletedMessage>>>,
    edited: RwLock<HashMap<GuildId, SnipeCache<EditedMessage>>>,
    snipe_policy: EvictionPolicy,
    paused: AtomicBool,
    global_restricted: AtomicBool,
}

impl StateStore {
    /// Creates an empty store persisting below `files`.
    ///
    /// `snipe_policy` bounds the caches filled by [`Self::record_deleted`]
    /// and [`Self::record_edited`].
    #[must_use]
    pub fn new(files: DataFiles, snipe_policy: EvictionPolicy) -> Self {
        Self {
            store: JsonStore::new(files),
            roles: RwLock::default(),
            currency: RwLock::default(),
            summons: RwLock::default(),
            birthdays: RwLock::default(),
            shop: RwLock::default(),
            loot_tables: RwLock::default(),
            afk: RwLock::default(),
            deleted: RwLock::default(),
            edited: RwLock::default(),
            snipe_policy,
            paused: AtomicBool::new(false),
            global_restricted: AtomicBool::new(false),
        }
    }

    /// Creates an empty store from runtime settings
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        let policy = EvictionPolicy {
            max_entries: settings.snipe_max_entries,
            max_age_secs: settings.snipe_max_age_secs,
        };
        Self::new(DataFiles::new(settings.data_dir.clone()), policy)
    }

    /// Loads every durable dataset, one after another.
    ///
    /// A dataset that is missing or malformed comes back empty and does not
    /// stop the others from loading.
    /// Loaded currency accounts are sanitized against `now`.
    #[instrument(skip(self))]
    pub async fn load_all(&self, now: i64) {
        let roles: RoleSets = self.store.load(Dataset::Users).await;
        info!(
            "Loaded roles: owner={:?}, {} admin(s), {} user(s), {} blacklisted",
            roles.owner,
            roles.admins.len(),
            roles.users.len(),
            roles.blacklist.len()
        );
        *self.roles.write().await = roles;

        let summons: SummonLists = self.store.load(Dataset::Summons).await;
        info!("Loaded {} summon list(s)", summons.len());
        *self.summons.write().await = summons;

        let mut currency: CurrencyAccounts = self.store.load(Dataset::Currency).await;
        for (user_id, account) in &mut currency {
            if account.sanitize(now) {
                warn!("Clamped out-of-range currency values for user {} on load", user_id);
            }
        }
        info!("Loaded {} currency account(s)", currency.len());
        *self.currency.write().await = currency;

        let birthdays: Birthdays = self.store.load(Dataset::Birthdays).await;
        info!("Loaded {} birthday(s)", birthdays.len());
        *self.birthdays.write().await = birthdays;

        let shop: Shop = self.store.load(Dataset::Shop).await;
        info!("Loaded {} shop item(s)", shop.len());
        *self.shop.write().await = shop;

        let loot_tables: LootTables = self.store.load(Dataset::LootTables).await;
        info!("Loaded {} loot table(s)", loot_tables.len());
        *self.loot_tables.write().await = loot_tables;
    }

    async fn persist<T>(&self, dataset: Dataset, data: &RwLock<T>)
    where
        T: Serialize + Clone,
    {
        let _writer = self.store.lock(dataset).await;
        let snapshot = data.read().await.clone();
        if let Err(e) = self.store.save(dataset, &snapshot).await {
            error!(
                "Failed to save {} data: {}; in-memory state kept",
                dataset, e
            );
        }
    }

    /// Writes roles (owner, admins, users, blacklist) to disk
    pub async fn save_users(&self) {
        self.persist(Dataset::Users, &self.roles).await;
    }

    /// Writes currency accounts to disk
    pub async fn save_currency(&self) {
        self.persist(Dataset::Currency, &self.currency).await;
    }

    /// Writes summon lists to disk
    pub async fn save_summons(&self) {
        self.persist(Dataset::Summons, &self.summons).await;
    }

    /// Writes birthdays to disk
    pub async fn save_birthdays(&self) {
        self.persist(Dataset::Birthdays, &self.birthdays).await;
    }

    // --- currency -------------------------------------------------------

    /// Returns the user's account, creating an empty one if needed.
    ///
    /// A new account is inserted in memory only; callers that mutate it
    /// follow up with [`Self::save_currency`].
    pub async fn get_or_create_currency_account(&self, user_id: UserId) -> CurrencyAccount {
        if let Some(account) = self.currency.read().await.get(&user_id) {
            return account.clone();
        }
        self.currency
            .write()
            .await
            .entry(user_id)
            .or_default()
            .clone()
    }

    /// Runs `f` against a copy of the user's account (created if needed)
    /// and commits the copy only if `f` succeeds.
    ///
    /// The dataset stays write-locked for the whole call, so two commands
    /// updating the same account cannot interleave.
    pub async fn update_account<F, R>(&self, user_id: UserId, f: F) -> Result<R>
    where
        F: FnOnce(&mut CurrencyAccount) -> Result<R>,
    {
        let mut accounts = self.currency.write().await;
        let entry = accounts.entry(user_id).or_default();
        let mut working = entry.clone();
        let value = f(&mut working)?;
        *entry = working;
        Ok(value)
    }

    /// Runs `f` with exclusive access to every account.
    ///
    /// `f` must validate before mutating: an `Err` leaves whatever it already
    /// changed in place.
    pub async fn update_accounts<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut CurrencyAccounts) -> Result<R>,
    {
        let mut accounts = self.currency.write().await;
        f(&mut accounts)
    }

    /// Copy of all accounts
    pub async fn currency_snapshot(&self) -> CurrencyAccounts {
        self.currency.read().await.clone()
    }

    // --- flags ----------------------------------------------------------

    /// Whether every gated command is currently refused
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Pauses or resumes the bot
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
        info!("Bot paused flag set to {}", paused);
    }

    /// Whether only registered users may run gated commands
    #[must_use]
    pub fn is_global_restricted(&self) -> bool {
        self.global_restricted.load(Ordering::SeqCst)
    }

    /// Switches between open and allow-list access
    pub fn set_global_restricted(&self, restricted: bool) {
        self.global_restricted.store(restricted, Ordering::SeqCst);
        info!("Global restriction set to {}", restricted);
    }

    /// Flips the restriction flag, returning the new value
    pub fn toggle_global_restricted(&self) -> bool {
        let restricted = !self.global_restricted.fetch_xor(true, Ordering::SeqCst);
        info!("Global restriction toggled to {}", restricted);
        restricted
    }

    // --- snipe caches ---------------------------------------------------

    /// Caches a deleted message for the guild
    pub async fn record_deleted(&self, guild_id: GuildId, message: DeletedMessage, now: i64) {
        self.deleted
            .write()
            .await
            .entry(guild_id)
            .or_default()
            .push(message, &self.snipe_policy, now);
    }

    /// Caches an edited message for the guild
    pub async fn record_edited(&self, guild_id: GuildId, message: EditedMessage, now: i64) {
        self.edited
            .write()
            .await
            .entry(guild_id)
            .or_default()
            .push(message, &self.snipe_policy, now);
    }

    /// Removes and returns the guild's most recently deleted message
    pub async fn pop_deleted(&self, guild_id: GuildId) -> Option<DeletedMessage> {
        self.deleted
            .write()
            .await
            .get_mut(&guild_id)
            .and_then(SnipeCache::pop)
    }

    /// Removes and returns the guild's most recently edited message
    pub async fn pop_edited(&self, guild_id: GuildId) -> Option<EditedMessage> {
        self.edited
            .write()
            .await
            .get_mut(&guild_id)
            .and_then(SnipeCache::pop)
    }

    /// Number of cached deleted and edited messages for the guild
    pub async fn snipe_counts(&self, guild_id: GuildId) -> (usize, usize) {
        let deleted = self
            .deleted
            .read()
            .await
            .get(&guild_id)
            .map_or(0, SnipeCache::len);
        let edited = self
            .edited
            .read()
            .await
            .get(&guild_id)
            .map_or(0, SnipeCache::len);
        (deleted, edited)
    }

    /// Empties both of the guild's snipe caches
    pub async fn clear_snipes(&self, guild_id: GuildId) {
        if let Some(cache) = self.deleted.write().await.get_mut(&guild_id) {
            cache.clear();
        }
        if let Some(cache) = self.edited.write().await.get_mut(&guild_id) {
            cache.clear();
        }
    }

    /// Trims every guild's caches with `policy`, dropping emptied guilds.
    /// Returns the number of entries removed.
    pub async fn clean_snipe_caches(&self, policy: &EvictionPolicy, now: i64) -> usize {
        let mut removed = 0;

        let mut deleted = self.deleted.write().await;
        for cache in deleted.values_mut() {
            removed += cache.clean_old_entries(policy, now);
        }
        deleted.retain(|_, cache| !cache.is_empty());
        drop(deleted);

        let mut edited = self.edited.write().await;
        for cache in edited.values_mut() {
            removed += cache.clean_old_entries(policy, now);
        }
        edited.retain(|_, cache| !cache.is_empty());

        removed
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::UserRecord;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let (_dir, state) = setup_test_state();

        let first = state.get_or_create_currency_account(42).await;
        let second = state.get_or_create_currency_account(42).await;

        assert_eq!(first, second);
        assert_eq!(first.wallet, 0);
        assert_eq!(first.bank, 0);
        assert_eq!(state.currency_snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_get_or_create_is_not_persisted() {
        let (dir, state) = setup_test_state();
        state.get_or_create_currency_account(1).await;
        assert!(!dir.path().join("currency.json").exists());
    }

    #[tokio::test]
    async fn test_currency_round_trip() {
        let (dir, state) = setup_test_state();
        state
            .update_account(7, |account| {
                account.wallet = 1_234;
                account.bank = 99;
                account.last_daily = 1_700_000_000;
                account.last_beg = 1_699_999_700;
                account.last_interest_time = 1_699_999_999;
                Ok(())
            })
            .await
            .unwrap();
        state.get_or_create_currency_account(8).await;
        state.save_currency().await;

        let reloaded = reload_state(&dir).await;
        assert_eq!(reloaded.currency_snapshot().await, state.currency_snapshot().await);
    }

    #[tokio::test]
    async fn test_failed_update_does_not_commit() {
        let (_dir, state) = setup_test_state();
        state
            .update_account(3, |account| {
                account.wallet = 50;
                Ok(())
            })
            .await
            .unwrap();

        let result: Result<()> = state
            .update_account(3, |account| {
                account.wallet = 0;
                Err(crate::errors::Error::InvalidAmount { amount: -1 })
            })
            .await;

        assert!(result.is_err());
        assert_eq!(state.get_or_create_currency_account(3).await.wallet, 50);
    }

    #[tokio::test]
    async fn test_load_all_tolerates_corrupt_dataset() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("currency.json"), "[[[").unwrap();
        std::fs::write(
            dir.path().join("summons.json"),
            r#"{"1": [2, 3]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("user_ids.json"),
            r#"{"owner": "10", "admins": {"11": {"name": "ann"}}, "users": {}}"#,
        )
        .unwrap();

        let state = reload_state(&dir).await;

        assert!(state.currency_snapshot().await.is_empty());
        assert_eq!(state.summons.read().await.get(&1), Some(&vec![2, 3]));
        let roles = state.roles.read().await;
        assert_eq!(roles.owner, Some(10));
        assert_eq!(roles.admins.get(&11), Some(&UserRecord::new("ann")));
    }

    #[tokio::test]
    async fn test_load_all_clamps_negative_balances() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("currency.json"),
            r#"{"5": {"wallet": -40, "bank": 12}}"#,
        )
        .unwrap();

        let state = reload_state(&dir).await;
        let account = state.get_or_create_currency_account(5).await;
        assert_eq!(account.wallet, 0);
        assert_eq!(account.bank, 12);
    }

    #[tokio::test]
    async fn test_load_all_clamps_timestamps_and_stamps_interest() {
        use crate::config::EconomyConfig;
        use crate::core::currency::{self, RewardPeriod};

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("currency.json"),
            r#"{
                "5": {"wallet": 10, "bank": 100, "last_daily": -1e30,
                      "last_interest_time": "-9223372036854775808"},
                "6": {"wallet": 0, "bank": 1000}
            }"#,
        )
        .unwrap();

        let state = reload_state(&dir).await;
        let config = EconomyConfig::default();
        let loaded = state.get_or_create_currency_account(5).await;
        assert_eq!(loaded.last_daily, 0);
        assert_eq!(loaded.last_interest_time, TEST_NOW);
        assert_eq!(state.get_or_create_currency_account(6).await.last_interest_time, TEST_NOW);

        let reward = currency::claim_reward(&state, 5, RewardPeriod::Daily, &config, TEST_NOW)
            .await
            .unwrap();
        assert_eq!(reward, config.daily_reward);

        // missing interest times wait a full interval
        assert_eq!(currency::apply_interest(&state, &config, TEST_NOW + 1).await.unwrap(), 0);
        let later = TEST_NOW + config.interest_interval_secs;
        assert_eq!(currency::apply_interest(&state, &config, later).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_memory() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where the data directory should be
        let blocker = dir.path().join("data");
        std::fs::write(&blocker, "").unwrap();
        let state = StateStore::new(DataFiles::new(&blocker), EvictionPolicy::default());

        state
            .update_account(1, |account| {
                account.wallet = 10;
                Ok(())
            })
            .await
            .unwrap();
        state.save_currency().await;

        assert_eq!(state.get_or_create_currency_account(1).await.wallet, 10);
    }

    #[tokio::test]
    async fn test_toggle_global_restricted() {
        let (_dir, state) = setup_test_state();
        assert!(!state.is_global_restricted());
        assert!(state.toggle_global_restricted());
        assert!(state.is_global_restricted());
        assert!(!state.toggle_global_restricted());
    }

    #[tokio::test]
    async fn test_snipe_is_lifo_and_bounded() {
        let (_dir, state) = setup_test_state();
        for n in 0..60 {
            state
                .record_deleted(
                    9,
                    DeletedMessage {
                        content: format!("m{n}"),
                        author_id: 1,
                        timestamp: n,
                    },
                    n,
                )
                .await;
        }

        assert_eq!(state.snipe_counts(9).await, (50, 0));
        assert_eq!(state.pop_deleted(9).await.unwrap().content, "m59");
        assert_eq!(state.pop_deleted(9).await.unwrap().content, "m58");
        assert!(state.pop_deleted(10).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_and_clean_snipes() {
        let (_dir, state) = setup_test_state();
        let edit = |ts| EditedMessage {
            old_content: "a".to_string(),
            new_content: "b".to_string(),
            author_id: 2,
            timestamp: ts,
        };
        state.record_edited(1, edit(0), 0).await;
        state.record_edited(2, edit(0), 0).await;
        state.record_edited(2, edit(950), 950).await;

        let removed = state
            .clean_snipe_caches(&EvictionPolicy::cleanup(), 1000)
            .await;
        assert_eq!(removed, 2);
        assert_eq!(state.snipe_counts(1).await, (0, 0));
        assert_eq!(state.snipe_counts(2).await, (0, 1));

        state.clear_snipes(2).await;
        assert!(state.pop_edited(2).await.is_none());
    }
}
