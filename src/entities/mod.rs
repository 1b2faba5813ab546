//! Entity module - typed records for every dataset the bot keeps.
//! Durable records derive serde and map one-to-one onto the JSON files written
//! by [`crate::storage`]; volatile records (snipe snapshots) live only in memory.

pub mod currency;
mod lenient;
pub mod message;
pub mod shop;
pub mod user;

pub use currency::CurrencyAccount;
pub use message::{DeletedMessage, EditedMessage, Timestamped};
pub use shop::{LootEntry, LootTables, Shop};
pub use user::{RoleSets, UserRecord};

use std::collections::BTreeMap;

/// Platform user identifier (Discord snowflake)
pub type UserId = u64;

/// Platform guild identifier (Discord snowflake)
pub type GuildId = u64;

/// `summons.json`: owner id -> ordered target ids
pub type SummonLists = BTreeMap<UserId, Vec<UserId>>;

/// `birthdays.json`: user id -> `DD-MM`
pub type Birthdays = BTreeMap<UserId, String>;

/// `currency.json`: user id -> account
pub type CurrencyAccounts = BTreeMap<UserId, CurrencyAccount>;
