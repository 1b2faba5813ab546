//! Shop and loot-table records. Read-only reference data for the economy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `shop.json`: item name -> price in coins
pub type Shop = BTreeMap<String, i64>;

/// `loottables.json`: table name -> weighted entries
pub type LootTables = BTreeMap<String, Vec<LootEntry>>;

/// One weighted outcome of a loot table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    /// Display name
    pub name: String,
    /// Rarity label
    #[serde(default)]
    pub rarity: String,
    /// Relative selection weight
    #[serde(default)]
    pub weight: u32,
    /// Lower bound of the rolled weight (kg)
    #[serde(default)]
    pub min_weight: f64,
    /// Upper bound of the rolled weight (kg)
    #[serde(default)]
    pub max_weight: f64,
    /// Coins paid per kg
    #[serde(default)]
    pub payout_per_kg: f64,
}
