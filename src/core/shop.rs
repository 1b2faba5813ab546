//! Read-only views over the shop price list and the loot tables.

use crate::core::state::StateStore;
use crate::entities::LootEntry;

/// Shop items ordered by price, then name
pub async fn items(state: &StateStore) -> Vec<(String, i64)> {
    let mut items: Vec<(String, i64)> = state
        .shop
        .read()
        .await
        .iter()
        .map(|(name, price)| (name.clone(), *price))
        .collect();
    items.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    items
}

/// Price of a single item, matched case-insensitively
pub async fn price(state: &StateStore, item: &str) -> Option<i64> {
    state
        .shop
        .read()
        .await
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(item.trim()))
        .map(|(_, price)| *price)
}

/// Names of every loot table
pub async fn loot_table_names(state: &StateStore) -> Vec<String> {
    state.loot_tables.read().await.keys().cloned().collect()
}

/// Entries of one loot table, matched case-insensitively
pub async fn loot_table(state: &StateStore, name: &str) -> Option<Vec<LootEntry>> {
    state
        .loot_tables
        .read()
        .await
        .iter()
        .find(|(table, _)| table.eq_ignore_ascii_case(name.trim()))
        .map(|(_, entries)| entries.clone())
}

/// Chance of each entry being drawn, in percent, in table order.
/// A table whose weights are all zero gives every entry 0%.
#[must_use]
pub fn drop_chances(entries: &[LootEntry]) -> Vec<f64> {
    let total: u64 = entries.iter().map(|e| u64::from(e.weight)).sum();
    entries
        .iter()
        .map(|e| {
            if total == 0 {
                0.0
            } else {
                #[allow(clippy::cast_precision_loss)] // weights are small
                let chance = f64::from(e.weight) * 100.0 / total as f64;
                chance
            }
        })
        .collect()
}
