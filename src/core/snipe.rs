//! Bounded per-guild caches of deleted and edited messages.
//!
//! A cache is a FIFO for eviction (oldest entries fall out first) and a stack
//! for retrieval (`pop` returns the newest entry). The eviction policy is
//! passed per call because the message listeners and the periodic cleanup
//! trim the same caches with different bounds.

use crate::entities::Timestamped;
use std::collections::VecDeque;

/// Bounds applied when trimming a snipe cache
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvictionPolicy {
    /// Entries kept at most
    pub max_entries: usize,
    /// Entries older than this many seconds are dropped, if set
    pub max_age_secs: Option<i64>,
}

impl EvictionPolicy {
    /// Capacity used by the message listeners
    pub const DEFAULT_MAX_ENTRIES: usize = 50;
    /// Age used by the cleanup helper
    pub const DEFAULT_MAX_AGE_SECS: i64 = 900;

    /// Count-only eviction
    #[must_use]
    pub const fn capped(max_entries: usize) -> Self {
        Self {
            max_entries,
            max_age_secs: None,
        }
    }

    /// Count and age eviction
    #[must_use]
    pub const fn aged(max_entries: usize, max_age_secs: i64) -> Self {
        Self {
            max_entries,
            max_age_secs: Some(max_age_secs),
        }
    }

    /// The cleanup helper's bounds: 50 entries, 15 minutes
    #[must_use]
    pub const fn cleanup() -> Self {
        Self::aged(Self::DEFAULT_MAX_ENTRIES, Self::DEFAULT_MAX_AGE_SECS)
    }

    const fn is_expired(&self, timestamp: i64, now: i64) -> bool {
        match self.max_age_secs {
            Some(max_age) => now - timestamp > max_age,
            None => false,
        }
    }
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self::capped(Self::DEFAULT_MAX_ENTRIES)
    }
}

/// One guild's snipe history
#[derive(Clone, Debug)]
pub struct SnipeCache<T> {
    entries: VecDeque<T>,
}

impl<T> Default for SnipeCache<T> {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }
}

impl<T: Timestamped> SnipeCache<T> {
    /// Appends `entry`, then evicts per `policy`.
    pub fn push(&mut self, entry: T, policy: &EvictionPolicy, now: i64) {
        self.entries.push_back(entry);
        self.clean_old_entries(policy, now);
    }

    /// Removes and returns the most recently appended entry.
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    /// Drops entries from the front while the cache is over capacity or the
    /// oldest entry is past the age limit. Returns how many were dropped.
    pub fn clean_old_entries(&mut self, policy: &EvictionPolicy, now: i64) -> usize {
        let mut removed = 0;
        while let Some(oldest) = self.entries.front() {
            let over_capacity = self.entries.len() > policy.max_entries;
            if !over_capacity && !policy.is_expired(oldest.timestamp(), now) {
                break;
            }
            self.entries.pop_front();
            removed += 1;
        }
        removed
    }

    /// Empties the cache
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DeletedMessage;

    fn deleted(n: i64) -> DeletedMessage {
        DeletedMessage {
            content: format!("message {n}"),
            author_id: 1,
            timestamp: n,
        }
    }

    #[test]
    fn test_pop_is_last_in_first_out() {
        let policy = EvictionPolicy::default();
        let mut cache = SnipeCache::default();
        for n in 0..5 {
            cache.push(deleted(n), &policy, n);
        }

        let popped: Vec<i64> = std::iter::from_fn(|| cache.pop()).map(|m| m.timestamp).collect();
        assert_eq!(popped, vec![4, 3, 2, 1, 0]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let policy = EvictionPolicy::default();
        let mut cache = SnipeCache::default();
        for n in 0..120 {
            cache.push(deleted(n), &policy, n);
            assert!(cache.len() <= 50);
        }

        assert_eq!(cache.len(), 50);
        // newest survives, 0..70 were evicted
        assert_eq!(cache.pop().map(|m| m.timestamp), Some(119));
        let mut oldest = None;
        while let Some(m) = cache.pop() {
            oldest = Some(m.timestamp);
        }
        assert_eq!(oldest, Some(70));
    }

    #[test]
    fn test_age_policy_drops_stale_entries() {
        let policy = EvictionPolicy::cleanup();
        let mut cache = SnipeCache::default();
        cache.push(deleted(0), &policy, 0);
        cache.push(deleted(500), &policy, 500);

        // at t=1000 the first entry is 1000s old, the second 500s
        cache.push(deleted(1000), &policy, 1000);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.pop().map(|m| m.timestamp), Some(1000));
        assert_eq!(cache.pop().map(|m| m.timestamp), Some(500));
    }

    #[test]
    fn test_capped_policy_ignores_age() {
        let policy = EvictionPolicy::capped(50);
        let mut cache = SnipeCache::default();
        cache.push(deleted(0), &policy, 0);
        assert_eq!(cache.clean_old_entries(&policy, 1_000_000), 0);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_age_exactly_at_limit_is_kept() {
        let policy = EvictionPolicy::aged(50, 900);
        let mut cache = SnipeCache::default();
        cache.push(deleted(100), &policy, 100);
        assert_eq!(cache.clean_old_entries(&policy, 1000), 0);
        assert_eq!(cache.clean_old_entries(&policy, 1001), 1);
    }
}
