//! Runtime settings for the bot process.
//!
//! Values come from environment variables (optionally seeded from `.env` by
//! `main`). Every variable has a default except the Discord token, which is
//! read directly in `main` and never stored here.

use crate::errors::{Error, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_PREFIX: &str = ",";
const DEFAULT_WAGER_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SNIPE_MAX_ENTRIES: usize = 50;
const DEFAULT_SNIPE_CLEANUP_AGE_SECS: i64 = 900;

/// Process-wide settings shared by the store and the bot layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory holding the JSON datasets
    pub data_dir: PathBuf,
    /// Prefix for text commands
    pub prefix: String,
    /// Owner to install when the users dataset has none
    pub owner_id: Option<u64>,
    /// How long wager flows wait for a reply
    pub wager_timeout: Duration,
    /// Capacity of each guild's snipe cache
    pub snipe_max_entries: usize,
    /// Age eviction applied by the message listeners, if any
    pub snipe_max_age_secs: Option<i64>,
    /// Age used by the periodic snipe cleanup task
    pub snipe_cleanup_age_secs: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            owner_id: None,
            wager_timeout: Duration::from_secs(DEFAULT_WAGER_TIMEOUT_SECS),
            snipe_max_entries: DEFAULT_SNIPE_MAX_ENTRIES,
            snipe_max_age_secs: None,
            snipe_cleanup_age_secs: DEFAULT_SNIPE_CLEANUP_AGE_SECS,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    ///
    /// Unset keys fall back to defaults; set but malformed keys are an
    /// [`Error::Config`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_dir = lookup("DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let prefix = lookup("COMMAND_PREFIX")
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(defaults.prefix);
        let owner_id = parse_optional(&lookup, "BOT_OWNER_ID")?;
        let wager_timeout = parse_optional::<u64, _>(&lookup, "WAGER_TIMEOUT_SECS")?
            .map_or(defaults.wager_timeout, Duration::from_secs);
        let snipe_max_entries = parse_optional(&lookup, "SNIPE_MAX_ENTRIES")?
            .unwrap_or(defaults.snipe_max_entries);
        let snipe_max_age_secs = parse_optional(&lookup, "SNIPE_MAX_AGE_SECS")?;
        let snipe_cleanup_age_secs = parse_optional(&lookup, "SNIPE_CLEANUP_AGE_SECS")?
            .unwrap_or(defaults.snipe_cleanup_age_secs);

        if snipe_max_entries == 0 {
            return Err(Error::Config {
                message: "SNIPE_MAX_ENTRIES must be at least 1".to_string(),
            });
        }

        Ok(Self {
            data_dir,
            prefix,
            owner_id,
            wager_timeout,
            snipe_max_entries,
            snipe_max_age_secs,
            snipe_cleanup_age_secs,
        })
    }
}

fn parse_optional<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| Error::Config {
                message: format!("{key}='{raw}' is invalid: {e}"),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.prefix, ",");
        assert_eq!(settings.wager_timeout, Duration::from_secs(30));
        assert_eq!(settings.snipe_max_entries, 50);
        assert_eq!(settings.snipe_max_age_secs, None);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATA_DIR", "/tmp/bot"),
            ("COMMAND_PREFIX", "!"),
            ("BOT_OWNER_ID", "123456789"),
            ("WAGER_TIMEOUT_SECS", "5"),
            ("SNIPE_MAX_AGE_SECS", "600"),
        ]))
        .unwrap();

        assert_eq!(settings.data_dir, PathBuf::from("/tmp/bot"));
        assert_eq!(settings.prefix, "!");
        assert_eq!(settings.owner_id, Some(123_456_789));
        assert_eq!(settings.wager_timeout, Duration::from_secs(5));
        assert_eq!(settings.snipe_max_age_secs, Some(600));
    }

    #[test]
    fn test_malformed_value_is_config_error() {
        let result = Settings::from_lookup(lookup_from(&[("BOT_OWNER_ID", "not-a-number")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_zero_snipe_capacity_rejected() {
        let result = Settings::from_lookup(lookup_from(&[("SNIPE_MAX_ENTRIES", "0")]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
