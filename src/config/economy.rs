//! Economy tuning loaded from `config.toml`.
//!
//! The file is optional. Any `[economy]` key left out keeps its default, so a
//! deployment only lists the values it wants to change:
//!
//! ```toml
//! [economy]
//! daily_reward = 750
//! interest_percent = 2
//! ```

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Top-level shape of `config.toml`
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Economy section
    #[serde(default)]
    pub economy: EconomyConfig,
}

/// Reward amounts, cooldowns and rates for the currency commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Coins granted by `daily`
    pub daily_reward: i64,
    /// Seconds between `daily` claims
    pub daily_cooldown_secs: i64,
    /// Coins granted by `weekly`
    pub weekly_reward: i64,
    /// Seconds between `weekly` claims
    pub weekly_cooldown_secs: i64,
    /// Coins granted by `monthly`
    pub monthly_reward: i64,
    /// Seconds between `monthly` claims
    pub monthly_cooldown_secs: i64,
    /// Seconds between `beg` attempts
    pub beg_cooldown_secs: i64,
    /// Smallest successful `beg` reward
    pub beg_min_reward: i64,
    /// Largest successful `beg` reward
    pub beg_max_reward: i64,
    /// Seconds between bankruptcy declarations
    pub bankruptcy_cooldown_secs: i64,
    /// Wallet after declaring bankruptcy
    pub bankruptcy_wallet: i64,
    /// Whole-percent interest paid on bank balances
    pub interest_percent: i64,
    /// Seconds an account waits between interest payments
    pub interest_interval_secs: i64,
    /// Rows per leaderboard page
    pub leaderboard_page_size: usize,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            daily_reward: 500,
            daily_cooldown_secs: 86_400,
            weekly_reward: 3_500,
            weekly_cooldown_secs: 604_800,
            monthly_reward: 15_000,
            monthly_cooldown_secs: 2_592_000,
            beg_cooldown_secs: 300,
            beg_min_reward: 10,
            beg_max_reward: 250,
            bankruptcy_cooldown_secs: 3_600,
            bankruptcy_wallet: 500,
            interest_percent: 1,
            interest_interval_secs: 86_400,
            leaderboard_page_size: 10,
        }
    }
}

impl EconomyConfig {
    fn validate(self) -> Result<Self> {
        if self.beg_min_reward > self.beg_max_reward {
            return Err(Error::Config {
                message: format!(
                    "beg_min_reward ({}) exceeds beg_max_reward ({})",
                    self.beg_min_reward, self.beg_max_reward
                ),
            });
        }
        if self.beg_min_reward <= 0 {
            return Err(Error::Config {
                message: "beg_min_reward must be positive".to_string(),
            });
        }
        if self.interest_interval_secs <= 0 {
            return Err(Error::Config {
                message: "interest_interval_secs must be positive".to_string(),
            });
        }
        if self.leaderboard_page_size == 0 {
            return Err(Error::Config {
                message: "leaderboard_page_size must be at least 1".to_string(),
            });
        }
        if self.interest_percent < 0 || self.bankruptcy_wallet < 0 {
            return Err(Error::Config {
                message: "interest_percent and bankruptcy_wallet must not be negative"
                    .to_string(),
            });
        }
        Ok(self)
    }
}

/// Parses economy settings from TOML text.
pub fn parse_economy_config(contents: &str) -> Result<EconomyConfig> {
    let file: FileConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    file.economy.validate()
}

/// Loads economy settings from a TOML file, using defaults if the file is absent.
///
/// # Errors
/// Returns an error if the file exists but cannot be read, is not valid TOML,
/// or holds inconsistent values.
pub fn load_economy_config<P: AsRef<Path>>(path: P) -> Result<EconomyConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load economy configuration from: {:?}", path_ref);

    match std::fs::read_to_string(path_ref) {
        Ok(contents) => parse_economy_config(&contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No config file at {:?}; using default economy settings", path_ref);
            Ok(EconomyConfig::default())
        }
        Err(e) => Err(Error::Config {
            message: format!("Failed to read config file {path_ref:?}: {e}"),
        }),
    }
}
