//! Currency account entity - one entry per user in `currency.json`.

use super::lenient;
use serde::{Deserialize, Serialize};

/// Wallet, bank and per-cooldown timestamps (unix seconds) for one user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAccount {
    /// Spendable balance
    #[serde(default, deserialize_with = "lenient::int")]
    pub wallet: i64,
    /// Interest-bearing balance
    #[serde(default, deserialize_with = "lenient::int")]
    pub bank: i64,
    /// Last `daily` claim
    #[serde(default, deserialize_with = "lenient::int")]
    pub last_daily: i64,
    /// Last `weekly` claim
    #[serde(default, deserialize_with = "lenient::int")]
    pub last_weekly: i64,
    /// Last `monthly` claim
    #[serde(default, deserialize_with = "lenient::int")]
    pub last_monthly: i64,
    /// Last `beg` attempt
    #[serde(default, deserialize_with = "lenient::int")]
    pub last_beg: i64,
    /// Last bankruptcy declaration
    #[serde(default, deserialize_with = "lenient::int")]
    pub last_bankruptcy: i64,
    /// Last time interest was paid; files without it load as unstamped
    #[serde(default = "unstamped", deserialize_with = "lenient::int")]
    pub last_interest_time: i64,
}

const fn unstamped() -> i64 {
    -1
}

impl CurrencyAccount {
    /// Wallet plus bank
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.wallet.saturating_add(self.bank)
    }

    /// Clamps negative balances to zero and every timestamp into `0..=now`.
    /// A negative interest time (absent from the file) becomes `now`, so the
    /// first payment waits a full interval. Returns true if anything changed.
    pub fn sanitize(&mut self, now: i64) -> bool {
        let before = self.clone();
        self.wallet = self.wallet.max(0);
        self.bank = self.bank.max(0);
        for stamp in [
            &mut self.last_daily,
            &mut self.last_weekly,
            &mut self.last_monthly,
            &mut self.last_beg,
            &mut self.last_bankruptcy,
        ] {
            *stamp = (*stamp).clamp(0, now.max(0));
        }
        if self.last_interest_time < 0 || self.last_interest_time > now {
            self.last_interest_time = now;
        }
        *self != before
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_legacy_values_are_accepted() {
        let account: CurrencyAccount = serde_json::from_str(
            r#"{"wallet": 120, "bank": 1010.5, "last_daily": 1700000000.75, "daily_claimed": false}"#,
        )
        .unwrap();

        assert_eq!(account.wallet, 120);
        assert_eq!(account.bank, 1010);
        assert_eq!(account.last_daily, 1_700_000_000);
        assert_eq!(account.last_beg, 0);
    }

    #[test]
    fn test_sanitize_clamps_negative_balances() {
        let mut account = CurrencyAccount {
            wallet: -5,
            bank: 10,
            ..Default::default()
        };
        assert!(account.sanitize(100));
        assert_eq!(account.wallet, 0);
        assert_eq!(account.bank, 10);
        assert!(!account.sanitize(100));
    }

    #[test]
    fn test_sanitize_clamps_timestamps() {
        let mut account: CurrencyAccount = serde_json::from_str(
            r#"{"wallet": 10, "last_daily": -1e30, "last_beg": 9000, "last_weekly": 50}"#,
        )
        .unwrap();
        assert_eq!(account.last_interest_time, -1);

        assert!(account.sanitize(1_000));
        assert_eq!(account.last_daily, 0);
        assert_eq!(account.last_beg, 1_000);
        assert_eq!(account.last_weekly, 50);
        assert_eq!(account.last_interest_time, 1_000);
    }
}
