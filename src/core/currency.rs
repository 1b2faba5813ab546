//! Currency business logic - rewards, cooldowns, gambling, banking and the
//! leaderboard.
//!
//! Every operation validates first and mutates through
//! [`StateStore::update_account`] or [`StateStore::update_accounts`], so a
//! rejected request leaves balances exactly as they were. Randomness is
//! decided by the caller and passed in, which keeps these functions
//! deterministic. Callers persist with [`StateStore::save_currency`].

use crate::config::EconomyConfig;
use crate::core::state::StateStore;
use crate::entities::{CurrencyAccount, UserId};
use crate::errors::{Error, Result};
use tracing::{debug, info};

/// Timestamps tracked on each account
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cooldown {
    /// `daily`
    Daily,
    /// `weekly`
    Weekly,
    /// `monthly`
    Monthly,
    /// `beg`
    Beg,
    /// `bankruptcy`
    Bankruptcy,
}

impl Cooldown {
    /// When the action was last used (unix seconds, 0 if never)
    #[must_use]
    pub const fn last_used(self, account: &CurrencyAccount) -> i64 {
        match self {
            Self::Daily => account.last_daily,
            Self::Weekly => account.last_weekly,
            Self::Monthly => account.last_monthly,
            Self::Beg => account.last_beg,
            Self::Bankruptcy => account.last_bankruptcy,
        }
    }

    const fn mark(self, account: &mut CurrencyAccount, now: i64) {
        match self {
            Self::Daily => account.last_daily = now,
            Self::Weekly => account.last_weekly = now,
            Self::Monthly => account.last_monthly = now,
            Self::Beg => account.last_beg = now,
            Self::Bankruptcy => account.last_bankruptcy = now,
        }
    }

    /// Cooldown length in seconds
    #[must_use]
    pub const fn duration_secs(self, config: &EconomyConfig) -> i64 {
        match self {
            Self::Daily => config.daily_cooldown_secs,
            Self::Weekly => config.weekly_cooldown_secs,
            Self::Monthly => config.monthly_cooldown_secs,
            Self::Beg => config.beg_cooldown_secs,
            Self::Bankruptcy => config.bankruptcy_cooldown_secs,
        }
    }

    /// Seconds left before the action is available again (0 if ready)
    #[must_use]
    pub const fn remaining_secs(self, account: &CurrencyAccount, config: &EconomyConfig, now: i64) -> i64 {
        let elapsed = now.saturating_sub(self.last_used(account));
        let remaining = self.duration_secs(config).saturating_sub(elapsed);
        if remaining > 0 { remaining } else { 0 }
    }

    fn ensure_ready(self, account: &CurrencyAccount, config: &EconomyConfig, now: i64) -> Result<()> {
        match self.remaining_secs(account, config, now) {
            0 => Ok(()),
            remaining_secs => Err(Error::CooldownActive { remaining_secs }),
        }
    }
}

/// Periodic rewards
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardPeriod {
    /// Once a day
    Daily,
    /// Once a week
    Weekly,
    /// Once a month
    Monthly,
}

impl RewardPeriod {
    /// Cooldown tracking this reward
    #[must_use]
    pub const fn cooldown(self) -> Cooldown {
        match self {
            Self::Daily => Cooldown::Daily,
            Self::Weekly => Cooldown::Weekly,
            Self::Monthly => Cooldown::Monthly,
        }
    }

    /// Coins granted
    #[must_use]
    pub const fn amount(self, config: &EconomyConfig) -> i64 {
        match self {
            Self::Daily => config.daily_reward,
            Self::Weekly => config.weekly_reward,
            Self::Monthly => config.monthly_reward,
        }
    }
}

fn validate_amount(amount: i64) -> Result<()> {
    if amount <= 0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn ensure_funds(user_id: UserId, available: i64, needed: i64) -> Result<()> {
    if available < needed {
        return Err(Error::InsufficientFunds {
            user_id,
            needed,
            available,
        });
    }
    Ok(())
}

/// Credits a periodic reward if its cooldown has elapsed. Returns the reward.
pub async fn claim_reward(
    state: &StateStore,
    user_id: UserId,
    period: RewardPeriod,
    config: &EconomyConfig,
    now: i64,
) -> Result<i64> {
    let reward = period.amount(config);
    state
        .update_account(user_id, |account| {
            period.cooldown().ensure_ready(account, config, now)?;
            account.wallet = account.wallet.saturating_add(reward);
            period.cooldown().mark(account, now);
            Ok(())
        })
        .await?;
    info!(user_id, ?period, reward, "Reward claimed");
    Ok(reward)
}

/// Records a beg attempt. `reward` is `None` when the caller's coin toss
/// came up empty; the cooldown starts either way.
pub async fn beg(
    state: &StateStore,
    user_id: UserId,
    reward: Option<i64>,
    config: &EconomyConfig,
    now: i64,
) -> Result<Option<i64>> {
    if let Some(amount) = reward {
        validate_amount(amount)?;
    }
    state
        .update_account(user_id, |account| {
            Cooldown::Beg.ensure_ready(account, config, now)?;
            if let Some(amount) = reward {
                account.wallet = account.wallet.saturating_add(amount);
            }
            Cooldown::Beg.mark(account, now);
            Ok(reward)
        })
        .await
}

/// Doubles or loses `amount` from the wallet. Returns the new wallet.
pub async fn gamble(state: &StateStore, user_id: UserId, amount: i64, won: bool) -> Result<i64> {
    validate_amount(amount)?;
    let wallet = state
        .update_account(user_id, |account| {
            ensure_funds(user_id, account.wallet, amount)?;
            if won {
                account.wallet = account.wallet.saturating_add(amount);
            } else {
                account.wallet -= amount;
            }
            Ok(account.wallet)
        })
        .await?;
    debug!(user_id, amount, won, wallet, "Gamble resolved");
    Ok(wallet)
}

/// Resets the account to the bankruptcy wallet with an empty bank and every
/// reward cooldown restarted.
pub async fn declare_bankruptcy(
    state: &StateStore,
    user_id: UserId,
    config: &EconomyConfig,
    now: i64,
) -> Result<()> {
    state
        .update_account(user_id, |account| {
            Cooldown::Bankruptcy.ensure_ready(account, config, now)?;
            account.wallet = config.bankruptcy_wallet;
            account.bank = 0;
            for cooldown in [
                Cooldown::Daily,
                Cooldown::Weekly,
                Cooldown::Monthly,
                Cooldown::Bankruptcy,
            ] {
                cooldown.mark(account, now);
            }
            Ok(())
        })
        .await?;
    info!(user_id, "Bankruptcy declared");
    Ok(())
}

/// Moves coins from wallet to bank
pub async fn deposit(state: &StateStore, user_id: UserId, amount: i64) -> Result<CurrencyAccount> {
    validate_amount(amount)?;
    state
        .update_account(user_id, |account| {
            ensure_funds(user_id, account.wallet, amount)?;
            account.wallet -= amount;
            account.bank = account.bank.saturating_add(amount);
            Ok(account.clone())
        })
        .await
}

/// Moves coins from bank to wallet
pub async fn withdraw(state: &StateStore, user_id: UserId, amount: i64) -> Result<CurrencyAccount> {
    validate_amount(amount)?;
    state
        .update_account(user_id, |account| {
            ensure_funds(user_id, account.bank, amount)?;
            account.bank -= amount;
            account.wallet = account.wallet.saturating_add(amount);
            Ok(account.clone())
        })
        .await
}

/// Overwrites a wallet (admin action). Negative values are refused.
pub async fn set_balance(state: &StateStore, user_id: UserId, amount: i64) -> Result<()> {
    if amount < 0 {
        return Err(Error::InvalidAmount { amount });
    }
    state
        .update_account(user_id, |account| {
            account.wallet = amount;
            Ok(())
        })
        .await?;
    info!(user_id, amount, "Wallet set by admin");
    Ok(())
}

/// Moves `amount` between two wallets in one critical section.
///
/// Both accounts are created if missing. Fails without changing anything if
/// `from` is short.
pub async fn transfer(state: &StateStore, from: UserId, to: UserId, amount: i64) -> Result<()> {
    validate_amount(amount)?;
    if from == to {
        return Err(Error::InvalidWager {
            message: "cannot transfer coins to yourself".to_string(),
        });
    }
    state
        .update_accounts(|accounts| {
            let available = accounts.get(&from).map_or(0, |a| a.wallet);
            ensure_funds(from, available, amount)?;
            accounts.entry(from).or_default().wallet -= amount;
            let receiver = accounts.entry(to).or_default();
            receiver.wallet = receiver.wallet.saturating_add(amount);
            Ok(())
        })
        .await?;
    debug!(from, to, amount, "Transfer completed");
    Ok(())
}

/// Pays interest on every account whose last payment is at least one
/// interval old. Returns how many accounts received a non-zero payment.
pub async fn apply_interest(state: &StateStore, config: &EconomyConfig, now: i64) -> Result<usize> {
    let paid = state
        .update_accounts(|accounts| {
            let mut paid = 0;
            for account in accounts.values_mut() {
                if now.saturating_sub(account.last_interest_time) < config.interest_interval_secs {
                    continue;
                }
                let interest = account.bank.saturating_mul(config.interest_percent) / 100;
                if interest > 0 {
                    account.bank = account.bank.saturating_add(interest);
                    paid += 1;
                }
                account.last_interest_time = now;
            }
            Ok(paid)
        })
        .await?;
    info!(paid, "Interest applied");
    Ok(paid)
}

/// One leaderboard row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    /// Account holder
    pub user_id: UserId,
    /// Wallet balance
    pub wallet: i64,
    /// Bank balance
    pub bank: i64,
}

impl LeaderboardEntry {
    /// Wallet plus bank
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.wallet.saturating_add(self.bank)
    }
}

/// One page of the leaderboard
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardPage {
    /// Page shown (1-based)
    pub page: usize,
    /// Number of pages
    pub total_pages: usize,
    /// Rows on this page
    pub entries: Vec<LeaderboardEntry>,
}

/// Accounts ranked by wallet + bank (ties by id), paginated.
pub async fn leaderboard(state: &StateStore, page: usize, page_size: usize) -> Result<LeaderboardPage> {
    let page_size = page_size.max(1);
    let mut ranked: Vec<(UserId, CurrencyAccount)> = state.currency_snapshot().await.into_iter().collect();
    let total_pages = ranked.len().div_ceil(page_size);
    if page == 0 || page > total_pages {
        return Err(Error::InvalidPage { page, total_pages });
    }

    ranked.sort_by(|(a_id, a), (b_id, b)| b.total().cmp(&a.total()).then(a_id.cmp(b_id)));

    let start = (page - 1) * page_size;
    let entries = ranked
        .into_iter()
        .enumerate()
        .skip(start)
        .take(page_size)
        .map(|(i, (user_id, account))| LeaderboardEntry {
            rank: i + 1,
            user_id,
            wallet: account.wallet,
            bank: account.bank,
        })
        .collect();

    Ok(LeaderboardPage {
        page,
        total_pages,
        entries,
    })
}

/// Formats seconds as `1d 2h 3m 4s`, dropping the day part when zero
#[must_use]
pub fn format_remaining(secs: i64) -> String {
    let secs = secs.max(0);
    let (days, rest) = (secs / 86_400, secs % 86_400);
    let (hours, rest) = (rest / 3_600, rest % 3_600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else {
        format!("{hours}h {minutes}m {seconds}s")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    const NOW: i64 = 1_700_000_000;

    #[tokio::test]
    async fn test_daily_reward_and_cooldown() {
        let (_dir, state) = setup_test_state();
        let config = EconomyConfig::default();

        let reward = claim_reward(&state, 1, RewardPeriod::Daily, &config, NOW).await.unwrap();
        assert_eq!(reward, 500);

        let again = claim_reward(&state, 1, RewardPeriod::Daily, &config, NOW + 3_600).await;
        match again {
            Err(Error::CooldownActive { remaining_secs }) => assert_eq!(remaining_secs, 82_800),
            other => panic!("expected cooldown, got {other:?}"),
        }

        // weekly is tracked separately
        claim_reward(&state, 1, RewardPeriod::Weekly, &config, NOW + 3_600).await.unwrap();
        claim_reward(&state, 1, RewardPeriod::Daily, &config, NOW + 86_400).await.unwrap();

        let account = state.get_or_create_currency_account(1).await;
        assert_eq!(account.wallet, 500 + 3_500 + 500);
        assert_eq!(account.last_daily, NOW + 86_400);
    }

    #[tokio::test]
    async fn test_beg_sets_cooldown_even_without_reward() {
        let (_dir, state) = setup_test_state();
        let config = EconomyConfig::default();

        assert_eq!(beg(&state, 1, None, &config, NOW).await.unwrap(), None);
        assert!(matches!(
            beg(&state, 1, Some(100), &config, NOW + 10).await,
            Err(Error::CooldownActive { .. })
        ));
        assert_eq!(beg(&state, 1, Some(100), &config, NOW + 300).await.unwrap(), Some(100));
        assert_eq!(state.get_or_create_currency_account(1).await.wallet, 100);
    }

    #[tokio::test]
    async fn test_gamble_validation_and_outcomes() {
        let (_dir, state) = setup_with_wallets(&[(1, 100)]).await;

        assert!(matches!(gamble(&state, 1, 0, true).await, Err(Error::InvalidAmount { .. })));
        assert!(matches!(gamble(&state, 1, -5, true).await, Err(Error::InvalidAmount { .. })));
        assert!(matches!(
            gamble(&state, 1, 101, true).await,
            Err(Error::InsufficientFunds { needed: 101, available: 100, .. })
        ));

        assert_eq!(gamble(&state, 1, 40, true).await.unwrap(), 140);
        assert_eq!(gamble(&state, 1, 140, false).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_deposit_and_withdraw() {
        let (_dir, state) = setup_with_wallets(&[(1, 100)]).await;

        let account = deposit(&state, 1, 60).await.unwrap();
        assert_eq!((account.wallet, account.bank), (40, 60));

        assert!(deposit(&state, 1, 41).await.is_err());
        assert!(withdraw(&state, 1, 61).await.is_err());

        let account = withdraw(&state, 1, 10).await.unwrap();
        assert_eq!((account.wallet, account.bank), (50, 50));
    }

    #[tokio::test]
    async fn test_bankruptcy_resets_and_restarts_cooldowns() {
        let (_dir, state) = setup_with_wallets(&[(1, 10)]).await;
        let config = EconomyConfig::default();
        deposit(&state, 1, 10).await.unwrap();

        declare_bankruptcy(&state, 1, &config, NOW).await.unwrap();
        let account = state.get_or_create_currency_account(1).await;
        assert_eq!((account.wallet, account.bank), (500, 0));
        assert_eq!(account.last_daily, NOW);
        assert_eq!(account.last_monthly, NOW);

        assert!(claim_reward(&state, 1, RewardPeriod::Daily, &config, NOW + 1).await.is_err());
        assert!(declare_bankruptcy(&state, 1, &config, NOW + 60).await.is_err());
    }

    #[tokio::test]
    async fn test_set_balance_rejects_negative() {
        let (_dir, state) = setup_test_state();
        assert!(set_balance(&state, 1, -1).await.is_err());
        set_balance(&state, 1, 777).await.unwrap();
        assert_eq!(state.get_or_create_currency_account(1).await.wallet, 777);
    }

    #[tokio::test]
    async fn test_transfer_conserves_total() {
        let (_dir, state) = setup_with_wallets(&[(1, 100), (2, 50)]).await;

        transfer(&state, 1, 2, 30).await.unwrap();
        assert!(transfer(&state, 2, 1, 81).await.is_err());
        assert!(transfer(&state, 1, 1, 10).await.is_err());

        let a = state.get_or_create_currency_account(1).await.wallet;
        let b = state.get_or_create_currency_account(2).await.wallet;
        assert_eq!((a, b), (70, 80));
    }

    #[tokio::test]
    async fn test_apply_interest_respects_interval() {
        let (_dir, state) = setup_with_wallets(&[(1, 1_000), (2, 0)]).await;
        let config = EconomyConfig::default();
        deposit(&state, 1, 1_000).await.unwrap();

        assert_eq!(apply_interest(&state, &config, NOW).await.unwrap(), 1);
        assert_eq!(state.get_or_create_currency_account(1).await.bank, 1_010);

        // a second run inside the interval pays nothing
        assert_eq!(apply_interest(&state, &config, NOW + 100).await.unwrap(), 0);
        assert_eq!(apply_interest(&state, &config, NOW + 86_400).await.unwrap(), 1);
        assert_eq!(state.get_or_create_currency_account(1).await.bank, 1_020);
    }

    #[tokio::test]
    async fn test_extreme_timestamps_do_not_overflow() {
        let (_dir, state) = setup_test_state();
        let config = EconomyConfig::default();
        state
            .update_account(1, |account| {
                account.bank = 1_000;
                account.last_daily = i64::MIN;
                account.last_beg = i64::MAX;
                account.last_interest_time = i64::MIN;
                Ok(())
            })
            .await
            .unwrap();

        claim_reward(&state, 1, RewardPeriod::Daily, &config, NOW).await.unwrap();
        assert!(matches!(
            beg(&state, 1, Some(20), &config, NOW).await,
            Err(Error::CooldownActive { .. })
        ));
        assert_eq!(apply_interest(&state, &config, NOW).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_leaderboard_pages() {
        let wallets: Vec<(u64, i64)> = (1..=12).map(|id| (id, i64::try_from(id).unwrap() * 10)).collect();
        let (_dir, state) = setup_with_wallets(&wallets).await;

        let first = leaderboard(&state, 1, 10).await.unwrap();
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.entries.len(), 10);
        assert_eq!(first.entries[0].user_id, 12);
        assert_eq!(first.entries[0].rank, 1);

        let second = leaderboard(&state, 2, 10).await.unwrap();
        assert_eq!(second.entries.len(), 2);
        assert_eq!(second.entries[1].user_id, 1);
        assert_eq!(second.entries[1].rank, 12);

        assert!(matches!(
            leaderboard(&state, 3, 10).await,
            Err(Error::InvalidPage { page: 3, total_pages: 2 })
        ));
        assert!(leaderboard(&state, 0, 10).await.is_err());
    }

    #[tokio::test]
    async fn test_leaderboard_empty() {
        let (_dir, state) = setup_test_state();
        assert!(matches!(
            leaderboard(&state, 1, 10).await,
            Err(Error::InvalidPage { total_pages: 0, .. })
        ));
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(0), "0h 0m 0s");
        assert_eq!(format_remaining(3_725), "1h 2m 5s");
        assert_eq!(format_remaining(90_061), "1d 1h 1m 1s");
        assert_eq!(format_remaining(-5), "0h 0m 0s");
    }
}
