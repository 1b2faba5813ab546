//! Discord command implementations organized by audience.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Owner and admin commands for users, flags and caches
pub mod admin;

/// Wallet, bank, rewards, gambling and the leaderboard
pub mod currency;

/// General utility commands
pub mod general;

/// Owner-only commands
pub mod owner;

/// AFK, snipes, summons and birthdays
pub mod utility;

/// Coin-flip and dice wagers between two users
pub mod wager;

use crate::{bot::BotData, errors::Error};

/// Every command the framework registers
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        general::ping(),
        general::help(),
        currency::wallet(),
        currency::daily(),
        currency::weekly(),
        currency::monthly(),
        currency::gamble(),
        currency::beg(),
        currency::bankruptcy(),
        currency::leaderboard(),
        currency::bank(),
        currency::shop(),
        currency::loot(),
        wager::wager(),
        utility::afk(),
        utility::snipe(),
        utility::editsnipe(),
        utility::summon(),
        utility::birthday(),
        admin::user(),
        admin::toggle_access(),
        admin::pause(),
        admin::unpause(),
        admin::clearsnipes(),
        admin::setbalance(),
        owner::admin(),
        owner::blacklist(),
        owner::stop(),
    ]
}
