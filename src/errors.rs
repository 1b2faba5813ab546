//! Unified error types for guildkeeper.
//!
//! Authorization outcomes are deliberately not part of this enum; see
//! [`crate::core::access::AccessDecision`].

use thiserror::Error;

/// All failures surfaced by the core and the bot layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description
        message: String,
    },

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or non-unicode environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Amount was zero, negative or otherwise unusable
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: i64,
    },

    /// A balance is too small for the requested operation
    #[error("Insufficient funds for user {user_id}: needed {needed}, available {available}")]
    InsufficientFunds {
        /// Account that came up short
        user_id: u64,
        /// Amount required
        needed: i64,
        /// Amount actually held
        available: i64,
    },

    /// A cooldown-gated action was attempted too early
    #[error("Cooldown active: {remaining_secs}s remaining")]
    CooldownActive {
        /// Seconds until the action becomes available
        remaining_secs: i64,
    },

    /// Birthday string was not a real `DD-MM` date
    #[error("Invalid birthday '{date}': expected DD-MM")]
    InvalidBirthday {
        /// The rejected input
        date: String,
    },

    /// Leaderboard page out of range
    #[error("Invalid page {page}: there are {total_pages} page(s)")]
    InvalidPage {
        /// Requested page
        page: usize,
        /// Pages available
        total_pages: usize,
    },

    /// Wager rejected or driven through an illegal transition
    #[error("Invalid wager: {message}")]
    InvalidWager {
        /// Human readable description
        message: String,
    },

    /// String formatting failure while building a reply
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
