//! Core layer - framework-agnostic bot logic.
//!
//! Everything here works against a [`state::StateStore`] and plain ids, never
//! against Discord types, so it can be tested without a gateway connection.
//! Clock readings and random draws are taken by the caller and passed in.

/// Permission gate applied before every command
pub mod access;
/// Per-user away messages
pub mod afk;
/// Birthday storage and lookup
pub mod birthday;
/// Wallets, bank, cooldowns, rewards and the leaderboard
pub mod currency;
/// Owner, admin, user and blacklist membership
pub mod roles;
/// Shop prices and loot tables
pub mod shop;
/// Bounded caches of deleted and edited messages
pub mod snipe;
/// The shared in-memory store and its persistence hooks
pub mod state;
/// Per-user summon lists
pub mod summon;
/// Two-player coin-flip and dice wagers
pub mod wager;
