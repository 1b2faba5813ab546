//! Discord-side handlers that are not commands
//!
//! Permission checks run before command bodies, the event handler reacts to
//! raw gateway events, and the tasks run on timers for the process lifetime.

/// Command checks for the access gate and role requirements
pub mod checks;
/// Gateway event handling: AFK notices and snipe capture
pub mod events;
/// Periodic bank interest and snipe cache cleanup
pub mod tasks;
