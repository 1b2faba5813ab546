//! Background tasks started once the bot is ready.

use crate::{
    config::{EconomyConfig, Settings},
    core::{currency, snipe::EvictionPolicy, state::StateStore},
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, error, info};

/// How often the snipe caches are trimmed
const SNIPE_CLEANUP_PERIOD: Duration = Duration::from_secs(60);

/// Spawns the interest and snipe cleanup loops. They run until the runtime
/// shuts down.
pub fn spawn_background_tasks(
    state: Arc<StateStore>,
    settings: Arc<Settings>,
    economy: Arc<EconomyConfig>,
) {
    let policy = EvictionPolicy::aged(settings.snipe_max_entries, settings.snipe_cleanup_age_secs);
    tokio::spawn(interest_loop(Arc::clone(&state), economy));
    tokio::spawn(snipe_cleanup_loop(state, policy));
    info!("Background tasks started");
}

async fn interest_loop(state: Arc<StateStore>, economy: Arc<EconomyConfig>) {
    let period = u64::try_from(economy.interest_interval_secs)
        .map_or(Duration::from_secs(86_400), Duration::from_secs);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let now = chrono::Utc::now().timestamp();
        match currency::apply_interest(&state, &economy, now).await {
            Ok(0) => debug!("No accounts due for interest"),
            Ok(paid) => {
                info!("Paid interest to {} account(s)", paid);
                state.save_currency().await;
            }
            Err(e) => error!("Interest run failed: {}", e),
        }
    }
}

async fn snipe_cleanup_loop(state: Arc<StateStore>, policy: EvictionPolicy) {
    let mut ticker = interval(SNIPE_CLEANUP_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let removed = state
            .clean_snipe_caches(&policy, chrono::Utc::now().timestamp())
            .await;
        if removed > 0 {
            debug!("Evicted {} stale snipe entries", removed);
        }
    }
}
