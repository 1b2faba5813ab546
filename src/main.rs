#![allow(clippy::result_large_err)]

use dotenvy::dotenv;
use guildkeeper::{
    bot,
    config::{Settings, load_economy_config},
    core::{roles, state::StateStore},
    errors::{Error, Result},
};
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Economy tuning file, read from the working directory
const ECONOMY_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also come from the environment
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load settings and economy tuning
    let settings = Settings::from_env()
        .inspect_err(|e| error!("Invalid settings: {}", e))?;
    let economy = load_economy_config(ECONOMY_CONFIG_PATH)
        .inspect_err(|e| error!("Invalid economy configuration: {}", e))?;
    info!("Data directory: {:?}", settings.data_dir);

    // 4. Build the state store and load every dataset
    let state = Arc::new(StateStore::from_settings(&settings));
    state.load_all(chrono::Utc::now().timestamp()).await;

    // 5. Install the configured owner when the users file has none
    if let Some(owner_id) = settings.owner_id {
        if roles::seed_owner(&state, owner_id).await {
            state.save_users().await;
        }
    }
    if roles::owner(&state).await.is_none() {
        info!("No bot owner configured; owner commands are unavailable.");
    }

    // 6. Run the bot
    // DISCORD_BOT_TOKEN is read here, directly before use, and never stored
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, state, Arc::new(settings), Arc::new(economy)).await?;

    info!("Bot stopped.");
    Ok(())
}
