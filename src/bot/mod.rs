//! Bot layer - Discord-specific interface, command handlers and background tasks
//!
//! Everything in here is a thin adapter: it reads ids and arguments from
//! Discord, calls into [`crate::core`], and turns the result into a reply.

/// Discord command implementations grouped by audience
pub mod commands;
/// Permission checks, gateway event handling and periodic tasks
pub mod handlers;

use crate::{
    config::{EconomyConfig, Settings},
    core::state::StateStore,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Messages kept per channel in serenity's cache so deletes can be sniped
const CACHED_MESSAGES_PER_CHANNEL: usize = 200;

/// Shared data available to all bot commands.
pub struct BotData {
    /// The in-memory store every feature reads and writes
    pub state: Arc<StateStore>,
    /// Process settings (prefix, timeouts, snipe bounds)
    pub settings: Arc<Settings>,
    /// Economy tuning from `config.toml`
    pub economy: Arc<EconomyConfig>,
}

impl BotData {
    /// Creates a new `BotData` from the shared store and configuration.
    #[must_use]
    pub const fn new(
        state: Arc<StateStore>,
        settings: Arc<Settings>,
        economy: Arc<EconomyConfig>,
    ) -> Self {
        Self {
            state,
            settings,
            economy,
        }
    }
}

/// User-facing text for errors a command body can surface.
fn describe_error(error: &Error) -> String {
    match error {
        Error::InvalidAmount { .. } => "❌ Please enter a positive amount.".to_string(),
        Error::InsufficientFunds {
            user_id, available, ..
        } => format!("❌ <@{user_id}> doesn't have enough coins (has {available})."),
        Error::CooldownActive { remaining_secs } => format!(
            "⏳ You need to wait {} before doing that again.",
            crate::core::currency::format_remaining(*remaining_secs)
        ),
        Error::InvalidBirthday { .. } => "❌ Invalid date format. Please use DD-MM.".to_string(),
        Error::InvalidPage { total_pages: 0, .. } => "The leaderboard is empty.".to_string(),
        Error::InvalidPage { total_pages, .. } => format!(
            "❌ Invalid page number. Please select a page between 1 and {total_pages}."
        ),
        Error::InvalidWager { message } => format!("❌ {message}"),
        other => format!("An error occurred: {other}"),
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            warn!("Error in command `{}`: {}", ctx.command().name, error);
            if let Err(e) = ctx.say(describe_error(&error)).await {
                error!("Failed to send error message: {}", e);
            }
        }
        // Checks already told the user why they were turned away
        poise::FrameworkError::CommandCheckFailed { error: None, .. } => {}
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the poise framework and runs the gateway client until shutdown.
#[instrument(skip(token, state, settings, economy))]
pub async fn run_bot(
    token: String,
    state: Arc<StateStore>,
    settings: Arc<Settings>,
    economy: Arc<EconomyConfig>,
) -> Result<()> {
    let prefix = settings.prefix.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::events::event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                handlers::tasks::spawn_background_tasks(
                    Arc::clone(&state),
                    Arc::clone(&settings),
                    Arc::clone(&economy),
                );

                Ok(BotData::new(state, settings, economy))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let mut cache_settings = ::serenity::cache::Settings::default();
    cache_settings.max_messages = CACHED_MESSAGES_PER_CHANNEL;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .cache_settings(cache_settings)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
