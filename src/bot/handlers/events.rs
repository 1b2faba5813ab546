//! Gateway event handling.
//!
//! * new message: clears the author's AFK status and announces AFK users
//!   that were mentioned
//! * message delete / edit: captures a snapshot into the guild's snipe cache
//!
//! Deleted message text comes from serenity's message cache, so deletes of
//! messages sent before the bot started (or evicted from the cache) are not
//! captured.

use crate::{
    bot::BotData,
    core::{afk, state::StateStore},
    entities::{DeletedMessage, EditedMessage, UserId},
    errors::{Error, Result},
};
use poise::serenity_prelude::{self as serenity, Mentionable};
use tracing::{debug, trace};

/// Entry point registered in `FrameworkOptions::event_handler`.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            on_message(ctx, new_message, data).await?;
        }
        serenity::FullEvent::MessageDelete {
            channel_id,
            deleted_message_id,
            guild_id,
        } => {
            let Some(guild_id) = guild_id else {
                return Ok(());
            };
            // Copy out of the cache before awaiting; the cache ref must not be held
            let captured = ctx
                .cache
                .message(*channel_id, *deleted_message_id)
                .filter(|m| !m.author.bot)
                .map(|m| (m.content.clone(), m.author.id.get()));

            let Some((content, author_id)) = captured else {
                trace!(%deleted_message_id, "Deleted message not in cache");
                return Ok(());
            };
            let now = chrono::Utc::now().timestamp();
            data.state
                .record_deleted(
                    guild_id.get(),
                    DeletedMessage {
                        content,
                        author_id,
                        timestamp: now,
                    },
                    now,
                )
                .await;
        }
        serenity::FullEvent::MessageUpdate {
            old_if_available,
            new,
            event,
        } => {
            let Some(guild_id) = event.guild_id else {
                return Ok(());
            };
            let Some(old) = old_if_available else {
                trace!(message_id = %event.id, "Edited message not in cache");
                return Ok(());
            };
            if old.author.bot {
                return Ok(());
            }
            let new_content = event
                .content
                .clone()
                .or_else(|| new.as_ref().map(|m| m.content.clone()));
            // Embed unfurls arrive as updates without a text change
            let Some(new_content) = new_content.filter(|c| *c != old.content) else {
                return Ok(());
            };

            let now = chrono::Utc::now().timestamp();
            data.state
                .record_edited(
                    guild_id.get(),
                    EditedMessage {
                        old_content: old.content.clone(),
                        new_content,
                        author_id: old.author.id.get(),
                        timestamp: now,
                    },
                    now,
                )
                .await;
        }
        _ => {}
    }
    Ok(())
}

/// Whether `content` invokes the `afk` command itself, which must not clear
/// the status it just set.
fn is_afk_command(content: &str, prefix: &str) -> bool {
    content
        .strip_prefix(prefix)
        .and_then(|rest| rest.split_whitespace().next())
        .is_some_and(|name| name.eq_ignore_ascii_case("afk"))
}

/// AFK bookkeeping for one message, independent of the gateway
#[derive(Debug, Default, PartialEq, Eq)]
struct AfkUpdate {
    /// The author had a status and it was removed
    cleared: bool,
    /// Mentioned users that are AFK, with their messages
    mentioned: Vec<(UserId, String)>,
}

/// Clears the author's status (unless the message is the `afk` command) and
/// collects the statuses of mentioned users. Access state is not consulted:
/// a paused bot or a blacklisted author still comes back from AFK.
async fn afk_update(
    state: &StateStore,
    author: UserId,
    content: &str,
    prefix: &str,
    mentions: impl IntoIterator<Item = UserId>,
) -> AfkUpdate {
    let cleared = !is_afk_command(content, prefix) && afk::clear(state, author).await.is_some();
    let mut mentioned = Vec::new();
    for user_id in mentions {
        if let Some(afk_message) = afk::message(state, user_id).await {
            mentioned.push((user_id, afk_message));
        }
    }
    AfkUpdate { cleared, mentioned }
}

async fn on_message(
    ctx: &serenity::Context,
    message: &serenity::Message,
    data: &BotData,
) -> Result<()> {
    if message.author.bot {
        return Ok(());
    }

    let update = afk_update(
        &data.state,
        message.author.id.get(),
        &message.content,
        &data.settings.prefix,
        message.mentions.iter().map(|user| user.id.get()).collect::<Vec<_>>(),
    )
    .await;

    if update.cleared {
        debug!(user_id = message.author.id.get(), "AFK cleared");
        message
            .channel_id
            .say(
                ctx,
                format!(
                    "Welcome back, {}! You are no longer AFK.",
                    message.author.mention()
                ),
            )
            .await?;
    }

    for (user_id, afk_message) in update.mentioned {
        let name = message
            .mentions
            .iter()
            .find(|user| user.id.get() == user_id)
            .map_or_else(|| format!("<@{user_id}>"), |user| user.name.clone());
        message
            .channel_id
            .say(ctx, format!("{name} is AFK: {afk_message}"))
            .await?;
    }
    Ok(())
}
