//! Admin Discord commands - user registry, access flags, snipe caches and
//! balance overrides. Available to bot admins and the owner.
//!
//! These commands check roles only, not the pause flag, so `unpause` keeps
//! working while the bot is paused.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::checks},
        core::{currency, roles},
        entities::{UserId, UserRecord},
        errors::{Error, Result},
    };
    use poise::serenity_prelude::{self as serenity, Mentionable};
    use std::fmt::Write;

    /// Renders a role listing as an embed
    pub fn roster_embed(
        title: &str,
        members: &[(UserId, UserRecord)],
        colour: serenity::Colour,
    ) -> Result<serenity::CreateEmbed> {
        let mut description = String::new();
        for (id, record) in members {
            writeln!(&mut description, "<@{id}> ({})", record.name)?;
        }
        Ok(serenity::CreateEmbed::default()
            .title(title)
            .description(description)
            .colour(colour))
    }

    /// Manage bot-level users: add, remove, list.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("user_add", "user_remove", "user_list"),
        check = "checks::is_admin_or_owner"
    )]
    pub async fn user(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Available subcommands: `add`, `remove`, `list`.")
            .await?;
        Ok(())
    }

    /// Registers a member as a bot user.
    #[poise::command(slash_command, prefix_command, rename = "add")]
    pub async fn user_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to register"] member: serenity::User,
    ) -> Result<()> {
        let state = &ctx.data().state;
        if roles::add_user(state, member.id.get(), &member.name)
            .await
            .changed()
        {
            state.save_users().await;
            ctx.say(format!("{} has been added as a bot user.", member.mention()))
                .await?;
        } else {
            ctx.say(format!("{} is already a registered user.", member.mention()))
                .await?;
        }
        Ok(())
    }

    /// Removes a member from the bot users.
    #[poise::command(slash_command, prefix_command, rename = "remove")]
    pub async fn user_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to remove"] member: serenity::User,
    ) -> Result<()> {
        let state = &ctx.data().state;
        if roles::remove_user(state, member.id.get()).await.changed() {
            state.save_users().await;
            ctx.say(format!("{} has been removed as a bot user.", member.mention()))
                .await?;
        } else {
            ctx.say(format!("{} is not a registered user.", member.mention()))
                .await?;
        }
        Ok(())
    }

    /// Lists all registered bot users.
    #[poise::command(slash_command, prefix_command, rename = "list")]
    pub async fn user_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let users = roles::list_users(&ctx.data().state).await;
        if users.is_empty() {
            ctx.say("No users are currently registered.").await?;
            return Ok(());
        }
        let embed = roster_embed("Registered Users", &users, serenity::Colour::BLURPLE)?;
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Toggles between open access and registered-users-only.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin_or_owner")]
    pub async fn toggle_access(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let restricted = ctx.data().state.toggle_global_restricted();
        let mode = if restricted {
            "restricted to users"
        } else {
            "open to everyone"
        };
        ctx.say(format!("Global access is now {mode}.")).await?;
        Ok(())
    }

    /// Pauses the bot for everyone.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin_or_owner")]
    pub async fn pause(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.data().state.set_paused(true);
        ctx.say("Bot functionality has been paused.").await?;
        Ok(())
    }

    /// Resumes the bot.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin_or_owner")]
    pub async fn unpause(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.data().state.set_paused(false);
        ctx.say("Bot functionality has been resumed.").await?;
        Ok(())
    }

    /// Clears this server's snipe and editsnipe caches.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        aliases("cs"),
        check = "checks::is_admin_or_owner"
    )]
    pub async fn clearsnipes(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let state = &ctx.data().state;
        let (deleted, edited) = state.snipe_counts(guild_id.get()).await;
        state.clear_snipes(guild_id.get()).await;
        ctx.say(format!(
            "Cleared the snipe and editsnipe caches ({deleted} deleted, {edited} edited)."
        ))
        .await?;
        Ok(())
    }

    /// Sets a member's wallet balance.
    #[poise::command(slash_command, prefix_command, check = "checks::is_admin_or_owner")]
    pub async fn setbalance(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User whose wallet to set"] member: serenity::User,
        #[description = "New wallet balance"] amount: i64,
    ) -> Result<()> {
        let state = &ctx.data().state;
        currency::set_balance(state, member.id.get(), amount).await?;
        state.save_currency().await;
        ctx.say(format!(
            "Set {}'s balance to {amount} coins.",
            member.mention()
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
