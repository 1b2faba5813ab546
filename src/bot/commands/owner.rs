//! Owner Discord commands - admin registry, blacklist and shutdown.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, commands::admin::roster_embed, handlers::checks},
        core::roles,
        errors::{Error, Result},
    };
    use poise::serenity_prelude::{self as serenity, Mentionable};
    use tracing::info;

    /// Manage bot-level admins: add, remove, list.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("admin_add", "admin_remove", "admin_list"),
        check = "checks::is_owner"
    )]
    pub async fn admin(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Available subcommands: `add`, `remove`, `list`.")
            .await?;
        Ok(())
    }

    /// Makes a member a bot admin.
    #[poise::command(slash_command, prefix_command, rename = "add")]
    pub async fn admin_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to promote"] member: serenity::User,
    ) -> Result<()> {
        let state = &ctx.data().state;
        if roles::add_admin(state, member.id.get(), &member.name)
            .await
            .changed()
        {
            state.save_users().await;
            ctx.say(format!("{} has been added as a bot admin.", member.mention()))
                .await?;
        } else {
            ctx.say(format!("{} is already an admin.", member.mention()))
                .await?;
        }
        Ok(())
    }

    /// Removes a member from the bot admins.
    #[poise::command(slash_command, prefix_command, rename = "remove")]
    pub async fn admin_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to demote"] member: serenity::User,
    ) -> Result<()> {
        let state = &ctx.data().state;
        if roles::remove_admin(state, member.id.get()).await.changed() {
            state.save_users().await;
            ctx.say(format!("{} has been removed as a bot admin.", member.mention()))
                .await?;
        } else {
            ctx.say(format!("{} is not an admin.", member.mention()))
                .await?;
        }
        Ok(())
    }

    /// Lists all bot admins.
    #[poise::command(slash_command, prefix_command, rename = "list")]
    pub async fn admin_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let admins = roles::list_admins(&ctx.data().state).await;
        if admins.is_empty() {
            ctx.say("No admins are currently registered.").await?;
            return Ok(());
        }
        let embed = roster_embed("Registered Admins", &admins, serenity::Colour::GOLD)?;
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Adds a member to the blacklist, or removes them if already listed.
    #[poise::command(slash_command, prefix_command, check = "checks::is_owner")]
    pub async fn blacklist(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to toggle"] member: serenity::User,
    ) -> Result<()> {
        let state = &ctx.data().state;
        let blacklisted = roles::toggle_blacklist(state, member.id.get()).await;
        state.save_users().await;

        let reply = if blacklisted {
            format!("{} has been added to the blacklist.", member.mention())
        } else {
            format!("{} has been removed from the blacklist.", member.mention())
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Shuts the bot down.
    #[poise::command(slash_command, prefix_command, check = "checks::is_owner")]
    pub async fn stop(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Shutting down...").await?;
        info!(user_id = ctx.author().id.get(), "Shutdown requested");
        ctx.framework().shard_manager().shutdown_all().await;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
