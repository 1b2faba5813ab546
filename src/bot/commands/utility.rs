//! Utility Discord commands - AFK, snipe/editsnipe, summon lists and birthdays.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::checks},
        core::{afk, birthday, roles::MembershipChange, summon},
        entities::UserId,
        errors::{Error, Result},
    };
    use poise::serenity_prelude::{self as serenity, Mentionable};

    /// Display name for a user id, falling back to the raw id
    async fn user_name(ctx: poise::Context<'_, BotData, Error>, user_id: UserId) -> String {
        serenity::UserId::new(user_id)
            .to_user(ctx.serenity_context())
            .await
            .map_or_else(|_| format!("User {user_id}"), |user| user.name)
    }

    /// Sets you as AFK with an optional message.
    #[poise::command(slash_command, prefix_command, check = "checks::is_allowed")]
    pub async fn afk(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Shown to anyone who mentions you"]
        #[rest]
        message: Option<String>,
    ) -> Result<()> {
        let message = message.unwrap_or_else(|| afk::DEFAULT_AFK_MESSAGE.to_string());
        afk::set(&ctx.data().state, ctx.author().id.get(), &message).await;
        ctx.say(format!("{} is now AFK: {message}", ctx.author().mention()))
            .await?;
        Ok(())
    }

    /// Shows the most recently deleted message in this server.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        aliases("s"),
        check = "checks::is_allowed"
    )]
    pub async fn snipe(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let Some(sniped) = ctx.data().state.pop_deleted(guild_id.get()).await else {
            ctx.say("No recently deleted messages to snipe!").await?;
            return Ok(());
        };

        let author = user_name(ctx, sniped.author_id).await;
        ctx.say(format!("**{author}**: {}", sniped.content)).await?;
        Ok(())
    }

    /// Shows the most recently edited message in this server.
    #[poise::command(
        slash_command,
        prefix_command,
        guild_only,
        aliases("es"),
        check = "checks::is_allowed"
    )]
    pub async fn editsnipe(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let Some(guild_id) = ctx.guild_id() else {
            return Ok(());
        };
        let Some(edited) = ctx.data().state.pop_edited(guild_id.get()).await else {
            ctx.say("No recently edited messages to snipe!").await?;
            return Ok(());
        };

        let author = user_name(ctx, edited.author_id).await;
        ctx.say(format!(
            "**{author}** edited their message:\n**Before:** {}\n**After:** {}",
            edited.old_content, edited.new_content
        ))
        .await?;
        Ok(())
    }

    /// Pings everyone in your summon list.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("summon_add", "summon_remove", "summon_clear", "summon_list"),
        check = "checks::is_allowed"
    )]
    pub async fn summon(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let targets = summon::list(&ctx.data().state, ctx.author().id.get()).await;
        if targets.is_empty() {
            ctx.say("Your summon list is empty!").await?;
            return Ok(());
        }

        let mentions: Vec<String> = targets.iter().map(|id| format!("<@{id}>")).collect();
        ctx.say(format!(
            "{} is summoning: {}",
            ctx.author().mention(),
            mentions.join(", ")
        ))
        .await?;
        Ok(())
    }

    /// Adds a member to your summon list.
    #[poise::command(slash_command, prefix_command, rename = "add")]
    pub async fn summon_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to add"] member: serenity::User,
    ) -> Result<()> {
        let state = &ctx.data().state;
        let change = summon::add(state, ctx.author().id.get(), member.id.get()).await;
        if change.changed() {
            state.save_summons().await;
            ctx.say(format!("{} has been added to your summon list.", member.mention()))
                .await?;
        } else {
            ctx.say(format!("{} is already in your summon list.", member.mention()))
                .await?;
        }
        Ok(())
    }

    /// Removes a member from your summon list.
    #[poise::command(slash_command, prefix_command, rename = "remove")]
    pub async fn summon_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to remove"] member: serenity::User,
    ) -> Result<()> {
        let state = &ctx.data().state;
        match summon::remove(state, ctx.author().id.get(), member.id.get()).await {
            MembershipChange::Removed => {
                state.save_summons().await;
                ctx.say(format!(
                    "{} has been removed from your summon list.",
                    member.mention()
                ))
                .await?;
            }
            _ => {
                ctx.say(format!("{} is not in your summon list.", member.mention()))
                    .await?;
            }
        }
        Ok(())
    }

    /// Clears your entire summon list.
    #[poise::command(slash_command, prefix_command, rename = "clear")]
    pub async fn summon_clear(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let state = &ctx.data().state;
        if summon::clear(state, ctx.author().id.get()).await {
            state.save_summons().await;
            ctx.say("Your summon list has been cleared.").await?;
        } else {
            ctx.say("You don't have a summon list to clear!").await?;
        }
        Ok(())
    }

    /// Lists your summon list without pinging anyone.
    #[poise::command(slash_command, prefix_command, rename = "list")]
    pub async fn summon_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let targets = summon::list(&ctx.data().state, ctx.author().id.get()).await;
        if targets.is_empty() {
            ctx.say("Your summon list is empty!").await?;
            return Ok(());
        }

        let mut names = Vec::with_capacity(targets.len());
        for id in targets {
            names.push(user_name(ctx, id).await);
        }
        ctx.say(format!("Your summon list: {}", names.join(", ")))
            .await?;
        Ok(())
    }

    /// Birthday tracker: set, remove, check, today.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("birthday_set", "birthday_remove", "birthday_check", "birthday_today"),
        check = "checks::is_allowed"
    )]
    pub async fn birthday(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Available subcommands: set, remove, check, today").await?;
        Ok(())
    }

    /// Sets your birthday in DD-MM format (e.g. 25-12).
    #[poise::command(slash_command, prefix_command, rename = "set")]
    pub async fn birthday_set(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Your birthday as DD-MM"] date: String,
    ) -> Result<()> {
        let state = &ctx.data().state;
        birthday::set(state, ctx.author().id.get(), date.trim()).await?;
        state.save_birthdays().await;
        ctx.say(format!("Your birthday has been set to {}.", date.trim()))
            .await?;
        Ok(())
    }

    /// Removes your birthday from the tracker.
    #[poise::command(slash_command, prefix_command, rename = "remove")]
    pub async fn birthday_remove(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let state = &ctx.data().state;
        if birthday::remove(state, ctx.author().id.get()).await {
            state.save_birthdays().await;
            ctx.say("Your birthday has been removed.").await?;
        } else {
            ctx.say("You do not have a birthday set.").await?;
        }
        Ok(())
    }

    /// Checks someone's birthday (defaults to you).
    #[poise::command(slash_command, prefix_command, rename = "check")]
    pub async fn birthday_check(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to look up"] member: Option<serenity::User>,
    ) -> Result<()> {
        let member = member.as_ref().unwrap_or_else(|| ctx.author());
        match birthday::get(&ctx.data().state, member.id.get()).await {
            Some(date) => {
                ctx.say(format!("{}'s birthday is on {date}.", member.name))
                    .await?;
            }
            None => {
                ctx.say(format!("{} has not set a birthday.", member.name))
                    .await?;
            }
        }
        Ok(())
    }

    /// Lists everyone whose birthday is today.
    #[poise::command(slash_command, prefix_command, rename = "today")]
    pub async fn birthday_today(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let today = chrono::Local::now().date_naive();
        let users = birthday::today_birthdays(&ctx.data().state, today).await;
        if users.is_empty() {
            ctx.say("No birthdays today.").await?;
            return Ok(());
        }

        let mentions: Vec<String> = users.iter().map(|id| format!("<@{id}>")).collect();
        ctx.say(format!("🎉 Today's birthdays: {}", mentions.join(", ")))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
