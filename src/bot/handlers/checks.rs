//! Command checks wired into `#[poise::command(check = "...")]`.
//!
//! A check that refuses a command tells the user why: prefix invocations get
//! a ❌ reaction, slash invocations an ephemeral reply. Returning `false` then
//! makes poise skip the command body silently.

use crate::{
    bot::BotData,
    core::access::{self, AccessDecision, RoleRequirement},
    errors::{Error, Result},
};
use tracing::debug;

async fn refuse(ctx: poise::Context<'_, BotData, Error>, reason: &str) -> Result<()> {
    debug!(
        user_id = ctx.author().id.get(),
        command = %ctx.command().qualified_name,
        "Command refused: {}",
        reason
    );
    match ctx {
        poise::Context::Prefix(prefix) => {
            prefix.msg.react(ctx.serenity_context(), '❌').await?;
        }
        poise::Context::Application(_) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(reason)
                    .ephemeral(true),
            )
            .await?;
        }
    }
    Ok(())
}

/// Gate for general commands: paused, blacklisted, or not permitted while
/// access is restricted.
pub async fn is_allowed(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    match access::check_access(&ctx.data().state, ctx.author().id.get()).await {
        AccessDecision::Allow => Ok(true),
        AccessDecision::Deny(reason) => {
            refuse(ctx, &reason.to_string()).await?;
            Ok(false)
        }
    }
}

async fn require(
    ctx: poise::Context<'_, BotData, Error>,
    requirement: RoleRequirement,
) -> Result<bool> {
    if access::has_role(&ctx.data().state, ctx.author().id.get(), requirement).await {
        return Ok(true);
    }
    refuse(ctx, "You do not have permission to use this command.").await?;
    Ok(false)
}

/// Gate for admin commands (admins and the owner)
pub async fn is_admin_or_owner(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    require(ctx, RoleRequirement::Admin).await
}

/// Gate for owner commands
pub async fn is_owner(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    require(ctx, RoleRequirement::Owner).await
}
