//! General Discord commands - ping and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::checks},
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command, check = "checks::is_allowed")]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command, check = "checks::is_allowed")]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let p = &ctx.data().settings.prefix;
        let help_text = format!(
            "**Bot Help**\n\
            Commands work with the `{p}` prefix or as slash commands.\n\n\
            **Currency**\n\
            • `{p}wallet` - Shows your wallet.\n\
            • `{p}daily` / `{p}weekly` / `{p}monthly` - Claims a periodic reward.\n\
            • `{p}beg` - Begs for a few coins.\n\
            • `{p}gamble <amount>` - Double or nothing.\n\
            • `{p}bankruptcy` - Resets you to a fresh start.\n\
            • `{p}bank deposit|withdraw <amount>`, `{p}bank balance` - Bank account with daily interest.\n\
            • `{p}leaderboard [page]` - Richest users.\n\
            • `{p}shop`, `{p}loot [table]` - Shop prices and loot tables.\n\
            • `{p}wager coinflip|dice <user> <amount>` - Bet against another user.\n\n\
            **Utility**\n\
            • `{p}afk [message]` - Marks you as away until your next message.\n\
            • `{p}snipe` / `{p}editsnipe` - Shows the last deleted or edited message.\n\
            • `{p}summon [add|remove|clear|list]` - Pings your summon list.\n\
            • `{p}birthday set|remove|check|today` - Birthday tracker.\n\n\
            **Admin**\n\
            • `{p}user add|remove|list`, `{p}toggle_access`, `{p}pause`, `{p}unpause`, \
            `{p}clearsnipes`, `{p}setbalance <user> <amount>`\n\n\
            **Owner**\n\
            • `{p}admin add|remove|list`, `{p}blacklist <user>`, `{p}stop`"
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
