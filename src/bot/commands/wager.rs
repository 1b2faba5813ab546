//! Wager Discord commands - coin flips and dice rolls between two users.
//!
//! Each command walks a [`crate::core::wager::Wager`] through its states,
//! waiting for replies in the invoking channel with a message collector.
//! A reply window that closes without an answer cancels the wager.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::checks},
        core::wager::{
            self, CoinSide, Wager, WagerGame, WagerOutcome, WagerRoll,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude::{self as serenity, Mentionable};
    use rand::Rng;

    /// Waits for the next message from `from` in the invoking channel whose
    /// text satisfies `accept`. `None` when the wager timeout elapses.
    async fn await_reply<F>(
        ctx: poise::Context<'_, BotData, Error>,
        from: serenity::UserId,
        accept: F,
    ) -> Option<String>
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        serenity::MessageCollector::new(ctx.serenity_context())
            .channel_id(ctx.channel_id())
            .author_id(from)
            .timeout(ctx.data().settings.wager_timeout)
            .filter(move |m| accept(&m.content))
            .next()
            .await
            .map(|m| m.content)
    }

    /// Asks the opponent to accept. Returns true if they did; otherwise the
    /// wager has been canceled and the channel told why.
    async fn confirm(
        ctx: poise::Context<'_, BotData, Error>,
        wager: &mut Wager,
        opponent: &serenity::User,
    ) -> Result<bool> {
        let reply = await_reply(ctx, opponent.id, |text| {
            wager::parse_confirmation(text).is_some()
        })
        .await;

        match reply.as_deref().and_then(wager::parse_confirmation) {
            Some(true) => Ok(true),
            Some(false) => {
                wager.decline()?;
                ctx.say(format!(
                    "{} declined the wager. Wager canceled.",
                    opponent.mention()
                ))
                .await?;
                Ok(false)
            }
            None => {
                wager.time_out();
                ctx.say(format!(
                    "{}, you took too long to respond. Wager canceled.",
                    opponent.mention()
                ))
                .await?;
                Ok(false)
            }
        }
    }

    async fn open(
        ctx: poise::Context<'_, BotData, Error>,
        game: WagerGame,
        opponent: &serenity::User,
        amount: i64,
    ) -> Result<Option<Wager>> {
        if opponent.bot {
            ctx.say("❌ You can't wager against a bot.").await?;
            return Ok(None);
        }
        let wager = Wager::open(
            &ctx.data().state,
            game,
            ctx.author().id.get(),
            opponent.id.get(),
            amount,
        )
        .await?;
        Ok(Some(wager))
    }

    /// Challenge another user to a wager.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("coinflip", "dice"),
        check = "checks::is_allowed"
    )]
    pub async fn wager(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let p = &ctx.data().settings.prefix;
        ctx.say(format!(
            "Please specify a game type: `{p}wager coinflip` or `{p}wager dice`."
        ))
        .await?;
        Ok(())
    }

    /// Challenge a user to a coin flip. You pick the side.
    #[poise::command(slash_command, prefix_command, aliases("cf"))]
    pub async fn coinflip(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to challenge"] opponent: serenity::User,
        #[description = "Coins each side puts up"] amount: i64,
    ) -> Result<()> {
        let Some(mut wager) = open(ctx, WagerGame::CoinFlip, &opponent, amount).await? else {
            return Ok(());
        };
        let challenger = ctx.author();

        ctx.say(format!(
            "{}, do you choose heads or tails? Type `heads` or `tails`.",
            challenger.mention()
        ))
        .await?;

        let choice = await_reply(ctx, challenger.id, |text| text.parse::<CoinSide>().is_ok())
            .await
            .and_then(|text| text.parse::<CoinSide>().ok());
        let Some(side) = choice else {
            wager.time_out();
            ctx.say(format!(
                "{}, you took too long to respond. Wager canceled.",
                challenger.mention()
            ))
            .await?;
            return Ok(());
        };
        wager.choose(side)?;

        ctx.say(format!(
            "{}, {} has challenged you to a coin flip wager!\n\
            You: {}\n\
            {}: {side}\n\
            Amount: {amount}\n\
            Do you accept? Type `yes` or `no`.",
            opponent.mention(),
            challenger.mention(),
            side.opposite(),
            challenger.mention(),
        ))
        .await?;

        if !confirm(ctx, &mut wager, &opponent).await? {
            return Ok(());
        }

        let landed = if rand::random::<bool>() {
            CoinSide::Heads
        } else {
            CoinSide::Tails
        };
        let state = &ctx.data().state;
        let outcome = wager.resolve(state, WagerRoll::Coin(landed)).await?;
        state.save_currency().await;

        if let WagerOutcome::Won {
            winner,
            loser,
            amount,
        } = outcome
        {
            ctx.say(format!(
                "The coin landed on **{landed}**!\n\
                Congratulations, <@{winner}>! You won {amount} coins from <@{loser}>."
            ))
            .await?;
        }
        Ok(())
    }

    /// Challenge a user to a dice roll. Higher roll wins; ties return the stakes.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dice(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User to challenge"] opponent: serenity::User,
        #[description = "Coins each side puts up"] amount: i64,
    ) -> Result<()> {
        let Some(mut wager) = open(ctx, WagerGame::Dice, &opponent, amount).await? else {
            return Ok(());
        };
        let challenger = ctx.author();

        ctx.say(format!(
            "{}, {} has challenged you to a dice wager for {amount} coins!\n\
            Do you accept? Type `yes` or `no`.",
            opponent.mention(),
            challenger.mention(),
        ))
        .await?;

        if !confirm(ctx, &mut wager, &opponent).await? {
            return Ok(());
        }

        let (challenger_roll, opponent_roll) = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(1..=6u8), rng.gen_range(1..=6u8))
        };
        let state = &ctx.data().state;
        let outcome = wager
            .resolve(
                state,
                WagerRoll::Dice {
                    challenger: challenger_roll,
                    opponent: opponent_roll,
                },
            )
            .await?;
        state.save_currency().await;

        let rolls = format!(
            "🎲 {} rolled **{challenger_roll}**, {} rolled **{opponent_roll}**.",
            challenger.mention(),
            opponent.mention()
        );
        let result = match outcome {
            WagerOutcome::Won {
                winner,
                loser,
                amount,
            } => format!("Congratulations, <@{winner}>! You won {amount} coins from <@{loser}>."),
            WagerOutcome::Tie => "It's a tie! No coins change hands.".to_string(),
        };
        ctx.say(format!("{rolls}\n{result}")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
