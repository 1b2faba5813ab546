//! Currency Discord commands - wallet, rewards, gambling, bank, leaderboard
//! and the shop listings.
//!
//! Random draws happen here and are handed to [`crate::core::currency`];
//! errors such as an active cooldown or a short wallet propagate to the
//! framework error handler, which turns them into replies.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::checks},
        core::{
            currency::{self, RewardPeriod},
            shop,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude::{self as serenity, Mentionable};
    use rand::Rng;
    use std::fmt::Write;

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }

    async fn claim(ctx: poise::Context<'_, BotData, Error>, period: RewardPeriod) -> Result<()> {
        let data = ctx.data();
        let reward = currency::claim_reward(
            &data.state,
            ctx.author().id.get(),
            period,
            &data.economy,
            now(),
        )
        .await?;
        data.state.save_currency().await;

        ctx.say(format!(
            "{}, you claimed {reward} coins!",
            ctx.author().mention()
        ))
        .await?;
        Ok(())
    }

    /// Displays your wallet balance.
    #[poise::command(
        slash_command,
        prefix_command,
        aliases("bal"),
        check = "checks::is_allowed"
    )]
    pub async fn wallet(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let account = ctx
            .data()
            .state
            .get_or_create_currency_account(ctx.author().id.get())
            .await;

        let embed = serenity::CreateEmbed::default()
            .title(format!("{}'s Wallet Balance 💰", ctx.author().name))
            .description(format!("**Wallet:** {} coins", account.wallet))
            .color(serenity::Colour::GOLD)
            .footer(serenity::CreateEmbedFooter::new(
                "Keep earning more coins to increase your balance!",
            ));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Claims your daily reward.
    #[poise::command(slash_command, prefix_command, check = "checks::is_allowed")]
    pub async fn daily(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        claim(ctx, RewardPeriod::Daily).await
    }

    /// Claims your weekly reward.
    #[poise::command(slash_command, prefix_command, check = "checks::is_allowed")]
    pub async fn weekly(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        claim(ctx, RewardPeriod::Weekly).await
    }

    /// Claims your monthly reward.
    #[poise::command(slash_command, prefix_command, check = "checks::is_allowed")]
    pub async fn monthly(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        claim(ctx, RewardPeriod::Monthly).await
    }

    /// Gambles an amount from your wallet: double it or lose it.
    #[poise::command(slash_command, prefix_command, check = "checks::is_allowed")]
    pub async fn gamble(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Coins to risk"] amount: i64,
    ) -> Result<()> {
        let won = rand::random::<bool>();
        let state = &ctx.data().state;
        currency::gamble(state, ctx.author().id.get(), amount, won).await?;
        state.save_currency().await;

        let reply = if won {
            format!(
                "Congratulations {}, you won {amount} coins!",
                ctx.author().mention()
            )
        } else {
            format!("Sorry {}, you lost {amount} coins.", ctx.author().mention())
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Begs for coins. Sometimes it works.
    #[poise::command(slash_command, prefix_command, check = "checks::is_allowed")]
    pub async fn beg(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let economy = &data.economy;
        let reward = rand::random::<bool>().then(|| {
            rand::thread_rng().gen_range(economy.beg_min_reward..=economy.beg_max_reward)
        });

        let granted =
            currency::beg(&data.state, ctx.author().id.get(), reward, economy, now()).await?;
        data.state.save_currency().await;

        let reply = match granted {
            Some(coins) => format!(
                "{}, you begged and received {coins} coins!",
                ctx.author().mention()
            ),
            None => format!("{}, you begged and received nothing.", ctx.author().mention()),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Resets your balance and restarts every reward cooldown.
    #[poise::command(slash_command, prefix_command, check = "checks::is_allowed")]
    pub async fn bankruptcy(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        currency::declare_bankruptcy(&data.state, ctx.author().id.get(), &data.economy, now())
            .await?;
        data.state.save_currency().await;

        ctx.say(format!(
            "{}, you've declared bankruptcy! Your balance is now {} coins, \
            and all cooldowns have been set to their maximum.",
            ctx.author().mention(),
            data.economy.bankruptcy_wallet
        ))
        .await?;
        Ok(())
    }

    /// Shows the richest users, ten per page.
    #[poise::command(
        slash_command,
        prefix_command,
        aliases("lb"),
        check = "checks::is_allowed"
    )]
    pub async fn leaderboard(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Page to show (default 1)"] page: Option<usize>,
    ) -> Result<()> {
        let data = ctx.data();
        let board = currency::leaderboard(
            &data.state,
            page.unwrap_or(1),
            data.economy.leaderboard_page_size,
        )
        .await?;

        let mut description = String::new();
        for entry in &board.entries {
            writeln!(
                &mut description,
                "{}. <@{}>: {} coins (Wallet: {}, Bank: {})",
                entry.rank,
                entry.user_id,
                entry.total(),
                entry.wallet,
                entry.bank
            )?;
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!(
                "🏆 Leaderboard (Page {}/{}) 🏆",
                board.page, board.total_pages
            ))
            .description(description)
            .color(serenity::Colour::GOLD)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Use {}lb <page> to view other pages.",
                data.settings.prefix
            )));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Bank account: deposit, withdraw, balance.
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("bank_deposit", "bank_withdraw", "bank_balance"),
        check = "checks::is_allowed"
    )]
    pub async fn bank(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(format!(
            "{}, please specify a subcommand: deposit, withdraw, or balance.",
            ctx.author().mention()
        ))
        .await?;
        Ok(())
    }

    /// Moves coins from your wallet into the bank.
    #[poise::command(slash_command, prefix_command, rename = "deposit")]
    pub async fn bank_deposit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Coins to deposit"] amount: i64,
    ) -> Result<()> {
        let state = &ctx.data().state;
        currency::deposit(state, ctx.author().id.get(), amount).await?;
        state.save_currency().await;

        ctx.say(format!(
            "{}, you have deposited {amount} coins into your bank account.",
            ctx.author().mention()
        ))
        .await?;
        Ok(())
    }

    /// Moves coins from the bank back into your wallet.
    #[poise::command(slash_command, prefix_command, rename = "withdraw")]
    pub async fn bank_withdraw(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Coins to withdraw"] amount: i64,
    ) -> Result<()> {
        let state = &ctx.data().state;
        currency::withdraw(state, ctx.author().id.get(), amount).await?;
        state.save_currency().await;

        ctx.say(format!(
            "{}, you have withdrawn {amount} coins from your bank account.",
            ctx.author().mention()
        ))
        .await?;
        Ok(())
    }

    /// Displays your bank balance.
    #[poise::command(slash_command, prefix_command, rename = "balance", aliases("bal"))]
    pub async fn bank_balance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let account = data
            .state
            .get_or_create_currency_account(ctx.author().id.get())
            .await;

        let embed = serenity::CreateEmbed::default()
            .title(format!("{}'s Bank Balance 💰", ctx.author().name))
            .description(format!("**Bank:** {} coins", account.bank))
            .color(serenity::Colour::GOLD)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Keep depositing coins to your bank! Interest is {}% per payout.",
                data.economy.interest_percent
            )));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists the items for sale and their prices, or the price of one item.
    #[poise::command(slash_command, prefix_command, check = "checks::is_allowed")]
    pub async fn shop(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Item to price"]
        #[rest]
        item: Option<String>,
    ) -> Result<()> {
        let state = &ctx.data().state;

        if let Some(item) = item {
            match shop::price(state, &item).await {
                Some(price) => ctx.say(format!("**{item}** costs {price} coins.")).await?,
                None => ctx.say(format!("❌ `{item}` is not sold here.")).await?,
            };
            return Ok(());
        }

        let items = shop::items(state).await;
        if items.is_empty() {
            ctx.say("The shop is currently empty!").await?;
            return Ok(());
        }

        let mut description = String::new();
        for (name, price) in &items {
            writeln!(&mut description, "**{name}**: {price} coins")?;
        }
        let embed = serenity::CreateEmbed::default()
            .title("🛒 Shop")
            .description(description)
            .color(serenity::Colour::BLURPLE);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Lists the loot tables, or the drops of one table.
    #[poise::command(slash_command, prefix_command, check = "checks::is_allowed")]
    pub async fn loot(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Table to show"] table: Option<String>,
    ) -> Result<()> {
        let state = &ctx.data().state;

        let Some(table) = table else {
            let names = shop::loot_table_names(state).await;
            if names.is_empty() {
                ctx.say("There are no loot tables.").await?;
            } else {
                ctx.say(format!("Loot tables: {}", names.join(", "))).await?;
            }
            return Ok(());
        };

        let Some(entries) = shop::loot_table(state, &table).await else {
            ctx.say(format!("❌ There is no loot table named `{table}`."))
                .await?;
            return Ok(());
        };

        let mut description = String::new();
        for (entry, chance) in entries.iter().zip(shop::drop_chances(&entries)) {
            writeln!(
                &mut description,
                "**{}** ({}) - {chance:.1}% - {:.1}-{:.1} kg at {:.2} coins/kg",
                entry.name, entry.rarity, entry.min_weight, entry.max_weight, entry.payout_per_kg
            )?;
        }
        let embed = serenity::CreateEmbed::default()
            .title(format!("🎣 Loot table: {table}"))
            .description(description)
            .color(serenity::Colour::DARK_GREEN);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
