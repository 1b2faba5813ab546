//! Two-player wagers as an explicit state machine.
//!
//! ```text
//! open ─┬─ CoinFlip ─> AwaitingChoice ── choose ──┐
//!       └─ Dice ─────────────────────────────────>├─> AwaitingConfirmation ─┬─ resolve ─> Resolved
//!                                                 │                         └─ decline ─> Canceled
//!          time_out (from either waiting state) ─────────────────────────────────────────> Canceled
//! ```
//!
//! Nothing moves until [`Wager::resolve`], which re-checks the loser's wallet
//! and transfers the stake in a single critical section. Every other exit
//! leaves balances untouched.

use crate::core::{currency, state::StateStore};
use crate::entities::UserId;
use crate::errors::{Error, Result};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Game being wagered on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WagerGame {
    /// Challenger picks a side, one flip decides
    CoinFlip,
    /// Both roll a die, higher wins, equal ties
    Dice,
}

/// A side of the coin
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoinSide {
    /// Heads
    Heads,
    /// Tails
    Tails,
}

impl CoinSide {
    /// The other side
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Heads => Self::Tails,
            Self::Tails => Self::Heads,
        }
    }
}

impl fmt::Display for CoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Heads => "heads",
            Self::Tails => "tails",
        })
    }
}

impl FromStr for CoinSide {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "heads" => Ok(Self::Heads),
            "tails" => Ok(Self::Tails),
            other => Err(Error::InvalidWager {
                message: format!("'{other}' is not heads or tails"),
            }),
        }
    }
}

/// Parses a `yes`/`no` reply, ignoring case
#[must_use]
pub fn parse_confirmation(reply: &str) -> Option<bool> {
    match reply.trim().to_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

/// The random result fed into [`Wager::resolve`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WagerRoll {
    /// Where the coin landed
    Coin(CoinSide),
    /// Each player's die
    Dice {
        /// Challenger's roll
        challenger: u8,
        /// Opponent's roll
        opponent: u8,
    },
}

/// Why a wager ended without a result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// Challenger never picked a side
    ChoiceTimedOut,
    /// Opponent never answered
    ConfirmationTimedOut,
    /// Opponent said no
    Declined,
    /// Someone could no longer cover the stake at resolution
    InsufficientFunds,
}

/// How a resolved wager ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WagerOutcome {
    /// Stake moved from loser to winner
    Won {
        /// Collected the stake
        winner: UserId,
        /// Paid the stake
        loser: UserId,
        /// Coins moved
        amount: i64,
    },
    /// Nobody won; no coins moved
    Tie,
}

/// Current position in the wager flow
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WagerState {
    /// Waiting for the challenger's heads/tails
    AwaitingChoice,
    /// Waiting for the opponent's yes/no
    AwaitingConfirmation,
    /// Finished with a result
    Resolved(WagerOutcome),
    /// Finished without a result
    Canceled(CancelReason),
}

/// A single wager between two users
#[derive(Clone, Debug)]
pub struct Wager {
    game: WagerGame,
    challenger: UserId,
    opponent: UserId,
    amount: i64,
    challenger_side: Option<CoinSide>,
    state: WagerState,
}

impl Wager {
    /// Validates the stake and both wallets and starts the flow.
    ///
    /// # Errors
    /// `InvalidAmount` for a non-positive stake, `InvalidWager` for a
    /// self-wager, `InsufficientFunds` naming whichever player is short.
    pub async fn open(
        state: &StateStore,
        game: WagerGame,
        challenger: UserId,
        opponent: UserId,
        amount: i64,
    ) -> Result<Self> {
        if amount <= 0 {
            return Err(Error::InvalidAmount { amount });
        }
        if challenger == opponent {
            return Err(Error::InvalidWager {
                message: "you cannot wager against yourself".to_string(),
            });
        }

        for user_id in [challenger, opponent] {
            let available = state.get_or_create_currency_account(user_id).await.wallet;
            if available < amount {
                return Err(Error::InsufficientFunds {
                    user_id,
                    needed: amount,
                    available,
                });
            }
        }

        let initial = match game {
            WagerGame::CoinFlip => WagerState::AwaitingChoice,
            WagerGame::Dice => WagerState::AwaitingConfirmation,
        };
        info!(challenger, opponent, amount, ?game, "Wager opened");
        Ok(Self {
            game,
            challenger,
            opponent,
            amount,
            challenger_side: None,
            state: initial,
        })
    }

    /// Game being played
    #[must_use]
    pub const fn game(&self) -> WagerGame {
        self.game
    }

    /// User who issued the challenge
    #[must_use]
    pub const fn challenger(&self) -> UserId {
        self.challenger
    }

    /// User who was challenged
    #[must_use]
    pub const fn opponent(&self) -> UserId {
        self.opponent
    }

    /// Stake
    #[must_use]
    pub const fn amount(&self) -> i64 {
        self.amount
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> WagerState {
        self.state
    }

    fn illegal(&self, action: &str) -> Error {
        Error::InvalidWager {
            message: format!("cannot {action} while {:?}", self.state),
        }
    }

    /// Records the challenger's side and moves on to confirmation
    pub fn choose(&mut self, side: CoinSide) -> Result<()> {
        if self.state != WagerState::AwaitingChoice {
            return Err(self.illegal("choose a side"));
        }
        self.challenger_side = Some(side);
        self.state = WagerState::AwaitingConfirmation;
        Ok(())
    }

    /// Opponent refused; the wager is canceled
    pub fn decline(&mut self) -> Result<()> {
        if self.state != WagerState::AwaitingConfirmation {
            return Err(self.illegal("decline"));
        }
        self.state = WagerState::Canceled(CancelReason::Declined);
        info!(challenger = self.challenger, opponent = self.opponent, "Wager declined");
        Ok(())
    }

    /// The reply window closed. Cancels a waiting wager and returns true;
    /// a finished wager is left alone and false is returned.
    pub fn time_out(&mut self) -> bool {
        let reason = match self.state {
            WagerState::AwaitingChoice => CancelReason::ChoiceTimedOut,
            WagerState::AwaitingConfirmation => CancelReason::ConfirmationTimedOut,
            WagerState::Resolved(_) | WagerState::Canceled(_) => return false,
        };
        self.state = WagerState::Canceled(reason);
        info!(challenger = self.challenger, opponent = self.opponent, ?reason, "Wager timed out");
        true
    }

    fn outcome_for(&self, roll: WagerRoll) -> Result<WagerOutcome> {
        let challenger_wins = match (self.game, roll) {
            (WagerGame::CoinFlip, WagerRoll::Coin(landed)) => {
                let side = self
                    .challenger_side
                    .ok_or_else(|| self.illegal("flip before a side is chosen"))?;
                Some(side == landed)
            }
            (WagerGame::Dice, WagerRoll::Dice { challenger, opponent }) => {
                if !(1..=6).contains(&challenger) || !(1..=6).contains(&opponent) {
                    return Err(Error::InvalidWager {
                        message: format!("dice rolls out of range: {challenger} vs {opponent}"),
                    });
                }
                match challenger.cmp(&opponent) {
                    std::cmp::Ordering::Greater => Some(true),
                    std::cmp::Ordering::Less => Some(false),
                    std::cmp::Ordering::Equal => None,
                }
            }
            _ => {
                return Err(Error::InvalidWager {
                    message: format!("{roll:?} does not fit a {:?} wager", self.game),
                });
            }
        };

        Ok(match challenger_wins {
            Some(true) => WagerOutcome::Won {
                winner: self.challenger,
                loser: self.opponent,
                amount: self.amount,
            },
            Some(false) => WagerOutcome::Won {
                winner: self.opponent,
                loser: self.challenger,
                amount: self.amount,
            },
            None => WagerOutcome::Tie,
        })
    }

    /// Opponent accepted: settles the wager with `roll`.
    ///
    /// If the loser can no longer cover the stake the wager is canceled with
    /// [`CancelReason::InsufficientFunds`] and the error is returned; no coins
    /// move in that case.
    pub async fn resolve(&mut self, state: &StateStore, roll: WagerRoll) -> Result<WagerOutcome> {
        if self.state != WagerState::AwaitingConfirmation {
            return Err(self.illegal("resolve"));
        }
        let outcome = self.outcome_for(roll)?;

        if let WagerOutcome::Won { winner, loser, amount } = outcome {
            if let Err(e) = currency::transfer(state, loser, winner, amount).await {
                if matches!(e, Error::InsufficientFunds { .. }) {
                    self.state = WagerState::Canceled(CancelReason::InsufficientFunds);
                }
                return Err(e);
            }
        }

        self.state = WagerState::Resolved(outcome);
        info!(?outcome, "Wager resolved");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    async fn wallets(state: &StateStore) -> (i64, i64) {
        (
            state.get_or_create_currency_account(1).await.wallet,
            state.get_or_create_currency_account(2).await.wallet,
        )
    }

    #[tokio::test]
    async fn test_coinflip_conserves_coins_either_way() {
        for landed in [CoinSide::Heads, CoinSide::Tails] {
            let (_dir, state) = setup_with_wallets(&[(1, 100), (2, 50)]).await;

            let mut wager = Wager::open(&state, WagerGame::CoinFlip, 1, 2, 30).await.unwrap();
            assert_eq!(wager.state(), WagerState::AwaitingChoice);
            wager.choose(CoinSide::Heads).unwrap();
            assert_eq!(wager.state(), WagerState::AwaitingConfirmation);

            wager.resolve(&state, WagerRoll::Coin(landed)).await.unwrap();
            let (a, b) = wallets(&state).await;

            assert_eq!(a + b, 150);
            if landed == CoinSide::Heads {
                assert_eq!((a, b), (130, 20));
            } else {
                assert_eq!((a, b), (70, 80));
            }
            assert!(matches!(wager.state(), WagerState::Resolved(_)));
        }
    }

    #[tokio::test]
    async fn test_dice_tie_moves_nothing() {
        let (_dir, state) = setup_with_wallets(&[(1, 100), (2, 50)]).await;
        let mut wager = Wager::open(&state, WagerGame::Dice, 1, 2, 50).await.unwrap();
        assert_eq!(wager.state(), WagerState::AwaitingConfirmation);

        let outcome = wager
            .resolve(&state, WagerRoll::Dice { challenger: 4, opponent: 4 })
            .await
            .unwrap();

        assert_eq!(outcome, WagerOutcome::Tie);
        assert_eq!(wallets(&state).await, (100, 50));
    }

    #[tokio::test]
    async fn test_dice_higher_roll_wins() {
        let (_dir, state) = setup_with_wallets(&[(1, 100), (2, 50)]).await;
        let mut wager = Wager::open(&state, WagerGame::Dice, 1, 2, 50).await.unwrap();

        let outcome = wager
            .resolve(&state, WagerRoll::Dice { challenger: 2, opponent: 6 })
            .await
            .unwrap();

        assert_eq!(outcome, WagerOutcome::Won { winner: 2, loser: 1, amount: 50 });
        assert_eq!(wallets(&state).await, (50, 100));
    }

    #[tokio::test]
    async fn test_timeouts_leave_state_untouched() {
        let (_dir, state) = setup_with_wallets(&[(1, 100), (2, 50)]).await;

        let mut flip = Wager::open(&state, WagerGame::CoinFlip, 1, 2, 30).await.unwrap();
        assert!(flip.time_out());
        assert_eq!(flip.state(), WagerState::Canceled(CancelReason::ChoiceTimedOut));
        assert!(!flip.time_out());

        let mut dice = Wager::open(&state, WagerGame::Dice, 1, 2, 30).await.unwrap();
        assert!(dice.time_out());
        assert_eq!(dice.state(), WagerState::Canceled(CancelReason::ConfirmationTimedOut));
        assert!(dice.resolve(&state, WagerRoll::Dice { challenger: 6, opponent: 1 }).await.is_err());

        assert_eq!(wallets(&state).await, (100, 50));
    }

    #[tokio::test]
    async fn test_decline_cancels() {
        let (_dir, state) = setup_with_wallets(&[(1, 100), (2, 50)]).await;
        let mut wager = Wager::open(&state, WagerGame::CoinFlip, 1, 2, 30).await.unwrap();
        assert!(wager.decline().is_err());
        wager.choose(CoinSide::Tails).unwrap();
        wager.decline().unwrap();
        assert_eq!(wager.state(), WagerState::Canceled(CancelReason::Declined));
        assert_eq!(wallets(&state).await, (100, 50));
    }

    #[tokio::test]
    async fn test_open_validation() {
        let (_dir, state) = setup_with_wallets(&[(1, 100), (2, 50)]).await;

        assert!(matches!(
            Wager::open(&state, WagerGame::Dice, 1, 2, 0).await,
            Err(Error::InvalidAmount { .. })
        ));
        assert!(matches!(
            Wager::open(&state, WagerGame::Dice, 1, 1, 10).await,
            Err(Error::InvalidWager { .. })
        ));
        assert!(matches!(
            Wager::open(&state, WagerGame::Dice, 1, 2, 60).await,
            Err(Error::InsufficientFunds { user_id: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_funds_spent_while_waiting_cancel_at_resolution() {
        let (_dir, state) = setup_with_wallets(&[(1, 100), (2, 50)]).await;
        let mut wager = Wager::open(&state, WagerGame::Dice, 1, 2, 50).await.unwrap();

        // opponent loses their coins elsewhere before accepting
        currency::gamble(&state, 2, 50, false).await.unwrap();

        let result = wager
            .resolve(&state, WagerRoll::Dice { challenger: 6, opponent: 1 })
            .await;
        assert!(matches!(result, Err(Error::InsufficientFunds { user_id: 2, .. })));
        assert_eq!(wager.state(), WagerState::Canceled(CancelReason::InsufficientFunds));
        assert_eq!(wallets(&state).await, (100, 0));
    }

    #[tokio::test]
    async fn test_mismatched_roll_rejected() {
        let (_dir, state) = setup_with_wallets(&[(1, 100), (2, 50)]).await;
        let mut wager = Wager::open(&state, WagerGame::Dice, 1, 2, 10).await.unwrap();
        assert!(wager.resolve(&state, WagerRoll::Coin(CoinSide::Heads)).await.is_err());
        assert!(wager.resolve(&state, WagerRoll::Dice { challenger: 7, opponent: 1 }).await.is_err());
        assert_eq!(wager.state(), WagerState::AwaitingConfirmation);
    }

    #[test]
    fn test_parsing_replies() {
        assert_eq!("Heads".parse::<CoinSide>().unwrap(), CoinSide::Heads);
        assert_eq!(" TAILS ".parse::<CoinSide>().unwrap(), CoinSide::Tails);
        assert!("edge".parse::<CoinSide>().is_err());
        assert_eq!(CoinSide::Heads.opposite(), CoinSide::Tails);

        assert_eq!(parse_confirmation("YES"), Some(true));
        assert_eq!(parse_confirmation("no"), Some(false));
        assert_eq!(parse_confirmation("maybe"), None);
    }
}
