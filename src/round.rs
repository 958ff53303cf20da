//! The round aggregate: phase, outcome, and the persisted record.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::hand::Hand;

/// Phase of a round.
///
/// Transitions are monotonic within one round: `Idle` → `PlayerTurn` →
/// `DealerTurn` → `Finished`. No phase is revisited; the next round starts
/// from a fresh `Idle` via `new_round`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// No round in progress; bets are accepted.
    Idle,
    /// Waiting for the player to hit or stand.
    PlayerTurn,
    /// Dealer plays out their hand.
    DealerTurn,
    /// Round is resolved; terminal.
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::PlayerTurn => "player-turn",
            Self::DealerTurn => "dealer-turn",
            Self::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Result of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    /// Player wins (dealer busts or player total is higher).
    Win,
    /// Player wins with a two-card natural; pays the blackjack bonus.
    Blackjack,
    /// Tie; the bet is returned.
    Push,
    /// Player loses (bust or dealer total is higher).
    Lose,
}

/// One round of blackjack, as created by the persistence adapter at bet
/// time and mutated by the state machine until it is finished.
///
/// Once `phase` is [`Phase::Finished`] and the result is persisted the
/// record is immutable; `payout` is the net amount for history and is set
/// exactly once, at the transition into `Finished`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRound {
    /// Store-assigned identifier.
    pub id: u64,
    /// Milliseconds since the epoch when the bet was placed.
    pub started_at_ms: u64,
    /// Milliseconds since the epoch of the last mutation.
    pub updated_at_ms: u64,
    /// The bet, already debited from the balance at round start.
    pub bet: u64,
    /// The player's hand.
    pub player_hand: Hand,
    /// The dealer's hand. Holds the true cards; concealment is carried on
    /// each card's `revealed` flag.
    pub dealer_hand: Hand,
    /// Current phase.
    pub phase: Phase,
    /// Result, set when the round finishes.
    pub result: Option<Outcome>,
    /// Net payout for history: +bet on a win, +bonus on a blackjack, 0 on
    /// a push, -bet on a loss.
    pub payout: Option<i64>,
}

impl GameRound {
    /// Returns whether the round is still in progress.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.phase, Phase::Finished)
    }
}
