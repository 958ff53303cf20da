use crate::options::RoundingMode;
use crate::round::{Outcome, Phase};
use crate::store::{RoundStore, StoreError};

use super::Game;

fn round_amount(amount: f64, mode: RoundingMode) -> u64 {
    match mode {
        RoundingMode::Up => amount.ceil() as u64,
        RoundingMode::Down => amount.floor() as u64,
        RoundingMode::Nearest => amount.round() as u64,
    }
}

impl<S: RoundStore> Game<S> {
    /// Dealer plays out their hand and the round is resolved.
    ///
    /// The hole card is revealed and the dealer draws until reaching the
    /// stand threshold (any 17 by default, soft or hard). Resolution:
    /// dealer bust or lower total is a win, higher total a loss, equal
    /// totals a push.
    ///
    /// Invoked directly from `stand` and from a single-mode hit; nothing
    /// watches for the phase change.
    pub(super) async fn run_dealer(&mut self) -> Result<Outcome, StoreError> {
        let stands_at = self.options.dealer_stands_at;
        let round = self.round.as_mut().expect("caller validated the round");

        round.phase = Phase::DealerTurn;
        round.dealer_hand.reveal_all();

        while round.dealer_hand.value() < stands_at {
            let card = self.shoe.draw();
            round.dealer_hand.push(card);
        }

        let dealer = round.dealer_hand.value();
        let player = round.player_hand.value();

        let outcome = if dealer > 21 || player > dealer {
            Outcome::Win
        } else if player < dealer {
            Outcome::Lose
        } else {
            Outcome::Push
        };

        self.settle(outcome).await?;
        Ok(outcome)
    }

    /// Net payout recorded in history for the given outcome.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        reason = "f64 has sufficient precision for monetary values"
    )]
    fn net_payout(&self, outcome: Outcome, bet: u64) -> i64 {
        match outcome {
            Outcome::Win => bet as i64,
            Outcome::Blackjack => {
                let bonus = round_amount(
                    (bet as f64) * self.options.blackjack_pays,
                    self.options.rounding_blackjack,
                );
                bonus as i64
            }
            Outcome::Push => 0,
            Outcome::Lose => -(bet as i64),
        }
    }

    /// Finishes the round: records the result and net payout (exactly
    /// once), then writes the final record to the store, which credits the
    /// balance and appends to history.
    ///
    /// On a store failure the round stays finished in memory but
    /// unsettled; the error is surfaced so the caller can
    /// [`retry_settle`](Game::retry_settle) instead of silently diverging
    /// from the stored record.
    pub(super) async fn settle(&mut self, outcome: Outcome) -> Result<(), StoreError> {
        let bet = self.round.as_ref().expect("caller validated the round").bet;
        let net = self.net_payout(outcome, bet);

        let round = self.round.as_mut().expect("caller validated the round");
        debug_assert!(round.payout.is_none(), "payout may only be set once");

        round.result = Some(outcome);
        round.payout = Some(net);
        round.phase = Phase::Finished;
        round.updated_at_ms = crate::store::now_ms();
        self.settled = false;

        let round = self.round.as_ref().expect("round was just finished");
        match self.store.finish_round(round).await {
            Ok(balance) => {
                tracing::debug!(
                    round = round.id,
                    ?outcome,
                    payout = round.payout,
                    balance,
                    "round settled"
                );
                self.settled = true;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(round = round.id, error = %err, "settlement not persisted");
                Err(err)
            }
        }
    }
}
