use crate::card::Card;
use crate::error::ActionError;
use crate::options::HitMode;
use crate::round::{Outcome, Phase};
use crate::store::RoundStore;

use super::Game;

impl<S: RoundStore> Game<S> {
    fn ensure_player_turn(&self, action: &'static str) -> Result<(), ActionError> {
        match &self.round {
            None => Err(ActionError::NoRound),
            Some(round) if round.phase != Phase::PlayerTurn => Err(ActionError::InvalidState {
                action,
                phase: round.phase,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Player action: hit (draw a card).
    ///
    /// A bust resolves the round as a loss. A non-busting hit keeps the
    /// player turn under [`HitMode::Multi`]; under [`HitMode::Single`] the
    /// dealer plays immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the round is not in the player turn, or if a
    /// store write fails (the drawn card stays on the table; see
    /// [`resync`](Game::resync) and [`retry_settle`](Game::retry_settle)).
    #[expect(
        clippy::missing_panics_doc,
        reason = "internal expects are guaranteed to succeed"
    )]
    pub async fn hit(&mut self) -> Result<Card, ActionError> {
        self.ensure_player_turn("hit")?;

        let card = self.shoe.draw();
        let round = self
            .round
            .as_mut()
            .expect("player turn was validated above");
        round.player_hand.push(card);
        round.updated_at_ms = crate::store::now_ms();

        if round.player_hand.is_bust() {
            self.settle(Outcome::Lose)
                .await
                .map_err(ActionError::Store)?;
            return Ok(card);
        }

        match self.options.hit_mode {
            HitMode::Multi => self.resync().await?,
            HitMode::Single => {
                self.run_dealer().await.map_err(ActionError::Store)?;
            }
        }

        Ok(card)
    }

    /// Player action: stand.
    ///
    /// Hands the round to the dealer, who draws to the stand threshold,
    /// and resolves the winner.
    ///
    /// # Errors
    ///
    /// Returns an error if the round is not in the player turn, or if the
    /// settlement write fails (the outcome is kept in memory and
    /// [`retry_settle`](Game::retry_settle) re-attempts the write).
    pub async fn stand(&mut self) -> Result<Outcome, ActionError> {
        self.ensure_player_turn("stand")?;
        self.run_dealer().await.map_err(ActionError::Store)
    }

    /// Re-attempts a settlement write that previously failed.
    ///
    /// No-op when the round is already settled; the payout is never
    /// recomputed.
    ///
    /// # Errors
    ///
    /// Returns an error if no round exists, the round is not finished, or
    /// the store fails again.
    pub async fn retry_settle(&mut self) -> Result<(), ActionError> {
        let Some(round) = &self.round else {
            return Err(ActionError::NoRound);
        };
        if round.phase != Phase::Finished {
            return Err(ActionError::InvalidState {
                action: "retry_settle",
                phase: round.phase,
            });
        }
        if self.settled {
            return Ok(());
        }

        match self.store.finish_round(round).await {
            Ok(balance) => {
                tracing::debug!(round = round.id, balance, "settlement persisted on retry");
                self.settled = true;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(round = round.id, error = %err, "settlement retry failed");
                Err(ActionError::Store(err))
            }
        }
    }
}
