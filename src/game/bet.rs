use crate::error::BetError;
use crate::hand::Hand;
use crate::round::{GameRound, Outcome, Phase};
use crate::store::{RoundStore, StoreError};

use super::Game;

impl<S: RoundStore> Game<S> {
    /// Places a bet and deals the opening hands.
    ///
    /// The store debits the balance atomically with round creation. The
    /// player receives two cards, the dealer an up card and a face-down
    /// hole card. A player natural resolves the round immediately: push if
    /// the dealer also holds a natural, otherwise a blackjack win paid at
    /// the bonus rate. Otherwise the round enters the player turn.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is zero, the table is not idle, the
    /// balance does not cover the bet, or the store rejects or fails the
    /// round start. Validation failures leave all state untouched.
    #[expect(
        clippy::missing_panics_doc,
        reason = "internal expects are guaranteed to succeed"
    )]
    pub async fn place_bet(&mut self, amount: u64) -> Result<(), BetError> {
        if amount == 0 {
            return Err(BetError::InvalidAmount);
        }
        if let Some(round) = &self.round {
            return Err(BetError::InvalidState(round.phase));
        }

        let started = self.store.start_round(amount).await.map_err(|err| {
            tracing::warn!(bet = amount, error = %err, "round start rejected");
            match err {
                StoreError::InsufficientBalance => BetError::InsufficientBalance,
                other => BetError::Store(other),
            }
        })?;

        let mut player_hand = Hand::new();
        player_hand.push(self.shoe.draw());
        player_hand.push(self.shoe.draw());

        let mut dealer_hand = Hand::new();
        dealer_hand.push(self.shoe.draw());
        dealer_hand.push(self.shoe.draw().face_down());

        self.round = Some(GameRound {
            id: started.id,
            started_at_ms: started.started_at_ms,
            updated_at_ms: started.started_at_ms,
            bet: amount,
            player_hand,
            dealer_hand,
            phase: Phase::PlayerTurn,
            result: None,
            payout: None,
        });
        self.settled = false;

        // A natural resolves before the player turn ever starts.
        let round = self.round.as_mut().expect("round was just created");
        if round.player_hand.is_blackjack() {
            round.dealer_hand.reveal_all();
            let outcome = if round.dealer_hand.is_blackjack() {
                Outcome::Push
            } else {
                Outcome::Blackjack
            };
            return self.settle(outcome).await.map_err(BetError::Store);
        }

        self.resync_after_deal().await
    }

    async fn resync_after_deal(&mut self) -> Result<(), BetError> {
        let round = self.round.as_ref().expect("round was just created");
        self.store.update_round(round).await.map_err(|err| {
            tracing::warn!(round = round.id, error = %err, "dealt round not persisted");
            BetError::Store(err)
        })
    }
}
