//! Game engine and round state management.

use crate::card::Shoe;
use crate::error::ActionError;
use crate::options::GameOptions;
use crate::round::{GameRound, Outcome, Phase};
use crate::store::{RoundStore, StoreError};

mod actions;
mod bet;
mod dealer;

/// A single-seat blackjack engine that drives one round at a time.
///
/// The engine owns the shoe and the current round; balance and durable
/// round storage live behind the [`RoundStore`] passed to [`Game::new`].
/// Every mutating operation takes `&mut self`, so a second store request
/// can never be issued while a previous one is still outstanding.
///
/// # Example
///
/// ```no_run
/// use twentyone::{Game, GameOptions, MemoryStore};
///
/// let store = MemoryStore::new(1_000);
/// let game = Game::new(GameOptions::default(), store, 42);
/// let _ = game;
/// ```
pub struct Game<S: RoundStore> {
    /// The infinite shoe.
    pub shoe: Shoe,
    /// Table rules.
    pub options: GameOptions,
    /// Persistence adapter; also owns the balance.
    store: S,
    /// The round currently on the table, if any.
    round: Option<GameRound>,
    /// Whether the finished round has been written to the store.
    settled: bool,
}

impl<S: RoundStore> Game<S> {
    /// Creates a new game over the given store, with a seeded shoe.
    #[must_use]
    pub fn new(options: GameOptions, store: S, seed: u64) -> Self {
        Self {
            shoe: Shoe::new(seed),
            options,
            store,
            round: None,
            settled: false,
        }
    }

    /// Returns the current phase. With no round on the table this is
    /// [`Phase::Idle`].
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.round.as_ref().map_or(Phase::Idle, |r| r.phase)
    }

    /// Returns the round currently on the table.
    #[must_use]
    pub const fn round(&self) -> Option<&GameRound> {
        self.round.as_ref()
    }

    /// Returns the result of the current round, once finished.
    #[must_use]
    pub fn result(&self) -> Option<Outcome> {
        self.round.as_ref().and_then(|r| r.result)
    }

    /// Returns whether the finished round has been persisted and paid out.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.settled
    }

    /// Returns the current balance from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails.
    pub async fn balance(&self) -> Result<u64, StoreError> {
        self.store.balance().await
    }

    /// Returns a page of completed rounds, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store read fails or a stored record is
    /// malformed.
    pub async fn history_page(&self, page: usize) -> Result<Vec<GameRound>, StoreError> {
        self.store
            .history_page(page, self.options.history_page_size)
            .await
    }

    /// Adopts the stored unfinished round, if one exists.
    ///
    /// Called once at session start, before any betting. The adopted round
    /// resumes in whatever phase it was persisted in.
    ///
    /// # Errors
    ///
    /// Returns an error if a round is already on the table, the store read
    /// fails, or the stored record is malformed.
    pub async fn resume(&mut self) -> Result<Option<&GameRound>, ActionError> {
        if let Some(round) = &self.round {
            return Err(ActionError::InvalidState {
                action: "resume",
                phase: round.phase,
            });
        }

        match self.store.active_round().await {
            Ok(Some(round)) => {
                self.round = Some(round);
                self.settled = false;
                Ok(self.round.as_ref())
            }
            Ok(None) => Ok(None),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load active round");
                Err(ActionError::Store(err))
            }
        }
    }

    /// Re-sends the current in-progress round to the store.
    ///
    /// Recovery path for a failed [`update`](RoundStore::update_round)
    /// during [`hit`](Game::hit) or [`place_bet`](Game::place_bet); the
    /// in-memory round is authoritative until the write lands.
    ///
    /// # Errors
    ///
    /// Returns an error if no round is in progress or the store write
    /// fails again.
    pub async fn resync(&mut self) -> Result<(), ActionError> {
        let Some(round) = &self.round else {
            return Err(ActionError::NoRound);
        };
        if !round.is_active() {
            return Err(ActionError::InvalidState {
                action: "resync",
                phase: round.phase,
            });
        }

        self.store.update_round(round).await.map_err(|err| {
            tracing::warn!(round = round.id, error = %err, "round update failed");
            ActionError::Store(err)
        })
    }

    /// Clears the finished round and returns the table to [`Phase::Idle`],
    /// preserving balance and history.
    ///
    /// # Errors
    ///
    /// Returns an error if no round exists, the round is still in
    /// progress, or settlement has not been persisted yet (see
    /// [`retry_settle`](Game::retry_settle)).
    pub fn new_round(&mut self) -> Result<(), ActionError> {
        let Some(round) = &self.round else {
            return Err(ActionError::NoRound);
        };
        if round.phase != Phase::Finished {
            return Err(ActionError::InvalidState {
                action: "new_round",
                phase: round.phase,
            });
        }
        if !self.settled {
            return Err(ActionError::Unsettled);
        }

        self.round = None;
        self.settled = false;
        Ok(())
    }
}
