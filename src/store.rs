//! The persistence adapter: durable storage for rounds, the balance, and
//! the completed-round history.
//!
//! The state machine talks to the store only at phase boundaries and never
//! reaches for an ambient connection; an adapter is passed in when the game
//! is constructed. Memory-only play is not a separate engine, it is just
//! [`MemoryStore`] plugged into the same interface.

use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::round::{GameRound, Phase};

/// Errors from the persistence adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Balance does not cover the requested bet.
    #[error("insufficient balance")]
    InsufficientBalance,
    /// An unfinished round already exists; it must be resumed or finished
    /// before a new one can start.
    #[error("an unfinished round already exists (id {0})")]
    ActiveRoundExists(u64),
    /// No stored round with this id.
    #[error("round {0} not found")]
    RoundNotFound(u64),
    /// A stored record failed validation on read.
    #[error("stored round record is malformed: {0}")]
    MalformedRecord(String),
    /// The backing store failed. Recoverable: the caller may retry the
    /// same request.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// A freshly started round, as returned by [`RoundStore::start_round`].
///
/// The store has already debited the bet when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedRound {
    /// Store-assigned round id.
    pub id: u64,
    /// Round start time, milliseconds since the epoch.
    pub started_at_ms: u64,
    /// Balance after the bet was debited.
    pub balance_after: u64,
}

/// Durable storage for rounds and the player balance.
///
/// `start_round` and `finish_round` are the only balance mutations: the
/// bet is debited atomically with round creation and the credit is applied
/// atomically with the final write. The state machine never touches the
/// balance directly.
pub trait RoundStore: Send {
    /// Atomically checks the balance, debits the bet, and creates a new
    /// in-progress round.
    fn start_round(
        &mut self,
        bet: u64,
    ) -> impl Future<Output = Result<StartedRound, StoreError>> + Send;

    /// Writes the current state of an in-progress round.
    fn update_round(
        &mut self,
        round: &GameRound,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Writes the finished round and credits the balance. Returns the
    /// balance after the credit.
    fn finish_round(
        &mut self,
        round: &GameRound,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Returns the unfinished round, if one exists.
    fn active_round(&self) -> impl Future<Output = Result<Option<GameRound>, StoreError>> + Send;

    /// Returns a page of finished rounds, most recent first. Pages are
    /// zero-indexed.
    fn history_page(
        &self,
        page: usize,
        page_size: usize,
    ) -> impl Future<Output = Result<Vec<GameRound>, StoreError>> + Send;

    /// Returns the current balance.
    fn balance(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Milliseconds since the Unix epoch.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// In-memory [`RoundStore`].
///
/// Rows are held as serialized JSON, the same shape a relational backend
/// would store, so reads go through full deserialization and can surface
/// [`StoreError::MalformedRecord`] exactly like a remote adapter.
#[derive(Debug)]
pub struct MemoryStore {
    balance: u64,
    next_id: u64,
    /// Serialized rounds, newest first.
    rows: Vec<String>,
}

impl MemoryStore {
    /// Creates a store with the given starting balance.
    #[must_use]
    pub const fn new(balance: u64) -> Self {
        Self {
            balance,
            next_id: 1,
            rows: Vec::new(),
        }
    }

    fn decode(row: &str) -> Result<GameRound, StoreError> {
        serde_json::from_str(row).map_err(|err| StoreError::MalformedRecord(err.to_string()))
    }

    fn encode(round: &GameRound) -> Result<String, StoreError> {
        serde_json::to_string(round).map_err(|err| StoreError::Backend(err.to_string()))
    }

    fn position_of(&self, id: u64) -> Result<usize, StoreError> {
        self.rows
            .iter()
            .position(|row| Self::decode(row).is_ok_and(|r| r.id == id))
            .ok_or(StoreError::RoundNotFound(id))
    }

    /// Inserts a raw row, bypassing validation. Lets tests exercise the
    /// malformed-record path.
    #[doc(hidden)]
    pub fn insert_raw_row(&mut self, row: impl Into<String>) {
        self.rows.insert(0, row.into());
    }
}

impl RoundStore for MemoryStore {
    async fn start_round(&mut self, bet: u64) -> Result<StartedRound, StoreError> {
        if let Some(active) = self.active_round().await? {
            return Err(StoreError::ActiveRoundExists(active.id));
        }
        if bet > self.balance {
            return Err(StoreError::InsufficientBalance);
        }

        self.balance -= bet;
        let id = self.next_id;
        self.next_id += 1;
        let started_at_ms = now_ms();

        let round = GameRound {
            id,
            started_at_ms,
            updated_at_ms: started_at_ms,
            bet,
            player_hand: crate::hand::Hand::new(),
            dealer_hand: crate::hand::Hand::new(),
            phase: Phase::PlayerTurn,
            result: None,
            payout: None,
        };
        self.rows.insert(0, Self::encode(&round)?);

        Ok(StartedRound {
            id,
            started_at_ms,
            balance_after: self.balance,
        })
    }

    async fn update_round(&mut self, round: &GameRound) -> Result<(), StoreError> {
        let pos = self.position_of(round.id)?;
        self.rows[pos] = Self::encode(round)?;
        Ok(())
    }

    async fn finish_round(&mut self, round: &GameRound) -> Result<u64, StoreError> {
        if round.phase != Phase::Finished {
            return Err(StoreError::Backend("round is not finished".into()));
        }
        let Some(payout) = round.payout else {
            return Err(StoreError::Backend("finished round has no payout".into()));
        };

        let pos = self.position_of(round.id)?;
        self.rows[pos] = Self::encode(round)?;

        // Net payout plus the already-debited bet gives the credit.
        #[expect(
            clippy::cast_possible_wrap,
            reason = "bet values fit in i64"
        )]
        let credit = (payout + round.bet as i64).max(0) as u64;
        self.balance += credit;

        Ok(self.balance)
    }

    async fn active_round(&self) -> Result<Option<GameRound>, StoreError> {
        for row in &self.rows {
            let round = Self::decode(row)?;
            if round.is_active() {
                return Ok(Some(round));
            }
        }
        Ok(None)
    }

    async fn history_page(&self, page: usize, page_size: usize) -> Result<Vec<GameRound>, StoreError> {
        let mut finished = Vec::new();
        for row in &self.rows {
            let round = Self::decode(row)?;
            if !round.is_active() {
                finished.push(round);
            }
        }
        Ok(finished
            .into_iter()
            .skip(page * page_size)
            .take(page_size)
            .collect())
    }

    async fn balance(&self) -> Result<u64, StoreError> {
        Ok(self.balance)
    }
}
