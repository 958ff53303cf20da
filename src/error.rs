//! Error types for round operations.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur when placing a bet.
#[derive(Debug, Error)]
pub enum BetError {
    /// Bet amount is not positive.
    #[error("bet amount must be greater than zero")]
    InvalidAmount,
    /// Player balance does not cover the bet.
    #[error("insufficient balance")]
    InsufficientBalance,
    /// A bet is only legal while the table is idle.
    #[error("cannot place a bet in the {0} phase")]
    InvalidState(crate::round::Phase),
    /// The persistence adapter rejected or failed the round start.
    #[error("round could not be started")]
    Store(#[source] StoreError),
}

/// Errors that can occur during player actions and round control.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The action is not legal in the current phase.
    #[error("{action} is not legal in the {phase} phase")]
    InvalidState {
        /// The attempted action.
        action: &'static str,
        /// The phase the round was in.
        phase: crate::round::Phase,
    },
    /// No round has been started yet.
    #[error("no active round")]
    NoRound,
    /// The finished round has not been settled against the store yet.
    #[error("round is finished but not settled; retry settlement first")]
    Unsettled,
    /// The persistence adapter failed; the in-memory round is unchanged
    /// (or finished-but-unsettled for settlement) and the call can be
    /// retried.
    #[error("persistence failure")]
    Store(#[source] StoreError),
}

/// Errors from the advisory collaborator.
#[derive(Debug, Error)]
pub enum AdviceError {
    /// Advice needs at least one player card and a dealer up card.
    #[error("not enough cards on the table to advise")]
    NotEnoughCards,
    /// The advisory backend failed.
    #[error("advisor backend error: {0}")]
    Backend(String),
}
