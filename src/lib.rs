//! A single-seat blackjack round engine with pluggable persistence.
//!
//! The crate provides a [`Game`] type that drives one round at a time
//! through betting, player actions, dealer play, and settlement. Durable
//! state (the active round, the balance, and the completed-round history)
//! lives behind the [`RoundStore`] adapter; [`MemoryStore`] is the
//! built-in in-memory implementation.
//!
//! # Example
//!
//! ```no_run
//! use twentyone::{Game, GameOptions, MemoryStore};
//!
//! # async fn play() -> Result<(), Box<dyn std::error::Error>> {
//! let mut game = Game::new(GameOptions::default(), MemoryStore::new(1_000), 42);
//! game.place_bet(100).await?;
//! # Ok(())
//! # }
//! ```

pub mod advice;
pub mod card;
pub mod error;
pub mod game;
pub mod hand;
pub mod options;
pub mod round;
pub mod store;

// Re-export main types
pub use advice::{Advice, Advisor, BasicStrategyAdvisor};
pub use card::{Card, Rank, Shoe, Suit};
pub use error::{ActionError, AdviceError, BetError};
pub use game::Game;
pub use hand::Hand;
pub use options::{GameOptions, HitMode, RoundingMode};
pub use round::{GameRound, Outcome, Phase};
pub use store::{MemoryStore, RoundStore, StartedRound, StoreError};
