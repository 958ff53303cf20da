//! Card types and the infinite shoe.

use core::fmt;
use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Card suit.
///
/// Serialized as the suit glyph so persisted rounds match the rows written
/// by earlier versions of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    /// Spades.
    #[serde(rename = "♠")]
    Spades,
    /// Hearts.
    #[serde(rename = "♥")]
    Hearts,
    /// Diamonds.
    #[serde(rename = "♦")]
    Diamonds,
    /// Clubs.
    #[serde(rename = "♣")]
    Clubs,
}

impl Suit {
    /// All four suits.
    pub const ALL: [Self; 4] = [Self::Spades, Self::Hearts, Self::Diamonds, Self::Clubs];

    /// The suit glyph.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Spades => "♠",
            Self::Hearts => "♥",
            Self::Diamonds => "♦",
            Self::Clubs => "♣",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Card rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// Ace (counts as 11 or 1).
    #[serde(rename = "A")]
    Ace,
    /// Two.
    #[serde(rename = "2")]
    Two,
    /// Three.
    #[serde(rename = "3")]
    Three,
    /// Four.
    #[serde(rename = "4")]
    Four,
    /// Five.
    #[serde(rename = "5")]
    Five,
    /// Six.
    #[serde(rename = "6")]
    Six,
    /// Seven.
    #[serde(rename = "7")]
    Seven,
    /// Eight.
    #[serde(rename = "8")]
    Eight,
    /// Nine.
    #[serde(rename = "9")]
    Nine,
    /// Ten.
    #[serde(rename = "10")]
    Ten,
    /// Jack.
    #[serde(rename = "J")]
    Jack,
    /// Queen.
    #[serde(rename = "Q")]
    Queen,
    /// King.
    #[serde(rename = "K")]
    King,
}

impl Rank {
    /// All thirteen ranks.
    pub const ALL: [Self; 13] = [
        Self::Ace,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
    ];

    /// Blackjack value of the rank. Aces count high here; demotion to 1
    /// happens during hand evaluation.
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::Ace => 11,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten | Self::Jack | Self::Queen | Self::King => 10,
        }
    }

    /// Returns whether the rank is worth ten (10, J, Q, K).
    #[must_use]
    pub const fn is_ten_value(self) -> bool {
        matches!(self, Self::Ten | Self::Jack | Self::Queen | Self::King)
    }

    /// The short rank label, as persisted (`"A"`, `"2"`, .., `"K"`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ace => "A",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "10",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A playing card.
///
/// Immutable once drawn. `revealed` is a presentation flag only; hand
/// evaluation always uses the true rank regardless of what the table
/// currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// The rank of the card.
    pub rank: Rank,
    /// The suit of the card.
    pub suit: Suit,
    /// Whether the card is face up on the table.
    pub revealed: bool,
}

impl Card {
    /// Creates a new face-up card.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            revealed: true,
        }
    }

    /// Returns the same card dealt face down (the dealer's hole card).
    #[must_use]
    pub const fn face_down(mut self) -> Self {
        self.revealed = false;
        self
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// An infinite shoe: every draw picks a rank and a suit uniformly and
/// independently, with replacement. There is no depletion, so a draw can
/// never fail.
#[derive(Debug, Clone)]
pub struct Shoe {
    rng: ChaCha8Rng,
    stacked: VecDeque<Card>,
}

impl Shoe {
    /// Creates a new shoe with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            stacked: VecDeque::new(),
        }
    }

    /// Rigs the shoe: the given cards are drawn next, in order, before
    /// random drawing resumes. Intended for tests and demos.
    pub fn stack(&mut self, cards: &[Card]) {
        self.stacked.extend(cards.iter().copied());
    }

    /// Draws one face-up card.
    pub fn draw(&mut self) -> Card {
        if let Some(card) = self.stacked.pop_front() {
            return card;
        }
        let rank = Rank::ALL[self.rng.random_range(0..Rank::ALL.len())];
        let suit = Suit::ALL[self.rng.random_range(0..Suit::ALL.len())];
        Card::new(rank, suit)
    }
}
