//! Table rule configuration.

/// How many times the player may hit within one round.
///
/// Earlier versions of the game disagreed on this: one build ran the dealer
/// immediately after any non-busting hit, another allowed repeated hits.
/// The rule is explicit here instead of being baked into the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HitMode {
    /// The player may hit repeatedly until they stand or bust.
    #[default]
    Multi,
    /// A single non-busting hit hands the round to the dealer.
    Single,
}

/// Rounding mode for the blackjack bonus payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoundingMode {
    /// Round up.
    Up,
    /// Round down.
    Down,
    /// Round to nearest.
    Nearest,
}

/// Configuration options for a blackjack table.
///
/// Use the builder pattern to customize options:
///
/// ```
/// use twentyone::{GameOptions, HitMode};
///
/// let options = GameOptions::default()
///     .with_blackjack_pays(1.2)
///     .with_hit_mode(HitMode::Single);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GameOptions {
    /// Blackjack bonus ratio on top of the returned bet (typically 1.5,
    /// so a natural credits 2.5x the bet in total).
    pub blackjack_pays: f64,
    /// Rounding mode for the blackjack bonus.
    pub rounding_blackjack: RoundingMode,
    /// Whether repeated hits are allowed.
    pub hit_mode: HitMode,
    /// Dealer draws while below this total and stands at or above it.
    /// No soft/hard distinction is made.
    pub dealer_stands_at: u8,
    /// Completed rounds per history page.
    pub history_page_size: usize,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            blackjack_pays: 1.5,
            rounding_blackjack: RoundingMode::Down,
            hit_mode: HitMode::Multi,
            dealer_stands_at: 17,
            history_page_size: 10,
        }
    }
}

impl GameOptions {
    /// Sets the blackjack bonus ratio.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::GameOptions;
    ///
    /// let options = GameOptions::default().with_blackjack_pays(1.2);
    /// assert_eq!(options.blackjack_pays, 1.2);
    /// ```
    #[must_use]
    pub const fn with_blackjack_pays(mut self, ratio: f64) -> Self {
        self.blackjack_pays = ratio;
        self
    }

    /// Sets the rounding mode for the blackjack bonus.
    #[must_use]
    pub const fn with_rounding_blackjack(mut self, mode: RoundingMode) -> Self {
        self.rounding_blackjack = mode;
        self
    }

    /// Sets whether repeated hits are allowed.
    ///
    /// # Example
    ///
    /// ```
    /// use twentyone::{GameOptions, HitMode};
    ///
    /// let options = GameOptions::default().with_hit_mode(HitMode::Single);
    /// assert_eq!(options.hit_mode, HitMode::Single);
    /// ```
    #[must_use]
    pub const fn with_hit_mode(mut self, mode: HitMode) -> Self {
        self.hit_mode = mode;
        self
    }

    /// Sets the total at which the dealer stands.
    #[must_use]
    pub const fn with_dealer_stands_at(mut self, total: u8) -> Self {
        self.dealer_stands_at = total;
        self
    }

    /// Sets the history page size.
    #[must_use]
    pub const fn with_history_page_size(mut self, size: usize) -> Self {
        self.history_page_size = size;
        self
    }
}
