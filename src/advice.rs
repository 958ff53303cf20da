//! Advisory "should I hit?" collaborator.
//!
//! Purely advisory: nothing here feeds back into the rules. The production
//! game asks a remote model; [`BasicStrategyAdvisor`] is the built-in,
//! offline implementation of the same interface.

use std::future::Future;

use crate::card::Card;
use crate::error::AdviceError;
use crate::hand::Hand;

/// A hit/stand suggestion with a free-text rationale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice {
    /// Whether the advisor suggests drawing another card.
    pub should_hit: bool,
    /// Human-readable reasoning behind the suggestion.
    pub explanation: String,
}

/// Something that can suggest a move for the current table state.
pub trait Advisor {
    /// Suggests whether to hit, given the player's hand and the dealer's
    /// up card.
    fn advise(
        &self,
        player: &Hand,
        dealer_up: &Card,
    ) -> impl Future<Output = Result<Advice, AdviceError>> + Send;
}

/// Hit/stand rows of basic strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStrategyAdvisor;

impl Advisor for BasicStrategyAdvisor {
    async fn advise(&self, player: &Hand, dealer_up: &Card) -> Result<Advice, AdviceError> {
        if player.is_empty() {
            return Err(AdviceError::NotEnoughCards);
        }

        let total = player.value();
        let up = dealer_up.rank.value();

        if player.is_soft() {
            return Ok(soft_advice(total, up));
        }
        Ok(hard_advice(total, up))
    }
}

fn hard_advice(total: u8, up: u8) -> Advice {
    if total <= 11 {
        return Advice {
            should_hit: true,
            explanation: format!("A hard {total} cannot bust; always take a card."),
        };
    }
    if total >= 17 {
        return Advice {
            should_hit: false,
            explanation: format!("A hard {total} risks busting; stand and let the dealer draw."),
        };
    }

    // 12 stands only against a weak 4-6; 13-16 stand against 2-6.
    let dealer_weak = if total == 12 {
        (4..=6).contains(&up)
    } else {
        (2..=6).contains(&up)
    };

    if dealer_weak {
        Advice {
            should_hit: false,
            explanation: format!(
                "The dealer shows a {up} and is likely to bust; stand on {total}."
            ),
        }
    } else {
        Advice {
            should_hit: true,
            explanation: format!(
                "The dealer shows a strong {up}; {total} is unlikely to win without improving."
            ),
        }
    }
}

fn soft_advice(total: u8, up: u8) -> Advice {
    if total <= 17 {
        return Advice {
            should_hit: true,
            explanation: format!("Soft {total} cannot bust on one card; draw to improve."),
        };
    }
    if total == 18 && (up >= 9 || up == 11) {
        return Advice {
            should_hit: true,
            explanation: format!("Soft 18 trails a dealer {up}; taking a card is free."),
        };
    }
    Advice {
        should_hit: false,
        explanation: format!("Soft {total} is a strong total; stand."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    fn hand(ranks: &[Rank]) -> Hand {
        ranks
            .iter()
            .map(|&rank| Card::new(rank, Suit::Hearts))
            .collect()
    }

    #[tokio::test]
    async fn hits_low_hard_totals() {
        let advice = BasicStrategyAdvisor
            .advise(
                &hand(&[Rank::Five, Rank::Four]),
                &Card::new(Rank::King, Suit::Spades),
            )
            .await
            .expect("advice");
        assert!(advice.should_hit);
    }

    #[tokio::test]
    async fn stands_on_hard_seventeen() {
        let advice = BasicStrategyAdvisor
            .advise(
                &hand(&[Rank::King, Rank::Seven]),
                &Card::new(Rank::Ace, Suit::Spades),
            )
            .await
            .expect("advice");
        assert!(!advice.should_hit);
    }

    #[tokio::test]
    async fn thirteen_stands_against_weak_dealer_only() {
        let thirteen = hand(&[Rank::Ten, Rank::Three]);

        let vs_five = BasicStrategyAdvisor
            .advise(&thirteen, &Card::new(Rank::Five, Suit::Spades))
            .await
            .expect("advice");
        assert!(!vs_five.should_hit);

        let vs_ten = BasicStrategyAdvisor
            .advise(&thirteen, &Card::new(Rank::Ten, Suit::Spades))
            .await
            .expect("advice");
        assert!(vs_ten.should_hit);
    }

    #[tokio::test]
    async fn soft_eighteen_hits_strong_dealer() {
        let soft_18 = hand(&[Rank::Ace, Rank::Seven]);

        let vs_nine = BasicStrategyAdvisor
            .advise(&soft_18, &Card::new(Rank::Nine, Suit::Spades))
            .await
            .expect("advice");
        assert!(vs_nine.should_hit);

        let vs_six = BasicStrategyAdvisor
            .advise(&soft_18, &Card::new(Rank::Six, Suit::Spades))
            .await
            .expect("advice");
        assert!(!vs_six.should_hit);
    }

    #[tokio::test]
    async fn empty_hand_is_rejected() {
        let err = BasicStrategyAdvisor
            .advise(&Hand::new(), &Card::new(Rank::Two, Suit::Spades))
            .await
            .expect_err("no cards");
        assert!(matches!(err, AdviceError::NotEnoughCards));
    }
}
