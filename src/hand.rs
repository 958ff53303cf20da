//! Hand representation and blackjack scoring.

use serde::{Deserialize, Serialize};

use crate::card::Card;

fn evaluate_cards(cards: &[Card]) -> (u8, bool) {
    let mut value: u8 = 0;
    let mut aces: u8 = 0;

    for card in cards {
        if card.rank == crate::card::Rank::Ace {
            aces += 1;
        }
        value = value.saturating_add(card.rank.value());
    }

    while value > 21 && aces > 0 {
        value -= 10;
        aces -= 1;
    }

    let is_soft = aces > 0 && value <= 21;
    (value, is_soft)
}

/// An ordered, append-only sequence of cards.
///
/// The total is always computed from the cards; it is never stored as a
/// separate mutable field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    /// Creates a new empty hand.
    #[must_use]
    pub const fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Adds a card to the hand.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Returns the cards in the hand.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Returns the number of cards in the hand.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the hand is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Removes all cards for the next round.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Calculates the best blackjack total of the hand.
    ///
    /// Aces count as 11, then are demoted to 1 one at a time while the
    /// total exceeds 21. Order-independent.
    #[must_use]
    pub fn value(&self) -> u8 {
        evaluate_cards(&self.cards).0
    }

    /// Returns whether the hand is soft (an ace still counted as 11).
    #[must_use]
    pub fn is_soft(&self) -> bool {
        evaluate_cards(&self.cards).1
    }

    /// Returns whether the hand is bust (over 21).
    #[must_use]
    pub fn is_bust(&self) -> bool {
        self.value() > 21
    }

    /// Returns whether the hand is a natural: exactly two cards, an ace
    /// plus a ten-value card.
    ///
    /// A 21 reached with three or more cards is an ordinary 21, never a
    /// blackjack.
    #[must_use]
    pub fn is_blackjack(&self) -> bool {
        self.cards.len() == 2
            && self.cards.iter().any(|c| c.rank == crate::card::Rank::Ace)
            && self.cards.iter().any(|c| c.rank.is_ten_value())
    }

    /// Returns the first card of the hand (the dealer's up card).
    #[must_use]
    pub fn up_card(&self) -> Option<&Card> {
        self.cards.first()
    }

    /// Turns every card face up (dealer reveals the hole card).
    pub fn reveal_all(&mut self) {
        for card in &mut self.cards {
            card.revealed = true;
        }
    }

    /// Total of the face-up cards only. What the presentation layer may
    /// show before the hole card is revealed.
    #[must_use]
    pub fn visible_value(&self) -> u8 {
        let visible: Vec<Card> = self.cards.iter().copied().filter(|c| c.revealed).collect();
        evaluate_cards(&visible).0
    }
}

impl FromIterator<Card> for Hand {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit};

    fn card(rank: Rank) -> Card {
        Card::new(rank, Suit::Spades)
    }

    #[test]
    fn value_is_order_independent() {
        let forward: Hand = [card(Rank::Ace), card(Rank::Nine), card(Rank::King)]
            .into_iter()
            .collect();
        let backward: Hand = [card(Rank::King), card(Rank::Nine), card(Rank::Ace)]
            .into_iter()
            .collect();
        assert_eq!(forward.value(), backward.value());
    }

    #[test]
    fn ace_demoted_once_per_excess() {
        // A + 9 + K: the ace drops from 11 to 1 exactly once.
        let hand: Hand = [card(Rank::Ace), card(Rank::Nine), card(Rank::King)]
            .into_iter()
            .collect();
        assert_eq!(hand.value(), 20);
        assert!(!hand.is_soft());

        let double_ace: Hand = [card(Rank::Ace), card(Rank::Ace), card(Rank::Nine)]
            .into_iter()
            .collect();
        assert_eq!(double_ace.value(), 21);
        assert!(double_ace.is_soft());
    }

    #[test]
    fn blackjack_requires_two_card_natural() {
        let natural: Hand = [card(Rank::Ace), card(Rank::King)].into_iter().collect();
        assert!(natural.is_blackjack());
        assert_eq!(natural.value(), 21);

        let three_card_21: Hand = [card(Rank::Ace), card(Rank::Nine), card(Rank::King)]
            .into_iter()
            .collect();
        assert!(!three_card_21.is_blackjack());

        let twenty: Hand = [card(Rank::King), card(Rank::Queen)].into_iter().collect();
        assert!(!twenty.is_blackjack());
    }

    #[test]
    fn visible_value_hides_hole_card() {
        let mut hand = Hand::new();
        hand.push(card(Rank::Nine));
        hand.push(card(Rank::Seven).face_down());

        assert_eq!(hand.visible_value(), 9);
        assert_eq!(hand.value(), 16);

        hand.reveal_all();
        assert_eq!(hand.visible_value(), 16);
    }
}
