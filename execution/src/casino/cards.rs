//! Shared playing-card helpers.
//!
//! Cards are encoded as `0..=51`, where:
//! - suit = card / 13 (0..=3)
//! - rank = card % 13 + 1 (1..=13), Ace low

use super::{shuffle, RandomSource};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Total cards in a standard deck.
pub const CARDS_PER_DECK: u8 = 52;

/// Ranks per suit.
pub const RANKS_PER_SUIT: u8 = 13;

const SUIT_SYMBOLS: [char; 4] = ['♠', '♥', '♣', '♦'];
const RANK_LABELS: [&str; 13] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card(u8);

impl Card {
    /// Build a card from a suit (0..=3) and a one-based rank (1..=13).
    pub fn new(suit: u8, rank: u8) -> Option<Self> {
        if suit >= 4 || !(1..=RANKS_PER_SUIT).contains(&rank) {
            return None;
        }
        Some(Self(suit * RANKS_PER_SUIT + rank - 1))
    }

    pub fn from_index(index: u8) -> Option<Self> {
        (index < CARDS_PER_DECK).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// One-based rank (1..=13), where 1 is Ace and 13 is King.
    pub fn rank(self) -> u8 {
        self.0 % RANKS_PER_SUIT + 1
    }

    /// Suit (0..=3): spades, hearts, clubs, diamonds.
    pub fn suit(self) -> u8 {
        self.0 / RANKS_PER_SUIT
    }

    pub fn is_red(self) -> bool {
        matches!(self.suit(), 1 | 3)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            RANK_LABELS[(self.rank() - 1) as usize],
            SUIT_SYMBOLS[self.suit() as usize]
        )
    }
}

/// All 52 cards in suit-major order.
pub fn fresh_deck() -> Vec<Card> {
    (0..CARDS_PER_DECK).map(Card).collect()
}

/// Create a shuffled deck of 52 cards.
pub fn shuffled_deck(rng: &mut dyn RandomSource) -> Vec<Card> {
    let mut deck = fresh_deck();
    shuffle(rng, &mut deck);
    deck
}

/// Comma-separated labels for log fields.
pub fn format_card_list(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casino::GameRng;

    #[test]
    fn test_card_rank_and_suit() {
        // Ace = 1
        assert_eq!(Card(0).rank(), 1);
        assert_eq!(Card(13).rank(), 1);
        assert_eq!(Card(26).rank(), 1);

        // 2 = 2
        assert_eq!(Card(1).rank(), 2);

        // King = 13
        assert_eq!(Card(12).rank(), 13);
        assert_eq!(Card(51).rank(), 13);

        assert_eq!(Card(12).suit(), 0);
        assert_eq!(Card(13).suit(), 1);
        assert_eq!(Card(51).suit(), 3);
    }

    #[test]
    fn test_new_matches_encoding() {
        for suit in 0..4 {
            for rank in 1..=13 {
                let card = Card::new(suit, rank).unwrap();
                assert_eq!(card.suit(), suit);
                assert_eq!(card.rank(), rank);
            }
        }
        assert!(Card::new(4, 1).is_none());
        assert!(Card::new(0, 0).is_none());
        assert!(Card::new(0, 14).is_none());
        assert!(Card::from_index(52).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(Card::new(0, 1).unwrap().to_string(), "A♠");
        assert_eq!(Card::new(1, 10).unwrap().to_string(), "10♥");
        assert_eq!(Card::new(3, 13).unwrap().to_string(), "K♦");
        assert!(Card::new(3, 13).unwrap().is_red());
    }

    #[test]
    fn test_shuffled_deck_is_permutation() {
        let mut rng = GameRng::from_seed(7);
        let deck = shuffled_deck(&mut rng);

        // Deck should have 52 cards
        assert_eq!(deck.len(), 52);

        // All cards should be unique
        let mut seen = [false; 52];
        for card in &deck {
            assert!(!seen[card.index() as usize], "Duplicate card: {}", card);
            seen[card.index() as usize] = true;
        }
        assert_ne!(deck, fresh_deck());
    }

    #[test]
    fn test_format_card_list() {
        let cards = [Card::new(0, 1).unwrap(), Card::new(2, 7).unwrap()];
        assert_eq!(format_card_list(&cards), "A♠,7♣");
        assert_eq!(format_card_list(&[]), "");
    }
}
