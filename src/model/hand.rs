use std::cmp::Ordering;
use std::fmt;

use super::card::{Card, Suit};

/// Number of cards in a complete bridge hand
pub const CARDS_IN_HAND: usize = 13;

/// View order: suits ascending, ranks descending within a suit (A K Q ... 2)
fn display_cmp(a: &Card, b: &Card) -> Ordering {
    a.suit.cmp(&b.suit).then(b.rank.cmp(&a.rank))
}

/// The cards one seat holds, as far as the table knows them.
///
/// Cards are unique by value and kept in view order. Insertion order is
/// tracked separately so the most recent scan can be taken back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
    /// Cards in the order they were added, most recent last
    recent: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card. Returns false (and changes nothing) if the card is
    /// already held or the hand is already full.
    pub fn add_card(&mut self, card: Card) -> bool {
        if self.contains_card(&card) {
            return false;
        }
        if self.is_full() {
            log::warn!("Refusing to add {} to a full hand", card);
            return false;
        }
        let pos = self
            .cards
            .binary_search_by(|probe| display_cmp(probe, &card))
            .unwrap_or_else(|pos| pos);
        self.cards.insert(pos, card);
        self.recent.push(card);
        true
    }

    /// Remove a card. Returns false if it was not held.
    pub fn remove_card(&mut self, card: &Card) -> bool {
        match self.cards.iter().position(|c| c == card) {
            Some(pos) => {
                self.cards.remove(pos);
                if let Some(pos) = self.recent.iter().rposition(|c| c == card) {
                    self.recent.remove(pos);
                }
                true
            }
            None => false,
        }
    }

    /// Take back the most recently added card, regardless of where it sorts.
    pub fn remove_recent_card(&mut self) -> Option<Card> {
        let card = self.recent.pop()?;
        if let Some(pos) = self.cards.iter().position(|c| *c == card) {
            self.cards.remove(pos);
        }
        Some(card)
    }

    pub fn clear(&mut self) {
        self.cards.clear();
        self.recent.clear();
    }

    pub fn contains_card(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn num_of_suit(&self, suit: Suit) -> usize {
        self.cards.iter().filter(|c| c.suit == suit).count()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cards.len() == CARDS_IN_HAND
    }

    /// All cards in view order. Each call starts a fresh traversal.
    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    /// Cards of one suit, highest first
    pub fn cards_of(&self, suit: Suit) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(move |c| c.suit == suit)
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Printed spades first, the way hands are usually read out
        for (i, suit) in Suit::ALL.iter().rev().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{} ", suit.symbol())?;
            let mut any = false;
            for card in self.cards_of(*suit) {
                write!(f, "{}", card.rank.to_char())?;
                any = true;
            }
            if !any {
                write!(f, "-")?;
            }
        }
        Ok(())
    }
}
