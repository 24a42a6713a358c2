use rand::seq::SliceRandom;
use rand::Rng;

use super::card::{Card, Rank, Suit};
use super::direction::{Direction, Seats};
use super::hand::CARDS_IN_HAND;

/// A full 52-card deck, used to deal hands when no hardware is attached.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn standard() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
            .collect();
        Self { cards }
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Deal thirteen cards to each seat, starting with `first` and going clockwise.
    pub fn deal(&self, first: Direction) -> Seats<Vec<Card>> {
        let mut hands: Seats<Vec<Card>> = Seats::default();
        let mut seat = first;
        for card in self.cards.iter().take(CARDS_IN_HAND * 4) {
            hands[seat].push(*card);
            seat = seat.next();
        }
        hands
    }
}
