use std::fmt;

use super::card::{Card, Suit};
use super::contract::BidSuit;
use super::direction::{Direction, Seats};

/// The cards played to one round, one slot per seat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trick {
    cards: Seats<Option<Card>>,
    led_suit: Option<Suit>,
    leader: Option<Direction>,
    pub winner: Option<Direction>,
}

impl Trick {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `card` in `seat`'s slot. The first card placed sets the led suit.
    ///
    /// Re-adding the same card to the same seat is tolerated and changes
    /// nothing. Returns true only if the slot was filled by this call.
    pub fn add(&mut self, card: Card, seat: Direction) -> bool {
        match self.cards[seat] {
            Some(existing) if existing == card => false,
            Some(existing) => {
                debug_assert!(
                    false,
                    "{} already played {} to this trick, cannot add {}",
                    seat, existing, card
                );
                false
            }
            None => {
                if self.is_empty() {
                    self.led_suit = Some(card.suit);
                    self.leader = Some(seat);
                }
                self.cards[seat] = Some(card);
                true
            }
        }
    }

    /// Empty `seat`'s slot (undo). Clears the led suit when the trick empties.
    pub fn clear_card(&mut self, seat: Direction) -> Option<Card> {
        let card = self.cards[seat].take();
        if self.is_empty() {
            self.led_suit = None;
            self.leader = None;
        }
        self.winner = None;
        card
    }

    pub fn card(&self, seat: Direction) -> Option<Card> {
        self.cards[seat]
    }

    pub fn led_suit(&self) -> Option<Suit> {
        self.led_suit
    }

    pub fn leader(&self) -> Option<Direction> {
        self.leader
    }

    pub fn len(&self) -> usize {
        self.cards.iter().filter(|(_, c)| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_over(&self) -> bool {
        self.len() == 4
    }

    /// Cards played so far with the seat that played each
    pub fn plays(&self) -> impl Iterator<Item = (Direction, Card)> + '_ {
        self.cards.iter().filter_map(|(d, c)| c.map(|c| (d, c)))
    }

    /// The seat holding the best card: the highest trump if any trump was
    /// played, otherwise the highest card of the led suit.
    pub fn determine_winner(&self, trump: BidSuit) -> Option<Direction> {
        if let Some(trump_suit) = trump.trump_suit() {
            if let Some(winner) = self.high_card_of(trump_suit) {
                return Some(winner);
            }
        }
        self.high_card_of(self.led_suit?)
    }

    fn high_card_of(&self, suit: Suit) -> Option<Direction> {
        self.plays()
            .filter(|(_, c)| c.suit == suit)
            .max_by_key(|(_, c)| c.rank)
            .map(|(d, _)| d)
    }
}

impl fmt::Display for Trick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (seat, card) in self.plays() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", seat.to_char(), card)?;
            first = false;
        }
        Ok(())
    }
}
