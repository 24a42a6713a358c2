use std::fmt;

use super::card::{Card, Suit};
use super::hand::Hand;

/// One seat at the table: the hand the table knows about plus role flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Player {
    pub hand: Hand,
    pub tricks_won: u8,
    pub is_blind: bool,
    pub is_dummy: bool,
}

/// Why a play was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// A tracked (blind or dummy) player does not hold the card
    NotInHand,
    /// The player holds cards of the led suit and must play one
    MustFollowSuit(Suit),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::NotInHand => write!(f, "card is not in the hand"),
            Rejection::MustFollowSuit(suit) => write!(f, "must follow {}", suit.name()),
        }
    }
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new hand: no cards, no tricks. Role flags are left alone.
    pub fn new_hand(&mut self) {
        self.hand.clear();
        self.tricks_won = 0;
    }

    /// Only the blind player's and the dummy's cards are ever scanned.
    pub fn is_tracked(&self) -> bool {
        self.is_blind || self.is_dummy
    }

    pub fn has_full_hand(&self) -> bool {
        self.hand.is_full()
    }

    /// Check whether this player may play `card` to a trick led in `led_suit`
    /// (`None` when leading).
    ///
    /// Possession is only verified for tracked seats; the table cannot see the
    /// other hands, whose tracked hand is empty and so always passes the
    /// follow-suit check.
    pub fn check_play(&self, card: &Card, led_suit: Option<Suit>) -> Result<(), Rejection> {
        if self.is_tracked() && !self.hand.contains_card(card) {
            return Err(Rejection::NotInHand);
        }
        match led_suit {
            None => Ok(()),
            Some(led) if card.suit == led => Ok(()),
            Some(led) if self.hand.num_of_suit(led) == 0 => Ok(()),
            Some(led) => Err(Rejection::MustFollowSuit(led)),
        }
    }

    pub fn is_legal(&self, card: &Card, led_suit: Option<Suit>) -> bool {
        self.check_play(card, led_suit).is_ok()
    }
}
