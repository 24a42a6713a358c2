use std::fmt;

use super::card::Suit;
use super::direction::Direction;

/// Highest contract level
pub const MAX_LEVEL: u8 = 7;

/// Tricks the declaring side needs before its contract level counts
pub const BOOK: u8 = 6;

/// The strain of a contract: a trump suit or no trump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BidSuit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
    NoTrump,
}

impl BidSuit {
    pub fn symbol(&self) -> &'static str {
        match self {
            BidSuit::Clubs => "♣",
            BidSuit::Diamonds => "♦",
            BidSuit::Hearts => "♥",
            BidSuit::Spades => "♠",
            BidSuit::NoTrump => "NT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "C" => Some(BidSuit::Clubs),
            "D" => Some(BidSuit::Diamonds),
            "H" => Some(BidSuit::Hearts),
            "S" => Some(BidSuit::Spades),
            "N" | "NT" => Some(BidSuit::NoTrump),
            _ => None,
        }
    }

    pub fn trump_suit(&self) -> Option<Suit> {
        match self {
            BidSuit::Clubs => Some(Suit::Clubs),
            BidSuit::Diamonds => Some(Suit::Diamonds),
            BidSuit::Hearts => Some(Suit::Hearts),
            BidSuit::Spades => Some(Suit::Spades),
            BidSuit::NoTrump => None,
        }
    }
}

impl From<Suit> for BidSuit {
    fn from(suit: Suit) -> Self {
        match suit {
            Suit::Clubs => BidSuit::Clubs,
            Suit::Diamonds => BidSuit::Diamonds,
            Suit::Hearts => BidSuit::Hearts,
            Suit::Spades => BidSuit::Spades,
        }
    }
}

impl fmt::Display for BidSuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The contract for one hand, entered one piece at a time from the keypad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contract {
    pub trump: Option<BidSuit>,
    pub level: Option<u8>,
    pub bid_winner: Option<Direction>,
}

impl Contract {
    pub fn new(bid_winner: Direction, trump: BidSuit, level: u8) -> Self {
        Self {
            trump: Some(trump),
            level: Some(level),
            bid_winner: Some(bid_winner),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.trump.is_some() && self.level.is_some() && self.bid_winner.is_some()
    }

    /// Set the level. Returns false for anything outside 1..=7.
    pub fn set_level(&mut self, level: u8) -> bool {
        if !(1..=MAX_LEVEL).contains(&level) {
            return false;
        }
        self.level = Some(level);
        true
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Some(level) => write!(f, "{}", level)?,
            None => write!(f, "?")?,
        }
        match self.trump {
            Some(trump) => write!(f, "{}", trump)?,
            None => write!(f, "?")?,
        }
        if let Some(declarer) = self.bid_winner {
            write!(f, " by {}", declarer)?;
        }
        Ok(())
    }
}

/// How a finished hand came out for the declaring side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandResult {
    pub declarer: Direction,
    pub level: u8,
    pub declarer_tricks: u8,
    pub defender_tricks: u8,
    pub made: bool,
}

impl HandResult {
    pub fn new(declarer: Direction, level: u8, declarer_tricks: u8, defender_tricks: u8) -> Self {
        Self {
            declarer,
            level,
            declarer_tricks,
            defender_tricks,
            made: declarer_tricks >= BOOK + level,
        }
    }

    /// The side that won the hand, named by its declaring or defending seat
    pub fn winning_side(&self) -> Direction {
        if self.made {
            self.declarer
        } else {
            self.declarer.next()
        }
    }
}
