use std::fmt;

use crate::model::{Card, Contract, Direction, HandResult, Rejection};

/// Notification emitted by the engine. Listeners only observe these; they
/// never drive state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Debug(String),
    GameReset,
    CardScanned {
        direction: Direction,
        card: Card,
        hand_complete: bool,
    },
    CardIdentified(Card),
    CardPlayed {
        direction: Direction,
        card: Card,
    },
    TrickWon {
        winner: Direction,
        tricks: u8,
    },
    ContractSet(Contract),
    DummyPosition(Direction),
    NextPlayer(Direction),
    BlindHandScanned,
    DummyHandScanned,
    InvalidPlay {
        direction: Direction,
        card: Card,
        reason: Rejection,
    },
    HandComplete(HandResult),
}

/// Discriminant of a [`GameEvent`], used to subscribe to a subset of events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Debug,
    GameReset,
    CardScanned,
    CardIdentified,
    CardPlayed,
    TrickWon,
    ContractSet,
    DummyPosition,
    NextPlayer,
    BlindHandScanned,
    DummyHandScanned,
    InvalidPlay,
    HandComplete,
}

impl EventKind {
    pub const ALL: [EventKind; 13] = [
        EventKind::Debug,
        EventKind::GameReset,
        EventKind::CardScanned,
        EventKind::CardIdentified,
        EventKind::CardPlayed,
        EventKind::TrickWon,
        EventKind::ContractSet,
        EventKind::DummyPosition,
        EventKind::NextPlayer,
        EventKind::BlindHandScanned,
        EventKind::DummyHandScanned,
        EventKind::InvalidPlay,
        EventKind::HandComplete,
    ];
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::Debug(_) => EventKind::Debug,
            GameEvent::GameReset => EventKind::GameReset,
            GameEvent::CardScanned { .. } => EventKind::CardScanned,
            GameEvent::CardIdentified(_) => EventKind::CardIdentified,
            GameEvent::CardPlayed { .. } => EventKind::CardPlayed,
            GameEvent::TrickWon { .. } => EventKind::TrickWon,
            GameEvent::ContractSet(_) => EventKind::ContractSet,
            GameEvent::DummyPosition(_) => EventKind::DummyPosition,
            GameEvent::NextPlayer(_) => EventKind::NextPlayer,
            GameEvent::BlindHandScanned => EventKind::BlindHandScanned,
            GameEvent::DummyHandScanned => EventKind::DummyHandScanned,
            GameEvent::InvalidPlay { .. } => EventKind::InvalidPlay,
            GameEvent::HandComplete(_) => EventKind::HandComplete,
        }
    }
}

/// Something the owner of a hand must carry out after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(GameEvent),
    /// Move hardware listening to this seat's antenna
    SwitchAntenna(Direction),
}

/// Why a read was dropped without any effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Read came from an antenna nobody is listening to right now
    WrongAntenna,
    /// The hand is not in a phase that accepts this input
    NotReady,
    /// Card was already played earlier in this hand
    AlreadyPlayed,
    /// Card is already in the hand being scanned
    AlreadyHeld,
    /// This seat already has a card in the current trick
    SeatAlreadyPlayed,
    /// Dummy just filled; reads are held off until the quiet window ends
    Settling,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IgnoreReason::WrongAntenna => "wrong antenna",
            IgnoreReason::NotReady => "not ready",
            IgnoreReason::AlreadyPlayed => "already played",
            IgnoreReason::AlreadyHeld => "already held",
            IgnoreReason::SeatAlreadyPlayed => "seat already played",
            IgnoreReason::Settling => "settling",
        };
        f.write_str(text)
    }
}

/// What happened to one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Scanned,
    Played,
    AwaitingConfirmation,
    Ignored(IgnoreReason),
    Rejected(Rejection),
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            Admission::Scanned | Admission::Played | Admission::AwaitingConfirmation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_covers_every_variant() {
        let card = Card::from_code("AS").unwrap();
        let events = [
            GameEvent::Debug("x".into()),
            GameEvent::GameReset,
            GameEvent::CardScanned {
                direction: Direction::North,
                card,
                hand_complete: false,
            },
            GameEvent::CardIdentified(card),
            GameEvent::CardPlayed {
                direction: Direction::East,
                card,
            },
            GameEvent::TrickWon {
                winner: Direction::East,
                tricks: 1,
            },
            GameEvent::ContractSet(Contract::default()),
            GameEvent::DummyPosition(Direction::South),
            GameEvent::NextPlayer(Direction::East),
            GameEvent::BlindHandScanned,
            GameEvent::DummyHandScanned,
            GameEvent::InvalidPlay {
                direction: Direction::West,
                card,
                reason: Rejection::NotInHand,
            },
            GameEvent::HandComplete(HandResult::new(Direction::North, 1, 7, 6)),
        ];
        let kinds: Vec<EventKind> = events.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, EventKind::ALL.to_vec());
    }

    #[test]
    fn test_admission_acceptance() {
        assert!(Admission::Played.is_accepted());
        assert!(!Admission::Ignored(IgnoreReason::Settling).is_accepted());
        assert!(!Admission::Rejected(Rejection::NotInHand).is_accepted());
    }
}
