use std::collections::HashSet;

use tokio::sync::broadcast;

use crate::engine::{EventKind, GameEvent};

/// A receiver of game events that only yields the kinds it asked for.
pub struct Subscription {
    receiver: broadcast::Receiver<GameEvent>,
    kinds: HashSet<EventKind>,
}

impl Subscription {
    pub fn new(receiver: broadcast::Receiver<GameEvent>, kinds: &[EventKind]) -> Self {
        Self {
            receiver,
            kinds: kinds.iter().copied().collect(),
        }
    }

    pub fn all(receiver: broadcast::Receiver<GameEvent>) -> Self {
        Self::new(receiver, &EventKind::ALL)
    }

    pub fn wants(&self, kind: EventKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Wait for the next wanted event. Returns None once the session is gone.
    pub async fn next(&mut self) -> Option<GameEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.wants(event.kind()) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    log::warn!("Listener fell behind, {} events dropped", missed);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// A wanted event that is already queued, without waiting.
    pub fn try_next(&mut self) -> Option<GameEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.wants(event.kind()) => return Some(event),
                Ok(_) => continue,
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    log::warn!("Listener fell behind, {} events dropped", missed);
                }
                Err(_) => return None,
            }
        }
    }
}

/// Render an event as a line for the console listener.
pub fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::Debug(message) => format!("debug: {}", message),
        GameEvent::GameReset => "New hand".to_string(),
        GameEvent::CardScanned {
            direction,
            card,
            hand_complete,
        } => {
            if *hand_complete {
                format!("{} scanned {}, hand complete", direction, card)
            } else {
                format!("{} scanned {}", direction, card)
            }
        }
        GameEvent::CardIdentified(card) => format!("Card is {}", card),
        GameEvent::CardPlayed { direction, card } => format!("{} plays {}", direction, card),
        GameEvent::TrickWon { winner, tricks } => {
            format!("{} wins the trick, {} tricks", winner, tricks)
        }
        GameEvent::ContractSet(contract) => format!("Contract {}", contract),
        GameEvent::DummyPosition(dummy) => format!("Dummy is {}", dummy),
        GameEvent::NextPlayer(seat) => format!("{} to play", seat),
        GameEvent::BlindHandScanned => "Blind hand scanned".to_string(),
        GameEvent::DummyHandScanned => "Dummy hand scanned".to_string(),
        GameEvent::InvalidPlay {
            direction,
            card,
            reason,
        } => format!("{} cannot play {}: {}", direction, card, reason),
        GameEvent::HandComplete(result) => format!(
            "Hand over: {} took {}, defenders {}, contract {}",
            result.declarer,
            result.declarer_tricks,
            result.defender_tricks,
            if result.made { "made" } else { "defeated" }
        ),
    }
}
