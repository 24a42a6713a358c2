use std::time::{Duration, Instant};

use crate::config::defaults::ID_REPEAT_WINDOW;
use crate::model::Card;

/// Filters reads from the card-identification antenna.
///
/// The antenna sees a card on every poll while it is held there. A card is
/// reported when it differs from the last one, or when the same card shows up
/// again after the repeat window has passed.
#[derive(Debug, Clone)]
pub struct CardIdentifier {
    last: Option<(Card, Instant)>,
    window: Duration,
}

impl Default for CardIdentifier {
    fn default() -> Self {
        Self::new(ID_REPEAT_WINDOW)
    }
}

impl CardIdentifier {
    pub fn new(window: Duration) -> Self {
        Self { last: None, window }
    }

    /// Returns true if this read should be announced.
    pub fn identify(&mut self, card: Card, now: Instant) -> bool {
        if let Some((last, at)) = self.last {
            if last == card && now.saturating_duration_since(at) < self.window {
                return false;
            }
        }
        self.last = Some((card, now));
        true
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}
