use std::fmt;

/// Phase of one bridge hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    /// Scanning the blind player's thirteen cards
    #[default]
    Dealing,
    /// Waiting for the opening lead
    FirstCard,
    /// Scanning the dummy after the opening lead
    ScanningDummy,
    /// Trick play
    Playing,
}

impl GameState {
    pub fn name(&self) -> &'static str {
        match self {
            GameState::Dealing => "dealing",
            GameState::FirstCard => "first card",
            GameState::ScanningDummy => "scanning dummy",
            GameState::Playing => "playing",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
