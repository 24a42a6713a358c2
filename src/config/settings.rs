use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Args;
use crate::engine::HandRules;
use crate::error::ConfigError;
use crate::model::Direction;

use super::defaults::*;

/// Runtime settings for a table session
#[derive(Debug, Clone)]
pub struct Settings {
    pub blind: Direction,

    // Antenna server
    pub host: String,
    pub port: u16,
    pub library: Option<PathBuf>,
    pub simulate: bool,
    pub cycle_id_antenna: bool,
    pub request_pause: Duration,

    // Table rules
    pub settle_delay: Duration,
    pub confirm_blind_play: bool,

    /// Seed for simulated deals (None = random)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blind: Direction::South,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            library: None,
            simulate: false,
            cycle_id_antenna: false,
            request_pause: CARD_REQUEST_PAUSE,
            settle_delay: DUMMY_SETTLE_DELAY,
            confirm_blind_play: false,
            seed: None,
        }
    }
}

/// Accept a seat letter or its full name
fn parse_direction(text: &str) -> Result<Direction, ConfigError> {
    let text = text.trim();
    let found = if text.chars().count() == 1 {
        text.chars().next().and_then(Direction::from_char)
    } else {
        Direction::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(text))
    };
    found.ok_or_else(|| ConfigError::InvalidDirection(text.to_string()))
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let blind = parse_direction(&args.blind)?;
        if !args.simulate && args.library.is_none() {
            return Err(ConfigError::MissingLibrary);
        }

        let defaults = Self::default();
        Ok(Self {
            blind,
            host: args.host.clone(),
            port: args.port,
            library: args.library.clone(),
            simulate: args.simulate,
            cycle_id_antenna: args.cycle_id_antenna,
            settle_delay: args
                .settle_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.settle_delay),
            confirm_blind_play: args.confirm_blind_play,
            seed: args.seed,
            ..defaults
        })
    }

    /// Rules handed to every hand of the session
    pub fn hand_rules(&self) -> HandRules {
        HandRules {
            settle_delay: self.settle_delay,
            confirm_blind_play: self.confirm_blind_play,
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
