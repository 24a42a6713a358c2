use std::fmt;

use crate::model::Direction;

/// Antenna selector understood by the antenna server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AntennaCode {
    /// The antenna in front of a seat
    Seat(Direction),
    /// The shared card-identification antenna
    Player,
}

impl AntennaCode {
    /// The single-letter switch command: N, E, S, W or P
    pub fn as_str(&self) -> &'static str {
        match self {
            AntennaCode::Seat(Direction::North) => "N",
            AntennaCode::Seat(Direction::East) => "E",
            AntennaCode::Seat(Direction::South) => "S",
            AntennaCode::Seat(Direction::West) => "W",
            AntennaCode::Player => "P",
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'P' => Some(AntennaCode::Player),
            other => Direction::from_char(other).map(AntennaCode::Seat),
        }
    }

    pub fn direction(&self) -> Option<Direction> {
        match self {
            AntennaCode::Seat(direction) => Some(*direction),
            AntennaCode::Player => None,
        }
    }
}

impl From<Direction> for AntennaCode {
    fn from(direction: Direction) -> Self {
        AntennaCode::Seat(direction)
    }
}

impl fmt::Display for AntennaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
