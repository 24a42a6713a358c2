use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Invalid card library entry at line {line}: {message}")]
    InvalidLine { line: usize, message: String },

    #[error("Card library is missing its {0} line")]
    MissingHeader(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum HardwareError {
    #[error("Failed to connect to antenna server at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Antenna server IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected message from antenna server: {0:?}")]
    Protocol(String),

    #[error("Lost connection to the antenna server")]
    Disconnected,

    #[error("Not connected to the antenna server")]
    NotConnected,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unrecognized command: {0}")]
    Unrecognized(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid direction: {0} (expected N, E, S or W)")]
    InvalidDirection(String),

    #[error("A card library file is required unless --simulate is given")]
    MissingLibrary,
}
