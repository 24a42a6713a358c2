use clap::Parser;
use std::path::PathBuf;

use crate::config::defaults::{DEFAULT_HOST, DEFAULT_PORT};

#[derive(Parser, Debug)]
#[command(name = "blind-bridge")]
#[command(
    author,
    version,
    about = "Run an RFID card table so a visually-impaired player can play bridge"
)]
pub struct Args {
    /// Seat of the visually-impaired player (N, E, S or W)
    #[arg(short = 'b', long)]
    pub blind: String,

    /// Antenna server host
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Antenna server port
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Card library mapping RFID tags to cards
    #[arg(short = 'l', long)]
    pub library: Option<PathBuf>,

    /// Run without antenna hardware; cards are entered from the keypad
    #[arg(long)]
    pub simulate: bool,

    /// Quiet window in milliseconds after the dummy is scanned
    #[arg(long)]
    pub settle_ms: Option<u64>,

    /// Announce the blind player's card and wait for `play` before playing it
    #[arg(long)]
    pub confirm_blind_play: bool,

    /// Alternate polling between the seat antenna and the identification antenna
    #[arg(long)]
    pub cycle_id_antenna: bool,

    /// Seed for simulated deals
    #[arg(long)]
    pub seed: Option<u64>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Address of the antenna server
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
