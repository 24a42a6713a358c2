use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::HardwareError;
use crate::model::{Card, Direction};
use crate::session::Command;

use super::code::AntennaCode;

/// Where a handler delivers the cards its antennas see.
///
/// Every read becomes a [`Command`] on the session's queue, so reads from any
/// number of pollers are admitted one at a time.
#[derive(Debug, Clone)]
pub struct CardSink {
    commands: mpsc::UnboundedSender<Command>,
}

impl CardSink {
    pub fn new(commands: mpsc::UnboundedSender<Command>) -> Self {
        Self { commands }
    }

    /// Report a card on a seat antenna. Returns false once the session is gone.
    pub fn card_found(&self, direction: Direction, card: Card) -> bool {
        self.commands
            .send(Command::CardFound { direction, card })
            .is_ok()
    }

    /// Report a card on the identification antenna.
    pub fn id_card_found(&self, card: Card) -> bool {
        self.commands.send(Command::IdCardFound(card)).is_ok()
    }
}

/// The antenna hardware boundary.
///
/// `switch_hand` must not return until the hardware has made at least one read
/// attempt on the new antenna.
#[async_trait]
pub trait AntennaHandler: Send {
    /// Connect and start delivering reads to `sink`.
    async fn connect(&mut self, sink: CardSink) -> Result<(), HardwareError>;

    async fn switch_hand(&mut self, code: AntennaCode) -> Result<(), HardwareError>;

    async fn switch_to(&mut self, direction: Direction) -> Result<(), HardwareError> {
        self.switch_hand(AntennaCode::Seat(direction)).await
    }

    /// Tell the server to shut down and stop polling.
    async fn quit_server(&mut self) -> Result<(), HardwareError>;
}
