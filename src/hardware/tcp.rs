use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::defaults::{CARD_REQUEST, CARD_REQUEST_PAUSE, QUIT_REPLY};
use crate::error::HardwareError;

use super::code::AntennaCode;
use super::handler::{AntennaHandler, CardSink};
use super::library::CardLibrary;
use super::protocol::{parse_reply, ServerReply};

/// Size of the buffer one reply is read into
const READ_BUFFER_SIZE: usize = 3000;

enum Control {
    Switch {
        code: AntennaCode,
        ack: oneshot::Sender<()>,
    },
    Quit,
}

/// Talks to the antenna server over TCP.
///
/// A poller task owns the socket and asks for a card over and over. Antenna
/// switches are handed to the poller, which acknowledges each one after it
/// has sent the next card request.
pub struct TcpAntennaHandler {
    addr: String,
    library: Arc<CardLibrary>,
    cycle_id_antenna: bool,
    request_pause: Duration,
    control: Option<mpsc::UnboundedSender<Control>>,
    poller: Option<JoinHandle<()>>,
}

impl TcpAntennaHandler {
    pub fn new(addr: impl Into<String>, library: Arc<CardLibrary>) -> Self {
        Self {
            addr: addr.into(),
            library,
            cycle_id_antenna: false,
            request_pause: CARD_REQUEST_PAUSE,
            control: None,
            poller: None,
        }
    }

    /// Alternate every request between the current seat and the id antenna.
    pub fn with_id_cycling(mut self, cycle: bool) -> Self {
        self.cycle_id_antenna = cycle;
        self
    }

    pub fn with_request_pause(mut self, pause: Duration) -> Self {
        self.request_pause = pause;
        self
    }
}

#[async_trait]
impl AntennaHandler for TcpAntennaHandler {
    async fn connect(&mut self, sink: CardSink) -> Result<(), HardwareError> {
        log::info!("Connecting to antenna server at {}", self.addr);
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|source| HardwareError::Connect {
                addr: self.addr.clone(),
                source,
            })?;
        log::info!("Connected to {}", self.addr);

        let (tx, rx) = mpsc::unbounded_channel();
        let poller = Poller {
            stream,
            library: self.library.clone(),
            sink,
            control: rx,
            current: None,
            on_id_antenna: false,
            cycle_id_antenna: self.cycle_id_antenna,
            request_pause: self.request_pause,
            pending_acks: Vec::new(),
        };
        self.poller = Some(tokio::spawn(async move {
            match poller.run().await {
                Ok(()) => log::info!("Antenna poller stopped"),
                Err(e) => log::error!("Antenna poller failed: {}", e),
            }
        }));
        self.control = Some(tx);
        Ok(())
    }

    async fn switch_hand(&mut self, code: AntennaCode) -> Result<(), HardwareError> {
        let control = self.control.as_ref().ok_or(HardwareError::NotConnected)?;
        log::debug!("Switching to antenna {}", code);
        let (ack, acked) = oneshot::channel();
        control
            .send(Control::Switch { code, ack })
            .map_err(|_| HardwareError::Disconnected)?;
        acked.await.map_err(|_| HardwareError::Disconnected)
    }

    async fn quit_server(&mut self) -> Result<(), HardwareError> {
        let control = match self.control.take() {
            Some(control) => control,
            None => return Ok(()),
        };
        let _ = control.send(Control::Quit);
        if let Some(poller) = self.poller.take() {
            let _ = poller.await;
        }
        Ok(())
    }
}

struct Poller {
    stream: TcpStream,
    library: Arc<CardLibrary>,
    sink: CardSink,
    control: mpsc::UnboundedReceiver<Control>,
    current: Option<AntennaCode>,
    on_id_antenna: bool,
    cycle_id_antenna: bool,
    request_pause: Duration,
    pending_acks: Vec<oneshot::Sender<()>>,
}

impl Poller {
    async fn send(&mut self, text: &str) -> Result<(), HardwareError> {
        self.stream.write_all(text.as_bytes()).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Apply queued switches. Returns false when asked to quit.
    async fn drain_control(&mut self) -> Result<bool, HardwareError> {
        loop {
            match self.control.try_recv() {
                Ok(Control::Switch { code, ack }) => {
                    self.send(code.as_str()).await?;
                    self.current = Some(code);
                    self.on_id_antenna = code == AntennaCode::Player;
                    self.pending_acks.push(ack);
                }
                Ok(Control::Quit) => {
                    self.send(QUIT_REPLY).await?;
                    return Ok(false);
                }
                Err(mpsc::error::TryRecvError::Empty) => return Ok(true),
                Err(mpsc::error::TryRecvError::Disconnected) => return Ok(false),
            }
        }
    }

    /// With id cycling on, flip between the seat antenna and the id antenna.
    async fn cycle(&mut self) -> Result<(), HardwareError> {
        let seat = match self.current {
            Some(AntennaCode::Seat(direction)) => AntennaCode::Seat(direction),
            _ => return Ok(()),
        };
        self.on_id_antenna = !self.on_id_antenna;
        let next = if self.on_id_antenna {
            AntennaCode::Player
        } else {
            seat
        };
        self.send(next.as_str()).await
    }

    async fn request_card(&mut self, buf: &mut [u8]) -> Result<String, HardwareError> {
        self.send(CARD_REQUEST).await?;
        // A request has gone out on the new antenna: release waiting switches
        for ack in self.pending_acks.drain(..) {
            let _ = ack.send(());
        }
        let n = self.stream.read(buf).await?;
        if n == 0 {
            return Err(HardwareError::Disconnected);
        }
        Ok(String::from_utf8_lossy(&buf[..n]).into_owned())
    }

    fn deliver(&self, tag: &str, antenna: AntennaCode) -> bool {
        let card = match self.library.lookup(tag) {
            Some(card) => card,
            None => {
                log::warn!("Unknown tag {} on antenna {}", tag, antenna);
                return true;
            }
        };
        log::debug!("Antenna {} sees {}", antenna, card);
        match antenna {
            AntennaCode::Seat(direction) => self.sink.card_found(direction, card),
            AntennaCode::Player => self.sink.id_card_found(card),
        }
    }

    async fn run(mut self) -> Result<(), HardwareError> {
        let mut buf = vec![0u8; READ_BUFFER_SIZE];
        loop {
            if !self.drain_control().await? {
                return Ok(());
            }
            if self.cycle_id_antenna && self.pending_acks.is_empty() {
                self.cycle().await?;
            }
            let raw = self.request_card(&mut buf).await?;
            match parse_reply(&raw) {
                Ok(ServerReply::NoCard) => {}
                Ok(ServerReply::Quit) => {
                    log::info!("Antenna server quit");
                    return Ok(());
                }
                Ok(ServerReply::Card { tag, antenna }) => {
                    if !self.deliver(&tag, antenna) {
                        log::info!("Session closed, stopping antenna poller");
                        return Ok(());
                    }
                }
                Err(e) => log::warn!("{}", e),
            }
            tokio::time::sleep(self.request_pause).await;
        }
    }
}
