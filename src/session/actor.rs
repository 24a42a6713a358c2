use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{broadcast, mpsc};

use crate::config::defaults::EVENT_BUFFER;
use crate::engine::{Effect, EventKind, Game, GameEvent, GameState, HandRules};
use crate::error::HardwareError;
use crate::hardware::{AntennaHandler, CardIdentifier, CardSink};
use crate::model::{Card, Deck, Direction, HandResult, Seats};

use super::command::{Command, KeypadCommand};
use super::listener::Subscription;

/// What a session leaves behind when it ends cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub hands_completed: usize,
    pub last_result: Option<HandResult>,
}

/// Cheap handle for feeding a running session and watching its events.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<GameEvent>,
}

impl SessionHandle {
    /// Queue a command. Returns false once the session has ended.
    pub fn send(&self, command: Command) -> bool {
        self.commands.send(command).is_ok()
    }

    pub fn keypad(&self, command: KeypadCommand) -> bool {
        self.send(Command::Keypad(command))
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription::all(self.events.subscribe())
    }

    pub fn subscribe_to(&self, kinds: &[EventKind]) -> Subscription {
        Subscription::new(self.events.subscribe(), kinds)
    }

    pub fn sink(&self) -> CardSink {
        CardSink::new(self.commands.clone())
    }

    pub fn shutdown(&self) -> bool {
        self.send(Command::Shutdown)
    }
}

enum Wake {
    Command(Option<Command>),
    Settle,
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

async fn settle_timer(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await,
        None => std::future::pending().await,
    }
}

/// The single owner of the game.
///
/// Antenna reads and keypad commands queue up on one channel and are applied
/// one at a time. After each one, the session publishes the resulting events
/// and performs the antenna hand-offs before taking the next command.
pub struct Session {
    game: Game,
    handler: Box<dyn AntennaHandler>,
    commands: mpsc::UnboundedReceiver<Command>,
    sink: CardSink,
    events: broadcast::Sender<GameEvent>,
    identifier: CardIdentifier,
    rng: StdRng,
    current_deal: Option<Seats<Vec<Card>>>,
}

impl Session {
    pub fn new(
        blind: Direction,
        rules: HandRules,
        handler: Box<dyn AntennaHandler>,
    ) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        let handle = SessionHandle {
            commands: tx.clone(),
            events: events.clone(),
        };
        let session = Self {
            game: Game::new(blind, rules),
            handler,
            commands: rx,
            sink: CardSink::new(tx),
            events,
            identifier: CardIdentifier::default(),
            rng: StdRng::from_entropy(),
            current_deal: None,
        };
        (session, handle)
    }

    /// Use a fixed seed for simulated deals.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run until `quit` or shutdown. A failed antenna hand-off ends the
    /// session with that error.
    pub async fn run(mut self) -> Result<SessionSummary, HardwareError> {
        self.handler.connect(self.sink.clone()).await?;
        self.apply_effects().await?;

        loop {
            let deadline = self.game.hand().settle_deadline();
            let wake = tokio::select! {
                command = self.commands.recv() => Wake::Command(command),
                _ = settle_timer(deadline) => Wake::Settle,
            };
            let keep_going = match wake {
                Wake::Command(Some(command)) => self.handle(command),
                Wake::Command(None) => false,
                Wake::Settle => {
                    self.game.settle(now());
                    true
                }
            };
            self.apply_effects().await?;
            if !keep_going {
                break;
            }
        }

        log::info!(
            "Session over after {} completed hands",
            self.game.hands_completed()
        );
        self.handler.quit_server().await?;
        Ok(SessionSummary {
            hands_completed: self.game.hands_completed(),
            last_result: self.game.last_result(),
        })
    }

    async fn apply_effects(&mut self) -> Result<(), HardwareError> {
        for effect in self.game.drain_effects() {
            match effect {
                Effect::Notify(event) => {
                    log::debug!("Event: {:?}", event);
                    // No subscribers is fine
                    let _ = self.events.send(event);
                }
                Effect::SwitchAntenna(seat) => {
                    if let Err(e) = self.handler.switch_to(seat).await {
                        log::error!("Antenna switch to {} failed: {}", seat, e);
                        return Err(e);
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply one command. Returns false when the session should stop.
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::CardFound { direction, card } => {
                self.card_found(direction, card);
                true
            }
            Command::IdCardFound(card) => {
                if self.identifier.identify(card, now()) {
                    self.game.card_identified(card);
                }
                true
            }
            Command::Keypad(keypad) => self.keypad(keypad),
            Command::Shutdown => false,
        }
    }

    fn card_found(&mut self, direction: Direction, card: Card) {
        let admission = self.game.card_found(direction, card, now());
        log::trace!("{} at {}: {:?}", card, direction, admission);
    }

    fn refused(&self, what: &str) {
        log::info!("{} refused in {} state", what, self.game.hand().state());
    }

    fn keypad(&mut self, command: KeypadCommand) -> bool {
        log::debug!("Keypad: {:?}", command);
        match command {
            KeypadCommand::Blind(seat) => {
                if self.game.set_blind_position(seat) {
                    self.current_deal = None;
                } else {
                    self.refused("Blind seat change");
                }
            }
            KeypadCommand::Declarer(seat) => {
                if !self.game.set_declarer(seat) {
                    self.refused("Declarer");
                }
            }
            KeypadCommand::Level(level) => {
                if !self.game.set_contract_level(level) {
                    self.refused("Contract level");
                }
            }
            KeypadCommand::Trump(trump) => {
                if !self.game.set_trump(trump) {
                    self.refused("Trump");
                }
            }
            KeypadCommand::Contract {
                level,
                trump,
                declarer,
            } => {
                // A refused declarer refuses the whole contract
                let applied = self.game.set_declarer(declarer)
                    && self.game.set_contract_level(level)
                    && self.game.set_trump(trump);
                if !applied {
                    self.refused("Contract");
                }
            }
            KeypadCommand::Play => {
                let admission = self.game.play_blind_card();
                log::debug!("Blind card confirmation: {:?}", admission);
            }
            KeypadCommand::Undo => {
                if self.game.undo().is_none() {
                    self.refused("Undo");
                }
            }
            KeypadCommand::UndoTrick => {
                if !self.game.undo_trick() {
                    self.refused("Undo trick");
                }
            }
            KeypadCommand::UndoBlind => {
                if self.game.undo_blind_card().is_none() {
                    self.refused("Undo blind card");
                }
            }
            KeypadCommand::UndoDummy => {
                if self.game.undo_dummy_card().is_none() {
                    self.refused("Undo dummy card");
                }
            }
            KeypadCommand::Rebid => {
                if !self.game.reverse_bid_position() {
                    self.refused("Rebid");
                }
            }
            KeypadCommand::Reset => {
                self.game.reset_game();
                self.identifier.clear();
                self.current_deal = None;
            }
            KeypadCommand::Card { direction, card } => self.card_found(direction, card),
            KeypadCommand::Id(card) => self.game.card_identified(card),
            KeypadCommand::Deal => self.deal(),
            KeypadCommand::Quit => return false,
        }
        true
    }

    /// Simulate scanning: the blind hand of a fresh deal while dealing, the
    /// dummy of that same deal while the dummy is being scanned.
    fn deal(&mut self) {
        let state = self.game.hand().state();
        let seat = match state {
            GameState::Dealing => {
                let mut deck = Deck::standard();
                deck.shuffle(&mut self.rng);
                self.current_deal = Some(deck.deal(Direction::North));
                Some(self.game.blind())
            }
            GameState::ScanningDummy => self.game.hand().dummy(),
            _ => None,
        };
        let (seat, cards) = match (seat, &self.current_deal) {
            (Some(seat), Some(deal)) => (seat, deal[seat].clone()),
            _ => {
                log::info!("Nothing to deal in {} state", state);
                return;
            }
        };
        log::info!("Dealing {} cards to {}", cards.len(), seat);
        for card in cards {
            self.card_found(seat, card);
        }
    }
}
