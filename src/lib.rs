pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod hardware;
pub mod model;
pub mod session;

pub use cli::Args;
pub use config::Settings;
pub use engine::{Admission, BridgeHand, Effect, Game, GameEvent, GameState, HandRules};
pub use error::{CommandError, ConfigError, HardwareError, LibraryError};
pub use hardware::{AntennaHandler, CardLibrary, SimulatedHandler, TcpAntennaHandler};
pub use model::{BidSuit, Card, Direction};
pub use session::{Session, SessionHandle, SessionSummary};
