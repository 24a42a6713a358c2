pub mod bridge_hand;
pub mod event;
pub mod game;
pub mod state;

pub use bridge_hand::{BridgeHand, HandRules};
pub use event::{Admission, Effect, EventKind, GameEvent, IgnoreReason};
pub use game::Game;
pub use state::GameState;
