//! The session actor: the single owner of the game, fed by antenna reads and
//! keypad commands, publishing events to any number of listeners.

pub mod actor;
pub mod command;
pub mod listener;

pub use actor::{Session, SessionHandle, SessionSummary};
pub use command::{parse_keypad, Command, KeypadCommand};
pub use listener::{describe, Subscription};
