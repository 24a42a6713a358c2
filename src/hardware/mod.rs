//! The RFID antenna boundary: the server protocol, the tag library, and the
//! handlers that drive real or simulated antennas.

pub mod code;
pub mod handler;
pub mod identifier;
pub mod library;
pub mod protocol;
pub mod simulated;
pub mod tcp;

pub use code::AntennaCode;
pub use handler::{AntennaHandler, CardSink};
pub use identifier::CardIdentifier;
pub use library::CardLibrary;
pub use protocol::{parse_reply, ServerReply};
pub use simulated::SimulatedHandler;
pub use tcp::TcpAntennaHandler;
