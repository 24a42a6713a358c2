use std::time::Duration;

/// Default antenna server host
pub const DEFAULT_HOST: &str = "localhost";

/// Default antenna server port
pub const DEFAULT_PORT: u16 = 6666;

/// Pause before asking the server again after a NOCARD reply
pub const CARD_REQUEST_PAUSE: Duration = Duration::from_millis(200);

/// Quiet window after the dummy's last card is scanned, before play resumes
pub const DUMMY_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// The id antenna reports the same card at most once in this window
pub const ID_REPEAT_WINDOW: Duration = Duration::from_millis(500);

/// Length of a card message from the antenna server
pub const MESSAGE_LENGTH: usize = 17;

/// Length of the RFID tag at the start of a card message
pub const TAG_LENGTH: usize = 14;

/// Tricks in one hand
pub const TRICKS_IN_HAND: u8 = 13;

/// Card request sent to the server
pub const CARD_REQUEST: &str = "T";

/// Reply prefix meaning no card was in range
pub const NO_CARD_REPLY: &str = "NOCARD";

/// Reply prefix meaning the server is shutting down
pub const QUIT_REPLY: &str = "quit";

/// Events buffered per listener before the slowest one starts losing them
pub const EVENT_BUFFER: usize = 256;
