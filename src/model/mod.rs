pub mod card;
pub mod contract;
pub mod deck;
pub mod direction;
pub mod hand;
pub mod player;
pub mod trick;

pub use card::{Card, Rank, Suit};
pub use contract::{BidSuit, Contract, HandResult};
pub use deck::Deck;
pub use direction::{Direction, Seats};
pub use hand::{Hand, CARDS_IN_HAND};
pub use player::{Player, Rejection};
pub use trick::Trick;
