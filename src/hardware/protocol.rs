//! Replies from the antenna server.
//!
//! The client writes `T` to ask for the card on the current antenna. The
//! server answers `NOCARD` when nothing is in range, `quit` when it is going
//! away, or a fixed-length card message:
//!
//! ```text
//! 0             14  16
//! <14-char tag ><..><antenna>
//! ```
//!
//! where the antenna is `1`..`4` for North, East, South, West or `C` for the
//! card-identification antenna.

use nom::{
    bytes::complete::take,
    character::complete::one_of,
    IResult,
};

use crate::config::defaults::{MESSAGE_LENGTH, NO_CARD_REPLY, QUIT_REPLY, TAG_LENGTH};
use crate::error::HardwareError;
use crate::model::Direction;

use super::code::AntennaCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerReply {
    NoCard,
    Quit,
    Card { tag: String, antenna: AntennaCode },
}

fn antenna(input: &str) -> IResult<&str, AntennaCode> {
    let (input, c) = one_of("1234C")(input)?;
    let code = match c {
        '1' => AntennaCode::Seat(Direction::North),
        '2' => AntennaCode::Seat(Direction::East),
        '3' => AntennaCode::Seat(Direction::South),
        '4' => AntennaCode::Seat(Direction::West),
        _ => AntennaCode::Player,
    };
    Ok((input, code))
}

/// Parse one card message. Anything after the fixed-length message is left over.
fn card_message(input: &str) -> IResult<&str, ServerReply> {
    let (input, tag) = take(TAG_LENGTH)(input)?;
    let (input, _) = take(MESSAGE_LENGTH - TAG_LENGTH - 1)(input)?;
    let (input, antenna) = antenna(input)?;

    Ok((
        input,
        ServerReply::Card {
            tag: tag.to_string(),
            antenna,
        },
    ))
}

/// Parse a raw reply read from the socket.
pub fn parse_reply(raw: &str) -> Result<ServerReply, HardwareError> {
    // Replies arrive in a fixed buffer and may carry trailing padding
    let reply = raw.trim_end_matches(|c: char| c == '\0' || c.is_whitespace());

    if reply.is_empty() || reply.starts_with(NO_CARD_REPLY) {
        return Ok(ServerReply::NoCard);
    }
    if reply.starts_with(QUIT_REPLY) {
        return Ok(ServerReply::Quit);
    }
    match card_message(reply) {
        Ok((_, message)) => Ok(message),
        Err(_) => Err(HardwareError::Protocol(reply.to_string())),
    }
}
