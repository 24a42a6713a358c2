//! Commands queued to the session, and the keypad command parser.
//!
//! Keypad lines are case-insensitive:
//!
//! ```text
//! blind <d>            declarer <d>        level <n>        trump <C|D|H|S|NT>
//! contract <n><strain> <d>                 play             rebid
//! undo [trick|blind|dummy]                 reset            deal
//! card <d> <code>      id <code>           quit
//! ```
//!
//! Directions are a letter or a full name, cards are rank then suit (`AS`, `TH`).

use nom::{
    bytes::complete::take_while1,
    character::complete::{alpha1, digit1, space0, space1},
    IResult,
};

use crate::error::CommandError;
use crate::model::{BidSuit, Card, Direction};

/// Everything the session reacts to arrives as one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A seat antenna saw a card
    CardFound { direction: Direction, card: Card },
    /// The identification antenna saw a card
    IdCardFound(Card),
    Keypad(KeypadCommand),
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeypadCommand {
    Blind(Direction),
    Declarer(Direction),
    Level(u8),
    Trump(BidSuit),
    Contract {
        level: u8,
        trump: BidSuit,
        declarer: Direction,
    },
    Play,
    Undo,
    UndoTrick,
    UndoBlind,
    UndoDummy,
    Rebid,
    Reset,
    /// Pretend a seat antenna saw a card
    Card { direction: Direction, card: Card },
    /// Pretend the identification antenna saw a card
    Id(Card),
    Deal,
    Quit,
}

fn failure(input: &str) -> nom::Err<nom::error::Error<&str>> {
    nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Verify,
    ))
}

/// A seat: one letter or the full name
fn direction(input: &str) -> IResult<&str, Direction> {
    let (rest, word) = alpha1(input)?;
    let found = if word.len() == 1 {
        word.chars().next().and_then(Direction::from_char)
    } else {
        Direction::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(word))
    };
    match found {
        Some(direction) => Ok((rest, direction)),
        None => Err(failure(input)),
    }
}

fn card(input: &str) -> IResult<&str, Card> {
    let (rest, code) = take_while1(|c: char| c.is_ascii_alphanumeric())(input)?;
    match Card::from_code(code) {
        Some(card) => Ok((rest, card)),
        None => Err(failure(input)),
    }
}

fn level(input: &str) -> IResult<&str, u8> {
    let (rest, digits) = digit1(input)?;
    match digits.parse() {
        Ok(level) => Ok((rest, level)),
        Err(_) => Err(failure(input)),
    }
}

fn strain(input: &str) -> IResult<&str, BidSuit> {
    let (rest, word) = alpha1(input)?;
    match BidSuit::parse(word) {
        Some(strain) => Ok((rest, strain)),
        None => Err(failure(input)),
    }
}

/// `contract 4H S`, `contract 3nt north`
fn contract(input: &str) -> IResult<&str, KeypadCommand> {
    let (input, _) = space1(input)?;
    let (input, level) = level(input)?;
    let (input, trump) = strain(input)?;
    let (input, _) = space1(input)?;
    let (input, declarer) = direction(input)?;

    Ok((
        input,
        KeypadCommand::Contract {
            level,
            trump,
            declarer,
        },
    ))
}

fn undo(input: &str) -> IResult<&str, KeypadCommand> {
    let (rest, _) = space0(input)?;
    if rest.is_empty() {
        return Ok((rest, KeypadCommand::Undo));
    }
    let (input, _) = space1(input)?;
    let (input, target) = alpha1(input)?;
    let command = match target.to_ascii_lowercase().as_str() {
        "trick" => KeypadCommand::UndoTrick,
        "blind" => KeypadCommand::UndoBlind,
        "dummy" => KeypadCommand::UndoDummy,
        _ => return Err(failure(target)),
    };
    Ok((input, command))
}

fn keypad_command(input: &str) -> IResult<&str, KeypadCommand> {
    let (input, _) = space0(input)?;
    let (input, word) = alpha1(input)?;

    let (input, command) = match word.to_ascii_lowercase().as_str() {
        "blind" => {
            let (input, _) = space1(input)?;
            let (input, seat) = direction(input)?;
            (input, KeypadCommand::Blind(seat))
        }
        "declarer" => {
            let (input, _) = space1(input)?;
            let (input, seat) = direction(input)?;
            (input, KeypadCommand::Declarer(seat))
        }
        "level" => {
            let (input, _) = space1(input)?;
            let (input, n) = level(input)?;
            (input, KeypadCommand::Level(n))
        }
        "trump" => {
            let (input, _) = space1(input)?;
            let (input, trump) = strain(input)?;
            (input, KeypadCommand::Trump(trump))
        }
        "contract" => contract(input)?,
        "card" => {
            let (input, _) = space1(input)?;
            let (input, seat) = direction(input)?;
            let (input, _) = space1(input)?;
            let (input, found) = card(input)?;
            (
                input,
                KeypadCommand::Card {
                    direction: seat,
                    card: found,
                },
            )
        }
        "id" => {
            let (input, _) = space1(input)?;
            let (input, found) = card(input)?;
            (input, KeypadCommand::Id(found))
        }
        "undo" => undo(input)?,
        "play" => (input, KeypadCommand::Play),
        "rebid" => (input, KeypadCommand::Rebid),
        "reset" => (input, KeypadCommand::Reset),
        "deal" => (input, KeypadCommand::Deal),
        "quit" => (input, KeypadCommand::Quit),
        _ => return Err(failure(word)),
    };

    let (input, _) = space0(input)?;
    Ok((input, command))
}

/// Parse one keypad line.
pub fn parse_keypad(line: &str) -> Result<KeypadCommand, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(CommandError::Empty);
    }
    match keypad_command(line) {
        Ok(("", command)) => Ok(command),
        _ => Err(CommandError::Unrecognized(line.to_string())),
    }
}
