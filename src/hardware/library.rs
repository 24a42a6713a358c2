//! The card library maps RFID tags to the card they are stuck on.
//!
//! File format:
//!
//! ```text
//! 52                              number of cards
//! 2                               number of decks
//! E0040000A1B2C3.E0040000A1B2C4|AS
//! ...
//! ```
//!
//! Every card line names two tags (one per deck) and the card code.

use std::collections::HashMap;
use std::path::Path;

use nom::{
    bytes::complete::{take, take_while1},
    character::complete::{char, space0},
    IResult,
};

use crate::error::LibraryError;
use crate::model::Card;

#[derive(Debug, Clone, Default)]
pub struct CardLibrary {
    cards: HashMap<String, Card>,
    card_count: usize,
    deck_count: usize,
}

fn tag_id(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric())(input)
}

fn card_code(input: &str) -> IResult<&str, Card> {
    let (rest, code) = take(2usize)(input)?;
    match Card::from_code(code) {
        Some(card) => Ok((rest, card)),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        ))),
    }
}

/// Parse `<ID>.<ID>|<RANK><SUIT>`
fn library_entry(input: &str) -> IResult<&str, (&str, &str, Card)> {
    let (input, first) = tag_id(input)?;
    let (input, _) = char('.')(input)?;
    let (input, second) = tag_id(input)?;
    let (input, _) = char('|')(input)?;
    let (input, card) = card_code(input)?;
    let (input, _) = space0(input)?;

    Ok((input, (first, second, card)))
}

fn header_count(
    lines: &mut impl Iterator<Item = (usize, String)>,
    name: &'static str,
) -> Result<usize, LibraryError> {
    let (line, text) = lines.next().ok_or(LibraryError::MissingHeader(name))?;
    text.trim()
        .parse()
        .map_err(|_| LibraryError::InvalidLine {
            line,
            message: format!("expected the {}, found {:?}", name, text.trim()),
        })
}

impl CardLibrary {
    pub fn parse(content: &str) -> Result<Self, LibraryError> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(i, text)| (i + 1, text.to_string()));

        let card_count = header_count(&mut lines, "card count")?;
        let deck_count = header_count(&mut lines, "deck count")?;
        // The header counts are only reported, never trusted for allocation
        let mut cards = HashMap::new();

        for (line, text) in lines {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            match library_entry(text) {
                Ok(("", (first, second, card))) => {
                    cards.insert(first.to_string(), card);
                    cards.insert(second.to_string(), card);
                }
                Ok((rest, _)) => {
                    return Err(LibraryError::InvalidLine {
                        line,
                        message: format!("unexpected text {:?}", rest),
                    })
                }
                Err(_) => {
                    return Err(LibraryError::InvalidLine {
                        line,
                        message: format!("expected <ID>.<ID>|<card>, found {:?}", text),
                    })
                }
            }
        }

        log::info!(
            "Card library: {} tags for {} cards in {} decks",
            cards.len(),
            card_count,
            deck_count
        );
        Ok(Self {
            cards,
            card_count,
            deck_count,
        })
    }

    pub fn load(path: &Path) -> Result<Self, LibraryError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn lookup(&self, tag: &str) -> Option<Card> {
        self.cards.get(tag).copied()
    }

    /// Number of tags known
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    pub fn deck_count(&self) -> usize {
        self.deck_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "2\n2\nE0040000A1B2C3.E0040000A1B2C4|AS\nE0040000A1B2C5.E0040000A1B2C6|TD\n";

    #[test]
    fn test_parse_library() {
        let library = CardLibrary::parse(SAMPLE).unwrap();
        assert_eq!(library.card_count(), 2);
        assert_eq!(library.deck_count(), 2);
        assert_eq!(library.len(), 4);
        assert_eq!(library.lookup("E0040000A1B2C3"), Card::from_code("AS"));
        assert_eq!(library.lookup("E0040000A1B2C4"), Card::from_code("AS"));
        assert_eq!(library.lookup("E0040000A1B2C6"), Card::from_code("TD"));
        assert_eq!(library.lookup("E0040000FFFFFF"), None);
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let library = CardLibrary::parse("1\r\n1\r\n\r\nA1.B2|2C\r\n").unwrap();
        assert_eq!(library.lookup("B2"), Card::from_code("2C"));
    }

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            CardLibrary::parse("52\n"),
            Err(LibraryError::MissingHeader("deck count"))
        ));
        assert!(matches!(
            CardLibrary::parse("lots\n2\n"),
            Err(LibraryError::InvalidLine { line: 1, .. })
        ));
    }

    #[test]
    fn test_huge_header_counts() {
        let library = CardLibrary::parse("18446744073709551615\n2\n").unwrap();
        assert!(library.is_empty());
        assert_eq!(library.card_count(), usize::MAX);
    }

    #[test]
    fn test_bad_entry_reports_line() {
        let err = CardLibrary::parse("1\n1\nA1.B2|XX\n").unwrap_err();
        assert!(matches!(err, LibraryError::InvalidLine { line: 3, .. }));
        let err = CardLibrary::parse("1\n1\nA1|AS\n").unwrap_err();
        assert!(matches!(err, LibraryError::InvalidLine { line: 3, .. }));
    }
}
