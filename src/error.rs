//! Error kinds raised while reading melody notation.

use thiserror::Error;

use crate::note::{Letter, Modifier};

/// A failure inside a single line of notation.
///
/// Positions are 1-based columns in the line after spaces and carriage
/// returns have been stripped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteError {
    #[error("unexpected note name '{found}' at column {position}")]
    InvalidNoteName { found: char, position: usize },

    #[error("unexpected octave {} at column {position}", describe(*.found))]
    InvalidOctave { found: Option<char>, position: usize },

    #[error("unknown spelling {}", spelling(*.name, *.modifier))]
    UnknownSpelling {
        name: Letter,
        modifier: Option<Modifier>,
    },
}

fn describe(found: Option<char>) -> String {
    match found {
        Some(c) => format!("'{}'", c),
        None => "<end of line>".to_string(),
    }
}

fn spelling(name: Letter, modifier: Option<Modifier>) -> String {
    match modifier {
        Some(m) => format!("{}{}", name, m.glyph()),
        None => name.to_string(),
    }
}

/// A failure anywhere in a melody, tagged with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {source}")]
pub struct ParseError {
    pub line: usize,
    #[source]
    pub source: NoteError,
}

/// Any failure between melody text and a finished grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Note(#[from] NoteError),
}
