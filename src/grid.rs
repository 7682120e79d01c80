//! Pin grid rendering.
//!
//! The output is four assignment lines meant to be pasted into firmware
//! source:
//! ```text
//! pinNrX = 2;
//! pinNrY = 2;
//! teethNotes="C4 D4 ";
//! pins="XX X";
//! ```

use std::fmt;

use crate::error::{Error, NoteError};
use crate::note::{Melody, Note};
use crate::parser;

/// Presence matrix of distinct pitches (columns) per tick (rows).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Distinct pitches, ascending. One tooth per entry.
    pub teeth: Vec<Note>,
    pub ticks: usize,
    /// Row-major, `teeth.len()` cells per tick.
    pub pins: Vec<bool>,
}

impl Grid {
    pub fn from_melody(melody: &Melody) -> Result<Grid, NoteError> {
        let teeth_values = melody
            .distinct_pitches
            .iter()
            .map(Note::pitch_value)
            .collect::<Result<Vec<_>, _>>()?;

        let mut pins = Vec::with_capacity(teeth_values.len() * melody.ticks.len());
        for tick in &melody.ticks {
            let tick_values = tick
                .iter()
                .map(Note::pitch_value)
                .collect::<Result<Vec<_>, _>>()?;
            for tooth in &teeth_values {
                pins.push(tick_values.contains(tooth));
            }
        }

        Ok(Grid {
            teeth: melody.distinct_pitches.clone(),
            ticks: melody.ticks.len(),
            pins,
        })
    }

    /// Number of teeth (`pinNrX`)
    pub fn width(&self) -> usize {
        self.teeth.len()
    }

    /// Number of ticks (`pinNrY`)
    pub fn height(&self) -> usize {
        self.ticks
    }

    /// Whether tooth `column` is plucked at tick `row`.
    pub fn is_set(&self, row: usize, column: usize) -> bool {
        column < self.width() && self.pins.get(row * self.width() + column) == Some(&true)
    }

    /// Legend entry for each tooth: letter, octave, then the accidental or a space.
    pub fn teeth_notes(&self) -> String {
        let mut legend = String::with_capacity(self.teeth.len() * 3);
        for note in &self.teeth {
            legend.push(note.name.as_char());
            legend.push_str(&note.octave.to_string());
            legend.push(note.modifier.map_or(' ', |m| m.glyph()));
        }
        legend
    }

    pub fn pin_string(&self) -> String {
        self.pins.iter().map(|&p| if p { 'X' } else { ' ' }).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pinNrX = {};", self.width())?;
        writeln!(f, "pinNrY = {};", self.height())?;
        writeln!(f, "teethNotes=\"{}\";", self.teeth_notes())?;
        write!(f, "pins=\"{}\";", self.pin_string())
    }
}

/// Parse and encode melody text, keeping the error structured.
pub fn encode(input: &str) -> Result<Grid, Error> {
    let melody = parser::parse(input)?;
    Ok(Grid::from_melody(&melody)?)
}

/// Plain text in, plain text out: the grid block on success, otherwise the
/// single-line error message in its place.
pub fn render(input: &str) -> String {
    match encode(input) {
        Ok(grid) => grid.to_string(),
        Err(e) => e.to_string(),
    }
}
