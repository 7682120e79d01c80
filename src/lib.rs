//! Melody notation to music-box pin layouts.
//!
//! Each line of input is one tick; each tick lists the notes struck
//! together, written as a letter, an optional `#` or `b`, and an octave
//! digit:
//!
//! ```
//! let grid = musicbox::render("C4D4\nD4");
//! assert_eq!(grid, "pinNrX = 2;\npinNrY = 2;\nteethNotes=\"C4 D4 \";\npins=\"XX X\";");
//! ```

pub mod error;
pub mod grid;
pub mod instrument;
pub mod note;
pub mod parser;
pub mod player;
pub mod repl;
pub mod synth;

pub use error::{Error, NoteError, ParseError};
pub use grid::{Grid, encode, render};
pub use note::{Letter, Melody, Modifier, Note, Tick, compare_pitch, pitch_to_freq};
pub use parser::{distinct_pitches, parse, parse_line};

/// Absolute pitch value of a note (the MIDI note number).
pub fn pitch_value(note: &Note) -> Result<i32, NoteError> {
    note.pitch_value()
}
