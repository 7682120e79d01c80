use std::cmp::Ordering;
use std::fmt;

use crate::error::NoteError;

/// Note letters as written in the notation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Letter {
    /// Read a note-name character. Case-insensitive; `H` is the
    /// German spelling of `B`.
    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'A' => Some(Letter::A),
            'B' | 'H' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Accidental raising or lowering a letter by one semitone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Sharp,
    Flat,
}

impl Modifier {
    /// Only `#` and lowercase `b` are accidentals.
    pub fn from_char(c: char) -> Option<Modifier> {
        match c {
            '#' => Some(Modifier::Sharp),
            'b' => Some(Modifier::Flat),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Modifier::Sharp => '#',
            Modifier::Flat => 'b',
        }
    }
}

/// Semitone offset of each spelling relative to C, covering every
/// letter with and without an accidental.
const PITCH_TABLE: [(Letter, Option<Modifier>, i32); 21] = [
    (Letter::A, Some(Modifier::Flat), -4),
    (Letter::A, None, -3),
    (Letter::A, Some(Modifier::Sharp), -2),
    (Letter::B, Some(Modifier::Flat), -2),
    (Letter::B, None, -1),
    (Letter::C, Some(Modifier::Flat), -1),
    (Letter::B, Some(Modifier::Sharp), 0),
    (Letter::C, None, 0),
    (Letter::C, Some(Modifier::Sharp), 1),
    (Letter::D, Some(Modifier::Flat), 1),
    (Letter::D, None, 2),
    (Letter::D, Some(Modifier::Sharp), 3),
    (Letter::E, Some(Modifier::Flat), 3),
    (Letter::E, None, 4),
    (Letter::F, Some(Modifier::Flat), 4),
    (Letter::E, Some(Modifier::Sharp), 5),
    (Letter::F, None, 5),
    (Letter::F, Some(Modifier::Sharp), 6),
    (Letter::G, Some(Modifier::Flat), 6),
    (Letter::G, None, 7),
    (Letter::G, Some(Modifier::Sharp), 8),
];

fn base_offset(name: Letter, modifier: Option<Modifier>) -> Option<i32> {
    PITCH_TABLE
        .iter()
        .find(|(n, m, _)| *n == name && *m == modifier)
        .map(|&(_, _, offset)| offset)
}

/// A single written note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub name: Letter,
    pub modifier: Option<Modifier>,
    pub octave: u8,
}

impl Note {
    pub fn new(name: Letter, modifier: Option<Modifier>, octave: u8) -> Self {
        Self {
            name,
            modifier,
            octave,
        }
    }

    /// Absolute pitch value. Matches the MIDI note number, so C4 = 60.
    pub fn pitch_value(&self) -> Result<i32, NoteError> {
        let offset = base_offset(self.name, self.modifier).ok_or(NoteError::UnknownSpelling {
            name: self.name,
            modifier: self.modifier,
        })?;
        Ok(offset + 12 * (i32::from(self.octave) + 1))
    }

    /// Frequency in Hz of this note's pitch value
    pub fn to_freq(&self) -> Result<f64, NoteError> {
        self.pitch_value().map(pitch_to_freq)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(m) = self.modifier {
            write!(f, "{}", m.glyph())?;
        }
        write!(f, "{}", self.octave)
    }
}

/// Order two notes by pitch. Enharmonic spellings compare equal.
pub fn compare_pitch(a: &Note, b: &Note) -> Result<Ordering, NoteError> {
    Ok(a.pitch_value()?.cmp(&b.pitch_value()?))
}

/// Frequency in Hz of a pitch value (69 = 440 Hz)
pub fn pitch_to_freq(value: i32) -> f64 {
    440.0 * 2.0_f64.powf((f64::from(value) - 69.0) / 12.0)
}

/// Notes sounding together at one time step
pub type Tick = Vec<Note>;

/// A parsed melody: one tick per input line plus every distinct pitch,
/// ascending.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Melody {
    pub ticks: Vec<Tick>,
    pub distinct_pitches: Vec<Note>,
}
