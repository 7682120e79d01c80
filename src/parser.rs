use log::debug;

use crate::error::{NoteError, ParseError};
use crate::note::{Letter, Melody, Modifier, Note, Tick};

/// Parse melody text into a Melody.
///
/// Every `\n`-separated line becomes one tick, blank lines included. The
/// first bad line aborts the whole parse.
pub fn parse(input: &str) -> Result<Melody, ParseError> {
    let mut ticks: Vec<Tick> = Vec::new();
    let mut keyed: Vec<(i32, Note)> = Vec::new();

    for (line_idx, line) in input.split('\n').enumerate() {
        let line_num = line_idx + 1;
        let tick = parse_line(line).map_err(|source| ParseError {
            line: line_num,
            source,
        })?;
        for note in &tick {
            let value = note.pitch_value().map_err(|source| ParseError {
                line: line_num,
                source,
            })?;
            keyed.push((value, *note));
        }
        ticks.push(tick);
    }

    let distinct_pitches = dedupe_keyed(keyed);
    debug!(
        "parsed {} ticks, {} distinct pitches",
        ticks.len(),
        distinct_pitches.len()
    );

    Ok(Melody {
        ticks,
        distinct_pitches,
    })
}

/// Parse one line into the notes it sounds together.
///
/// Spaces and carriage returns are ignored. Each note is a letter, an
/// optional `#` or `b`, then a single octave digit.
pub fn parse_line(line: &str) -> Result<Tick, NoteError> {
    let mut notes = Vec::new();
    let mut chars = line.chars().filter(|c| *c != ' ' && *c != '\r').peekable();
    let mut column = 0;

    while let Some(c) = chars.next() {
        column += 1;
        let name = Letter::from_char(c).ok_or(NoteError::InvalidNoteName {
            found: c,
            position: column,
        })?;

        let modifier = chars.peek().copied().and_then(Modifier::from_char);
        if modifier.is_some() {
            chars.next();
            column += 1;
        }

        let found = chars.next();
        column += 1;
        let octave = found
            .and_then(|c| c.to_digit(10))
            .ok_or(NoteError::InvalidOctave {
                found,
                position: column,
            })?;

        notes.push(Note::new(name, modifier, octave as u8));
    }

    Ok(notes)
}

/// Sort notes by pitch and keep one spelling per pitch value.
///
/// The sort is stable, so among enharmonic spellings the one met first in
/// `notes` survives.
pub fn distinct_pitches(notes: &[Note]) -> Result<Vec<Note>, NoteError> {
    let keyed = notes
        .iter()
        .map(|n| n.pitch_value().map(|v| (v, *n)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(dedupe_keyed(keyed))
}

fn dedupe_keyed(mut keyed: Vec<(i32, Note)>) -> Vec<Note> {
    keyed.sort_by_key(|(value, _)| *value);
    keyed.dedup_by_key(|(value, _)| *value);
    keyed.into_iter().map(|(_, note)| note).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn n(name: Letter, modifier: Option<Modifier>, octave: u8) -> Note {
        Note::new(name, modifier, octave)
    }

    #[test]
    fn test_parse_line_naturals() {
        let tick = parse_line("C4D4").unwrap();
        assert_eq!(tick, vec![n(Letter::C, None, 4), n(Letter::D, None, 4)]);
    }

    #[test]
    fn test_parse_line_modifiers_and_spaces() {
        let tick = parse_line(" A#3 bb2  e5\r").unwrap();
        assert_eq!(
            tick,
            vec![
                n(Letter::A, Some(Modifier::Sharp), 3),
                n(Letter::B, Some(Modifier::Flat), 2),
                n(Letter::E, None, 5),
            ]
        );
    }

    #[test]
    fn test_parse_line_h_alias() {
        assert_eq!(parse_line("H4").unwrap(), parse_line("B4").unwrap());
    }

    #[test]
    fn test_parse_line_empty() {
        assert!(parse_line("").unwrap().is_empty());
        assert!(parse_line("   \r").unwrap().is_empty());
    }

    #[test]
    fn test_uppercase_b_is_not_a_flat() {
        let err = parse_line("CB4").unwrap_err();
        assert_eq!(
            err,
            NoteError::InvalidOctave {
                found: Some('B'),
                position: 2
            }
        );
    }

    #[test]
    fn test_invalid_note_name() {
        let err = parse_line("C4X4").unwrap_err();
        assert_eq!(
            err,
            NoteError::InvalidNoteName {
                found: 'X',
                position: 3
            }
        );
    }

    #[test]
    fn test_missing_octave() {
        let err = parse_line("C4D#").unwrap_err();
        assert_eq!(
            err,
            NoteError::InvalidOctave {
                found: None,
                position: 5
            }
        );
    }

    #[test]
    fn test_tab_is_not_stripped() {
        let err = parse_line("C4\tD4").unwrap_err();
        assert_eq!(
            err,
            NoteError::InvalidNoteName {
                found: '\t',
                position: 3
            }
        );
    }

    #[test]
    fn test_parse_counts_every_line() {
        let melody = parse("C4\n\nE4\n").unwrap();
        assert_eq!(melody.ticks.len(), 4);
        assert!(melody.ticks[1].is_empty());
        assert!(melody.ticks[3].is_empty());
    }

    #[test]
    fn test_parse_reports_line() {
        let err = parse("C4\nD4\nQ4").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.to_string(), "line 3: unexpected note name 'Q' at column 1");
    }

    #[test]
    fn test_distinct_sorted_and_deduped() {
        let melody = parse("G4C4\nE4C4\nC5").unwrap();
        let names: Vec<String> = melody
            .distinct_pitches
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["C4", "E4", "G4", "C5"]);
    }

    #[test]
    fn test_enharmonic_first_spelling_survives() {
        let melody = parse("Bb3\nA#3").unwrap();
        assert_eq!(
            melody.distinct_pitches,
            vec![n(Letter::B, Some(Modifier::Flat), 3)]
        );

        let melody = parse("A#3\nBb3").unwrap();
        assert_eq!(
            melody.distinct_pitches,
            vec![n(Letter::A, Some(Modifier::Sharp), 3)]
        );
    }

    #[test]
    fn test_distinct_pitches_empty() {
        assert!(distinct_pitches(&[]).unwrap().is_empty());
    }
}
