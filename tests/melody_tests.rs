//! End-to-end checks of melody text through to the pin grid.

use std::io::Write;

use musicbox::{
    Letter, Modifier, Note, NoteError, compare_pitch, encode, instrument, parse, pitch_value,
    render,
};
use pretty_assertions::assert_eq;

/// Rebuild notation from a legend: each 3-char entry becomes one
/// `<letter><accidental><octave>` line.
fn notation_from_legend(legend: &str) -> String {
    let chars: Vec<char> = legend.chars().collect();
    chars
        .chunks(3)
        .map(|entry| {
            let accidental = if entry[2] == ' ' {
                String::new()
            } else {
                entry[2].to_string()
            };
            format!("{}{}{}", entry[0], accidental, entry[1])
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_examples_from_readme() {
    assert_eq!(
        render("C4"),
        "pinNrX = 1;\npinNrY = 1;\nteethNotes=\"C4 \";\npins=\"X\";"
    );
    assert_eq!(
        render("C4D4\nD4"),
        "pinNrX = 2;\npinNrY = 2;\nteethNotes=\"C4 D4 \";\npins=\"XX X\";"
    );
    assert_eq!(
        render("A#3\nBb3"),
        "pinNrX = 1;\npinNrY = 2;\nteethNotes=\"A3#\";\npins=\"XX\";"
    );
}

#[test]
fn test_h_is_b() {
    let h = parse("H4").unwrap();
    let b = parse("B4").unwrap();
    assert_eq!(h, b);
    // letters below C sit under that octave's C
    assert_eq!(pitch_value(&h.ticks[0][0]), Ok(59));
}

#[test]
fn test_errors_name_the_character() {
    let err = parse("X4").unwrap_err();
    assert_eq!(
        err.source,
        NoteError::InvalidNoteName {
            found: 'X',
            position: 1
        }
    );

    let err = parse("C").unwrap_err();
    assert_eq!(
        err.source,
        NoteError::InvalidOctave {
            found: None,
            position: 2
        }
    );
}

#[test]
fn test_error_on_later_line_discards_everything() {
    assert_eq!(
        render("C4\nE4\nG4\nZ"),
        "line 4: unexpected note name 'Z' at column 1"
    );
}

#[test]
fn test_legend_reparses_to_same_pitches() {
    let text = "C4 E4 G4\nBb3\nA#3 D5\n\nF#4 Gb4\ncb5";
    let melody = parse(text).unwrap();
    let grid = encode(text).unwrap();

    let reparsed = parse(&notation_from_legend(&grid.teeth_notes())).unwrap();
    assert_eq!(reparsed.distinct_pitches, melody.distinct_pitches);
}

#[test]
fn test_legend_is_strictly_ascending() {
    let melody = parse("G5 C2\nE#4 F4 Fb4 E4\nB#3 C4 Cb4 H3\nd#6").unwrap();
    let values: Vec<i32> = melody
        .distinct_pitches
        .iter()
        .map(|n| pitch_value(n).unwrap())
        .collect();
    assert!(values.windows(2).all(|w| w[0] < w[1]), "{values:?}");
    assert_eq!(values, vec![36, 47, 48, 59, 60, 64, 65, 79, 87]);
}

#[test]
fn test_grid_shape() {
    for text in ["", "\n", "C4", "C4\n\n\nD4E4F4", "Ab1 G#1 A1"] {
        let grid = encode(text).unwrap();
        assert_eq!(grid.pins.len(), grid.width() * grid.height(), "{text:?}");
        assert_eq!(grid.height(), text.split('\n').count());
    }
}

#[test]
fn test_enharmonic_pins_match_either_spelling() {
    let grid = encode("Db4\nC#4 F4\nF4").unwrap();
    assert_eq!(grid.teeth_notes(), "D4bF4 ");
    assert_eq!(grid.pin_string(), "X XX X");
}

#[test]
fn test_compare_pitch_spellings() {
    let a_sharp = Note::new(Letter::A, Some(Modifier::Sharp), 3);
    let b_flat = Note::new(Letter::B, Some(Modifier::Flat), 3);
    assert_eq!(compare_pitch(&a_sharp, &b_flat), Ok(std::cmp::Ordering::Equal));
}

#[test]
fn test_instrument_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# music box tine").unwrap();
    writeln!(file, "attack: 0.002").unwrap();
    writeln!(file, "release: 0.8").unwrap();
    let instr = instrument::load(file.path()).unwrap();
    assert_eq!(instr.attack, 0.002);
    assert_eq!(instr.release, 0.8);

    let missing = instrument::load(std::path::Path::new("/nonexistent/box.instr"));
    assert!(missing.is_err());
}
