//! Instrument definitions loaded from `.instr` files.
//!
//! An instrument file sets the envelope and loudness the synth uses when a
//! tick's notes are struck.

use std::fs;
use std::path::Path;

use anyhow::Context;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstrumentError {
    #[error("unknown key '{key}' at line {line}")]
    UnknownKey { key: String, line: usize },

    #[error("invalid value '{value}' for '{key}' at line {line}")]
    InvalidValue {
        key: String,
        value: String,
        line: usize,
    },
}

/// Envelope (ADSR) and output level for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    /// Attack time in seconds (0 → peak)
    pub attack: f64,
    /// Decay time in seconds (peak → sustain level)
    pub decay: f64,
    /// Sustain level (0.0..=1.0) while the note is held
    pub sustain: f64,
    /// Release time in seconds after the note is let go
    pub release: f64,
    /// Master volume (0.0..=1.0)
    pub volume: f64,
}

impl Default for Instrument {
    fn default() -> Self {
        Self {
            attack: 0.005,
            decay: 0.3,
            sustain: 0.4,
            release: 0.25,
            volume: 1.0,
        }
    }
}

/// Split a "key: value" line. Blank lines and `#` comments yield None.
fn split_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = trimmed.split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// Parse instrument text.
///
/// Format (one per line, optional comments with #):
/// ```text
/// # envelope times in seconds, sustain and volume 0..1
/// attack: 0.01
/// decay: 0.1
/// sustain: 0.7
/// release: 0.25
/// volume: 0.8
/// ```
pub fn parse(content: &str) -> Result<Instrument, InstrumentError> {
    let mut instrument = Instrument::default();

    for (line_idx, line) in content.lines().enumerate() {
        let Some((key, raw)) = split_line(line) else {
            continue;
        };
        let value: f64 = raw.parse().map_err(|_| InstrumentError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            line: line_idx + 1,
        })?;
        match key {
            "attack" => instrument.attack = value.max(0.0),
            "decay" => instrument.decay = value.max(0.0),
            "sustain" => instrument.sustain = value.clamp(0.0, 1.0),
            "release" => instrument.release = value.max(0.0),
            "volume" => instrument.volume = value.clamp(0.0, 1.0),
            _ => {
                return Err(InstrumentError::UnknownKey {
                    key: key.to_string(),
                    line: line_idx + 1,
                });
            }
        }
    }

    Ok(instrument)
}

/// Load an instrument from a `.instr` file.
pub fn load(path: &Path) -> anyhow::Result<Instrument> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading instrument file {}", path.display()))?;
    parse(&content).with_context(|| format!("in instrument file {}", path.display()))
}
