//! Playback state for stepping through a melody one tick at a time.
//!
//! The player only tracks what is left to play. The audio engine and the
//! step timer live with the caller, which drives the transitions:
//!
//! ```text
//! Idle/Stopped --start--> Loading --loaded--> Playing --step*--> Stopped
//!                           |                    |
//!                           +------- stop -------+--> Idle
//! ```

use std::collections::VecDeque;
use std::fmt;

use log::info;
use thiserror::Error;

use crate::error::NoteError;
use crate::note::{Note, Tick};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("playback already in progress")]
    AlreadyPlaying,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    /// Waiting for the audio engine before the first tick
    Loading(VecDeque<Tick>),
    Playing(VecDeque<Tick>),
    /// Reached the end of the melody
    Stopped,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "Idle"),
            PlaybackState::Loading(_) => write!(f, "Loading audio device..."),
            PlaybackState::Playing(rest) => write!(f, "playing... ({})", rest.len()),
            PlaybackState::Stopped => write!(f, "Stopped"),
        }
    }
}

#[derive(Debug, Default)]
pub struct Player {
    state: PlaybackState,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// True while loading or playing.
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            PlaybackState::Loading(_) | PlaybackState::Playing(_)
        )
    }

    /// Queue `ticks` for playback. An empty melody leaves the state alone.
    ///
    /// With `engine_ready` false the player waits in `Loading` until
    /// [`Player::loaded`] is called.
    pub fn start(&mut self, ticks: Vec<Tick>, engine_ready: bool) -> Result<(), PlaybackError> {
        if self.is_active() {
            return Err(PlaybackError::AlreadyPlaying);
        }
        if ticks.is_empty() {
            return Ok(());
        }

        info!("starting playback of {} ticks", ticks.len());
        let queue = VecDeque::from(ticks);
        self.state = if engine_ready {
            PlaybackState::Playing(queue)
        } else {
            PlaybackState::Loading(queue)
        };
        Ok(())
    }

    /// The audio engine is open; move a pending start into `Playing`.
    pub fn loaded(&mut self) {
        if let PlaybackState::Loading(queue) = std::mem::take(&mut self.state) {
            self.state = PlaybackState::Playing(queue);
        }
    }

    /// Cancel playback, discarding remaining ticks. Returns how many were
    /// dropped.
    pub fn stop(&mut self) -> usize {
        let dropped = match std::mem::take(&mut self.state) {
            PlaybackState::Loading(queue) | PlaybackState::Playing(queue) => queue.len(),
            PlaybackState::Idle | PlaybackState::Stopped => 0,
        };
        if dropped > 0 {
            info!("playback cancelled with {} ticks left", dropped);
        }
        dropped
    }

    /// Timer callback: take the next tick to sound. Moves to `Stopped`
    /// after the last one. Returns `None` when not playing.
    pub fn step(&mut self) -> Option<Tick> {
        let PlaybackState::Playing(queue) = &mut self.state else {
            return None;
        };
        let tick = queue.pop_front()?;
        if queue.is_empty() {
            info!("playback finished");
            self.state = PlaybackState::Stopped;
        }
        Some(tick)
    }
}

/// Pitch values to hand the sound generator for one tick.
pub fn tick_pitches(tick: &[Note]) -> Result<Vec<i32>, NoteError> {
    tick.iter().map(Note::pitch_value).collect()
}
