use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::mpsc;

use anyhow::{Context, anyhow};
use log::{error, info};

use crate::instrument::Instrument;
use crate::note::pitch_to_freq;

/// A command sent to the audio callback
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    /// Strike every pitch of one tick together
    ChordOn { pitches: Vec<i32> },
    /// Release everything that is sounding
    AllNotesOff,
    /// Silence immediately and drop all voices
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stage {
    Attack,
    Decay,
    Sustain,
    Release,
    Done,
}

#[derive(Debug, Clone)]
struct Voice {
    freq: f64,
    phase: f64,
    stage: Stage,
    level: f64,
}

impl Voice {
    fn new(freq: f64) -> Self {
        Self {
            freq,
            phase: 0.0,
            stage: Stage::Attack,
            level: 0.0,
        }
    }

    fn release(&mut self) {
        if self.stage != Stage::Done {
            self.stage = Stage::Release;
        }
    }

    /// Advance the envelope by `dt` seconds and return the new level.
    fn advance(&mut self, instr: &Instrument, dt: f64) -> f64 {
        match self.stage {
            Stage::Attack => {
                self.level = if instr.attack > 0.0 {
                    self.level + dt / instr.attack
                } else {
                    1.0
                };
                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = Stage::Decay;
                }
            }
            Stage::Decay => {
                self.level = if instr.decay > 0.0 {
                    self.level - (1.0 - instr.sustain) * dt / instr.decay
                } else {
                    instr.sustain
                };
                if self.level <= instr.sustain {
                    self.level = instr.sustain;
                    self.stage = Stage::Sustain;
                }
            }
            Stage::Sustain => {}
            Stage::Release => {
                self.level = if instr.release > 0.0 {
                    self.level - dt / instr.release
                } else {
                    0.0
                };
                if self.level <= 0.0 {
                    self.level = 0.0;
                    self.stage = Stage::Done;
                }
            }
            Stage::Done => {}
        }
        self.level
    }
}

/// Voice bank mixed inside the audio callback.
struct Mixer {
    instrument: Instrument,
    sample_rate: f64,
    voices: Vec<Voice>,
}

impl Mixer {
    fn apply(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::ChordOn { pitches } => {
                for v in &mut self.voices {
                    v.release();
                }
                self.voices
                    .extend(pitches.into_iter().map(|p| Voice::new(pitch_to_freq(p))));
            }
            AudioCommand::AllNotesOff => {
                for v in &mut self.voices {
                    v.release();
                }
            }
            AudioCommand::Shutdown => self.voices.clear(),
        }
    }

    fn next_sample(&mut self) -> f32 {
        let dt = 1.0 / self.sample_rate;
        let mut value = 0.0_f64;
        for v in &mut self.voices {
            let level = v.advance(&self.instrument, dt);
            value += v.phase.sin() * level;
            v.phase += 2.0 * std::f64::consts::PI * v.freq * dt;
            if v.phase > 2.0 * std::f64::consts::PI {
                v.phase -= 2.0 * std::f64::consts::PI;
            }
        }
        self.voices.retain(|v| v.stage != Stage::Done);
        (value * 0.2 * self.instrument.volume).clamp(-1.0, 1.0) as f32
    }
}

/// Handle to a running output stream on the default device
pub struct AudioEngine {
    tx: mpsc::Sender<AudioCommand>,
    _stream: cpal::Stream,
}

impl AudioEngine {
    pub fn new(instrument: Instrument) -> anyhow::Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no output audio device available"))?;

        let config = device
            .default_output_config()
            .context("failed to get default output config")?;

        let sample_rate = config.sample_rate() as f64;
        let channels = usize::from(config.channels()).max(1);
        info!("audio output: {} Hz, {} channels", sample_rate, channels);

        let (tx, rx) = mpsc::channel::<AudioCommand>();
        let mut mixer = Mixer {
            instrument,
            sample_rate,
            voices: Vec::new(),
        };

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    while let Ok(cmd) = rx.try_recv() {
                        mixer.apply(cmd);
                    }
                    for frame in data.chunks_mut(channels) {
                        let sample = mixer.next_sample();
                        frame.fill(sample);
                    }
                },
                move |err| {
                    error!("audio stream error: {}", err);
                },
                None,
            )
            .context("failed to build output stream")?;

        stream.play().context("failed to play stream")?;

        Ok(Self {
            tx,
            _stream: stream,
        })
    }

    pub fn send(&self, cmd: AudioCommand) -> anyhow::Result<()> {
        self.tx
            .send(cmd)
            .map_err(|_| anyhow!("audio thread disconnected"))
    }
}
