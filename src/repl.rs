use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use log::{debug, warn};

use crate::instrument::Instrument;
use crate::note::Tick;
use crate::player::{PlaybackError, PlaybackState, Player, tick_pitches};
use crate::synth::{AudioCommand, AudioEngine};

/// Timing and sound for interactive playback
#[derive(Debug, Clone)]
pub struct PlayOptions {
    /// How long each tick's notes are held before release
    pub hold: Duration,
    /// Time from one tick to the next
    pub step: Duration,
    pub instrument: Instrument,
}

impl Default for PlayOptions {
    fn default() -> Self {
        Self {
            hold: Duration::from_millis(1000),
            step: Duration::from_millis(1100),
            instrument: Instrument::default(),
        }
    }
}

/// Playback session: the player state plus the timers that drive it.
struct Session {
    ticks: Vec<Tick>,
    options: PlayOptions,
    player: Player,
    engine: Option<AudioEngine>,
    next_step: Option<Instant>,
    release_at: Option<Instant>,
}

impl Session {
    /// Play/stop button.
    fn toggle(&mut self) -> anyhow::Result<()> {
        match self.player.start(self.ticks.clone(), self.engine.is_some()) {
            Ok(()) => {
                if self.player.is_active() {
                    self.next_step = Some(Instant::now());
                }
                Ok(())
            }
            Err(PlaybackError::AlreadyPlaying) => {
                self.player.stop();
                self.next_step = None;
                self.release_at = None;
                self.send(AudioCommand::AllNotesOff)
            }
        }
    }

    /// Open the audio device if the player is waiting on it.
    fn ensure_engine(&mut self) -> anyhow::Result<()> {
        if self.engine.is_none() && self.player.is_active() {
            let engine = AudioEngine::new(self.options.instrument.clone())?;
            self.engine = Some(engine);
            self.player.loaded();
        }
        Ok(())
    }

    /// Fire whichever timers are due.
    fn poll_timers(&mut self, now: Instant) -> anyhow::Result<()> {
        if self.release_at.is_some_and(|t| t <= now) {
            self.release_at = None;
            self.send(AudioCommand::AllNotesOff)?;
        }

        let playing = matches!(self.player.state(), PlaybackState::Playing(_));
        if playing && self.next_step.is_some_and(|t| t <= now) {
            self.next_step = None;
            if let Some(tick) = self.player.step() {
                let pitches = tick_pitches(&tick)?;
                debug!("tick pitches {:?}", pitches);
                self.send(AudioCommand::ChordOn { pitches })?;
                self.release_at = Some(now + self.options.hold);
                if self.player.is_active() {
                    self.next_step = Some(now + self.options.step);
                }
            }
        }
        Ok(())
    }

    fn send(&self, cmd: AudioCommand) -> anyhow::Result<()> {
        match &self.engine {
            Some(engine) => engine.send(cmd),
            None => Ok(()),
        }
    }
}

/// Run interactive playback of a parsed melody. Space toggles play/stop,
/// Esc or q quits.
pub fn run(ticks: Vec<Tick>, options: PlayOptions) -> anyhow::Result<()> {
    let mut session = Session {
        ticks,
        options,
        player: Player::new(),
        engine: None,
        next_step: None,
        release_at: None,
    };

    let mut stdout = io::stdout();
    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("alternate screen")?;

    print_banner(&mut stdout, session.ticks.len());
    let result = session
        .toggle()
        .and_then(|_| event_loop(&mut session, &mut stdout));

    if let Err(e) = session.send(AudioCommand::Shutdown) {
        warn!("could not silence audio: {}", e);
    }
    std::thread::sleep(Duration::from_millis(20));

    let _ = execute!(stdout, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn event_loop(session: &mut Session, stdout: &mut io::Stdout) -> anyhow::Result<()> {
    loop {
        update_status(stdout, &session.player.state().to_string());
        session.ensure_engine()?;
        session.poll_timers(Instant::now())?;
        update_status(stdout, &session.player.state().to_string());

        if !event::poll(Duration::from_millis(20)).context("event poll error")? {
            continue;
        }

        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event::read().context("event read error")?
        {
            match code {
                KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                KeyCode::Char(' ') => session.toggle()?,
                _ => {}
            }
        }
    }
}

fn print_banner(stdout: &mut io::Stdout, ticks: usize) {
    let banner = format!(
        "\x1b[2J\x1b[H\
musicbox player\r\n\
───────────────\r\n\
\r\n\
  Ticks:       {}\r\n\
  Play/Stop:   Space\r\n\
  Quit:        Esc or q\r\n\
\r\n",
        ticks
    );
    let _ = write!(stdout, "{}", banner);
}

fn update_status(stdout: &mut io::Stdout, status: &str) {
    let _ = write!(stdout, "\x1b[8;1H\x1b[2K  {}\r", status);
    let _ = stdout.flush();
}
