use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;

use musicbox::instrument::{self, Instrument};
use musicbox::repl::{self, PlayOptions};
use musicbox::{Melody, encode, parse};

#[derive(Parser)]
#[command(name = "musicbox", about = "Turn melody notation into music-box pin layouts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the pin grid for a melody
    Encode {
        /// Melody file; reads stdin when absent or `-`
        file: Option<PathBuf>,

        /// Write the grid here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show each tick's notes, pitch values and frequencies
    Parse {
        /// Melody file; reads stdin when absent or `-`
        file: Option<PathBuf>,
    },

    /// Play a melody tick by tick (Space toggles, Esc quits)
    Play {
        /// Melody file
        file: PathBuf,

        /// Instrument (.instr) file with envelope and volume
        #[arg(long)]
        instrument: Option<PathBuf>,

        /// How long each tick sounds, in milliseconds
        #[arg(long, default_value_t = 1000)]
        hold_ms: u64,

        /// Time between ticks, in milliseconds
        #[arg(long, default_value_t = 1100)]
        step_ms: u64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let code = match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run(command: Command) -> anyhow::Result<i32> {
    match command {
        Command::Encode { file, output } => {
            let input = read_input(file.as_deref())?;
            // The error message stands in for the grid
            let (text, code) = match encode(&input) {
                Ok(grid) => (grid.to_string(), 0),
                Err(e) => (e.to_string(), 1),
            };
            match output {
                Some(path) => {
                    fs::write(&path, format!("{}\n", text))
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!("wrote {}", path.display());
                }
                None => println!("{}", text),
            }
            Ok(code)
        }
        Command::Parse { file } => {
            let input = read_input(file.as_deref())?;
            match parse(&input) {
                Ok(melody) => {
                    print_melody(&melody)?;
                    Ok(0)
                }
                Err(e) => {
                    println!("{}", e);
                    Ok(1)
                }
            }
        }
        Command::Play {
            file,
            instrument,
            hold_ms,
            step_ms,
        } => {
            let input = read_input(Some(file.as_path()))?;
            let melody = parse(&input)?;
            if melody.ticks.is_empty() {
                return Ok(0);
            }
            let instrument = match instrument {
                Some(path) => instrument::load(&path)?,
                None => Instrument::default(),
            };
            repl::run(
                melody.ticks,
                PlayOptions {
                    hold: Duration::from_millis(hold_ms),
                    step: Duration::from_millis(step_ms),
                    instrument,
                },
            )?;
            Ok(0)
        }
    }
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn print_melody(melody: &Melody) -> anyhow::Result<()> {
    println!("Ticks: {}", melody.ticks.len());
    println!();
    for (i, tick) in melody.ticks.iter().enumerate() {
        if tick.is_empty() {
            println!("  {:>3}  (silence)", i + 1);
            continue;
        }
        let desc = tick
            .iter()
            .map(|n| Ok(format!("{} [{}, {:.1} Hz]", n, n.pitch_value()?, n.to_freq()?)))
            .collect::<Result<Vec<_>, musicbox::NoteError>>()?;
        println!("  {:>3}  {}", i + 1, desc.join("  "));
    }
    println!();
    let legend: Vec<String> = melody.distinct_pitches.iter().map(|n| n.to_string()).collect();
    println!("Distinct pitches ({}): {}", legend.len(), legend.join(" "));
    Ok(())
}
