//! lyricsync CLI
//!
//! Prints LRC timelines and follows an MPD server, reporting the active
//! lyric line as playback moves.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use lyricsync::mpd_client::{format_time, MPDClient};
use lyricsync::{ActiveLineChange, Config, LineTracker, LyricLibrary, Player, Timeline};

#[derive(Parser)]
#[command(name = "lyricsync")]
#[command(about = "Time-synchronized lyrics for local playback")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a parsed LRC file
    Show {
        /// LRC file path
        file: PathBuf,

        /// Mark the line active at this playback time (seconds)
        #[arg(long)]
        at: Option<f64>,
    },

    /// Play an LRC file against a simulated clock
    Simulate {
        /// LRC file path
        file: PathBuf,

        /// Clock step in seconds
        #[arg(long, default_value = "0.25")]
        step: f64,

        /// Stop at this time (defaults to just past the last line)
        #[arg(long)]
        until: Option<f64>,
    },

    /// Follow an MPD server and print lyric lines as they become active
    Follow {
        /// Playlist config (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// MPD address
        #[arg(long, default_value = "127.0.0.1:6600")]
        host: String,

        /// Status poll interval in milliseconds
        #[arg(long, default_value = "500")]
        interval_ms: u64,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show { file, at } => show(file, at)?,
        Commands::Simulate { file, step, until } => simulate(file, step, until)?,
        Commands::Follow {
            config,
            host,
            interval_ms,
        } => follow(config, &host, interval_ms)?,
    }

    Ok(())
}

fn load_timeline(file: &Path) -> Result<Timeline> {
    Timeline::from_file(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn show(file: PathBuf, at: Option<f64>) -> Result<()> {
    let timeline = load_timeline(&file)?;
    let active = at.and_then(|t| timeline.active_index(t));

    for (i, line) in timeline.iter().enumerate() {
        let marker = if Some(i) == active { ">" } else { " " };
        println!("{} [{:>6.2}] {}", marker, line.time, line.text);
    }
    if timeline.is_empty() {
        println!("No Lyrics Available");
    }

    Ok(())
}

/// The simulated clock must advance and must have a reachable end.
fn check_clock(step: f64, until: Option<f64>) -> Result<()> {
    anyhow::ensure!(step.is_finite() && step > 0.0, "--step must be positive");
    anyhow::ensure!(until.map_or(true, f64::is_finite), "--until must be a finite time");
    Ok(())
}

fn simulate(file: PathBuf, step: f64, until: Option<f64>) -> Result<()> {
    check_clock(step, until)?;

    let timeline = load_timeline(&file)?;
    let end = until.unwrap_or_else(|| timeline.lines().last().map_or(0.0, |line| line.time + step));
    let mut tracker = LineTracker::new(timeline);

    let mut ticks: u64 = 0;
    loop {
        let time = ticks as f64 * step;
        if time > end {
            break;
        }
        if let Some(change) = tracker.update(time) {
            print_change(&change, tracker.timeline());
        }
        ticks += 1;
    }

    Ok(())
}

fn follow(config: Option<PathBuf>, host: &str, interval_ms: u64) -> Result<()> {
    let path = config
        .or_else(Config::default_path)
        .context("No config path given and no config directory found")?;
    let config = Config::load(&path).with_context(|| format!("Failed to load {}", path.display()))?;

    let client = MPDClient::new(host).with_context(|| format!("Failed to connect to MPD at {}", host))?;
    let mut player = Player::new(config.playlist()?, LyricLibrary::from_config(&config), client);
    info!("Following MPD at {}", host);

    let song = player.current_song();
    println!("-- {} - {}", song.artist, song.title);

    loop {
        let song_id = player.current_song().id.clone();

        let events = match player.backend_mut().poll() {
            Ok(events) => events,
            Err(e) => {
                warn!("MPD status failed: {}", e);
                Vec::new()
            }
        };

        for event in events {
            if let Some(change) = player.handle_event(event) {
                print_change(&change, &player.lyrics().timeline);
            }
        }

        if player.current_song().id != song_id {
            let song = player.current_song();
            println!("-- {} - {}", song.artist, song.title);
        }

        std::thread::sleep(Duration::from_millis(interval_ms));
    }
}

fn print_change(change: &ActiveLineChange, timeline: &Timeline) {
    match change.current.and_then(|i| timeline.get(i)) {
        Some(line) => println!("{:>6} {}", format_time(change.time), line.text),
        None => println!("{:>6} ...", format_time(change.time)),
    }
}
