//! Jelly Drop headless runner
//!
//! Drives the fixed-step simulation for a number of frames and reports the
//! outcome. Shapes are steered by the autopilot unless `--manual` is given.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use clap::Parser;
use serde::Serialize;

use jelly_drop::Settings;
use jelly_drop::renderer::{AsciiCanvas, render};
use jelly_drop::sim::{GameEvent, GameState, TickInput, tick};

#[derive(Parser)]
#[command(name = "jelly-drop", version, about = "Soft-body falling block simulation")]
struct Cli {
    /// Number of frames to simulate
    #[arg(long, default_value_t = 3600)]
    ticks: u64,
    /// Seed for the shape sequence
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Disable the autopilot; shapes drop straight down
    #[arg(long)]
    manual: bool,
    /// Print the final board as text
    #[arg(long)]
    board: bool,
    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    score: u64,
    rows_cleared: u32,
    shapes_spawned: u32,
    shapes_locked: u32,
    shapes_on_board: usize,
    particles: usize,
}

/// Settings from `--config`, or defaults when no file is given.
///
/// A file that exists but fails to parse or validate falls back to defaults
/// with a warning.
fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    ensure!(path.is_file(), "Config file {} not found", path.display());
    Ok(Settings::load(path))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref())?;
    let mut state = GameState::new(settings, cli.seed);
    log::info!(
        "Jelly Drop starting: {}x{} board, seed {}, {} ticks",
        settings.board.cols,
        settings.board.rows,
        cli.seed,
        cli.ticks
    );

    let mut input = TickInput {
        idle_mode: !cli.manual,
        ..Default::default()
    };
    let mut summary = Summary {
        seed: cli.seed,
        ..Default::default()
    };

    for _ in 0..cli.ticks {
        tick(&mut state, &input);

        // Clear one-shot inputs after processing
        input.rotate = false;

        for event in state.drain_events() {
            match event {
                GameEvent::ShapeSpawned { .. } => summary.shapes_spawned += 1,
                GameEvent::ShapeLocked { id, kind } => {
                    summary.shapes_locked += 1;
                    log::debug!("Tick {}: {:?} shape {} locked", state.time_ticks, kind, id);
                }
                GameEvent::RowCleared { top, particles } => {
                    log::info!(
                        "Tick {}: cleared band at y={:.0} ({} particles)",
                        state.time_ticks,
                        top,
                        particles
                    );
                }
                GameEvent::ScoreChanged { score, delta } => {
                    log::debug!("Score {} (+{})", score, delta);
                }
            }
        }
    }

    summary.ticks = state.time_ticks;
    summary.score = state.score();
    summary.rows_cleared = state.rows_cleared;
    summary.shapes_on_board = state.shapes.len();
    summary.particles = state.particle_count();
    log::info!("Finished after {} ticks with score {}", summary.ticks, summary.score);

    if cli.board {
        let (cols, rows) = (settings.board.cols as usize, settings.board.rows as usize);
        let mut canvas = AsciiCanvas::new(cols, rows);
        render(&state, &mut canvas);
        println!("{canvas}");
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to encode summary")?;
        println!("{json}");
    } else {
        println!(
            "score {}  rows {}  locked {}/{}  particles {}",
            summary.score,
            summary.rows_cleared,
            summary.shapes_locked,
            summary.shapes_spawned,
            summary.particles
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_is_an_error() {
        assert_eq!(load_settings(None).unwrap(), Settings::default());
        let err = load_settings(Some(Path::new("/nonexistent/jelly-drop.json"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
