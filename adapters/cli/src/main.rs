#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Out of Angkorwat headlessly.

use std::path::PathBuf;

use angkor_escape_cli::{Autopilot, GameConfig, Session};
use angkor_escape_core::Phase;
use angkor_escape_world::query;
use anyhow::Result;
use clap::Parser;

/// Command-line arguments; flags override values from the configuration file.
#[derive(Debug, Parser)]
#[command(name = "angkor-escape", about = "Plays Out of Angkorwat with a scripted autopilot")]
struct Args {
    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for maze generation and boss decisions.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of maze columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Number of maze rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Upper bound on simulated ticks.
    #[arg(long)]
    ticks: Option<u64>,
    /// Simulated frames per second.
    #[arg(long)]
    fps: Option<u32>,
    /// Fresh mazes to try after a defeat.
    #[arg(long, default_value_t = 0)]
    retries: u32,
}

impl Args {
    fn resolve(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.session.seed = seed;
        }
        if let Some(columns) = self.columns {
            config.maze.columns = columns;
        }
        if let Some(rows) = self.rows {
            config.maze.rows = rows;
        }
        if let Some(ticks) = self.ticks {
            config.session.max_ticks = ticks;
        }
        if let Some(fps) = self.fps {
            config.session.fps = fps;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Entry point for the Out of Angkorwat command-line interface.
fn main() -> Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let args = Args::parse();
    let config = args.resolve()?;
    let mut session = Session::new(&config);
    let mut autopilot = Autopilot::new(session.frame_duration());
    let report_every = u64::from(config.session.fps);
    let mut retries_left = args.retries;

    log::info!(
        "{}: {}x{} maze, seed {}",
        query::title(session.world()),
        config.maze.columns,
        config.maze.rows,
        config.session.seed
    );

    for _ in 0..config.session.max_ticks {
        let input = autopilot.decide(session.world());
        let frame = session.step(input);

        if frame.tick % report_every == 0 {
            let boss = frame
                .boss
                .as_ref()
                .map_or_else(|| "-".to_owned(), |boss| boss.actor.health.get().to_string());
            log::info!(
                "t={:.1}s {:?} hp {} boss {}",
                frame.now.as_secs_f32(),
                frame.phase,
                session.hp_bar().render(20),
                boss
            );
        }

        if frame.phase == Phase::Defeat && retries_left > 0 {
            retries_left -= 1;
            log::info!("defeated, generating a fresh maze ({retries_left} retries left)");
            session.restart();
            continue;
        }
        if session.is_finished() {
            break;
        }
    }

    let outcome = match session.phase() {
        Phase::Victory => "the boss is defeated",
        Phase::Defeat => "the explorer fell",
        Phase::Maze | Phase::Escaped | Phase::Arena => "time ran out",
    };
    println!(
        "{}: {} after {:.1}s ({} audio cues)",
        query::title(session.world()),
        outcome,
        query::clock(session.world()).as_secs_f32(),
        session.audio().cues_played()
    );
    Ok(())
}
