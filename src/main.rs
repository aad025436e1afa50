//! sandbridge: falling-sand puzzle in the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info, warn};
use sandbridge::app::App;
use sandbridge::config::{self, GameConfig, GravityCurve};
use sandbridge::game::GameController;
use sandbridge::highscores::{FileHighScores, HighScoreStore, MemoryHighScores};
use sandbridge::random::SeededRandomness;
use std::path::PathBuf;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = GameConfig {
        cols: args.cols,
        rows: args.rows,
        tick_interval: GameConfig::interval_for_rate(args.tick_rate),
        gravity: GravityCurve::default(),
    };
    let rng = args
        .seed
        .map_or_else(SeededRandomness::from_entropy, SeededRandomness::from_seed);
    let store = high_score_store(&args);
    let game = GameController::new(config, rng, store).context("invalid game configuration")?;

    let mut app = App::new(game);
    app.run()?;
    Ok(())
}

/// Falling-sand puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "sandbridge",
    version,
    about = "Falling-sand puzzle in the terminal. Pieces land as sand; bridge one colour from wall to wall to clear it.",
    long_about = "sandbridge is a terminal falling-sand puzzle.\n\n\
        Falling pieces turn into coloured sand when they land. Sand trickles down and \
        sideways. Any single-colour region that touches both the left and the right wall \
        is cleared, scoring one point per grain.\n\n\
        CONTROLS:\n  Left/Right h/l  Move     Up k        Rotate    Down j   Soft drop\n  \
        Space/Enter     Hard drop   P        Pause     R        Restart   Q / Esc  Quit"
)]
pub struct Args {
    /// Board width in grains.
    #[arg(long, default_value_t = config::COLS, value_name = "COLS")]
    pub cols: usize,

    /// Board height in grains.
    #[arg(long, default_value_t = config::ROWS, value_name = "ROWS")]
    pub rows: usize,

    /// Simulation ticks per second.
    #[arg(long, default_value_t = config::TICK_RATE_HZ, value_name = "RATE")]
    pub tick_rate: f64,

    /// Seed for piece and sand randomness (reproducible games).
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// High score file. Defaults to $XDG_CONFIG_HOME/sandbridge/highscore.
    #[arg(long, value_name = "FILE")]
    pub high_score_file: Option<PathBuf>,

    /// Keep the high score in memory only.
    #[arg(long)]
    pub no_save: bool,

    /// Write logs to this file. Nothing is logged without it.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace). RUST_LOG overrides it.
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: LevelFilter,
}

/// Logs go to a file: the terminal belongs to the game.
fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    info!("sandbridge {} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn high_score_store(args: &Args) -> Box<dyn HighScoreStore> {
    if args.no_save {
        return Box::new(MemoryHighScores::default());
    }
    if let Some(path) = &args.high_score_file {
        return Box::new(FileHighScores::new(path));
    }
    match FileHighScores::at_default_location() {
        Ok(store) => {
            info!("high score file: {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            warn!("high score will not be saved: {e}");
            Box::new(MemoryHighScores::default())
        }
    }
}
