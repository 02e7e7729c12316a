//! Pixel Raiders - headless runner
//!
//! Plays back-to-back sessions with the demo autopilot and a log renderer,
//! feeding each result into the leaderboard. Typing `q` on stdin quits the
//! process mid-session.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use pixel_raiders::assets::{ShipColor, SpriteSheet};
use pixel_raiders::platform::{
    Autopilot, Clock, FixedRateClock, LogRenderer, QuitSwitch, SessionExit, UnpacedClock,
    run_session,
};
use pixel_raiders::sim::{GameState, PickupEffect};
use pixel_raiders::{HighScores, Result, Ruleset, Settings};

#[derive(Parser, Debug)]
#[command(name = "pixel-raiders", version, about = "Wave-based arcade shooter")]
struct Args {
    /// Ruleset preset: basic or extended (overrides the settings file)
    #[arg(short, long)]
    ruleset: Option<String>,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file with config and ruleset overrides
    #[arg(long)]
    settings: Option<PathBuf>,

    /// JSON leaderboard file, created on first save
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Sessions to play before exiting
    #[arg(long, default_value_t = 1)]
    sessions: u32,

    /// Stop a session after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Run as fast as possible instead of at the configured frame rate
    #[arg(long)]
    unpaced: bool,

    /// Enemy colors, comma separated
    #[arg(long, value_delimiter = ',')]
    palette: Option<Vec<ShipColor>>,

    /// Pickup effect table, comma separated
    #[arg(long, value_delimiter = ',')]
    effects: Option<Vec<PickupEffect>>,
}

fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(name) = &args.ruleset {
        settings.ruleset = Ruleset::from_name(name)?;
    }
    if let Some(palette) = &args.palette {
        settings.ruleset.palette = palette.clone();
    }
    if let Some(effects) = &args.effects {
        settings.ruleset.pickup_effects = effects.clone();
    }
    settings.ruleset.validate()?;
    Ok(settings)
}

fn run(args: Args) -> Result<()> {
    let settings = load_settings(&args)?;
    let sprites = Arc::new(SpriteSheet::builtin(settings.config.alpha_threshold));

    let mut scores = match &args.scores {
        Some(path) => HighScores::load(path)?,
        None => HighScores::new(),
    };

    let mut clock: Box<dyn Clock> = if args.unpaced {
        Box::new(UnpacedClock)
    } else {
        Box::new(FixedRateClock::new())
    };

    let mut input = QuitSwitch::listen_stdin(Autopilot::new());

    log::info!(
        "Pixel Raiders: {} rules, {} session(s)",
        settings.ruleset.name,
        args.sessions
    );

    for session in 0..args.sessions {
        let seed = match args.seed {
            Some(seed) => seed.wrapping_add(session as u64),
            None => rand::random(),
        };
        let mut state = GameState::new(
            settings.config.clone(),
            settings.ruleset.clone(),
            sprites.clone(),
            seed,
        )?;
        log::info!("Session {} starting (seed {seed})", session + 1);

        let exit = run_session(
            &mut state,
            &mut input,
            &mut LogRenderer::new(),
            clock.as_mut(),
            args.max_frames,
        );

        let summary = state.summary();
        match exit {
            SessionExit::Quit => return Ok(()),
            SessionExit::Terminated | SessionExit::FrameLimit => {
                match scores.add_score(summary) {
                    Some(rank) => log::info!("New high score! Rank #{rank}"),
                    None => log::info!("Score {} did not make the board", summary.score),
                }
                println!("{}", serde_json::to_string(&summary)?);
            }
        }
    }

    if let Some(top) = scores.top_score() {
        log::info!("Best score: {top}");
    }
    if let Some(path) = &args.scores {
        scores.save(path)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
