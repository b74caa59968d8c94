//! InfiniCube entry point
//!
//! Loads settings and campaigns, then runs the frame loop with the headless
//! collaborators: a logging renderer and audio sink, and the autopilot input.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use infinicube::audio::LogAudio;
use infinicube::highscores::FileScoreStore;
use infinicube::platform::{Autopilot, FrameClock};
use infinicube::renderer::LogRenderer;
use infinicube::{CampaignConfig, Game, SessionOutcome, Settings};

#[derive(Parser, Debug)]
#[command(name = "infinicube", version, about = "Dodge the cubes, round after round")]
struct Cli {
    /// Settings file (JSON); defaults are used when it is missing
    #[arg(long, default_value = "config/settings.json")]
    settings: PathBuf,

    /// Campaign file (JSON). Repeat to choose between several on a menu
    #[arg(long = "campaign")]
    campaigns: Vec<PathBuf>,

    /// Directory holding one high score file per campaign
    #[arg(long, default_value = "scores")]
    scores_dir: PathBuf,

    /// RNG seed, overrides the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Run as fast as possible instead of at the configured frame rate
    #[arg(long)]
    unpaced: bool,

    /// Enable round jumps (digit keys); scores are not recorded
    #[arg(long)]
    cheats: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.settings);
    settings.cheats |= cli.cheats;

    let campaigns = cli
        .campaigns
        .iter()
        .map(|path| {
            CampaignConfig::from_file(path)
                .with_context(|| format!("loading campaign {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    if campaigns.is_empty() {
        log::info!("No campaign given, playing the built-in one");
    }

    let seed = cli.seed.or(settings.seed).unwrap_or_else(rand::random);
    log::info!(
        "InfiniCube v{} starting (seed {}, {}x{} @ {} fps)",
        env!("CARGO_PKG_VERSION"),
        seed,
        settings.width,
        settings.height,
        settings.frame_rate
    );
    if settings.cheats {
        log::warn!("Cheats enabled: high scores will not be recorded");
    }

    let mut game = Game::new(
        campaigns,
        settings.sim_params(),
        seed,
        LogRenderer::default(),
        LogAudio::new(settings.sound.clone()),
        Autopilot::new(),
        FileScoreStore::new(&cli.scores_dir),
    );
    let mut clock = FrameClock::new(settings.frame_rate, !cli.unpaced);

    match game.run(&mut clock, cli.max_frames) {
        SessionOutcome::Completed { score } => {
            log::info!("Campaign complete! Final score: {}", score);
        }
        SessionOutcome::Quit => log::info!("Quit after {} frames", game.frames()),
        SessionOutcome::FrameLimit => {
            let score = game.state().map(|s| s.score).unwrap_or(0);
            log::info!("Stopped at frame limit with score {}", score);
        }
    }
    Ok(())
}
