//! InfiniCube - a single-screen cube avoidance game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (cubes, spawning, rounds, lives, score)
//! - `tuning`: Data-driven round and campaign parameters
//! - `settings`: Process-wide settings (screen, frame rate, sound, cheats)
//! - `highscores`: Per-campaign high score lists and their storage
//! - `game`: Frame loop tying the simulation to its collaborators
//! - `renderer`, `audio`, `platform`: Collaborator interfaces plus headless implementations

pub mod audio;
pub mod game;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Game, SessionOutcome};
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::{CampaignConfig, RoundConfig};

/// Game configuration constants
pub mod consts {
    /// Default viewport dimensions
    pub const SCREEN_WIDTH: i32 = 650;
    pub const SCREEN_HEIGHT: i32 = 400;
    /// Default frame rate (ticks per second)
    pub const FRAME_RATE: u32 = 60;

    /// Default safety zone inflation around the player (total, per axis)
    pub const SAFETY_ZONE_X: i32 = 100;
    pub const SAFETY_ZONE_Y: i32 = 100;
    /// Distance from the screen edge kept free when choosing spawn coordinates
    pub const SPAWN_MARGIN: i32 = 10;

    /// Lives granted by a cheat round jump
    pub const CHEAT_LIVES: u32 = 999;
    /// Upper bound on candidate draws in a single spawn attempt
    pub const MAX_SPAWN_ATTEMPTS: u32 = 256;
}

/// Convert a duration in seconds into a whole number of frames.
///
/// Never returns zero so it is always usable as a tick modulus.
#[inline]
pub fn seconds_to_frames(frame_rate: u32, seconds: f32) -> u64 {
    let frames = (frame_rate as f32 * seconds).round();
    if frames.is_finite() && frames >= 1.0 {
        frames as u64
    } else {
        1
    }
}
