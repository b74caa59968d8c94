//! Game settings
//!
//! Process-wide values that do not change between rounds: screen size,
//! frame rate, spawn safety zone, sound files and the cheat switch.
//! Loaded from a JSON file; missing or unreadable files fall back to defaults.

use std::path::{Path, PathBuf};

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::audio::Cue;
use crate::consts::*;
use crate::sim::cube::Bounds;
use crate::sim::state::SimParams;

/// Sound file names and levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundSettings {
    /// Folder holding the sound files
    pub folder: PathBuf,
    /// Looping background music
    pub theme: String,
    pub next_round: String,
    pub loss: String,
    pub victory: String,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    pub muted: bool,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("sounds"),
            theme: "theme.ogg".to_string(),
            next_round: "next_round.wav".to_string(),
            loss: "loss.wav".to_string(),
            victory: "victory.wav".to_string(),
            volume: 0.8,
            muted: false,
        }
    }
}

impl SoundSettings {
    pub fn path_for(&self, cue: Cue) -> PathBuf {
        let file = match cue {
            Cue::NextRound => &self.next_round,
            Cue::Loss => &self.loss,
            Cue::Victory => &self.victory,
        };
        self.folder.join(file)
    }

    pub fn path_for_theme(&self) -> PathBuf {
        self.folder.join(&self.theme)
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Graphics ===
    pub width: i32,
    pub height: i32,

    // === Gameplay ===
    /// Ticks per second
    pub frame_rate: u32,
    /// Total inflation of the player rectangle when placing new cubes
    pub safety_zone_x: i32,
    pub safety_zone_y: i32,
    /// Distance from the edges kept free when choosing spawn coordinates
    pub spawn_margin: i32,
    /// Debug round jumps; scores are not recorded while enabled
    pub cheats: bool,
    /// Fixed RNG seed, random when absent
    pub seed: Option<u64>,

    // === Audio ===
    pub sound: SoundSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            frame_rate: FRAME_RATE,
            safety_zone_x: SAFETY_ZONE_X,
            safety_zone_y: SAFETY_ZONE_Y,
            spawn_margin: SPAWN_MARGIN,
            cheats: false,
            seed: None,
            sound: SoundSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No settings at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Malformed settings in {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp values the simulation cannot work with
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.width <= 0 || self.height <= 0 {
            log::warn!("Invalid screen size {}x{}, using default", self.width, self.height);
            self.width = defaults.width;
            self.height = defaults.height;
        }
        if self.frame_rate == 0 {
            log::warn!("Frame rate must be positive, using default");
            self.frame_rate = defaults.frame_rate;
        }
        self.safety_zone_x = self.safety_zone_x.max(0);
        self.safety_zone_y = self.safety_zone_y.max(0);
        self.spawn_margin = self.spawn_margin.max(0);
        self.sound.volume = self.sound.volume.clamp(0.0, 1.0);
        self
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Session parameters for the simulation
    pub fn sim_params(&self) -> SimParams {
        SimParams {
            bounds: self.bounds(),
            frame_rate: self.frame_rate,
            safety_zone: IVec2::new(self.safety_zone_x, self.safety_zone_y),
            spawn_margin: self.spawn_margin,
            cheats: self.cheats,
        }
    }
}
