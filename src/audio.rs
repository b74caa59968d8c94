//! Audio cues
//!
//! Cues are fire-and-forget: [`Audio::play`] returns immediately and the
//! simulation never waits for a cue to finish before applying a transition.

use serde::{Deserialize, Serialize};

use crate::settings::SoundSettings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Round cleared, next round starting
    NextRound,
    /// Player hit an adversary
    Loss,
    /// Campaign completed
    Victory,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::NextRound => "NextRound",
            Cue::Loss => "Loss",
            Cue::Victory => "Victory",
        }
    }
}

/// Audio collaborator
pub trait Audio {
    /// Start playing `cue` without blocking
    fn play(&mut self, cue: Cue);
}

/// Headless audio: resolves cues to their sound files and logs them
#[derive(Debug, Clone)]
pub struct LogAudio {
    sound: SoundSettings,
    master_volume: f32,
    muted: bool,
}

impl LogAudio {
    pub fn new(sound: SoundSettings) -> Self {
        let master_volume = sound.volume.clamp(0.0, 1.0);
        let muted = sound.muted;
        log::info!(
            "Audio: theme {} at volume {:.2}{}",
            sound.path_for_theme().display(),
            master_volume,
            if muted { " (muted)" } else { "" }
        );
        Self {
            sound,
            master_volume,
            muted,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }
}

impl Audio for LogAudio {
    fn play(&mut self, cue: Cue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        log::info!(
            "Cue {} -> {} (volume {:.2})",
            cue.as_str(),
            self.sound.path_for(cue).display(),
            vol
        );
    }
}

/// Records every cue it is asked to play
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub played: Vec<Cue>,
}

impl Audio for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        self.played.push(cue);
    }
}
