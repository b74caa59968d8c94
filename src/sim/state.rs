//! Progression state and core simulation types
//!
//! Everything the frame loop mutates between ticks lives in [`ProgressionState`].
//! Round parameters are not copied in; the state only remembers which round
//! of the campaign is being played.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cube::{Bounds, Category, Cube};
use crate::audio::Cue;
use crate::consts::*;
use crate::tuning::CategoryMaxes;

/// Current phase of the progression state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Playing a round
    InRound,
    /// A new round or a death is pending and will be handled next tick
    RoundTransition,
    /// Every round of the campaign has been cleared
    Complete,
}

/// Something that happened during a tick, for the frame loop to hand off
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Play a sound cue
    Cue(Cue),
    /// Persist a high score
    ScoreRecorded { score: u64, level: String },
    /// A round was (re)loaded
    RoundStarted { round: usize, name: String },
    /// The player touched an adversary
    PlayerDied { round: usize },
    /// Lives ran out; the campaign restarts from round 0
    GameOver { score: u64 },
    /// The last round was cleared
    CampaignComplete { score: u64 },
}

/// Simulation parameters that are fixed for a whole session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    pub bounds: Bounds,
    pub frame_rate: u32,
    /// Total inflation of the player rectangle when checking spawn candidates
    pub safety_zone: IVec2,
    pub spawn_margin: i32,
    /// Enables round jumps and suppresses high score recording
    pub cheats: bool,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            bounds: Bounds::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            frame_rate: FRAME_RATE,
            safety_zone: IVec2::new(SAFETY_ZONE_X, SAFETY_ZONE_Y),
            spawn_margin: SPAWN_MARGIN,
            cheats: false,
        }
    }
}

/// Live adversary counts, indexed by [`Category::index`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts(pub [u32; 6]);

impl CategoryCounts {
    pub fn get(&self, category: Category) -> u32 {
        category.index().map(|i| self.0[i]).unwrap_or(0)
    }

    pub fn increment(&mut self, category: Category) {
        if let Some(i) = category.index() {
            self.0[i] += 1;
        }
    }

    pub fn decrement(&mut self, category: Category) {
        if let Some(i) = category.index() {
            self.0[i] = self.0[i].saturating_sub(1);
        }
    }

    /// True if `category` can take another cube under `maxes`
    pub fn has_room(&self, category: Category, maxes: &CategoryMaxes) -> bool {
        category.index().is_some() && self.get(category) < maxes.get(category)
    }

    /// Adversary categories with remaining capacity
    pub fn open_categories(&self, maxes: &CategoryMaxes) -> Vec<Category> {
        Category::ADVERSARIES
            .into_iter()
            .filter(|c| self.has_room(*c, maxes))
            .collect()
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}

/// Mutable progression state (round, lives, score, entities)
#[derive(Debug, Clone)]
pub struct ProgressionState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub bounds: Bounds,
    pub rng: Pcg32,
    /// Current round index, `None` before the first round starts
    pub round: Option<usize>,
    pub lives: u32,
    pub max_lives: u32,
    pub score: u64,
    /// Added to the round's base adversary speed
    pub speed_modifier: u32,
    /// Ticks since the round started
    pub frame_counter: u64,
    pub counts: CategoryCounts,
    pub is_new_round: bool,
    pub has_died: bool,
    pub phase: GamePhase,
    pub player: Cube,
    pub adversaries: Vec<Cube>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl ProgressionState {
    /// Fresh state for a campaign with `max_lives`; the first tick starts round 0
    pub fn new(seed: u64, max_lives: u32, bounds: Bounds) -> Self {
        Self {
            seed,
            bounds,
            rng: Pcg32::seed_from_u64(seed),
            round: None,
            lives: max_lives,
            max_lives,
            score: 0,
            speed_modifier: 0,
            frame_counter: 0,
            counts: CategoryCounts::default(),
            is_new_round: true,
            has_died: false,
            phase: GamePhase::RoundTransition,
            player: Cube::player(bounds),
            adversaries: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Round index for display and config lookup (0 before the first round)
    pub fn round_index(&self) -> usize {
        self.round.unwrap_or(0)
    }

    pub fn is_transition_pending(&self) -> bool {
        self.is_new_round || self.has_died
    }

    pub fn is_complete(&self) -> bool {
        self.phase == GamePhase::Complete
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Cheat jump to `round`: forces a transition through the death branch
    /// with enough lives that its decrement cannot exhaust them.
    pub fn jump_to_round(&mut self, round: usize) {
        log::info!("Cheat: jumping to round {}", round);
        self.is_new_round = true;
        self.has_died = true;
        self.lives = CHEAT_LIVES;
        self.round = Some(round);
        self.phase = GamePhase::RoundTransition;
    }
}
