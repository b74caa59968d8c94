//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` per frame)
//! - Seeded RNG only
//! - Stable iteration order (active list order)
//! - No rendering, audio or platform calls; side effects leave as `GameEvent`s

pub mod collision;
pub mod cube;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod zones;

pub use collision::{Rect, collides, collides_any};
pub use cube::{Bounds, Category, Cube, EdgePolicy, spawn_adversary};
pub use spawn::{SpawnOutcome, spawn_interval, try_spawn};
pub use state::{CategoryCounts, GameEvent, GamePhase, ProgressionState, SimParams};
pub use tick::{TickInput, escalation_interval, player_velocity, tick};
pub use zones::{ScoreZones, Zone};
