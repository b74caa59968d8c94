//! Adversary spawn policy
//!
//! A spawn attempt draws a category uniformly from those still below their
//! round maximum, builds a candidate cube and rejects it if it lands inside
//! the player's safety zone. Rejection restarts from the category draw.

use super::collision::collides;
use super::cube::{Category, Cube, spawn_adversary};
use super::state::{ProgressionState, SimParams};
use crate::consts::MAX_SPAWN_ATTEMPTS;
use crate::tuning::RoundConfig;

/// Result of one spawn attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Spawned(Category),
    /// Every category is at its maximum; nothing changes
    Saturated,
    /// No candidate cleared the safety zone within the attempt budget
    Blocked,
}

/// Ticks between spawn attempts for `round`
pub fn spawn_interval(round: &RoundConfig, params: &SimParams) -> u64 {
    crate::seconds_to_frames(params.frame_rate, round.spawn_rate)
}

/// Try to add one adversary to the active list.
///
/// Drawing uniformly among open categories gives the same distribution as
/// drawing among all six and redrawing on a full one, without the risk of
/// looping forever when none are open.
pub fn try_spawn(state: &mut ProgressionState, round: &RoundConfig, params: &SimParams) -> SpawnOutcome {
    use rand::seq::IndexedRandom;

    let open = state.counts.open_categories(&round.maxes);
    if open.is_empty() {
        log::trace!("Spawn skipped: all categories at capacity");
        return SpawnOutcome::Saturated;
    }

    let speed = round.base_speed + state.speed_modifier as i32;
    let safe_zone = state
        .player
        .rect
        .inflate(params.safety_zone.x, params.safety_zone.y);

    for _ in 0..MAX_SPAWN_ATTEMPTS {
        let Some(&category) = open.choose(&mut state.rng) else {
            break;
        };
        let candidate: Cube =
            spawn_adversary(category, speed, params.bounds, params.spawn_margin, &mut state.rng);

        if collides(&safe_zone, &candidate.rect) {
            continue;
        }

        log::debug!(
            "Spawned {} at ({}, {}) speed {}",
            category.as_str(),
            candidate.rect.pos.x,
            candidate.rect.pos.y,
            speed
        );
        state.counts.increment(category);
        state.adversaries.push(candidate);
        return SpawnOutcome::Spawned(category);
    }

    log::debug!("Spawn blocked: no candidate cleared the safety zone");
    SpawnOutcome::Blocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::cube::Bounds;
    use crate::sim::state::CategoryCounts;
    use crate::tuning::{CampaignConfig, CategoryMaxes};
    use glam::IVec2;
    use proptest::prelude::*;

    fn round_with(maxes: [u32; 6]) -> RoundConfig {
        RoundConfig {
            maxes: CategoryMaxes(maxes),
            ..CampaignConfig::builtin().rounds[0].clone()
        }
    }

    fn state(seed: u64, params: &SimParams) -> ProgressionState {
        let mut state = ProgressionState::new(seed, 3, params.bounds);
        state.round = Some(0);
        state
    }

    #[test]
    fn test_spawn_increments_count() {
        let params = SimParams::default();
        let round = round_with([1, 1, 1, 1, 1, 1]);
        let mut state = state(5, &params);

        let SpawnOutcome::Spawned(category) = try_spawn(&mut state, &round, &params) else {
            panic!("expected a spawn");
        };
        assert_eq!(state.counts.get(category), 1);
        assert_eq!(state.adversaries.len(), 1);
        assert_eq!(state.adversaries[0].category, category);
    }

    #[test]
    fn test_saturated_spawn_is_noop() {
        let params = SimParams::default();
        let round = round_with([1, 1, 1, 1, 1, 1]);
        let mut state = state(5, &params);
        for _ in 0..6 {
            assert!(matches!(try_spawn(&mut state, &round, &params), SpawnOutcome::Spawned(_)));
        }
        assert_eq!(state.counts, CategoryCounts([1; 6]));

        let adversaries = state.adversaries.clone();
        let counts = state.counts;
        let rng = state.rng.clone();
        assert_eq!(try_spawn(&mut state, &round, &params), SpawnOutcome::Saturated);
        assert_eq!(state.adversaries, adversaries);
        assert_eq!(state.counts, counts);
        assert_eq!(state.rng, rng);
    }

    #[test]
    fn test_zero_maxes_never_spawn() {
        let params = SimParams::default();
        let round = round_with([0; 6]);
        let mut state = state(9, &params);
        assert_eq!(try_spawn(&mut state, &round, &params), SpawnOutcome::Saturated);
        assert!(state.adversaries.is_empty());
    }

    #[test]
    fn test_single_open_category_is_selected() {
        let params = SimParams::default();
        let round = round_with([0, 0, 0, 0, 3, 0]);
        let mut state = state(21, &params);
        for _ in 0..3 {
            assert_eq!(
                try_spawn(&mut state, &round, &params),
                SpawnOutcome::Spawned(Category::Diagonal)
            );
        }
        assert_eq!(try_spawn(&mut state, &round, &params), SpawnOutcome::Saturated);
    }

    #[test]
    fn test_blocked_when_safety_zone_covers_screen() {
        let params = SimParams {
            safety_zone: IVec2::new(2000, 2000),
            ..SimParams::default()
        };
        let round = round_with([2; 6]);
        let mut state = state(1, &params);
        assert_eq!(try_spawn(&mut state, &round, &params), SpawnOutcome::Blocked);
        assert_eq!(state.counts.total(), 0);
        assert!(state.adversaries.is_empty());
    }

    #[test]
    fn test_spawn_speed_includes_modifier() {
        let params = SimParams::default();
        let round = RoundConfig {
            base_speed: 2,
            ..round_with([1, 0, 0, 0, 0, 0])
        };
        let mut state = state(2, &params);
        state.speed_modifier = 3;
        try_spawn(&mut state, &round, &params);
        assert_eq!(state.adversaries[0].vel, IVec2::new(5, 0));
    }

    #[test]
    fn test_spawn_interval_frames() {
        let params = SimParams {
            frame_rate: 60,
            ..SimParams::default()
        };
        let round = RoundConfig {
            spawn_rate: 0.5,
            ..round_with([1; 6])
        };
        assert_eq!(spawn_interval(&round, &params), 30);
    }

    proptest! {
        #[test]
        fn prop_spawns_respect_caps_and_safety_zone(
            seed in any::<u64>(),
            maxes in prop::array::uniform6(0u32..4),
            player_x in 0i32..630,
            player_y in 0i32..380,
        ) {
            let params = SimParams::default();
            let round = round_with(maxes);
            let mut state = state(seed, &params);
            state.player.rect.pos = IVec2::new(player_x, player_y);
            let safe_zone = state.player.rect.inflate(params.safety_zone.x, params.safety_zone.y);

            for _ in 0..30 {
                let before = state.adversaries.len();
                try_spawn(&mut state, &round, &params);
                for category in Category::ADVERSARIES {
                    prop_assert!(state.counts.get(category) <= round.maxes.get(category));
                    let live = state.adversaries.iter().filter(|c| c.category == category).count();
                    prop_assert_eq!(live as u32, state.counts.get(category));
                }
                for cube in &state.adversaries[before..] {
                    prop_assert!(!collides(&safe_zone, &cube.rect));
                }
            }
        }
    }

    #[test]
    fn test_bounds_used_for_candidates() {
        let params = SimParams {
            bounds: Bounds::new(300, 200),
            safety_zone: IVec2::ZERO,
            ..SimParams::default()
        };
        let round = round_with([0, 0, 0, 0, 0, 5]);
        let mut state = ProgressionState::new(4, 3, params.bounds);
        for _ in 0..5 {
            try_spawn(&mut state, &round, &params);
        }
        assert!(state.adversaries.iter().all(|c| !c.is_off_screen(params.bounds)));
    }
}
