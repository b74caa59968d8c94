//! Fixed timestep simulation tick
//!
//! One call to [`tick`] runs, in order: the round transition (if one is
//! pending) or else the steady-state round logic, then input, then movement.

use glam::IVec2;

use super::collision::collides_any;
use super::cube::{Cube, EdgePolicy};
use super::spawn::{spawn_interval, try_spawn};
use super::state::{GameEvent, GamePhase, ProgressionState, SimParams};
use crate::audio::Cue;
use crate::tuning::{CampaignConfig, RoundConfig};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Debug: jump straight to a round (honoured only with cheats on)
    pub jump_to_round: Option<usize>,
}

/// Ticks between speed level increments for `round`
pub fn escalation_interval(round: &RoundConfig, params: &SimParams) -> u64 {
    crate::seconds_to_frames(params.frame_rate, round.seconds_per_level)
}

/// Advance the game by one tick
pub fn tick(state: &mut ProgressionState, campaign: &CampaignConfig, params: &SimParams, input: &TickInput) {
    if state.is_complete() {
        return;
    }

    if state.is_transition_pending() {
        run_transition(state, campaign, params);
        if state.is_complete() {
            return;
        }
    } else if let Some(round) = campaign.round(state.round_index()) {
        run_round(state, round, params);
    }

    let Some(round) = campaign.round(state.round_index()) else {
        return;
    };

    apply_input(state, round, campaign, params, input);
    move_entities(state, round, params);

    if state.is_transition_pending() {
        state.phase = GamePhase::RoundTransition;
    }
}

/// Handle a pending new round or death.
///
/// Order matters: advance, first-round start, death and game over,
/// campaign completion, then load the round.
pub fn run_transition(state: &mut ProgressionState, campaign: &CampaignConfig, params: &SimParams) {
    // Advance after a cleared round (a death takes priority)
    if !state.has_died {
        if let Some(current) = state.round {
            state.emit(GameEvent::Cue(Cue::NextRound));
            state.round = Some(current + 1);
            state.lives += 1;
            log::info!("Round {} cleared, lives now {}", current, state.lives);
        }
    }

    // First-ever round
    let round = *state.round.get_or_insert(0);

    if state.has_died {
        state.emit(GameEvent::Cue(Cue::Loss));
        state.emit(GameEvent::PlayerDied { round });
        if round != 0 {
            state.lives = state.lives.saturating_sub(1);
        }
        log::info!("Died in round {}, {} lives left", round, state.lives);

        if state.lives == 0 {
            let score = state.score;
            log::info!("Game over with score {}", score);
            if !params.cheats {
                let level = level_label(campaign, round);
                state.emit(GameEvent::ScoreRecorded { score, level });
            }
            state.emit(GameEvent::GameOver { score });
            state.round = Some(0);
            state.score = 0;
            state.lives = state.max_lives;
        }
    }

    let round = state.round_index();
    if round > campaign.last_round_index() {
        let score = state.score;
        log::info!("Campaign '{}' complete with score {}", campaign.name, score);
        state.emit(GameEvent::Cue(Cue::Victory));
        if !params.cheats {
            let level = level_label(campaign, campaign.last_round_index());
            state.emit(GameEvent::ScoreRecorded { score, level });
        }
        state.emit(GameEvent::CampaignComplete { score });
        state.phase = GamePhase::Complete;
        state.is_new_round = false;
        state.has_died = false;
        return;
    }

    start_round(state, campaign, round, params);
}

/// Reset per-round state and place a fresh player
fn start_round(state: &mut ProgressionState, campaign: &CampaignConfig, round: usize, params: &SimParams) {
    state.counts = Default::default();
    state.adversaries.clear();
    state.frame_counter = 0;
    state.speed_modifier = 0;
    state.player = Cube::player(params.bounds);
    state.is_new_round = false;
    state.has_died = false;
    state.phase = GamePhase::InRound;

    let name = campaign
        .round(round)
        .map(|r| r.name.clone())
        .unwrap_or_default();
    log::info!("Round #{}: {} ({} lives)", round, name, state.lives);
    state.emit(GameEvent::RoundStarted { round, name });
}

/// Label stored next to a high score for `round`
fn level_label(campaign: &CampaignConfig, round: usize) -> String {
    match campaign.round(round) {
        Some(r) => format!("Round {}: {}", round, r.name),
        None => format!("Round {}", round),
    }
}

/// Steady-state logic for one tick of a round in progress
pub fn run_round(state: &mut ProgressionState, round: &RoundConfig, params: &SimParams) {
    state.frame_counter += 1;

    if state.speed_modifier >= round.max_speed_levels {
        state.is_new_round = true;
    }

    if state.frame_counter % spawn_interval(round, params) == 0 {
        try_spawn(state, round, params);
    }

    if state.frame_counter % escalation_interval(round, params) == 0
        && state.speed_modifier < round.max_speed_levels
    {
        state.speed_modifier += 1;
        log::debug!("Speed level {}/{}", state.speed_modifier, round.max_speed_levels);
    }

    let hit = collides_any(&state.player.rect, state.adversaries.iter().map(|c| &c.rect));
    if let Some(index) = hit {
        log::debug!(
            "Player hit by {} (index {})",
            state.adversaries[index].category.as_str(),
            index
        );
        state.has_died = true;
    }

    if let Some(zones) = &round.score_zones {
        state.score += zones.award(&state.player.rect, params.bounds);
    }
}

/// Per-axis player velocity from held directions.
///
/// Left beats right and down beats up. When both axes are held the speed
/// is approximated as `speed / 2 + 2` horizontally and `speed / 2 + 1`
/// vertically (never above `speed`) rather than scaled by 1/√2.
pub fn player_velocity(input: &TickInput, speed: i32) -> IVec2 {
    let x = if input.left {
        -1
    } else if input.right {
        1
    } else {
        0
    };
    let y = if input.down {
        1
    } else if input.up {
        -1
    } else {
        0
    };

    if x != 0 && y != 0 {
        let half = speed.div_euclid(2);
        IVec2::new(x * (half + 2).min(speed), y * (half + 1).min(speed))
    } else {
        IVec2::new(x * speed, y * speed)
    }
}

fn apply_input(
    state: &mut ProgressionState,
    round: &RoundConfig,
    campaign: &CampaignConfig,
    params: &SimParams,
    input: &TickInput,
) {
    if let Some(target) = input.jump_to_round {
        if !params.cheats {
            log::debug!("Round jump ignored: cheats disabled");
        } else if campaign.round(target).is_none() {
            log::debug!("Round jump ignored: no round {}", target);
        } else {
            state.jump_to_round(target);
        }
    }

    state.player.vel = player_velocity(input, round.player_speed);
}

/// Move every cube one tick and apply the edge policy.
///
/// The player always wraps. Adversaries wrap or are dropped per round, and
/// dropping one frees its category slot.
pub fn move_entities(state: &mut ProgressionState, round: &RoundConfig, params: &SimParams) {
    state.player.advance();
    state.player.wrap_or_remove(params.bounds, true);

    let counts = &mut state.counts;
    state.adversaries.retain_mut(|cube| {
        cube.advance();
        match cube.wrap_or_remove(params.bounds, round.keep_on_screen) {
            EdgePolicy::Keep => true,
            EdgePolicy::Remove => {
                counts.decrement(cube.category);
                false
            }
        }
    });
}
