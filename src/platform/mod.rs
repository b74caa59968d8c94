//! Platform abstraction layer
//!
//! Handles the parts of the frame loop that touch the outside world:
//! - Input (held keys, quit requests)
//! - Frame pacing

use std::collections::HashSet;
use std::time::{Duration, Instant};

use glam::IVec2;

use crate::sim::state::ProgressionState;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Escape,
    /// Number row key 0-9
    Digit(u8),
}

/// Input collaborator
pub trait Input {
    /// Refresh key state. `view` is the running game, `None` while in the menu.
    fn pump(&mut self, view: Option<&ProgressionState>);
    fn is_key_held(&self, key: Key) -> bool;
    /// Window closed or the process was asked to stop
    fn quit_requested(&self) -> bool;
}

/// Replays a fixed list of held-key frames, then holds nothing
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Vec<Vec<Key>>,
    cursor: usize,
    held: HashSet<Key>,
    /// Request quit once this many frames have been pumped
    quit_after: Option<usize>,
}

impl ScriptedInput {
    pub fn new(frames: Vec<Vec<Key>>) -> Self {
        Self {
            frames,
            ..Default::default()
        }
    }

    pub fn quit_after(mut self, frames: usize) -> Self {
        self.quit_after = Some(frames);
        self
    }
}

impl Input for ScriptedInput {
    fn pump(&mut self, _view: Option<&ProgressionState>) {
        self.held = self
            .frames
            .get(self.cursor)
            .map(|keys| keys.iter().copied().collect())
            .unwrap_or_default();
        self.cursor += 1;
    }

    fn is_key_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn quit_requested(&self) -> bool {
        self.quit_after.is_some_and(|n| self.cursor > n)
    }
}

/// Idle/demo mode: steers the player away from the closest threat and
/// otherwise drifts back toward the centre of the screen.
#[derive(Debug)]
pub struct Autopilot {
    held: HashSet<Key>,
    /// Pixels within which an adversary counts as a threat
    pub threat_radius: i32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            threat_radius: 90,
        }
    }

    fn steer(&mut self, state: &ProgressionState) {
        let me = state.player.rect.center();
        let threat = state
            .adversaries
            .iter()
            .map(|c| c.rect.center())
            .filter(|p| (*p - me).abs().max_element() < self.threat_radius)
            .min_by_key(|p| (*p - me).length_squared());

        // Away from the threat, or back toward the middle of the screen
        let dir = match threat {
            Some(p) => me - p,
            None => {
                let d = state.bounds.center() - me;
                if d.abs().max_element() <= state.player.rect.size.max_element() {
                    IVec2::ZERO
                } else {
                    d
                }
            }
        };

        if dir.x < 0 {
            self.held.insert(Key::Left);
        } else if dir.x > 0 {
            self.held.insert(Key::Right);
        }
        if dir.y < 0 {
            self.held.insert(Key::Up);
        } else if dir.y > 0 {
            self.held.insert(Key::Down);
        }
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}

impl Input for Autopilot {
    fn pump(&mut self, view: Option<&ProgressionState>) {
        self.held.clear();
        match view {
            // Pick whatever campaign is highlighted
            None => {
                self.held.insert(Key::Enter);
            }
            Some(state) => self.steer(state),
        }
    }

    fn is_key_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn quit_requested(&self) -> bool {
        false
    }
}

/// Sleeps away the rest of each frame to hold a fixed frame rate
#[derive(Debug)]
pub struct FrameClock {
    frame: Duration,
    next: Instant,
    paced: bool,
}

impl FrameClock {
    pub fn new(frame_rate: u32, paced: bool) -> Self {
        Self {
            frame: Duration::from_secs(1) / frame_rate.max(1),
            next: Instant::now(),
            paced,
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame
    }

    /// Block until the next frame is due
    pub fn wait(&mut self) {
        if !self.paced {
            return;
        }
        let now = Instant::now();
        if self.next > now {
            std::thread::sleep(self.next - now);
            self.next += self.frame;
        } else {
            // Running behind: don't try to catch up with a burst of frames
            self.next = now + self.frame;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::cube::{Bounds, Category, Cube};

    #[test]
    fn test_scripted_input_replays_frames() {
        let mut input = ScriptedInput::new(vec![vec![Key::Left], vec![Key::Up, Key::Right]]).quit_after(2);
        input.pump(None);
        assert!(input.is_key_held(Key::Left));
        assert!(!input.quit_requested());
        input.pump(None);
        assert!(input.is_key_held(Key::Up) && input.is_key_held(Key::Right));
        assert!(!input.is_key_held(Key::Left));
        assert!(!input.quit_requested());
        input.pump(None);
        assert!(!input.is_key_held(Key::Up));
        assert!(input.quit_requested());
    }

    #[test]
    fn test_autopilot_flees_nearby_threat() {
        let bounds = Bounds::new(650, 400);
        let mut state = ProgressionState::new(1, 3, bounds);
        let me = state.player.pos();
        state
            .adversaries
            .push(Cube::new(Category::Rock, me + IVec2::new(30, 0), IVec2::ZERO));

        let mut pilot = Autopilot::new();
        pilot.pump(Some(&state));
        assert!(pilot.is_key_held(Key::Left));
        assert!(!pilot.is_key_held(Key::Right));
    }

    #[test]
    fn test_autopilot_ignores_distant_cubes() {
        let bounds = Bounds::new(650, 400);
        let mut state = ProgressionState::new(1, 3, bounds);
        state
            .adversaries
            .push(Cube::new(Category::Rock, IVec2::new(0, 0), IVec2::ZERO));
        let mut pilot = Autopilot::new();
        pilot.pump(Some(&state));
        for key in [Key::Left, Key::Right, Key::Up, Key::Down] {
            assert!(!pilot.is_key_held(key));
        }
    }

    #[test]
    fn test_autopilot_confirms_menu() {
        let mut pilot = Autopilot::new();
        pilot.pump(None);
        assert!(pilot.is_key_held(Key::Enter));
    }

    #[test]
    fn test_frame_clock_duration() {
        let clock = FrameClock::new(50, false);
        assert_eq!(clock.frame_duration(), Duration::from_millis(20));
        let clock = FrameClock::new(0, false);
        assert_eq!(clock.frame_duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_unpaced_clock_does_not_sleep() {
        let mut clock = FrameClock::new(1, false);
        let start = Instant::now();
        clock.wait();
        clock.wait();
        assert!(start.elapsed() < Duration::from_millis(500));
    }
}
