//! Frame loop
//!
//! [`Game`] owns the simulation state and the collaborators. Each frame it
//! polls input, ticks the simulation, hands cues to audio and scores to the
//! score store, then issues draw calls. With more than one campaign loaded
//! it starts on a selection menu.

use std::collections::HashSet;

use glam::IVec2;

use crate::audio::Audio;
use crate::highscores::ScoreStore;
use crate::platform::{FrameClock, Input, Key};
use crate::renderer::Renderer;
use crate::sim::{GameEvent, ProgressionState, SimParams, TickInput, tick};
use crate::tuning::CampaignConfig;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Escape or a quit request from the platform
    Quit,
    /// Every round of the campaign was cleared
    Completed { score: u64 },
    /// The caller's frame budget ran out
    FrameLimit,
}

/// What the frame loop is currently showing
#[derive(Debug)]
enum Screen {
    Menu { selected: usize },
    Playing(Box<Session>),
}

/// A campaign being played
#[derive(Debug)]
struct Session {
    campaign: usize,
    state: ProgressionState,
    best: Option<u64>,
}

/// Keys polled every frame
const POLLED_KEYS: [Key; 16] = [
    Key::Left,
    Key::Right,
    Key::Up,
    Key::Down,
    Key::Enter,
    Key::Escape,
    Key::Digit(0),
    Key::Digit(1),
    Key::Digit(2),
    Key::Digit(3),
    Key::Digit(4),
    Key::Digit(5),
    Key::Digit(6),
    Key::Digit(7),
    Key::Digit(8),
    Key::Digit(9),
];

pub struct Game<R, A, I, S> {
    campaigns: Vec<CampaignConfig>,
    params: SimParams,
    seed: u64,
    screen: Screen,
    renderer: R,
    audio: A,
    input: I,
    scores: S,
    /// Keys held last frame, for menu edge detection
    prev_keys: HashSet<Key>,
    frames: u64,
}

impl<R, A, I, S> Game<R, A, I, S>
where
    R: Renderer,
    A: Audio,
    I: Input,
    S: ScoreStore,
{
    /// Create the game. An empty campaign list falls back to the built-in campaign.
    pub fn new(
        mut campaigns: Vec<CampaignConfig>,
        params: SimParams,
        seed: u64,
        renderer: R,
        audio: A,
        input: I,
        scores: S,
    ) -> Self {
        if campaigns.is_empty() {
            campaigns.push(CampaignConfig::builtin());
        }
        let mut game = Self {
            campaigns,
            params,
            seed,
            screen: Screen::Menu { selected: 0 },
            renderer,
            audio,
            input,
            scores,
            prev_keys: HashSet::new(),
            frames: 0,
        };
        if game.campaigns.len() == 1 {
            game.start_campaign(0);
        }
        game
    }

    /// Running simulation state, `None` while in the menu
    pub fn state(&self) -> Option<&ProgressionState> {
        match &self.screen {
            Screen::Playing(session) => Some(&session.state),
            Screen::Menu { .. } => None,
        }
    }

    pub fn state_mut(&mut self) -> Option<&mut ProgressionState> {
        match &mut self.screen {
            Screen::Playing(session) => Some(&mut session.state),
            Screen::Menu { .. } => None,
        }
    }

    /// Highlighted menu entry, `None` once a campaign is running
    pub fn menu_selection(&self) -> Option<usize> {
        match self.screen {
            Screen::Menu { selected } => Some(selected),
            Screen::Playing(_) => None,
        }
    }

    /// Campaign being played
    pub fn campaign(&self) -> Option<&CampaignConfig> {
        match &self.screen {
            Screen::Playing(session) => self.campaigns.get(session.campaign),
            Screen::Menu { .. } => None,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    fn start_campaign(&mut self, index: usize) {
        let campaign = &self.campaigns[index];
        log::info!("Starting campaign '{}'", campaign.name);
        let best = match self.scores.load(campaign) {
            Ok(scores) => scores.top_score(),
            Err(e) => {
                log::error!("Could not read high scores: {}", e);
                None
            }
        };
        let state = ProgressionState::new(self.seed, campaign.lives, self.params.bounds);
        self.screen = Screen::Playing(Box::new(Session {
            campaign: index,
            state,
            best,
        }));
    }

    /// Run frames until the session ends or `max_frames` have run
    pub fn run(&mut self, clock: &mut FrameClock, max_frames: Option<u64>) -> SessionOutcome {
        loop {
            if let Some(outcome) = self.frame() {
                return outcome;
            }
            if max_frames.is_some_and(|max| self.frames >= max) {
                log::info!("Frame limit reached after {} frames", self.frames);
                return SessionOutcome::FrameLimit;
            }
            clock.wait();
        }
    }

    /// Run a single frame; returns the outcome if the session ended
    pub fn frame(&mut self) -> Option<SessionOutcome> {
        self.frames += 1;
        let view = match &self.screen {
            Screen::Playing(session) => Some(&session.state),
            Screen::Menu { .. } => None,
        };
        self.input.pump(view);
        if self.input.quit_requested() || self.input.is_key_held(Key::Escape) {
            log::info!("Quit requested");
            return Some(SessionOutcome::Quit);
        }

        let held: HashSet<Key> = POLLED_KEYS
            .into_iter()
            .filter(|k| self.input.is_key_held(*k))
            .collect();
        let pressed: HashSet<Key> = held.difference(&self.prev_keys).copied().collect();
        self.prev_keys = held;

        let outcome = match self.screen {
            Screen::Menu { selected } => {
                self.menu_frame(selected, &pressed);
                None
            }
            Screen::Playing(_) => self.play_frame(),
        };
        self.draw();
        outcome
    }

    fn menu_frame(&mut self, selected: usize, pressed: &HashSet<Key>) {
        let count = self.campaigns.len();
        if pressed.contains(&Key::Enter) {
            self.start_campaign(selected);
            return;
        }
        let selected = if pressed.contains(&Key::Up) {
            (selected + count - 1) % count
        } else if pressed.contains(&Key::Down) {
            (selected + 1) % count
        } else {
            selected
        };
        self.screen = Screen::Menu { selected };
    }

    fn play_frame(&mut self) -> Option<SessionOutcome> {
        let input = TickInput {
            left: self.prev_keys.contains(&Key::Left),
            right: self.prev_keys.contains(&Key::Right),
            up: self.prev_keys.contains(&Key::Up),
            down: self.prev_keys.contains(&Key::Down),
            jump_to_round: (0..=9u8)
                .find(|d| self.prev_keys.contains(&Key::Digit(*d)))
                .map(usize::from),
        };

        let Screen::Playing(session) = &mut self.screen else {
            return None;
        };
        let campaign = &self.campaigns[session.campaign];
        tick(&mut session.state, campaign, &self.params, &input);

        let mut outcome = None;
        for event in session.state.drain_events() {
            match event {
                GameEvent::Cue(cue) => self.audio.play(cue),
                GameEvent::ScoreRecorded { score, level } => {
                    if let Err(e) = self.scores.append_score(campaign, score, &level) {
                        log::error!("Failed to save high score {}: {}", score, e);
                    }
                    session.best = Some(session.best.map_or(score, |b| b.max(score)));
                }
                GameEvent::CampaignComplete { score } => {
                    outcome = Some(SessionOutcome::Completed { score });
                }
                GameEvent::RoundStarted { .. }
                | GameEvent::PlayerDied { .. }
                | GameEvent::GameOver { .. } => {}
            }
        }
        outcome
    }

    fn draw(&mut self) {
        let height = self.params.bounds.height;
        let width = self.params.bounds.width;
        self.renderer.clear_screen();

        match &self.screen {
            Screen::Menu { selected } => {
                self.renderer.draw_text("Select a campaign", IVec2::new(4, 2));
                for (i, campaign) in self.campaigns.iter().enumerate() {
                    let marker = if i == *selected { ">" } else { " " };
                    let line = format!("{} {}", marker, campaign.name);
                    self.renderer.draw_text(&line, IVec2::new(4, 22 + 16 * i as i32));
                }
            }
            Screen::Playing(session) => {
                let state = &session.state;
                for cube in &state.adversaries {
                    self.renderer.draw_sprite(cube.category, cube.pos());
                }

                let round = state.round_index();
                let name = self.campaigns[session.campaign]
                    .round(round)
                    .map(|r| r.name.as_str())
                    .unwrap_or_default();
                self.renderer
                    .draw_text(&format!("Round #{}: {}", round, name), IVec2::new(4, 2));
                self.renderer
                    .draw_text(&format!("Lives: {}", state.lives), IVec2::new(4, height - 20));
                self.renderer
                    .draw_text(&format!("Score: {}", state.score), IVec2::new(width - 120, 2));
                if let Some(best) = session.best {
                    self.renderer
                        .draw_text(&format!("Best: {}", best), IVec2::new(width - 120, height - 20));
                }

                self.renderer.draw_sprite(state.player.category, state.player.pos());
            }
        }

        self.renderer.present();
    }
}
