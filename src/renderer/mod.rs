//! Rendering collaborator
//!
//! The game only issues draw calls; how sprites reach a screen is up to the
//! implementation. [`LogRenderer`] is the headless one used by the binary.

use glam::IVec2;

use crate::sim::cube::Category;

pub trait Renderer {
    fn clear_screen(&mut self);
    fn draw_sprite(&mut self, category: Category, pos: IVec2);
    fn draw_text(&mut self, text: &str, pos: IVec2);
    fn present(&mut self);
}

/// Headless renderer: logs HUD text when it changes and frame summaries at trace level
#[derive(Debug, Default)]
pub struct LogRenderer {
    sprites: usize,
    hud: Vec<String>,
    last_hud: Vec<String>,
    frames: u64,
}

impl Renderer for LogRenderer {
    fn clear_screen(&mut self) {
        self.sprites = 0;
        self.hud.clear();
    }

    fn draw_sprite(&mut self, _category: Category, _pos: IVec2) {
        self.sprites += 1;
    }

    fn draw_text(&mut self, text: &str, _pos: IVec2) {
        self.hud.push(text.to_string());
    }

    fn present(&mut self) {
        self.frames += 1;
        if self.hud != self.last_hud {
            log::info!("{}", self.hud.join(" | "));
            self.last_hud = self.hud.clone();
        }
        log::trace!("Frame {}: {} sprites", self.frames, self.sprites);
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Sprite(Category, IVec2),
    Text(String, IVec2),
}

/// Keeps the draw calls of the most recent frame
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pending: Vec<DrawCall>,
    pub frame: Vec<DrawCall>,
    pub presented: u64,
}

impl RecordingRenderer {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.frame.iter().filter_map(|call| match call {
            DrawCall::Text(text, _) => Some(text.as_str()),
            DrawCall::Sprite(..) => None,
        })
    }

    pub fn sprite_count(&self, category: Category) -> usize {
        self.frame
            .iter()
            .filter(|call| matches!(call, DrawCall::Sprite(c, _) if *c == category))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    fn clear_screen(&mut self) {
        self.pending.clear();
    }

    fn draw_sprite(&mut self, category: Category, pos: IVec2) {
        self.pending.push(DrawCall::Sprite(category, pos));
    }

    fn draw_text(&mut self, text: &str, pos: IVec2) {
        self.pending.push(DrawCall::Text(text.to_string(), pos));
    }

    fn present(&mut self) {
        self.frame = std::mem::take(&mut self.pending);
        self.presented += 1;
    }
}
