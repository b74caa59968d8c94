//! Cube entities: the player and the six adversary kinds
//!
//! Each adversary kind enters from a fixed edge (or anywhere, for rocks) and
//! travels in a straight line. Construction is keyed by [`Category`].

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;

/// Category tag of a cube
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Enters at the left edge, travels right
    HoriLeft,
    /// Enters at the right edge, travels left
    HoriRight,
    /// Enters at the top edge, travels down
    VertiTop,
    /// Enters at the bottom edge, travels up
    VertiBottom,
    /// Enters at a random edge, travels diagonally
    Diagonal,
    /// Stationary obstacle
    Rock,
    /// The player-controlled cube
    Player,
}

impl Category {
    /// The six adversary categories, in count-table order
    pub const ADVERSARIES: [Category; 6] = [
        Category::HoriLeft,
        Category::HoriRight,
        Category::VertiTop,
        Category::VertiBottom,
        Category::Diagonal,
        Category::Rock,
    ];

    /// Slot in per-category tables, `None` for the player
    pub fn index(self) -> Option<usize> {
        match self {
            Category::HoriLeft => Some(0),
            Category::HoriRight => Some(1),
            Category::VertiTop => Some(2),
            Category::VertiBottom => Some(3),
            Category::Diagonal => Some(4),
            Category::Rock => Some(5),
            Category::Player => None,
        }
    }

    /// Fixed sprite size for this category
    pub fn size(self) -> IVec2 {
        match self {
            Category::Diagonal => IVec2::splat(16),
            Category::Rock => IVec2::splat(32),
            _ => IVec2::splat(20),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::HoriLeft => "hori-left",
            Category::HoriRight => "hori-right",
            Category::VertiTop => "verti-top",
            Category::VertiBottom => "verti-bottom",
            Category::Diagonal => "diagonal",
            Category::Rock => "rock",
            Category::Player => "player",
        }
    }
}

/// Viewport dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.width / 2, self.height / 2)
    }

    pub fn as_rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Result of the off-screen policy for one cube
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    Keep,
    Remove,
}

/// A moving axis-aligned cube
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cube {
    pub category: Category,
    pub rect: Rect,
    /// Pixels per tick
    pub vel: IVec2,
}

impl Cube {
    pub fn new(category: Category, pos: IVec2, vel: IVec2) -> Self {
        Self {
            category,
            rect: Rect {
                pos,
                size: category.size(),
            },
            vel,
        }
    }

    /// Player cube centred in the viewport, at rest
    pub fn player(bounds: Bounds) -> Self {
        let rect = Rect::centered_at(bounds.center(), Category::Player.size());
        Self {
            category: Category::Player,
            rect,
            vel: IVec2::ZERO,
        }
    }

    #[inline]
    pub fn pos(&self) -> IVec2 {
        self.rect.pos
    }

    /// Translate by velocity for one tick
    #[inline]
    pub fn advance(&mut self) {
        self.rect.pos += self.vel;
    }

    /// True when the rectangle lies entirely outside the viewport
    pub fn is_off_screen(&self, bounds: Bounds) -> bool {
        let r = &self.rect;
        r.right() <= 0 || r.left() >= bounds.width || r.bottom() <= 0 || r.top() >= bounds.height
    }

    /// Wrap a cube that has fully left the viewport back to the opposite edge,
    /// or report it for removal when wrapping is off.
    pub fn wrap_or_remove(&mut self, bounds: Bounds, keep_on_screen: bool) -> EdgePolicy {
        if !self.is_off_screen(bounds) {
            return EdgePolicy::Keep;
        }
        if !keep_on_screen {
            return EdgePolicy::Remove;
        }

        if self.rect.right() <= 0 {
            self.rect.pos.x += bounds.width;
        } else if self.rect.left() >= bounds.width {
            self.rect.pos.x -= bounds.width;
        }

        if self.rect.bottom() <= 0 {
            self.rect.pos.y += bounds.height;
        } else if self.rect.top() >= bounds.height {
            self.rect.pos.y -= bounds.height;
        }

        EdgePolicy::Keep
    }
}

/// Build a new adversary of `category` moving at `speed` pixels per tick.
///
/// Coordinates along the entry edge are drawn inside `[margin, extent - margin - size]`.
pub fn spawn_adversary<R: Rng + ?Sized>(
    category: Category,
    speed: i32,
    bounds: Bounds,
    margin: i32,
    rng: &mut R,
) -> Cube {
    let size = category.size();
    let max_x = bounds.width - size.x;
    let max_y = bounds.height - size.y;

    match category {
        Category::HoriLeft => {
            let y = random_along(rng, margin, max_y - margin);
            Cube::new(category, IVec2::new(0, y), IVec2::new(speed, 0))
        }
        Category::HoriRight => {
            let y = random_along(rng, margin, max_y - margin);
            Cube::new(category, IVec2::new(max_x, y), IVec2::new(-speed, 0))
        }
        Category::VertiTop => {
            let x = random_along(rng, margin, max_x - margin);
            Cube::new(category, IVec2::new(x, 0), IVec2::new(0, speed))
        }
        Category::VertiBottom => {
            let x = random_along(rng, margin, max_x - margin);
            Cube::new(category, IVec2::new(x, max_y), IVec2::new(0, -speed))
        }
        Category::Diagonal => {
            let pos = match rng.random_range(0..4) {
                0 => IVec2::new(0, random_along(rng, margin, max_y - margin)),
                1 => IVec2::new(max_x, random_along(rng, margin, max_y - margin)),
                2 => IVec2::new(random_along(rng, margin, max_x - margin), 0),
                _ => IVec2::new(random_along(rng, margin, max_x - margin), max_y),
            };
            let sx = if rng.random_bool(0.5) { speed } else { -speed };
            let sy = if rng.random_bool(0.5) { speed } else { -speed };
            Cube::new(category, pos, IVec2::new(sx, sy))
        }
        Category::Rock => {
            let pos = IVec2::new(
                random_along(rng, margin, max_x - margin),
                random_along(rng, margin, max_y - margin),
            );
            Cube::new(category, pos, IVec2::ZERO)
        }
        Category::Player => Cube::player(bounds),
    }
}

/// Uniform draw in `[lo, hi]`, collapsing to `lo` when the span is empty
fn random_along<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    if hi <= lo { lo } else { rng.random_range(lo..=hi) }
}
