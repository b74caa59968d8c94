//! Concentric scoring zones
//!
//! Three rectangles A ⊂ B ⊂ C centred on screen. Each tick the player earns
//! the points of the innermost zone containing its centre point.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::cube::Bounds;

/// One zone: size of the centred rectangle and points per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub size: IVec2,
    pub points: u64,
}

/// Nested zones, innermost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreZones {
    pub a: Zone,
    pub b: Zone,
    pub c: Zone,
}

impl ScoreZones {
    /// Zones ordered from innermost to outermost
    pub fn innermost_first(&self) -> [Zone; 3] {
        [self.a, self.b, self.c]
    }

    /// True if every zone fits inside the next one out
    pub fn is_nested(&self) -> bool {
        let fits = |inner: &Zone, outer: &Zone| {
            inner.size.x <= outer.size.x && inner.size.y <= outer.size.y
        };
        fits(&self.a, &self.b) && fits(&self.b, &self.c)
    }

    /// Screen rectangle of a zone
    pub fn zone_rect(zone: &Zone, bounds: Bounds) -> Rect {
        Rect::centered_at(bounds.center(), zone.size)
    }

    /// Points earned this tick by a player whose rectangle is `player`
    pub fn award(&self, player: &Rect, bounds: Bounds) -> u64 {
        let point = player.center();
        self.innermost_first()
            .iter()
            .find(|zone| Self::zone_rect(zone, bounds).contains_point(point))
            .map(|zone| zone.points)
            .unwrap_or(0)
    }
}
