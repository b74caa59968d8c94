//! Axis-aligned rectangle geometry
//!
//! Intervals are half-open: a rectangle covers `[x, x + w)` by `[y, y + h)`,
//! so rectangles that merely touch along an edge do not overlap.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: IVec2,
    /// Width and height
    pub size: IVec2,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            pos: IVec2::new(x, y),
            size: IVec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + self.size.y
    }

    /// Integer centre point
    #[inline]
    pub fn center(&self) -> IVec2 {
        self.pos + self.size / 2
    }

    /// Rectangle of `size` centred on `center`
    pub fn centered_at(center: IVec2, size: IVec2) -> Self {
        Self {
            pos: center - size / 2,
            size,
        }
    }

    /// Grow by `dx` in total width and `dy` in total height, keeping the centre.
    ///
    /// Negative values shrink the rectangle.
    pub fn inflate(&self, dx: i32, dy: i32) -> Self {
        Self {
            pos: IVec2::new(self.pos.x - dx / 2, self.pos.y - dy / 2),
            size: IVec2::new(self.size.x + dx, self.size.y + dy),
        }
    }

    /// True if `point` lies inside the rectangle (half-open)
    pub fn contains_point(&self, point: IVec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}

/// Standard rectangle overlap test; touching edges do not count.
#[inline]
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && b.left() < a.right() && a.top() < b.bottom() && b.top() < a.bottom()
}

/// Index of the first rectangle in `others` overlapping `a`, in list order.
///
/// Index 0 is a valid hit.
pub fn collides_any<'a, I>(a: &Rect, others: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a Rect>,
{
    others.into_iter().position(|other| collides(a, other))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0, 0, 20, 20);
        let b = Rect::new(10, 10, 20, 20);
        assert!(collides(&a, &b));
        assert!(collides(&b, &a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 20, 20);
        let right = Rect::new(20, 0, 20, 20);
        let below = Rect::new(0, 20, 20, 20);
        let corner = Rect::new(20, 20, 20, 20);
        assert!(!collides(&a, &right));
        assert!(!collides(&a, &below));
        assert!(!collides(&a, &corner));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(40, 40, 5, 5);
        assert!(collides(&outer, &inner));
        assert!(collides(&inner, &outer));
    }

    #[test]
    fn test_collides_any_reports_first_hit() {
        let player = Rect::new(100, 100, 20, 20);
        let others = [
            Rect::new(0, 0, 10, 10),
            Rect::new(110, 110, 20, 20),
            Rect::new(105, 105, 20, 20),
        ];
        assert_eq!(collides_any(&player, &others), Some(1));
    }

    #[test]
    fn test_collides_any_includes_index_zero() {
        // Older builds compared the hit index with `> 0` and missed this case.
        let player = Rect::new(100, 100, 20, 20);
        let others = [Rect::new(110, 110, 20, 20), Rect::new(0, 0, 10, 10)];
        assert_eq!(collides_any(&player, &others), Some(0));
    }

    #[test]
    fn test_collides_any_empty() {
        let player = Rect::new(100, 100, 20, 20);
        assert_eq!(collides_any(&player, &[]), None);
    }

    #[test]
    fn test_inflate_keeps_center() {
        let r = Rect::new(100, 100, 20, 20);
        let grown = r.inflate(100, 60);
        assert_eq!(grown, Rect::new(50, 70, 120, 80));
        assert_eq!(grown.center(), r.center());
    }

    #[test]
    fn test_contains_point_half_open() {
        let r = Rect::new(0, 0, 10, 10);
        assert!(r.contains_point(IVec2::new(0, 0)));
        assert!(r.contains_point(IVec2::new(9, 9)));
        assert!(!r.contains_point(IVec2::new(10, 5)));
        assert!(!r.contains_point(IVec2::new(5, 10)));
    }
}
