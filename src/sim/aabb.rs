//! Axis-aligned bounding boxes and the single-axis MTV
//!
//! World coordinates are y-down with a top-left origin, so a normal of
//! (0, -1) pushes up (a landing) and (0, 1) pushes down (a ceiling hit).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box: top-left position plus size, in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// The empty box, used by disappearing platforms while hidden
    pub const EMPTY: Self = Self {
        pos: Vec2::ZERO,
        size: Vec2::ZERO,
    };

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Zero-area boxes signal "temporarily non-collidable"
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            pos: self.pos + delta,
            size: self.size,
        }
    }

    /// Centered percentage shrink (trap hitboxes keep their visual bounds
    /// but collide with a reduced sub-box)
    pub fn shrunk_by(&self, fraction: f32) -> Self {
        let cut = self.size * fraction;
        Self {
            pos: self.pos + cut * 0.5,
            size: self.size - cut,
        }
    }
}

/// Result of a contact computation between two overlapping boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal on the separation axis, pointing from `b` toward `a`
    pub normal: Vec2,
    /// Unsigned overlap magnitude on that axis
    pub penetration: f32,
}

/// Strict AABB overlap test
///
/// Open intervals on both axes: boxes that merely touch edges do not
/// collide. Just-touching is a valid physics state, not an error. Empty
/// boxes overlap nothing.
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    !a.is_empty()
        && !b.is_empty()
        && a.left() < b.right()
        && a.right() > b.left()
        && a.top() < b.bottom()
        && a.bottom() > b.top()
}

/// Compute the minimum translation vector for two overlapping boxes
///
/// Whichever axis has the smaller overlap separates; an exact tie resolves
/// vertically because the horizontal branch requires strict less-than. This
/// is a single-axis MTV, so diagonal corner contacts snap along the axis
/// with less overlap.
pub fn contact(a: &Aabb, b: &Aabb) -> Contact {
    let overlap_x = a.right().min(b.right()) - a.left().max(b.left());
    let overlap_y = a.bottom().min(b.bottom()) - a.top().max(b.top());

    if overlap_x < overlap_y {
        let sign = if a.center().x < b.center().x { -1.0 } else { 1.0 };
        Contact {
            normal: Vec2::new(sign, 0.0),
            penetration: overlap_x,
        }
    } else {
        let sign = if a.center().y < b.center().y { -1.0 } else { 1.0 };
        Contact {
            normal: Vec2::new(0.0, sign),
            penetration: overlap_y,
        }
    }
}
