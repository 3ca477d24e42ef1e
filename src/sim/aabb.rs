//! Axis-aligned box geometry
//!
//! Every body in the world is a box described by its centre and full size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

/// Axis along which two boxes are separated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Minimum-penetration separation between two overlapping boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Penetration {
    pub axis: Axis,
    /// Overlap depth along `axis` (always > 0)
    pub depth: f32,
    /// +1 if the first box must move toward +axis, -1 otherwise
    pub sign: f32,
}

impl Penetration {
    /// Push vector for the first box
    pub fn push(&self) -> Vec2 {
        match self.axis {
            Axis::X => Vec2::new(self.depth * self.sign, 0.0),
            Axis::Y => Vec2::new(0.0, self.depth * self.sign),
        }
    }

    /// True when the first box rests on top of the second (y grows downward)
    pub fn is_top_face(&self) -> bool {
        self.axis == Axis::Y && self.sign < 0.0
    }
}

impl Aabb {
    /// Box from centre and full size
    #[inline]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Strict overlap: boxes that only touch do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Separation that moves `self` out of `other` along the shallower axis
    pub fn penetration(&self, other: &Aabb) -> Option<Penetration> {
        if !self.overlaps(other) {
            return None;
        }

        let overlap_x = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let overlap_y = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        let delta = self.center() - other.center();

        // Ties resolve vertically so a body landing square on a corner is grounded
        if overlap_x < overlap_y {
            Some(Penetration {
                axis: Axis::X,
                depth: overlap_x,
                sign: if delta.x < 0.0 { -1.0 } else { 1.0 },
            })
        } else {
            Some(Penetration {
                axis: Axis::Y,
                depth: overlap_y,
                sign: if delta.y < 0.0 { -1.0 } else { 1.0 },
            })
        }
    }
}
