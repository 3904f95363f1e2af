//! Collider shapes and pairwise overlap tests
//!
//! Each collider is attached to a game object and positioned relative to it.
//! Overlap is decided by a dispatch on the pair of shapes; pairs without a
//! test report `EngineError::UnsupportedColliderPairing` instead of guessing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Collider geometry. Positions are centers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
    /// Pixel mask; bounds are recorded but no pairwise test exists
    Mask { width: f32, height: f32 },
}

impl Shape {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Circle { .. } => "circle",
            Shape::Rect { .. } => "rect",
            Shape::Mask { .. } => "mask",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub id: String,
    pub shape: Shape,
    /// Offset of the collider center from the owning object's position
    pub offset: Vec2,
}

impl Collider {
    pub fn circle(id: impl Into<String>, radius: f32) -> Self {
        Self {
            id: id.into(),
            shape: Shape::Circle { radius },
            offset: Vec2::ZERO,
        }
    }

    pub fn rect(id: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            shape: Shape::Rect { width, height },
            offset: Vec2::ZERO,
        }
    }

    pub fn mask(id: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            id: id.into(),
            shape: Shape::Mask { width, height },
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn center(&self, owner_pos: Vec2) -> Vec2 {
        owner_pos + self.offset
    }

    /// Test this collider (owned by an object at `owner_pos`) against another.
    pub fn collides_with(
        &self,
        owner_pos: Vec2,
        other: &Collider,
        other_pos: Vec2,
    ) -> Result<bool, EngineError> {
        let a = self.center(owner_pos);
        let b = other.center(other_pos);

        match (self.shape, other.shape) {
            (Shape::Circle { radius: r1 }, Shape::Circle { radius: r2 }) => {
                Ok(circle_circle(a, r1, b, r2))
            }
            (
                Shape::Rect {
                    width: w1,
                    height: h1,
                },
                Shape::Rect {
                    width: w2,
                    height: h2,
                },
            ) => Ok(rect_rect(a, Vec2::new(w1, h1), b, Vec2::new(w2, h2))),
            (Shape::Rect { width, height }, Shape::Circle { radius }) => {
                Ok(rect_circle(a, Vec2::new(width, height), b, radius))
            }
            (Shape::Circle { radius }, Shape::Rect { width, height }) => {
                Ok(rect_circle(b, Vec2::new(width, height), a, radius))
            }
            (first, second) => Err(EngineError::UnsupportedColliderPairing {
                a: first.kind_name(),
                b: second.kind_name(),
            }),
        }
    }
}

/// Circles overlap when the center distance is at most the sum of radii.
pub fn circle_circle(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    let reach = r1 + r2;
    c1.distance_squared(c2) <= reach * reach
}

/// Axis-aligned rectangles overlap when both projections overlap.
pub fn rect_rect(c1: Vec2, size1: Vec2, c2: Vec2, size2: Vec2) -> bool {
    let h1 = size1 * 0.5;
    let h2 = size2 * 0.5;
    spans_overlap(c1.x, h1.x, c2.x, h2.x) && spans_overlap(c1.y, h1.y, c2.y, h2.y)
}

/// One span's upper end lies inside the other span.
fn spans_overlap(c1: f32, half1: f32, c2: f32, half2: f32) -> bool {
    let (lo1, hi1) = (c1 - half1, c1 + half1);
    let (lo2, hi2) = (c2 - half2, c2 + half2);
    (hi1 >= lo2 && hi1 <= hi2) || (hi2 >= lo1 && hi2 <= hi1)
}

/// Rectangle against circle: reject per axis, accept edge contact, then test
/// the nearest corner.
pub fn rect_circle(rect_center: Vec2, rect_size: Vec2, circle_center: Vec2, radius: f32) -> bool {
    let half = rect_size * 0.5;
    let dist = (circle_center - rect_center).abs();

    if dist.x > half.x + radius || dist.y > half.y + radius {
        return false;
    }
    if dist.x <= half.x || dist.y <= half.y {
        return true;
    }

    let corner = dist - half;
    corner.length_squared() <= radius * radius
}
