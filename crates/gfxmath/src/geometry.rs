//! Axis-aligned boxes and circles with overlap tests.
//!
//! The box test is half-open (touching edges do not intersect) while the circle
//! test is inclusive (touching circles overlap).

use glam::Vec2;
use serde::Serialize;

/// Axis-aligned box given by its minimum and maximum corners.
///
/// [`Box2::new`] stores the corners as given; [`Box2::from_min_size`] derives
/// the maximum corner from a size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Box2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Box2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self::new(min, min + size)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// True unless the boxes are separated on the x axis or on the y axis.
pub fn boxes_intersect(a: Box2, b: Box2) -> bool {
    let apart_x = a.max.x <= b.min.x || a.min.x >= b.max.x;
    let apart_y = a.max.y <= b.min.y || a.min.y >= b.max.y;
    !(apart_x || apart_y)
}

/// Moves `a` by the shortest single-axis push that clears `b`.
///
/// Candidates are tried in the order +x, -x, +y, -y and an earlier candidate
/// wins a tie. The returned box always has the size of `a`.
pub fn resolve_overlap(a: Box2, b: Box2) -> Box2 {
    let pushes = [
        Vec2::new(b.max.x - a.min.x, 0.0),
        Vec2::new(b.min.x - a.max.x, 0.0),
        Vec2::new(0.0, b.max.y - a.min.y),
        Vec2::new(0.0, b.min.y - a.max.y),
    ];

    let mut best = 0;
    for index in 1..pushes.len() {
        if pushes[index].length_squared() < pushes[best].length_squared() {
            best = index;
        }
    }

    Box2::from_min_size(a.min + pushes[best], a.size())
}

/// True when the circles touch or overlap.
pub fn circles_overlap(a: Circle, b: Circle) -> bool {
    let reach = a.radius + b.radius;
    reach * reach >= a.center.distance_squared(b.center)
}
