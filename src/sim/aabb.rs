//! Axis-aligned boxes in world space
//!
//! y grows upward: `min.y` is the bottom face, `max.y` the top face.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from left/right/bottom/top edges
    pub fn from_edges(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            min: Vec2::new(left, bottom),
            max: Vec2::new(right, top),
        }
    }

    /// Box of the given size resting on `bottom`, centered on `center_x`
    pub fn centered_on(center_x: f32, bottom: f32, width: f32, height: f32) -> Self {
        Self::from_edges(
            center_x - width / 2.0,
            center_x + width / 2.0,
            bottom,
            bottom + height,
        )
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict horizontal overlap (touching edges do not count)
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x && self.min.x < other.max.x
    }

    /// Strict vertical overlap (touching edges do not count)
    #[inline]
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        self.max.y > other.min.y && self.min.y < other.max.y
    }

    /// Strict overlap on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }

    /// Shrink horizontally by separate left/right insets
    pub fn inset_x(&self, left: f32, right: f32) -> Self {
        Self::from_edges(self.min.x + left, self.max.x - right, self.min.y, self.max.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap() {
        let a = Aabb::from_edges(0.0, 10.0, 0.0, 10.0);
        let b = Aabb::from_edges(5.0, 15.0, 5.0, 15.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::from_edges(0.0, 10.0, 0.0, 10.0);
        let right = Aabb::from_edges(10.0, 20.0, 0.0, 10.0);
        let above = Aabb::from_edges(0.0, 10.0, 10.0, 20.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&above));
    }

    #[test]
    fn test_centered_on() {
        let b = Aabb::centered_on(50.0, 80.0, 80.0, 80.0);
        assert_eq!(b.left(), 10.0);
        assert_eq!(b.right(), 90.0);
        assert_eq!(b.bottom(), 80.0);
        assert_eq!(b.top(), 160.0);
    }

    #[test]
    fn test_inset_x() {
        let b = Aabb::from_edges(0.0, 200.0, 0.0, 15.0).inset_x(24.0, 24.0);
        assert_eq!(b.left(), 24.0);
        assert_eq!(b.right(), 176.0);
        assert_eq!(b.width(), 152.0);
        assert_eq!(b.height(), 15.0);
    }
}
