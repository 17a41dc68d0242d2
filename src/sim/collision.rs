//! Collision detection for axis-aligned rectangles and circles
//!
//! Everything here is a pure predicate. Entity counts are small, so callers test
//! every actor/entity pair each tick and no spatial index is kept.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, `pos` is the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of the given size centered on a point
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size / 2.0,
            size,
        }
    }

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
        self.pos + self.size / 2.0
    }

    /// Strict AABB overlap. Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expand(&self, margin: f32) -> Rect {
        Rect {
            pos: self.pos - Vec2::splat(margin),
            size: self.size + Vec2::splat(margin * 2.0),
        }
    }

    /// Closest point inside the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.pos, self.pos + self.size)
    }

    /// True if the two rectangles share any horizontal extent
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.right() > other.left() && self.left() < other.right()
    }
}

/// A circle by center and radius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            center: Vec2::new(x, y),
            radius,
        }
    }

    /// Bounding box of the circle
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.center, Vec2::splat(self.radius * 2.0))
    }

    /// Center distance strictly less than the combined radius
    #[inline]
    pub fn overlaps(&self, other: &Circle) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) < reach * reach
    }

    /// Closest point on the rectangle strictly inside the circle
    #[inline]
    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        let closest = rect.closest_point(self.center);
        self.center.distance_squared(closest) < self.radius * self.radius
    }
}

/// Collision shape of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect(Rect),
    Circle(Circle),
}

impl Shape {
    /// Overlap test dispatching on both shapes
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (self, other) {
            (Shape::Rect(a), Shape::Rect(b)) => a.overlaps(b),
            (Shape::Circle(a), Shape::Circle(b)) => a.overlaps(b),
            (Shape::Rect(r), Shape::Circle(c)) | (Shape::Circle(c), Shape::Rect(r)) => {
                c.overlaps_rect(r)
            }
        }
    }

    /// Overlap against a plain rectangle (the usual actor body)
    pub fn overlaps_rect(&self, rect: &Rect) -> bool {
        match self {
            Shape::Rect(r) => r.overlaps(rect),
            Shape::Circle(c) => c.overlaps_rect(rect),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Circle(c) => c.bounds(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Rect(r) => r.pos += delta,
            Shape::Circle(c) => c.center += delta,
        }
    }
}

impl From<Rect> for Shape {
    fn from(r: Rect) -> Self {
        Shape::Rect(r)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bullet_hits_enemy() {
        let bullet = Rect::new(10.0, 10.0, 10.0, 20.0);
        let enemy = Rect::new(12.0, 15.0, 20.0, 20.0);
        assert!(bullet.overlaps(&enemy));
        assert!(enemy.overlaps(&bullet));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_expand_catches_near_miss() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(1.2, 0.0, 1.0, 1.0);
        assert!(!a.overlaps(&b));
        assert!(a.expand(0.3).overlaps(&b));
    }

    #[test]
    fn test_circle_rect() {
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        // Near the corner but outside the rounded region
        assert!(!Circle::new(48.0, 48.0, 10.0).overlaps_rect(&rect));
        // Touching the right face
        assert!(Circle::new(45.0, 20.0, 10.0).overlaps_rect(&rect));
        // Center inside
        assert!(Circle::new(20.0, 20.0, 1.0).overlaps_rect(&rect));
    }

    #[test]
    fn test_circle_circle() {
        let a = Circle::new(0.0, 0.0, 5.0);
        assert!(a.overlaps(&Circle::new(9.0, 0.0, 5.0)));
        assert!(!a.overlaps(&Circle::new(10.0, 0.0, 5.0)));
    }

    #[test]
    fn test_shape_translate_and_bounds() {
        let mut s = Shape::from(Circle::new(10.0, 10.0, 5.0));
        s.translate(Vec2::new(-6.0, 0.0));
        assert_eq!(s.bounds(), Rect::new(-1.0, 5.0, 10.0, 10.0));
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-100.0f32..100.0, -100.0f32..100.0, 0.0f32..60.0, 0.0f32..60.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    fn arb_shape() -> impl Strategy<Value = Shape> {
        prop_oneof![
            arb_rect().prop_map(Shape::Rect),
            (-100.0f32..100.0, -100.0f32..100.0, 0.0f32..40.0)
                .prop_map(|(x, y, r)| Shape::Circle(Circle::new(x, y, r))),
        ]
    }

    proptest! {
        #[test]
        fn prop_rect_overlap_is_symmetric(a in arb_rect(), b in arb_rect()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_shape_overlap_is_symmetric(a in arb_shape(), b in arb_shape()) {
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
