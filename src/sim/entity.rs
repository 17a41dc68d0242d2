//! Entities, the actor, the playfield, and spawn helpers
//!
//! Hazards, collectibles, projectiles and platforms all share one `Entity` type.
//! Removal during a scan is mark-and-compact: set `alive = false` while
//! iterating, then call [`compact`] once.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Circle, Rect, Shape};

/// A moving (or resting) non-player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub shape: Shape,
    /// Displacement per tick
    pub vel: Vec2,
    /// Cleared during a scan, compacted afterwards
    pub alive: bool,
}

impl Entity {
    pub fn new(id: u32, shape: impl Into<Shape>, vel: Vec2) -> Self {
        Self {
            id,
            shape: shape.into(),
            vel,
            alive: true,
        }
    }

    /// Move by one tick of velocity
    #[inline]
    pub fn advance(&mut self) {
        self.shape.translate(self.vel);
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.shape.bounds()
    }

    #[inline]
    pub fn hits(&self, body: &Rect) -> bool {
        self.alive && self.shape.overlaps_rect(body)
    }

    /// Rectangle shape, if this entity is one
    pub fn rect(&self) -> Option<&Rect> {
        match &self.shape {
            Shape::Rect(r) => Some(r),
            Shape::Circle(_) => None,
        }
    }
}

/// Advance every live entity by its velocity
pub fn advance_all(entities: &mut [Entity]) {
    for e in entities.iter_mut().filter(|e| e.alive) {
        e.advance();
    }
}

/// Drop every entity marked dead
pub fn compact(entities: &mut Vec<Entity>) {
    entities.retain(|e| e.alive);
}

/// Mark entities that have left the playfield through the edge opposite their spawn edge
pub fn cull_exited(entities: &mut [Entity], field: &Playfield, edge: Edge) {
    for e in entities.iter_mut() {
        if field.has_exited(&e.bounds(), edge) {
            e.alive = false;
        }
    }
}

/// Playfield side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

/// Visible area in world units, origin at top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Hard-clamp a body so it lies inside the field horizontally
    pub fn clamp_x(&self, body: &mut Rect) {
        body.pos.x = body.pos.x.clamp(0.0, (self.width - body.size.x).max(0.0));
    }

    /// Hard-clamp a body so it lies inside the field vertically
    pub fn clamp_y(&self, body: &mut Rect) {
        body.pos.y = body.pos.y.clamp(0.0, (self.height - body.size.y).max(0.0));
    }

    /// Hard-clamp on both axes
    pub fn clamp(&self, body: &mut Rect) {
        self.clamp_x(body);
        self.clamp_y(body);
    }

    pub fn contains(&self, body: &Rect) -> bool {
        body.left() >= 0.0
            && body.top() >= 0.0
            && body.right() <= self.width
            && body.bottom() <= self.height
    }

    /// True once the body is entirely past `edge`
    pub fn has_exited(&self, body: &Rect, edge: Edge) -> bool {
        match edge {
            Edge::Top => body.bottom() < 0.0,
            Edge::Bottom => body.top() > self.height,
            Edge::Left => body.right() < 0.0,
            Edge::Right => body.left() > self.width,
        }
    }
}

/// The player-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub body: Rect,
    pub vel: Vec2,
    pub on_ground: bool,
}

impl Actor {
    pub fn new(body: Rect) -> Self {
        Self {
            body,
            vel: Vec2::ZERO,
            on_ground: false,
        }
    }

    /// Apply a held direction directly: `position += intent * speed`
    pub fn steer(&mut self, intent: Vec2, speed: f32) {
        self.body.pos += intent * speed;
    }

    /// Semi-implicit integration used by the side-on variants: move, then accelerate
    pub fn integrate(&mut self, gravity: f32) {
        self.body.pos += self.vel;
        self.vel.y += gravity;
    }

    /// Snap onto any platform the actor is falling through this tick.
    /// `tolerance` is how far below a platform top the feet may sink and still land.
    pub fn land_on<'a>(
        &mut self,
        platforms: impl IntoIterator<Item = &'a Rect>,
        tolerance: impl Fn(&Actor) -> f32,
    ) {
        self.on_ground = false;
        for p in platforms {
            let feet = self.body.bottom();
            if self.vel.y >= 0.0
                && self.body.overlaps_x(p)
                && feet >= p.top()
                && feet <= p.top() + tolerance(self)
            {
                self.body.pos.y = p.top() - self.body.size.y;
                self.vel.y = 0.0;
                self.on_ground = true;
            }
        }
    }
}

/// Fixed-interval spawn counter ("every N ticks")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub interval: u32,
    pub elapsed: u32,
}

impl SpawnTimer {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            elapsed: 0,
        }
    }

    /// Count one tick. Returns true on every `interval`-th call.
    pub fn tick(&mut self) -> bool {
        self.elapsed += 1;
        if self.elapsed >= self.interval {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}

/// One independent Bernoulli draw
#[inline]
pub fn roll(rng: &mut impl Rng, p: f32) -> bool {
    rng.random::<f32>() < p
}

/// Uniform value in `[lo, hi)`; returns `lo` when the range is empty
#[inline]
pub fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Hands out entity ids in spawn order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> u32 {
        self.next += 1;
        self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// Build a circular collectible
pub fn orb(id: u32, center: Vec2, radius: f32, vel: Vec2) -> Entity {
    Entity::new(id, Circle { center, radius }, vel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_timer_fires_every_interval() {
        let mut timer = SpawnTimer::new(3);
        let fired: Vec<bool> = (0..7).map(|_| timer.tick()).collect();
        assert_eq!(fired, vec![false, false, true, false, false, true, false]);
    }

    #[test]
    fn test_exit_edges() {
        let field = Playfield::new(100.0, 100.0);
        let above = Rect::new(10.0, -30.0, 10.0, 20.0);
        assert!(field.has_exited(&above, Edge::Top));
        assert!(!field.has_exited(&above, Edge::Bottom));
        let below = Rect::new(10.0, 101.0, 10.0, 10.0);
        assert!(field.has_exited(&below, Edge::Bottom));
        let left = Rect::new(-11.0, 0.0, 10.0, 10.0);
        assert!(field.has_exited(&left, Edge::Left));
    }

    #[test]
    fn test_mark_and_compact() {
        let field = Playfield::new(100.0, 100.0);
        let mut list = vec![
            Entity::new(1, Rect::new(0.0, 95.0, 5.0, 5.0), Vec2::new(0.0, 10.0)),
            Entity::new(2, Rect::new(0.0, 10.0, 5.0, 5.0), Vec2::new(0.0, 10.0)),
        ];
        advance_all(&mut list);
        cull_exited(&mut list, &field, Edge::Bottom);
        compact(&mut list);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 2);
    }

    #[test]
    fn test_land_on_platform() {
        let mut actor = Actor::new(Rect::new(10.0, 58.0, 10.0, 10.0));
        actor.vel.y = 4.0;
        let platform = Rect::new(0.0, 70.0, 50.0, 5.0);
        actor.integrate(1.0);
        actor.land_on([&platform], |a| a.vel.y + 1.0);
        assert!(actor.on_ground);
        assert_eq!(actor.body.bottom(), 70.0);
        assert_eq!(actor.vel.y, 0.0);
    }

    #[test]
    fn test_land_ignores_rising_actor() {
        let mut actor = Actor::new(Rect::new(10.0, 62.0, 10.0, 10.0));
        actor.vel.y = -5.0;
        let platform = Rect::new(0.0, 70.0, 50.0, 5.0);
        actor.land_on([&platform], |_| 12.0);
        assert!(!actor.on_ground);
    }

    #[test]
    fn test_roll_extremes() {
        let mut rng = Pcg32::seed_from_u64(7);
        assert!((0..100).all(|_| !roll(&mut rng, 0.0)));
        assert!((0..100).all(|_| roll(&mut rng, 1.0)));
    }

    proptest! {
        #[test]
        fn prop_clamp_keeps_body_inside(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            w in 1.0f32..80.0,
            h in 1.0f32..80.0,
        ) {
            let field = Playfield::new(480.0, 640.0);
            let mut body = Rect::new(x, y, w, h);
            field.clamp(&mut body);
            prop_assert!(body.pos.x >= 0.0 && body.pos.x <= field.width - w);
            prop_assert!(body.pos.y >= 0.0 && body.pos.y <= field.height - h);
        }
    }
}
