//! Highway Rush: top-down highway driving
//!
//! World units are meters. `x` runs across the road (0 = center line) and `z`
//! runs along it, with the player fixed at `z = 0` and traffic approaching
//! from positive `z`. Both enemies and point pickups speed up with the score.
//! Entity shapes are stored in the (x, z) plane; `draw` flips z so that the
//! road ahead is up on screen.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::renderer::frame::{Frame, Style};
use crate::sim::collision::{Circle, Rect, Shape};
use crate::sim::entity::{Actor, Entity, IdAllocator, Playfield, orb, uniform};
use crate::sim::input::{Bindings, CanvasTouch, Control};
use crate::sim::state::EndReason;
use crate::sim::tick::{Game, StepContext, StepOutcome};
use crate::tuning::HighwayRushTuning;

const BINDINGS: Bindings = Bindings {
    keys: &[
        ("ArrowLeft", Control::Left),
        ("ArrowRight", Control::Right),
        ("KeyA", Control::Left),
        ("KeyD", Control::Right),
    ],
    buttons: &[
        ("left-button", Control::Left),
        ("right-button", Control::Right),
        ("leftBtn", Control::Left),
        ("rightBtn", Control::Right),
    ],
    canvas: CanvasTouch::SplitSteer,
};

/// Visible road ahead of and behind the player
const VIEW_AHEAD: f32 = 40.0;
const VIEW_BEHIND: f32 = 8.0;

pub struct HighwayRush {
    tuning: HighwayRushTuning,
    actor: Actor,
    /// The first entry is always present, a second joins once the score allows
    enemies: Vec<Entity>,
    points: Vec<Entity>,
    ids: IdAllocator,
}

impl HighwayRush {
    pub fn new(tuning: HighwayRushTuning) -> Self {
        Self {
            actor: Self::start_actor(&tuning),
            enemies: Vec::new(),
            points: Vec::new(),
            ids: IdAllocator::default(),
            tuning,
        }
    }

    fn start_actor(t: &HighwayRushTuning) -> Actor {
        Actor::new(Rect::centered(Vec2::ZERO, t.car_size))
    }

    fn car_at(&self, x: f32, z: f32) -> Rect {
        Rect::centered(Vec2::new(x, z), self.tuning.car_size)
    }

    /// Left or right quarter of the road
    fn side_lane(&self, rng: &mut Pcg32) -> f32 {
        let quarter = self.tuning.road_width / 4.0;
        if rng.random::<bool>() { quarter } else { -quarter }
    }

    /// Weighted pick among left/middle/right, biased toward the middle as the score grows
    fn weighted_lane(&self, score: f64, rng: &mut Pcg32) -> f32 {
        let weights = [1.0, 2.0 + score / self.tuning.lane_weight_scale, 1.0];
        let total: f64 = weights.iter().sum();
        let pick = rng.random::<f64>() * total;
        let mut acc = 0.0;
        let mut lane = 0.0;
        for (w, l) in weights.iter().zip([-1.0f32, 0.0, 1.0]) {
            acc += w;
            if pick <= acc {
                lane = l;
                break;
            }
        }
        let t = &self.tuning;
        lane * (t.road_width / 2.0 - t.kerb_width - 1.0)
    }

    fn point_x(&self, rng: &mut Pcg32) -> f32 {
        (rng.random::<f32>() - 0.5) * (self.tuning.road_width - 2.0)
    }

    fn place_point(&self, point: &mut Entity, rng: &mut Pcg32) {
        let t = &self.tuning;
        let x = self.point_x(rng);
        let z = t.road_length * t.recycle_depth + uniform(rng, 0.0, t.point_scatter);
        point.shape = Shape::Circle(Circle::new(x, z, t.point_radius));
    }

    fn enemy_speed(&self, score: f64) -> f32 {
        let t = &self.tuning;
        t.enemy_speed * (0.5 + score / t.enemy_score_scale) as f32
    }

    fn point_speed(&self, score: f64) -> f32 {
        let t = &self.tuning;
        t.point_speed * (0.5 + score / t.point_score_scale) as f32
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }
}

/// (x, z) world rect to screen space, ahead is up
fn to_screen(rect: Rect) -> Rect {
    Rect::new(rect.pos.x, -(rect.pos.y + rect.size.y), rect.size.x, rect.size.y)
}

impl Game for HighwayRush {
    fn name(&self) -> &'static str {
        "highway-rush"
    }

    fn playfield(&self) -> Playfield {
        Playfield::new(self.tuning.road_width, self.tuning.road_length)
    }

    fn max_health(&self) -> Option<i32> {
        None
    }

    fn bindings(&self) -> Bindings {
        BINDINGS
    }

    fn reset(&mut self, _field: Playfield, rng: &mut Pcg32) {
        self.actor = Self::start_actor(&self.tuning);
        self.ids.reset();

        let t = &self.tuning;
        let x = self.side_lane(rng);
        let start = self.car_at(x, t.road_length * t.enemy_start_depth);
        self.enemies = vec![Entity::new(self.ids.next_id(), start, Vec2::ZERO)];

        self.points.clear();
        for _ in 0..self.tuning.point_count {
            let x = self.point_x(rng);
            let z = uniform(rng, 0.0, self.tuning.road_length * self.tuning.enemy_start_depth);
            let id = self.ids.next_id();
            self.points
                .push(orb(id, Vec2::new(x, z), self.tuning.point_radius, Vec2::ZERO));
        }
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
        let score = ctx.session.score.value();
        let t = &self.tuning;

        let limit = t.road_width / 2.0 - 1.0;
        self.actor.steer(Vec2::new(ctx.intent.dx, 0.0), t.move_speed);
        let center = self.actor.body.center();
        self.actor.body = Rect::centered(
            Vec2::new(center.x.clamp(-limit, limit), center.y),
            self.actor.body.size,
        );

        let recycle_behind = -t.road_length * t.recycle_depth;
        let recycle_ahead = t.road_length * t.recycle_depth;
        let enemy_step = Vec2::new(0.0, -self.enemy_speed(score));
        for i in 0..self.enemies.len() {
            self.enemies[i].shape.translate(enemy_step);
            if self.enemies[i].bounds().center().y < recycle_behind {
                let x = self.side_lane(ctx.rng);
                self.enemies[i].shape = Shape::Rect(self.car_at(x, recycle_ahead));
            }
        }

        let hit_box = self.actor.body.expand(self.tuning.hit_margin);
        if self.enemies.iter().any(|e| e.hits(&hit_box)) {
            return StepOutcome::End(EndReason::Collision);
        }

        let body = self.actor.body;
        let point_step = Vec2::new(0.0, -self.point_speed(score));
        let mut points = std::mem::take(&mut self.points);
        for p in points.iter_mut() {
            p.shape.translate(point_step);
            if p.bounds().center().y < recycle_behind {
                self.place_point(p, ctx.rng);
            } else if p.hits(&body) {
                ctx.session.score.add(self.tuning.point_points);
                self.place_point(p, ctx.rng);
            }
        }
        self.points = points;

        let score = ctx.session.score.value();
        if score >= self.tuning.extra_enemy_score && self.enemies.len() < 2 {
            let x = self.weighted_lane(score, ctx.rng);
            let z = self.tuning.road_length * self.tuning.enemy_start_depth;
            let id = self.ids.next_id();
            log::debug!("highway-rush: extra enemy at x={x:.1}");
            self.enemies
                .push(Entity::new(id, self.car_at(x, z), Vec2::ZERO));
        }

        StepOutcome::Continue
    }

    fn draw(&self, frame: &mut Frame, _field: Playfield) {
        let half = self.tuning.road_width / 2.0;
        for x in [-half, half] {
            frame.line(
                Vec2::new(x, -VIEW_AHEAD),
                Vec2::new(x, VIEW_BEHIND),
                Style::Guide,
            );
        }
        for p in &self.points {
            if let Shape::Circle(c) = p.shape {
                frame.circle(Circle::new(c.center.x, -c.center.y, c.radius), Style::Collectible);
            }
        }
        for e in &self.enemies {
            frame.rect(to_screen(e.bounds()), Style::Vehicle);
        }
        frame.rect(to_screen(self.actor.body), Style::Player);
    }

    fn view(&self, _field: Playfield) -> Rect {
        let half = self.tuning.road_width / 2.0 + 1.0;
        Rect::new(-half, -VIEW_AHEAD, half * 2.0, VIEW_AHEAD + VIEW_BEHIND)
    }
}
