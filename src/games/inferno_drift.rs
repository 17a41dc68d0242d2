//! Inferno Drift: lane racer
//!
//! The car steers left and right within a road strip while obstacles and orbs
//! pour down from above.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::renderer::frame::{Frame, Style};
use crate::sim::collision::Rect;
use crate::sim::entity::{
    Actor, Edge, Entity, IdAllocator, Playfield, advance_all, compact, cull_exited, orb, roll,
    uniform,
};
use crate::sim::input::{Bindings, CanvasTouch, Control};
use crate::sim::state::EndReason;
use crate::sim::tick::{Game, StepContext, StepOutcome};
use crate::tuning::InfernoDriftTuning;

const BINDINGS: Bindings = Bindings {
    keys: &[("ArrowLeft", Control::Left), ("ArrowRight", Control::Right)],
    buttons: &[("leftBtn", Control::Left), ("rightBtn", Control::Right)],
    canvas: CanvasTouch::SplitSteer,
};

pub struct InfernoDrift {
    tuning: InfernoDriftTuning,
    car: Actor,
    obstacles: Vec<Entity>,
    orbs: Vec<Entity>,
    ids: IdAllocator,
}

impl InfernoDrift {
    pub fn new(tuning: InfernoDriftTuning) -> Self {
        let field = tuning.playfield;
        Self {
            car: Self::start_car(&tuning, field),
            obstacles: Vec::new(),
            orbs: Vec::new(),
            ids: IdAllocator::default(),
            tuning,
        }
    }

    fn start_car(t: &InfernoDriftTuning, field: Playfield) -> Actor {
        let mut body = Rect {
            pos: Vec2::new(field.width / 2.0, field.height - t.car_offset),
            size: t.car_size,
        };
        field.clamp(&mut body);
        Actor::new(body)
    }

    /// Road strip centered on the field, full height
    pub fn road(&self, field: Playfield) -> Rect {
        let w = self.tuning.road_width.min(field.width);
        Rect::new((field.width - w) / 2.0, 0.0, w, field.height)
    }

    fn spawn(&mut self, field: Playfield, rng: &mut Pcg32) {
        let road = self.road(field);
        let t = &self.tuning;
        let vel = Vec2::new(0.0, t.fall_speed);

        if roll(rng, t.obstacle_chance) {
            let side = uniform(rng, t.obstacle_min, t.obstacle_max).min(road.size.x);
            let x = uniform(rng, road.left(), road.right() - side);
            let id = self.ids.next_id();
            self.obstacles
                .push(Entity::new(id, Rect::new(x, -side, side, side), vel));
        }
        if roll(rng, t.orb_chance) {
            let r = t.orb_radius;
            let x = uniform(rng, road.left() + r, road.right() - r);
            let id = self.ids.next_id();
            self.orbs.push(orb(id, Vec2::new(x, -r), r, vel));
        }
    }

    pub fn car(&self) -> &Actor {
        &self.car
    }
}

impl Game for InfernoDrift {
    fn name(&self) -> &'static str {
        "inferno-drift"
    }

    fn playfield(&self) -> Playfield {
        self.tuning.playfield
    }

    fn max_health(&self) -> Option<i32> {
        None
    }

    fn bindings(&self) -> Bindings {
        BINDINGS
    }

    fn player_body(&self) -> Option<Rect> {
        Some(self.car.body)
    }

    fn reset(&mut self, field: Playfield, _rng: &mut Pcg32) {
        self.car = Self::start_car(&self.tuning, field);
        self.obstacles.clear();
        self.orbs.clear();
        self.ids.reset();
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
        let field = ctx.field;
        let road = self.road(field);

        self.car
            .steer(Vec2::new(ctx.intent.dx, 0.0), self.tuning.steer_speed);
        let body = &mut self.car.body;
        // A road narrower than the car pins it to the left kerb
        body.pos.x = body
            .pos
            .x
            .clamp(road.left(), (road.right() - body.size.x).max(road.left()));

        self.spawn(field, ctx.rng);
        advance_all(&mut self.obstacles);
        advance_all(&mut self.orbs);

        let body = self.car.body;
        if self.obstacles.iter().any(|o| o.hits(&body)) {
            return StepOutcome::End(EndReason::Collision);
        }
        for o in self.orbs.iter_mut().filter(|o| o.hits(&body)) {
            o.alive = false;
            ctx.session.score.add(self.tuning.orb_points);
        }
        cull_exited(&mut self.obstacles, &field, Edge::Bottom);
        cull_exited(&mut self.orbs, &field, Edge::Bottom);
        compact(&mut self.obstacles);
        compact(&mut self.orbs);

        ctx.session.score.add(self.tuning.passive_points);
        StepOutcome::Continue
    }

    fn draw(&self, frame: &mut Frame, field: Playfield) {
        let road = self.road(field);
        for x in [road.left(), road.right()] {
            frame.line(Vec2::new(x, 0.0), Vec2::new(x, field.height), Style::Guide);
        }
        frame.entities(&self.obstacles, Style::Hazard);
        frame.entities(&self.orbs, Style::Collectible);
        frame.rect(self.car.body, Style::Vehicle);
    }
}
