//! Chrono Flip: gravity-flip dodger
//!
//! The actor rests on the floor or the ceiling. Flipping reverses gravity;
//! hazards and orbs always travel in the current gravity direction.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::renderer::frame::{Frame, Style};
use crate::sim::collision::Rect;
use crate::sim::entity::{
    Actor, Edge, Entity, IdAllocator, Playfield, advance_all, compact, orb, roll, uniform,
};
use crate::sim::input::{Bindings, CanvasTouch, Control};
use crate::sim::state::EndReason;
use crate::sim::tick::{Game, StepContext, StepOutcome};
use crate::tuning::ChronoFlipTuning;

const BINDINGS: Bindings = Bindings {
    keys: &[
        ("ArrowLeft", Control::Left),
        ("ArrowRight", Control::Right),
        ("ArrowUp", Control::Flip),
        ("Space", Control::Flip),
    ],
    buttons: &[
        ("leftBtn", Control::Left),
        ("rightBtn", Control::Right),
        ("flipBtn", Control::Flip),
    ],
    canvas: CanvasTouch::Press(Control::Flip),
};

pub struct ChronoFlip {
    tuning: ChronoFlipTuning,
    actor: Actor,
    /// +1 pulls toward the floor, -1 toward the ceiling
    gravity_sign: f32,
    obstacles: Vec<Entity>,
    orbs: Vec<Entity>,
    ids: IdAllocator,
}

impl ChronoFlip {
    pub fn new(tuning: ChronoFlipTuning) -> Self {
        let field = tuning.playfield;
        Self {
            actor: Self::start_actor(&tuning, field),
            gravity_sign: 1.0,
            obstacles: Vec::new(),
            orbs: Vec::new(),
            ids: IdAllocator::default(),
            tuning,
        }
    }

    fn start_actor(t: &ChronoFlipTuning, field: Playfield) -> Actor {
        Actor::new(Rect::new(
            field.width / 2.0,
            field.height - t.actor_start_offset,
            t.actor_size,
            t.actor_size,
        ))
    }

    pub fn gravity_sign(&self) -> f32 {
        self.gravity_sign
    }

    /// Edge hazards currently come from
    fn spawn_edge(&self) -> Edge {
        if self.gravity_sign > 0.0 {
            Edge::Top
        } else {
            Edge::Bottom
        }
    }

    fn spawn(&mut self, field: Playfield, rng: &mut Pcg32) {
        let t = &self.tuning;
        let from_top = self.spawn_edge() == Edge::Top;
        let vel = Vec2::new(0.0, t.travel_speed * self.gravity_sign);

        if roll(rng, t.obstacle_chance) {
            let size = t.obstacle_size;
            let x = uniform(rng, 0.0, field.width - size);
            let y = if from_top { -size } else { field.height };
            let id = self.ids.next_id();
            self.obstacles
                .push(Entity::new(id, Rect::new(x, y, size, size), vel));
        }
        if roll(rng, t.orb_chance) {
            let r = t.orb_radius;
            let x = uniform(rng, r, field.width - r);
            let y = if from_top { -r } else { field.height + r };
            let id = self.ids.next_id();
            self.orbs.push(orb(id, Vec2::new(x, y), r, vel));
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }
}

/// Remove entities that crossed the edge they were travelling toward
fn cull_by_heading(entities: &mut [Entity], field: &Playfield) {
    for e in entities.iter_mut() {
        let toward = if e.vel.y > 0.0 { Edge::Bottom } else { Edge::Top };
        if field.has_exited(&e.bounds(), toward) {
            e.alive = false;
        }
    }
}

impl Game for ChronoFlip {
    fn name(&self) -> &'static str {
        "chrono-flip"
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
        Some(self.actor.body)
    }

    fn reset(&mut self, field: Playfield, _rng: &mut Pcg32) {
        self.actor = Self::start_actor(&self.tuning, field);
        self.gravity_sign = 1.0;
        self.obstacles.clear();
        self.orbs.clear();
        self.ids.reset();
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
        let field = ctx.field;

        if ctx.intent.flip {
            self.gravity_sign = -self.gravity_sign;
            self.actor.vel.y = 0.0;
            log::debug!("chrono-flip: gravity {}", self.gravity_sign);
        }
        self.actor.steer(Vec2::new(ctx.intent.dx, 0.0), self.tuning.move_speed);
        self.actor
            .integrate(self.tuning.gravity * self.gravity_sign);

        // Floor and ceiling stop the fall
        field.clamp(&mut self.actor.body);
        self.actor.on_ground = if self.gravity_sign > 0.0 {
            self.actor.body.bottom() >= field.height
        } else {
            self.actor.body.top() <= 0.0
        };
        if self.actor.on_ground {
            self.actor.vel.y = 0.0;
        }

        advance_all(&mut self.obstacles);
        advance_all(&mut self.orbs);
        cull_by_heading(&mut self.obstacles, &field);
        cull_by_heading(&mut self.orbs, &field);

        let body = self.actor.body;
        if self.obstacles.iter().any(|o| o.hits(&body)) {
            return StepOutcome::End(EndReason::Collision);
        }
        for o in self.orbs.iter_mut().filter(|o| o.hits(&body)) {
            o.alive = false;
            ctx.session.score.add(self.tuning.orb_points);
        }
        compact(&mut self.obstacles);
        compact(&mut self.orbs);

        self.spawn(field, ctx.rng);
        ctx.session.score.add(self.tuning.passive_points);
        StepOutcome::Continue
    }

    fn draw(&self, frame: &mut Frame, _field: Playfield) {
        frame.entities(&self.obstacles, Style::Hazard);
        frame.entities(&self.orbs, Style::Collectible);
        frame.rect(self.actor.body, Style::Player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::InputEvent;
    use crate::sim::tick::{Command, GameLoop};

    fn started() -> GameLoop<ChronoFlip> {
        let mut tuning = ChronoFlipTuning::default();
        tuning.obstacle_chance = 0.0;
        tuning.orb_chance = 0.0;
        let mut game = GameLoop::new(Box::new(ChronoFlip::new(tuning)), 2);
        game.command(Command::Start);
        game
    }

    #[test]
    fn test_rests_on_floor_then_ceiling() {
        let mut game = started();
        game.run_ticks(20);
        assert_eq!(game.game().actor().body.bottom(), 600.0);
        assert!(game.game().actor().on_ground);

        game.handle_input(InputEvent::KeyDown("ArrowUp"));
        game.run_ticks(60);
        assert_eq!(game.game().gravity_sign(), -1.0);
        assert_eq!(game.game().actor().body.top(), 0.0);
    }

    #[test]
    fn test_spawns_follow_gravity() {
        let mut tuning = ChronoFlipTuning::default();
        tuning.obstacle_chance = 1.0;
        tuning.orb_chance = 0.0;
        let mut game = GameLoop::new(Box::new(ChronoFlip::new(tuning)), 2);
        game.command(Command::Start);
        game.tick();
        assert!(game.game().obstacles[0].vel.y > 0.0);

        game.handle_input(InputEvent::KeyDown("Space"));
        game.tick();
        let last = game.game().obstacles.last().unwrap();
        assert!(last.vel.y < 0.0);
        assert!(last.bounds().top() >= 600.0);
    }

    #[test]
    fn test_entities_culled_on_far_edge() {
        let mut game = started();
        game.game_mut().orbs.push(orb(1, Vec2::new(10.0, 605.0), 10.0, Vec2::new(0.0, 6.0)));
        game.game_mut().orbs.push(orb(2, Vec2::new(10.0, -5.0), 10.0, Vec2::new(0.0, -6.0)));
        game.game_mut().orbs.push(orb(3, Vec2::new(10.0, -5.0), 10.0, Vec2::new(0.0, 6.0)));
        game.tick();
        let ids: Vec<u32> = game.game().orbs.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_obstacle_contact_ends_run() {
        let mut game = started();
        let body = game.game().actor().body;
        game.game_mut()
            .obstacles
            .push(Entity::new(1, body, Vec2::ZERO));
        game.tick();
        assert_eq!(game.session().end_reason, Some(EndReason::Collision));
    }

    #[test]
    fn test_restart_restores_gravity() {
        let mut game = started();
        game.handle_input(InputEvent::KeyDown("ArrowUp"));
        game.tick();
        let body = game.game().actor().body;
        game.game_mut().obstacles.push(Entity::new(1, body, Vec2::ZERO));
        game.tick();
        game.command(Command::Restart);
        assert_eq!(game.game().gravity_sign(), 1.0);
        assert!(game.game().obstacles.is_empty());
    }
}
