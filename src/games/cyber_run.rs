//! Cyber Run: endless side-scrolling runner
//!
//! The actor stays at a fixed x and jumps over ground obstacles scrolling in
//! from the right. Any obstacle contact ends the run.

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
use crate::tuning::CyberRunTuning;

const BINDINGS: Bindings = Bindings {
    keys: &[("Space", Control::Jump), ("ArrowUp", Control::Jump)],
    buttons: &[("jumpBtn", Control::Jump)],
    canvas: CanvasTouch::Press(Control::Jump),
};

pub struct CyberRun {
    tuning: CyberRunTuning,
    actor: Actor,
    obstacles: Vec<Entity>,
    orbs: Vec<Entity>,
    ids: IdAllocator,
}

impl CyberRun {
    pub fn new(tuning: CyberRunTuning) -> Self {
        let field = tuning.playfield;
        let mut game = Self {
            actor: Actor::new(Rect::default()),
            obstacles: Vec::new(),
            orbs: Vec::new(),
            ids: IdAllocator::default(),
            tuning,
        };
        game.place_actor(field);
        game
    }

    fn ground_y(&self, field: Playfield) -> f32 {
        field.height - self.tuning.ground_offset
    }

    fn place_actor(&mut self, field: Playfield) {
        let size = self.tuning.actor_size;
        let ground = self.ground_y(field);
        self.actor = Actor::new(Rect::new(self.tuning.actor_x, ground - size, size, size));
    }

    fn spawn(&mut self, field: Playfield, rng: &mut Pcg32) {
        let t = &self.tuning;
        let ground = self.ground_y(field);
        let scroll = Vec2::new(-t.scroll_speed, 0.0);

        if roll(rng, t.obstacle_chance) {
            let side = uniform(rng, t.obstacle_min, t.obstacle_max);
            let id = self.ids.next_id();
            let body = Rect::new(field.width, ground - side, side, side);
            self.obstacles.push(Entity::new(id, body, scroll));
        }
        if roll(rng, t.orb_chance) {
            let y = ground - t.orb_min_height - uniform(rng, 0.0, t.orb_height_range);
            let id = self.ids.next_id();
            self.orbs
                .push(orb(id, Vec2::new(field.width, y), t.orb_radius, scroll));
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }
}

impl Game for CyberRun {
    fn name(&self) -> &'static str {
        "cyber-run"
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
        self.place_actor(field);
        self.obstacles.clear();
        self.orbs.clear();
        self.ids.reset();
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
        let field = ctx.field;
        let ground = self.ground_y(field);

        if ctx.intent.jump && self.actor.on_ground {
            self.actor.vel.y = -self.tuning.jump_impulse;
        }
        self.actor.integrate(self.tuning.gravity);
        if self.actor.body.bottom() >= ground {
            self.actor.body.pos.y = ground - self.actor.body.size.y;
            self.actor.vel.y = 0.0;
            self.actor.on_ground = true;
        } else {
            self.actor.on_ground = false;
        }
        field.clamp_x(&mut self.actor.body);

        self.spawn(field, ctx.rng);
        advance_all(&mut self.obstacles);
        advance_all(&mut self.orbs);

        let body = self.actor.body;
        if self.obstacles.iter().any(|o| o.hits(&body)) {
            return StepOutcome::End(EndReason::Collision);
        }
        for o in self.orbs.iter_mut().filter(|o| o.hits(&body)) {
            o.alive = false;
            ctx.session.score.add(self.tuning.orb_points);
        }

        cull_exited(&mut self.obstacles, &field, Edge::Left);
        cull_exited(&mut self.orbs, &field, Edge::Left);
        compact(&mut self.obstacles);
        compact(&mut self.orbs);

        ctx.session.score.add(self.tuning.passive_points);
        StepOutcome::Continue
    }

    fn draw(&self, frame: &mut Frame, field: Playfield) {
        let ground = self.ground_y(field);
        frame.line(
            Vec2::new(0.0, ground),
            Vec2::new(field.width, ground),
            Style::Guide,
        );
        frame.entities(&self.obstacles, Style::Hazard);
        frame.entities(&self.orbs, Style::Collectible);
        frame.rect(self.actor.body, Style::Player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::InputEvent;
    use crate::sim::state::Phase;
    use crate::sim::tick::{Command, GameLoop};

    fn started() -> GameLoop<CyberRun> {
        let mut game = GameLoop::new(Box::new(CyberRun::new(CyberRunTuning::default())), 9);
        game.command(Command::Start);
        game
    }

    #[test]
    fn test_actor_starts_on_ground() {
        let game = started();
        let actor = game.game().actor();
        assert_eq!(actor.body.bottom(), 500.0);
        assert_eq!(actor.body.pos.x, 100.0);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut game = started();
        game.tick();
        assert!(game.game().actor().on_ground);
        game.handle_input(InputEvent::KeyDown("Space"));
        game.tick();
        let after_jump = game.game().actor().body.pos.y;
        assert!(after_jump < 460.0);
        assert!(!game.game().actor().on_ground);

        // A second press mid-air does nothing
        let vy = game.game().actor().vel.y;
        game.handle_input(InputEvent::KeyDown("Space"));
        game.tick();
        assert_eq!(game.game().actor().vel.y, vy + 1.0);
    }

    #[test]
    fn test_obstacle_contact_ends_run() {
        let mut game = started();
        game.tick();
        let id = 99;
        let obstacle = Entity::new(id, Rect::new(150.0, 450.0, 50.0, 50.0), Vec2::new(-6.0, 0.0));
        game.game_mut().obstacles.push(obstacle);
        game.run_ticks(20);
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_orb_pickup_scores() {
        let mut game = started();
        let actor = game.game().actor().body;
        game.game_mut()
            .orbs
            .push(orb(1, actor.center() + Vec2::new(6.0, 0.0), 10.0, Vec2::new(-6.0, 0.0)));
        game.tick();
        assert!(game.game().orbs.iter().all(|o| o.id != 1));
        assert!(game.session().score.value() >= 10.0);
    }

    #[test]
    fn test_entities_culled_past_left_edge() {
        let mut game = started();
        game.game_mut().obstacles.push(Entity::new(
            7,
            Rect::new(-40.0, 0.0, 40.0, 40.0),
            Vec2::new(-6.0, 0.0),
        ));
        game.tick();
        assert!(game.game().obstacles.iter().all(|o| o.id != 7));
    }

    #[test]
    fn test_restart_clears_entities() {
        let mut game = started();
        game.game_mut().obstacles.push(Entity::new(
            1,
            Rect::new(110.0, 460.0, 40.0, 40.0),
            Vec2::ZERO,
        ));
        game.tick();
        assert_eq!(game.phase(), Phase::GameOver);
        game.command(Command::Restart);
        assert!(game.game().obstacles.is_empty());
        assert!(game.game().orbs.is_empty());
        assert_eq!(game.session().score.whole(), 0);
    }
}
