//! Shadow Strike: side-on platformer
//!
//! Gravity, jumping between fixed platforms, patrolling enemies with a short
//! damage cooldown, orbs that appear on platforms. Falling off ends the run.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::renderer::frame::{Frame, Style};
use crate::sim::collision::Rect;
use crate::sim::entity::{
    Actor, Entity, IdAllocator, Playfield, advance_all, compact, orb, roll, uniform,
};
use crate::sim::input::{Bindings, CanvasTouch, Control};
use crate::sim::state::EndReason;
use crate::sim::tick::{Game, StepContext, StepOutcome};
use crate::tuning::ShadowStrikeTuning;

const BINDINGS: Bindings = Bindings {
    keys: &[
        ("ArrowLeft", Control::Left),
        ("ArrowRight", Control::Right),
        ("ArrowUp", Control::Jump),
        ("Space", Control::Jump),
    ],
    buttons: &[
        ("leftBtn", Control::Left),
        ("rightBtn", Control::Right),
        ("jumpBtn", Control::Jump),
    ],
    canvas: CanvasTouch::Ignore,
};

pub struct ShadowStrike {
    tuning: ShadowStrikeTuning,
    actor: Actor,
    platforms: Vec<Rect>,
    enemies: Vec<Entity>,
    orbs: Vec<Entity>,
    /// Ticks left before enemy contact can hurt again
    damage_cooldown: u32,
    ids: IdAllocator,
}

impl ShadowStrike {
    pub fn new(tuning: ShadowStrikeTuning) -> Self {
        let field = tuning.playfield;
        let mut game = Self {
            actor: Actor::new(Rect::default()),
            platforms: Vec::new(),
            enemies: Vec::new(),
            orbs: Vec::new(),
            damage_cooldown: 0,
            ids: IdAllocator::default(),
            tuning,
        };
        game.build_level(field);
        game
    }

    fn build_level(&mut self, field: Playfield) {
        let t = &self.tuning;
        self.actor = Actor::new(Rect::new(
            t.actor_start_x,
            field.height - t.actor_start_offset,
            t.actor_size,
            t.actor_size,
        ));

        self.platforms = (0..t.platform_count)
            .map(|i| {
                let row = (i % 3) as f32;
                Rect {
                    pos: Vec2::new(
                        i as f32 * t.platform_spacing + 50.0,
                        field.height - t.platform_base - row * t.platform_step,
                    ),
                    size: t.platform_size,
                }
            })
            .collect();

        self.ids.reset();
        self.enemies.clear();
        for i in 0..t.enemy_count {
            let id = self.ids.next_id();
            let body = Rect::new(
                t.enemy_first_x + i as f32 * t.enemy_spacing,
                field.height - t.enemy_offset,
                t.enemy_size,
                t.enemy_size,
            );
            self.enemies
                .push(Entity::new(id, body, Vec2::new(t.enemy_speed, 0.0)));
        }
        self.orbs.clear();
        self.damage_cooldown = 0;
    }

    /// Reverse enemies that reach either side of the field
    fn patrol(&mut self, field: Playfield) {
        let speed = self.tuning.enemy_speed;
        for e in self.enemies.iter_mut() {
            let b = e.bounds();
            if b.left() < 0.0 {
                e.vel.x = speed;
            } else if b.right() > field.width {
                e.vel.x = -speed;
            }
        }
    }

    fn spawn_orb(&mut self, rng: &mut Pcg32) {
        let t = &self.tuning;
        if self.platforms.is_empty() || self.orbs.len() >= t.max_orbs || !roll(rng, t.orb_chance)
        {
            return;
        }
        let p = self.platforms[rng.random_range(0..self.platforms.len())];
        let x = p.left() + uniform(rng, 0.0, p.size.x);
        let id = self.ids.next_id();
        self.orbs
            .push(orb(id, Vec2::new(x, p.top() - t.orb_radius), t.orb_radius, Vec2::ZERO));
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }
}

impl Game for ShadowStrike {
    fn name(&self) -> &'static str {
        "shadow-strike"
    }

    fn playfield(&self) -> Playfield {
        self.tuning.playfield
    }

    fn max_health(&self) -> Option<i32> {
        Some(self.tuning.max_health)
    }

    fn bindings(&self) -> Bindings {
        BINDINGS
    }

    fn player_body(&self) -> Option<Rect> {
        Some(self.actor.body)
    }

    fn reset(&mut self, field: Playfield, _rng: &mut Pcg32) {
        self.build_level(field);
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
        let field = ctx.field;
        let t = &self.tuning;

        if ctx.intent.jump && self.actor.on_ground {
            self.actor.vel.y = -t.jump_impulse;
        }
        self.actor.vel.x = ctx.intent.dx * t.move_speed;
        self.actor.integrate(t.gravity);
        self.actor.land_on(&self.platforms, |a| a.vel.y + 1.0);

        advance_all(&mut self.enemies);
        self.patrol(field);
        self.damage_cooldown = self.damage_cooldown.saturating_sub(1);
        let body = self.actor.body;
        if self.damage_cooldown == 0 && self.enemies.iter().any(|e| e.hits(&body)) {
            ctx.session.damage(self.tuning.contact_damage);
            self.damage_cooldown = self.tuning.damage_cooldown;
        }

        self.spawn_orb(ctx.rng);
        for o in self.orbs.iter_mut().filter(|o| o.hits(&body)) {
            o.alive = false;
            ctx.session.score.add(self.tuning.orb_points);
        }
        compact(&mut self.orbs);

        field.clamp_x(&mut self.actor.body);
        if self.actor.body.top() > field.height {
            return StepOutcome::End(EndReason::Fell);
        }

        ctx.session.score.add(self.tuning.passive_points);
        StepOutcome::Continue
    }

    fn draw(&self, frame: &mut Frame, _field: Playfield) {
        for p in &self.platforms {
            frame.outline(*p, Style::Platform);
        }
        frame.entities(&self.enemies, Style::Hazard);
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

    fn started() -> GameLoop<ShadowStrike> {
        let mut game = GameLoop::new(Box::new(ShadowStrike::new(ShadowStrikeTuning::default())), 5);
        game.command(Command::Start);
        game
    }

    #[test]
    fn test_level_layout() {
        let game = started();
        let g = game.game();
        assert_eq!(g.platforms.len(), 12);
        assert_eq!(g.platforms[0], Rect::new(50.0, 500.0, 200.0, 20.0));
        assert_eq!(g.platforms[1], Rect::new(300.0, 450.0, 200.0, 20.0));
        assert_eq!(g.enemies.len(), 6);
        assert_eq!(g.enemies[0].bounds(), Rect::new(300.0, 460.0, 40.0, 40.0));
    }

    #[test]
    fn test_actor_lands_on_first_platform() {
        let mut game = started();
        game.run_ticks(30);
        let actor = game.game().actor();
        assert!(actor.on_ground);
        assert_eq!(actor.body.bottom(), 500.0);
    }

    #[test]
    fn test_jump_leaves_ground() {
        let mut game = started();
        game.run_ticks(30);
        game.handle_input(InputEvent::KeyDown("ArrowUp"));
        game.tick();
        assert!(!game.game().actor().on_ground);
        assert!(game.game().actor().body.bottom() < 500.0);
    }

    #[test]
    fn test_contact_damage_has_cooldown() {
        let mut game = started();
        game.run_ticks(30);
        let body = game.game().actor().body;
        game.game_mut().enemies = vec![Entity::new(99, body, Vec2::ZERO)];
        game.tick();
        assert_eq!(game.session().health.map(|h| h.current()), Some(90));
        game.run_ticks(10);
        assert_eq!(game.session().health.map(|h| h.current()), Some(90));
        game.run_ticks(25);
        assert_eq!(game.session().health.map(|h| h.current()), Some(80));
    }

    #[test]
    fn test_enemies_turn_at_edges() {
        let mut game = started();
        game.game_mut().enemies = vec![Entity::new(
            1,
            Rect::new(759.0, 0.0, 40.0, 40.0),
            Vec2::new(2.0, 0.0),
        )];
        game.tick();
        assert_eq!(game.game().enemies[0].vel.x, -2.0);
    }

    #[test]
    fn test_falling_off_ends_run() {
        let mut game = started();
        game.game_mut().platforms.clear();
        game.run_ticks(200);
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.session().end_reason, Some(EndReason::Fell));
    }

    #[test]
    fn test_orbs_are_capped() {
        let mut tuning = ShadowStrikeTuning::default();
        tuning.orb_chance = 1.0;
        tuning.max_orbs = 3;
        let mut game = GameLoop::new(Box::new(ShadowStrike::new(tuning)), 5);
        game.command(Command::Start);
        game.run_ticks(20);
        assert!(game.game().orbs.len() <= 3);
    }
}
