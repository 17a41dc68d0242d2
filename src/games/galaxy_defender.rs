//! Galaxy Defender: vertical shooter
//!
//! Enemies descend on a fixed timer. Shooting one scores; letting one through
//! costs health; touching one ends the run.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::renderer::frame::{Frame, Style};
use crate::sim::collision::Rect;
use crate::sim::entity::{
    Actor, Edge, Entity, IdAllocator, Playfield, SpawnTimer, advance_all, compact, cull_exited,
    uniform,
};
use crate::sim::input::{Bindings, CanvasTouch, Control};
use crate::sim::state::EndReason;
use crate::sim::tick::{Game, StepContext, StepOutcome};
use crate::tuning::GalaxyDefenderTuning;

const BINDINGS: Bindings = Bindings {
    keys: &[
        ("ArrowLeft", Control::Left),
        ("ArrowRight", Control::Right),
        ("ArrowUp", Control::Fire),
        ("Space", Control::Fire),
    ],
    buttons: &[
        ("leftBtn", Control::Left),
        ("rightBtn", Control::Right),
        ("shootBtn", Control::Fire),
    ],
    canvas: CanvasTouch::Ignore,
};

pub struct GalaxyDefender {
    tuning: GalaxyDefenderTuning,
    actor: Actor,
    bullets: Vec<Entity>,
    enemies: Vec<Entity>,
    enemy_timer: SpawnTimer,
    ids: IdAllocator,
}

impl GalaxyDefender {
    pub fn new(tuning: GalaxyDefenderTuning) -> Self {
        let field = tuning.playfield;
        Self {
            actor: Self::start_actor(&tuning, field),
            bullets: Vec::new(),
            enemies: Vec::new(),
            enemy_timer: SpawnTimer::new(tuning.enemy_interval),
            ids: IdAllocator::default(),
            tuning,
        }
    }

    fn start_actor(t: &GalaxyDefenderTuning, field: Playfield) -> Actor {
        let size = t.actor_size;
        let mut body = Rect::new(
            field.width / 2.0 - size / 2.0,
            field.height - t.actor_offset,
            size,
            size,
        );
        field.clamp(&mut body);
        Actor::new(body)
    }

    fn fire(&mut self) {
        let t = &self.tuning;
        let body = self.actor.body;
        let pos = Vec2::new(
            body.center().x - t.bullet_size.x / 2.0,
            body.top() - t.bullet_size.y / 2.0,
        );
        let id = self.ids.next_id();
        self.bullets.push(Entity::new(
            id,
            Rect {
                pos,
                size: t.bullet_size,
            },
            Vec2::new(0.0, -t.bullet_speed),
        ));
    }

    fn spawn_enemy(&mut self, field: Playfield, rng: &mut Pcg32) {
        let size = self.tuning.enemy_size;
        let x = uniform(rng, 0.0, field.width - size);
        let id = self.ids.next_id();
        log::debug!("galaxy-defender: enemy {id} at x={x:.0}");
        self.enemies.push(Entity::new(
            id,
            Rect::new(x, -size, size, size),
            Vec2::new(0.0, self.tuning.enemy_speed),
        ));
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }
}

impl Game for GalaxyDefender {
    fn name(&self) -> &'static str {
        "galaxy-defender"
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
        self.actor = Self::start_actor(&self.tuning, field);
        self.bullets.clear();
        self.enemies.clear();
        self.enemy_timer.reset();
        self.ids.reset();
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
        let field = ctx.field;
        let t = &self.tuning;

        // Eased horizontal motion
        let target = ctx.intent.dx * t.move_speed;
        self.actor.body.pos.x += self.actor.vel.x;
        self.actor.vel.x += (target - self.actor.vel.x) * t.easing;
        field.clamp_x(&mut self.actor.body);

        for _ in 0..ctx.intent.fire {
            self.fire();
        }
        advance_all(&mut self.bullets);
        cull_exited(&mut self.bullets, &field, Edge::Top);

        if self.enemy_timer.tick() {
            self.spawn_enemy(field, ctx.rng);
        }
        advance_all(&mut self.enemies);

        let body = self.actor.body;
        for enemy in self.enemies.iter_mut() {
            if field.has_exited(&enemy.bounds(), Edge::Bottom) {
                enemy.alive = false;
                ctx.session.damage(self.tuning.escape_damage);
                continue;
            }
            if enemy.hits(&body) {
                return StepOutcome::End(EndReason::Collision);
            }
            // One bullet per enemy
            if let Some(bullet) = self
                .bullets
                .iter_mut()
                .find(|b| b.alive && b.shape.overlaps(&enemy.shape))
            {
                bullet.alive = false;
                enemy.alive = false;
                ctx.session.score.add(self.tuning.kill_points);
            }
        }
        compact(&mut self.enemies);
        compact(&mut self.bullets);

        ctx.session.score.add(self.tuning.passive_points);
        StepOutcome::Continue
    }

    fn draw(&self, frame: &mut Frame, _field: Playfield) {
        frame.entities(&self.enemies, Style::Hazard);
        frame.entities(&self.bullets, Style::Projectile);
        frame.rect(self.actor.body, Style::Player);
    }
}
