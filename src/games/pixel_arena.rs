//! Pixel Arena: top-down shooter

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::renderer::frame::{Frame, Style};
use crate::sim::collision::Rect;
use crate::sim::entity::{
    Actor, Edge, Entity, IdAllocator, Playfield, SpawnTimer, advance_all, compact, cull_exited,
    uniform,
};
use crate::sim::input::{Bindings, CanvasTouch, Control};
use crate::sim::tick::{Game, StepContext, StepOutcome};
use crate::tuning::PixelArenaTuning;

const BINDINGS: Bindings = Bindings {
    keys: &[
        ("ArrowLeft", Control::Left),
        ("ArrowRight", Control::Right),
        ("ArrowUp", Control::Up),
        ("ArrowDown", Control::Down),
        ("Space", Control::Fire),
    ],
    buttons: &[
        ("leftBtn", Control::Left),
        ("rightBtn", Control::Right),
        ("upBtn", Control::Up),
        ("downBtn", Control::Down),
        ("shootBtn", Control::Fire),
    ],
    canvas: CanvasTouch::Ignore,
};

pub struct PixelArena {
    tuning: PixelArenaTuning,
    actor: Actor,
    bullets: Vec<Entity>,
    enemies: Vec<Entity>,
    enemy_timer: SpawnTimer,
    ids: IdAllocator,
}

impl PixelArena {
    pub fn new(tuning: PixelArenaTuning) -> Self {
        Self {
            actor: Self::start_actor(&tuning),
            bullets: Vec::new(),
            enemies: Vec::new(),
            enemy_timer: SpawnTimer::new(tuning.enemy_interval),
            ids: IdAllocator::default(),
            tuning,
        }
    }

    fn start_actor(t: &PixelArenaTuning) -> Actor {
        Actor::new(Rect {
            pos: t.actor_start,
            size: Vec2::splat(t.actor_size),
        })
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }
}

impl Game for PixelArena {
    fn name(&self) -> &'static str {
        "pixel-arena"
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

    fn reset(&mut self, _field: Playfield, _rng: &mut Pcg32) {
        self.actor = Self::start_actor(&self.tuning);
        self.bullets.clear();
        self.enemies.clear();
        self.enemy_timer.reset();
        self.ids.reset();
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
        let field = ctx.field;
        let t = &self.tuning;
        self.actor.steer(ctx.intent.axis(), t.move_speed);
        field.clamp(&mut self.actor.body);

        let body = self.actor.body;
        let size = t.bullet_size;
        for _ in 0..ctx.intent.fire {
            let rect = Rect::new(body.center().x - size / 2.0, body.top() - size, size, size);
            self.bullets.push(Entity::new(
                self.ids.next_id(),
                rect,
                Vec2::new(0.0, -t.bullet_speed),
            ));
        }
        advance_all(&mut self.bullets);
        cull_exited(&mut self.bullets, &field, Edge::Top);

        if self.enemy_timer.tick() {
            let size = t.enemy_size;
            let x = uniform(ctx.rng, 0.0, field.width - size);
            let y = uniform(ctx.rng, 0.0, t.enemy_spawn_band);
            let dy = uniform(ctx.rng, t.enemy_speed_min, t.enemy_speed_max);
            self.enemies.push(Entity::new(
                self.ids.next_id(),
                Rect::new(x, y, size, size),
                Vec2::new(0.0, dy),
            ));
        }
        advance_all(&mut self.enemies);

        let body = self.actor.body;
        for enemy in self.enemies.iter_mut() {
            if enemy.hits(&body) {
                enemy.alive = false;
                ctx.session.damage(self.tuning.contact_damage);
                continue;
            }
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
        cull_exited(&mut self.enemies, &field, Edge::Bottom);
        compact(&mut self.enemies);
        compact(&mut self.bullets);
        StepOutcome::Continue
    }

    fn draw(&self, frame: &mut Frame, _field: Playfield) {
        frame.entities(&self.enemies, Style::Hazard);
        frame.entities(&self.bullets, Style::Projectile);
        frame.rect(self.actor.body, Style::Player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::InputEvent;
    use crate::sim::state::Phase;
    use crate::sim::tick::{Command, GameLoop};

    fn started() -> GameLoop<PixelArena> {
        let mut game = GameLoop::new(Box::new(PixelArena::new(PixelArenaTuning::default())), 8);
        game.command(Command::Start);
        game
    }

    #[test]
    fn test_shot_enemy_scores_ten() {
        let mut game = started();
        game.handle_input(InputEvent::KeyDown("Space"));
        let body = game.game().actor().body;
        game.game_mut()
            .enemies
            .push(Entity::new(50, Rect::new(body.pos.x, body.top() - 40.0, 20.0, 20.0), Vec2::ZERO));
        game.run_ticks(5);
        assert!(game.game().enemies.is_empty());
        assert!(game.game().bullets.is_empty());
        assert_eq!(game.session().score.whole(), 10);
        assert_eq!(game.session().health.map(|h| h.current()), Some(100));
    }

    #[test]
    fn test_contact_costs_health() {
        let mut game = started();
        game.game_mut()
            .enemies
            .push(Entity::new(1, Rect::new(255.0, 255.0, 20.0, 20.0), Vec2::ZERO));
        game.tick();
        assert_eq!(game.session().health.map(|h| h.current()), Some(90));
    }

    #[test]
    fn test_enemies_leave_through_bottom() {
        let mut game = started();
        game.game_mut()
            .enemies
            .push(Entity::new(1, Rect::new(0.0, 499.0, 20.0, 20.0), Vec2::new(0.0, 4.0)));
        game.tick();
        assert!(game.game().enemies.is_empty());
    }

    #[test]
    fn test_restart_resets_actor() {
        let mut game = started();
        game.handle_input(InputEvent::KeyDown("ArrowLeft"));
        game.run_ticks(10);
        let body = game.game().actor().body;
        for id in 100..110 {
            game.game_mut()
                .enemies
                .push(Entity::new(id, body, Vec2::ZERO));
        }
        game.tick();
        assert_eq!(game.phase(), Phase::GameOver);
        game.command(Command::Restart);
        assert_eq!(game.game().actor().body.pos, Vec2::new(250.0, 250.0));
        assert!(game.game().enemies.is_empty());
    }
}
