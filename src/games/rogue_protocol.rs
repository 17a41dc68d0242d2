//! Rogue Protocol: top-down dodger
//!
//! Eight-way movement. Enemies drift down and cost health on contact; items
//! drift down slower and score when collected.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::renderer::frame::{Frame, Style};
use crate::sim::collision::Rect;
use crate::sim::entity::{
    Actor, Edge, Entity, IdAllocator, Playfield, SpawnTimer, advance_all, compact, cull_exited,
    uniform,
};
use crate::sim::input::{ARROW_KEYS, Bindings, CanvasTouch, DPAD_BUTTONS};
use crate::sim::tick::{Game, StepContext, StepOutcome};
use crate::tuning::RogueProtocolTuning;

const BINDINGS: Bindings = Bindings {
    keys: &ARROW_KEYS,
    buttons: &DPAD_BUTTONS,
    canvas: CanvasTouch::Ignore,
};

pub struct RogueProtocol {
    tuning: RogueProtocolTuning,
    actor: Actor,
    enemies: Vec<Entity>,
    items: Vec<Entity>,
    enemy_timer: SpawnTimer,
    item_timer: SpawnTimer,
    ids: IdAllocator,
}

impl RogueProtocol {
    pub fn new(tuning: RogueProtocolTuning) -> Self {
        Self {
            actor: Self::start_actor(&tuning),
            enemies: Vec::new(),
            items: Vec::new(),
            enemy_timer: SpawnTimer::new(tuning.enemy_interval),
            item_timer: SpawnTimer::new(tuning.item_interval),
            ids: IdAllocator::default(),
            tuning,
        }
    }

    fn start_actor(t: &RogueProtocolTuning) -> Actor {
        Actor::new(Rect {
            pos: t.actor_start,
            size: Vec2::splat(t.actor_size),
        })
    }

    /// Drop a square of side `size` from above a random column
    fn drop_from_top(
        &mut self,
        field: Playfield,
        rng: &mut Pcg32,
        size: f32,
        speed: (f32, f32),
    ) -> Entity {
        let x = uniform(rng, 0.0, field.width - size);
        let dy = uniform(rng, speed.0, speed.1);
        Entity::new(
            self.ids.next_id(),
            Rect::new(x, -size, size, size),
            Vec2::new(0.0, dy),
        )
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }
}

impl Game for RogueProtocol {
    fn name(&self) -> &'static str {
        "rogue-protocol"
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
        self.enemies.clear();
        self.items.clear();
        self.enemy_timer.reset();
        self.item_timer.reset();
        self.ids.reset();
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
        let field = ctx.field;
        self.actor.steer(ctx.intent.axis(), self.tuning.move_speed);
        field.clamp(&mut self.actor.body);

        if self.enemy_timer.tick() {
            let (size, speed) = (
                self.tuning.enemy_size,
                (self.tuning.enemy_speed_min, self.tuning.enemy_speed_max),
            );
            let enemy = self.drop_from_top(field, ctx.rng, size, speed);
            self.enemies.push(enemy);
        }
        if self.item_timer.tick() {
            let (size, speed) = (
                self.tuning.item_size,
                (self.tuning.item_speed_min, self.tuning.item_speed_max),
            );
            let item = self.drop_from_top(field, ctx.rng, size, speed);
            self.items.push(item);
        }
        advance_all(&mut self.enemies);
        advance_all(&mut self.items);

        let body = self.actor.body;
        for enemy in self.enemies.iter_mut().filter(|e| e.hits(&body)) {
            enemy.alive = false;
            ctx.session.damage(self.tuning.contact_damage);
        }
        for item in self.items.iter_mut().filter(|i| i.hits(&body)) {
            item.alive = false;
            ctx.session.score.add(self.tuning.item_points);
        }

        cull_exited(&mut self.enemies, &field, Edge::Bottom);
        cull_exited(&mut self.items, &field, Edge::Bottom);
        compact(&mut self.enemies);
        compact(&mut self.items);
        StepOutcome::Continue
    }

    fn draw(&self, frame: &mut Frame, _field: Playfield) {
        frame.entities(&self.enemies, Style::Hazard);
        frame.entities(&self.items, Style::Collectible);
        frame.rect(self.actor.body, Style::Player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::InputEvent;
    use crate::sim::state::Phase;
    use crate::sim::tick::{Command, GameLoop};

    fn started() -> GameLoop<RogueProtocol> {
        let mut game =
            GameLoop::new(Box::new(RogueProtocol::new(RogueProtocolTuning::default())), 21);
        game.command(Command::Start);
        game
    }

    #[test]
    fn test_enemy_contact_damages_and_removes() {
        let mut game = started();
        game.game_mut()
            .enemies
            .push(Entity::new(1, Rect::new(240.0, 395.0, 20.0, 20.0), Vec2::ZERO));
        game.tick();
        assert_eq!(game.session().health.map(|h| h.current()), Some(90));
        assert!(game.game().enemies.is_empty());
    }

    #[test]
    fn test_simultaneous_contacts_all_apply() {
        let mut game = started();
        for id in 0..3 {
            game.game_mut()
                .enemies
                .push(Entity::new(id, Rect::new(245.0, 405.0, 5.0, 5.0), Vec2::ZERO));
        }
        game.tick();
        assert_eq!(game.session().health.map(|h| h.current()), Some(70));
    }

    #[test]
    fn test_item_scores_five() {
        let mut game = started();
        game.game_mut()
            .items
            .push(Entity::new(1, Rect::new(250.0, 410.0, 15.0, 15.0), Vec2::ZERO));
        game.tick();
        assert_eq!(game.session().score.whole(), 5);
    }

    #[test]
    fn test_timers_spawn_on_schedule() {
        let mut game = started();
        game.run_ticks(79);
        assert!(game.game().enemies.is_empty());
        game.tick();
        assert_eq!(game.game().enemies.len(), 1);
        let enemy = game.game().enemies[0].bounds();
        assert!(enemy.left() >= 0.0 && enemy.right() <= 500.0);
    }

    #[test]
    fn test_health_clamped_and_game_over_once() {
        let mut game = started();
        for id in 0..15 {
            game.game_mut()
                .enemies
                .push(Entity::new(id, Rect::new(245.0, 405.0, 5.0, 5.0), Vec2::ZERO));
        }
        game.tick();
        assert_eq!(game.session().health.map(|h| h.current()), Some(0));
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_diagonal_movement_clamped() {
        let mut game = started();
        game.handle_input(InputEvent::KeyDown("ArrowRight"));
        game.handle_input(InputEvent::KeyDown("ArrowDown"));
        game.run_ticks(100);
        let body = game.game().actor().body;
        assert_eq!(body.right(), 500.0);
        assert_eq!(body.bottom(), 500.0);
    }
}
