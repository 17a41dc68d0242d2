//! Sky Forge: endless ascent
//!
//! Platforms scroll upward; ones leaving the top reappear below the bottom and
//! award points. Falling through costs health and respawns the actor near the
//! top instead of ending the run outright.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::renderer::frame::{Frame, Style};
use crate::sim::collision::Rect;
use crate::sim::entity::{Actor, Playfield, uniform};
use crate::sim::input::{Bindings, CanvasTouch, Control};
use crate::sim::tick::{Game, StepContext, StepOutcome};
use crate::tuning::SkyForgeTuning;

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
        ("upBtn", Control::Jump),
    ],
    canvas: CanvasTouch::Ignore,
};

/// Platforms this far above the top edge get recycled
const RECYCLE_ABOVE: f32 = 10.0;

pub struct SkyForge {
    tuning: SkyForgeTuning,
    actor: Actor,
    platforms: Vec<Rect>,
}

impl SkyForge {
    pub fn new(tuning: SkyForgeTuning) -> Self {
        let field = tuning.playfield;
        Self {
            actor: Self::start_actor(&tuning, field),
            platforms: Vec::new(),
            tuning,
        }
    }

    fn start_actor(t: &SkyForgeTuning, field: Playfield) -> Actor {
        let size = t.actor_size;
        let mut actor = Actor::new(Rect::new(
            field.width / 2.0 - size / 2.0,
            field.height - 100.0,
            size,
            size,
        ));
        actor.on_ground = true;
        actor
    }

    fn random_platform(&self, field: Playfield, y: f32, rng: &mut Pcg32) -> Rect {
        let t = &self.tuning;
        let w = uniform(rng, t.platform_min_width, t.platform_max_width).min(field.width);
        let x = uniform(rng, 0.0, field.width - w);
        Rect::new(x, y, w, t.platform_height)
    }

    /// Evenly spaced stack from the bottom edge upward
    fn generate_platforms(&mut self, field: Playfield, rng: &mut Pcg32) {
        let count = self.tuning.platform_count;
        let spacing = (field.height / (count.saturating_sub(1).max(1)) as f32).floor();
        self.platforms = (0..count)
            .map(|i| self.random_platform(field, field.height - i as f32 * spacing, rng))
            .collect();
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn platforms(&self) -> &[Rect] {
        &self.platforms
    }
}

impl Game for SkyForge {
    fn name(&self) -> &'static str {
        "sky-forge"
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

    fn reset(&mut self, field: Playfield, rng: &mut Pcg32) {
        self.actor = Self::start_actor(&self.tuning, field);
        self.generate_platforms(field, rng);
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
        let field = ctx.field;
        let t = &self.tuning;

        if ctx.intent.jump && self.actor.on_ground {
            self.actor.vel.y = -t.jump_impulse;
            self.actor.on_ground = false;
        }
        self.actor.steer(Vec2::new(ctx.intent.dx, 0.0), t.move_speed);
        field.clamp_x(&mut self.actor.body);

        // Accelerate, then move
        self.actor.vel.y += t.gravity;
        self.actor.body.pos.y += self.actor.vel.y;
        let min_tolerance = t.landing_tolerance;
        self.actor
            .land_on(&self.platforms, |a| a.vel.y.abs().max(min_tolerance));

        let scroll = self.tuning.scroll_speed;
        for p in self.platforms.iter_mut() {
            p.pos.y -= scroll;
        }

        // Recycle from the back so indices stay valid while removing
        for i in (0..self.platforms.len()).rev() {
            if self.platforms[i].bottom() < -RECYCLE_ABOVE {
                self.platforms.remove(i);
                let y = field.height + uniform(ctx.rng, 0.0, self.tuning.respawn_spread);
                let fresh = self.random_platform(field, y, ctx.rng);
                self.platforms.push(fresh);
                ctx.session.score.add(self.tuning.platform_points);
            }
        }

        if self.actor.body.top() > field.height + self.tuning.fall_margin {
            log::debug!("sky-forge: fell, respawning");
            if ctx.session.damage(self.tuning.fall_damage) {
                return StepOutcome::Continue;
            }
            let margin = self.tuning.respawn_margin;
            let body = &mut self.actor.body;
            body.pos.y = self.tuning.respawn_y;
            body.pos.x = body
                .pos
                .x
                .clamp(margin, (field.width - body.size.x - margin).max(margin));
            field.clamp_x(body);
            self.actor.vel.y = 0.0;
        }

        ctx.session.score.add(self.tuning.passive_points);
        StepOutcome::Continue
    }

    fn draw(&self, frame: &mut Frame, _field: Playfield) {
        for p in &self.platforms {
            frame.rect(*p, Style::Platform);
        }
        frame.rect(self.actor.body, Style::Player);
    }
}
