//! Fixed timestep game loop and phase machine
//!
//! `GameLoop` owns the one `Session` of a running game, the player's `Intent`
//! and the seeded RNG. It advances the variant one tick at a time while the
//! phase is `Playing` and handles Menu/Paused/GameOver transitions.

use rand_pcg::Pcg32;

use super::entity::Playfield;
use super::input::{Bindings, InputEvent, Intent};
use super::state::{EndReason, Phase, RngState, Session};
use crate::renderer::frame::{Frame, Hud, Overlay};

/// Everything a variant may touch during one step
pub struct StepContext<'a> {
    pub intent: &'a Intent,
    pub session: &'a mut Session,
    pub rng: &'a mut Pcg32,
    pub field: Playfield,
}

/// Result of one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    End(EndReason),
}

/// A single game variant. All state lives in the implementor; the loop supplies the rest.
pub trait Game {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Default visible area
    fn playfield(&self) -> Playfield;

    /// `Some(max)` if the variant tracks health
    fn max_health(&self) -> Option<i32>;

    fn bindings(&self) -> Bindings;

    /// Back to initial entity sets and timers for a fresh run
    fn reset(&mut self, field: Playfield, rng: &mut Pcg32);

    /// Advance one tick
    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome;

    /// Emit draw commands for the current state
    fn draw(&self, frame: &mut Frame, field: Playfield);

    /// World-space region to present. Screen-space games use the playfield.
    fn view(&self, field: Playfield) -> crate::sim::collision::Rect {
        field.rect()
    }

    /// Player body in playfield coordinates. `None` for games without one
    /// or whose actor lives in its own world space.
    fn player_body(&self) -> Option<crate::sim::collision::Rect> {
        None
    }
}

/// Menu/overlay actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    TogglePause,
    Restart,
}

/// Keys that drive the phase machine rather than the actor
fn command_for_key(code: &str, phase: Phase) -> Option<Command> {
    match (code, phase) {
        ("Escape" | "KeyP", Phase::Playing | Phase::Paused) => Some(Command::TogglePause),
        ("Enter", Phase::Menu) => Some(Command::Start),
        ("Enter", Phase::GameOver) => Some(Command::Restart),
        _ => None,
    }
}

/// One running game instance
pub struct GameLoop<G: Game + ?Sized> {
    game: Box<G>,
    session: Session,
    intent: Intent,
    rng_state: RngState,
    rng: Pcg32,
    field: Playfield,
}

impl<G: Game + ?Sized> GameLoop<G> {
    pub fn new(game: Box<G>, seed: u64) -> Self {
        let field = game.playfield();
        let rng_state = RngState::new(seed);
        Self {
            session: Session::new(game.max_health()),
            rng: rng_state.to_rng(),
            rng_state,
            intent: Intent::default(),
            field,
            game,
        }
    }

    /// Override the visible area (before starting)
    pub fn with_playfield(mut self, field: Playfield) -> Self {
        self.field = field;
        self
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn playfield(&self) -> Playfield {
        self.field
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn intent(&self) -> &Intent {
        &self.intent
    }

    /// Apply a menu action. Returns true if the phase changed.
    pub fn command(&mut self, command: Command) -> bool {
        let phase = self.session.phase;
        let next = match (command, phase) {
            (Command::Start, Phase::Menu) | (Command::Restart, Phase::GameOver) => {
                self.begin_run();
                Phase::Playing
            }
            (Command::TogglePause, Phase::Playing) => Phase::Paused,
            (Command::TogglePause, Phase::Paused) => Phase::Playing,
            _ => {
                log::debug!("{}: ignoring {:?} in {}", self.game.name(), command, phase.as_str());
                return false;
            }
        };
        self.intent.clear_triggers();
        self.session.phase = next;
        log::debug!("{}: {} -> {}", self.game.name(), phase.as_str(), next.as_str());
        true
    }

    /// Pause if currently playing (tab hidden, window blur)
    pub fn auto_pause(&mut self) -> bool {
        if self.session.phase == Phase::Playing {
            log::info!("{}: auto-paused", self.game.name());
            self.command(Command::TogglePause)
        } else {
            false
        }
    }

    /// Route a raw input event. Returns true if it was mapped to anything.
    pub fn handle_input(&mut self, event: InputEvent<'_>) -> bool {
        if let InputEvent::KeyDown(code) = event {
            if let Some(command) = command_for_key(code, self.session.phase) {
                return self.command(command);
            }
        }
        self.game.bindings().apply(&mut self.intent, event)
    }

    /// Reset session, entities and timers for a new run
    fn begin_run(&mut self) {
        self.session.reset();
        self.session.runs += 1;
        self.intent.clear();
        self.game.reset(self.field, &mut self.rng);
        log::info!(
            "{}: run {} started (seed {})",
            self.game.name(),
            self.session.runs,
            self.rng_state.seed
        );
    }

    /// Advance one fixed tick. Does nothing unless the phase is `Playing`.
    pub fn tick(&mut self) -> Phase {
        if !self.session.phase.is_running() {
            return self.session.phase;
        }
        self.session.ticks += 1;

        let outcome = {
            let mut ctx = StepContext {
                intent: &self.intent,
                session: &mut self.session,
                rng: &mut self.rng,
                field: self.field,
            };
            self.game.step(&mut ctx)
        };
        self.intent.clear_triggers();

        let reason = match outcome {
            StepOutcome::End(reason) => Some(reason),
            StepOutcome::Continue if self.session.is_depleted() => Some(EndReason::HealthDepleted),
            StepOutcome::Continue => None,
        };
        if let Some(reason) = reason {
            self.end_run(reason);
        }
        self.session.phase
    }

    /// Run up to `n` ticks, stopping early if the phase leaves `Playing`
    pub fn run_ticks(&mut self, n: u32) -> Phase {
        for _ in 0..n {
            if self.tick() != Phase::Playing {
                break;
            }
        }
        self.session.phase
    }

    fn end_run(&mut self, reason: EndReason) {
        if self.session.phase != Phase::Playing {
            return;
        }
        self.session.phase = Phase::GameOver;
        self.session.end_reason = Some(reason);
        log::info!(
            "{}: game over ({:?}) score {} after {} ticks",
            self.game.name(),
            reason,
            self.session.score.whole(),
            self.session.ticks
        );
    }

    /// Build the full redraw for the current state
    pub fn frame(&self) -> Frame {
        let mut frame = Frame::new(self.game.view(self.field));
        if self.session.phase != Phase::Menu {
            self.game.draw(&mut frame, self.field);
        }
        frame.hud = Hud::from_session(&self.session);
        frame.overlay = Overlay::for_session(&self.session);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Rect;
    use crate::sim::entity::{Actor, Entity, advance_all, compact};
    use crate::sim::input::{ARROW_KEYS, CanvasTouch, Control};
    use glam::Vec2;

    /// Minimal variant: a hazard falls onto the actor every `period` ticks
    struct Dropper {
        actor: Actor,
        hazards: Vec<Entity>,
        lethal: bool,
        next_id: u32,
    }

    impl Dropper {
        fn new(lethal: bool) -> Self {
            Self {
                actor: Actor::new(Rect::new(40.0, 80.0, 20.0, 20.0)),
                hazards: Vec::new(),
                lethal,
                next_id: 0,
            }
        }
    }

    impl Game for Dropper {
        fn name(&self) -> &'static str {
            "dropper"
        }

        fn playfield(&self) -> Playfield {
            Playfield::new(100.0, 100.0)
        }

        fn max_health(&self) -> Option<i32> {
            Some(30)
        }

        fn bindings(&self) -> Bindings {
            Bindings {
                keys: &ARROW_KEYS,
                buttons: &[("fireBtn", Control::Fire)],
                canvas: CanvasTouch::Ignore,
            }
        }

        fn reset(&mut self, _field: Playfield, _rng: &mut Pcg32) {
            *self = Self::new(self.lethal);
        }

        fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
            self.actor.steer(ctx.intent.axis(), 5.0);
            ctx.field.clamp(&mut self.actor.body);
            if ctx.session.ticks % 5 == 1 {
                self.next_id += 1;
                let x = self.actor.body.pos.x;
                self.hazards.push(Entity::new(
                    self.next_id,
                    Rect::new(x, 60.0, 20.0, 20.0),
                    Vec2::new(0.0, 10.0),
                ));
            }
            advance_all(&mut self.hazards);
            for h in self.hazards.iter_mut() {
                if h.hits(&self.actor.body) {
                    h.alive = false;
                    if self.lethal {
                        return StepOutcome::End(EndReason::Collision);
                    }
                    ctx.session.damage(10);
                }
            }
            compact(&mut self.hazards);
            ctx.session.score.add(1.0);
            StepOutcome::Continue
        }

        fn draw(&self, frame: &mut Frame, _field: Playfield) {
            frame.rect(self.actor.body, crate::renderer::Style::Player);
        }
    }

    fn started(lethal: bool) -> GameLoop<Dropper> {
        let mut game = GameLoop::new(Box::new(Dropper::new(lethal)), 42);
        assert!(game.command(Command::Start));
        game
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut game = GameLoop::new(Box::new(Dropper::new(false)), 1);
        assert_eq!(game.tick(), Phase::Menu);
        assert_eq!(game.session().ticks, 0);
    }

    #[test]
    fn test_health_depletion_ends_once() {
        let mut game = started(false);
        let phase = game.run_ticks(1000);
        assert_eq!(phase, Phase::GameOver);
        assert_eq!(game.session().end_reason, Some(EndReason::HealthDepleted));
        let health = game.session().health.unwrap();
        assert_eq!(health.current(), 0);

        // Further ticks are inert
        let ticks = game.session().ticks;
        game.tick();
        assert_eq!(game.session().ticks, ticks);
        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn test_lethal_contact_ends_run() {
        let mut game = started(true);
        game.run_ticks(100);
        assert_eq!(game.session().end_reason, Some(EndReason::Collision));
    }

    #[test]
    fn test_pause_resumes_where_it_left_off() {
        let mut game = started(false);
        game.run_ticks(3);
        let score = game.session().score.whole();
        assert!(game.command(Command::TogglePause));
        game.run_ticks(50);
        assert_eq!(game.session().score.whole(), score);
        assert_eq!(game.phase(), Phase::Paused);
        assert!(game.command(Command::TogglePause));
        game.tick();
        assert_eq!(game.session().score.whole(), score + 1);
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut game = started(true);
        assert!(!game.command(Command::Restart));
        assert!(!game.command(Command::Start));
        game.run_ticks(100);
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(!game.command(Command::TogglePause));
        assert!(game.command(Command::Restart));
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut game = started(false);
        game.handle_input(InputEvent::KeyDown("ArrowLeft"));
        game.run_ticks(1000);
        assert_eq!(game.phase(), Phase::GameOver);
        assert!(game.session().score.whole() > 0);

        assert!(game.handle_input(InputEvent::KeyDown("Enter")));
        assert_eq!(game.phase(), Phase::Playing);
        assert_eq!(game.session().score.whole(), 0);
        assert_eq!(game.session().health.map(|h| h.current()), Some(30));
        assert!(game.game().hazards.is_empty());
        assert_eq!(game.game().actor.body.pos, Vec2::new(40.0, 80.0));
        assert_eq!(game.intent().dx, 0.0);
        assert_eq!(game.session().runs, 2);
    }

    #[test]
    fn test_actor_stays_in_bounds() {
        let mut game = started(false);
        game.handle_input(InputEvent::KeyDown("ArrowRight"));
        game.handle_input(InputEvent::KeyDown("ArrowDown"));
        for _ in 0..20 {
            game.tick();
            let body = game.game().actor.body;
            assert!(game.playfield().contains(&body));
        }
    }

    #[test]
    fn test_escape_toggles_pause() {
        let mut game = started(false);
        assert!(game.handle_input(InputEvent::KeyDown("Escape")));
        assert_eq!(game.phase(), Phase::Paused);
        assert!(game.handle_input(InputEvent::KeyDown("KeyP")));
        assert_eq!(game.phase(), Phase::Playing);
    }

    #[test]
    fn test_auto_pause_only_while_playing() {
        let mut game = GameLoop::new(Box::new(Dropper::new(false)), 3);
        assert!(!game.auto_pause());
        game.command(Command::Start);
        assert!(game.auto_pause());
        assert!(!game.auto_pause());
        assert_eq!(game.phase(), Phase::Paused);
    }

    #[test]
    fn test_frame_carries_hud_and_overlay() {
        let mut game = GameLoop::new(Box::new(Dropper::new(true)), 5);
        let frame = game.frame();
        assert_eq!(frame.overlay, Overlay::Menu);
        assert!(frame.commands.is_empty());

        game.command(Command::Start);
        game.run_ticks(100);
        let frame = game.frame();
        let score = game.session().score.whole();
        assert_eq!(frame.overlay, Overlay::GameOver { score });
        assert_eq!(frame.hud.score, score);
        assert_eq!(frame.count(crate::renderer::Style::Player), 1);
    }
}
