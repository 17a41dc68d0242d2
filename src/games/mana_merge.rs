//! Mana Merge: sliding tile-merge puzzle
//!
//! Turn based: nothing changes unless a slide is requested. The run ends when
//! the board is full and no neighbours match.

use rand_pcg::Pcg32;

use crate::renderer::frame::{Frame, Style};
use crate::sim::collision::Rect;
use crate::sim::entity::Playfield;
use crate::sim::input::{Bindings, CanvasTouch, Control, Direction};
use crate::sim::merge::Grid;
use crate::sim::state::EndReason;
use crate::sim::tick::{Game, StepContext, StepOutcome};
use crate::tuning::ManaMergeTuning;

const BINDINGS: Bindings = Bindings {
    keys: &[
        ("ArrowLeft", Control::Slide(Direction::Left)),
        ("ArrowRight", Control::Slide(Direction::Right)),
        ("ArrowUp", Control::Slide(Direction::Up)),
        ("ArrowDown", Control::Slide(Direction::Down)),
    ],
    buttons: &[
        ("leftBtn", Control::Slide(Direction::Left)),
        ("rightBtn", Control::Slide(Direction::Right)),
        ("upBtn", Control::Slide(Direction::Up)),
        ("downBtn", Control::Slide(Direction::Down)),
    ],
    canvas: CanvasTouch::Ignore,
};

/// Gap between a tile and its cell edge
const TILE_INSET: f32 = 5.0;

pub struct ManaMerge {
    tuning: ManaMergeTuning,
    grid: Grid,
    moves: u32,
}

impl ManaMerge {
    pub fn new(tuning: ManaMergeTuning) -> Self {
        Self {
            grid: Grid::new(tuning.grid_size),
            moves: 0,
            tuning,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Slides that changed the board this run
    pub fn moves(&self) -> u32 {
        self.moves
    }
}

impl Game for ManaMerge {
    fn name(&self) -> &'static str {
        "mana-merge"
    }

    fn playfield(&self) -> Playfield {
        Playfield::new(400.0, 400.0)
    }

    fn max_health(&self) -> Option<i32> {
        None
    }

    fn bindings(&self) -> Bindings {
        BINDINGS
    }

    fn reset(&mut self, _field: Playfield, rng: &mut Pcg32) {
        self.grid = Grid::new(self.tuning.grid_size);
        for _ in 0..self.tuning.initial_tiles {
            self.grid.spawn_tile(rng);
        }
        self.moves = 0;
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> StepOutcome {
        let Some(dir) = ctx.intent.slide else {
            return StepOutcome::Continue;
        };
        let result = self.grid.apply_move(dir, ctx.rng);
        if result.changed {
            self.moves += 1;
            ctx.session.score.add(result.score as f64);
            log::debug!(
                "mana-merge: {dir:?} +{} (max tile {})",
                result.score,
                self.grid.max_tile()
            );
        }
        if self.grid.has_moves() {
            StepOutcome::Continue
        } else {
            StepOutcome::End(EndReason::NoMoves)
        }
    }

    fn draw(&self, frame: &mut Frame, field: Playfield) {
        let n = self.grid.size();
        let cell = field.width.min(field.height) / n as f32;
        for (row, values) in self.grid.rows().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                let rect = Rect::new(
                    col as f32 * cell + TILE_INSET,
                    row as f32 * cell + TILE_INSET,
                    cell - 2.0 * TILE_INSET,
                    cell - 2.0 * TILE_INSET,
                );
                frame.rect(rect, Style::Tile(value));
                if value != 0 {
                    frame.label(rect.center(), value.to_string(), Style::Tile(value));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::InputEvent;
    use crate::sim::state::Phase;
    use crate::sim::tick::{Command, GameLoop};

    fn started() -> GameLoop<ManaMerge> {
        let mut game = GameLoop::new(Box::new(ManaMerge::new(ManaMergeTuning::default())), 31);
        game.command(Command::Start);
        game
    }

    #[test]
    fn test_starts_with_two_tiles() {
        let game = started();
        assert_eq!(game.game().grid().empty_cells().len(), 14);
    }

    #[test]
    fn test_idle_ticks_change_nothing() {
        let mut game = started();
        let before = game.game().grid().clone();
        game.run_ticks(100);
        assert_eq!(game.game().grid(), &before);
    }

    #[test]
    fn test_slide_merges_and_scores() {
        let mut game = started();
        game.game_mut().grid = Grid::from_rows(&[
            vec![2, 2, 4, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        game.handle_input(InputEvent::KeyDown("ArrowLeft"));
        game.tick();
        let grid = game.game().grid();
        assert_eq!(grid.get(0, 0), 4);
        assert_eq!(grid.get(0, 1), 4);
        assert_eq!(game.session().score.whole(), 4);
        // 4 + 4 plus the spawned tile
        assert!(grid.sum() == 10 || grid.sum() == 12);
        // One slide per key press
        game.tick();
        assert_eq!(game.game().moves(), 1);
    }

    #[test]
    fn test_stuck_board_ends_run() {
        let mut game = started();
        game.game_mut().grid = Grid::from_rows(&[
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 8],
        ])
        .unwrap();
        game.handle_input(InputEvent::ButtonDown("leftBtn"));
        game.tick();
        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.session().end_reason, Some(EndReason::NoMoves));
    }

    #[test]
    fn test_draws_one_tile_per_cell() {
        let game = started();
        let frame = game.frame();
        let tiles = frame
            .commands
            .iter()
            .filter(|c| matches!(c, crate::renderer::frame::DrawCmd::Rect { .. }))
            .count();
        assert_eq!(tiles, 16);
    }
}
