//! Character-grid presenter for native runs and debugging
//!
//! Scales the frame's view onto a fixed grid of cells, one glyph per style.

use glam::Vec2;

use super::frame::{DrawCmd, Frame, Presenter, Style};

fn glyph(style: Style) -> char {
    match style {
        Style::Player => '@',
        Style::Hazard => '#',
        Style::Collectible => 'o',
        Style::Projectile => '|',
        Style::Platform => '=',
        Style::Guide => ':',
        Style::Vehicle => 'H',
        Style::Tile(0) => '.',
        Style::Tile(_) => '+',
    }
}

pub struct TextPresenter {
    cols: usize,
    rows: usize,
    cells: Vec<char>,
    status: String,
}

impl TextPresenter {
    pub fn new(cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![' '; cols * rows],
            status: String::new(),
        }
    }

    /// World point to fractional grid coordinates
    fn grid_pos(&self, frame: &Frame, p: Vec2) -> Vec2 {
        let view = frame.view;
        let rel = (p - view.pos) / view.size.max(Vec2::splat(f32::EPSILON));
        rel * Vec2::new(self.cols as f32, self.rows as f32)
    }

    /// World point to (col, row), unclamped
    fn cell_of(&self, frame: &Frame, p: Vec2) -> (i64, i64) {
        let g = self.grid_pos(frame, p).floor();
        (g.x as i64, g.y as i64)
    }

    /// Last cell touched by a span ending at `p`
    fn last_cell(&self, frame: &Frame, p: Vec2) -> (i64, i64) {
        let g = self.grid_pos(frame, p).ceil() - Vec2::ONE;
        (g.x as i64, g.y as i64)
    }

    fn fill(&mut self, from: (i64, i64), to: (i64, i64), ch: char) {
        let c0 = from.0.max(0);
        let c1 = to.0.min(self.cols as i64 - 1);
        let r0 = from.1.max(0);
        let r1 = to.1.min(self.rows as i64 - 1);
        for r in r0..=r1 {
            for c in c0..=c1 {
                self.cells[r as usize * self.cols + c as usize] = ch;
            }
        }
    }

    /// The grid rows followed by the status line
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .cells
            .chunks(self.cols)
            .map(|row| row.iter().collect())
            .collect();
        lines.push(self.status.clone());
        lines
    }

    pub fn status(&self) -> &str {
        &self.status
    }
}

impl Presenter for TextPresenter {
    fn present(&mut self, frame: &Frame) {
        self.cells.fill(' ');
        for cmd in &frame.commands {
            match cmd {
                DrawCmd::Rect { rect, style, .. } => {
                    let from = self.cell_of(frame, rect.pos);
                    let to = self.last_cell(frame, rect.pos + rect.size);
                    self.fill(from, to, glyph(*style));
                }
                DrawCmd::Circle { circle, style } => {
                    let at = self.cell_of(frame, circle.center);
                    self.fill(at, at, glyph(*style));
                }
                DrawCmd::Line { .. } | DrawCmd::Label { .. } => {}
            }
        }

        let hud = &frame.hud;
        self.status = format!("{} score {}", hud.phase.as_str(), hud.score);
        if let Some((hp, max)) = hud.health {
            self.status.push_str(&format!(" hp {hp}/{max}"));
        }
        if let Some(title) = frame.overlay.title() {
            self.status.push_str(&format!(" [{title}]"));
        }
    }
}
