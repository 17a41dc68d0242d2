//! Draw list handed from the simulation to a presenter
//!
//! A `Frame` describes what to draw this tick in world coordinates. It carries
//! no pixel detail; presenters decide colors, glow and scaling.

use glam::Vec2;
use serde::Serialize;

use crate::sim::collision::{Circle, Rect, Shape};
use crate::sim::entity::Entity;
use crate::sim::state::{Phase, Session};

/// Semantic style tag, mapped to colors by the presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Style {
    Player,
    Hazard,
    Collectible,
    Projectile,
    Platform,
    /// Road edges, ground lines
    Guide,
    /// Opposing vehicle in the driving game
    Vehicle,
    /// Puzzle tile with its value (0 = empty slot)
    Tile(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCmd {
    Rect { rect: Rect, style: Style, outline: bool },
    Circle { circle: Circle, style: Style },
    Line { from: Vec2, to: Vec2, style: Style },
    Label { pos: Vec2, text: String, style: Style },
}

/// Score/health readout
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    /// (current, max)
    pub health: Option<(i32, i32)>,
    pub phase: Phase,
}

impl Hud {
    pub fn from_session(session: &Session) -> Self {
        Self {
            score: session.score.whole(),
            health: session.health.map(|h| (h.current(), h.max())),
            phase: session.phase,
        }
    }
}

/// Menu layer shown on top of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Overlay {
    None,
    /// Start button
    Menu,
    /// Resume button
    Paused,
    /// Final score and restart button
    GameOver { score: u64 },
}

impl Overlay {
    pub fn for_session(session: &Session) -> Self {
        match session.phase {
            Phase::Menu => Overlay::Menu,
            Phase::Playing => Overlay::None,
            Phase::Paused => Overlay::Paused,
            Phase::GameOver => Overlay::GameOver {
                score: session.score.whole(),
            },
        }
    }

    pub fn title(&self) -> Option<&'static str> {
        match self {
            Overlay::None => None,
            Overlay::Menu => Some("START"),
            Overlay::Paused => Some("PAUSED"),
            Overlay::GameOver { .. } => Some("GAME OVER"),
        }
    }
}

/// One full redraw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// World-space region the presenter should fit to its surface
    pub view: Rect,
    pub commands: Vec<DrawCmd>,
    pub hud: Hud,
    pub overlay: Overlay,
}

impl Frame {
    pub fn new(view: Rect) -> Self {
        Self {
            view,
            commands: Vec::new(),
            hud: Hud {
                score: 0,
                health: None,
                phase: Phase::Menu,
            },
            overlay: Overlay::None,
        }
    }

    pub fn rect(&mut self, rect: Rect, style: Style) {
        self.commands.push(DrawCmd::Rect {
            rect,
            style,
            outline: false,
        });
    }

    pub fn outline(&mut self, rect: Rect, style: Style) {
        self.commands.push(DrawCmd::Rect {
            rect,
            style,
            outline: true,
        });
    }

    pub fn circle(&mut self, circle: Circle, style: Style) {
        self.commands.push(DrawCmd::Circle { circle, style });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, style: Style) {
        self.commands.push(DrawCmd::Line { from, to, style });
    }

    pub fn label(&mut self, pos: Vec2, text: impl Into<String>, style: Style) {
        self.commands.push(DrawCmd::Label {
            pos,
            text: text.into(),
            style,
        });
    }

    pub fn shape(&mut self, shape: &Shape, style: Style) {
        match shape {
            Shape::Rect(r) => self.rect(*r, style),
            Shape::Circle(c) => self.circle(*c, style),
        }
    }

    /// Draw every live entity in the list
    pub fn entities<'a>(&mut self, entities: impl IntoIterator<Item = &'a Entity>, style: Style) {
        for e in entities.into_iter().filter(|e| e.alive) {
            self.shape(&e.shape, style);
        }
    }

    /// Number of commands using a style (handy for presenters and tests)
    pub fn count(&self, style: Style) -> usize {
        self.commands
            .iter()
            .filter(|c| match c {
                DrawCmd::Rect { style: s, .. }
                | DrawCmd::Circle { style: s, .. }
                | DrawCmd::Line { style: s, .. }
                | DrawCmd::Label { style: s, .. } => *s == style,
            })
            .count()
    }
}

/// Sink for finished frames
pub trait Presenter {
    fn present(&mut self, frame: &Frame);
}
