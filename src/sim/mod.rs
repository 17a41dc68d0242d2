//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entity lists keep spawn order)
//! - No rendering surface or platform dependencies

pub mod clock;
pub mod collision;
pub mod entity;
pub mod input;
pub mod merge;
pub mod state;
pub mod tick;

pub use clock::{Clock, FrameScheduler, ManualClock};
pub use collision::{Circle, Rect, Shape};
pub use entity::{Actor, Edge, Entity, IdAllocator, Playfield, SpawnTimer};
pub use input::{Bindings, CanvasTouch, Control, Direction, InputEvent, Intent};
pub use merge::Grid;
pub use state::{EndReason, Health, Phase, Score, Session};
pub use tick::{Command, Game, GameLoop, StepContext, StepOutcome};
