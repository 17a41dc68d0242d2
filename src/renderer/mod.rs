//! Presentation
//!
//! The simulation produces a [`Frame`] each tick; a [`Presenter`] turns it into
//! pixels (Canvas 2D on the web) or characters (native).

pub mod frame;
pub mod skin;
pub mod text;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use frame::{DrawCmd, Frame, Hud, Overlay, Presenter, Style};
pub use skin::{Appearance, SkinTable};
pub use text::TextPresenter;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPresenter;
