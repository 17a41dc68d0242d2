//! Player intent and input bindings
//!
//! Input handlers never drive the simulation directly. They write into an
//! `Intent`, and the next executed tick reads whatever was written last.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Cardinal direction (tile slides, lanes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Abstract control a key or on-screen button maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    /// Held directions
    Left,
    Right,
    Up,
    Down,
    /// One-shot actions
    Jump,
    Fire,
    Flip,
    Slide(Direction),
}

/// Latest input state, consumed by the simulation step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Horizontal direction in {-1, 0, 1}
    pub dx: f32,
    /// Vertical direction in {-1, 0, 1} (screen space, down is positive)
    pub dy: f32,
    pub jump: bool,
    /// Fire presses since the last tick; each one is a shot
    pub fire: u8,
    pub flip: bool,
    pub slide: Option<Direction>,
}

impl Intent {
    pub fn press(&mut self, control: Control) {
        match control {
            Control::Left => self.dx = -1.0,
            Control::Right => self.dx = 1.0,
            Control::Up => self.dy = -1.0,
            Control::Down => self.dy = 1.0,
            Control::Jump => self.jump = true,
            Control::Fire => self.fire = self.fire.saturating_add(1),
            Control::Flip => self.flip = true,
            Control::Slide(dir) => self.slide = Some(dir),
        }
    }

    /// Releasing either horizontal key stops horizontal motion (and likewise vertical)
    pub fn release(&mut self, control: Control) {
        match control {
            Control::Left | Control::Right => self.dx = 0.0,
            Control::Up | Control::Down => self.dy = 0.0,
            _ => {}
        }
    }

    #[inline]
    pub fn axis(&self) -> Vec2 {
        Vec2::new(self.dx, self.dy)
    }

    /// Forget one-shot actions once a tick has seen them
    pub fn clear_triggers(&mut self) {
        self.jump = false;
        self.fire = 0;
        self.flip = false;
        self.slide = None;
    }

    /// Drop everything, held directions included
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Raw input from the platform layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent<'a> {
    /// `KeyboardEvent.code`, e.g. "ArrowLeft", "Space"
    KeyDown(&'a str),
    KeyUp(&'a str),
    /// Element id of an on-screen button
    ButtonDown(&'a str),
    ButtonUp(&'a str),
    /// Touch on the canvas itself, `x_frac` is the horizontal position in [0, 1]
    CanvasDown { x_frac: f32 },
    CanvasUp,
}

/// What a touch on the bare canvas does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasTouch {
    Ignore,
    Press(Control),
    /// Left half steers left, right half steers right
    SplitSteer,
}

/// Per-game input table
#[derive(Debug, Clone, Copy)]
pub struct Bindings {
    pub keys: &'static [(&'static str, Control)],
    pub buttons: &'static [(&'static str, Control)],
    pub canvas: CanvasTouch,
}

impl Bindings {
    /// Resolve an event to a control and whether it is a press.
    /// Unmapped keys and buttons yield `None`.
    pub fn resolve(&self, event: InputEvent<'_>) -> Option<(Control, bool)> {
        let lookup = |table: &[(&str, Control)], name: &str| {
            table.iter().find(|(k, _)| *k == name).map(|(_, c)| *c)
        };
        match event {
            InputEvent::KeyDown(code) => lookup(self.keys, code).map(|c| (c, true)),
            InputEvent::KeyUp(code) => lookup(self.keys, code).map(|c| (c, false)),
            InputEvent::ButtonDown(id) => lookup(self.buttons, id).map(|c| (c, true)),
            InputEvent::ButtonUp(id) => lookup(self.buttons, id).map(|c| (c, false)),
            InputEvent::CanvasDown { x_frac } => match self.canvas {
                CanvasTouch::Ignore => None,
                CanvasTouch::Press(c) => Some((c, true)),
                CanvasTouch::SplitSteer if x_frac < 0.5 => Some((Control::Left, true)),
                CanvasTouch::SplitSteer => Some((Control::Right, true)),
            },
            InputEvent::CanvasUp => match self.canvas {
                CanvasTouch::SplitSteer => Some((Control::Left, false)),
                _ => None,
            },
        }
    }

    /// Feed an event into the intent. Returns false if nothing was mapped.
    pub fn apply(&self, intent: &mut Intent, event: InputEvent<'_>) -> bool {
        match self.resolve(event) {
            Some((control, true)) => {
                intent.press(control);
                true
            }
            Some((control, false)) => {
                intent.release(control);
                true
            }
            None => false,
        }
    }
}

/// Arrow keys as held directions
pub const ARROW_KEYS: [(&str, Control); 4] = [
    ("ArrowLeft", Control::Left),
    ("ArrowRight", Control::Right),
    ("ArrowUp", Control::Up),
    ("ArrowDown", Control::Down),
];

/// On-screen direction pad
pub const DPAD_BUTTONS: [(&str, Control); 4] = [
    ("leftBtn", Control::Left),
    ("rightBtn", Control::Right),
    ("upBtn", Control::Up),
    ("downBtn", Control::Down),
];

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BINDINGS: Bindings = Bindings {
        keys: &[
            ("ArrowLeft", Control::Left),
            ("ArrowRight", Control::Right),
            ("Space", Control::Jump),
        ],
        buttons: &[("jumpBtn", Control::Jump)],
        canvas: CanvasTouch::SplitSteer,
    };

    #[test]
    fn test_last_write_wins() {
        let mut intent = Intent::default();
        TEST_BINDINGS.apply(&mut intent, InputEvent::KeyDown("ArrowLeft"));
        TEST_BINDINGS.apply(&mut intent, InputEvent::KeyDown("ArrowRight"));
        assert_eq!(intent.dx, 1.0);
        // Releasing the other key still stops motion
        TEST_BINDINGS.apply(&mut intent, InputEvent::KeyUp("ArrowLeft"));
        assert_eq!(intent.dx, 0.0);
    }

    #[test]
    fn test_unmapped_key_ignored() {
        let mut intent = Intent::default();
        assert!(!TEST_BINDINGS.apply(&mut intent, InputEvent::KeyDown("KeyQ")));
        assert_eq!(intent, Intent::default());
    }

    #[test]
    fn test_touch_matches_keyboard() {
        let mut by_key = Intent::default();
        let mut by_touch = Intent::default();
        TEST_BINDINGS.apply(&mut by_key, InputEvent::KeyDown("Space"));
        TEST_BINDINGS.apply(&mut by_touch, InputEvent::ButtonDown("jumpBtn"));
        assert_eq!(by_key, by_touch);
    }

    #[test]
    fn test_split_steer() {
        let mut intent = Intent::default();
        TEST_BINDINGS.apply(&mut intent, InputEvent::CanvasDown { x_frac: 0.2 });
        assert_eq!(intent.dx, -1.0);
        TEST_BINDINGS.apply(&mut intent, InputEvent::CanvasDown { x_frac: 0.8 });
        assert_eq!(intent.dx, 1.0);
        TEST_BINDINGS.apply(&mut intent, InputEvent::CanvasUp);
        assert_eq!(intent.dx, 0.0);
    }

    #[test]
    fn test_clear_triggers_keeps_held_direction() {
        let mut intent = Intent::default();
        intent.press(Control::Left);
        intent.press(Control::Jump);
        intent.press(Control::Slide(Direction::Up));
        intent.clear_triggers();
        assert_eq!(intent.dx, -1.0);
        assert!(!intent.jump);
        assert!(intent.slide.is_none());
    }

    #[test]
    fn test_fire_presses_accumulate_until_cleared() {
        let mut intent = Intent::default();
        intent.press(Control::Fire);
        intent.press(Control::Fire);
        intent.press(Control::Fire);
        assert_eq!(intent.fire, 3);
        intent.clear_triggers();
        assert_eq!(intent.fire, 0);
    }
}
