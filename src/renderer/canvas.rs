//! Canvas 2D presenter (wasm only)
//!
//! Fits the frame's view into the canvas with a uniform scale, letterboxed,
//! then draws commands in order. Sprites registered in the skin table replace
//! the plain shape for their style once loaded.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::frame::{DrawCmd, Frame, Overlay, Presenter, Style};
use super::skin::{Appearance, SkinTable};

const BACKGROUND: &str = "#05050f";
const TEXT: &str = "#e8e8ff";

fn color(style: Style) -> &'static str {
    match style {
        Style::Player => "#00f0ff",
        Style::Hazard => "#ff2a6d",
        Style::Collectible => "#f9f871",
        Style::Projectile => "#ffffff",
        Style::Platform => "#7b61ff",
        Style::Guide => "#3a3a5a",
        Style::Vehicle => "#ff9f1c",
        Style::Tile(value) => tile_color(value),
    }
}

fn tile_color(value: u32) -> &'static str {
    match value {
        0 => "#1c1c2e",
        2 => "#3d2c8d",
        4 => "#4c3a9e",
        8 => "#6a2c91",
        16 => "#8e2c8d",
        32 => "#b12c7a",
        64 => "#d42c5e",
        128 => "#f2a541",
        256 => "#f2c641",
        512 => "#e6e23c",
        1024 => "#9be23c",
        _ => "#3ce2c4",
    }
}

/// View-to-canvas transform
#[derive(Debug, Clone, Copy)]
struct Fit {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl Fit {
    fn new(frame: &Frame, width: f64, height: f64) -> Self {
        let view = frame.view;
        let sx = width / view.size.x.max(f32::EPSILON) as f64;
        let sy = height / view.size.y.max(f32::EPSILON) as f64;
        let scale = sx.min(sy);
        Self {
            scale,
            offset_x: (width - view.size.x as f64 * scale) / 2.0 - view.pos.x as f64 * scale,
            offset_y: (height - view.size.y as f64 * scale) / 2.0 - view.pos.y as f64 * scale,
        }
    }

    fn x(&self, x: f32) -> f64 {
        self.offset_x + x as f64 * self.scale
    }

    fn y(&self, y: f32) -> f64 {
        self.offset_y + y as f64 * self.scale
    }

    fn len(&self, v: f32) -> f64 {
        v as f64 * self.scale
    }
}

pub struct CanvasPresenter {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    skins: Rc<RefCell<SkinTable>>,
    images: HashMap<Style, HtmlImageElement>,
    pub show_hud: bool,
}

impl CanvasPresenter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self {
            canvas,
            ctx,
            skins: Rc::new(RefCell::new(SkinTable::new())),
            images: HashMap::new(),
            show_hud: true,
        })
    }

    /// Start loading a sprite for `style`. The plain shape is drawn until it arrives.
    pub fn load_skin(&mut self, style: Style, url: &str) -> Result<(), JsValue> {
        let image = HtmlImageElement::new()?;
        self.skins.borrow_mut().register(style, url);

        let skins = self.skins.clone();
        let onload = Closure::<dyn FnMut()>::new(move || skins.borrow_mut().mark_loaded(style));
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let skins = self.skins.clone();
        let onerror = Closure::<dyn FnMut()>::new(move || skins.borrow_mut().mark_failed(style));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();

        image.set_src(url);
        self.images.insert(style, image);
        Ok(())
    }

    fn draw_rect(&self, fit: &Fit, cmd: &DrawCmd) {
        let DrawCmd::Rect { rect, style, outline } = cmd else {
            return;
        };
        let (x, y) = (fit.x(rect.pos.x), fit.y(rect.pos.y));
        let (w, h) = (fit.len(rect.size.x), fit.len(rect.size.y));

        if let Appearance::Image(_) = self.skins.borrow().resolve(*style)
            && let Some(image) = self.images.get(style)
        {
            if self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(image, x, y, w, h)
                .is_ok()
            {
                return;
            }
            log::warn!("drawing sprite for {style:?} failed");
        }

        if *outline {
            self.ctx.set_stroke_style_str(color(*style));
            self.ctx.stroke_rect(x, y, w, h);
        } else {
            self.ctx.set_fill_style_str(color(*style));
            self.ctx.fill_rect(x, y, w, h);
        }
    }

    fn draw_overlay(&self, overlay: Overlay, width: f64, height: f64) {
        let Some(title) = overlay.title() else {
            return;
        };
        self.ctx.set_fill_style_str("rgba(0, 0, 0, 0.6)");
        self.ctx.fill_rect(0.0, 0.0, width, height);

        self.ctx.set_fill_style_str(TEXT);
        self.ctx.set_text_align("center");
        self.ctx.set_font("bold 36px monospace");
        let _ = self.ctx.fill_text(title, width / 2.0, height / 2.0);

        self.ctx.set_font("18px monospace");
        let hint = match overlay {
            Overlay::Menu => "press Enter to start".to_string(),
            Overlay::Paused => "press Esc to resume".to_string(),
            Overlay::GameOver { score } => format!("score {score}  -  Enter to restart"),
            Overlay::None => String::new(),
        };
        let _ = self.ctx.fill_text(&hint, width / 2.0, height / 2.0 + 36.0);
    }
}

impl Presenter for CanvasPresenter {
    fn present(&mut self, frame: &Frame) {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        let fit = Fit::new(frame, width, height);

        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, width, height);

        for cmd in &frame.commands {
            match cmd {
                DrawCmd::Rect { .. } => self.draw_rect(&fit, cmd),
                DrawCmd::Circle { circle, style } => {
                    self.ctx.set_fill_style_str(color(*style));
                    self.ctx.begin_path();
                    let _ = self.ctx.arc(
                        fit.x(circle.center.x),
                        fit.y(circle.center.y),
                        fit.len(circle.radius),
                        0.0,
                        std::f64::consts::TAU,
                    );
                    self.ctx.fill();
                }
                DrawCmd::Line { from, to, style } => {
                    self.ctx.set_stroke_style_str(color(*style));
                    self.ctx.set_line_width(2.0);
                    self.ctx.begin_path();
                    self.ctx.move_to(fit.x(from.x), fit.y(from.y));
                    self.ctx.line_to(fit.x(to.x), fit.y(to.y));
                    self.ctx.stroke();
                }
                DrawCmd::Label { pos, text, .. } => {
                    self.ctx.set_fill_style_str(TEXT);
                    self.ctx.set_text_align("center");
                    self.ctx.set_text_baseline("middle");
                    self.ctx
                        .set_font(&format!("bold {}px monospace", (fit.len(24.0)).max(10.0) as u32));
                    let _ = self.ctx.fill_text(text, fit.x(pos.x), fit.y(pos.y));
                }
            }
        }

        if self.show_hud {
            let hud = &frame.hud;
            let mut line = format!("SCORE {}", hud.score);
            if let Some((hp, max)) = hud.health {
                line.push_str(&format!("   HP {hp}/{max}"));
            }
            self.ctx.set_fill_style_str(TEXT);
            self.ctx.set_text_align("left");
            self.ctx.set_text_baseline("top");
            self.ctx.set_font("16px monospace");
            let _ = self.ctx.fill_text(&line, 12.0, 12.0);
        }

        self.ctx.set_text_baseline("middle");
        self.draw_overlay(frame.overlay, width, height);
    }
}
