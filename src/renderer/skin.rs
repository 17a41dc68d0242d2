//! Optional sprite skins with placeholder fallback
//!
//! A presenter may register an image per [`Style`]. Until the image has loaded,
//! and forever after a load failure, the style is drawn as its plain shape.

use std::collections::HashMap;

use super::frame::Style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkinState {
    Pending(String),
    Ready(String),
    Failed,
}

/// How a style should be drawn right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Appearance<'a> {
    Image(&'a str),
    Placeholder,
}

#[derive(Debug, Default)]
pub struct SkinTable {
    skins: HashMap<Style, SkinState>,
}

impl SkinTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an image for `style`. Replaces any earlier registration.
    pub fn register(&mut self, style: Style, url: impl Into<String>) {
        self.skins.insert(style, SkinState::Pending(url.into()));
    }

    pub fn mark_loaded(&mut self, style: Style) {
        match self.skins.get_mut(&style) {
            Some(state @ SkinState::Pending(_)) => {
                if let SkinState::Pending(url) = std::mem::replace(state, SkinState::Failed) {
                    *state = SkinState::Ready(url);
                }
            }
            Some(_) => {}
            None => log::debug!("skin loaded for unregistered style {style:?}"),
        }
    }

    pub fn mark_failed(&mut self, style: Style) {
        if let Some(state) = self.skins.get_mut(&style) {
            if let SkinState::Pending(url) | SkinState::Ready(url) = state {
                log::warn!("skin for {style:?} failed to load ({url}), using placeholder");
            }
            *state = SkinState::Failed;
        }
    }

    pub fn state(&self, style: Style) -> Option<&SkinState> {
        self.skins.get(&style)
    }

    pub fn resolve(&self, style: Style) -> Appearance<'_> {
        match self.skins.get(&style) {
            Some(SkinState::Ready(url)) => Appearance::Image(url),
            _ => Appearance::Placeholder,
        }
    }
}
