//! Session-level settings
//!
//! Loaded from JSON (a page `data-settings` attribute on the web, a file or
//! nothing on native). Missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::entity::Playfield;

/// Smallest playfield side accepted from settings; every actor fits inside it
pub const MIN_PLAYFIELD_SIDE: f32 = 64.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(
        "playfield must be at least {min}x{min}, got {width}x{height}",
        min = MIN_PLAYFIELD_SIDE
    )]
    Playfield { width: f32, height: f32 },
}

/// Per-session preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Override the game's own playfield size
    pub playfield: Option<Playfield>,

    // === Browser ===
    /// Pause when the page is hidden or the window loses focus
    pub auto_pause: bool,
    /// Draw the score/health line
    pub show_hud: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            playfield: None,
            auto_pause: true,
            show_hud: true,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        if let Some(field) = settings.playfield
            && !(field.width >= MIN_PLAYFIELD_SIDE && field.height >= MIN_PLAYFIELD_SIDE)
        {
            return Err(SettingsError::Playfield {
                width: field.width,
                height: field.height,
            });
        }
        Ok(settings)
    }

    /// Configured seed, or `fallback` when none is set
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(settings.auto_pause);
        assert!(settings.show_hud);
        assert_eq!(settings.seed_or(9), 9);
    }

    #[test]
    fn test_partial_json() {
        let settings = Settings::from_json(r#"{ "seed": 42, "auto_pause": false }"#).unwrap();
        assert_eq!(settings.seed_or(9), 42);
        assert!(!settings.auto_pause);
        assert!(settings.show_hud);
        assert!(settings.playfield.is_none());
    }

    #[test]
    fn test_playfield_override() {
        let settings =
            Settings::from_json(r#"{ "playfield": { "width": 320, "height": 240 } }"#).unwrap();
        assert_eq!(settings.playfield, Some(Playfield::new(320.0, 240.0)));
    }

    #[test]
    fn test_rejects_empty_playfield() {
        let err = Settings::from_json(r#"{ "playfield": { "width": 0, "height": 240 } }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Playfield { .. }));
    }

    #[test]
    fn test_rejects_playfield_narrower_than_a_car() {
        let err = Settings::from_json(r#"{ "playfield": { "width": 40, "height": 600 } }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Playfield { width, .. } if width == 40.0));
        assert!(Settings::from_json(r#"{ "playfield": { "width": 64, "height": 64 } }"#).is_ok());
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Settings::from_json("{ seed"),
            Err(SettingsError::Parse(_))
        ));
    }
}
