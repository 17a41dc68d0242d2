//! Platform glue
//!
//! Page-level parsing that is testable on native (game selection, settings
//! attribute, touch position) plus the browser frame clock on wasm.

use crate::games::GameKind;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Pick the game from a location search string such as `?game=sky-forge`.
/// Unknown or missing names fall back to the first game.
pub fn game_from_query(search: &str) -> GameKind {
    let query = search.trim_start_matches('?');
    let requested = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "game")
        .map(|(_, value)| value);

    match requested {
        Some(name) => GameKind::from_slug(name).unwrap_or_else(|| {
            log::warn!("unknown game {name:?}, falling back to {}", GameKind::ALL[0].slug());
            GameKind::ALL[0]
        }),
        None => GameKind::ALL[0],
    }
}

/// Parse optional settings JSON, keeping defaults when absent or invalid
pub fn load_settings(json: Option<&str>) -> Settings {
    match json.map(Settings::from_json) {
        Some(Ok(settings)) => settings,
        Some(Err(e)) => {
            log::warn!("ignoring settings: {e}");
            Settings::default()
        }
        None => Settings::default(),
    }
}

/// Parse optional tuning JSON, keeping defaults when absent or invalid
pub fn load_tuning(json: Option<&str>) -> Tuning {
    match json.map(Tuning::from_json) {
        Some(Ok(tuning)) => tuning,
        Some(Err(e)) => {
            log::warn!("ignoring tuning: {e}");
            Tuning::default()
        }
        None => Tuning::default(),
    }
}

/// Horizontal touch position as a fraction of the element width, in [0, 1]
pub fn touch_fraction(client_x: f64, left: f64, width: f64) -> f32 {
    if width <= 0.0 {
        return 0.5;
    }
    (((client_x - left) / width) as f32).clamp(0.0, 1.0)
}

#[cfg(target_arch = "wasm32")]
pub use web::PerformanceClock;

#[cfg(target_arch = "wasm32")]
mod web {
    use crate::sim::clock::Clock;

    /// `performance.now()`, falling back to `Date.now()` when unavailable
    pub struct PerformanceClock {
        performance: Option<web_sys::Performance>,
    }

    impl PerformanceClock {
        pub fn new() -> Self {
            let performance = web_sys::window().and_then(|w| w.performance());
            if performance.is_none() {
                log::warn!("performance timer unavailable, using Date.now()");
            }
            Self { performance }
        }
    }

    impl Clock for PerformanceClock {
        fn now_ms(&mut self) -> f64 {
            match &self.performance {
                Some(p) => p.now(),
                None => js_sys::Date::now(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_from_query() {
        assert_eq!(game_from_query("?game=sky-forge"), GameKind::SkyForge);
        assert_eq!(game_from_query("?debug=1&game=Mana_Merge"), GameKind::ManaMerge);
        assert_eq!(game_from_query(""), GameKind::ALL[0]);
        assert_eq!(game_from_query("?game=pong"), GameKind::ALL[0]);
    }

    #[test]
    fn test_load_settings_falls_back() {
        assert_eq!(load_settings(None), Settings::default());
        assert_eq!(load_settings(Some("not json")), Settings::default());
        assert_eq!(load_settings(Some(r#"{"seed": 5}"#)).seed, Some(5));
    }

    #[test]
    fn test_load_settings_drops_undersized_playfield() {
        let settings = load_settings(Some(r#"{"playfield":{"width":40,"height":600}}"#));
        assert!(settings.playfield.is_none());
    }

    #[test]
    fn test_load_tuning_rejects_invalid() {
        let tuning = load_tuning(Some(r#"{"chrono_flip": {"orb_chance": 3.0}}"#));
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_touch_fraction() {
        assert_eq!(touch_fraction(150.0, 100.0, 200.0), 0.25);
        assert_eq!(touch_fraction(50.0, 100.0, 200.0), 0.0);
        assert_eq!(touch_fraction(400.0, 100.0, 200.0), 1.0);
        assert_eq!(touch_fraction(10.0, 0.0, 0.0), 0.5);
    }
}
