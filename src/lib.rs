//! Arcade Hub - a collection of small 2D arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, session state, game loop)
//! - `games`: The individual game variants built on `sim`
//! - `renderer`: Draw-list presentation and the Canvas 2D adapter
//! - `platform`: Browser input mapping and frame clock
//! - `settings`: Session-level settings
//! - `tuning`: Data-driven game balance

pub mod games;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use games::GameKind;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game loop constants
pub mod consts {
    /// Fixed simulation timestep. Every per-tick speed in `tuning` assumes 60 Hz.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Ticks per second at the logical rate
    pub const TICKS_PER_SECOND: u32 = 60;
}

/// Convert a duration in milliseconds to whole simulation ticks (rounded)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    (ms as f32 / 1000.0 * consts::TICKS_PER_SECOND as f32).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(500), 30);
        assert_eq!(ms_to_ticks(1000), 60);
        assert_eq!(ms_to_ticks(0), 0);
    }
}
