//! The arcade games
//!
//! Each game is a thin parameterization of the shared simulation: its own
//! entity sets and rules behind the `Game` trait, balance from `tuning`.

pub mod chrono_flip;
pub mod cyber_run;
pub mod galaxy_defender;
pub mod highway_rush;
pub mod inferno_drift;
pub mod mana_merge;
pub mod pixel_arena;
pub mod rogue_protocol;
pub mod shadow_strike;
pub mod sky_forge;

use serde::{Deserialize, Serialize};

use crate::sim::tick::Game;
use crate::tuning::Tuning;

pub use chrono_flip::ChronoFlip;
pub use cyber_run::CyberRun;
pub use galaxy_defender::GalaxyDefender;
pub use highway_rush::HighwayRush;
pub use inferno_drift::InfernoDrift;
pub use mana_merge::ManaMerge;
pub use pixel_arena::PixelArena;
pub use rogue_protocol::RogueProtocol;
pub use shadow_strike::ShadowStrike;
pub use sky_forge::SkyForge;

/// Game selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    CyberRun,
    GalaxyDefender,
    RogueProtocol,
    PixelArena,
    ShadowStrike,
    ChronoFlip,
    InfernoDrift,
    SkyForge,
    ManaMerge,
    HighwayRush,
}

impl GameKind {
    pub const ALL: [GameKind; 10] = [
        GameKind::CyberRun,
        GameKind::GalaxyDefender,
        GameKind::RogueProtocol,
        GameKind::PixelArena,
        GameKind::ShadowStrike,
        GameKind::ChronoFlip,
        GameKind::InfernoDrift,
        GameKind::SkyForge,
        GameKind::ManaMerge,
        GameKind::HighwayRush,
    ];

    /// URL-friendly name, e.g. `?game=sky-forge`
    pub fn slug(&self) -> &'static str {
        match self {
            GameKind::CyberRun => "cyber-run",
            GameKind::GalaxyDefender => "galaxy-defender",
            GameKind::RogueProtocol => "rogue-protocol",
            GameKind::PixelArena => "pixel-arena",
            GameKind::ShadowStrike => "shadow-strike",
            GameKind::ChronoFlip => "chrono-flip",
            GameKind::InfernoDrift => "inferno-drift",
            GameKind::SkyForge => "sky-forge",
            GameKind::ManaMerge => "mana-merge",
            GameKind::HighwayRush => "highway-rush",
        }
    }

    pub fn from_slug(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|k| k.slug() == s)
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::CyberRun => "Cyber Run",
            GameKind::GalaxyDefender => "Galaxy Defender",
            GameKind::RogueProtocol => "Rogue Protocol",
            GameKind::PixelArena => "Pixel Arena",
            GameKind::ShadowStrike => "Shadow Strike",
            GameKind::ChronoFlip => "Chrono Flip",
            GameKind::InfernoDrift => "Inferno Drift",
            GameKind::SkyForge => "Sky Forge",
            GameKind::ManaMerge => "Mana Merge",
            GameKind::HighwayRush => "Highway Rush",
        }
    }

    /// Instantiate the game with its section of `tuning`
    pub fn build(&self, tuning: &Tuning) -> Box<dyn Game> {
        match self {
            GameKind::CyberRun => Box::new(CyberRun::new(tuning.cyber_run.clone())),
            GameKind::GalaxyDefender => {
                Box::new(GalaxyDefender::new(tuning.galaxy_defender.clone()))
            }
            GameKind::RogueProtocol => Box::new(RogueProtocol::new(tuning.rogue_protocol.clone())),
            GameKind::PixelArena => Box::new(PixelArena::new(tuning.pixel_arena.clone())),
            GameKind::ShadowStrike => Box::new(ShadowStrike::new(tuning.shadow_strike.clone())),
            GameKind::ChronoFlip => Box::new(ChronoFlip::new(tuning.chrono_flip.clone())),
            GameKind::InfernoDrift => Box::new(InfernoDrift::new(tuning.inferno_drift.clone())),
            GameKind::SkyForge => Box::new(SkyForge::new(tuning.sky_forge.clone())),
            GameKind::ManaMerge => Box::new(ManaMerge::new(tuning.mana_merge.clone())),
            GameKind::HighwayRush => Box::new(HighwayRush::new(tuning.highway_rush.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Playfield;
    use crate::sim::input::InputEvent;
    use crate::sim::state::Phase;
    use crate::sim::tick::{Command, GameLoop};

    #[test]
    fn test_slug_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(GameKind::from_slug("Sky_Forge"), Some(GameKind::SkyForge));
        assert_eq!(GameKind::from_slug("pong"), None);
    }

    #[test]
    fn test_every_game_runs_and_stays_deterministic() {
        let tuning = Tuning::default();
        for kind in GameKind::ALL {
            let run = |seed| {
                let mut game = GameLoop::new(kind.build(&tuning), seed);
                game.command(Command::Start);
                game.handle_input(InputEvent::KeyDown("ArrowRight"));
                game.run_ticks(600);
                (game.phase(), game.session().score.value(), game.session().ticks)
            };
            let a = run(11);
            let b = run(11);
            assert_eq!(a, b, "{} diverged with the same seed", kind.slug());
            assert_ne!(a.0, Phase::Menu);
        }
    }

    #[test]
    fn test_every_game_draws_the_actor() {
        let tuning = Tuning::default();
        for kind in GameKind::ALL {
            let mut game = GameLoop::new(kind.build(&tuning), 3);
            game.command(Command::Start);
            game.tick();
            let frame = game.frame();
            assert!(!frame.commands.is_empty(), "{} drew nothing", kind.slug());
        }
    }

    /// Games whose actor is clamped on both axes; the rest escape vertically by jumping or falling
    fn clamps_vertically(kind: GameKind) -> bool {
        matches!(
            kind,
            GameKind::GalaxyDefender
                | GameKind::RogueProtocol
                | GameKind::PixelArena
                | GameKind::ChronoFlip
                | GameKind::InfernoDrift
        )
    }

    #[test]
    fn test_every_game_respects_playfield_override() {
        let tuning = Tuning::default();
        let fields = [Playfield::new(40.0, 40.0), Playfield::new(1600.0, 1200.0)];
        for kind in GameKind::ALL {
            for field in fields {
                let mut game = GameLoop::new(kind.build(&tuning), 21).with_playfield(field);
                game.command(Command::Start);
                for tick in 0..400 {
                    let key = if (tick / 50) % 2 == 0 { "ArrowRight" } else { "ArrowLeft" };
                    game.handle_input(InputEvent::KeyDown(key));
                    if tick % 7 == 0 {
                        game.handle_input(InputEvent::KeyDown("Space"));
                    }
                    let phase = game.tick();
                    if let Some(body) = game.game().player_body() {
                        assert_in_field(kind, field, body);
                    }
                    if phase == Phase::GameOver {
                        game.command(Command::Restart);
                    }
                }
            }
        }
    }

    fn assert_in_field(kind: GameKind, field: Playfield, body: crate::sim::collision::Rect) {
        const EPS: f32 = 1e-3;
        let slug = kind.slug();
        assert!(body.left() >= -EPS, "{slug} left of {field:?}: {body:?}");
        assert!(
            body.right() <= field.width + EPS || body.left() <= EPS,
            "{slug} right of {field:?}: {body:?}"
        );
        if clamps_vertically(kind) {
            assert!(body.top() >= -EPS, "{slug} above {field:?}: {body:?}");
            assert!(
                body.bottom() <= field.height + EPS || body.top() <= EPS,
                "{slug} below {field:?}: {body:?}"
            );
        }
    }
}
