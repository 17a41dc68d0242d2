//! Data-driven game balance
//!
//! One struct per game. Defaults reproduce the shipped games; a JSON document
//! may override any subset of fields (`#[serde(default)]` everywhere).
//! All speeds are per tick at 60 Hz.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::entity::Playfield;

#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    #[error("tuning JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(game: &str, field: &str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field: format!("{game}.{field}"),
        reason: reason.into(),
    }
}

/// Field-level checks shared by every game section
struct Check<'a> {
    game: &'a str,
}

impl Check<'_> {
    fn probability(&self, field: &str, p: f32) -> Result<(), TuningError> {
        if (0.0..=1.0).contains(&p) {
            Ok(())
        } else {
            Err(invalid(self.game, field, format!("probability {p} outside [0, 1]")))
        }
    }

    fn positive(&self, field: &str, v: f32) -> Result<(), TuningError> {
        if v > 0.0 && v.is_finite() {
            Ok(())
        } else {
            Err(invalid(self.game, field, format!("must be positive, got {v}")))
        }
    }

    fn health(&self, max: i32) -> Result<(), TuningError> {
        if max > 0 {
            Ok(())
        } else {
            Err(invalid(self.game, "max_health", format!("must be > 0, got {max}")))
        }
    }

    fn interval(&self, field: &str, ticks: u32) -> Result<(), TuningError> {
        if ticks > 0 {
            Ok(())
        } else {
            Err(invalid(self.game, field, "interval must be at least one tick"))
        }
    }

    fn range(&self, field: &str, lo: f32, hi: f32) -> Result<(), TuningError> {
        if lo <= hi {
            Ok(())
        } else {
            Err(invalid(self.game, field, format!("empty range {lo}..{hi}")))
        }
    }

    fn playfield(&self, field: &Playfield) -> Result<(), TuningError> {
        self.positive("playfield.width", field.width)?;
        self.positive("playfield.height", field.height)
    }
}

const DEFAULT_FIELD: Playfield = Playfield::new(800.0, 600.0);
const SQUARE_FIELD: Playfield = Playfield::new(500.0, 500.0);

/// Side-scrolling runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CyberRunTuning {
    pub playfield: Playfield,
    pub actor_size: f32,
    pub actor_x: f32,
    /// Ground line distance from the bottom edge
    pub ground_offset: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub scroll_speed: f32,
    pub obstacle_min: f32,
    pub obstacle_max: f32,
    pub obstacle_chance: f32,
    pub orb_chance: f32,
    pub orb_radius: f32,
    /// Orbs float this far above the ground, plus up to `orb_height_range`
    pub orb_min_height: f32,
    pub orb_height_range: f32,
    pub orb_points: f64,
    pub passive_points: f64,
}

impl Default for CyberRunTuning {
    fn default() -> Self {
        Self {
            playfield: DEFAULT_FIELD,
            actor_size: 40.0,
            actor_x: 100.0,
            ground_offset: 100.0,
            gravity: 1.0,
            jump_impulse: 18.0,
            scroll_speed: 6.0,
            obstacle_min: 40.0,
            obstacle_max: 70.0,
            obstacle_chance: 0.02,
            orb_chance: 0.015,
            orb_radius: 10.0,
            orb_min_height: 150.0,
            orb_height_range: 100.0,
            orb_points: 10.0,
            passive_points: 0.1,
        }
    }
}

impl CyberRunTuning {
    fn validate(&self) -> Result<(), TuningError> {
        let check = Check { game: "cyber_run" };
        check.playfield(&self.playfield)?;
        check.positive("actor_size", self.actor_size)?;
        check.range("obstacle_min", self.obstacle_min, self.obstacle_max)?;
        check.probability("obstacle_chance", self.obstacle_chance)?;
        check.probability("orb_chance", self.orb_chance)
    }
}

/// Vertical shooter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyDefenderTuning {
    pub playfield: Playfield,
    pub actor_size: f32,
    /// Actor top edge distance from the bottom
    pub actor_offset: f32,
    pub max_health: i32,
    pub move_speed: f32,
    /// Fraction of the velocity gap closed per tick
    pub easing: f32,
    pub bullet_size: Vec2,
    pub bullet_speed: f32,
    pub enemy_size: f32,
    pub enemy_speed: f32,
    pub enemy_interval: u32,
    /// Damage when an enemy gets past the bottom edge
    pub escape_damage: i32,
    pub kill_points: f64,
    pub passive_points: f64,
}

impl Default for GalaxyDefenderTuning {
    fn default() -> Self {
        Self {
            playfield: DEFAULT_FIELD,
            actor_size: 40.0,
            actor_offset: 80.0,
            max_health: 100,
            move_speed: 8.0,
            easing: 0.2,
            bullet_size: Vec2::new(10.0, 20.0),
            bullet_speed: 12.0,
            enemy_size: 50.0,
            enemy_speed: 3.0,
            enemy_interval: 60,
            escape_damage: 10,
            kill_points: 10.0,
            passive_points: 0.1,
        }
    }
}

impl GalaxyDefenderTuning {
    fn validate(&self) -> Result<(), TuningError> {
        let check = Check {
            game: "galaxy_defender",
        };
        check.playfield(&self.playfield)?;
        check.health(self.max_health)?;
        check.interval("enemy_interval", self.enemy_interval)?;
        if !(0.0..=1.0).contains(&self.easing) {
            return Err(invalid("galaxy_defender", "easing", "must be within [0, 1]"));
        }
        Ok(())
    }
}

/// Top-down dodger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RogueProtocolTuning {
    pub playfield: Playfield,
    pub actor_start: Vec2,
    pub actor_size: f32,
    pub move_speed: f32,
    pub max_health: i32,
    pub enemy_interval: u32,
    pub enemy_size: f32,
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,
    pub item_interval: u32,
    pub item_size: f32,
    pub item_speed_min: f32,
    pub item_speed_max: f32,
    pub contact_damage: i32,
    pub item_points: f64,
}

impl Default for RogueProtocolTuning {
    fn default() -> Self {
        Self {
            playfield: SQUARE_FIELD,
            actor_start: Vec2::new(240.0, 400.0),
            actor_size: 20.0,
            move_speed: 4.0,
            max_health: 100,
            enemy_interval: 80,
            enemy_size: 20.0,
            enemy_speed_min: 2.0,
            enemy_speed_max: 4.0,
            item_interval: 200,
            item_size: 15.0,
            item_speed_min: 1.5,
            item_speed_max: 2.5,
            contact_damage: 10,
            item_points: 5.0,
        }
    }
}

impl RogueProtocolTuning {
    fn validate(&self) -> Result<(), TuningError> {
        let check = Check {
            game: "rogue_protocol",
        };
        check.playfield(&self.playfield)?;
        check.health(self.max_health)?;
        check.interval("enemy_interval", self.enemy_interval)?;
        check.interval("item_interval", self.item_interval)?;
        check.range("enemy_speed_min", self.enemy_speed_min, self.enemy_speed_max)?;
        check.range("item_speed_min", self.item_speed_min, self.item_speed_max)
    }
}

/// Top-down shooter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelArenaTuning {
    pub playfield: Playfield,
    pub actor_start: Vec2,
    pub actor_size: f32,
    pub move_speed: f32,
    pub max_health: i32,
    pub bullet_size: f32,
    pub bullet_speed: f32,
    pub enemy_interval: u32,
    pub enemy_size: f32,
    /// Enemies spawn within this band below the top edge
    pub enemy_spawn_band: f32,
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,
    pub contact_damage: i32,
    pub kill_points: f64,
}

impl Default for PixelArenaTuning {
    fn default() -> Self {
        Self {
            playfield: SQUARE_FIELD,
            actor_start: Vec2::new(250.0, 250.0),
            actor_size: 20.0,
            move_speed: 4.0,
            max_health: 100,
            bullet_size: 10.0,
            bullet_speed: 6.0,
            enemy_interval: 60,
            enemy_size: 20.0,
            enemy_spawn_band: 20.0,
            enemy_speed_min: 2.0,
            enemy_speed_max: 4.0,
            contact_damage: 10,
            kill_points: 10.0,
        }
    }
}

impl PixelArenaTuning {
    fn validate(&self) -> Result<(), TuningError> {
        let check = Check { game: "pixel_arena" };
        check.playfield(&self.playfield)?;
        check.health(self.max_health)?;
        check.interval("enemy_interval", self.enemy_interval)?;
        check.range("enemy_speed_min", self.enemy_speed_min, self.enemy_speed_max)
    }
}

/// Side-on platformer with patrolling enemies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowStrikeTuning {
    pub playfield: Playfield,
    pub actor_size: f32,
    pub actor_start_x: f32,
    /// Actor starts this far above the bottom
    pub actor_start_offset: f32,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub move_speed: f32,
    pub max_health: i32,
    pub platform_count: u32,
    pub platform_spacing: f32,
    pub platform_size: Vec2,
    /// Lowest platform row, measured up from the bottom
    pub platform_base: f32,
    /// Height step between the three platform rows
    pub platform_step: f32,
    pub enemy_count: u32,
    pub enemy_first_x: f32,
    pub enemy_spacing: f32,
    /// Enemy row top edge, measured up from the bottom
    pub enemy_offset: f32,
    pub enemy_size: f32,
    pub enemy_speed: f32,
    pub contact_damage: i32,
    pub damage_cooldown: u32,
    pub orb_chance: f32,
    pub orb_radius: f32,
    pub max_orbs: usize,
    pub orb_points: f64,
    pub passive_points: f64,
}

impl Default for ShadowStrikeTuning {
    fn default() -> Self {
        Self {
            playfield: DEFAULT_FIELD,
            actor_size: 40.0,
            actor_start_x: 100.0,
            actor_start_offset: 150.0,
            gravity: 1.2,
            jump_impulse: 18.0,
            move_speed: 8.0,
            max_health: 100,
            platform_count: 12,
            platform_spacing: 250.0,
            platform_size: Vec2::new(200.0, 20.0),
            platform_base: 100.0,
            platform_step: 50.0,
            enemy_count: 6,
            enemy_first_x: 300.0,
            enemy_spacing: 300.0,
            enemy_offset: 140.0,
            enemy_size: 40.0,
            enemy_speed: 2.0,
            contact_damage: 10,
            damage_cooldown: 30,
            orb_chance: 0.01,
            orb_radius: 10.0,
            max_orbs: 12,
            orb_points: 10.0,
            passive_points: 0.1,
        }
    }
}

impl ShadowStrikeTuning {
    fn validate(&self) -> Result<(), TuningError> {
        let check = Check {
            game: "shadow_strike",
        };
        check.playfield(&self.playfield)?;
        check.health(self.max_health)?;
        check.probability("orb_chance", self.orb_chance)?;
        if self.platform_count == 0 {
            return Err(invalid("shadow_strike", "platform_count", "need at least one platform"));
        }
        Ok(())
    }
}

/// Gravity-flip dodger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChronoFlipTuning {
    pub playfield: Playfield,
    pub actor_size: f32,
    /// Actor starts this far above the bottom
    pub actor_start_offset: f32,
    pub move_speed: f32,
    pub gravity: f32,
    pub obstacle_size: f32,
    pub orb_radius: f32,
    pub travel_speed: f32,
    pub obstacle_chance: f32,
    pub orb_chance: f32,
    pub orb_points: f64,
    pub passive_points: f64,
}

impl Default for ChronoFlipTuning {
    fn default() -> Self {
        Self {
            playfield: DEFAULT_FIELD,
            actor_size: 40.0,
            actor_start_offset: 100.0,
            move_speed: 8.0,
            gravity: 1.0,
            obstacle_size: 50.0,
            orb_radius: 10.0,
            travel_speed: 6.0,
            obstacle_chance: 0.02,
            orb_chance: 0.015,
            orb_points: 10.0,
            passive_points: 0.1,
        }
    }
}

impl ChronoFlipTuning {
    fn validate(&self) -> Result<(), TuningError> {
        let check = Check { game: "chrono_flip" };
        check.playfield(&self.playfield)?;
        check.probability("obstacle_chance", self.obstacle_chance)?;
        check.probability("orb_chance", self.orb_chance)
    }
}

/// Lane racer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfernoDriftTuning {
    pub playfield: Playfield,
    pub car_size: Vec2,
    /// Car top edge distance from the bottom
    pub car_offset: f32,
    pub steer_speed: f32,
    pub road_width: f32,
    pub obstacle_min: f32,
    pub obstacle_max: f32,
    pub orb_radius: f32,
    pub fall_speed: f32,
    pub obstacle_chance: f32,
    pub orb_chance: f32,
    pub orb_points: f64,
    pub passive_points: f64,
}

impl Default for InfernoDriftTuning {
    fn default() -> Self {
        Self {
            playfield: DEFAULT_FIELD,
            car_size: Vec2::new(50.0, 30.0),
            car_offset: 200.0,
            steer_speed: 8.0,
            road_width: 300.0,
            obstacle_min: 40.0,
            obstacle_max: 70.0,
            orb_radius: 10.0,
            fall_speed: 6.0,
            obstacle_chance: 0.02,
            orb_chance: 0.015,
            orb_points: 10.0,
            passive_points: 0.1,
        }
    }
}

impl InfernoDriftTuning {
    fn validate(&self) -> Result<(), TuningError> {
        let check = Check {
            game: "inferno_drift",
        };
        check.playfield(&self.playfield)?;
        check.positive("road_width", self.road_width)?;
        check.range("obstacle_min", self.obstacle_min, self.obstacle_max)?;
        check.probability("obstacle_chance", self.obstacle_chance)?;
        check.probability("orb_chance", self.orb_chance)?;
        if self.car_size.x > self.road_width {
            return Err(invalid("inferno_drift", "car_size", "car is wider than the road"));
        }
        Ok(())
    }
}

/// Endless ascent over scrolling platforms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyForgeTuning {
    pub playfield: Playfield,
    pub actor_size: f32,
    pub move_speed: f32,
    pub jump_impulse: f32,
    pub gravity: f32,
    pub max_health: i32,
    pub platform_count: u32,
    pub platform_min_width: f32,
    pub platform_max_width: f32,
    pub platform_height: f32,
    pub scroll_speed: f32,
    /// Recycled platforms reappear up to this far below the bottom
    pub respawn_spread: f32,
    pub platform_points: f64,
    /// Minimum landing tolerance below a platform top
    pub landing_tolerance: f32,
    /// How far below the bottom counts as a fall
    pub fall_margin: f32,
    pub fall_damage: i32,
    pub respawn_y: f32,
    pub respawn_margin: f32,
    pub passive_points: f64,
}

impl Default for SkyForgeTuning {
    fn default() -> Self {
        Self {
            playfield: Playfield::new(480.0, 640.0),
            actor_size: 22.0,
            move_speed: 4.0,
            jump_impulse: 10.0,
            gravity: 0.55,
            max_health: 100,
            platform_count: 12,
            platform_min_width: 80.0,
            platform_max_width: 140.0,
            platform_height: 12.0,
            scroll_speed: 0.7,
            respawn_spread: 80.0,
            platform_points: 5.0,
            landing_tolerance: 12.0,
            fall_margin: 40.0,
            fall_damage: 30,
            respawn_y: 40.0,
            respawn_margin: 10.0,
            passive_points: 0.02,
        }
    }
}

impl SkyForgeTuning {
    fn validate(&self) -> Result<(), TuningError> {
        let check = Check { game: "sky_forge" };
        check.playfield(&self.playfield)?;
        check.health(self.max_health)?;
        check.range(
            "platform_min_width",
            self.platform_min_width,
            self.platform_max_width,
        )?;
        if self.platform_count < 2 {
            return Err(invalid("sky_forge", "platform_count", "need at least two platforms"));
        }
        Ok(())
    }
}

/// Tile-merge puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManaMergeTuning {
    pub grid_size: usize,
    pub initial_tiles: usize,
}

impl Default for ManaMergeTuning {
    fn default() -> Self {
        Self {
            grid_size: 4,
            initial_tiles: 2,
        }
    }
}

impl ManaMergeTuning {
    fn validate(&self) -> Result<(), TuningError> {
        if self.grid_size < 2 {
            return Err(invalid("mana_merge", "grid_size", "grid must be at least 2x2"));
        }
        if self.initial_tiles > self.grid_size * self.grid_size {
            return Err(invalid("mana_merge", "initial_tiles", "more tiles than cells"));
        }
        Ok(())
    }
}

/// Top-down highway driving. Units are world meters, z runs along the road.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighwayRushTuning {
    pub road_width: f32,
    pub road_length: f32,
    pub kerb_width: f32,
    pub move_speed: f32,
    /// Car footprint (width, length)
    pub car_size: Vec2,
    pub enemy_speed: f32,
    /// Score at which enemy speed reaches 1.5x of the base
    pub enemy_score_scale: f64,
    /// First enemy starts this fraction of the road length ahead
    pub enemy_start_depth: f32,
    /// Enemies and points recycle once this fraction behind, and reappear this fraction ahead
    pub recycle_depth: f32,
    pub extra_enemy_score: f64,
    pub lane_weight_scale: f64,
    pub point_count: u32,
    pub point_radius: f32,
    pub point_speed: f32,
    pub point_score_scale: f64,
    pub point_points: f64,
    /// Recycled points scatter up to this far beyond `recycle_depth`
    pub point_scatter: f32,
    /// Padding around the actor's box for enemy contact
    pub hit_margin: f32,
}

impl Default for HighwayRushTuning {
    fn default() -> Self {
        Self {
            road_width: 10.0,
            road_length: 200.0,
            kerb_width: 0.3,
            move_speed: 0.15,
            car_size: Vec2::new(1.8, 4.0),
            enemy_speed: 0.6,
            enemy_score_scale: 200.0,
            enemy_start_depth: 0.7,
            recycle_depth: 0.75,
            extra_enemy_score: 50.0,
            lane_weight_scale: 500.0,
            point_count: 15,
            point_radius: 0.3,
            point_speed: 0.5,
            point_score_scale: 400.0,
            point_points: 10.0,
            point_scatter: 10.0,
            hit_margin: 0.3,
        }
    }
}

impl HighwayRushTuning {
    fn validate(&self) -> Result<(), TuningError> {
        let check = Check {
            game: "highway_rush",
        };
        check.positive("road_width", self.road_width)?;
        check.positive("road_length", self.road_length)?;
        check.positive("enemy_score_scale", self.enemy_score_scale as f32)?;
        check.positive("point_score_scale", self.point_score_scale as f32)?;
        check.positive("lane_weight_scale", self.lane_weight_scale as f32)?;
        if self.car_size.x >= self.road_width - 2.0 {
            return Err(invalid("highway_rush", "car_size", "car does not fit between the lane limits"));
        }
        Ok(())
    }
}

/// Balance values for every game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub cyber_run: CyberRunTuning,
    pub galaxy_defender: GalaxyDefenderTuning,
    pub rogue_protocol: RogueProtocolTuning,
    pub pixel_arena: PixelArenaTuning,
    pub shadow_strike: ShadowStrikeTuning,
    pub chrono_flip: ChronoFlipTuning,
    pub inferno_drift: InfernoDriftTuning,
    pub sky_forge: SkyForgeTuning,
    pub mana_merge: ManaMergeTuning,
    pub highway_rush: HighwayRushTuning,
}

impl Tuning {
    /// Parse and validate. Missing sections and fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        self.cyber_run.validate()?;
        self.galaxy_defender.validate()?;
        self.rogue_protocol.validate()?;
        self.pixel_arena.validate()?;
        self.shadow_strike.validate()?;
        self.chrono_flip.validate()?;
        self.inferno_drift.validate()?;
        self.sky_forge.validate()?;
        self.mana_merge.validate()?;
        self.highway_rush.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning =
            Tuning::from_json(r#"{ "cyber_run": { "scroll_speed": 9.0 }, "mana_merge": { "grid_size": 5 } }"#)
                .unwrap();
        assert_eq!(tuning.cyber_run.scroll_speed, 9.0);
        assert_eq!(tuning.cyber_run.gravity, 1.0);
        assert_eq!(tuning.mana_merge.grid_size, 5);
        assert_eq!(tuning.galaxy_defender, GalaxyDefenderTuning::default());
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = Tuning::from_json(r#"{ "chrono_flip": { "orb_chance": 1.5 } }"#).unwrap_err();
        match err {
            TuningError::Invalid { field, .. } => assert_eq!(field, "chrono_flip.orb_chance"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_zero_health() {
        let err = Tuning::from_json(r#"{ "sky_forge": { "max_health": 0 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_tiny_grid() {
        assert!(Tuning::from_json(r#"{ "mana_merge": { "grid_size": 1 } }"#).is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let tuning = Tuning::default();
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }
}
