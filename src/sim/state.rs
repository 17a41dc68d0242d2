//! Session state shared by every game variant
//!
//! A `Session` is the one piece of bookkeeping every game has: score, optional
//! health, phase, tick counter and the seeded RNG.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Coarse game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Start screen, nothing simulated yet
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation suspended, resumes exactly where it left off
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Menu => "Menu",
            Phase::Playing => "Playing",
            Phase::Paused => "Paused",
            Phase::GameOver => "GameOver",
        }
    }

    /// Whether the simulation step runs in this phase
    pub fn is_running(&self) -> bool {
        *self == Phase::Playing
    }
}

/// Monotonic score counter. Fractional passive accretion is kept, the display floors it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Score(f64);

impl Score {
    /// Add points. Negative amounts are ignored.
    pub fn add(&mut self, points: f64) {
        if points > 0.0 {
            self.0 += points;
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whole points shown to the player
    pub fn whole(&self) -> u64 {
        self.0.floor() as u64
    }
}

/// Bounded hit points, always within `[0, max]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: i32,
    max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(1);
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Subtract damage, flooring at zero. Returns true if this call depleted it.
    pub fn damage(&mut self, amount: i32) -> bool {
        let was_alive = self.current > 0;
        self.current = (self.current - amount.max(0)).clamp(0, self.max);
        was_alive && self.current == 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.current = (self.current + amount.max(0)).clamp(0, self.max);
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

/// RNG seed wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Health reached zero
    HealthDepleted,
    /// Touched a lethal hazard
    Collision,
    /// Fell out of the playfield
    Fell,
    /// Puzzle board has no legal move left
    NoMoves,
}

/// Per-run bookkeeping (one per running game)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub score: Score,
    pub health: Option<Health>,
    pub phase: Phase,
    /// Simulation ticks executed in the current run
    pub ticks: u64,
    /// Runs started so far (restart increments)
    pub runs: u32,
    pub end_reason: Option<EndReason>,
    /// Max health for the next reset, `None` if the variant has no health
    max_health: Option<i32>,
}

impl Session {
    pub fn new(max_health: Option<i32>) -> Self {
        Self {
            score: Score::default(),
            health: max_health.map(Health::new),
            phase: Phase::Menu,
            ticks: 0,
            runs: 0,
            end_reason: None,
            max_health,
        }
    }

    /// Back to initial values for a fresh run. Phase is left to the caller.
    pub fn reset(&mut self) {
        self.score = Score::default();
        self.health = self.max_health.map(Health::new);
        self.ticks = 0;
        self.end_reason = None;
    }

    /// Apply damage. Returns true if health just hit zero.
    pub fn damage(&mut self, amount: i32) -> bool {
        self.health.as_mut().is_some_and(|h| h.damage(amount))
    }

    pub fn is_depleted(&self) -> bool {
        self.health.is_some_and(|h| h.is_depleted())
    }
}
