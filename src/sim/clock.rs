//! Frame clock and fixed-timestep scheduler
//!
//! The display callback hands in timestamps, the scheduler turns elapsed time
//! into whole simulation ticks. Tests drive it with a `ManualClock`.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Source of frame timestamps in milliseconds
pub trait Clock {
    fn now_ms(&mut self) -> f64;
}

/// Clock advanced by hand
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self { now: start_ms }
    }

    pub fn advance(&mut self, ms: f64) {
        self.now += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&mut self) -> f64 {
        self.now
    }
}

/// Accumulates frame time and reports how many fixed ticks are due
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    accumulator: f32,
    last_ms: Option<f64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame at `now_ms` and return the number of ticks to run.
    /// The first frame always runs exactly one tick.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_ms {
            Some(last) => (((now_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DT),
            None => SIM_DT,
        };
        self.last_ms = Some(now_ms);
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        // Drop backlog we refused to simulate
        if ticks == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        ticks
    }

    /// Read the clock and schedule
    pub fn poll(&mut self, clock: &mut impl Clock) -> u32 {
        let now = clock.now_ms();
        self.frame(now)
    }

    /// Forget timing history, e.g. after a pause so the gap isn't replayed
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_ms = None;
    }
}
