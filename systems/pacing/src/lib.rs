#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Converts wall-clock frame time into whole simulation ticks.
//!
//! The tick rate scales with the snake's speed multiplier, so the world itself
//! never sees real time: it only receives `Command::Tick` with the interval
//! reported by [`Pacing::tick_interval`].

use std::time::Duration;

use snake_arcade_core::RoundConfig;

/// Upper bound on ticks released by a single frame.
const DEFAULT_MAX_TICKS_PER_FRAME: u32 = 8;

/// Configuration parameters required to construct the pacing system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    base_rate: f64,
    max_ticks_per_frame: u32,
}

impl Config {
    /// Creates a configuration ticking `base_rate` times per second at multiplier one.
    #[must_use]
    pub const fn new(base_rate: f64) -> Self {
        Self {
            base_rate,
            max_ticks_per_frame: DEFAULT_MAX_TICKS_PER_FRAME,
        }
    }

    /// Derives the configuration from a round's base tick rate.
    #[must_use]
    pub const fn from_round(config: &RoundConfig) -> Self {
        Self::new(config.base_tick_rate)
    }

    /// Caps how many ticks a single long frame may release.
    ///
    /// Time beyond the cap is dropped rather than replayed later. A cap of
    /// zero releases every due tick.
    #[must_use]
    pub const fn with_max_ticks_per_frame(mut self, max_ticks_per_frame: u32) -> Self {
        self.max_ticks_per_frame = max_ticks_per_frame;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(10.0)
    }
}

/// Fixed-step accumulator driving the simulation clock.
#[derive(Debug)]
pub struct Pacing {
    base_rate: f64,
    max_ticks_per_frame: u32,
    accumulator: Duration,
}

impl Pacing {
    /// Creates a new pacing system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            base_rate: config.base_rate,
            max_ticks_per_frame: config.max_ticks_per_frame,
            accumulator: Duration::ZERO,
        }
    }

    /// Ticks per second for the provided speed multiplier.
    #[must_use]
    pub fn effective_rate(&self, speed_multiplier: f64) -> f64 {
        self.base_rate * speed_multiplier
    }

    /// Simulated time covered by one tick, `None` when the rate is unusable.
    #[must_use]
    pub fn tick_interval(&self, speed_multiplier: f64) -> Option<Duration> {
        let rate = self.effective_rate(speed_multiplier);
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }
        Duration::try_from_secs_f64(rate.recip())
            .ok()
            .filter(|interval| !interval.is_zero())
    }

    /// Adds `frame` of wall-clock time and returns how many ticks are due.
    pub fn advance(&mut self, frame: Duration, speed_multiplier: f64) -> u32 {
        let Some(interval) = self.tick_interval(speed_multiplier) else {
            self.accumulator = Duration::ZERO;
            return 0;
        };

        self.accumulator = self.accumulator.saturating_add(frame);
        let mut ticks = 0;
        while self.accumulator >= interval {
            self.accumulator -= interval;
            ticks += 1;
            if ticks == self.max_ticks_per_frame {
                self.accumulator = Duration::ZERO;
                break;
            }
        }
        ticks
    }
}
