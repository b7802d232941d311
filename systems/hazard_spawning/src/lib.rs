#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic system that asks the world to place hazards on a fixed cadence.
//!
//! The system never picks cells itself. Placement stays with the world so that
//! every random draw comes from the round's seeded generator.

use std::time::Duration;

use snake_arcade_core::{Command, Event, RoundStatus};

/// Configuration parameters required to construct the hazard spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence.
    #[must_use]
    pub const fn new(spawn_interval: Duration) -> Self {
        Self { spawn_interval }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

/// Pure system that emits a spawn request for every elapsed interval of a running round.
#[derive(Debug)]
pub struct HazardSpawning {
    spawn_interval: Duration,
    accumulator: Duration,
}

impl HazardSpawning {
    /// Creates a new hazard spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Consumes events and the round status to emit spawn commands.
    ///
    /// Time only accumulates while the round is running; any other status
    /// discards partial progress toward the next spawn.
    pub fn handle(&mut self, events: &[Event], status: RoundStatus, out: &mut Vec<Command>) {
        if status != RoundStatus::Running {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.spawn_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let attempts = self.resolve_spawn_attempts();
        out.extend(std::iter::repeat(Command::SpawnHazard).take(attempts));
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }
}
