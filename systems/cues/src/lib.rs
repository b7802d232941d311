#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system translating world events into presentation cues.

use std::time::Duration;

use snake_arcade_core::{Cue, Event};

/// Configuration parameters required to construct the cue system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    move_cooldown: Duration,
}

impl Config {
    /// Creates a configuration that spaces movement cues at least `move_cooldown` apart.
    #[must_use]
    pub const fn new(move_cooldown: Duration) -> Self {
        Self { move_cooldown }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

/// Maps each event batch to the cues a collaborator should play.
#[derive(Debug)]
pub struct Cues {
    move_cooldown: Duration,
    since_last_move: Option<Duration>,
}

impl Cues {
    /// Creates a new cue system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            move_cooldown: config.move_cooldown,
            since_last_move: None,
        }
    }

    /// Consumes events in order and appends the resulting cues to `out`.
    ///
    /// Movement cues are measured against simulated time carried by
    /// `TimeAdvanced`, so a faster snake produces proportionally fewer of them.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Cue>) {
        for event in events {
            match event {
                Event::RoundStarted => self.since_last_move = None,
                Event::TimeAdvanced { dt } => {
                    if let Some(since) = self.since_last_move.as_mut() {
                        *since = since.saturating_add(*dt);
                    }
                }
                Event::SnakeMoved { .. } => {
                    if self.move_cue_ready() {
                        self.since_last_move = Some(Duration::ZERO);
                        out.push(Cue::Moved);
                    }
                }
                Event::FoodEaten { kind, .. } => out.push(kind.cue()),
                Event::LifeLost { .. } => out.push(Cue::LostLife),
                Event::SnakeDied => out.push(Cue::Died),
                _ => {}
            }
        }
    }

    fn move_cue_ready(&self) -> bool {
        self.since_last_move
            .map_or(true, |since| since >= self.move_cooldown)
    }
}

impl Default for Cues {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
