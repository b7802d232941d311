//! Headless round driver wiring the world to its systems.

use std::{collections::BTreeMap, thread, time::Duration};

use anyhow::{bail, Context, Result};
use snake_arcade_core::{Command, Cue, Event, RoundConfig, RoundSnapshot, RoundStatus};
use snake_arcade_system_cues::Cues;
use snake_arcade_system_hazard_spawning::{Config as SpawningConfig, HazardSpawning};
use snake_arcade_system_pacing::{Config as PacingConfig, Pacing};
use snake_arcade_world::{self as world, query, World};
use tracing::{debug, info};

use crate::{autopilot, script::Script};

/// Source of player input.
#[derive(Debug)]
pub(crate) enum Pilot {
    /// Inputs replayed from a script file.
    Script(Script),
    /// Built-in greedy steering.
    Autopilot,
}

impl Pilot {
    fn max_ticks(&self) -> Option<u64> {
        match self {
            Self::Script(script) => script.max_ticks(),
            Self::Autopilot => None,
        }
    }

    fn start(&mut self, world: &World) -> Option<Command> {
        match self {
            Self::Script(script) => script.next_input(),
            Self::Autopilot => autopilot::choose(world).map(|direction| Command::Steer { direction }),
        }
    }

    fn inputs(&mut self, world: &World, out: &mut Vec<Command>) {
        match self {
            Self::Script(script) => script.due(query::tick_index(world), out),
            Self::Autopilot => {
                if let Some(direction) = autopilot::choose(world) {
                    out.push(Command::Steer { direction });
                }
            }
        }
    }
}

/// Frame loop settings.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SessionOptions {
    /// Wall-clock time represented by one frame.
    pub(crate) frame: Duration,
    /// Tick budget used when the pilot does not request one.
    pub(crate) max_ticks: u64,
    /// Sleep for each frame instead of running as fast as possible.
    pub(crate) realtime: bool,
}

/// Outcome of a headless round.
#[derive(Clone, Debug)]
pub(crate) struct SessionReport {
    /// Final state of the round.
    pub(crate) snapshot: RoundSnapshot,
    /// Ticks processed while the round ran.
    pub(crate) ticks: u64,
    /// Number of times each cue fired, keyed by asset name.
    pub(crate) cues: BTreeMap<&'static str, u32>,
}

struct Session {
    world: World,
    spawning: HazardSpawning,
    cues: Cues,
    cue_counts: BTreeMap<&'static str, u32>,
}

impl Session {
    fn new(config: RoundConfig) -> Result<Self> {
        let spawning = HazardSpawning::new(SpawningConfig::new(config.hazard_spawn_interval));
        let world = World::new(config).context("failed to set up round")?;
        Ok(Self {
            world,
            spawning,
            cues: Cues::default(),
            cue_counts: BTreeMap::new(),
        })
    }

    fn status(&self) -> RoundStatus {
        query::status(&self.world)
    }

    /// Advances the world by one tick at the snake's current speed.
    fn tick(&mut self, pacing: &Pacing) -> Result<()> {
        let multiplier = query::snake(&self.world).speed_multiplier();
        let dt = pacing
            .tick_interval(multiplier)
            .with_context(|| format!("unusable tick rate at speed multiplier {multiplier}"))?;
        self.apply(Command::Tick { dt });
        Ok(())
    }

    fn apply(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.process(events);
    }

    fn process(&mut self, pending_events: Vec<Event>) {
        let mut events = pending_events;

        loop {
            if events.is_empty() {
                break;
            }

            log_events(&events);
            let mut cues = Vec::new();
            self.cues.handle(&events, &mut cues);
            for cue in cues {
                self.record_cue(cue);
            }

            let mut commands = Vec::new();
            self.spawning
                .handle(&events, query::status(&self.world), &mut commands);
            events.clear();

            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn record_cue(&mut self, cue: Cue) {
        debug!(cue = cue.asset_name(), "cue");
        *self.cue_counts.entry(cue.asset_name()).or_default() += 1;
    }

    fn into_report(self) -> SessionReport {
        SessionReport {
            snapshot: query::snapshot(&self.world),
            ticks: query::tick_index(&self.world),
            cues: self.cue_counts,
        }
    }
}

/// Plays a round to completion, abort, or the tick budget.
pub(crate) fn run(
    config: RoundConfig,
    mut pilot: Pilot,
    options: &SessionOptions,
) -> Result<SessionReport> {
    if options.frame.is_zero() {
        bail!("frame duration must be positive");
    }

    let max_ticks = pilot.max_ticks().unwrap_or(options.max_ticks);
    let mut pacing = Pacing::new(PacingConfig::from_round(&config));
    let mut session = Session::new(config)?;

    while session.status() == RoundStatus::Idle {
        let Some(command) = pilot.start(&session.world) else {
            info!("no input started the round");
            return Ok(session.into_report());
        };
        session.apply(command);
    }

    let mut inputs = Vec::new();
    while !session.status().is_terminal() && query::tick_index(&session.world) < max_ticks {
        let multiplier = query::snake(&session.world).speed_multiplier();
        let ticks = pacing.advance(options.frame, multiplier);

        for _ in 0..ticks {
            if session.status().is_terminal() || query::tick_index(&session.world) >= max_ticks {
                break;
            }

            pilot.inputs(&session.world, &mut inputs);
            for command in inputs.drain(..) {
                session.apply(command);
            }
            session.tick(&pacing)?;
        }

        if options.realtime {
            thread::sleep(options.frame);
        }
    }

    if !session.status().is_terminal() {
        info!(max_ticks, "tick budget exhausted before the round ended");
    }
    Ok(session.into_report())
}

fn log_events(events: &[Event]) {
    for event in events {
        match event {
            Event::RoundStarted => info!("round started"),
            Event::RoundEnded { status, score } => info!(?status, score, "round ended"),
            Event::LifeLost { lives_remaining } => info!(lives_remaining, "life lost"),
            Event::SnakeDied => info!("snake died"),
            Event::FoodEaten { kind, cell } => debug!(?kind, ?cell, "food eaten"),
            other => debug!(event = ?other, "world event"),
        }
    }
}
