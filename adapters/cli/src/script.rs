//! Scripted player input for headless rounds.
//!
//! ```toml
//! max_ticks = 400
//!
//! [[step]]
//! tick = 0
//! input = "right"
//!
//! [[step]]
//! tick = 12
//! input = "down"
//! ```
//!
//! A step fires just before the world processes tick number `tick + 1`. While
//! the round waits for its first input the clock is frozen, so the earliest
//! step starts the round whatever its tick.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use snake_arcade_core::{Command, Direction};

/// A single player input: `"abort"` or a heading name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Input {
    Abort,
    #[serde(untagged)]
    Steer(Direction),
}

impl Input {
    fn command(self) -> Command {
        match self {
            Self::Abort => Command::Abort,
            Self::Steer(direction) => Command::Steer { direction },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct Step {
    tick: u64,
    input: Input,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    #[serde(default)]
    max_ticks: Option<u64>,
    #[serde(default, rename = "step")]
    steps: Vec<Step>,
}

/// Ordered list of inputs keyed by the tick they precede.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Script {
    steps: Vec<Step>,
    cursor: usize,
    max_ticks: Option<u64>,
}

impl Script {
    /// Reads and parses the script at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read input script at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid input script at {}", path.display()))
    }

    /// Parses script contents; steps are ordered by tick, keeping file order on ties.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let file: ScriptFile =
            toml::from_str(contents).context("failed to parse input script toml contents")?;
        let mut steps = file.steps;
        steps.sort_by_key(|step| step.tick);
        Ok(Self {
            steps,
            cursor: 0,
            max_ticks: file.max_ticks,
        })
    }

    /// Tick budget requested by the script.
    pub(crate) const fn max_ticks(&self) -> Option<u64> {
        self.max_ticks
    }

    /// Appends the commands due at or before `tick` to `out`.
    pub(crate) fn due(&mut self, tick: u64, out: &mut Vec<Command>) {
        while let Some(step) = self.steps.get(self.cursor) {
            if step.tick > tick {
                break;
            }
            out.push(step.input.command());
            self.cursor += 1;
        }
    }

    /// Delivers the next undelivered step regardless of its tick.
    ///
    /// Used while the round waits for its first input and the clock is frozen.
    pub(crate) fn next_input(&mut self) -> Option<Command> {
        let step = self.steps.get(self.cursor)?;
        self.cursor += 1;
        Some(step.input.command())
    }
}
