#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snake Arcade engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative round world, and pure systems. Adapters submit [`Command`]
//! values describing player intent or the passage of simulated time, the world
//! executes those commands via its `apply` entry point, and then broadcasts
//! [`Event`] values for systems to react to deterministically. Systems consume
//! event streams, query immutable snapshots, and respond exclusively with new
//! command batches or presentation cues.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Snake Arcade.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the snake turn toward the provided direction.
    ///
    /// While the round is idle the first steer command also starts the round.
    Steer {
        /// Heading requested by the player.
        direction: Direction,
    },
    /// Abandons the round without recording an outcome.
    Abort,
    /// Advances the simulation by exactly one discrete tick.
    Tick {
        /// Duration of simulated time covered by the tick.
        dt: Duration,
    },
    /// Requests that an inactive hazard from the pool becomes active.
    SpawnHazard,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the first directional input started the round timer.
    RoundStarted,
    /// Indicates that the simulation clock advanced by one tick.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the snake head moved between two cells.
    SnakeMoved {
        /// Cell occupied by the head before moving.
        from: Cell,
        /// Cell occupied by the head after moving.
        to: Cell,
    },
    /// Confirms that the snake consumed the active food item.
    FoodEaten {
        /// Category of the consumed food.
        kind: FoodKind,
        /// Cell the food occupied.
        cell: Cell,
    },
    /// Announces that a new food item was placed on the board.
    FoodSpawned {
        /// Category drawn for the new food.
        kind: FoodKind,
        /// Cell the food occupies.
        cell: Cell,
    },
    /// Reports that the snake lost a life but keeps playing.
    LifeLost {
        /// Lives left after the loss.
        lives_remaining: u32,
    },
    /// Reports that the snake lost its final life.
    SnakeDied,
    /// Confirms that a hazard from the pool was activated.
    HazardSpawned {
        /// Pool slot that was activated.
        hazard: HazardId,
        /// Cell the hazard occupies.
        cell: Cell,
    },
    /// Reports that a hazard spawn request could not be honoured.
    HazardSpawnRejected {
        /// Specific reason the spawn failed.
        reason: HazardSpawnError,
    },
    /// Reports that the snake head touched an active hazard.
    HazardStruck {
        /// Pool slot of the hazard that was claimed.
        hazard: HazardId,
        /// Cell the hazard occupied.
        cell: Cell,
    },
    /// Reports that a hazard outlived its time-to-live without being touched.
    HazardExpired {
        /// Pool slot of the hazard that expired.
        hazard: HazardId,
    },
    /// Announces that the round reached a terminal status.
    RoundEnded {
        /// Terminal status reached by the round.
        status: RoundStatus,
        /// Score accumulated by the snake when the round ended.
        score: u32,
    },
}

/// Discrete presentation cues that collaborators map to audio or visual feedback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// The snake advanced by one cell.
    Moved,
    /// The snake consumed normal food.
    AteNormal,
    /// The snake consumed special food.
    AteSpecial,
    /// The snake lost a life but keeps playing.
    LostLife,
    /// The snake lost its final life.
    Died,
}

impl Cue {
    /// Name of the asset a collaborator should play for the cue.
    #[must_use]
    pub const fn asset_name(self) -> &'static str {
        match self {
            Self::Moved => "move",
            Self::AteNormal => "eat",
            Self::AteSpecial => "special_eat",
            Self::LostLife => "lose_life",
            Self::Died => "death",
        }
    }
}

/// Cardinal headings available to the snake.
///
/// Serialized by lower-case name, e.g. `"left"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in a fixed order, used when drawing a random heading.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Unit delta applied to a cell when moving one step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Direction pointing the exact opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so that a step off the left or top edge remains
/// representable and can be rejected by [`GridGeometry::is_in_bounds`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Cell reached by moving one step in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Immutable playfield dimensions including the reserved status strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGridGeometry", into = "RawGridGeometry")]
pub struct GridGeometry {
    width: u32,
    height: u32,
    safe_zone_height: u32,
}

impl GridGeometry {
    /// Creates a geometry, validating that at least one playable row remains.
    pub fn new(width: u32, height: u32, safe_zone_height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::Empty { width, height });
        }
        if safe_zone_height >= height {
            return Err(GeometryError::SafeZoneTooTall {
                safe_zone_height,
                height,
            });
        }
        if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
            return Err(GeometryError::TooLarge { width, height });
        }

        Ok(Self {
            width,
            height,
            safe_zone_height,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid, including the safe zone.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of rows at the top reserved for the status bar.
    #[must_use]
    pub const fn safe_zone_height(&self) -> u32 {
        self.safe_zone_height
    }

    /// Reports whether the cell lies inside the playable area.
    #[must_use]
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        let (Ok(x), Ok(y)) = (u32::try_from(cell.x()), u32::try_from(cell.y())) else {
            return false;
        };
        x < self.width && y >= self.safe_zone_height && y < self.height
    }

    /// Cell the snake occupies at round start and after losing a life.
    ///
    /// The row is offset by the safe zone so the snake never starts inside
    /// the status strip, then clamped to the last playable row.
    #[must_use]
    pub fn center(&self) -> Cell {
        let x = self.width / 2;
        let y = (self.height / 2 + self.safe_zone_height).min(self.height - 1);
        Cell::new(x as i32, y as i32)
    }

    /// Number of cells available for entities.
    #[must_use]
    pub const fn playable_cell_count(&self) -> u64 {
        self.width as u64 * (self.height - self.safe_zone_height) as u64
    }

    /// Iterator over every playable cell, row by row.
    pub fn playable_cells(&self) -> impl Iterator<Item = Cell> {
        let width = self.width as i32;
        let top = self.safe_zone_height as i32;
        let bottom = self.height as i32;
        (top..bottom).flat_map(move |y| (0..width).map(move |x| Cell::new(x, y)))
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            width: 40,
            height: 30,
            safe_zone_height: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct RawGridGeometry {
    width: u32,
    height: u32,
    safe_zone_height: u32,
}

impl TryFrom<RawGridGeometry> for GridGeometry {
    type Error = GeometryError;

    fn try_from(raw: RawGridGeometry) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height, raw.safe_zone_height)
    }
}

impl From<GridGeometry> for RawGridGeometry {
    fn from(geometry: GridGeometry) -> Self {
        Self {
            width: geometry.width,
            height: geometry.height,
            safe_zone_height: geometry.safe_zone_height,
        }
    }
}

/// Reasons a grid geometry may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// One of the dimensions was zero.
    #[error("grid must have at least one cell, got {width}x{height}")]
    Empty {
        /// Requested column count.
        width: u32,
        /// Requested row count.
        height: u32,
    },
    /// The safe zone would swallow every row of the grid.
    #[error("safe zone of {safe_zone_height} rows leaves no playable rows in a grid {height} rows tall")]
    SafeZoneTooTall {
        /// Requested safe zone height.
        safe_zone_height: u32,
        /// Requested grid height.
        height: u32,
    },
    /// A dimension exceeds the signed coordinate range.
    #[error("grid of {width}x{height} exceeds the addressable coordinate range")]
    TooLarge {
        /// Requested column count.
        width: u32,
        /// Requested row count.
        height: u32,
    },
}

/// Reasons a random placement may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// Every playable cell is already occupied.
    #[error("no free playable cell remains")]
    NoFreeCell,
}

/// Reasons a hazard spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum HazardSpawnError {
    /// Every hazard in the pool is already active.
    #[error("hazard pool is exhausted")]
    PoolExhausted,
    /// No free cell remained for the hazard.
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Categories of collectible food.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    /// Common food worth a single point.
    Normal,
    /// Rare food worth a large bonus.
    Special,
}

impl FoodKind {
    /// Points awarded when the food is consumed.
    #[must_use]
    pub const fn score_value(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Special => 50,
        }
    }

    /// Factor applied to the snake's speed multiplier on consumption.
    #[must_use]
    pub const fn speed_factor(self) -> f64 {
        match self {
            Self::Normal => 1.02,
            Self::Special => 1.05,
        }
    }

    /// Presentation cue associated with eating the food.
    #[must_use]
    pub const fn cue(self) -> Cue {
        match self {
            Self::Normal => Cue::AteNormal,
            Self::Special => Cue::AteSpecial,
        }
    }
}

/// Lifecycle state of a single round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundStatus {
    /// Waiting for the first directional input; the clock is frozen.
    Idle,
    /// The snake moves and the clock runs.
    Running,
    /// The snake lost its final life.
    Lost,
    /// The clock ran out with the snake still alive.
    Won,
    /// The player abandoned the round.
    Aborted,
}

impl RoundStatus {
    /// Reports whether the round can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Lost | Self::Won | Self::Aborted)
    }
}

/// Unique identifier assigned to a hazard slot in the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HazardId(u32);

impl HazardId {
    /// Creates a new hazard identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable configuration for a single round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundConfig {
    /// Playfield dimensions.
    pub grid: GridGeometry,
    /// Lives granted at round start.
    pub starting_lives: u32,
    /// Length of the countdown; `None` runs until the snake dies.
    pub duration_limit: Option<Duration>,
    /// Maximum number of hazards active at once. Zero disables hazards.
    pub hazard_pool_size: u32,
    /// Time an unclaimed hazard stays active.
    pub hazard_ttl: Duration,
    /// Cadence at which a new hazard is requested while the round runs.
    pub hazard_spawn_interval: Duration,
    /// Probability that a freshly spawned food is special.
    pub special_food_chance: f64,
    /// Ticks per second before the speed multiplier is applied.
    pub base_tick_rate: f64,
    /// Seed for every random draw made during the round.
    pub seed: u64,
    /// Heading of the fresh snake; drawn at random when absent.
    pub initial_direction: Option<Direction>,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            grid: GridGeometry::default(),
            starting_lives: 2,
            duration_limit: Some(Duration::from_secs(45)),
            hazard_pool_size: 3,
            hazard_ttl: Duration::from_secs(2),
            hazard_spawn_interval: Duration::from_secs(1),
            special_food_chance: 0.10,
            base_tick_rate: 10.0,
            seed: 0x5eed_cafe_f00d_b17e,
            initial_direction: None,
        }
    }
}

/// Immutable representation of the active food item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoodSnapshot {
    /// Cell the food occupies.
    pub cell: Cell,
    /// Category of the food.
    pub kind: FoodKind,
}

/// Immutable representation of an active hazard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HazardSnapshot {
    /// Pool slot of the hazard.
    pub id: HazardId,
    /// Cell the hazard occupies.
    pub cell: Cell,
    /// Simulated time elapsed since the hazard was activated.
    pub age: Duration,
}

/// Read-only snapshot consumed by renderers.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundSnapshot {
    /// Snake body ordered head first.
    pub body: Vec<Cell>,
    /// Lives left.
    pub lives: u32,
    /// Score accumulated so far.
    pub score: u32,
    /// Compounded speed multiplier.
    pub speed_multiplier: f64,
    /// Active food item, absent once the board is full.
    pub food: Option<FoodSnapshot>,
    /// Active hazards in slot order.
    pub hazards: Vec<HazardSnapshot>,
    /// Current round status.
    pub status: RoundStatus,
    /// Simulated running time.
    pub elapsed: Duration,
    /// Time left on the countdown, `None` when the round is unlimited.
    pub remaining: Option<Duration>,
}

impl RoundSnapshot {
    /// Whole-percent speed bonus shown on the status bar.
    #[must_use]
    pub fn speed_bonus_percent(&self) -> u32 {
        let bonus = ((self.speed_multiplier - 1.0) * 100.0).floor();
        if bonus.is_finite() && bonus > 0.0 {
            bonus as u32
        } else {
            0
        }
    }

    /// Cell occupied by the snake head.
    #[must_use]
    pub fn head(&self) -> Option<Cell> {
        self.body.first().copied()
    }
}
