#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round state management for Snake Arcade.
//!
//! A [`World`] owns one round: the snake, the food item, the hazard pool and
//! the countdown. It only changes through [`apply`], which reports every
//! observable change as an [`Event`].

use std::{collections::HashSet, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Bernoulli;
use snake_arcade_core::{
    Cell, Command, Direction, Event, GridGeometry, PlacementError, RoundConfig, RoundStatus,
};
use thiserror::Error;

mod food;
mod hazards;
mod placement;
mod snake;

pub use food::Food;
pub use hazards::{Hazard, HazardPool};
pub use placement::random_playable_cell;
pub use snake::{Penalty, Snake, Step};

/// Reasons a round could not be set up.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum WorldError {
    /// The special food probability is not within `0.0..=1.0`.
    #[error("special food chance {0} is not a probability")]
    InvalidSpecialFoodChance(f64),
    /// The board had no room for the first food item.
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

/// Represents the authoritative state of a single round.
#[derive(Debug)]
pub struct World {
    config: RoundConfig,
    rng: ChaCha8Rng,
    special_food: Bernoulli,
    snake: Snake,
    food: Option<Food>,
    hazards: HazardPool,
    status: RoundStatus,
    elapsed: Duration,
    tick_index: u64,
}

impl World {
    /// Creates a fresh, idle round from the provided configuration.
    pub fn new(config: RoundConfig) -> Result<Self, WorldError> {
        let special_food = Bernoulli::new(config.special_food_chance)
            .map_err(|_| WorldError::InvalidSpecialFoodChance(config.special_food_chance))?;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let facing = config
            .initial_direction
            .unwrap_or_else(|| Direction::ALL[rng.gen_range(0..Direction::ALL.len())]);
        let snake = Snake::new(config.grid.center(), facing, config.starting_lives);

        let occupied: HashSet<Cell> = snake.body().copied().collect();
        let food = Food::spawn(&config.grid, &mut rng, &occupied, &special_food)?;
        let hazards = HazardPool::new(config.hazard_pool_size, config.hazard_ttl);

        Ok(Self {
            config,
            rng,
            special_food,
            snake,
            food: Some(food),
            hazards,
            status: RoundStatus::Idle,
            elapsed: Duration::ZERO,
            tick_index: 0,
        })
    }

    fn geometry(&self) -> &GridGeometry {
        &self.config.grid
    }

    fn remaining(&self) -> Option<Duration> {
        self.config
            .duration_limit
            .map(|limit| limit.saturating_sub(self.elapsed))
    }

    fn occupied_cells(&self) -> HashSet<Cell> {
        let mut cells: HashSet<Cell> = self.snake.body().copied().collect();
        cells.extend(self.hazards.active().map(Hazard::cell));
        cells
    }

    fn run_tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });
        let now = self.elapsed.saturating_add(dt);

        match self.snake.advance(&self.config.grid) {
            Some(Step::Moved { from, to }) => out_events.push(Event::SnakeMoved { from, to }),
            Some(Step::Crashed(penalty)) => push_penalty(penalty, out_events),
            None => {}
        }

        if self.snake.is_alive() {
            self.resolve_food(out_events);
        }
        if self.snake.is_alive() {
            self.resolve_hazards(now, out_events);
        }

        let mut expired = Vec::new();
        self.hazards.expire(now, &mut expired);
        out_events.extend(
            expired
                .into_iter()
                .map(|hazard| Event::HazardExpired { hazard }),
        );

        self.elapsed = now;

        if !self.snake.is_alive() {
            self.finish(RoundStatus::Lost, out_events);
        } else if self.food.is_none() || self.remaining() == Some(Duration::ZERO) {
            self.finish(RoundStatus::Won, out_events);
        }
    }

    fn resolve_food(&mut self, out_events: &mut Vec<Event>) {
        let head = self.snake.head();
        let Some(food) = self.food.filter(|food| food.cell() == head) else {
            return;
        };

        self.snake.consume_food(food.kind());
        out_events.push(Event::FoodEaten {
            kind: food.kind(),
            cell: food.cell(),
        });

        let occupied = self.occupied_cells();
        self.food = Food::spawn(
            &self.config.grid,
            &mut self.rng,
            &occupied,
            &self.special_food,
        )
        .ok();
        if let Some(food) = self.food {
            out_events.push(Event::FoodSpawned {
                kind: food.kind(),
                cell: food.cell(),
            });
        }
    }

    fn resolve_hazards(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        let head = self.snake.head();
        while let Some(hazard) = self.hazards.strike(head, now) {
            out_events.push(Event::HazardStruck { hazard, cell: head });
            match self.snake.consume_hazard() {
                Some(penalty) => push_penalty(penalty, out_events),
                None => break,
            }
            if !self.snake.is_alive() {
                break;
            }
        }
    }

    fn spawn_hazard(&mut self, out_events: &mut Vec<Event>) {
        let mut occupied = self.occupied_cells();
        if let Some(food) = self.food {
            let _ = occupied.insert(food.cell());
        }

        match self
            .hazards
            .spawn(self.elapsed, &self.config.grid, &mut self.rng, &occupied)
        {
            Ok((hazard, cell)) => out_events.push(Event::HazardSpawned { hazard, cell }),
            Err(reason) => out_events.push(Event::HazardSpawnRejected { reason }),
        }
    }

    fn finish(&mut self, status: RoundStatus, out_events: &mut Vec<Event>) {
        self.status = status;
        out_events.push(Event::RoundEnded {
            status,
            score: self.snake.score(),
        });
    }
}

fn push_penalty(penalty: Penalty, out_events: &mut Vec<Event>) {
    match penalty {
        Penalty::LifeLost { lives_remaining } => {
            out_events.push(Event::LifeLost { lives_remaining });
        }
        Penalty::Died => out_events.push(Event::SnakeDied),
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Terminal rounds ignore every command.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.status.is_terminal() {
        return;
    }

    match command {
        Command::Steer { direction } => {
            let _ = world.snake.change_direction(direction);
            if world.status == RoundStatus::Idle {
                world.status = RoundStatus::Running;
                out_events.push(Event::RoundStarted);
            }
        }
        Command::Abort => world.finish(RoundStatus::Aborted, out_events),
        Command::Tick { dt } => {
            if world.status == RoundStatus::Running {
                world.run_tick(dt, out_events);
            }
        }
        Command::SpawnHazard => {
            if world.status == RoundStatus::Running {
                world.spawn_hazard(out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Food, HazardPool, Snake, World};
    use snake_arcade_core::{GridGeometry, RoundSnapshot, RoundStatus};

    /// Captures the read-only snapshot consumed by renderers.
    #[must_use]
    pub fn snapshot(world: &World) -> RoundSnapshot {
        RoundSnapshot {
            body: world.snake.body().copied().collect(),
            lives: world.snake.lives(),
            score: world.snake.score(),
            speed_multiplier: world.snake.speed_multiplier(),
            food: world.food.as_ref().map(Food::snapshot),
            hazards: world.hazards.snapshots(world.elapsed),
            status: world.status,
            elapsed: world.elapsed,
            remaining: world.remaining(),
        }
    }

    /// Playfield dimensions of the round.
    #[must_use]
    pub fn geometry(world: &World) -> &GridGeometry {
        world.geometry()
    }

    /// Provides read-only access to the snake.
    #[must_use]
    pub fn snake(world: &World) -> &Snake {
        &world.snake
    }

    /// Provides read-only access to the active food item.
    #[must_use]
    pub fn food(world: &World) -> Option<&Food> {
        world.food.as_ref()
    }

    /// Provides read-only access to the hazard pool.
    #[must_use]
    pub fn hazards(world: &World) -> &HazardPool {
        &world.hazards
    }

    /// Current lifecycle status of the round.
    #[must_use]
    pub fn status(world: &World) -> RoundStatus {
        world.status
    }

    /// Simulated time the round has been running.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Time left on the countdown, `None` when unlimited.
    #[must_use]
    pub fn remaining(world: &World) -> Option<Duration> {
        world.remaining()
    }

    /// Number of ticks processed while running.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

/// Direct state manipulation used to stage deterministic scenarios.
#[cfg(any(test, feature = "scenario_scaffolding"))]
pub mod scaffolding {
    use snake_arcade_core::{Cell, FoodKind, HazardId};

    use super::{Food, Snake, World};

    /// Replaces the active food item.
    pub fn place_food(world: &mut World, cell: Cell, kind: FoodKind) {
        world.food = Some(Food::new(cell, kind));
    }

    /// Activates the lowest inactive hazard at `cell` using the current clock.
    pub fn place_hazard(world: &mut World, cell: Cell) -> Option<HazardId> {
        let now = world.elapsed;
        world.hazards.place(cell, now)
    }

    /// Replaces the snake.
    pub fn replace_snake(world: &mut World, snake: Snake) {
        world.snake = snake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snake_arcade_core::{FoodKind, HazardId, HazardSpawnError};

    const TICK: Duration = Duration::from_millis(100);

    fn config() -> RoundConfig {
        RoundConfig {
            initial_direction: Some(Direction::Right),
            seed: 0x0dd_ba11,
            ..RoundConfig::default()
        }
    }

    fn world() -> World {
        World::new(config()).expect("valid round")
    }

    fn tick(world: &mut World) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Tick { dt: TICK }, &mut events);
        events
    }

    fn steer(world: &mut World, direction: Direction) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Steer { direction }, &mut events);
        events
    }

    #[test]
    fn idle_round_ignores_ticks() {
        let mut world = world();
        let head = query::snake(&world).head();

        assert!(tick(&mut world).is_empty());
        assert_eq!(query::status(&world), RoundStatus::Idle);
        assert_eq!(query::elapsed(&world), Duration::ZERO);
        assert_eq!(query::snake(&world).head(), head);
        assert_eq!(query::remaining(&world), Some(Duration::from_secs(45)));
    }

    #[test]
    fn first_steer_starts_the_round() {
        let mut world = world();
        assert_eq!(steer(&mut world, Direction::Up), vec![Event::RoundStarted]);
        assert_eq!(query::status(&world), RoundStatus::Running);
        assert!(steer(&mut world, Direction::Left).is_empty());
    }

    #[test]
    fn reverse_steer_still_starts_the_round() {
        let mut world = world();
        let _ = steer(&mut world, Direction::Left);
        assert_eq!(query::status(&world), RoundStatus::Running);
        assert_eq!(query::snake(&world).direction(), Direction::Right);
    }

    #[test]
    fn running_tick_moves_snake_and_advances_clock() {
        let mut world = world();
        scaffolding::place_food(&mut world, Cell::new(0, 29), FoodKind::Normal);
        let _ = steer(&mut world, Direction::Right);

        let events = tick(&mut world);
        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced { dt: TICK },
                Event::SnakeMoved {
                    from: Cell::new(20, 17),
                    to: Cell::new(21, 17),
                },
            ]
        );
        assert_eq!(query::elapsed(&world), TICK);
        assert_eq!(query::tick_index(&world), 1);
    }

    #[test]
    fn eating_food_rewards_and_respawns_elsewhere() {
        let mut world = world();
        scaffolding::place_food(&mut world, Cell::new(21, 17), FoodKind::Special);
        let _ = steer(&mut world, Direction::Right);

        let events = tick(&mut world);
        assert!(events.contains(&Event::FoodEaten {
            kind: FoodKind::Special,
            cell: Cell::new(21, 17),
        }));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::FoodSpawned { .. })));

        let snake = query::snake(&world);
        assert_eq!(snake.score(), 50);
        assert_eq!(snake.target_length(), 2);
        assert!((snake.speed_multiplier() - 1.05).abs() < 1e-9);

        let food = query::food(&world).expect("food respawned");
        assert!(!snake.occupies(food.cell()));
        assert!(query::geometry(&world).is_in_bounds(food.cell()));
    }

    #[test]
    fn hazard_contact_costs_a_life_and_deactivates_it() {
        let mut world = world();
        scaffolding::place_food(&mut world, Cell::new(0, 29), FoodKind::Normal);
        let hazard = scaffolding::place_hazard(&mut world, Cell::new(21, 17)).expect("free slot");
        let _ = steer(&mut world, Direction::Right);

        let events = tick(&mut world);
        assert!(events.contains(&Event::HazardStruck {
            hazard,
            cell: Cell::new(21, 17),
        }));
        assert!(events.contains(&Event::LifeLost { lives_remaining: 1 }));

        let snake = query::snake(&world);
        assert_eq!(snake.lives(), 1);
        assert_eq!(snake.head(), Cell::new(20, 17));
        assert_eq!(query::hazards(&world).active().count(), 0);
        assert_eq!(query::status(&world), RoundStatus::Running);
    }

    #[test]
    fn hazard_on_last_life_loses_the_round() {
        let mut world = World::new(RoundConfig {
            starting_lives: 1,
            ..config()
        })
        .expect("valid round");
        scaffolding::place_food(&mut world, Cell::new(0, 29), FoodKind::Normal);
        let _ = scaffolding::place_hazard(&mut world, Cell::new(21, 17));
        let _ = steer(&mut world, Direction::Right);

        let events = tick(&mut world);
        assert!(events.contains(&Event::SnakeDied));
        assert_eq!(
            events.last(),
            Some(&Event::RoundEnded {
                status: RoundStatus::Lost,
                score: 0,
            })
        );
        assert_eq!(query::status(&world), RoundStatus::Lost);
    }

    #[test]
    fn unclaimed_hazard_expires_after_ttl() {
        let mut world = world();
        scaffolding::place_food(&mut world, Cell::new(0, 29), FoodKind::Normal);
        let _ = steer(&mut world, Direction::Up);
        let hazard = scaffolding::place_hazard(&mut world, Cell::new(0, 2)).expect("free slot");

        let mut expired_at = None;
        for index in 1..=25 {
            let events = tick(&mut world);
            if events.contains(&Event::HazardExpired { hazard }) {
                expired_at = Some(index);
                break;
            }
        }

        assert_eq!(expired_at, Some(21), "hazard must outlive exactly 2.0s");
        assert_eq!(query::hazards(&world).active().count(), 0);
    }

    #[test]
    fn time_up_wins_the_round() {
        let mut world = World::new(RoundConfig {
            duration_limit: Some(Duration::from_millis(300)),
            ..config()
        })
        .expect("valid round");
        scaffolding::place_food(&mut world, Cell::new(0, 29), FoodKind::Normal);
        let _ = steer(&mut world, Direction::Right);

        let _ = tick(&mut world);
        let _ = tick(&mut world);
        assert_eq!(query::status(&world), RoundStatus::Running);
        let events = tick(&mut world);
        assert_eq!(
            events.last(),
            Some(&Event::RoundEnded {
                status: RoundStatus::Won,
                score: 0,
            })
        );
        assert_eq!(query::remaining(&world), Some(Duration::ZERO));
        assert!(tick(&mut world).is_empty(), "terminal rounds ignore ticks");
    }

    #[test]
    fn death_takes_priority_over_time_up() {
        let mut world = World::new(RoundConfig {
            duration_limit: Some(TICK),
            starting_lives: 1,
            ..config()
        })
        .expect("valid round");
        scaffolding::place_food(&mut world, Cell::new(0, 29), FoodKind::Normal);
        scaffolding::replace_snake(
            &mut world,
            Snake::new(Cell::new(39, 17), Direction::Right, 1),
        );
        let _ = steer(&mut world, Direction::Right);

        let _ = tick(&mut world);
        assert_eq!(query::remaining(&world), Some(Duration::ZERO));
        assert_eq!(query::status(&world), RoundStatus::Lost);
    }

    #[test]
    fn abort_ends_round_without_outcome() {
        let mut world = world();
        let mut events = Vec::new();
        apply(&mut world, Command::Abort, &mut events);
        assert_eq!(
            events,
            vec![Event::RoundEnded {
                status: RoundStatus::Aborted,
                score: 0,
            }]
        );
        assert!(steer(&mut world, Direction::Up).is_empty());
    }

    #[test]
    fn spawn_requests_respect_pool_size() {
        let mut world = world();
        let _ = steer(&mut world, Direction::Up);

        let mut events = Vec::new();
        for _ in 0..4 {
            apply(&mut world, Command::SpawnHazard, &mut events);
        }

        let spawned: Vec<HazardId> = events
            .iter()
            .filter_map(|event| match event {
                Event::HazardSpawned { hazard, .. } => Some(*hazard),
                _ => None,
            })
            .collect();
        assert_eq!(spawned, vec![HazardId::new(0), HazardId::new(1), HazardId::new(2)]);
        assert_eq!(
            events.last(),
            Some(&Event::HazardSpawnRejected {
                reason: HazardSpawnError::PoolExhausted,
            })
        );

        let snapshot = query::snapshot(&world);
        let food = snapshot.food.expect("food present");
        assert_eq!(snapshot.hazards.len(), 3);
        assert!(snapshot.hazards.iter().all(|hazard| hazard.cell != food.cell));
        assert!(snapshot
            .hazards
            .iter()
            .all(|hazard| !snapshot.body.contains(&hazard.cell)));
    }

    #[test]
    fn idle_round_ignores_spawn_requests() {
        let mut world = world();
        let mut events = Vec::new();
        apply(&mut world, Command::SpawnHazard, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn full_board_wins_the_round() {
        let geometry = GridGeometry::new(3, 2, 1).expect("valid geometry");
        let mut world = World::new(RoundConfig {
            grid: geometry,
            ..config()
        })
        .expect("valid round");

        let mut snake = Snake::with_body(
            geometry.center(),
            vec![Cell::new(1, 1), Cell::new(0, 1)],
            Direction::Right,
            2,
        );
        snake.consume_food(FoodKind::Normal);
        scaffolding::replace_snake(&mut world, snake);
        scaffolding::place_food(&mut world, Cell::new(2, 1), FoodKind::Normal);
        let _ = steer(&mut world, Direction::Right);

        let events = tick(&mut world);
        assert_eq!(query::snake(&world).body().len(), 3);
        assert!(query::food(&world).is_none());
        assert_eq!(
            events.last(),
            Some(&Event::RoundEnded {
                status: RoundStatus::Won,
                score: 2,
            })
        );
    }

    #[test]
    fn invalid_special_chance_is_rejected() {
        let result = World::new(RoundConfig {
            special_food_chance: 1.5,
            ..config()
        });
        assert!(matches!(
            result,
            Err(WorldError::InvalidSpecialFoodChance(_))
        ));
    }

    #[test]
    fn same_seed_places_identical_food() {
        let first = World::new(RoundConfig::default()).expect("valid round");
        let second = World::new(RoundConfig::default()).expect("valid round");
        assert_eq!(query::food(&first), query::food(&second));
        assert_eq!(
            query::snake(&first).direction(),
            query::snake(&second).direction()
        );
    }
}
