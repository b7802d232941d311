//! Snake body, heading, and life bookkeeping.

use std::collections::VecDeque;

use snake_arcade_core::{Cell, Direction, FoodKind, GridGeometry};

/// Result of a single [`Snake::advance`] call on a living snake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The head moved into a free cell.
    Moved {
        /// Head position before the move.
        from: Cell,
        /// Head position after the move.
        to: Cell,
    },
    /// The head would have left the playfield or hit the body.
    Crashed(Penalty),
}

/// Consequence of losing a life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Penalty {
    /// A life was lost and the snake restarts from its home cell.
    LifeLost {
        /// Lives left after the loss.
        lives_remaining: u32,
    },
    /// The final life was lost.
    Died,
}

/// The player-controlled snake.
///
/// The body is ordered head first and is never empty. Score, lives and the
/// speed multiplier survive a life loss; only a fresh snake resets them.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    home: Cell,
    facing: Direction,
    pending: Option<Direction>,
    target_length: u32,
    score: u32,
    lives: u32,
    alive: bool,
    speed_multiplier: f64,
}

impl Snake {
    /// Creates a single-cell snake at `home`.
    #[must_use]
    pub fn new(home: Cell, facing: Direction, lives: u32) -> Self {
        Self::with_body(home, vec![home], facing, lives)
    }

    /// Creates a snake with an explicit body, ordered head first.
    ///
    /// The target length matches the body length. An empty body collapses to
    /// a single cell at `home`.
    #[must_use]
    pub fn with_body(home: Cell, body: Vec<Cell>, facing: Direction, lives: u32) -> Self {
        let mut body: VecDeque<Cell> = body.into();
        if body.is_empty() {
            body.push_back(home);
        }
        let target_length = u32::try_from(body.len()).unwrap_or(u32::MAX);

        Self {
            body,
            home,
            facing,
            pending: None,
            target_length,
            score: 0,
            lives,
            alive: lives > 0,
            speed_multiplier: 1.0,
        }
    }

    /// Cell occupied by the head.
    #[must_use]
    pub fn head(&self) -> Cell {
        self.body.front().copied().unwrap_or(self.home)
    }

    /// Body cells ordered head first.
    pub fn body(&self) -> impl ExactSizeIterator<Item = &Cell> + '_ {
        self.body.iter()
    }

    /// Reports whether the body covers the provided cell.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Heading the snake will take on its next advance.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.pending.unwrap_or(self.facing)
    }

    /// Heading applied on the most recent advance.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Length the body grows toward.
    #[must_use]
    pub const fn target_length(&self) -> u32 {
        self.target_length
    }

    /// Points accumulated so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Lives left.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Reports whether the snake still has a life to play.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Compounded speed multiplier applied to the tick rate.
    #[must_use]
    pub const fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Queues a heading change for the next advance.
    ///
    /// Reversals relative to the applied heading are ignored. Returns whether
    /// the request was accepted; later accepted requests replace earlier ones.
    pub fn change_direction(&mut self, direction: Direction) -> bool {
        if !self.alive || direction == self.facing.opposite() {
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Moves the head one cell, resolving wall and self collisions.
    ///
    /// Returns `None` once the snake is dead.
    pub fn advance(&mut self, geometry: &GridGeometry) -> Option<Step> {
        if !self.alive {
            return None;
        }

        if let Some(direction) = self.pending.take() {
            self.facing = direction;
        }

        let from = self.head();
        let to = from.step(self.facing);

        if !geometry.is_in_bounds(to) || self.body.iter().skip(1).any(|cell| *cell == to) {
            return Some(Step::Crashed(self.lose_life()));
        }

        self.body.push_front(to);
        while self.body.len() > self.target_length as usize {
            let _ = self.body.pop_back();
        }

        Some(Step::Moved { from, to })
    }

    /// Applies the reward for eating food of the provided kind.
    pub fn consume_food(&mut self, kind: FoodKind) {
        if !self.alive {
            return;
        }
        self.target_length = self.target_length.saturating_add(1);
        self.score = self.score.saturating_add(kind.score_value());
        self.speed_multiplier *= kind.speed_factor();
    }

    /// Applies the penalty for touching a hazard.
    ///
    /// Returns `None` once the snake is dead.
    pub fn consume_hazard(&mut self) -> Option<Penalty> {
        if !self.alive {
            return None;
        }
        Some(self.lose_life())
    }

    fn lose_life(&mut self) -> Penalty {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.alive = false;
            return Penalty::Died;
        }

        self.body.clear();
        self.body.push_back(self.home);
        Penalty::LifeLost {
            lives_remaining: self.lives,
        }
    }
}
