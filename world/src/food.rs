//! Food placement and category selection.

use std::collections::HashSet;

use rand::Rng;
use rand_distr::{Bernoulli, Distribution};
use snake_arcade_core::{Cell, FoodKind, FoodSnapshot, GridGeometry, PlacementError};

use crate::placement::random_playable_cell;

/// The single collectible food item on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Food {
    cell: Cell,
    kind: FoodKind,
}

impl Food {
    /// Creates food at an explicit cell.
    #[must_use]
    pub const fn new(cell: Cell, kind: FoodKind) -> Self {
        Self { cell, kind }
    }

    /// Places food on a random free cell and draws its category.
    ///
    /// The category is drawn independently of the cell from `special`, which
    /// yields `true` for special food.
    pub fn spawn<R>(
        geometry: &GridGeometry,
        rng: &mut R,
        excluding: &HashSet<Cell>,
        special: &Bernoulli,
    ) -> Result<Self, PlacementError>
    where
        R: Rng + ?Sized,
    {
        let cell = random_playable_cell(geometry, rng, excluding)?;
        let kind = if special.sample(rng) {
            FoodKind::Special
        } else {
            FoodKind::Normal
        };
        Ok(Self { cell, kind })
    }

    /// Cell the food occupies.
    #[must_use]
    pub const fn cell(&self) -> Cell {
        self.cell
    }

    /// Category of the food.
    #[must_use]
    pub const fn kind(&self) -> FoodKind {
        self.kind
    }

    pub(crate) fn snapshot(&self) -> FoodSnapshot {
        FoodSnapshot {
            cell: self.cell,
            kind: self.kind,
        }
    }
}
