//! Random selection of free playable cells shared by every spawned entity.

use std::collections::HashSet;

use rand::Rng;
use snake_arcade_core::{Cell, GridGeometry, PlacementError};

/// Uniformly samples a playable cell that is not listed in `excluding`.
///
/// Saturation is detected before sampling so a full board fails fast with
/// [`PlacementError::NoFreeCell`] instead of re-sampling forever.
pub fn random_playable_cell<R>(
    geometry: &GridGeometry,
    rng: &mut R,
    excluding: &HashSet<Cell>,
) -> Result<Cell, PlacementError>
where
    R: Rng + ?Sized,
{
    let blocked = excluding
        .iter()
        .filter(|cell| geometry.is_in_bounds(**cell))
        .count() as u64;
    if blocked >= geometry.playable_cell_count() {
        return Err(PlacementError::NoFreeCell);
    }

    let width = geometry.width() as i32;
    let top = geometry.safe_zone_height() as i32;
    let bottom = geometry.height() as i32;

    loop {
        let cell = Cell::new(rng.gen_range(0..width), rng.gen_range(top..bottom));
        if !excluding.contains(&cell) {
            return Ok(cell);
        }
    }
}
