//! Greedy pilot used when no input script is supplied.

use std::collections::HashSet;

use snake_arcade_core::{Cell, Direction, RoundStatus};
use snake_arcade_world::{query, World};

/// Chooses the safe heading that brings the head closest to the food.
///
/// A heading is safe when the next cell stays on the board, avoids the body
/// behind the head and holds no hazard. When nothing is safe the pilot keeps
/// its current heading.
pub(crate) fn choose(world: &World) -> Option<Direction> {
    let snake = query::snake(world);
    let geometry = query::geometry(world);
    let head = snake.head();
    let facing = snake.facing();
    let target = query::food(world).map(|food| food.cell());

    let mut blocked: HashSet<Cell> = snake.body().skip(1).copied().collect();
    blocked.extend(query::hazards(world).active().map(|hazard| hazard.cell()));

    let best = candidates(facing)
        .filter(|direction| {
            let next = head.step(*direction);
            geometry.is_in_bounds(next) && !blocked.contains(&next)
        })
        .min_by_key(|direction| target.map_or(0, |food| distance(head.step(*direction), food)))
        .unwrap_or(facing);

    let idle = query::status(world) == RoundStatus::Idle;
    (idle || best != snake.direction()).then_some(best)
}

/// Current heading first so ties keep the snake going straight.
fn candidates(facing: Direction) -> impl Iterator<Item = Direction> {
    std::iter::once(facing).chain(
        Direction::ALL
            .into_iter()
            .filter(move |direction| *direction != facing && *direction != facing.opposite()),
    )
}

fn distance(from: Cell, to: Cell) -> u32 {
    from.x().abs_diff(to.x()) + from.y().abs_diff(to.y())
}
