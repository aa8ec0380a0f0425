//! Single-tile movement.

use crate::game::{Direction, Position, UnitId, World};

/// Move a unit one tile in `direction`.
///
/// Returns `false` without touching the world if the unit does not exist, or
/// if the destination is off the grid or holds a base or another unit.
pub fn move_unit(world: &mut World, unit_id: UnitId, direction: Direction) -> bool {
    let Some(unit) = world.unit(unit_id) else {
        return false;
    };

    let destination = unit.position.step(direction);
    if !world.in_bounds(destination) || world.is_occupied(destination) {
        return false;
    }

    if let Some(unit) = world.unit_mut(unit_id) {
        unit.position = destination;
        true
    } else {
        false
    }
}

/// Direction of the single step `move_towards` would try.
///
/// Horizontal progress takes priority: right, then left, then down, then up.
/// Returns `None` when `from == target`.
#[must_use]
pub fn heuristic_direction(from: Position, target: Position) -> Option<Direction> {
    if target.x > from.x {
        Some(Direction::Right)
    } else if target.x < from.x {
        Some(Direction::Left)
    } else if target.y > from.y {
        Some(Direction::Down)
    } else if target.y < from.y {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Take one heuristic step from the unit's tile toward `target`.
///
/// Only the direction chosen by [`heuristic_direction`] is attempted. If that
/// step is blocked the call fails, even when another direction would still
/// close the distance; agents have to route around obstacles themselves.
pub fn move_towards(world: &mut World, unit_id: UnitId, target: Position) -> bool {
    let Some(unit) = world.unit(unit_id) else {
        return false;
    };

    match heuristic_direction(unit.position, target) {
        Some(direction) => move_unit(world, unit_id, direction),
        None => false,
    }
}
