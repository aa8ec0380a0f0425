//! Mirror-symmetric resource placement.

// Grid coordinates and node counts are far below u32/i32 limits
#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use std::collections::HashSet;

use crate::error::SetupError;
use crate::game::{Position, ResourceNode, World};

/// Sampling attempts before placement gives up.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Place resource nodes in point-symmetric pairs.
///
/// Each accepted sample `p1` in the left half of the grid is paired with its
/// reflection through the grid centre. Base tiles are never used, and a
/// sample that is its own reflection is discarded. Nodes are numbered from 1
/// in placement order, `p1` before its mirror.
///
/// An odd `n` is rounded up to the next even number.
///
/// This is the only consumer of the world's generator.
///
/// # Errors
///
/// Returns [`SetupError::ResourcePlacement`] if `n` nodes cannot be placed
/// within [`MAX_PLACEMENT_ATTEMPTS`] samples.
pub fn place_symmetric_resources(
    world: &mut World,
    n: u32,
    remaining_per_node: u32,
) -> Result<Vec<ResourceNode>, SetupError> {
    let target = n.saturating_add(n % 2);
    let width = world.config().width;
    let height = world.config().height;
    let half_width = u32::from(width / 2);
    let area = u32::from(width) * u32::from(height);

    let mut used: HashSet<Position> = world.bases.iter().map(|b| b.position).collect();
    let mut resources = Vec::with_capacity(target.min(area) as usize);
    let mut attempts = 0;

    while (resources.len() as u32) < target && attempts < MAX_PLACEMENT_ATTEMPTS && half_width > 0 {
        attempts += 1;

        let x = world.rng.next_below(half_width);
        let y = world.rng.next_below(u32::from(height));
        let p1 = Position::new(x as i32, y as i32);
        let p2 = p1.mirror(width, height);

        if p1 == p2 || used.contains(&p1) || used.contains(&p2) {
            continue;
        }
        used.insert(p1);
        used.insert(p2);

        for position in [p1, p2] {
            let id = resources.len() as u32 + 1;
            resources.push(ResourceNode {
                id,
                position,
                remaining: remaining_per_node,
            });
        }
    }

    let placed = resources.len() as u32;
    if placed < target {
        return Err(SetupError::ResourcePlacement {
            requested: target,
            placed,
            attempts,
        });
    }

    tracing::debug!(nodes = placed, attempts, "placed symmetric resources");
    Ok(resources)
}
