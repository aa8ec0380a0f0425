//! World invariants - sanity checks that detect bugs.
//!
//! Every operation in the simulation preserves these. A violation means a
//! subsystem mutated state it should not have.

use std::collections::HashMap;

use crate::game::{Position, World};

/// Invariant violation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all world invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
/// Balances and node amounts are unsigned, so their lower bounds hold by
/// construction.
#[must_use]
pub fn check_invariants(world: &World) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let mut push = |message: String| violations.push(InvariantViolation { message });

    // Bounds
    for base in &world.bases {
        if !world.in_bounds(base.position) {
            push(format!("{} base at {} is off the grid", base.faction, base.position));
        }
    }
    for unit in &world.units {
        if !world.in_bounds(unit.position) {
            push(format!("Unit {} at {} is off the grid", unit.id, unit.position));
        }
    }

    // Exclusive occupancy
    let mut occupants: HashMap<Position, usize> = HashMap::new();
    let positions = world
        .bases
        .iter()
        .map(|b| b.position)
        .chain(world.units.iter().map(|u| u.position));
    for position in positions {
        *occupants.entry(position).or_default() += 1;
    }
    let mut shared: Vec<_> = occupants.into_iter().filter(|&(_, n)| n > 1).collect();
    shared.sort_unstable();
    for (position, count) in shared {
        push(format!("{count} entities share tile {position}"));
    }

    // Unit ids strictly increasing and below the next id
    for pair in world.units.windows(2) {
        if pair[0].id >= pair[1].id {
            push(format!("Unit ids out of order: {} then {}", pair[0].id, pair[1].id));
        }
    }
    let next_id = world.next_unit_id();
    if let Some(last) = world.units.last().filter(|u| u.id >= next_id) {
        push(format!("Unit id {} not below next id {next_id}", last.id));
    }

    // Mirror symmetry of resource placement
    let (width, height) = (world.config().width, world.config().height);
    for node in &world.resources {
        let mirror = node.position.mirror(width, height);
        if mirror == node.position {
            push(format!("Resource node {} sits on its own mirror", node.id));
        } else if !world.resources.iter().any(|r| r.position == mirror) {
            push(format!(
                "Resource node {} at {} has no sibling at {}",
                node.id, node.position, mirror
            ));
        }
    }

    violations
}

/// Assert all world invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(world: &World) {
    let violations = check_invariants(world);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("World invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_world: &World) {}
