//! Resource gathering and worker recruitment.

use crate::game::{Faction, UnitId, World};

/// Gather from the resource node under a worker.
///
/// Moves `min(worker_gather_amount, remaining)` from the node into the
/// worker's faction bank. Fails without side effects if the unit does not
/// exist, is not a worker, or is not standing on a non-depleted node.
pub fn gather(world: &mut World, worker_id: UnitId) -> bool {
    let Some(unit) = world.unit(worker_id) else {
        return false;
    };
    if !unit.is_worker() {
        return false;
    }
    let (faction, position) = (unit.faction, unit.position);
    let gather_amount = world.config().worker_gather_amount;

    let Some(node) = world.resource_at_mut(position) else {
        return false;
    };
    let amount = gather_amount.min(node.remaining);
    node.remaining -= amount;
    world.bank.deposit(faction, amount);
    true
}

/// Recruit a worker next to a faction's base.
///
/// Requires the faction to be below `max_workers` and to afford
/// `worker_spawn_cost`. The neighbours of the base are tried in the fixed
/// order `+x`, `-x`, `+y`, `-y`; the first free in-bounds tile receives the
/// worker. Fails without side effects if no tile is free.
pub fn spawn_worker(world: &mut World, faction: Faction) -> bool {
    let config = *world.config();

    if world.worker_count(faction) >= config.max_workers as usize {
        return false;
    }
    if world.bank.get(faction) < config.worker_spawn_cost {
        return false;
    }

    let base = world.base(faction).position;
    let candidates = [
        base.offset(1, 0),
        base.offset(-1, 0),
        base.offset(0, 1),
        base.offset(0, -1),
    ];
    let Some(tile) = candidates
        .into_iter()
        .find(|&p| world.in_bounds(p) && !world.is_occupied(p))
    else {
        return false;
    };

    if !world.bank.withdraw(faction, config.worker_spawn_cost) {
        return false;
    }
    let id = world.add_worker(faction, tile);
    tracing::trace!(%faction, id, %tile, "worker spawned");
    true
}
