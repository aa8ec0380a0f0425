//! Greedy gatherer.

use crate::agents::Agent;
use crate::game::{Action, Decision, Position, Unit, World};

/// Workers the greedy agent builds up to by default.
pub const DEFAULT_DESIRED_WORKERS: u32 = 2;

/// Spawns up to a target worker count, gathers whenever a worker stands on a
/// node, and otherwise walks workers toward their nearest node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyAgent {
    /// Worker count to spawn up to.
    pub desired_workers: u32,
}

impl GreedyAgent {
    /// Create a greedy agent.
    #[must_use]
    pub const fn new(desired_workers: u32) -> Self {
        Self { desired_workers }
    }
}

impl Default for GreedyAgent {
    fn default() -> Self {
        Self::new(DEFAULT_DESIRED_WORKERS)
    }
}

/// Round-robin state of a [`GreedyAgent`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyMemory {
    /// `(turn, current_player)` of the last query.
    last_seen: Option<(u32, usize)>,
    /// Next worker to move within the current faction turn.
    rr_index: usize,
}

/// Closest non-depleted node to `from` by Manhattan distance; first wins ties.
fn nearest_resource(world: &World, from: Position) -> Option<Position> {
    world
        .resources
        .iter()
        .filter(|r| !r.is_depleted())
        .min_by_key(|r| from.manhattan_distance(r.position))
        .map(|r| r.position)
}

impl Agent for GreedyAgent {
    type Memory = GreedyMemory;

    fn act(&self, world: &World, memory: &mut GreedyMemory) -> Decision {
        let key = (world.turn, world.current_player);
        if memory.last_seen != Some(key) {
            memory.last_seen = Some(key);
            memory.rr_index = 0;
        }

        let faction = world.current_faction();
        let workers: Vec<&Unit> = world.workers_of(faction).collect();
        if workers.is_empty() {
            return Decision::Stop;
        }

        let below_target = u32::try_from(workers.len()).is_ok_and(|n| n < self.desired_workers);
        if below_target && world.bank.get(faction) >= world.config().worker_spawn_cost {
            return Decision::Act(Action::SpawnWorker);
        }

        if let Some(worker) = workers
            .iter()
            .find(|w| world.resource_at(w.position).is_some())
        {
            return Decision::Act(Action::Gather { unit_id: worker.id });
        }

        let worker = workers[memory.rr_index % workers.len()];
        memory.rr_index += 1;

        match nearest_resource(world, worker.position) {
            Some(target) => Decision::Act(Action::MoveTowards {
                unit_id: worker.id,
                target,
            }),
            None => Decision::Stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Faction, GameConfig, ResourceNode};

    fn world() -> World {
        World::new(GameConfig::default()).unwrap()
    }

    #[test]
    fn test_spawns_when_below_target() {
        let world = world();
        let agent = GreedyAgent::default();
        let mut memory = agent.init_memory();
        assert_eq!(agent.act(&world, &mut memory), Decision::Act(Action::SpawnWorker));
    }

    #[test]
    fn test_gathers_when_on_node() {
        let mut world = world();
        world.bank.set(Faction::Red, 0);
        world.resources.clear();
        world.resources.push(ResourceNode {
            id: 1,
            position: Position::new(2, 1),
            remaining: 10,
        });

        let agent = GreedyAgent::default();
        let mut memory = agent.init_memory();
        assert_eq!(
            agent.act(&world, &mut memory),
            Decision::Act(Action::Gather { unit_id: 1 })
        );
    }

    #[test]
    fn test_moves_toward_nearest_node() {
        let mut world = world();
        world.bank.set(Faction::Red, 0);
        world.resources = vec![
            ResourceNode {
                id: 1,
                position: Position::new(5, 1),
                remaining: 10,
            },
            ResourceNode {
                id: 2,
                position: Position::new(2, 4),
                remaining: 10,
            },
            ResourceNode {
                id: 3,
                position: Position::new(2, 2),
                remaining: 0,
            },
        ];

        let agent = GreedyAgent::default();
        let mut memory = agent.init_memory();
        // Both live nodes are 3 away; the first listed wins
        assert_eq!(
            agent.act(&world, &mut memory),
            Decision::Act(Action::MoveTowards {
                unit_id: 1,
                target: Position::new(5, 1)
            })
        );
    }

    #[test]
    fn test_stops_without_nodes() {
        let mut world = world();
        world.bank.set(Faction::Red, 0);
        world.resources.clear();

        let agent = GreedyAgent::default();
        let mut memory = agent.init_memory();
        assert_eq!(agent.act(&world, &mut memory), Decision::Stop);
    }

    #[test]
    fn test_round_robin_resets_each_faction_turn() {
        let mut world = world();
        world.bank.set(Faction::Red, 0);
        let _ = world.add_worker(Faction::Red, Position::new(0, 1));
        world.resources = vec![ResourceNode {
            id: 1,
            position: Position::new(6, 6),
            remaining: 10,
        }];

        let agent = GreedyAgent::new(1);
        let mut memory = agent.init_memory();
        let moved = |d: Decision| match d {
            Decision::Act(Action::MoveTowards { unit_id, .. }) => unit_id,
            other => panic!("unexpected {other:?}"),
        };

        assert_eq!(moved(agent.act(&world, &mut memory)), 1);
        assert_eq!(moved(agent.act(&world, &mut memory)), 3);
        assert_eq!(moved(agent.act(&world, &mut memory)), 1);

        world.turn += 1;
        assert_eq!(moved(agent.act(&world, &mut memory)), 1);
    }
}
