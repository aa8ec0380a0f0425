//! Seeded random proposer.

use crate::agents::Agent;
use crate::game::{Action, Decision, Position, Rng, Unit, World};

/// Chance of proposing a spawn when the faction can afford one.
pub const SPAWN_PROBABILITY: f64 = 0.2;

/// Chance of proposing a gather rather than a move.
pub const GATHER_PROBABILITY: f64 = 0.4;

/// Proposes random but well-formed actions for random workers.
///
/// Most of its gathers and many of its moves fail, which makes it a useful
/// stress test of the attempt budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomAgent {
    /// Seed of the agent's generator.
    pub seed: u64,
}

impl RandomAgent {
    /// Create a random agent.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

/// Generator state of a [`RandomAgent`].
#[derive(Debug, Clone)]
pub struct RandomMemory {
    rng: Rng,
}

impl Default for RandomMemory {
    fn default() -> Self {
        Self { rng: Rng::new(0) }
    }
}

impl Agent for RandomAgent {
    type Memory = RandomMemory;

    fn init_memory(&self) -> RandomMemory {
        RandomMemory {
            rng: Rng::new(self.seed),
        }
    }

    fn act(&self, world: &World, memory: &mut RandomMemory) -> Decision {
        let faction = world.current_faction();
        let workers: Vec<&Unit> = world.workers_of(faction).collect();
        if workers.is_empty() {
            return Decision::Stop;
        }
        let rng = &mut memory.rng;

        let affordable = world.bank.get(faction) >= world.config().worker_spawn_cost;
        if affordable && rng.next_f64() < SPAWN_PROBABILITY {
            return Decision::Act(Action::SpawnWorker);
        }
        let Some(worker) = rng
            .pick_index(workers.len())
            .and_then(|i| workers.get(i))
            .map(|w| w.id)
        else {
            return Decision::Stop;
        };

        if rng.next_f64() < GATHER_PROBABILITY {
            return Decision::Act(Action::Gather { unit_id: worker });
        }

        let (width, height) = (world.config().width, world.config().height);
        let x = rng.next_below(u32::from(width));
        let y = rng.next_below(u32::from(height));
        Decision::Act(Action::MoveTowards {
            unit_id: worker,
            target: Position::new(
                i32::try_from(x).unwrap_or(i32::MAX),
                i32::try_from(y).unwrap_or(i32::MAX),
            ),
        })
    }
}
