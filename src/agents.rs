//! Decision policies that drive a faction.
//!
//! An agent reads the world and returns one [`Decision`] per query. Any state
//! it keeps between queries lives in its [`Agent::Memory`], owned by the
//! caller and handed back on every call.

mod greedy;
mod random;

use std::fmt;
use std::str::FromStr;

pub use greedy::{DEFAULT_DESIRED_WORKERS, GreedyAgent, GreedyMemory};
pub use random::{GATHER_PROBABILITY, RandomAgent, RandomMemory, SPAWN_PROBABILITY};

use crate::game::{Decision, Faction, World};

/// Mixed into Red's agent seed so the two seats never share a stream.
const RED_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// A decision policy for one faction.
pub trait Agent {
    /// State carried between decisions.
    type Memory: Default;

    /// Fresh memory for a new episode.
    fn init_memory(&self) -> Self::Memory {
        Self::Memory::default()
    }

    /// Choose the next proposal for the faction whose turn it is.
    fn act(&self, world: &World, memory: &mut Self::Memory) -> Decision;
}

/// Name of a built-in agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// [`GreedyAgent`] with default settings.
    Greedy,
    /// [`RandomAgent`] seeded per episode.
    Random,
}

impl AgentKind {
    /// Both built-in agents.
    pub const ALL: [Self; 2] = [Self::Greedy, Self::Random];

    /// Build the agent. `seed` only matters for [`AgentKind::Random`].
    #[must_use]
    pub const fn build(self, seed: u64) -> BaselineAgent {
        match self {
            Self::Greedy => BaselineAgent::Greedy(GreedyAgent::new(DEFAULT_DESIRED_WORKERS)),
            Self::Random => BaselineAgent::Random(RandomAgent::new(seed)),
        }
    }

    /// Build the agent for `faction` in the episode with map seed `episode_seed`.
    ///
    /// The two seats get different random streams even when both play the
    /// same kind.
    #[must_use]
    pub const fn build_for(self, faction: Faction, episode_seed: u64) -> BaselineAgent {
        let seed = match faction {
            Faction::Red => episode_seed ^ RED_SEED_SALT,
            Faction::Blue => episode_seed,
        };
        self.build(seed)
    }

    /// Command-line name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unrecognised agent name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAgentKindError(String);

impl fmt::Display for ParseAgentKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown agent '{}' (expected greedy or random)", self.0)
    }
}

impl std::error::Error for ParseAgentKindError {}

impl FromStr for AgentKind {
    type Err = ParseAgentKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseAgentKindError(s.to_string()))
    }
}

/// One of the built-in agents, chosen at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineAgent {
    /// Greedy gatherer.
    Greedy(GreedyAgent),
    /// Seeded random proposer.
    Random(RandomAgent),
}

impl BaselineAgent {
    /// Which built-in agent this is.
    #[must_use]
    pub const fn kind(&self) -> AgentKind {
        match self {
            Self::Greedy(_) => AgentKind::Greedy,
            Self::Random(_) => AgentKind::Random,
        }
    }
}

/// Memory for a [`BaselineAgent`].
#[derive(Debug, Clone)]
pub enum BaselineMemory {
    /// Memory of a greedy agent.
    Greedy(GreedyMemory),
    /// Memory of a random agent.
    Random(RandomMemory),
}

impl Default for BaselineMemory {
    fn default() -> Self {
        Self::Greedy(GreedyMemory::default())
    }
}

impl Agent for BaselineAgent {
    type Memory = BaselineMemory;

    fn init_memory(&self) -> Self::Memory {
        match self {
            Self::Greedy(agent) => BaselineMemory::Greedy(agent.init_memory()),
            Self::Random(agent) => BaselineMemory::Random(agent.init_memory()),
        }
    }

    fn act(&self, world: &World, memory: &mut Self::Memory) -> Decision {
        match (self, &mut *memory) {
            (Self::Greedy(agent), BaselineMemory::Greedy(m)) => agent.act(world, m),
            (Self::Random(agent), BaselineMemory::Random(m)) => agent.act(world, m),
            _ => {
                *memory = self.init_memory();
                self.act(world, memory)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameConfig;

    #[test]
    fn test_parse_agent_kind() {
        assert_eq!("greedy".parse::<AgentKind>(), Ok(AgentKind::Greedy));
        assert_eq!("Random".parse::<AgentKind>(), Ok(AgentKind::Random));
        assert!("minimax".parse::<AgentKind>().is_err());
    }

    #[test]
    fn test_build_matches_kind() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.build(7).kind(), kind);
        }
    }

    #[test]
    fn test_seats_get_distinct_seeds() {
        let red = AgentKind::Random.build_for(Faction::Red, 5);
        let blue = AgentKind::Random.build_for(Faction::Blue, 5);
        assert_ne!(red, blue);
        assert_eq!(blue, BaselineAgent::Random(RandomAgent::new(5)));
    }

    #[test]
    fn test_mismatched_memory_is_replaced() {
        let world = World::new(GameConfig::default()).unwrap();
        let agent = AgentKind::Random.build(3);
        let mut memory = BaselineMemory::default();

        let _ = agent.act(&world, &mut memory);
        assert!(matches!(memory, BaselineMemory::Random(_)));
    }

    #[test]
    fn test_baseline_matches_inner_agent() {
        let world = World::new(GameConfig::default()).unwrap();
        let inner = RandomAgent::new(11);
        let mut inner_memory = inner.init_memory();
        let baseline = BaselineAgent::Random(inner);
        let mut memory = baseline.init_memory();

        for _ in 0..20 {
            assert_eq!(
                baseline.act(&world, &mut memory),
                inner.act(&world, &mut inner_memory)
            );
        }
    }
}
