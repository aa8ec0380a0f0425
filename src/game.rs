//! Simulation core for `AgeGrid`.
//!
//! Implements the rules of the grid economy:
//! - Grid positions, directions and point-symmetric mirroring
//! - Factions, units, bases, resource nodes and the bank
//! - Seeded symmetric resource placement
//! - Movement and economy subsystems
//! - Turn engine with action and attempt budgets

mod config;
mod economy;
mod entities;
mod invariants;
mod map;
mod mapgen;
mod movement;
mod rng;
mod state;
mod turn;

pub use config::{GameConfig, MIN_GRID_EDGE};
pub use economy::{gather, spawn_worker};
pub use entities::{
    Bank, Base, Building, BuildingType, Faction, NodeId, ResourceNode, Unit, UnitId, UnitType,
    WORKER_HP,
};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use map::{Direction, ParseDirectionError, Position};
pub use mapgen::{MAX_PLACEMENT_ATTEMPTS, place_symmetric_resources};
pub use movement::{heuristic_direction, move_towards, move_unit};
pub use rng::Rng;
pub use state::World;
pub use turn::{Action, ActionOutcome, Decision, LogEntry, RawAction, Reason, TurnLog};
