//! World state and setup.

use crate::error::SetupError;
use crate::game::{
    Bank, Base, Faction, GameConfig, Position, ResourceNode, Rng, Unit, UnitId,
    place_symmetric_resources,
};

/// Offset from each base to the tile its starting worker occupies.
///
/// Red's worker sits to the right of its base; Blue's is mirrored to the left.
const STARTING_WORKER_OFFSET: i32 = 1;

/// Complete simulation state.
///
/// The world is the single owner of every entity. Subsystems operate on it
/// through `&mut World`; agents only ever see `&World`.
#[derive(Debug, Clone)]
pub struct World {
    /// Parameters fixed for this world's lifetime.
    config: GameConfig,
    /// Seeded generator; consumed only by map generation during `reset`.
    pub(crate) rng: Rng,
    /// Completed full turns (both factions acted).
    pub turn: u32,
    /// Index of the faction whose turn it is (0 = Red, 1 = Blue).
    pub current_player: usize,
    /// Successful actions remaining this faction-turn.
    pub actions_left: u32,
    /// Proposals remaining this faction-turn.
    pub attempts_left: u32,
    /// Bases indexed by faction.
    pub bases: [Base; 2],
    /// All resource nodes, in id order.
    pub resources: Vec<ResourceNode>,
    /// All units, in id order.
    pub units: Vec<Unit>,
    /// Faction balances.
    pub bank: Bank,
    /// Id the next spawned unit receives.
    next_unit_id: UnitId,
}

impl World {
    /// Create and reset a world for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or resource placement fails.
    pub fn new(config: GameConfig) -> Result<Self, SetupError> {
        config.validate()?;

        let mut world = Self {
            config,
            rng: Rng::new(config.seed),
            turn: 0,
            current_player: 0,
            actions_left: 0,
            attempts_left: 0,
            bases: Self::starting_bases(&config),
            resources: Vec::new(),
            units: Vec::new(),
            bank: Bank::new(config.starting_resources),
            next_unit_id: 1,
        };
        world.reset()?;
        Ok(world)
    }

    fn starting_bases(config: &GameConfig) -> [Base; 2] {
        let far = Position::new(i32::from(config.width) - 2, i32::from(config.height) - 2);
        [
            Base {
                faction: Faction::Red,
                hp: config.base_hp,
                position: Position::new(1, 1),
            },
            Base {
                faction: Faction::Blue,
                hp: config.base_hp,
                position: far,
            },
        ]
    }

    /// Rebuild the world from its configuration.
    ///
    /// Re-seeds the generator, so repeated resets produce identical worlds.
    ///
    /// # Errors
    ///
    /// Returns an error if resource placement fails.
    pub fn reset(&mut self) -> Result<(), SetupError> {
        self.rng = Rng::new(self.config.seed);
        self.turn = 0;
        self.current_player = 0;
        self.next_unit_id = 1;

        self.bases = Self::starting_bases(&self.config);
        self.bank = Bank::new(self.config.starting_resources);
        self.units.clear();
        let (count, per_node) = (self.config.num_resource_nodes, self.config.resource_per_node);
        self.resources = place_symmetric_resources(self, count, per_node)?;

        for faction in Faction::ALL {
            let base = self.base(faction).position;
            let dx = match faction {
                Faction::Red => STARTING_WORKER_OFFSET,
                Faction::Blue => -STARTING_WORKER_OFFSET,
            };
            let _id = self.add_worker(faction, base.offset(dx, 0));
        }

        self.start_faction_turn();
        Ok(())
    }

    /// Parameters of this world.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Faction whose turn it is.
    #[must_use]
    pub const fn current_faction(&self) -> Faction {
        Faction::from_index(self.current_player)
    }

    /// Base of a faction.
    #[must_use]
    pub const fn base(&self, faction: Faction) -> &Base {
        &self.bases[faction.index()]
    }

    /// Check if a position lies on the grid.
    #[must_use]
    pub fn in_bounds(&self, position: Position) -> bool {
        position.in_bounds(self.config.width, self.config.height)
    }

    /// Check if a base or unit stands on a position.
    ///
    /// Resource nodes do not occupy tiles.
    #[must_use]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.bases.iter().any(|b| b.position == position)
            || self.units.iter().any(|u| u.position == position)
    }

    /// Get a unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Get a mutable unit by id.
    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    /// All units owned by a faction, in id order.
    pub fn units_of(&self, faction: Faction) -> impl Iterator<Item = &Unit> {
        self.units.iter().filter(move |u| u.faction == faction)
    }

    /// All workers owned by a faction, in id order.
    pub fn workers_of(&self, faction: Faction) -> impl Iterator<Item = &Unit> {
        self.units_of(faction).filter(|u| u.is_worker())
    }

    /// Number of workers owned by a faction.
    #[must_use]
    pub fn worker_count(&self, faction: Faction) -> usize {
        self.workers_of(faction).count()
    }

    /// The non-depleted resource node at exactly `position`, if any.
    #[must_use]
    pub fn resource_at(&self, position: Position) -> Option<&ResourceNode> {
        self.resources
            .iter()
            .find(|r| r.position == position && !r.is_depleted())
    }

    pub(crate) fn resource_at_mut(&mut self, position: Position) -> Option<&mut ResourceNode> {
        self.resources
            .iter_mut()
            .find(|r| r.position == position && !r.is_depleted())
    }

    /// Id the next spawned unit will receive.
    #[must_use]
    pub const fn next_unit_id(&self) -> UnitId {
        self.next_unit_id
    }

    /// Create a worker at `position` with the next sequential id.
    ///
    /// Callers are responsible for checking bounds and occupancy.
    pub(crate) fn add_worker(&mut self, faction: Faction, position: Position) -> UnitId {
        let id = self.next_unit_id;
        self.next_unit_id += 1;
        self.units.push(Unit::worker(id, faction, position));
        id
    }
}
