//! Factions, units, bases, resource nodes and the bank.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::Position;

/// Unique identifier for a unit.
pub type UnitId = u32;

/// Unique identifier for a resource node.
pub type NodeId = u32;

/// Hit points every freshly spawned worker starts with.
pub const WORKER_HP: u32 = 5;

/// One of the two fixed players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Faction {
    /// Player index 0; always acts first.
    Red,
    /// Player index 1.
    Blue,
}

impl Faction {
    /// Both factions in turn order.
    pub const ALL: [Self; 2] = [Self::Red, Self::Blue];

    /// Player index (0 for Red, 1 for Blue).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Blue => 1,
        }
    }

    /// Faction for a player index. Any index other than 0 maps to Blue.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        if index == 0 { Self::Red } else { Self::Blue }
    }

    /// The other faction.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    /// Moves, gathers and can be spawned.
    Worker,
    /// Declared for future combat; never produced.
    Soldier,
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Worker => "worker",
            Self::Soldier => "soldier",
        })
    }
}

/// A mobile unit on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique id, assigned in strictly increasing order.
    pub id: UnitId,
    /// Owning faction.
    pub faction: Faction,
    /// Kind of unit.
    pub unit_type: UnitType,
    /// Hit points.
    pub hp: u32,
    /// Current tile.
    pub position: Position,
    /// Unused until combat exists.
    pub attack_damage: u32,
    /// Unused until combat exists.
    pub attack_range: u32,
}

impl Unit {
    /// Create a worker with the standard starting stats.
    #[must_use]
    pub const fn worker(id: UnitId, faction: Faction, position: Position) -> Self {
        Self {
            id,
            faction,
            unit_type: UnitType::Worker,
            hp: WORKER_HP,
            position,
            attack_damage: 0,
            attack_range: 0,
        }
    }

    /// Check if this unit is a worker.
    #[must_use]
    pub fn is_worker(&self) -> bool {
        self.unit_type == UnitType::Worker
    }
}

/// A faction's home tile. Never moves and is never destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base {
    /// Owning faction.
    pub faction: Faction,
    /// Hit points.
    pub hp: u32,
    /// Fixed tile.
    pub position: Position,
}

/// A tile holding a finite amount of gatherable currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Unique id, starting at 1.
    pub id: NodeId,
    /// Fixed tile.
    pub position: Position,
    /// Amount left to gather; only ever decreases.
    pub remaining: u32,
}

impl ResourceNode {
    /// Check if nothing is left to gather.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.remaining == 0
    }
}

/// Kind of building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    /// Static structure that attacks units in range.
    Turret,
}

/// A static structure. Declared for future combat; no operation creates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Unique id.
    pub id: u32,
    /// Owning faction.
    pub faction: Faction,
    /// Kind of building.
    pub building_type: BuildingType,
    /// Hit points.
    pub hp: u32,
    /// Fixed tile.
    pub position: Position,
    /// Damage per attack.
    pub attack_damage: u32,
    /// Attack reach in tiles.
    pub attack_range: u32,
}

/// Per-faction currency balances.
///
/// Balances are unsigned, so they can never go negative; withdrawals that
/// would overdraw are refused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    balances: [u32; 2],
}

impl Bank {
    /// Create a bank where both factions hold `amount`.
    #[must_use]
    pub const fn new(amount: u32) -> Self {
        Self {
            balances: [amount; 2],
        }
    }

    /// Balance of a faction.
    #[must_use]
    pub const fn get(self, faction: Faction) -> u32 {
        self.balances[faction.index()]
    }

    /// Overwrite a faction's balance.
    pub const fn set(&mut self, faction: Faction, amount: u32) {
        self.balances[faction.index()] = amount;
    }

    /// Add to a faction's balance, saturating at `u32::MAX`.
    pub const fn deposit(&mut self, faction: Faction, amount: u32) {
        let idx = faction.index();
        self.balances[idx] = self.balances[idx].saturating_add(amount);
    }

    /// Remove from a faction's balance.
    ///
    /// Returns `false` and leaves the balance untouched if it is insufficient.
    pub const fn withdraw(&mut self, faction: Faction, amount: u32) -> bool {
        let idx = faction.index();
        if self.balances[idx] < amount {
            return false;
        }
        self.balances[idx] -= amount;
        true
    }
}
