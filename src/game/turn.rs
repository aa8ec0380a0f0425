//! Turn engine: proposal dispatch, budget accounting and turn advancement.
//!
//! A faction turn runs until its action budget is spent, its attempt budget
//! is spent, or its decision function stops. Every proposal that gets past
//! the budget checks costs one attempt, whether or not it applies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{Faction, Position, UnitId, World, assert_invariants, economy, movement};

/// A well-formed action proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Gather at the unit's current tile.
    Gather {
        /// Acting worker.
        unit_id: UnitId,
    },
    /// Take one heuristic step toward `target`.
    MoveTowards {
        /// Acting unit.
        unit_id: UnitId,
        /// Destination tile.
        target: Position,
    },
    /// Recruit a worker next to the acting faction's base.
    SpawnWorker,
}

impl Action {
    /// Wire name of this action kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Gather { .. } => RawAction::GATHER,
            Self::MoveTowards { .. } => RawAction::MOVE_TOWARDS,
            Self::SpawnWorker => RawAction::SPAWN_WORKER,
        }
    }

    /// Unit the action refers to, if any.
    #[must_use]
    pub const fn unit_id(&self) -> Option<UnitId> {
        match self {
            Self::Gather { unit_id } | Self::MoveTowards { unit_id, .. } => Some(*unit_id),
            Self::SpawnWorker => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gather { unit_id } => write!(f, "gather({unit_id})"),
            Self::MoveTowards { unit_id, target } => write!(f, "move_towards({unit_id}, {target})"),
            Self::SpawnWorker => f.write_str("spawn_worker()"),
        }
    }
}

/// An untyped proposal, as read from JSON or another external source.
///
/// The kind is a wire name and the arguments are flat integers:
/// `gather [unit_id]`, `move_towards [unit_id, x, y]`, `spawn_worker []`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAction {
    /// Action kind name.
    pub kind: String,
    /// Positional integer arguments.
    #[serde(default)]
    pub args: Vec<i64>,
}

impl RawAction {
    const GATHER: &'static str = "gather";
    const MOVE_TOWARDS: &'static str = "move_towards";
    const SPAWN_WORKER: &'static str = "spawn_worker";

    /// Create a raw proposal.
    #[must_use]
    pub fn new(kind: impl Into<String>, args: Vec<i64>) -> Self {
        Self {
            kind: kind.into(),
            args,
        }
    }

    /// Parse into a typed action.
    ///
    /// # Errors
    ///
    /// - [`Reason::BadAction`] if the kind is empty
    /// - [`Reason::BadArgs`] if a known kind has the wrong arity or an
    ///   argument outside its type's range
    /// - [`Reason::UnknownAction`] for any other kind
    pub fn parse(&self) -> Result<Action, Reason> {
        match (self.kind.as_str(), self.args.as_slice()) {
            ("", _) => Err(Reason::BadAction),
            (Self::GATHER, &[unit_id]) => Ok(Action::Gather {
                unit_id: UnitId::try_from(unit_id).map_err(|_| Reason::BadArgs)?,
            }),
            (Self::MOVE_TOWARDS, &[unit_id, x, y]) => Ok(Action::MoveTowards {
                unit_id: UnitId::try_from(unit_id).map_err(|_| Reason::BadArgs)?,
                target: Position::new(
                    i32::try_from(x).map_err(|_| Reason::BadArgs)?,
                    i32::try_from(y).map_err(|_| Reason::BadArgs)?,
                ),
            }),
            (Self::SPAWN_WORKER, &[]) => Ok(Action::SpawnWorker),
            (Self::GATHER | Self::MOVE_TOWARDS | Self::SPAWN_WORKER, _) => Err(Reason::BadArgs),
            _ => Err(Reason::UnknownAction),
        }
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        let args = match action {
            Action::Gather { unit_id } => vec![i64::from(unit_id)],
            Action::MoveTowards { unit_id, target } => {
                vec![i64::from(unit_id), i64::from(target.x), i64::from(target.y)]
            }
            Action::SpawnWorker => Vec::new(),
        };
        Self::new(action.kind(), args)
    }
}

/// What a decision function returns for one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Propose a typed action.
    Act(Action),
    /// Propose an untyped action; it is parsed after the attempt is charged.
    Propose(RawAction),
    /// End the faction's turn now.
    Stop,
}

impl From<Action> for Decision {
    fn from(action: Action) -> Self {
        Self::Act(action)
    }
}

/// Reason attached to an action outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Gather succeeded.
    Gather,
    /// Move succeeded.
    Move,
    /// Spawn succeeded.
    SpawnWorker,
    /// Attempt budget already spent.
    NoAttempts,
    /// Action budget already spent.
    NoActions,
    /// Proposal has no kind.
    BadAction,
    /// Known kind with malformed arguments.
    BadArgs,
    /// Referenced unit is missing or belongs to the other faction.
    NotYourUnit,
    /// Worker is not on a non-depleted node.
    GatherFailed,
    /// Spawn preconditions not met or no free tile.
    SpawnFailed,
    /// The heuristic step is blocked, or the unit is already at the target.
    MoveBlocked,
    /// Unrecognised kind.
    UnknownAction,
}

impl Reason {
    /// Log name of the reason.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gather => "gather",
            Self::Move => "move",
            Self::SpawnWorker => "spawn_worker",
            Self::NoAttempts => "no_attempts",
            Self::NoActions => "no_actions",
            Self::BadAction => "bad_action",
            Self::BadArgs => "bad_args",
            Self::NotYourUnit => "not_your_unit",
            Self::GatherFailed => "gather_failed",
            Self::SpawnFailed => "spawn_failed",
            Self::MoveBlocked => "move_blocked",
            Self::UnknownAction => "unknown_action",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Whether the action applied and spent an action point.
    pub success: bool,
    /// Success name or rejection cause.
    pub reason: Reason,
}

impl ActionOutcome {
    const fn applied(reason: Reason) -> Self {
        Self {
            success: true,
            reason,
        }
    }

    const fn rejected(reason: Reason) -> Self {
        Self {
            success: false,
            reason,
        }
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(f, "{}", self.reason)
        } else {
            write!(f, "invalid:{}", self.reason)
        }
    }
}

/// One line of a faction-turn log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEntry {
    /// A proposal was processed.
    Outcome(ActionOutcome),
    /// The decision function ended the turn.
    Stop,
    /// Attempts ran out while actions remained.
    TurnEndNoAttempts,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outcome(outcome) => write!(f, "{outcome}"),
            Self::Stop => f.write_str("stop"),
            Self::TurnEndNoAttempts => f.write_str("turn_end:no_attempts"),
        }
    }
}

/// Log of a single faction turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnLog {
    /// Faction that acted.
    pub faction: Faction,
    /// Turn number the faction acted in.
    pub turn: u32,
    /// Entries in order.
    pub entries: Vec<LogEntry>,
}

impl TurnLog {
    fn outcomes(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.entries.iter().filter_map(|e| match e {
            LogEntry::Outcome(outcome) => Some(outcome),
            LogEntry::Stop | LogEntry::TurnEndNoAttempts => None,
        })
    }

    /// Proposals processed.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        u32::try_from(self.outcomes().count()).unwrap_or(u32::MAX)
    }

    /// Proposals that applied.
    #[must_use]
    pub fn actions(&self) -> u32 {
        u32::try_from(self.outcomes().filter(|o| o.success).count()).unwrap_or(u32::MAX)
    }

    /// Proposals that were rejected.
    #[must_use]
    pub fn rejections(&self) -> u32 {
        self.attempts() - self.actions()
    }

    /// Whether the turn ended on an exhausted attempt budget.
    #[must_use]
    pub fn ran_out_of_attempts(&self) -> bool {
        self.entries.contains(&LogEntry::TurnEndNoAttempts)
    }
}

impl fmt::Display for TurnLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[turn {} {}]", self.turn, self.faction)?;
        for entry in &self.entries {
            write!(f, " {entry}")?;
        }
        Ok(())
    }
}

impl World {
    /// Refill both budgets for the faction about to act.
    pub const fn start_faction_turn(&mut self) {
        self.actions_left = self.config().actions_per_turn;
        self.attempts_left = self.config().max_attempts_per_turn;
    }

    /// Charge one attempt, or reject without touching anything.
    const fn charge_attempt(&mut self) -> Result<(), Reason> {
        if self.attempts_left == 0 {
            return Err(Reason::NoAttempts);
        }
        if self.actions_left == 0 {
            return Err(Reason::NoActions);
        }
        self.attempts_left -= 1;
        Ok(())
    }

    /// Apply a typed action for the current faction.
    pub fn apply_action(&mut self, action: &Action) -> ActionOutcome {
        if let Err(reason) = self.charge_attempt() {
            return ActionOutcome::rejected(reason);
        }
        self.dispatch(action)
    }

    /// Apply an untyped proposal for the current faction.
    ///
    /// Parsing happens after the attempt is charged, so a malformed proposal
    /// still costs an attempt.
    pub fn apply_raw(&mut self, raw: &RawAction) -> ActionOutcome {
        if let Err(reason) = self.charge_attempt() {
            return ActionOutcome::rejected(reason);
        }
        match raw.parse() {
            Ok(action) => self.dispatch(&action),
            Err(reason) => {
                tracing::debug!(kind = %raw.kind, args = ?raw.args, %reason, "malformed proposal");
                ActionOutcome::rejected(reason)
            }
        }
    }

    /// Apply a decision. Returns `None` for [`Decision::Stop`].
    pub fn apply_decision(&mut self, decision: &Decision) -> Option<ActionOutcome> {
        match decision {
            Decision::Act(action) => Some(self.apply_action(action)),
            Decision::Propose(raw) => Some(self.apply_raw(raw)),
            Decision::Stop => None,
        }
    }

    fn dispatch(&mut self, action: &Action) -> ActionOutcome {
        let faction = self.current_faction();

        let owned = action
            .unit_id()
            .is_none_or(|id| self.unit(id).is_some_and(|u| u.faction == faction));
        if !owned {
            tracing::debug!(%faction, %action, "not_your_unit");
            return ActionOutcome::rejected(Reason::NotYourUnit);
        }

        let (applied, success, failure) = match *action {
            Action::Gather { unit_id } => (
                economy::gather(self, unit_id),
                Reason::Gather,
                Reason::GatherFailed,
            ),
            Action::MoveTowards { unit_id, target } => (
                movement::move_towards(self, unit_id, target),
                Reason::Move,
                Reason::MoveBlocked,
            ),
            Action::SpawnWorker => (
                economy::spawn_worker(self, faction),
                Reason::SpawnWorker,
                Reason::SpawnFailed,
            ),
        };

        if !applied {
            tracing::debug!(%faction, %action, reason = %failure, "action rejected");
            return ActionOutcome::rejected(failure);
        }

        self.actions_left -= 1;
        assert_invariants(self);
        ActionOutcome::applied(success)
    }

    /// Run the current faction's turn.
    ///
    /// Refills the budgets, then queries `decide` until the action budget or
    /// the attempt budget is spent, or it returns [`Decision::Stop`].
    pub fn step_faction<F>(&mut self, mut decide: F) -> TurnLog
    where
        F: FnMut(&Self) -> Decision,
    {
        self.start_faction_turn();
        let mut log = TurnLog {
            faction: self.current_faction(),
            turn: self.turn,
            entries: Vec::new(),
        };

        while self.actions_left > 0 && self.attempts_left > 0 {
            let decision = decide(self);
            match self.apply_decision(&decision) {
                Some(outcome) => log.entries.push(LogEntry::Outcome(outcome)),
                None => {
                    log.entries.push(LogEntry::Stop);
                    break;
                }
            }
        }

        if self.attempts_left == 0 && self.actions_left > 0 {
            tracing::warn!(
                faction = %log.faction,
                turn = log.turn,
                actions_left = self.actions_left,
                "attempt budget exhausted"
            );
            log.entries.push(LogEntry::TurnEndNoAttempts);
        }

        log
    }

    /// Hand play to the other faction.
    ///
    /// The turn counter advances only after both factions have acted.
    pub const fn step_end_turn(&mut self) {
        self.current_player = 1 - self.current_player;
        if self.current_player == 0 {
            self.turn += 1;
        }
    }

    /// First faction, Red before Blue, whose bank has reached `target_bank`.
    #[must_use]
    pub fn winner(&self) -> Option<Faction> {
        let target = self.config().target_bank;
        Faction::ALL.into_iter().find(|&f| self.bank.get(f) >= target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, ResourceNode};

    fn world() -> World {
        World::new(GameConfig::default()).unwrap()
    }

    fn snapshot(world: &World) -> String {
        format!("{world:?}")
    }

    #[test]
    fn test_no_attempts_changes_nothing() {
        let mut world = world();
        world.attempts_left = 0;
        let before = snapshot(&world);

        let outcome = world.apply_action(&Action::SpawnWorker);
        assert!(!outcome.success);
        assert_eq!(outcome.reason, Reason::NoAttempts);
        assert_eq!(snapshot(&world), before);
    }

    #[test]
    fn test_no_actions_changes_nothing() {
        let mut world = world();
        world.actions_left = 0;
        let before = snapshot(&world);

        let outcome = world.apply_action(&Action::SpawnWorker);
        assert_eq!(outcome.reason, Reason::NoActions);
        assert_eq!(snapshot(&world), before);
    }

    #[test]
    fn test_success_spends_action_and_attempt() {
        let mut world = world();
        let outcome = world.apply_action(&Action::MoveTowards {
            unit_id: 1,
            target: Position::new(6, 6),
        });
        assert_eq!(outcome, ActionOutcome::applied(Reason::Move));
        assert_eq!(world.actions_left, 2);
        assert_eq!(world.attempts_left, 9);
    }

    #[test]
    fn test_failure_spends_attempt_only() {
        let mut world = world();
        world.resources.clear();
        let outcome = world.apply_action(&Action::Gather { unit_id: 1 });
        assert_eq!(outcome, ActionOutcome::rejected(Reason::GatherFailed));
        assert_eq!(world.actions_left, 3);
        assert_eq!(world.attempts_left, 9);
    }

    #[test]
    fn test_other_factions_unit_rejected() {
        let mut world = world();
        let units = world.units.clone();
        let outcome = world.apply_action(&Action::MoveTowards {
            unit_id: 2,
            target: Position::new(0, 0),
        });
        assert_eq!(outcome.reason, Reason::NotYourUnit);
        assert_eq!(world.units, units);

        let outcome = world.apply_action(&Action::Gather { unit_id: 77 });
        assert_eq!(outcome.reason, Reason::NotYourUnit);
        assert_eq!(world.attempts_left, 8);
    }

    #[test]
    fn test_spawn_failed_reason() {
        let mut world = world();
        world.bank.set(Faction::Red, 0);
        let outcome = world.apply_action(&Action::SpawnWorker);
        assert_eq!(outcome.reason, Reason::SpawnFailed);
    }

    #[test]
    fn test_move_to_own_tile_blocked() {
        let mut world = world();
        let outcome = world.apply_action(&Action::MoveTowards {
            unit_id: 1,
            target: Position::new(2, 1),
        });
        assert_eq!(outcome.reason, Reason::MoveBlocked);
    }

    #[test]
    fn test_raw_parse() {
        assert_eq!(
            RawAction::new("gather", vec![3]).parse(),
            Ok(Action::Gather { unit_id: 3 })
        );
        assert_eq!(
            RawAction::new("move_towards", vec![1, 4, 5]).parse(),
            Ok(Action::MoveTowards {
                unit_id: 1,
                target: Position::new(4, 5)
            })
        );
        assert_eq!(RawAction::new("spawn_worker", vec![]).parse(), Ok(Action::SpawnWorker));
        assert_eq!(RawAction::new("", vec![]).parse(), Err(Reason::BadAction));
        assert_eq!(RawAction::new("gather", vec![]).parse(), Err(Reason::BadArgs));
        assert_eq!(RawAction::new("gather", vec![-1]).parse(), Err(Reason::BadArgs));
        assert_eq!(
            RawAction::new("move_towards", vec![1, i64::MAX, 0]).parse(),
            Err(Reason::BadArgs)
        );
        assert_eq!(RawAction::new("spawn_worker", vec![1]).parse(), Err(Reason::BadArgs));
        assert_eq!(RawAction::new("attack", vec![1]).parse(), Err(Reason::UnknownAction));
    }

    #[test]
    fn test_raw_round_trip_through_action() {
        let action = Action::MoveTowards {
            unit_id: 9,
            target: Position::new(-1, 3),
        };
        assert_eq!(RawAction::from(action).parse(), Ok(action));
    }

    #[test]
    fn test_malformed_raw_costs_attempt() {
        let mut world = world();
        let outcome = world.apply_raw(&RawAction::new("dance", vec![]));
        assert_eq!(outcome.reason, Reason::UnknownAction);
        assert_eq!(world.attempts_left, 9);
        assert_eq!(world.actions_left, 3);
    }

    #[test]
    fn test_step_faction_stop() {
        let mut world = world();
        let log = world.step_faction(|_| Decision::Stop);
        assert_eq!(log.entries, vec![LogEntry::Stop]);
        assert_eq!(log.to_string(), "[turn 0 Red] stop");
        assert_eq!(world.attempts_left, 10);
    }

    #[test]
    fn test_step_faction_spends_actions() {
        let mut world = world();
        let position = world.unit(1).unwrap().position;
        world.resources.clear();
        world.resources.push(ResourceNode {
            id: 50,
            position,
            remaining: 60,
        });

        let log = world.step_faction(|_| Decision::Act(Action::Gather { unit_id: 1 }));
        assert_eq!(log.actions(), 3);
        assert_eq!(log.attempts(), 3);
        assert!(!log.ran_out_of_attempts());
        assert_eq!(world.bank.get(Faction::Red), 45);
        assert_eq!(world.actions_left, 0);
        assert_eq!(world.attempts_left, 7);
    }

    #[test]
    fn test_step_faction_runs_out_of_attempts() {
        let mut world = world();
        let log = world.step_faction(|_| Decision::Propose(RawAction::new("", vec![])));
        assert_eq!(log.attempts(), 10);
        assert_eq!(log.rejections(), 10);
        assert!(log.ran_out_of_attempts());
        assert_eq!(log.entries.last(), Some(&LogEntry::TurnEndNoAttempts));
        assert_eq!(log.entries[0].to_string(), "invalid:bad_action");
    }

    #[test]
    fn test_step_faction_refills_budgets() {
        let mut world = world();
        world.attempts_left = 0;
        world.actions_left = 0;
        let log = world.step_faction(|_| Decision::Stop);
        assert_eq!(log.entries, vec![LogEntry::Stop]);
        assert_eq!(world.actions_left, 3);
    }

    #[test]
    fn test_end_turn_pairs() {
        let mut world = world();
        world.step_end_turn();
        assert_eq!((world.turn, world.current_player), (0, 1));
        world.step_end_turn();
        assert_eq!((world.turn, world.current_player), (1, 0));
    }

    #[test]
    fn test_blue_acts_with_own_units() {
        let mut world = world();
        world.step_end_turn();
        let log = world.step_faction(|_| {
            Decision::Act(Action::MoveTowards {
                unit_id: 2,
                target: Position::new(0, 10),
            })
        });
        assert_eq!(log.faction, Faction::Blue);
        assert_eq!(log.actions(), 3);
        assert_eq!(world.unit(2).unwrap().position, Position::new(6, 10));
    }

    #[test]
    fn test_winner_tie_break() {
        let mut world = world();
        assert_eq!(world.winner(), None);
        world.bank.set(Faction::Blue, 200);
        assert_eq!(world.winner(), Some(Faction::Blue));
        world.bank.set(Faction::Red, 250);
        assert_eq!(world.winner(), Some(Faction::Red));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ActionOutcome::applied(Reason::SpawnWorker).to_string(), "spawn_worker");
        assert_eq!(ActionOutcome::rejected(Reason::NotYourUnit).to_string(), "invalid:not_your_unit");
        assert_eq!(LogEntry::TurnEndNoAttempts.to_string(), "turn_end:no_attempts");
    }
}
