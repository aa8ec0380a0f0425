//! Property-based tests for world invariants and the turn engine.
//!
//! Run with: cargo test --release prop_world

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use agegrid::game::{
    Action, Decision, Faction, GameConfig, Position, RawAction, Reason, World, check_invariants,
};

/// Any proposal, well-formed or not, with unit ids and targets near the grid.
fn decision_strategy() -> impl Strategy<Value = Decision> {
    prop_oneof![
        (0u32..8).prop_map(|unit_id| Decision::Act(Action::Gather { unit_id })),
        (0u32..8, -2i32..14, -2i32..14).prop_map(|(unit_id, x, y)| {
            Decision::Act(Action::MoveTowards {
                unit_id,
                target: Position::new(x, y),
            })
        }),
        Just(Decision::Act(Action::SpawnWorker)),
        (
            prop::sample::select(vec!["", "gather", "move_towards", "spawn_worker", "attack"]),
            prop::collection::vec(-3i64..12, 0..4),
        )
            .prop_map(|(kind, args)| Decision::Propose(RawAction::new(kind, args))),
        Just(Decision::Stop),
    ]
}

fn config_strategy() -> impl Strategy<Value = GameConfig> {
    (6u16..16, 6u16..16, 0u32..6, any::<u64>()).prop_map(|(width, height, nodes, seed)| {
        GameConfig {
            width,
            height,
            num_resource_nodes: nodes,
            starting_resources: 100,
            seed,
            ..GameConfig::default()
        }
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Generated maps are point-symmetric, even-sized and avoid bases.
    #[test]
    fn prop_map_symmetric(config in config_strategy()) {
        let world = World::new(config).unwrap();
        let requested = config.num_resource_nodes + config.num_resource_nodes % 2;

        prop_assert_eq!(world.resources.len() as u32, requested);
        for node in &world.resources {
            let mirror = node.position.mirror(config.width, config.height);
            prop_assert_ne!(mirror, node.position);
            prop_assert!(world.resources.iter().any(|r| r.position == mirror));
            prop_assert!(world.bases.iter().all(|b| b.position != node.position));
            prop_assert!(world.in_bounds(node.position));
        }
    }

    /// Invariants hold after any sequence of proposals across turns.
    #[test]
    fn prop_invariants_hold(
        config in config_strategy(),
        decisions in prop::collection::vec(decision_strategy(), 0..120),
    ) {
        let mut world = World::new(config).unwrap();
        let mut queue = decisions.into_iter();

        for _ in 0..6 {
            let _ = world.step_faction(|_| queue.next().unwrap_or(Decision::Stop));
            world.step_end_turn();
            prop_assert!(check_invariants(&world).is_empty());
        }
    }

    /// Every processed proposal costs exactly one attempt; only successes
    /// cost an action point.
    #[test]
    fn prop_attempt_accounting(
        config in config_strategy(),
        decisions in prop::collection::vec(decision_strategy(), 1..40),
    ) {
        let mut world = World::new(config).unwrap();

        for decision in &decisions {
            let (attempts, actions) = (world.attempts_left, world.actions_left);
            let Some(outcome) = world.apply_decision(decision) else {
                continue;
            };

            if attempts == 0 {
                prop_assert_eq!(outcome.reason, Reason::NoAttempts);
                prop_assert_eq!(world.attempts_left, 0);
            } else if actions == 0 {
                prop_assert_eq!(outcome.reason, Reason::NoActions);
                prop_assert_eq!(world.attempts_left, attempts);
            } else {
                prop_assert_eq!(world.attempts_left, attempts - 1);
                let expected = if outcome.success { actions - 1 } else { actions };
                prop_assert_eq!(world.actions_left, expected);
            }
        }
    }

    /// A rejected proposal changes nothing but the attempt counter.
    #[test]
    fn prop_rejection_is_atomic(
        config in config_strategy(),
        decision in decision_strategy(),
    ) {
        let mut world = World::new(config).unwrap();
        let before = world.clone();

        if let Some(outcome) = world.apply_decision(&decision) {
            if !outcome.success {
                prop_assert_eq!(&world.units, &before.units);
                prop_assert_eq!(&world.resources, &before.resources);
                prop_assert_eq!(world.bank, before.bank);
                prop_assert_eq!(world.actions_left, before.actions_left);
            }
        }
    }

    /// The turn counter advances once per pair of end-turn calls.
    #[test]
    fn prop_end_turn_pairing(calls in 0u32..200) {
        let mut world = World::new(GameConfig::default()).unwrap();
        for _ in 0..calls {
            world.step_end_turn();
        }
        prop_assert_eq!(world.turn, calls / 2);
        prop_assert_eq!(world.current_player, (calls % 2) as usize);
    }

    /// Reset reproduces the same world from the same config.
    #[test]
    fn prop_reset_reproducible(config in config_strategy()) {
        let a = World::new(config).unwrap();
        let mut b = World::new(config).unwrap();
        b.bank.set(Faction::Blue, 7);
        b.reset().unwrap();

        prop_assert_eq!(&a.resources, &b.resources);
        prop_assert_eq!(&a.units, &b.units);
        prop_assert_eq!(a.bank, b.bank);
    }
}
