#![no_main]

//! Turn engine fuzzer.
//!
//! Feeds arbitrary proposals, well-formed or not, through full faction
//! turns on a freshly generated world and checks the world invariants
//! after every turn.

use agegrid::game::{
    Action, Decision, Faction, GameConfig, Position, RawAction, World, check_invariants,
};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

/// Kinds the raw proposals draw from, including ones the engine rejects.
const RAW_KINDS: [&str; 5] = ["", "gather", "move_towards", "spawn_worker", "attack"];

/// A fuzzer-generated proposal.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzProposal {
    Gather { unit_id: u8 },
    Move { unit_id: u8, x: i8, y: i8 },
    Spawn,
    Raw { kind: u8, args: Vec<i16> },
    Stop,
}

impl FuzzProposal {
    fn to_decision(&self) -> Decision {
        match self {
            Self::Gather { unit_id } => Decision::Act(Action::Gather {
                unit_id: u32::from(*unit_id),
            }),
            Self::Move { unit_id, x, y } => Decision::Act(Action::MoveTowards {
                unit_id: u32::from(*unit_id),
                target: Position::new(i32::from(*x), i32::from(*y)),
            }),
            Self::Spawn => Decision::Act(Action::SpawnWorker),
            Self::Raw { kind, args } => {
                let kind = RAW_KINDS[usize::from(*kind) % RAW_KINDS.len()];
                let args = args.iter().take(4).map(|&a| i64::from(a)).collect();
                Decision::Propose(RawAction::new(kind, args))
            }
            Self::Stop => Decision::Stop,
        }
    }
}

/// Structured input for turn fuzzing.
#[derive(Arbitrary, Debug)]
struct TurnInput {
    seed: u64,
    width: u8,
    height: u8,
    num_resource_nodes: u8,
    starting_bank: u8,
    proposals: Vec<FuzzProposal>,
    num_turns: u8,
}

fuzz_target!(|input: TurnInput| {
    let config = GameConfig {
        width: 4 + u16::from(input.width % 20),
        height: 4 + u16::from(input.height % 20),
        num_resource_nodes: u32::from(input.num_resource_nodes % 12),
        starting_resources: u32::from(input.starting_bank),
        seed: input.seed,
        ..GameConfig::default()
    };

    // Crowded grids may refuse placement; that is a setup error, not a bug
    let Ok(mut world) = World::new(config) else {
        return;
    };

    let violations = check_invariants(&world);
    assert!(violations.is_empty(), "Invariants violated at start: {violations:?}");

    let mut proposals = input.proposals.iter().take(256).cycle();
    let num_turns = (input.num_turns % 16).max(1);

    for turn in 0..num_turns {
        for _ in Faction::ALL {
            let before_units = world.units.len();
            let log = world.step_faction(|_| {
                proposals
                    .next()
                    .map_or(Decision::Stop, FuzzProposal::to_decision)
            });
            assert!(log.actions() <= config.actions_per_turn);
            assert!(log.attempts() <= config.max_attempts_per_turn);
            assert!(world.units.len() >= before_units);
            world.step_end_turn();
        }

        let violations = check_invariants(&world);
        assert!(
            violations.is_empty(),
            "Invariants violated after turn {turn}: {violations:?}"
        );

        if world.winner().is_some() {
            break;
        }
    }
});
