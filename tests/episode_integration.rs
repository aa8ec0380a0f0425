//! Integration tests for episodes, batches and config loading.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::io::Write;

use agegrid::agents::{Agent, AgentKind, GreedyAgent, RandomAgent};
use agegrid::game::{Decision, Faction, GameConfig, World, check_invariants};
use agegrid::runner::{EndReason, run_batch, run_episode, run_episode_observed};
use agegrid::{ConfigError, SetupError, render_summary};

#[test]
fn test_same_seed_same_episode() {
    for seed in [1, 42, 9_999] {
        let config = GameConfig::default().with_seed(seed);
        let red = AgentKind::Greedy.build_for(Faction::Red, seed);
        let blue = AgentKind::Random.build_for(Faction::Blue, seed);

        let a = run_episode(config, &red, &blue).unwrap();
        let b = run_episode(config, &red, &blue).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.seed, seed);
    }
}

#[test]
fn test_episode_result_is_consistent() {
    let config = GameConfig::default();
    let result = run_episode(config, &GreedyAgent::default(), &RandomAgent::new(0)).unwrap();

    assert!(result.turns <= config.max_turns);
    match result.ended_by {
        EndReason::TargetBank => {
            let winner = result.winner.unwrap();
            assert!(result.bank(winner) >= config.target_bank);
        }
        EndReason::MaxTurns => {
            assert_eq!(result.turns, config.max_turns);
            match result.winner {
                Some(Faction::Red) => assert!(result.red_bank > result.blue_bank),
                Some(Faction::Blue) => assert!(result.blue_bank > result.red_bank),
                None => assert_eq!(result.red_bank, result.blue_bank),
            }
        }
    }
    for faction in Faction::ALL {
        let tally = result.tally(faction);
        assert_eq!(tally.actions + tally.rejections, tally.attempts);
    }
}

#[test]
fn test_invariants_hold_through_random_episode() {
    let config = GameConfig {
        max_turns: 60,
        ..GameConfig::default().with_seed(5)
    };
    let mut checked = 0;
    let _ = run_episode_observed(
        config,
        &RandomAgent::new(1),
        &RandomAgent::new(2),
        |world, _| {
            assert!(check_invariants(world).is_empty());
            checked += 1;
        },
    )
    .unwrap();
    assert!(checked > 0);
}

#[test]
fn test_batch_is_reproducible() {
    let config = GameConfig {
        max_turns: 40,
        ..GameConfig::default()
    };
    let make_red = |seed| AgentKind::Greedy.build_for(Faction::Red, seed);
    let make_blue = |seed| AgentKind::Random.build_for(Faction::Blue, seed);

    let a = run_batch(config, 16, make_red, make_blue).unwrap();
    let b = run_batch(config, 16, make_red, make_blue).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.episodes, 16);
    assert_eq!(a.failed, 0);
    assert_eq!(a.ended_by_target + a.ended_by_max_turns, 16);
}

#[test]
fn test_batch_counts_failed_setups() {
    // A 5x5 grid holds at most nine mirror pairs; the batch itself still succeeds
    let config = GameConfig {
        width: 5,
        height: 5,
        num_resource_nodes: 20,
        max_turns: 2,
        ..GameConfig::default()
    };
    let stats = run_batch(config, 3, |_| GreedyAgent::default(), RandomAgent::new).unwrap();
    assert_eq!(stats.failed, 3);
    assert_eq!(stats.episodes, 0);
}

#[test]
fn test_custom_agent_plugs_in() {
    /// Counts its queries and always stops.
    struct Counting;

    impl Agent for Counting {
        type Memory = u32;

        fn act(&self, _world: &World, memory: &mut u32) -> Decision {
            *memory += 1;
            Decision::Stop
        }
    }

    let config = GameConfig {
        max_turns: 3,
        ..GameConfig::default()
    };
    let result = run_episode(config, &Counting, &Counting).unwrap();
    assert_eq!(result.turns, 3);
    assert_eq!(result.winner, None);
}

#[test]
fn test_config_file_partial_fields() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "width": 16, "height": 10, "seed": 3 }}"#).unwrap();

    let config = GameConfig::from_json_file(file.path()).unwrap();
    assert_eq!((config.width, config.height, config.seed), (16, 10, 3));
    assert_eq!(config.max_turns, 200);

    let world = World::new(config).unwrap();
    assert_eq!(world.base(Faction::Blue).position.x, 14);
    assert!(render_summary(&world).contains("Blue base @ (14, 8)"));
}

#[test]
fn test_config_file_errors() {
    let missing = GameConfig::from_json_file(std::path::Path::new("/nonexistent/agegrid.json"));
    assert!(matches!(missing, Err(ConfigError::Io { .. })));

    let mut unknown = tempfile::NamedTempFile::new().unwrap();
    write!(unknown, r#"{{ "widht": 16 }}"#).unwrap();
    assert!(matches!(
        GameConfig::from_json_file(unknown.path()),
        Err(ConfigError::Parse(_))
    ));

    let mut invalid = tempfile::NamedTempFile::new().unwrap();
    write!(invalid, r#"{{ "actions_per_turn": 5, "max_attempts_per_turn": 4 }}"#).unwrap();
    assert!(matches!(
        GameConfig::from_json_file(invalid.path()),
        Err(ConfigError::Invalid(SetupError::InvalidConfig(_)))
    ));

    let mut crowded = tempfile::NamedTempFile::new().unwrap();
    write!(crowded, r#"{{ "num_resource_nodes": 4000000000 }}"#).unwrap();
    assert!(matches!(
        GameConfig::from_json_file(crowded.path()),
        Err(ConfigError::Invalid(SetupError::InvalidConfig(_)))
    ));
}
