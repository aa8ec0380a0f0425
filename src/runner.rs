//! Episode runner for `AgeGrid`.
//!
//! Provides a pure function interface: `(config, agents) -> EpisodeResult`
//!
//! The runner handles:
//! - Alternating faction turns until a bank target or the turn cap
//! - Per-faction action, attempt and rejection tallies
//! - Parallel batches of independent episodes with rayon

// Tallies are converted to f64 only for averages
#![allow(clippy::cast_precision_loss)]

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::agents::Agent;
use crate::error::SetupError;
use crate::game::{Faction, GameConfig, TurnLog, World};

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// A faction reached `target_bank`.
    TargetBank,
    /// The turn cap was hit; the richer faction wins.
    MaxTurns,
}

impl EndReason {
    /// Output name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TargetBank => "target_bank",
            Self::MaxTurns => "max_turns",
        }
    }
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proposal counts for one faction over an episode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionTally {
    /// Proposals that applied.
    pub actions: u64,
    /// Proposals processed.
    pub attempts: u64,
    /// Proposals rejected.
    pub rejections: u64,
    /// Faction turns cut short by the attempt budget.
    pub attempt_exhaustions: u64,
}

impl FactionTally {
    /// Fold one faction-turn log into the tally.
    pub fn record(&mut self, log: &TurnLog) {
        self.actions += u64::from(log.actions());
        self.attempts += u64::from(log.attempts());
        self.rejections += u64::from(log.rejections());
        if log.ran_out_of_attempts() {
            self.attempt_exhaustions += 1;
        }
    }

    fn merge(&mut self, other: &Self) {
        self.actions += other.actions;
        self.attempts += other.attempts;
        self.rejections += other.rejections;
        self.attempt_exhaustions += other.attempt_exhaustions;
    }
}

/// Final result of an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeResult {
    /// Winning faction, `None` for a draw.
    pub winner: Option<Faction>,
    /// Full turns played.
    pub turns: u32,
    /// Red's final bank.
    pub red_bank: u32,
    /// Blue's final bank.
    pub blue_bank: u32,
    /// How the episode ended.
    pub ended_by: EndReason,
    /// Map seed used.
    pub seed: u64,
    /// Tallies indexed by faction.
    pub tallies: [FactionTally; 2],
}

impl EpisodeResult {
    /// Final bank of a faction.
    #[must_use]
    pub const fn bank(&self, faction: Faction) -> u32 {
        match faction {
            Faction::Red => self.red_bank,
            Faction::Blue => self.blue_bank,
        }
    }

    /// Tally of a faction.
    #[must_use]
    pub const fn tally(&self, faction: Faction) -> &FactionTally {
        &self.tallies[faction.index()]
    }
}

struct Seat<'a, A: Agent> {
    agent: &'a A,
    memory: A::Memory,
}

/// Run one faction turn, hand over play, and report a bank winner if any.
fn play_phase<A, F>(
    world: &mut World,
    seat: &mut Seat<'_, A>,
    tallies: &mut [FactionTally; 2],
    observe: &mut F,
) -> Option<Faction>
where
    A: Agent,
    F: FnMut(&World, &TurnLog),
{
    let log = world.step_faction(|w| seat.agent.act(w, &mut seat.memory));
    tallies[log.faction.index()].record(&log);
    observe(world, &log);
    world.step_end_turn();
    world.winner()
}

/// Run an episode to completion.
///
/// # Errors
///
/// Returns an error if the world cannot be set up from `config`.
pub fn run_episode<R: Agent, B: Agent>(
    config: GameConfig,
    red: &R,
    blue: &B,
) -> Result<EpisodeResult, SetupError> {
    run_episode_observed(config, red, blue, |_, _| {})
}

/// Run an episode, calling `observe` after every faction turn.
///
/// # Errors
///
/// Returns an error if the world cannot be set up from `config`.
pub fn run_episode_observed<R, B, F>(
    config: GameConfig,
    red: &R,
    blue: &B,
    mut observe: F,
) -> Result<EpisodeResult, SetupError>
where
    R: Agent,
    B: Agent,
    F: FnMut(&World, &TurnLog),
{
    let mut world = World::new(config)?;
    let mut red = Seat {
        agent: red,
        memory: red.init_memory(),
    };
    let mut blue = Seat {
        agent: blue,
        memory: blue.init_memory(),
    };
    let mut tallies = [FactionTally::default(); 2];

    while world.turn < config.max_turns {
        let winner = play_phase(&mut world, &mut red, &mut tallies, &mut observe)
            .or_else(|| play_phase(&mut world, &mut blue, &mut tallies, &mut observe));
        if winner.is_some() {
            return Ok(finish(&world, winner, EndReason::TargetBank, tallies));
        }
    }

    let (red_bank, blue_bank) = (world.bank.get(Faction::Red), world.bank.get(Faction::Blue));
    let winner = match red_bank.cmp(&blue_bank) {
        std::cmp::Ordering::Greater => Some(Faction::Red),
        std::cmp::Ordering::Less => Some(Faction::Blue),
        std::cmp::Ordering::Equal => None,
    };
    Ok(finish(&world, winner, EndReason::MaxTurns, tallies))
}

fn finish(
    world: &World,
    winner: Option<Faction>,
    ended_by: EndReason,
    tallies: [FactionTally; 2],
) -> EpisodeResult {
    let result = EpisodeResult {
        winner,
        turns: world.turn,
        red_bank: world.bank.get(Faction::Red),
        blue_bank: world.bank.get(Faction::Blue),
        ended_by,
        seed: world.config().seed,
        tallies,
    };
    tracing::info!(
        seed = result.seed,
        winner = ?result.winner,
        turns = result.turns,
        red_bank = result.red_bank,
        blue_bank = result.blue_bank,
        ended_by = %result.ended_by,
        "episode finished"
    );
    result
}

/// Aggregated statistics over many episodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Episodes that ran to completion.
    pub episodes: u64,
    /// Episodes whose world could not be set up.
    pub failed: u64,
    /// Wins indexed by faction.
    pub wins: [u64; 2],
    /// Drawn episodes.
    pub draws: u64,
    /// Episodes ended by reaching `target_bank`.
    pub ended_by_target: u64,
    /// Episodes ended by the turn cap.
    pub ended_by_max_turns: u64,
    /// Sum of turns played.
    total_turns: u64,
    /// Sum of final banks indexed by faction.
    total_banks: [u64; 2],
    /// Summed tallies indexed by faction.
    pub tallies: [FactionTally; 2],
}

impl BatchStats {
    /// Add an episode result to the stats.
    pub fn add_result(&mut self, result: &EpisodeResult) {
        self.episodes += 1;
        self.total_turns += u64::from(result.turns);

        match result.winner {
            Some(faction) => self.wins[faction.index()] += 1,
            None => self.draws += 1,
        }
        match result.ended_by {
            EndReason::TargetBank => self.ended_by_target += 1,
            EndReason::MaxTurns => self.ended_by_max_turns += 1,
        }
        for faction in Faction::ALL {
            let i = faction.index();
            self.total_banks[i] += u64::from(result.bank(faction));
            self.tallies[i].merge(&result.tallies[i]);
        }
    }

    /// Combine stats gathered on another thread.
    pub fn merge(&mut self, other: &Self) {
        self.episodes += other.episodes;
        self.failed += other.failed;
        self.draws += other.draws;
        self.ended_by_target += other.ended_by_target;
        self.ended_by_max_turns += other.ended_by_max_turns;
        self.total_turns += other.total_turns;
        for faction in Faction::ALL {
            let i = faction.index();
            self.wins[i] += other.wins[i];
            self.total_banks[i] += other.total_banks[i];
            self.tallies[i].merge(&other.tallies[i]);
        }
    }

    fn ratio(&self, count: u64) -> f64 {
        if self.episodes == 0 {
            return 0.0;
        }
        count as f64 / self.episodes as f64
    }

    /// Wins of a faction.
    #[must_use]
    pub const fn wins_of(&self, faction: Faction) -> u64 {
        self.wins[faction.index()]
    }

    /// Win rate of a faction (0.0-1.0).
    #[must_use]
    pub fn win_rate(&self, faction: Faction) -> f64 {
        self.ratio(self.wins_of(faction))
    }

    /// Draw rate (0.0-1.0).
    #[must_use]
    pub fn draw_rate(&self) -> f64 {
        self.ratio(self.draws)
    }

    /// Average episode length in turns.
    #[must_use]
    pub fn avg_turns(&self) -> f64 {
        self.ratio(self.total_turns)
    }

    /// Average final bank of a faction.
    #[must_use]
    pub fn avg_bank(&self, faction: Faction) -> f64 {
        self.ratio(self.total_banks[faction.index()])
    }

    /// Share of a faction's proposals that were rejected (0.0-1.0).
    #[must_use]
    pub fn rejection_rate(&self, faction: Faction) -> f64 {
        let tally = &self.tallies[faction.index()];
        if tally.attempts == 0 {
            return 0.0;
        }
        tally.rejections as f64 / tally.attempts as f64
    }
}

/// Run `episodes` independent episodes in parallel.
///
/// Episode `i` uses map seed `config.seed + i`; the agent factories receive
/// that seed too.
///
/// # Errors
///
/// Returns an error if `config` is invalid. Episodes whose map cannot be
/// generated are counted in [`BatchStats::failed`].
pub fn run_batch<R, B, MR, MB>(
    config: GameConfig,
    episodes: u64,
    make_red: MR,
    make_blue: MB,
) -> Result<BatchStats, SetupError>
where
    R: Agent,
    B: Agent,
    MR: Fn(u64) -> R + Sync,
    MB: Fn(u64) -> B + Sync,
{
    run_batch_observed(config, episodes, make_red, make_blue, |_| {})
}

/// Like [`run_batch`], calling `on_episode` as each episode completes.
///
/// `on_episode` runs on worker threads in no particular order.
///
/// # Errors
///
/// Returns an error if `config` is invalid.
pub fn run_batch_observed<R, B, MR, MB, F>(
    config: GameConfig,
    episodes: u64,
    make_red: MR,
    make_blue: MB,
    on_episode: F,
) -> Result<BatchStats, SetupError>
where
    R: Agent,
    B: Agent,
    MR: Fn(u64) -> R + Sync,
    MB: Fn(u64) -> B + Sync,
    F: Fn(&EpisodeResult) + Sync,
{
    config.validate()?;

    // Each thread accumulates into its own BatchStats, merged at the end
    let stats = (0..episodes)
        .into_par_iter()
        .fold(BatchStats::default, |mut local, i| {
            let seed = config.seed.wrapping_add(i);
            let red = make_red(seed);
            let blue = make_blue(seed);
            match run_episode(config.with_seed(seed), &red, &blue) {
                Ok(result) => {
                    on_episode(&result);
                    local.add_result(&result);
                }
                Err(e) => {
                    tracing::warn!(seed, error = %e, "episode setup failed");
                    local.failed += 1;
                }
            }
            local
        })
        .reduce(BatchStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    Ok(stats)
}
