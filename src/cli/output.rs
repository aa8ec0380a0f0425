//! Output formatting utilities for CLI.

// Percentages are computed from small counts
#![allow(clippy::cast_precision_loss)]

use agegrid::runner::FactionTally;
use agegrid::{AgentKind, BatchStats, EpisodeResult, Faction};
use serde::Serialize;

/// JSON-serializable episode result.
#[derive(Debug, Serialize)]
pub(super) struct JsonEpisodeResult {
    /// Map seed used.
    seed: u64,
    /// Winning faction (null if draw).
    winner: Option<Faction>,
    /// Full turns played.
    turns: u32,
    /// `target_bank` or `max_turns`.
    ended_by: String,
    /// Per-faction results.
    factions: Vec<JsonFactionResult>,
    /// Turn-by-turn log lines, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    log: Option<Vec<String>>,
}

/// JSON-serializable faction result.
#[derive(Debug, Serialize)]
pub(super) struct JsonFactionResult {
    /// Faction name.
    faction: Faction,
    /// Agent name.
    agent: String,
    /// Final bank.
    bank: u32,
    /// Proposal tallies.
    #[serde(flatten)]
    tally: FactionTally,
}

impl JsonEpisodeResult {
    /// Create from an `EpisodeResult`.
    pub(super) fn from_episode(
        result: &EpisodeResult,
        agents: [AgentKind; 2],
        log: Option<Vec<String>>,
    ) -> Self {
        Self {
            seed: result.seed,
            winner: result.winner,
            turns: result.turns,
            ended_by: result.ended_by.to_string(),
            factions: Faction::ALL
                .into_iter()
                .map(|faction| JsonFactionResult {
                    faction,
                    agent: agents[faction.index()].to_string(),
                    bank: result.bank(faction),
                    tally: *result.tally(faction),
                })
                .collect(),
            log,
        }
    }
}

/// Format an episode result as human-readable text.
pub(super) fn format_episode_text(result: &EpisodeResult, agents: [AgentKind; 2]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Episode Result (seed: {})\n", result.seed));
    match result.winner {
        Some(winner) => {
            output.push_str(&format!("  Winner: {winner} ({})\n", agents[winner.index()]));
        }
        None => output.push_str("  Winner: Draw\n"),
    }
    output.push_str(&format!("  Turns: {} (ended by {})\n\n", result.turns, result.ended_by));

    for faction in Faction::ALL {
        let tally = result.tally(faction);
        output.push_str(&format!(
            "  {faction} ({}): bank {} | {} actions, {} rejected of {} attempts\n",
            agents[faction.index()],
            result.bank(faction),
            tally.actions,
            tally.rejections,
            tally.attempts
        ));
    }

    output
}

/// JSON-serializable tournament result.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentResult {
    /// Episodes played.
    episodes: u64,
    /// Episodes whose map could not be generated.
    failed: u64,
    /// Number of draws.
    draws: u64,
    /// Episodes ended by reaching the bank target.
    ended_by_target: u64,
    /// Episodes ended by the turn cap.
    ended_by_max_turns: u64,
    /// Average episode length in turns.
    avg_turns: f64,
    /// Per-faction statistics.
    factions: Vec<JsonTournamentFaction>,
}

/// JSON-serializable per-faction tournament stats.
#[derive(Debug, Serialize)]
pub(super) struct JsonTournamentFaction {
    /// Faction name.
    faction: Faction,
    /// Agent name.
    agent: String,
    /// Number of wins.
    wins: u64,
    /// Win rate (0.0-1.0).
    win_rate: f64,
    /// Average final bank.
    avg_bank: f64,
    /// Share of proposals rejected (0.0-1.0).
    rejection_rate: f64,
}

impl JsonTournamentResult {
    /// Create from stats and agent names.
    pub(super) fn from_stats(stats: &BatchStats, agents: [AgentKind; 2]) -> Self {
        let factions = Faction::ALL
            .into_iter()
            .map(|faction| JsonTournamentFaction {
                faction,
                agent: agents[faction.index()].to_string(),
                wins: stats.wins_of(faction),
                win_rate: stats.win_rate(faction),
                avg_bank: stats.avg_bank(faction),
                rejection_rate: stats.rejection_rate(faction),
            })
            .collect();

        Self {
            episodes: stats.episodes,
            failed: stats.failed,
            draws: stats.draws,
            ended_by_target: stats.ended_by_target,
            ended_by_max_turns: stats.ended_by_max_turns,
            avg_turns: stats.avg_turns(),
            factions,
        }
    }
}

/// Format tournament stats as human-readable text.
pub(super) fn format_tournament_text(stats: &BatchStats, agents: [AgentKind; 2]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Tournament Results ({} episodes)\n", stats.episodes));
    output.push_str("========================================\n\n");

    output.push_str("Win Rates:\n");
    for faction in Faction::ALL {
        output.push_str(&format!(
            "  {faction} ({}): {:.1}% ({} wins)\n",
            agents[faction.index()],
            stats.win_rate(faction) * 100.0,
            stats.wins_of(faction)
        ));
    }
    output.push_str(&format!(
        "  Draws: {} ({:.1}%)\n\n",
        stats.draws,
        stats.draw_rate() * 100.0
    ));

    output.push_str("Average Banks:\n");
    for faction in Faction::ALL {
        output.push_str(&format!(
            "  {faction} ({}): {:.1} ({:.1}% of proposals rejected)\n",
            agents[faction.index()],
            stats.avg_bank(faction),
            stats.rejection_rate(faction) * 100.0
        ));
    }

    output.push_str(&format!(
        "\nEnded by target_bank: {} | Ended by max_turns: {}\n",
        stats.ended_by_target, stats.ended_by_max_turns
    ));
    output.push_str(&format!("Average Episode Length: {:.1} turns\n", stats.avg_turns()));
    if stats.failed > 0 {
        output.push_str(&format!("Failed setups: {}\n", stats.failed));
    }

    output
}

/// Format tournament stats as CSV.
pub(super) fn format_tournament_csv(stats: &BatchStats, agents: [AgentKind; 2]) -> String {
    let mut output = String::new();

    // Header
    output.push_str("faction,agent,wins,win_rate,avg_bank,rejection_rate,draws,episodes\n");

    // Data rows
    for faction in Faction::ALL {
        output.push_str(&format!(
            "{},{},{},{:.4},{:.2},{:.4},{},{}\n",
            faction,
            agents[faction.index()],
            stats.wins_of(faction),
            stats.win_rate(faction),
            stats.avg_bank(faction),
            stats.rejection_rate(faction),
            stats.draws,
            stats.episodes
        ));
    }

    output
}
