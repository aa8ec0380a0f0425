// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! `AgeGrid`: a deterministic two-faction grid economy simulation.
//!
//! This crate provides a turn-based simulation designed for:
//! - Bit-exact reproducibility from a seed and a decision sequence
//! - Budgeted turns that penalise invalid proposals
//! - Pluggable decision policies compared over many episodes
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Episode Runner / Batch (rayon)    │
//! ├─────────────────────────────────────┤
//! │     Agents (greedy, random, ...)    │
//! ├─────────────────────────────────────┤
//! │  Turn Engine (actions, attempts)    │
//! ├─────────────────────────────────────┤
//! │ Movement · Economy · Map Generator  │
//! └─────────────────────────────────────┘
//! ```
//!
//! Simulation events are emitted with `tracing`; embedders install their own
//! subscriber, and the `agegrid` binary installs one for `-v`.

pub mod agents;
pub mod error;
pub mod game;
pub mod runner;
pub mod summary;

pub use error::{ConfigError, SetupError};

// Re-export key types at crate root for convenience
pub use agents::{Agent, AgentKind, BaselineAgent};
pub use game::{
    Action, ActionOutcome, Decision, Faction, GameConfig, Position, RawAction, Reason, TurnLog,
    World,
};
pub use runner::{BatchStats, EndReason, EpisodeResult, run_batch, run_episode};
pub use summary::render_summary;
