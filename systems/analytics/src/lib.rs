#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session analytics and decision-history reporting.

use std::fmt;

use maze_explorer_core::{DecisionRecord, Event};
use maze_explorer_world::Agent;

/// Counters accumulated from world events during an episode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Completed simulation turns.
    pub turns: u64,
    /// Successful advances.
    pub moves: u64,
    /// Successful turns.
    pub rotations: u64,
    /// Sense operations, including omni-vision sweeps.
    pub senses: u64,
    /// Actions refused by the world.
    pub rejections: u64,
    /// Cells revealed by sense operations.
    pub cells_revealed: u64,
    /// Turn on which a goal was first reached, if any.
    pub goal_reached_on_turn: Option<u64>,
}

/// Pure analytics system that folds world events into session statistics.
#[derive(Debug, Default)]
pub struct Analytics {
    stats: SessionStats,
}

impl Analytics {
    /// Creates an analytics system with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics gathered since creation or the last episode reset.
    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Consumes world events emitted by a single `apply` batch.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::AgentAdvanced { .. } => self.stats.moves += 1,
                Event::AgentTurned { .. } => self.stats.rotations += 1,
                Event::CellsRevealed { cells, .. } => {
                    self.stats.senses += 1;
                    self.stats.cells_revealed += cells.len() as u64;
                }
                Event::ActionRejected { .. } => self.stats.rejections += 1,
                Event::CooldownAdvanced { .. } => self.stats.turns += 1,
                Event::GoalReached { .. } => {
                    if self.stats.goal_reached_on_turn.is_none() {
                        self.stats.goal_reached_on_turn = Some(self.stats.turns);
                    }
                }
                Event::EpisodeReset => self.stats = SessionStats::default(),
                Event::OmniVisionActivated => {}
            }
        }
    }
}

/// Printable summary of an agent's decision history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryReport {
    agent: String,
    records: Vec<DecisionRecord>,
    visited: usize,
    decision_points: usize,
}

impl HistoryReport {
    /// Captures the agent's current history.
    #[must_use]
    pub fn from_agent(agent: &Agent) -> Self {
        Self {
            agent: agent.name().to_owned(),
            records: agent.history().to_vec(),
            visited: agent.visited().len(),
            decision_points: agent.decision_points().len(),
        }
    }

    /// Recorded decisions in order.
    #[must_use]
    pub fn records(&self) -> &[DecisionRecord] {
        &self.records
    }

    /// Number of distinct positions the agent acted from.
    #[must_use]
    pub const fn visited(&self) -> usize {
        self.visited
    }

    /// Number of distinct decision points.
    #[must_use]
    pub const fn decision_points(&self) -> usize {
        self.decision_points
    }
}

impl fmt::Display for HistoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Decision history for {}:", self.agent)?;
        if self.records.is_empty() {
            writeln!(f, "  (no decisions yet)")?;
        }
        for (index, record) in self.records.iter().enumerate() {
            writeln!(
                f,
                "  {:>3}. {} -> {}: {}",
                index + 1,
                record.before,
                record.action.label(),
                record.outcome
            )?;
        }
        write!(
            f,
            "Visited cells: {}, decision points: {}",
            self.visited, self.decision_points
        )
    }
}
