#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Explorer.

mod agent;
mod engine;
mod visibility;

use std::sync::Arc;

use maze_explorer_core::{
    Action, Command, Event, Grid, Outcome, Position, Rejection, State, WELCOME_BANNER,
};
use tracing::{debug, info};

pub use agent::{Agent, OmniVision, OMNI_VISION_COOLDOWN, OMNI_VISION_DURATION};
pub use engine::{ExplorationEngine, SenseReport, LONG_RANGE_VISION_REACH};
pub use visibility::Visibility;

/// Represents one exploration episode driven by external commands.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    engine: ExplorationEngine,
    start: State,
    state: State,
    turn: u64,
    goal_reached: bool,
}

impl World {
    /// Creates a world with the agent placed at `start` and every cell hidden.
    #[must_use]
    pub fn new<I>(grid: Arc<Grid>, agent: Agent, start: State, goals: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let engine = ExplorationEngine::new(grid, agent, goals);
        info!(
            agent = engine.agent().name(),
            %start,
            goals = engine.goals().len(),
            "episode started"
        );
        Self {
            banner: WELCOME_BANNER,
            engine,
            start,
            state: start,
            turn: 0,
            goal_reached: false,
        }
    }

    fn perform(&mut self, action: Action, out_events: &mut Vec<Event>) {
        let before = self.state;
        let outcome = match action {
            Action::Advance => match self.engine.advance(before) {
                Some(to) => {
                    self.state = to;
                    out_events.push(Event::AgentAdvanced { from: before, to });
                    if self.engine.is_goal(to.position) {
                        self.goal_reached = true;
                        info!(position = %to.position, turn = self.turn, "goal reached");
                        out_events.push(Event::GoalReached {
                            position: to.position,
                        });
                    }
                    Outcome::Moved { to }
                }
                None => Outcome::Rejected(Rejection::Blocked),
            },
            Action::TurnLeft | Action::TurnRight => {
                let turned = if action == Action::TurnLeft {
                    self.engine.turn_left(before)
                } else {
                    self.engine.turn_right(before)
                };
                match turned {
                    Some(to) => {
                        self.state = to;
                        out_events.push(Event::AgentTurned { from: before, to });
                        Outcome::Turned { to }
                    }
                    None => Outcome::Rejected(Rejection::MissingCapability),
                }
            }
            Action::Sense => {
                let report = self.engine.sense_report(before);
                let ahead_clear = report.ahead_clear;
                out_events.push(Event::CellsRevealed {
                    cells: report.revealed,
                    ahead_clear,
                });
                Outcome::Sensed { ahead_clear }
            }
            Action::ActivateOmniVision => match self.engine.activate_omni_vision(before) {
                Some(report) => {
                    let ahead_clear = report.ahead_clear;
                    out_events.push(Event::OmniVisionActivated);
                    out_events.push(Event::CellsRevealed {
                        cells: report.revealed,
                        ahead_clear,
                    });
                    Outcome::OmniVisionSwept { ahead_clear }
                }
                None => Outcome::Rejected(Rejection::OmniVisionUnavailable),
            },
        };

        if let Outcome::Rejected(reason) = outcome {
            debug!(action = action.label(), reason = reason.label(), "action rejected");
            out_events.push(Event::ActionRejected { action, reason });
        }

        self.engine
            .agent_mut()
            .record_decision(before, action, outcome);
    }

    fn end_turn(&mut self, out_events: &mut Vec<Event>) {
        let remaining = self.engine.agent_mut().tick_cooldown();
        self.turn = self.turn.saturating_add(1);
        out_events.push(Event::CooldownAdvanced { remaining });
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.engine.reset();
        self.state = self.start;
        self.turn = 0;
        self.goal_reached = false;
        info!(start = %self.start, "episode reset");
        out_events.push(Event::EpisodeReset);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::EndTurn => world.end_turn(out_events),
        Command::Reset => world.reset(out_events),
        other => {
            if let Some(action) = other.action() {
                world.perform(action, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::BTreeSet;

    use maze_explorer_core::{DecisionRecord, Grid, Position, State};

    use super::{Agent, Visibility, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Terrain of the current episode.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        world.engine.grid()
    }

    /// Fog-of-war bitmap of the current episode.
    #[must_use]
    pub fn visibility(world: &World) -> &Visibility {
        world.engine.visibility()
    }

    /// Agent exploring the maze.
    #[must_use]
    pub fn agent(world: &World) -> &Agent {
        world.engine.agent()
    }

    /// Current position and facing of the agent.
    #[must_use]
    pub fn state(world: &World) -> State {
        world.state
    }

    /// State restored by a reset.
    #[must_use]
    pub fn start(world: &World) -> State {
        world.start
    }

    /// Goal cells of the episode.
    #[must_use]
    pub fn goals(world: &World) -> &BTreeSet<Position> {
        world.engine.goals()
    }

    /// Decision history accumulated during the episode.
    #[must_use]
    pub fn history(world: &World) -> &[DecisionRecord] {
        world.engine.agent().history()
    }

    /// Number of completed turns since the episode started.
    #[must_use]
    pub fn turn(world: &World) -> u64 {
        world.turn
    }

    /// Whether the agent has stopped on a goal during the episode.
    #[must_use]
    pub fn goal_reached(world: &World) -> bool {
        world.goal_reached
    }
}
