//! Driver loop shared by the terminal and window front ends.
//!
//! Each call to [`Session::step`] is one simulation turn: at most one agent
//! command is applied, then the turn is closed so ability cooldowns advance.
//! Idle input (no key pressed, unknown line) is not a turn.

use maze_explorer_core::{Command, Event, Position};
use maze_explorer_rendering::{
    AgentPresentation, FrameInput, GridPresentation, RenderingError, Scene,
};
use maze_explorer_system_analytics::{Analytics, HistoryReport, SessionStats};
use maze_explorer_world::{apply, query, World};
use tracing::debug;

/// World-space side length of one maze cell.
pub(crate) const CELL_LENGTH: f32 = 32.0;

/// A running episode plus the analytics fed by it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    analytics: Analytics,
    events: Vec<Event>,
    last_outcome: Option<String>,
}

impl Session {
    pub(crate) fn new(world: World) -> Self {
        Self {
            world,
            analytics: Analytics::new(),
            events: Vec::new(),
            last_outcome: None,
        }
    }

    /// Processes one input. Returns the events of the turn, empty when the
    /// input was idle.
    pub(crate) fn step(&mut self, input: FrameInput) -> &[Event] {
        self.events.clear();
        if input.quit || input == FrameInput::default() {
            return &self.events;
        }

        if let Some(command) = input.command() {
            let recorded = query::history(&self.world).len();
            apply(&mut self.world, command, &mut self.events);
            self.last_outcome = query::history(&self.world)
                .get(recorded)
                .map(|record| format!("{}: {}", record.action.label(), record.outcome))
                .or_else(|| {
                    self.events
                        .contains(&Event::EpisodeReset)
                        .then(|| "reset".to_owned())
                });
        }
        apply(&mut self.world, Command::EndTurn, &mut self.events);
        self.analytics.handle(&self.events);
        debug!(
            turn = query::turn(&self.world),
            events = self.events.len(),
            "turn processed"
        );
        &self.events
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn stats(&self) -> SessionStats {
        self.analytics.stats()
    }

    pub(crate) fn history(&self) -> HistoryReport {
        HistoryReport::from_agent(query::agent(&self.world))
    }

    /// Builds a scene showing the current episode.
    pub(crate) fn scene(&self) -> Result<Scene, RenderingError> {
        let grid = GridPresentation::from_grid(query::grid(&self.world), CELL_LENGTH, |_| false)?;
        let mut scene = Scene::new(grid);
        self.refresh_scene(&mut scene);
        Ok(scene)
    }

    /// Updates fog, agent, goals, and status of a scene built by [`Session::scene`].
    pub(crate) fn refresh_scene(&self, scene: &mut Scene) {
        let visibility = query::visibility(&self.world);
        for ((position, _), cell) in query::grid(&self.world)
            .iter()
            .zip(scene.grid.cells.iter_mut())
        {
            cell.revealed = visibility.is_revealed(position);
        }

        let state = query::state(&self.world);
        scene.agent = Some(AgentPresentation {
            position: state.position,
            facing: state.facing,
        });
        scene.goals = query::goals(&self.world).iter().copied().collect();
        scene.status = self.status_lines();
    }

    fn status_lines(&self) -> Vec<String> {
        let agent = query::agent(&self.world);
        let stats = self.analytics.stats();
        let omni = agent.omni_vision();
        let omni_status = if !agent.capabilities().omni_vision {
            "not available".to_owned()
        } else if omni.active() {
            "active".to_owned()
        } else if omni.cooldown() > 0 {
            format!("cooling down ({} turns)", omni.cooldown())
        } else {
            "ready".to_owned()
        };

        let mut lines = vec![
            format!(
                "{} at {}, turn {}",
                agent.name(),
                query::state(&self.world),
                query::turn(&self.world)
            ),
            format!("Omni-vision: {omni_status}"),
            format!(
                "Moves {}, turns {}, senses {}, rejected {}, cells revealed {}",
                stats.moves, stats.rotations, stats.senses, stats.rejections, stats.cells_revealed
            ),
        ];
        if let Some(outcome) = &self.last_outcome {
            lines.push(format!("Last: {outcome}"));
        }
        if query::goal_reached(&self.world) {
            lines.push("Goal reached!".to_owned());
        }
        lines
    }
}

/// Goal reached during the processed turn, if any.
pub(crate) fn goal_reached(events: &[Event]) -> Option<Position> {
    events.iter().find_map(|event| match event {
        Event::GoalReached { position } => Some(*position),
        _ => None,
    })
}
