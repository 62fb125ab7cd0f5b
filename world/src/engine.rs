//! Exploration engine: sensing, movement, and turning over a shared grid.

use std::{collections::BTreeSet, sync::Arc};

use maze_explorer_core::{Action, Direction, Grid, Position, State};
use tracing::debug;

use crate::{
    agent::{Agent, OMNI_VISION_DURATION},
    visibility::Visibility,
};

/// Cells revealed ahead by long-range vision.
pub const LONG_RANGE_VISION_REACH: u32 = 3;

/// Outcome of a sense operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SenseReport {
    /// Cells that were hidden before the sense, in reveal order.
    pub revealed: Vec<Position>,
    /// Whether the cell directly ahead is in bounds and passable.
    pub ahead_clear: bool,
}

/// Holds the grid, the agent, the fog-of-war bitmap, and the goal set for one episode.
#[derive(Clone, Debug)]
pub struct ExplorationEngine {
    grid: Arc<Grid>,
    agent: Agent,
    visibility: Visibility,
    goals: BTreeSet<Position>,
}

impl ExplorationEngine {
    /// Creates an engine with every cell hidden.
    #[must_use]
    pub fn new<I>(grid: Arc<Grid>, agent: Agent, goals: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let visibility = Visibility::for_grid(&grid);
        Self {
            grid,
            agent,
            visibility,
            goals: goals.into_iter().collect(),
        }
    }

    /// Terrain shared with every other reader.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Agent driven by the engine.
    #[must_use]
    pub const fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Mutable access for the driver, used to record decisions and tick cooldowns.
    pub fn agent_mut(&mut self) -> &mut Agent {
        &mut self.agent
    }

    /// Fog-of-war bitmap.
    #[must_use]
    pub const fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    /// Goal cells fixed for the episode.
    #[must_use]
    pub const fn goals(&self) -> &BTreeSet<Position> {
        &self.goals
    }

    /// Whether the position is one of the episode goals.
    #[must_use]
    pub fn is_goal(&self, position: Position) -> bool {
        self.goals.contains(&position)
    }

    /// Reveals cells around the agent and reports whether the cell ahead is clear.
    pub fn sense(&mut self, state: State) -> bool {
        self.sense_report(state).ahead_clear
    }

    /// Same as [`ExplorationEngine::sense`] but also lists the newly revealed cells.
    ///
    /// An armed omni-vision sweeps all four directions and then starts its
    /// cooldown. Otherwise long-range vision looks three cells ahead, and the
    /// default looks at the single cell ahead. Rays stop after the first
    /// impassable cell, which is itself revealed.
    pub fn sense_report(&mut self, state: State) -> SenseReport {
        let mut revealed = Vec::new();

        if self.agent.omni_vision().active() {
            for direction in Direction::ALL {
                self.reveal_ray(state.position, direction, OMNI_VISION_DURATION, &mut revealed);
            }
            self.agent.finish_omni_vision_sweep();
        } else if self.agent.capabilities().long_range_vision {
            self.reveal_ray(
                state.position,
                state.facing,
                LONG_RANGE_VISION_REACH,
                &mut revealed,
            );
        } else {
            self.reveal_ray(state.position, state.facing, 1, &mut revealed);
        }

        let ahead_clear = state
            .ahead()
            .is_some_and(|position| self.grid.is_passable(position));
        debug!(%state, revealed = revealed.len(), ahead_clear, "sensed");

        SenseReport {
            revealed,
            ahead_clear,
        }
    }

    /// Moves up to the agent's movement range in the facing direction.
    ///
    /// Fails without side effects when the first step is blocked. A later
    /// blocked step ends the move on the last enterable cell. Only the final
    /// cell is revealed.
    pub fn advance(&mut self, state: State) -> Option<State> {
        let range = self.agent.capabilities().movement_range;
        let mut current = state.position;

        for step in 0..range {
            match current
                .step(state.facing)
                .filter(|next| self.grid.is_passable(*next))
            {
                Some(next) => current = next,
                None if step == 0 => {
                    debug!(%state, "advance blocked");
                    return None;
                }
                None => break,
            }
        }

        let _ = self.visibility.reveal(current);
        let moved = state.moved_to(current);
        debug!(from = %state, to = %moved, "advanced");
        Some(moved)
    }

    /// Rotates counter-clockwise when the agent may turn left.
    #[must_use]
    pub fn turn_left(&self, state: State) -> Option<State> {
        self.agent
            .can_perform(Action::TurnLeft)
            .then(|| state.facing(state.facing.turned_left()))
    }

    /// Rotates clockwise when the agent may turn right.
    #[must_use]
    pub fn turn_right(&self, state: State) -> Option<State> {
        self.agent
            .can_perform(Action::TurnRight)
            .then(|| state.facing(state.facing.turned_right()))
    }

    /// Arms omni-vision and immediately senses with it.
    ///
    /// Returns `None` when the agent lacks the ability, it is cooling down,
    /// or it is already active.
    pub fn activate_omni_vision(&mut self, state: State) -> Option<SenseReport> {
        if !self.agent.try_activate_omni_vision() {
            debug!(
                cooldown = self.agent.omni_vision().cooldown(),
                "omni-vision unavailable"
            );
            return None;
        }
        Some(self.sense_report(state))
    }

    /// Hides every cell again and clears the agent's episodic state.
    pub fn reset(&mut self) {
        self.visibility = Visibility::for_grid(&self.grid);
        self.agent.reset_episode();
    }

    fn reveal_ray(
        &mut self,
        origin: Position,
        direction: Direction,
        reach: u32,
        revealed: &mut Vec<Position>,
    ) {
        let mut current = origin;
        for _ in 0..reach {
            let Some(next) = current
                .step(direction)
                .filter(|next| self.grid.contains(*next))
            else {
                return;
            };
            if self.visibility.reveal(next) {
                revealed.push(next);
            }
            if !self.grid.is_passable(next) {
                return;
            }
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_explorer_core::Capabilities;

    const CORRIDOR: &str = "\
0,0,0,0,0,0
0,1,1,1,1,0
0,1,0,1,5,0
0,1,1,1,1,0
0,0,0,0,0,0";

    fn engine_with(capabilities: Capabilities) -> ExplorationEngine {
        let grid = Arc::new(Grid::parse(CORRIDOR).expect("valid grid"));
        let agent = Agent::new("tester", capabilities).expect("valid capabilities");
        ExplorationEngine::new(grid, agent, [Position::new(3, 4)])
    }

    fn state(row: u32, column: u32, facing: Direction) -> State {
        State::new(Position::new(row, column), facing)
    }

    #[test]
    fn default_sense_reveals_single_cell_ahead() {
        let mut engine = engine_with(Capabilities::default());

        let report = engine.sense_report(state(1, 1, Direction::Right));

        assert_eq!(report.revealed, vec![Position::new(1, 2)]);
        assert!(report.ahead_clear);
        assert_eq!(engine.visibility().revealed_count(), 1);
    }

    #[test]
    fn default_sense_reports_wall_ahead() {
        let mut engine = engine_with(Capabilities::default());

        assert!(!engine.sense(state(1, 1, Direction::Up)));
        assert!(engine.visibility().is_revealed(Position::new(0, 1)));
    }

    #[test]
    fn sense_at_edge_reveals_nothing() {
        let grid = Arc::new(Grid::parse("1,1\n1,1").expect("valid grid"));
        let agent = Agent::new("edge", Capabilities::default()).expect("valid");
        let mut engine = ExplorationEngine::new(grid, agent, []);

        let report = engine.sense_report(state(0, 0, Direction::Up));

        assert!(report.revealed.is_empty());
        assert!(!report.ahead_clear);
    }

    #[test]
    fn long_range_vision_stops_after_first_blocker() {
        let mut engine = engine_with(Capabilities::default().with_long_range_vision(true));

        let report = engine.sense_report(state(3, 1, Direction::Up));

        assert_eq!(
            report.revealed,
            vec![Position::new(2, 1), Position::new(1, 1), Position::new(0, 1)]
        );

        let report = engine.sense_report(state(2, 3, Direction::Right));
        assert_eq!(report.revealed, vec![Position::new(2, 4)]);
        assert!(!report.ahead_clear);
        assert!(!engine.visibility().is_revealed(Position::new(2, 5)));
    }

    #[test]
    fn omni_vision_sweeps_all_directions_and_starts_cooldown() {
        let mut engine = engine_with(Capabilities::default().with_omni_vision(true));

        let report = engine
            .activate_omni_vision(state(1, 3, Direction::Up))
            .expect("omni-vision ready");

        assert!(!report.ahead_clear, "wall above");
        for position in [
            Position::new(0, 3),
            Position::new(2, 3),
            Position::new(3, 3),
            Position::new(4, 3),
            Position::new(1, 2),
            Position::new(1, 1),
            Position::new(1, 0),
            Position::new(1, 4),
            Position::new(1, 5),
        ] {
            assert!(
                engine.visibility().is_revealed(position),
                "{position} should be revealed"
            );
        }
        assert_eq!(engine.visibility().revealed_count(), 9);
        assert!(!engine.agent().omni_vision().active());
        assert_eq!(engine.agent().omni_vision().cooldown(), 5);
    }

    #[test]
    fn omni_vision_rejected_without_capability() {
        let mut engine = engine_with(Capabilities::default());

        assert!(engine
            .activate_omni_vision(state(1, 1, Direction::Right))
            .is_none());
        assert_eq!(engine.visibility().revealed_count(), 0);
    }

    #[test]
    fn advance_moves_single_step_and_reveals_destination() {
        let mut engine = engine_with(Capabilities::default());

        let moved = engine
            .advance(state(1, 1, Direction::Right))
            .expect("floor ahead");

        assert_eq!(moved, state(1, 2, Direction::Right));
        assert!(engine.visibility().is_revealed(Position::new(1, 2)));
    }

    #[test]
    fn advance_into_wall_changes_nothing() {
        let mut engine = engine_with(Capabilities::default().with_movement_range(3));

        assert_eq!(engine.advance(state(1, 1, Direction::Up)), None);
        assert_eq!(engine.visibility().revealed_count(), 0);
    }

    #[test]
    fn advance_with_range_stops_before_blocker() {
        let mut engine = engine_with(Capabilities::default().with_movement_range(2));

        let moved = engine
            .advance(state(1, 3, Direction::Right))
            .expect("partial move");

        assert_eq!(moved, state(1, 4, Direction::Right));
        assert!(engine.visibility().is_revealed(Position::new(1, 4)));
    }

    #[test]
    fn advance_with_range_covers_full_distance_and_skips_intermediate_reveal() {
        let mut engine = engine_with(Capabilities::default().with_movement_range(3));

        let moved = engine
            .advance(state(1, 1, Direction::Right))
            .expect("open corridor");

        assert_eq!(moved.position, Position::new(1, 4));
        assert!(engine.visibility().is_revealed(Position::new(1, 4)));
        assert!(!engine.visibility().is_revealed(Position::new(1, 2)));
        assert!(!engine.visibility().is_revealed(Position::new(1, 3)));
    }

    #[test]
    fn turns_respect_capabilities() {
        let engine = engine_with(Capabilities::default().with_turn_left(false));
        let start = state(1, 1, Direction::Up);

        assert_eq!(engine.turn_left(start), None);
        assert_eq!(engine.turn_right(start), Some(state(1, 1, Direction::Right)));
    }

    #[test]
    fn reset_hides_cells_and_keeps_capabilities() {
        let capabilities = Capabilities::default().with_movement_range(2);
        let mut engine = engine_with(capabilities);
        let _ = engine.sense(state(1, 1, Direction::Right));

        engine.reset();

        assert_eq!(engine.visibility().revealed_count(), 0);
        assert_eq!(engine.agent().capabilities(), &capabilities);
    }
}
