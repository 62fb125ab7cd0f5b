#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Explorer engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing what the agent should attempt, the world executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values that
//! systems and presenters consume. Terrain lives in an immutable [`Grid`].

mod grid;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use grid::{Grid, GridError};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Explorer.";

/// Terrain category stored in every grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainCode {
    /// Solid wall, code `0`.
    Wall,
    /// Open floor, code `1`.
    Floor,
    /// Shallow water, code `2`.
    Water,
    /// Sand, code `3`.
    Sand,
    /// Forest, code `4`.
    Forest,
    /// Mountain, code `5`.
    Mountain,
}

impl TerrainCode {
    /// Every terrain code ordered by its numeric value.
    pub const ALL: [TerrainCode; 6] = [
        Self::Wall,
        Self::Floor,
        Self::Water,
        Self::Sand,
        Self::Forest,
        Self::Mountain,
    ];

    /// Decodes the numeric terrain code used by maze files.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Wall),
            1 => Some(Self::Floor),
            2 => Some(Self::Water),
            3 => Some(Self::Sand),
            4 => Some(Self::Forest),
            5 => Some(Self::Mountain),
            _ => None,
        }
    }

    /// Numeric code written to maze files.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Wall => 0,
            Self::Floor => 1,
            Self::Water => 2,
            Self::Sand => 3,
            Self::Forest => 4,
            Self::Mountain => 5,
        }
    }

    /// Walls and mountains block movement; everything else can be crossed.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Wall | Self::Mountain)
    }
}

/// Cardinal facing directions, also used as the direct moves of the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    Up,
    /// Toward increasing row indices.
    Down,
    /// Toward decreasing column indices.
    Left,
    /// Toward increasing column indices.
    Right,
}

impl Direction {
    /// All directions in sweep order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Direction after a quarter turn counter-clockwise (Up, Left, Down, Right).
    #[must_use]
    pub const fn turned_left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    /// Direction after a quarter turn clockwise (Up, Right, Down, Left).
    #[must_use]
    pub const fn turned_right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    /// Lower-case label used in textual output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: u32,
    column: u32,
}

impl Position {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Neighbouring position one step in `direction`.
    ///
    /// Returns `None` when the step would leave the top or left edge of the
    /// coordinate space. Bottom and right bounds are owned by the [`Grid`].
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (row, column) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.column),
            Direction::Down => (self.row.checked_add(1)?, self.column),
            Direction::Left => (self.row, self.column.checked_sub(1)?),
            Direction::Right => (self.row, self.column.checked_add(1)?),
        };
        Some(Self::new(row, column))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Position and facing of the exploring agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    /// Cell occupied by the agent.
    pub position: Position,
    /// Direction the agent is facing.
    pub facing: Direction,
}

impl State {
    /// Creates a new state.
    #[must_use]
    pub const fn new(position: Position, facing: Direction) -> Self {
        Self { position, facing }
    }

    /// Copy of the state at another position, keeping the facing.
    #[must_use]
    pub const fn moved_to(self, position: Position) -> Self {
        Self::new(position, self.facing)
    }

    /// Copy of the state with another facing, keeping the position.
    #[must_use]
    pub const fn facing(self, facing: Direction) -> Self {
        Self::new(self.position, facing)
    }

    /// Cell directly ahead of the agent, if representable.
    #[must_use]
    pub fn ahead(self) -> Option<Position> {
        self.position.step(self.facing)
    }
}

impl std::fmt::Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} facing {}", self.position, self.facing.label())
    }
}

/// Actions available to the interactive agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Move forward up to the agent's movement range.
    Advance,
    /// Rotate a quarter turn counter-clockwise.
    TurnLeft,
    /// Rotate a quarter turn clockwise.
    TurnRight,
    /// Reveal cells according to the agent's vision.
    Sense,
    /// Activate the omni-vision ability and sweep all directions.
    ActivateOmniVision,
}

impl Action {
    /// Actions whose availability defines a decision point.
    pub const NAVIGATION: [Action; 3] = [Self::Advance, Self::TurnLeft, Self::TurnRight];

    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Advance => "advance",
            Self::TurnLeft => "turn left",
            Self::TurnRight => "turn right",
            Self::Sense => "sense",
            Self::ActivateOmniVision => "omni-vision",
        }
    }
}

/// Fixed set of abilities granted to an agent for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Capabilities {
    /// Whether the agent may turn counter-clockwise.
    pub can_turn_left: bool,
    /// Whether the agent may turn clockwise.
    pub can_turn_right: bool,
    /// Whether sensing reaches three cells ahead instead of one.
    pub long_range_vision: bool,
    /// Whether the agent owns the omni-vision ability.
    pub omni_vision: bool,
    /// Maximum cells covered by a single advance. Must be at least one.
    pub movement_range: u32,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            can_turn_left: true,
            can_turn_right: true,
            long_range_vision: false,
            omni_vision: false,
            movement_range: 1,
        }
    }
}

impl Capabilities {
    /// Sets whether left turns are allowed.
    #[must_use]
    pub const fn with_turn_left(mut self, enabled: bool) -> Self {
        self.can_turn_left = enabled;
        self
    }

    /// Sets whether right turns are allowed.
    #[must_use]
    pub const fn with_turn_right(mut self, enabled: bool) -> Self {
        self.can_turn_right = enabled;
        self
    }

    /// Sets whether sensing uses long-range vision.
    #[must_use]
    pub const fn with_long_range_vision(mut self, enabled: bool) -> Self {
        self.long_range_vision = enabled;
        self
    }

    /// Sets whether the omni-vision ability is available.
    #[must_use]
    pub const fn with_omni_vision(mut self, enabled: bool) -> Self {
        self.omni_vision = enabled;
        self
    }

    /// Sets the number of cells covered by a single advance.
    #[must_use]
    pub const fn with_movement_range(mut self, range: u32) -> Self {
        self.movement_range = range;
        self
    }

    /// Checks the invariants required before an agent can carry the set.
    pub fn validate(self) -> Result<Self, CapabilityError> {
        if self.movement_range == 0 {
            return Err(CapabilityError::ZeroMovementRange);
        }
        Ok(self)
    }
}

/// Reasons a capability set is refused at agent construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// An agent must be able to cover at least one cell per advance.
    #[error("movement range must be at least 1")]
    ZeroMovementRange,
}

/// Why an agent action had no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The first cell ahead is a wall, a mountain, or outside the grid.
    Blocked,
    /// The agent lacks the capability required by the action.
    MissingCapability,
    /// Omni-vision is missing, cooling down, or already active.
    OmniVisionUnavailable,
}

impl Rejection {
    /// Human readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Blocked => "blocked",
            Self::MissingCapability => "missing capability",
            Self::OmniVisionUnavailable => "omni-vision unavailable",
        }
    }
}

/// Result of an agent action as stored in its decision history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The agent moved and now occupies the provided state.
    Moved {
        /// State after the move.
        to: State,
    },
    /// The agent rotated in place.
    Turned {
        /// State after the rotation.
        to: State,
    },
    /// The agent sensed its surroundings.
    Sensed {
        /// Whether the cell directly ahead can be entered.
        ahead_clear: bool,
    },
    /// The agent activated omni-vision and swept all four directions.
    OmniVisionSwept {
        /// Whether the cell directly ahead can be entered.
        ahead_clear: bool,
    },
    /// The action was refused and nothing changed.
    Rejected(Rejection),
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Moved { to } => write!(f, "moved to {to}"),
            Self::Turned { to } => write!(f, "turned to {}", to.facing.label()),
            Self::Sensed { ahead_clear } => {
                write!(f, "sensed, ahead {}", clear_label(*ahead_clear))
            }
            Self::OmniVisionSwept { ahead_clear } => {
                write!(f, "omni-vision sweep, ahead {}", clear_label(*ahead_clear))
            }
            Self::Rejected(reason) => write!(f, "rejected ({})", reason.label()),
        }
    }
}

fn clear_label(clear: bool) -> &'static str {
    if clear {
        "clear"
    } else {
        "blocked"
    }
}

/// One entry in an agent's append-only decision history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DecisionRecord {
    /// State the agent was in when the action was chosen.
    pub before: State,
    /// Action the agent attempted.
    pub action: Action,
    /// What the action produced.
    pub outcome: Outcome,
}

impl DecisionRecord {
    /// Creates a new decision record.
    #[must_use]
    pub const fn new(before: State, action: Action, outcome: Outcome) -> Self {
        Self {
            before,
            action,
            outcome,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the agent move forward.
    Advance,
    /// Requests a counter-clockwise quarter turn.
    TurnLeft,
    /// Requests a clockwise quarter turn.
    TurnRight,
    /// Requests a sense of the agent's surroundings.
    Sense,
    /// Requests activation of the omni-vision ability.
    ActivateOmniVision,
    /// Closes the current simulation turn, advancing ability cooldowns.
    EndTurn,
    /// Discards the episode and restores the starting state.
    Reset,
}

impl Command {
    /// Agent action carried by the command, if any.
    #[must_use]
    pub const fn action(self) -> Option<Action> {
        match self {
            Self::Advance => Some(Action::Advance),
            Self::TurnLeft => Some(Action::TurnLeft),
            Self::TurnRight => Some(Action::TurnRight),
            Self::Sense => Some(Action::Sense),
            Self::ActivateOmniVision => Some(Action::ActivateOmniVision),
            Self::EndTurn | Self::Reset => None,
        }
    }
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the agent moved between two states.
    AgentAdvanced {
        /// State before moving.
        from: State,
        /// State after moving.
        to: State,
    },
    /// Confirms that the agent rotated in place.
    AgentTurned {
        /// State before the turn.
        from: State,
        /// State after the turn.
        to: State,
    },
    /// Reports the cells that became visible during an action.
    CellsRevealed {
        /// Cells revealed for the first time, in reveal order.
        cells: Vec<Position>,
        /// Whether the cell directly ahead can be entered.
        ahead_clear: bool,
    },
    /// Reports that an agent action was refused.
    ActionRejected {
        /// Action that was attempted.
        action: Action,
        /// Reason the action failed.
        reason: Rejection,
    },
    /// Confirms that omni-vision was activated.
    OmniVisionActivated,
    /// Reports the omni-vision cooldown after a turn closed.
    CooldownAdvanced {
        /// Turns left before omni-vision can be activated again.
        remaining: u32,
    },
    /// Announces that the agent stopped on a goal cell.
    GoalReached {
        /// Goal cell the agent occupies.
        position: Position,
    },
    /// Announces that the episode was reset to its starting state.
    EpisodeReset,
}

#[cfg(test)]
mod tests {
    use super::{Capabilities, CapabilityError, Direction, Position, State, TerrainCode};

    #[test]
    fn terrain_codes_round_trip_through_numeric_form() {
        for terrain in TerrainCode::ALL {
            assert_eq!(TerrainCode::from_code(terrain.code()), Some(terrain));
        }
        assert_eq!(TerrainCode::from_code(6), None);
    }

    #[test]
    fn only_walls_and_mountains_block() {
        let blocking: Vec<_> = TerrainCode::ALL
            .into_iter()
            .filter(|terrain| !terrain.is_passable())
            .collect();
        assert_eq!(blocking, vec![TerrainCode::Wall, TerrainCode::Mountain]);
    }

    #[test]
    fn four_left_turns_restore_facing() {
        for direction in Direction::ALL {
            let turned = direction
                .turned_left()
                .turned_left()
                .turned_left()
                .turned_left();
            assert_eq!(turned, direction);
        }
    }

    #[test]
    fn four_right_turns_restore_facing() {
        for direction in Direction::ALL {
            let turned = direction
                .turned_right()
                .turned_right()
                .turned_right()
                .turned_right();
            assert_eq!(turned, direction);
        }
    }

    #[test]
    fn left_turn_cycle_matches_expected_order() {
        assert_eq!(Direction::Up.turned_left(), Direction::Left);
        assert_eq!(Direction::Left.turned_left(), Direction::Down);
        assert_eq!(Direction::Down.turned_left(), Direction::Right);
        assert_eq!(Direction::Right.turned_left(), Direction::Up);
    }

    #[test]
    fn step_rejects_underflow() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.step(Direction::Up), None);
        assert_eq!(origin.step(Direction::Left), None);
        assert_eq!(origin.step(Direction::Down), Some(Position::new(1, 0)));
        assert_eq!(origin.step(Direction::Right), Some(Position::new(0, 1)));
    }

    #[test]
    fn state_ahead_follows_facing() {
        let state = State::new(Position::new(2, 2), Direction::Left);
        assert_eq!(state.ahead(), Some(Position::new(2, 1)));
    }

    #[test]
    fn capabilities_default_to_single_step_turning_agent() {
        let capabilities = Capabilities::default();
        assert!(capabilities.can_turn_left);
        assert!(capabilities.can_turn_right);
        assert!(!capabilities.long_range_vision);
        assert!(!capabilities.omni_vision);
        assert_eq!(capabilities.movement_range, 1);
    }

    #[test]
    fn zero_movement_range_is_rejected() {
        let result = Capabilities::default().with_movement_range(0).validate();
        assert_eq!(result, Err(CapabilityError::ZeroMovementRange));
    }

    #[test]
    fn capabilities_round_trip_through_bincode() {
        let capabilities = Capabilities::default()
            .with_turn_left(false)
            .with_omni_vision(true)
            .with_movement_range(3);
        let bytes = bincode::serialize(&capabilities).expect("serialize");
        let restored: Capabilities = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, capabilities);
    }
}
