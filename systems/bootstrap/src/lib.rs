#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Maze Explorer episode.
//!
//! Provides the preset agents offered to players, the built-in maze used when
//! no maze file can be read, and the checks applied to start and goal cells.

use std::{fmt, path::Path, sync::Arc};

use maze_explorer_core::{
    Capabilities, CapabilityError, Direction, Grid, GridError, Position, State, TerrainCode,
};
use maze_explorer_world::{query, Agent, World};
use thiserror::Error;
use tracing::{info, warn};

/// Facing given to the agent when an episode starts.
pub const START_FACING: Direction = Direction::Right;

const FALLBACK_MAZE: &str = "\
0,0,0,0,0,0,0,0,0,0
0,1,1,1,0,1,1,1,1,0
0,1,0,1,0,1,5,5,1,0
0,1,0,1,1,1,0,1,1,0
0,2,0,0,0,3,0,1,0,0
0,2,2,1,0,3,3,1,4,0
0,0,0,1,0,0,0,0,4,0
0,1,1,1,1,1,4,4,4,0
0,1,5,5,0,3,0,0,1,0
0,0,0,0,0,0,0,0,0,0";

/// Preset capability configurations a player can choose from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AgentPreset {
    /// Turns both ways, sees one cell, moves one cell.
    Walker,
    /// Turns both ways and sees three cells ahead.
    Scout,
    /// Turns right only and covers two cells per advance.
    Sprinter,
    /// Turns both ways and can sweep all directions with omni-vision.
    Seer,
}

impl AgentPreset {
    /// Every preset in menu order.
    pub const ALL: [AgentPreset; 4] = [Self::Walker, Self::Scout, Self::Sprinter, Self::Seer];

    /// Resolves a menu entry (`"1"`..`"4"`) or a preset name, ignoring case.
    #[must_use]
    pub fn from_choice(choice: &str) -> Option<Self> {
        let choice = choice.trim();
        Self::ALL.into_iter().enumerate().find_map(|(index, preset)| {
            let matches_number = choice.parse::<usize>().ok() == Some(index + 1);
            let matches_name = choice.eq_ignore_ascii_case(preset.name());
            (matches_number || matches_name).then_some(preset)
        })
    }

    /// Display name of the preset.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Walker => "walker",
            Self::Scout => "scout",
            Self::Sprinter => "sprinter",
            Self::Seer => "seer",
        }
    }

    /// Capability set granted by the preset.
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        let base = Capabilities {
            can_turn_left: true,
            can_turn_right: true,
            long_range_vision: false,
            omni_vision: false,
            movement_range: 1,
        };
        match self {
            Self::Walker => base,
            Self::Scout => base.with_long_range_vision(true),
            Self::Sprinter => base.with_turn_left(false).with_movement_range(2),
            Self::Seer => base.with_omni_vision(true),
        }
    }

    /// One-line summary suitable for a selection menu.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::Walker => "turns both ways, sees one cell ahead",
            Self::Scout => "long-range vision, sees three cells ahead",
            Self::Sprinter => "right turns only, advances two cells",
            Self::Seer => "omni-vision sweep every five turns",
        }
    }
}

impl fmt::Display for AgentPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Built-in maze used when no maze file can be loaded.
#[must_use]
pub fn fallback_grid() -> Grid {
    Grid::parse(FALLBACK_MAZE).expect("embedded maze always parses")
}

/// Reads and parses a maze file.
pub fn load_grid(path: &Path) -> Result<Grid, LoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let grid = Grid::parse(&contents).map_err(|source| LoadError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    info!(
        path = %path.display(),
        rows = grid.rows(),
        columns = grid.columns(),
        "maze loaded"
    );
    Ok(grid)
}

/// Reads a maze file, falling back to the built-in maze on any failure.
#[must_use]
pub fn load_grid_or_fallback(path: &Path) -> Grid {
    load_grid(path).unwrap_or_else(|error| {
        warn!(%error, "using built-in maze");
        fallback_grid()
    })
}

/// Accepts a start or goal cell only if it is inside the grid and not a wall.
pub fn validate_endpoint(grid: &Grid, position: Position) -> Result<Position, EndpointError> {
    match grid.terrain(position) {
        None => Err(EndpointError::OutOfBounds {
            position,
            rows: grid.rows(),
            columns: grid.columns(),
        }),
        Some(TerrainCode::Wall) => Err(EndpointError::Wall { position }),
        Some(_) => Ok(position),
    }
}

/// Errors raised while loading a maze file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("could not read maze file {path}")]
    Io {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file contents are not a valid maze.
    #[error("maze file {path} is malformed")]
    Parse {
        /// Path that was requested.
        path: String,
        /// Underlying parse failure.
        #[source]
        source: GridError,
    },
}

/// Reasons a start or goal cell is refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// The cell lies outside the maze.
    #[error("{position} is outside the {rows}x{columns} maze")]
    OutOfBounds {
        /// Requested cell.
        position: Position,
        /// Row count of the maze.
        rows: u32,
        /// Column count of the maze.
        columns: u32,
    },
    /// The cell is a wall.
    #[error("{position} is a wall")]
    Wall {
        /// Requested cell.
        position: Position,
    },
}

/// Assembles worlds and greeting data for adapters.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Builds an episode for the given agent, start, and goal.
    pub fn world(
        &self,
        grid: Arc<Grid>,
        name: &str,
        capabilities: Capabilities,
        start: Position,
        goal: Position,
    ) -> Result<World, CapabilityError> {
        let agent = Agent::new(name, capabilities)?;
        Ok(World::new(
            grid,
            agent,
            State::new(start, START_FACING),
            [goal],
        ))
    }
}
