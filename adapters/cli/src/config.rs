//! Optional TOML configuration for the `play` command.
//!
//! ```toml
//! maze = "map.txt"
//! agent = "scout"
//! start = [1, 1]
//! goal = [8, 8]
//!
//! [capabilities]
//! movement_range = 2
//! ```
//!
//! A `[capabilities]` table replaces the preset entirely; omitted keys take
//! the default capability values.

use std::path::{Path, PathBuf};

use maze_explorer_core::{Capabilities, Position};
use serde::Deserialize;
use thiserror::Error;

/// Values read from a configuration file. Every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlayConfig {
    pub(crate) maze: Option<PathBuf>,
    pub(crate) agent: Option<String>,
    pub(crate) capabilities: Option<Capabilities>,
    start: Option<[u32; 2]>,
    goal: Option<[u32; 2]>,
}

impl PlayConfig {
    /// Reads and parses a configuration file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub(crate) fn start(&self) -> Option<Position> {
        self.start.map(|[row, column]| Position::new(row, column))
    }

    pub(crate) fn goal(&self) -> Option<Position> {
        self.goal.map(|[row, column]| Position::new(row, column))
    }
}

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("could not read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("config file {path} is malformed")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Parses a `ROW,COLUMN` pair as given on the command line.
pub(crate) fn parse_position(value: &str) -> Result<Position, String> {
    let (row, column) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COLUMN but found `{value}`"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid row `{}`: {error}", row.trim()))?;
    let column = column
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid column `{}`: {error}", column.trim()))?;
    Ok(Position::new(row, column))
}
