#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Explorer adapters.
//!
//! The simulation never talks to a window directly. Adapters describe what
//! should be drawn with a [`Scene`], hand it to a [`RenderingBackend`], and
//! receive a [`FrameInput`] each frame that maps to at most one world
//! [`Command`].

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_explorer_core::{Command, Direction, Grid, Position, TerrainCode};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Color drawn over cells that have not been revealed.
pub const FOG_COLOR: Color = Color::from_rgb_u8(0x1c, 0x1c, 0x24);
/// Color of the agent marker.
pub const AGENT_COLOR: Color = Color::from_rgb_u8(0xd0, 0x20, 0x20);
/// Color of goal markers.
pub const GOAL_COLOR: Color = Color::from_rgb_u8(0xff, 0x8c, 0x00);
/// Color of search path markers.
pub const PATH_COLOR: Color = Color::from_rgb_u8(0xe5, 0x39, 0x35);
/// Color of grid lines.
pub const LINE_COLOR: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);

/// Fill color for a terrain code.
#[must_use]
pub const fn terrain_color(terrain: TerrainCode) -> Color {
    match terrain {
        TerrainCode::Wall => Color::from_rgb_u8(0x00, 0x00, 0x00),
        TerrainCode::Floor => Color::from_rgb_u8(0xff, 0xff, 0xff),
        TerrainCode::Water => Color::from_rgb_u8(0x1e, 0x64, 0xdc),
        TerrainCode::Sand => Color::from_rgb_u8(0xf0, 0xdc, 0x3c),
        TerrainCode::Forest => Color::from_rgb_u8(0x2e, 0x8b, 0x2e),
        TerrainCode::Mountain => Color::from_rgb_u8(0x80, 0x80, 0x80),
    }
}

/// Single character used by the text renderer for a terrain code.
#[must_use]
pub const fn terrain_glyph(terrain: TerrainCode) -> char {
    match terrain {
        TerrainCode::Wall => '#',
        TerrainCode::Floor => '.',
        TerrainCode::Water => '~',
        TerrainCode::Sand => ':',
        TerrainCode::Forest => 'T',
        TerrainCode::Mountain => 'M',
    }
}

/// Glyph used for hidden cells.
pub const FOG_GLYPH: char = '?';
/// Glyph used for goal cells.
pub const GOAL_GLYPH: char = 'G';
/// Glyph used for search path cells.
pub const PATH_GLYPH: char = '*';

/// Glyph used for the agent facing `direction`.
#[must_use]
pub const fn agent_glyph(direction: Direction) -> char {
    match direction {
        Direction::Up => '^',
        Direction::Down => 'v',
        Direction::Left => '<',
        Direction::Right => '>',
    }
}

/// Unit vector in screen space (y grows downward) for a facing.
#[must_use]
pub fn facing_vector(direction: Direction) -> Vec2 {
    match direction {
        Direction::Up => Vec2::new(0.0, -1.0),
        Direction::Down => Vec2::new(0.0, 1.0),
        Direction::Left => Vec2::new(-1.0, 0.0),
        Direction::Right => Vec2::new(1.0, 0.0),
    }
}

/// Presentation data for one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPresentation {
    /// Terrain stored in the cell.
    pub terrain: TerrainCode,
    /// Whether the cell has been revealed to the player.
    pub revealed: bool,
}

/// Grid of cells that can be rendered by adapters.
#[derive(Clone, Debug, PartialEq)]
pub struct GridPresentation {
    /// Number of rows in the grid.
    pub rows: u32,
    /// Number of columns in the grid.
    pub columns: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
    /// Cells in row-major order.
    pub cells: Vec<CellPresentation>,
}

impl GridPresentation {
    /// Captures the grid, asking `is_revealed` for the fog state of every cell.
    ///
    /// Returns an error when `cell_length` is not positive.
    pub fn from_grid<F>(grid: &Grid, cell_length: f32, is_revealed: F) -> Result<Self, RenderingError>
    where
        F: Fn(Position) -> bool,
    {
        if cell_length <= 0.0 || !cell_length.is_finite() {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        let cells = grid
            .iter()
            .map(|(position, terrain)| CellPresentation {
                terrain,
                revealed: is_revealed(position),
            })
            .collect();

        Ok(Self {
            rows: grid.rows(),
            columns: grid.columns(),
            cell_length,
            cells,
        })
    }

    /// Cell at the position, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, position: Position) -> Option<CellPresentation> {
        if position.row() >= self.rows || position.column() >= self.columns {
            return None;
        }
        let index = usize::try_from(position.row()).ok()? * usize::try_from(self.columns).ok()?
            + usize::try_from(position.column()).ok()?;
        self.cells.get(index).copied()
    }

    /// Iterates over cells with their positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellPresentation)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().filter_map(move |(index, cell)| {
            let index = u32::try_from(index).ok()?;
            Some((Position::new(index / columns, index % columns), *cell))
        })
    }

    /// Total width of the grid in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Total height of the grid in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// World-space centre of the cell.
    #[must_use]
    pub fn cell_center(&self, position: Position) -> Vec2 {
        Vec2::new(
            (position.column() as f32 + 0.5) * self.cell_length,
            (position.row() as f32 + 0.5) * self.cell_length,
        )
    }
}

/// Agent marker drawn on top of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentPresentation {
    /// Cell occupied by the agent.
    pub position: Position,
    /// Direction the agent faces.
    pub facing: Direction,
}

/// Scene description combining the grid, the agent, goals, and status text.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Terrain and fog state.
    pub grid: GridPresentation,
    /// Agent marker, absent for path-only scenes.
    pub agent: Option<AgentPresentation>,
    /// Goal cells. Goals are always drawn, even under fog.
    pub goals: Vec<Position>,
    /// Cells of a search path, drawn in order.
    pub path: Vec<Position>,
    /// Lines of status text shown beside the grid.
    pub status: Vec<String>,
}

impl Scene {
    /// Creates a scene without agent, goals, path, or status.
    #[must_use]
    pub fn new(grid: GridPresentation) -> Self {
        Self {
            grid,
            agent: None,
            goals: Vec::new(),
            path: Vec::new(),
            status: Vec::new(),
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Move forward.
    pub advance: bool,
    /// Turn counter-clockwise.
    pub turn_left: bool,
    /// Turn clockwise.
    pub turn_right: bool,
    /// Sense surroundings.
    pub sense: bool,
    /// Activate omni-vision.
    pub omni_vision: bool,
    /// Reset the episode.
    pub reset: bool,
    /// Print the decision history.
    pub show_history: bool,
    /// End the session.
    pub quit: bool,
}

impl FrameInput {
    /// Translates the input into at most one world command.
    ///
    /// Precedence when several inputs arrive in one frame: reset,
    /// omni-vision, sense, turn left, turn right, advance.
    #[must_use]
    pub const fn command(&self) -> Option<Command> {
        if self.reset {
            Some(Command::Reset)
        } else if self.omni_vision {
            Some(Command::ActivateOmniVision)
        } else if self.sense {
            Some(Command::Sense)
        } else if self.turn_left {
            Some(Command::TurnLeft)
        } else if self.turn_right {
            Some(Command::TurnRight)
        } else if self.advance {
            Some(Command::Advance)
        } else {
            None
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Explorer scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the input captured for the
    /// frame and may mutate the scene before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static;
}

/// Renders the scene as text, one line per grid row followed by status lines.
#[must_use]
pub fn render_text(scene: &Scene) -> String {
    let mut output = String::new();
    for row in 0..scene.grid.rows {
        for column in 0..scene.grid.columns {
            let position = Position::new(row, column);
            output.push(glyph_at(scene, position));
        }
        output.push('\n');
    }
    for line in &scene.status {
        output.push_str(line);
        output.push('\n');
    }
    output
}

fn glyph_at(scene: &Scene, position: Position) -> char {
    if let Some(agent) = scene.agent.as_ref().filter(|agent| agent.position == position) {
        return agent_glyph(agent.facing);
    }
    if scene.goals.contains(&position) {
        return GOAL_GLYPH;
    }
    if scene.path.contains(&position) {
        return PATH_GLYPH;
    }
    match scene.grid.cell(position) {
        Some(cell) if cell.revealed => terrain_glyph(cell.terrain),
        _ => FOG_GLYPH,
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Cells must have a positive, finite size.
    #[error("cell_length must be positive (received {cell_length})")]
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid() -> Grid {
        Grid::parse("0,1,2\n3,4,5").expect("valid grid")
    }

    #[test]
    fn grid_presentation_rejects_non_positive_cell_length() {
        let error = GridPresentation::from_grid(&small_grid(), 0.0, |_| true)
            .expect_err("zero cell length must be rejected");

        assert!(matches!(
            error,
            RenderingError::InvalidCellLength { cell_length } if cell_length == 0.0
        ));
    }

    #[test]
    fn grid_presentation_captures_fog_state() {
        let revealed = Position::new(1, 2);
        let presentation =
            GridPresentation::from_grid(&small_grid(), 32.0, |position| position == revealed)
                .expect("valid grid");

        assert_eq!(
            presentation.cell(revealed),
            Some(CellPresentation {
                terrain: TerrainCode::Mountain,
                revealed: true,
            })
        );
        assert_eq!(
            presentation.cell(Position::new(0, 0)).map(|cell| cell.revealed),
            Some(false)
        );
        assert_eq!(presentation.cell(Position::new(2, 0)), None);
        assert_eq!(presentation.width(), 96.0);
        assert_eq!(presentation.height(), 64.0);
    }

    #[test]
    fn cell_center_is_offset_by_half_a_cell() {
        let presentation =
            GridPresentation::from_grid(&small_grid(), 10.0, |_| true).expect("valid grid");

        assert_eq!(
            presentation.cell_center(Position::new(1, 2)),
            Vec2::new(25.0, 15.0)
        );
    }

    #[test]
    fn render_text_draws_fog_agent_and_goal() {
        let grid = GridPresentation::from_grid(&small_grid(), 1.0, |position| position.row() == 1)
            .expect("valid grid");
        let mut scene = Scene::new(grid);
        scene.agent = Some(AgentPresentation {
            position: Position::new(1, 0),
            facing: Direction::Up,
        });
        scene.goals.push(Position::new(0, 2));
        scene.status.push("turn 0".to_owned());

        assert_eq!(render_text(&scene), "??G\n^TM\nturn 0\n");
    }

    #[test]
    fn render_text_marks_path_cells() {
        let grid = GridPresentation::from_grid(&small_grid(), 1.0, |_| true).expect("valid grid");
        let mut scene = Scene::new(grid);
        scene.path = vec![Position::new(0, 1), Position::new(0, 2)];

        assert_eq!(render_text(&scene), "#**\n:TM\n");
    }

    #[test]
    fn frame_input_maps_to_single_command() {
        assert_eq!(FrameInput::default().command(), None);
        assert_eq!(
            FrameInput {
                advance: true,
                turn_left: true,
                ..FrameInput::default()
            }
            .command(),
            Some(Command::TurnLeft)
        );
        assert_eq!(
            FrameInput {
                advance: true,
                reset: true,
                ..FrameInput::default()
            }
            .command(),
            Some(Command::Reset)
        );
        assert_eq!(
            FrameInput {
                show_history: true,
                quit: true,
                ..FrameInput::default()
            }
            .command(),
            None
        );
    }

    #[test]
    fn terrain_palette_matches_legend() {
        assert_eq!(terrain_color(TerrainCode::Wall), Color::from_rgb_u8(0, 0, 0));
        assert_eq!(
            terrain_color(TerrainCode::Floor),
            Color::from_rgb_u8(255, 255, 255)
        );
        assert_eq!(facing_vector(Direction::Up), Vec2::new(0.0, -1.0));
    }
}
