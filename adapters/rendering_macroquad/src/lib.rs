#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed window for Maze Explorer.
//!
//! The explorer plays no sound, so macroquad is built without its `audio`
//! feature.

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    color::BLACK,
    input::{is_key_pressed, KeyCode},
    math::Vec2 as MacroquadVec2,
};
use maze_explorer_core::Position;
use maze_explorer_rendering::{
    facing_vector, terrain_color, Color, FrameInput, Presentation, RenderingBackend, Scene,
    AGENT_COLOR, FOG_COLOR, GOAL_COLOR, LINE_COLOR, PATH_COLOR,
};

const STATUS_FONT_SIZE: f32 = 22.0;
const STATUS_LINE_HEIGHT: f32 = 26.0;
const MARGIN: f32 = 16.0;

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Up` or `W` advances.
    advance: bool,
    /// `Left` or `A` turns left.
    turn_left: bool,
    /// `Right` or `D` turns right.
    turn_right: bool,
    /// `Space` or `S` senses ahead.
    sense: bool,
    /// `O` activates omni-vision.
    omni_vision: bool,
    /// `R` restarts the episode.
    reset: bool,
    /// `H` prints the decision history.
    show_history: bool,
    /// `Q` or `Escape` quits the loop.
    quit_requested: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            advance: is_key_pressed(KeyCode::Up) || is_key_pressed(KeyCode::W),
            turn_left: is_key_pressed(KeyCode::Left) || is_key_pressed(KeyCode::A),
            turn_right: is_key_pressed(KeyCode::Right) || is_key_pressed(KeyCode::D),
            sense: is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::S),
            omni_vision: is_key_pressed(KeyCode::O),
            reset: is_key_pressed(KeyCode::R),
            show_history: is_key_pressed(KeyCode::H),
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
        }
    }

    const fn frame_input(self) -> FrameInput {
        FrameInput {
            advance: self.advance,
            turn_left: self.turn_left,
            turn_right: self.turn_right,
            sense: self.sense,
            omni_vision: self.omni_vision,
            reset: self.reset,
            show_history: self.show_history,
            quit: self.quit_requested,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 800,
            window_height: 900,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = self.swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);

            loop {
                let keyboard = KeyboardShortcuts::poll();
                let frame_input = keyboard.frame_input();

                update_scene(frame_input, &mut scene);
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let metrics = SceneMetrics::from_scene(
                    &scene,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_cells(&scene, &metrics);
                draw_markers(&scene.path, PATH_COLOR, 0.2, &metrics);
                draw_markers(&scene.goals, GOAL_COLOR, 0.3, &metrics);
                draw_agent(&scene, &metrics);
                draw_status(&scene.status, &metrics);

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Screen-space placement of the maze, scaled to fit above the status panel.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    offset_x: f32,
    offset_y: f32,
    cell_step: f32,
    status_top: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let status_height = scene.status.len() as f32 * STATUS_LINE_HEIGHT;
        let available_width = (screen_width - 2.0 * MARGIN).max(0.0);
        let available_height = (screen_height - 3.0 * MARGIN - status_height).max(0.0);

        let world_width = scene.grid.width();
        let world_height = scene.grid.height();
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            0.0
        } else {
            (available_width / world_width).min(available_height / world_height)
        };

        let scaled_width = world_width * scale;
        let scaled_height = world_height * scale;
        let offset_x = MARGIN + (available_width - scaled_width) * 0.5;
        let offset_y = MARGIN;

        Self {
            offset_x,
            offset_y,
            cell_step: scene.grid.cell_length * scale,
            status_top: offset_y + scaled_height + MARGIN,
        }
    }

    fn cell_origin(&self, position: Position) -> Vec2 {
        Vec2::new(
            self.offset_x + position.column() as f32 * self.cell_step,
            self.offset_y + position.row() as f32 * self.cell_step,
        )
    }

    fn cell_center(&self, position: Position) -> Vec2 {
        self.cell_origin(position) + Vec2::splat(self.cell_step * 0.5)
    }
}

fn draw_cells(scene: &Scene, metrics: &SceneMetrics) {
    if metrics.cell_step <= f32::EPSILON {
        return;
    }

    let outline = to_macroquad_color(LINE_COLOR);
    let thickness = (metrics.cell_step * 0.04).max(1.0);
    for (position, cell) in scene.grid.iter() {
        let origin = metrics.cell_origin(position);
        let fill = if cell.revealed {
            terrain_color(cell.terrain)
        } else {
            FOG_COLOR
        };
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            metrics.cell_step,
            metrics.cell_step,
            to_macroquad_color(fill),
        );
        macroquad::shapes::draw_rectangle_lines(
            origin.x,
            origin.y,
            metrics.cell_step,
            metrics.cell_step,
            thickness,
            outline,
        );
    }
}

fn draw_markers(positions: &[Position], color: Color, radius_ratio: f32, metrics: &SceneMetrics) {
    if metrics.cell_step <= f32::EPSILON {
        return;
    }

    let fill = to_macroquad_color(color);
    let radius = metrics.cell_step * radius_ratio;
    for &position in positions {
        let center = metrics.cell_center(position);
        macroquad::shapes::draw_circle(center.x, center.y, radius, fill);
    }
}

fn draw_agent(scene: &Scene, metrics: &SceneMetrics) {
    let Some(agent) = scene.agent else {
        return;
    };
    if metrics.cell_step <= f32::EPSILON {
        return;
    }

    let [tip, left, right] = agent_triangle(
        metrics.cell_center(agent.position),
        facing_vector(agent.facing),
        metrics.cell_step,
    );
    macroquad::shapes::draw_triangle(
        MacroquadVec2::new(tip.x, tip.y),
        MacroquadVec2::new(left.x, left.y),
        MacroquadVec2::new(right.x, right.y),
        to_macroquad_color(AGENT_COLOR),
    );
    macroquad::shapes::draw_triangle_lines(
        MacroquadVec2::new(tip.x, tip.y),
        MacroquadVec2::new(left.x, left.y),
        MacroquadVec2::new(right.x, right.y),
        (metrics.cell_step * 0.05).max(1.0),
        BLACK,
    );
}

/// Vertices of the agent marker: the tip points along `direction`.
fn agent_triangle(center: Vec2, direction: Vec2, cell_step: f32) -> [Vec2; 3] {
    let half = cell_step * 0.35;
    let perpendicular = Vec2::new(-direction.y, direction.x);
    let tip = center + direction * half;
    let back = center - direction * half;
    [tip, back + perpendicular * half, back - perpendicular * half]
}

fn draw_status(lines: &[String], metrics: &SceneMetrics) {
    let color = to_macroquad_color(Color::from_rgb_u8(0xf0, 0xf0, 0xf0));
    for (index, line) in lines.iter().enumerate() {
        let baseline = metrics.status_top + (index as f32 + 1.0) * STATUS_LINE_HEIGHT;
        let _ = macroquad::text::draw_text(line, MARGIN, baseline, STATUS_FONT_SIZE, color);
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
