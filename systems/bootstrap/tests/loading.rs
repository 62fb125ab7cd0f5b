use std::{fs, path::PathBuf, sync::Arc};

use maze_explorer_core::{Command, Event, Position};
use maze_explorer_system_bootstrap::{
    fallback_grid, load_grid, load_grid_or_fallback, AgentPreset, Bootstrap, LoadError,
};
use maze_explorer_world::{self as world, query};

fn scratch_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "maze-explorer-bootstrap-{}-{name}",
        std::process::id()
    ));
    fs::write(&path, contents).expect("write scratch maze");
    path
}

#[test]
fn load_grid_reads_comma_separated_maze() {
    let path = scratch_file("valid.txt", "0,0,0\n0,1,0\n0,0,0\n");

    let grid = load_grid(&path).expect("valid maze file");

    assert_eq!((grid.rows(), grid.columns()), (3, 3));
    assert!(grid.is_passable(Position::new(1, 1)));
    let _ = fs::remove_file(path);
}

#[test]
fn load_grid_propagates_parse_errors() {
    let path = scratch_file("ragged.txt", "1,1,1\n1,1\n");

    let error = load_grid(&path).expect_err("ragged maze must fail");

    assert!(matches!(error, LoadError::Parse { .. }));
    let _ = fs::remove_file(path);
}

#[test]
fn load_grid_propagates_missing_file() {
    let path = std::env::temp_dir().join("maze-explorer-bootstrap-does-not-exist.txt");

    let error = load_grid(&path).expect_err("missing file must fail");

    assert!(matches!(error, LoadError::Io { .. }));
}

#[test]
fn malformed_file_falls_back_to_built_in_maze() {
    let path = scratch_file("malformed.txt", "1,x,1\n");

    let grid = load_grid_or_fallback(&path);

    assert_eq!(grid, fallback_grid());
    let _ = fs::remove_file(path);
}

#[test]
fn bootstrap_builds_playable_world_from_preset() {
    let bootstrap = Bootstrap;
    let preset = AgentPreset::Sprinter;
    let mut world = bootstrap
        .world(
            Arc::new(fallback_grid()),
            preset.name(),
            preset.capabilities(),
            Position::new(1, 1),
            Position::new(8, 8),
        )
        .expect("preset capabilities are valid");
    let mut events = Vec::new();

    world::apply(&mut world, Command::Advance, &mut events);

    assert_eq!(query::agent(&world).name(), "sprinter");
    assert_eq!(query::state(&world).position, Position::new(1, 3));
    assert!(matches!(events[0], Event::AgentAdvanced { .. }));
    assert_eq!(bootstrap.welcome_banner(&world), "Welcome to Maze Explorer.");
}
