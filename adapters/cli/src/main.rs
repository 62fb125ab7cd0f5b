#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Explorer experience.

mod config;
mod logging;
mod prompt;
mod session;
mod terminal;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use maze_explorer_core::{Capabilities, Grid, Position};
use maze_explorer_rendering::{
    render_text, Color, GridPresentation, Presentation, RenderingBackend, Scene,
};
use maze_explorer_rendering_macroquad::MacroquadBackend;
use maze_explorer_system_bootstrap::{
    load_grid, load_grid_or_fallback, validate_endpoint, AgentPreset, Bootstrap,
};
use maze_explorer_system_search::{depth_first_search, PathNode, Problem, SEARCH_ACTIONS};
use maze_explorer_world::World;
use tracing::info;

use self::{
    config::{parse_position, PlayConfig},
    prompt::Prompter,
    session::{goal_reached, Session, CELL_LENGTH},
};

const DEFAULT_MAZE: &str = "map.txt";
const WINDOW_TITLE: &str = "Maze Explorer";
const BACKGROUND: Color = Color::from_rgb_u8(0x10, 0x10, 0x14);

#[derive(Debug, Parser)]
#[command(
    name = "maze-explorer",
    version,
    about = "Find paths through mazes or explore them under fog of war"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Runs a depth-first search from start to goal and prints the path.
    Pathfind(PathfindArgs),
    /// Explores a maze with a capability-limited agent.
    Play(PlayArgs),
}

#[derive(Debug, Args)]
struct PathfindArgs {
    /// Maze file: comma-separated terrain codes, one row per line.
    #[arg(long, default_value = DEFAULT_MAZE)]
    maze: PathBuf,
    /// Start cell; prompted for when omitted.
    #[arg(long, value_name = "ROW,COLUMN", value_parser = parse_position)]
    start: Option<Position>,
    /// Goal cell; prompted for when omitted.
    #[arg(long, value_name = "ROW,COLUMN", value_parser = parse_position)]
    goal: Option<Position>,
}

#[derive(Debug, Args)]
struct PlayArgs {
    /// Maze file; the built-in maze is used when it cannot be read.
    #[arg(long)]
    maze: Option<PathBuf>,
    /// TOML file with defaults for any of these options.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Agent preset, by menu number or name.
    #[arg(long, value_name = "CHOICE")]
    agent: Option<String>,
    /// Start cell; prompted for when omitted.
    #[arg(long, value_name = "ROW,COLUMN", value_parser = parse_position)]
    start: Option<Position>,
    /// Goal cell; prompted for when omitted.
    #[arg(long, value_name = "ROW,COLUMN", value_parser = parse_position)]
    goal: Option<Position>,
    /// Play in the terminal instead of opening a window.
    #[arg(long)]
    terminal: bool,
    /// Render as fast as possible instead of waiting for the display refresh.
    #[arg(long)]
    no_vsync: bool,
}

/// Entry point for the Maze Explorer command-line interface.
fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Pathfind(args) => {
            let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
            pathfind(&args, &mut prompter)
        }
        Commands::Play(args) => play(args),
    }
}

fn pathfind<R: BufRead, W: Write>(
    args: &PathfindArgs,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    let grid = load_grid(&args.maze)?;

    let start = match args.start {
        Some(start) => validate_endpoint(&grid, start).context("invalid --start")?,
        None => prompter.endpoint(&grid, "Start")?,
    };
    let goal = match args.goal {
        Some(goal) => validate_endpoint(&grid, goal).context("invalid --goal")?,
        None => prompter.endpoint(&grid, "Goal")?,
    };

    let problem = Problem::new(start, vec![goal], &grid);
    info!(%problem, "searching");
    let path = depth_first_search(&problem, &SEARCH_ACTIONS);

    match &path {
        Some(path) => {
            prompter.say("Path found:")?;
            for line in describe_path(path) {
                prompter.say(&line)?;
            }
        }
        None => prompter.say("No path to the goal was found.")?,
    }

    let mut scene = Scene::new(GridPresentation::from_grid(&grid, CELL_LENGTH, |_| true)?);
    scene.goals = vec![goal];
    scene.path = path
        .unwrap_or_default()
        .into_iter()
        .map(|node| node.position)
        .collect();
    prompter.say(render_text(&scene).trim_end())
}

fn describe_path(path: &[PathNode]) -> Vec<String> {
    path.iter()
        .map(|node| {
            let action = node.action.map_or("None", |direction| direction.label());
            format!("State: {}, Action: {action}", node.position)
        })
        .collect()
}

fn play(args: PlayArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => PlayConfig::load(path)?,
        None => PlayConfig::default(),
    };
    let maze = args
        .maze
        .clone()
        .or_else(|| config.maze.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MAZE));
    let grid = Arc::new(load_grid_or_fallback(&maze));

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
    let world = prepare_world(&args, &config, grid, &mut prompter)?;
    let mut session = Session::new(world);
    prompter.say(Bootstrap.welcome_banner(session.world()))?;

    if args.terminal {
        let (input, output) = prompter.into_inner();
        return terminal::run(&mut session, input, output);
    }

    let presentation = Presentation::new(WINDOW_TITLE, BACKGROUND, session.scene()?);
    MacroquadBackend::new()
        .with_vsync(!args.no_vsync)
        .run(presentation, move |input, scene| {
            let events = session.step(input);
            if let Some(position) = goal_reached(events) {
                println!("Goal {position} reached!");
            }
            if input.show_history {
                println!("{}", session.history());
            }
            session.refresh_scene(scene);
        })
}

/// Resolves start, goal, and agent from flags, then the config file, then prompts.
fn prepare_world<R: BufRead, W: Write>(
    args: &PlayArgs,
    config: &PlayConfig,
    grid: Arc<Grid>,
    prompter: &mut Prompter<R, W>,
) -> Result<World> {
    let start = match args.start.or_else(|| config.start()) {
        Some(start) => validate_endpoint(&grid, start).context("invalid start")?,
        None => prompter.endpoint(&grid, "Start")?,
    };
    let goal = match args.goal.or_else(|| config.goal()) {
        Some(goal) => goal,
        None => prompter.position_within(&grid, "Goal")?,
    };
    let goal = validate_endpoint(&grid, goal).context("invalid goal")?;

    let (name, capabilities) = choose_agent(args.agent.as_deref(), config, prompter)?;
    let world = Bootstrap.world(grid, &name, capabilities, start, goal)?;
    Ok(world)
}

fn choose_agent<R: BufRead, W: Write>(
    choice: Option<&str>,
    config: &PlayConfig,
    prompter: &mut Prompter<R, W>,
) -> Result<(String, Capabilities)> {
    let preset = match choice.or(config.agent.as_deref()) {
        Some(choice) => Some(
            AgentPreset::from_choice(choice).ok_or_else(|| anyhow!("unknown agent `{choice}`"))?,
        ),
        None if config.capabilities.is_some() => None,
        None => Some(prompter.preset()?),
    };

    match (preset, config.capabilities) {
        (Some(preset), Some(capabilities)) => Ok((preset.name().to_owned(), capabilities)),
        (Some(preset), None) => Ok((preset.name().to_owned(), preset.capabilities())),
        (None, Some(capabilities)) => Ok(("custom".to_owned(), capabilities)),
        (None, None) => Err(anyhow!("no agent selected")),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use maze_explorer_core::Direction;
    use maze_explorer_world::query;

    use super::*;

    const TURN: &str = "\
0,0,0,0
0,1,1,0
0,0,1,0
0,0,0,0";

    fn scratch_maze(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "maze-explorer-cli-{}-{name}",
            std::process::id()
        ));
        std::fs::write(&path, contents).expect("write scratch maze");
        path
    }

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    fn output(prompter: Prompter<&[u8], Vec<u8>>) -> String {
        let (_, output) = prompter.into_inner();
        String::from_utf8(output).expect("utf-8 output")
    }

    fn play_args(arguments: &[&str]) -> PlayArgs {
        let cli = Cli::try_parse_from(
            ["maze-explorer", "play"]
                .iter()
                .chain(arguments.iter())
                .copied(),
        )
        .expect("valid arguments");
        match cli.command {
            Commands::Play(args) => args,
            Commands::Pathfind(_) => panic!("expected play"),
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn coordinates_parse_from_flags() {
        let args = play_args(&["--start", "1,2", "--goal", "3,4", "--terminal"]);

        assert_eq!(args.start, Some(Position::new(1, 2)));
        assert_eq!(args.goal, Some(Position::new(3, 4)));
        assert!(args.terminal);
        assert!(Cli::try_parse_from(["maze-explorer", "play", "--start", "1"]).is_err());
    }

    #[test]
    fn path_is_described_node_by_node() {
        let lines = describe_path(&[
            PathNode::new(Position::new(1, 1), None),
            PathNode::new(Position::new(1, 2), Some(Direction::Right)),
        ]);

        assert_eq!(
            lines,
            [
                "State: (1, 1), Action: None",
                "State: (1, 2), Action: right"
            ]
        );
    }

    #[test]
    fn pathfind_prompts_for_goal_and_prints_rendering() {
        let path = scratch_maze("turn.txt", TURN);
        let args = PathfindArgs {
            maze: path.clone(),
            start: Some(Position::new(1, 1)),
            goal: None,
        };
        let mut prompter = prompter("0\n0\n2\n2\n");

        pathfind(&args, &mut prompter).expect("path exists");

        let output = output(prompter);
        assert!(output.contains("(0, 0) is a wall, try again."));
        assert!(output.contains(
            "State: (1, 1), Action: None\nState: (1, 2), Action: right\nState: (2, 2), Action: down\n"
        ));
        assert!(output.ends_with("####\n#**#\n##G#\n####\n"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn pathfind_reports_missing_path() {
        let path = scratch_maze("split.txt", "1,0,1\n1,0,1");
        let args = PathfindArgs {
            maze: path.clone(),
            start: Some(Position::new(0, 0)),
            goal: Some(Position::new(1, 2)),
        };
        let mut prompter = prompter("");

        pathfind(&args, &mut prompter).expect("search runs");

        assert!(output(prompter).contains("No path to the goal was found."));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn pathfind_propagates_load_errors() {
        let args = PathfindArgs {
            maze: PathBuf::from("definitely/not/a/maze.txt"),
            start: None,
            goal: None,
        };

        assert!(pathfind(&args, &mut prompter("")).is_err());
    }

    #[test]
    fn wall_goal_ends_play_setup() {
        let grid = Arc::new(Grid::parse(TURN).expect("valid grid"));
        let args = play_args(&["--start", "1,1", "--agent", "1"]);
        let mut prompter = prompter("0\n3\n");

        let error = prepare_world(&args, &PlayConfig::default(), grid, &mut prompter)
            .expect_err("wall goal must fail");

        assert!(format!("{error:#}").contains("(0, 3) is a wall"));
    }

    #[test]
    fn flags_take_precedence_over_config() {
        let grid = Arc::new(Grid::parse(TURN).expect("valid grid"));
        let args = play_args(&["--start", "1,1", "--goal", "2,2", "--agent", "scout"]);
        let config = PlayConfig::default();
        let mut prompter = prompter("");

        let world = prepare_world(&args, &config, grid, &mut prompter).expect("valid setup");

        assert_eq!(query::agent(&world).name(), "scout");
        assert!(query::agent(&world).capabilities().long_range_vision);
        assert_eq!(query::start(&world).position, Position::new(1, 1));
    }

    #[test]
    fn config_capabilities_replace_preset() {
        let config = toml::from_str::<PlayConfig>("[capabilities]\nmovement_range = 2\n")
            .expect("valid config");
        let mut prompter = prompter("");

        let (name, capabilities) =
            choose_agent(None, &config, &mut prompter).expect("custom agent");

        assert_eq!(name, "custom");
        assert_eq!(capabilities.movement_range, 2);
        assert!(output(prompter).is_empty(), "no menu when capabilities are configured");
    }

    #[test]
    fn agent_menu_is_shown_when_unconfigured() {
        let mut prompter = prompter("4\n");

        let (name, capabilities) =
            choose_agent(None, &PlayConfig::default(), &mut prompter).expect("menu choice");

        assert_eq!(name, "seer");
        assert!(capabilities.omni_vision);
    }
}
