//! Line-based front end: one command letter per line, maze printed after each turn.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use maze_explorer_rendering::{render_text, FrameInput};
use tracing::info;

use crate::session::{goal_reached, Session};

const HELP: &str =
    "Commands: w advance, a turn left, d turn right, s sense, o omni-vision, r reset, h history, q quit";

/// Translates one input line into frame input, or `None` when it is not a command.
pub(crate) fn parse_input(line: &str) -> Option<FrameInput> {
    let mut input = FrameInput::default();
    match line.trim().to_ascii_lowercase().as_str() {
        "w" => input.advance = true,
        "a" => input.turn_left = true,
        "d" => input.turn_right = true,
        "s" => input.sense = true,
        "o" => input.omni_vision = true,
        "r" => input.reset = true,
        "h" => input.show_history = true,
        "q" => input.quit = true,
        _ => return None,
    }
    Some(input)
}

/// Runs the session until `q` is entered or input ends.
pub(crate) fn run<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let mut scene = session.scene()?;
    writeln!(output, "{HELP}")?;
    write!(output, "{}", render_text(&scene))?;

    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush().context("failed to flush output")?;
        line.clear();
        if input.read_line(&mut line).context("failed to read command")? == 0 {
            break;
        }

        let Some(frame_input) = parse_input(&line) else {
            writeln!(output, "{HELP}")?;
            continue;
        };
        if frame_input.quit {
            break;
        }

        let events = session.step(frame_input);
        if let Some(position) = goal_reached(events) {
            writeln!(output, "Goal {position} reached!")?;
        }
        if frame_input.show_history {
            writeln!(output, "{}", session.history())?;
        }

        session.refresh_scene(&mut scene);
        write!(output, "{}", render_text(&scene))?;
    }

    info!(stats = ?session.stats(), "session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use maze_explorer_core::{Capabilities, Command, Grid, Position};
    use maze_explorer_system_bootstrap::Bootstrap;
    use maze_explorer_world::query;

    fn session() -> Session {
        let grid = Arc::new(Grid::parse("0,0,0,0\n0,1,1,0\n0,0,0,0").expect("valid grid"));
        let world = Bootstrap
            .world(
                grid,
                "tester",
                Capabilities::default(),
                Position::new(1, 1),
                Position::new(1, 2),
            )
            .expect("valid capabilities");
        Session::new(world)
    }

    #[test]
    fn letters_map_to_single_inputs() {
        assert_eq!(
            parse_input("w").and_then(|input| input.command()),
            Some(Command::Advance)
        );
        assert!(parse_input(" H \n").is_some_and(|input| input.show_history));
        assert!(parse_input("q").is_some_and(|input| input.quit));
        assert_eq!(parse_input("jump"), None);
        assert_eq!(parse_input(""), None);
    }

    #[test]
    fn scripted_session_reaches_goal_and_prints_history() {
        let mut session = session();
        let mut output = Vec::new();

        run(&mut session, "x\nw\nh\nq\nw\n".as_bytes(), &mut output).expect("session runs");

        let output = String::from_utf8(output).expect("utf-8 output");
        assert!(output.contains("Goal (1, 2) reached!"));
        assert!(output.contains("Decision history for tester:"));
        assert!(output.contains("(1, 1) facing right -> advance: moved to (1, 2) facing right"));
        assert_eq!(query::turn(session.world()), 2, "unknown line and quit are not turns");
    }

    #[test]
    fn end_of_input_stops_the_loop() {
        let mut session = session();
        let mut output = Vec::new();

        run(&mut session, "s\n".as_bytes(), &mut output).expect("session runs");

        assert_eq!(query::turn(session.world()), 1);
    }
}
