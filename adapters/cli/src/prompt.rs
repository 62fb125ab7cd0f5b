//! Line-oriented prompts for coordinates and agent selection.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use maze_explorer_core::{Grid, Position};
use maze_explorer_system_bootstrap::{validate_endpoint, AgentPreset};

/// Asks questions on `output` and reads answers from `input`.
#[derive(Debug)]
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Returns the reader and writer, keeping any input buffered so far.
    pub(crate) fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Prints a line without waiting for an answer.
    pub(crate) fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}").context("failed to write prompt")
    }

    /// Prints `label` and reads one trimmed line, or `None` once input ends.
    pub(crate) fn line(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}").context("failed to write prompt")?;
        self.output.flush().context("failed to flush prompt")?;

        let mut buffer = String::new();
        let read = self
            .input
            .read_line(&mut buffer)
            .context("failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(buffer.trim().to_owned()))
    }

    /// Reads a non-negative integer, asking again until one is entered.
    pub(crate) fn integer(&mut self, label: &str) -> Result<u32> {
        loop {
            let Some(answer) = self.line(label)? else {
                bail!("input ended while waiting for {}", label.trim_end_matches([':', ' ']));
            };
            match answer.parse::<u32>() {
                Ok(value) => return Ok(value),
                Err(_) => self.say(&format!("`{answer}` is not a valid number, try again."))?,
            }
        }
    }

    /// Reads a row and column for the named endpoint.
    pub(crate) fn position(&mut self, role: &str) -> Result<Position> {
        let row = self.integer(&format!("{role} row: "))?;
        let column = self.integer(&format!("{role} column: "))?;
        Ok(Position::new(row, column))
    }

    /// Reads a position that lies inside the grid, asking again otherwise.
    pub(crate) fn position_within(&mut self, grid: &Grid, role: &str) -> Result<Position> {
        loop {
            let position = self.position(role)?;
            if grid.contains(position) {
                return Ok(position);
            }
            self.say(&format!(
                "{position} is outside the {}x{} maze, try again.",
                grid.rows(),
                grid.columns()
            ))?;
        }
    }

    /// Reads a position that is inside the grid and not a wall, asking again otherwise.
    pub(crate) fn endpoint(&mut self, grid: &Grid, role: &str) -> Result<Position> {
        loop {
            let position = self.position(role)?;
            match validate_endpoint(grid, position) {
                Ok(position) => return Ok(position),
                Err(error) => self.say(&format!("{error}, try again."))?,
            }
        }
    }

    /// Lists the presets and reads a choice, asking again on unknown entries.
    pub(crate) fn preset(&mut self) -> Result<AgentPreset> {
        self.say("Choose an agent:")?;
        for (index, preset) in AgentPreset::ALL.iter().enumerate() {
            self.say(&format!("  {}. {preset}: {}", index + 1, preset.summary()))?;
        }
        loop {
            let Some(answer) = self.line("Agent: ")? else {
                bail!("input ended while waiting for an agent choice");
            };
            match AgentPreset::from_choice(&answer) {
                Some(preset) => return Ok(preset),
                None => self.say(&format!("`{answer}` is not one of the listed agents."))?,
            }
        }
    }
}
