#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Depth-first pathfinding over a static maze.
//!
//! The search returns the first path found in depth-first order, which is
//! not necessarily the shortest. A single visited set is shared by every
//! branch, so a cell entered once is never entered again even when reached
//! from a different direction.

use std::collections::HashSet;

use maze_explorer_core::{Direction, Grid, Position};
use tracing::debug;

/// Direct moves tried at every node, in expansion order.
pub const SEARCH_ACTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

/// Start cell, goal cells, and terrain for one search.
#[derive(Clone, Debug)]
pub struct Problem<'a> {
    initial: Position,
    goals: Vec<Position>,
    grid: &'a Grid,
}

impl<'a> Problem<'a> {
    /// Creates a new search problem.
    #[must_use]
    pub fn new(initial: Position, goals: Vec<Position>, grid: &'a Grid) -> Self {
        Self {
            initial,
            goals,
            grid,
        }
    }

    /// Cell the search starts from.
    #[must_use]
    pub const fn initial(&self) -> Position {
        self.initial
    }

    /// Cells that end the search.
    #[must_use]
    pub fn goals(&self) -> &[Position] {
        &self.goals
    }

    /// Terrain searched over.
    #[must_use]
    pub const fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// Whether the position is one of the goals.
    #[must_use]
    pub fn is_goal(&self, position: Position) -> bool {
        self.goals.contains(&position)
    }

    /// Neighbour reached by moving in `direction`, if it is in bounds and passable.
    #[must_use]
    pub fn result(&self, position: Position, direction: Direction) -> Option<Position> {
        position
            .step(direction)
            .filter(|next| self.grid.is_passable(*next))
    }
}

impl std::fmt::Display for Problem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Initial state: {} -> Goals: [", self.initial)?;
        for (index, goal) in self.goals.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{goal}")?;
        }
        write!(f, "]")
    }
}

/// One step of a found path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathNode {
    /// Cell occupied at this step.
    pub position: Position,
    /// Move that led here, or `None` for the start cell.
    pub action: Option<Direction>,
}

impl PathNode {
    /// Creates a new path node.
    #[must_use]
    pub const fn new(position: Position, action: Option<Direction>) -> Self {
        Self { position, action }
    }
}

/// Runs a depth-first search trying `actions` in order at each node.
///
/// Returns every node from the start to the first goal found, inclusive, or
/// `None` when no goal can be reached. A start cell that is itself a goal
/// yields a single-node path.
///
/// The search keeps its own stack of expansions, so maze size is bounded by
/// memory rather than by the thread's call stack.
#[must_use]
pub fn depth_first_search(problem: &Problem<'_>, actions: &[Direction]) -> Option<Vec<PathNode>> {
    let mut search = Search {
        problem,
        actions,
        visited: HashSet::new(),
        path: Vec::new(),
        frames: Vec::new(),
    };

    if search.run() {
        debug!(
            length = search.path.len(),
            explored = search.visited.len(),
            "path found"
        );
        Some(search.path)
    } else {
        debug!(explored = search.visited.len(), "no path");
        None
    }
}

/// Children of one entered node and the index of the next one to try.
#[derive(Debug)]
struct Frame {
    children: Vec<PathNode>,
    next: usize,
}

#[derive(Debug)]
struct Search<'p, 'g> {
    problem: &'p Problem<'g>,
    actions: &'p [Direction],
    visited: HashSet<Position>,
    path: Vec<PathNode>,
    frames: Vec<Frame>,
}

impl Search<'_, '_> {
    fn run(&mut self) -> bool {
        if self.enter(PathNode::new(self.problem.initial(), None)) {
            return true;
        }

        while let Some(frame) = self.frames.last_mut() {
            let Some(child) = frame.children.get(frame.next).copied() else {
                let _ = self.frames.pop();
                let _ = self.path.pop();
                continue;
            };
            frame.next += 1;

            // Siblings entered deeper in the search are skipped here.
            if self.visited.contains(&child.position) {
                continue;
            }
            if self.enter(child) {
                return true;
            }
        }
        false
    }

    /// Appends `node` to the path and reports whether it is a goal; otherwise
    /// marks it visited and schedules its children.
    fn enter(&mut self, node: PathNode) -> bool {
        self.path.push(node);
        if self.problem.is_goal(node.position) {
            return true;
        }

        let _ = self.visited.insert(node.position);
        let children = self
            .actions
            .iter()
            .filter_map(|&action| {
                self.problem
                    .result(node.position, action)
                    .map(|position| PathNode::new(position, Some(action)))
            })
            .collect();
        self.frames.push(Frame { children, next: 0 });
        false
    }
}
