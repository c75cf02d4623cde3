//! A* search over the free cells of a maze.

use std::{cmp::Reverse, collections::BinaryHeap};

use maze_ctf_core::{Position, PositionError};
use maze_ctf_world::Maze;
use thiserror::Error;

/// Failures reported by [`Pathfinder::shortest_path`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// The start or goal is outside the maze or a wall.
    #[error(transparent)]
    InvalidPosition(#[from] PositionError),
    /// No sequence of free cells connects start and goal.
    #[error("no path from {start} to {goal}")]
    Unreachable {
        /// Requested start cell.
        start: Position,
        /// Requested goal cell.
        goal: Position,
    },
}

/// Open-set entry ordered by `(f, h, insertion order)` and popped smallest first.
type OpenEntry = Reverse<(u32, u32, u64, Position)>;

/// Reusable A* workspace.
///
/// The score and predecessor buffers mirror the maze in row-major order and
/// are recycled between searches on mazes of the same size.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    g_score: Vec<u32>,
    came_from: Vec<Option<Position>>,
    open: BinaryHeap<OpenEntry>,
}

impl Pathfinder {
    /// Creates an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a shortest 4-connected path from `start` to `goal`.
    ///
    /// The returned cells exclude `start` and end with `goal`, so the length
    /// of the path equals the number of moves. Identical endpoints yield an
    /// empty path. Neighbours are expanded north, east, south, west and ties
    /// on the estimated cost prefer the cell closer to the goal, then the
    /// cell discovered first, so repeated searches return the same path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InvalidPosition`] when either endpoint is not a
    /// free cell of the maze and [`PathError::Unreachable`] when the goal
    /// cannot be reached.
    pub fn shortest_path(
        &mut self,
        maze: &Maze,
        start: Position,
        goal: Position,
    ) -> Result<Vec<Position>, PathError> {
        maze.ensure_free(start)?;
        maze.ensure_free(goal)?;
        if start == goal {
            return Ok(Vec::new());
        }

        self.reset(maze.cell_count());
        let start_index = maze
            .index(start)
            .ok_or(PositionError::OutOfBounds(start))?;
        self.g_score[start_index] = 0;

        let mut sequence: u64 = 0;
        let start_h = start.manhattan_distance(goal);
        self.open.push(Reverse((start_h, start_h, sequence, start)));

        while let Some(Reverse((f, h, _, current))) = self.open.pop() {
            if current == goal {
                return Ok(self.reconstruct(maze, start, goal));
            }

            let Some(current_index) = maze.index(current) else {
                continue;
            };
            let current_g = self.g_score[current_index];
            if f.saturating_sub(h) != current_g {
                // Superseded by a cheaper entry.
                continue;
            }

            let next_g = current_g.saturating_add(1);
            for neighbor in maze.free_neighbors(current) {
                let Some(neighbor_index) = maze.index(neighbor) else {
                    continue;
                };
                if next_g >= self.g_score[neighbor_index] {
                    continue;
                }

                self.g_score[neighbor_index] = next_g;
                self.came_from[neighbor_index] = Some(current);
                sequence += 1;
                let neighbor_h = neighbor.manhattan_distance(goal);
                self.open.push(Reverse((
                    next_g.saturating_add(neighbor_h),
                    neighbor_h,
                    sequence,
                    neighbor,
                )));
            }
        }

        Err(PathError::Unreachable { start, goal })
    }

    fn reset(&mut self, cell_count: usize) {
        self.open.clear();
        if self.g_score.len() == cell_count {
            self.g_score.fill(u32::MAX);
            self.came_from.fill(None);
        } else {
            self.g_score = vec![u32::MAX; cell_count];
            self.came_from = vec![None; cell_count];
        }
    }

    fn reconstruct(&self, maze: &Maze, start: Position, goal: Position) -> Vec<Position> {
        let mut path = vec![goal];
        let mut current = goal;
        while let Some(previous) = maze
            .index(current)
            .and_then(|index| self.came_from[index])
        {
            if previous == start {
                break;
            }
            path.push(previous);
            current = previous;
        }
        path.reverse();
        path
    }
}

/// Convenience wrapper running a single search with a fresh workspace.
///
/// # Errors
///
/// See [`Pathfinder::shortest_path`].
pub fn shortest_path(
    maze: &Maze,
    start: Position,
    goal: Position,
) -> Result<Vec<Position>, PathError> {
    Pathfinder::new().shortest_path(maze, start, goal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_ctf_core::Tag;

    fn open_room(width: u32, height: u32) -> Maze {
        let mut maze = Maze::walled(width, height);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                maze.set(Position::new(x, y), Tag::Free).expect("in bounds");
            }
        }
        maze
    }

    #[test]
    fn straight_corridor_path_excludes_start() {
        let maze = open_room(6, 3);
        let path = shortest_path(&maze, Position::new(1, 1), Position::new(4, 1)).expect("path");
        assert_eq!(
            path,
            vec![
                Position::new(2, 1),
                Position::new(3, 1),
                Position::new(4, 1)
            ]
        );
    }

    #[test]
    fn identical_endpoints_yield_empty_path() {
        let maze = open_room(4, 4);
        let cell = Position::new(2, 2);
        assert_eq!(shortest_path(&maze, cell, cell), Ok(Vec::new()));
    }

    #[test]
    fn walled_off_goal_is_unreachable() {
        let mut maze = open_room(7, 3);
        maze.set(Position::new(3, 1), Tag::Wall).expect("in bounds");
        let start = Position::new(1, 1);
        let goal = Position::new(5, 1);

        assert_eq!(
            shortest_path(&maze, start, goal),
            Err(PathError::Unreachable { start, goal })
        );
    }

    #[test]
    fn endpoints_must_be_free() {
        let maze = open_room(4, 4);
        assert_eq!(
            shortest_path(&maze, Position::new(0, 0), Position::new(1, 1)),
            Err(PathError::InvalidPosition(PositionError::Wall(
                Position::new(0, 0)
            )))
        );
        assert_eq!(
            shortest_path(&maze, Position::new(1, 1), Position::new(8, 8)),
            Err(PathError::InvalidPosition(PositionError::OutOfBounds(
                Position::new(8, 8)
            )))
        );
    }

    #[test]
    fn workspace_is_reusable_across_maze_sizes() {
        let mut pathfinder = Pathfinder::new();
        let small = open_room(4, 4);
        let large = open_room(9, 5);

        let first = pathfinder
            .shortest_path(&small, Position::new(1, 1), Position::new(2, 2))
            .expect("path");
        let second = pathfinder
            .shortest_path(&large, Position::new(1, 1), Position::new(7, 3))
            .expect("path");
        let repeated = pathfinder
            .shortest_path(&large, Position::new(1, 1), Position::new(7, 3))
            .expect("path");

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 8);
        assert_eq!(second, repeated);
    }
}
