#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fog-of-war for Maze CTF.
//!
//! A team only sees opposing bots that stand within a few moves of one of its
//! own bots. Everything further away is reported at a random cell near its
//! true position. The [`Noiser`] performs that perturbation on an owned
//! snapshot, and [`Pathfinder`] supplies the maze distances it relies on.

use std::collections::{BTreeSet, VecDeque};

use maze_ctf_core::{BotId, Position, PositionError, TeamId};
use maze_ctf_world::{Maze, Universe};
use rand::{seq::SliceRandom, Rng};

mod pathfinding;

pub use pathfinding::{shortest_path, PathError, Pathfinder};

/// Default sight radius; cells strictly closer than this many moves are in range.
pub const DEFAULT_NOISE_RADIUS: u32 = 5;

/// Perturbs the reported positions of bots that an observing team cannot see.
#[derive(Clone, Debug)]
pub struct Noiser {
    maze: Maze,
    radius: u32,
}

impl Noiser {
    /// Creates a noiser over the maze using [`DEFAULT_NOISE_RADIUS`].
    #[must_use]
    pub fn new(maze: Maze) -> Self {
        Self::with_radius(maze, DEFAULT_NOISE_RADIUS)
    }

    /// Creates a noiser with a custom sight radius.
    #[must_use]
    pub fn with_radius(maze: Maze, radius: u32) -> Self {
        Self { maze, radius }
    }

    /// Sight radius in moves.
    #[must_use]
    pub const fn radius(&self) -> u32 {
        self.radius
    }

    /// Free cells whose shortest path from `origin` is shorter than the radius.
    ///
    /// `origin` is always part of the result.
    ///
    /// # Errors
    ///
    /// Returns a [`PositionError`] when `origin` is outside the maze or a wall.
    pub fn reachable_within(&self, origin: Position) -> Result<BTreeSet<Position>, PositionError> {
        self.maze.ensure_free(origin)?;

        let mut reached = BTreeSet::new();
        let mut queue = VecDeque::new();
        let _ = reached.insert(origin);
        queue.push_back((origin, 0_u32));

        while let Some((cell, distance)) = queue.pop_front() {
            let next_distance = distance + 1;
            if next_distance >= self.radius {
                continue;
            }

            for neighbor in self.maze.free_neighbors(cell) {
                if reached.insert(neighbor) {
                    queue.push_back((neighbor, next_distance));
                }
            }
        }

        Ok(reached)
    }

    /// Returns the snapshot as seen by the `observer` team.
    ///
    /// Opposing bots within range of any observer bot keep their true
    /// position. All others are moved to a cell drawn uniformly from the
    /// cells within range of their true position and flagged as noisy. The
    /// observer's own bots, the maze and the scores are left untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`PositionError`] when a bot stands on a cell that is not free.
    pub fn apply_noise<R>(
        &self,
        mut universe: Universe,
        observer: TeamId,
        rng: &mut R,
    ) -> Result<Universe, PositionError>
    where
        R: Rng + ?Sized,
    {
        let mut visible = BTreeSet::new();
        for bot in universe.bots().iter().filter(|bot| bot.team() == observer) {
            visible.extend(self.reachable_within(bot.current_position())?);
        }

        let opponents: Vec<(BotId, Position)> = universe
            .bots()
            .iter()
            .filter(|bot| bot.team() != observer)
            .map(|bot| (bot.id(), bot.current_position()))
            .collect();

        for (id, position) in opponents {
            let (reported, noisy) = if visible.contains(&position) {
                (position, false)
            } else {
                let candidates: Vec<Position> =
                    self.reachable_within(position)?.into_iter().collect();
                let drawn = candidates.choose(rng).copied().unwrap_or(position);
                (drawn, true)
            };

            if let Some(bot) = universe.bot_mut(id) {
                bot.set_current_position(reported);
                bot.set_noisy(noisy);
            }
        }

        Ok(universe)
    }
}
