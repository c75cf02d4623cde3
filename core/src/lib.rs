#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze CTF engine.
//!
//! This crate defines the message surface that connects the scheduler, the
//! authoritative universe, and the pure systems. The scheduler submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values that
//! viewers and players observe. Nothing outside the world mutates canonical
//! state.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Commands that express all permissible universe mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Assigns a display name to a team.
    NameTeam {
        /// Team receiving the name.
        team: TeamId,
        /// Name shown to players and viewers.
        name: String,
    },
    /// Requests that a bot move a single step in the provided direction.
    MoveBot {
        /// Identifier of the acting bot.
        bot: BotId,
        /// Direction proposed by the bot's player.
        direction: Direction,
    },
    /// Closes the current round and opens the next one.
    AdvanceRound,
    /// Ends the game by comparing scores, unless an outcome already exists.
    ConcludeGame,
}

/// Events reported by the universe after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a bot completed its move, possibly in place.
    BotMoved {
        /// Identifier of the bot that moved.
        bot: BotId,
        /// Cell occupied before the move.
        from: Position,
        /// Cell occupied after the move.
        to: Position,
    },
    /// Reports that a proposed move was illegal and replaced by [`Direction::Stop`].
    MoveRejected {
        /// Identifier of the bot whose move was rejected.
        bot: BotId,
        /// Direction that was originally proposed.
        requested: Direction,
    },
    /// Reports that a harvesting bot picked up food.
    FoodEaten {
        /// Identifier of the bot that ate.
        bot: BotId,
        /// Cell the food was removed from.
        position: Position,
    },
    /// Reports that a bot was destroyed and sent back to its respawn point.
    BotDestroyed {
        /// Identifier of the destroyed bot.
        bot: BotId,
        /// Identifier of the bot that caused the destruction.
        destroyed_by: BotId,
        /// Cell the destroyed bot now occupies.
        respawn: Position,
    },
    /// Reports a change to a team's score.
    TeamScored {
        /// Team whose score increased.
        team: TeamId,
        /// Points added to the score.
        delta: u32,
    },
    /// Announces that a team won and the game is over.
    TeamWins {
        /// Winning team.
        team: TeamId,
    },
    /// Announces that the game ended without a winner.
    GameDraw,
}

impl Event {
    /// Reports whether the event ends the game.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::TeamWins { .. } | Self::GameDraw)
    }
}

/// Cell content tags understood by the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// Impassable cell. Never carries another tag.
    Wall,
    /// Traversable cell.
    Free,
    /// Edible item lying on a free cell.
    Food,
}

/// Movement directions available to bots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing column indices.
    West,
    /// Remain in place.
    Stop,
}

impl Direction {
    /// Every direction in canonical order.
    pub const ALL: [Direction; 5] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Stop,
    ];

    /// Coordinate delta applied by the direction as `(dx, dy)`.
    #[must_use]
    pub const fn delta(self) -> (i64, i64) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::Stop => (0, 0),
        }
    }

    /// Returns the direction that leads from `from` to the adjacent `to`.
    ///
    /// Identical positions map to [`Direction::Stop`]; anything further than a
    /// single orthogonal step yields `None`.
    #[must_use]
    pub fn between(from: Position, to: Position) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| from.step(*direction) == Some(to))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Stop => "stop",
        };
        f.write_str(name)
    }
}

/// Unique identifier assigned to a bot.
///
/// Bot identifiers double as turn order and, through their parity, as team
/// membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BotId(u32);

impl BotId {
    /// Creates a new bot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier as a slice index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bot {}", self.0)
    }
}

/// Unique identifier assigned to a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(u32);

impl TeamId {
    /// Creates a new team identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier as a slice index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team {}", self.0)
    }
}

/// Location of a single maze cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    x: u32,
    y: u32,
}

impl Position {
    /// Creates a new maze position.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Position reached by taking one step in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let x = u32::try_from(i64::from(self.x) + dx).ok()?;
        let y = u32::try_from(i64::from(self.y) + dy).ok()?;
        Some(Position::new(x, y))
    }

    /// Computes the Manhattan distance between two positions.
    #[must_use]
    pub fn manhattan_distance(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl From<(u32, u32)> for Position {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Reasons a position is rejected by a maze query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PositionError {
    /// The position lies outside the maze bounds.
    #[error("position {0} lies outside the maze")]
    OutOfBounds(Position),
    /// The position is a wall where a free cell is required.
    #[error("position {0} is a wall")]
    Wall(Position),
}

impl PositionError {
    /// Position that triggered the error.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::OutOfBounds(position) | Self::Wall(position) => *position,
        }
    }
}
