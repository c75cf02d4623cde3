#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ready-made players and viewers for Maze CTF games.

use maze_ctf_core::{BotId, Direction};
use maze_ctf_system_game_master::{Player, PlayerError};
use maze_ctf_world::{query, Universe};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

mod food_seeker;
mod viewers;

pub use food_seeker::FoodSeekerPlayer;
pub use viewers::{AsciiViewer, DevNullViewer};

/// Replays a fixed list of moves.
///
/// Moves are taken from the back of the list. Once the list is exhausted the
/// player stops.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedPlayer {
    moves: Vec<Direction>,
}

impl ScriptedPlayer {
    /// Creates a player that pops moves from the end of `moves`.
    #[must_use]
    pub fn new(moves: Vec<Direction>) -> Self {
        Self { moves }
    }

    /// Moves not yet played.
    #[must_use]
    pub fn remaining(&self) -> &[Direction] {
        &self.moves
    }
}

impl Player for ScriptedPlayer {
    fn get_move(&mut self, _bot: BotId, _universe: Universe) -> Result<Direction, PlayerError> {
        Ok(self.moves.pop().unwrap_or(Direction::Stop))
    }
}

/// Never moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoppingPlayer;

impl Player for StoppingPlayer {
    fn get_move(&mut self, _bot: BotId, _universe: Universe) -> Result<Direction, PlayerError> {
        Ok(Direction::Stop)
    }
}

/// Picks uniformly among the legal moves of its snapshot.
#[derive(Clone, Debug)]
pub struct RandomPlayer {
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    /// Creates a player whose choices are reproducible for a given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a player seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl Player for RandomPlayer {
    fn get_move(&mut self, bot: BotId, universe: Universe) -> Result<Direction, PlayerError> {
        let moves = query::legal_moves(&universe, bot);
        let chosen = moves
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| PlayerError::failed(format!("{bot} is not on the board")))?;
        debug!(bot = bot.get(), %chosen, "random move");
        Ok(chosen)
    }
}
