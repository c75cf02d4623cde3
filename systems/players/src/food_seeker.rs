//! Greedy player that walks toward the closest enemy food.

use maze_ctf_core::{BotId, Direction, Position};
use maze_ctf_system_game_master::{Player, PlayerError};
use maze_ctf_system_noise::{PathError, Pathfinder};
use maze_ctf_world::{query, Universe};
use tracing::debug;

/// Follows the shortest path to the nearest food it may eat.
///
/// Ties between equally distant food are broken in row-major order. The
/// player stops when no enemy food is reachable.
#[derive(Clone, Debug, Default)]
pub struct FoodSeekerPlayer {
    pathfinder: Pathfinder,
}

impl FoodSeekerPlayer {
    /// Creates a player with an empty search workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn route(
        &mut self,
        universe: &Universe,
        origin: Position,
        targets: &[Position],
    ) -> Result<Option<Vec<Position>>, PlayerError> {
        let mut best: Option<Vec<Position>> = None;
        for target in targets {
            let path = match self.pathfinder.shortest_path(universe.maze(), origin, *target) {
                Ok(path) => path,
                Err(PathError::Unreachable { .. }) => continue,
                Err(error) => return Err(PlayerError::failed(error.to_string())),
            };
            if best.as_ref().map_or(true, |current| path.len() < current.len()) {
                best = Some(path);
            }
        }
        Ok(best)
    }
}

impl Player for FoodSeekerPlayer {
    fn get_move(&mut self, bot: BotId, universe: Universe) -> Result<Direction, PlayerError> {
        let Some(me) = universe.bot(bot) else {
            return Err(PlayerError::failed(format!("{bot} is not on the board")));
        };
        let origin = me.current_position();
        let food = query::enemy_food(&universe, me.team());

        let Some(path) = self.route(&universe, origin, &food)? else {
            return Ok(Direction::Stop);
        };
        let direction = path
            .first()
            .and_then(|next| Direction::between(origin, *next))
            .unwrap_or(Direction::Stop);
        debug!(bot = bot.get(), target = ?path.last(), %direction, "seeking food");
        Ok(direction)
    }
}
