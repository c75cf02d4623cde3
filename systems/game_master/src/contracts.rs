//! Collaborator contracts driven by the game master.
//!
//! Every method receives an owned [`Universe`] snapshot. Whatever a
//! collaborator does to its copy never reaches the authoritative state or the
//! copies handed to anyone else.

use maze_ctf_core::{BotId, Direction, Event, TeamId};
use maze_ctf_world::Universe;
use thiserror::Error;

/// Failures reported by players and teams.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PlayerError {
    /// The player does not provide the requested operation.
    #[error("player does not implement this operation")]
    NotImplemented,
    /// The team has no player for the bot.
    #[error("no player is assigned to {0}")]
    MissingPlayer(BotId),
    /// The player gave up.
    #[error("player failed: {0}")]
    Failed(String),
}

impl PlayerError {
    /// Creates a failure carrying the provided message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Failures reported by viewers.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ViewerError {
    /// The viewer does not provide the requested operation.
    #[error("viewer does not implement this operation")]
    NotImplemented,
    /// The viewer gave up.
    #[error("viewer failed: {0}")]
    Failed(String),
}

impl ViewerError {
    /// Creates a failure carrying the provided message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Decision maker controlling a single bot.
pub trait Player {
    /// Receives the initial snapshot before the first round.
    ///
    /// # Errors
    ///
    /// Implementations may refuse to start with a [`PlayerError`].
    fn set_initial(&mut self, _bot: BotId, _universe: Universe) -> Result<(), PlayerError> {
        Ok(())
    }

    /// Chooses the next move for `bot` from its team's view of the game.
    ///
    /// # Errors
    ///
    /// The default implementation reports [`PlayerError::NotImplemented`].
    fn get_move(&mut self, _bot: BotId, _universe: Universe) -> Result<Direction, PlayerError> {
        Err(PlayerError::NotImplemented)
    }
}

/// Group of players answering for every bot of one team.
pub trait Team {
    /// Receives the team identifier and the initial snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`PlayerError`] when the team cannot field its bots.
    fn set_initial(&mut self, team: TeamId, universe: Universe) -> Result<(), PlayerError>;

    /// Chooses the next move for one of the team's bots.
    ///
    /// # Errors
    ///
    /// Returns a [`PlayerError`] when no move can be produced.
    fn get_move(&mut self, bot: BotId, universe: Universe) -> Result<Direction, PlayerError>;
}

/// Observer notified after every turn.
pub trait Viewer {
    /// Receives the initial snapshot.
    ///
    /// # Errors
    ///
    /// Implementations may refuse to start with a [`ViewerError`].
    fn set_initial(&mut self, _universe: Universe) -> Result<(), ViewerError> {
        Ok(())
    }

    /// Receives the state after a turn together with the events it produced.
    ///
    /// # Errors
    ///
    /// The default implementation reports [`ViewerError::NotImplemented`].
    fn observe(
        &mut self,
        _round: u32,
        _turn: u32,
        _universe: Universe,
        _events: Vec<Event>,
    ) -> Result<(), ViewerError> {
        Err(ViewerError::NotImplemented)
    }
}

/// Team that assigns its bots, in order, to a list of players.
pub struct SimpleTeam {
    players: Vec<Box<dyn Player>>,
    assignments: Vec<(BotId, usize)>,
}

impl SimpleTeam {
    /// Creates a team from players listed in the order of the team's bots.
    #[must_use]
    pub fn new(players: Vec<Box<dyn Player>>) -> Self {
        Self {
            players,
            assignments: Vec::new(),
        }
    }

    /// Number of players in the team.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    fn player_for(&mut self, bot: BotId) -> Result<&mut Box<dyn Player>, PlayerError> {
        let index = self
            .assignments
            .iter()
            .find(|(assigned, _)| *assigned == bot)
            .map(|(_, index)| *index)
            .ok_or(PlayerError::MissingPlayer(bot))?;
        self.players
            .get_mut(index)
            .ok_or(PlayerError::MissingPlayer(bot))
    }
}

impl std::fmt::Debug for SimpleTeam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleTeam")
            .field("players", &self.players.len())
            .field("assignments", &self.assignments)
            .finish()
    }
}

impl Team for SimpleTeam {
    fn set_initial(&mut self, team: TeamId, universe: Universe) -> Result<(), PlayerError> {
        let bots: Vec<BotId> = universe
            .team(team)
            .map(|team| team.bots().to_vec())
            .unwrap_or_default();

        self.assignments.clear();
        for (index, bot) in bots.into_iter().enumerate() {
            let player = self
                .players
                .get_mut(index)
                .ok_or(PlayerError::MissingPlayer(bot))?;
            player.set_initial(bot, universe.clone())?;
            self.assignments.push((bot, index));
        }
        Ok(())
    }

    fn get_move(&mut self, bot: BotId, universe: Universe) -> Result<Direction, PlayerError> {
        self.player_for(bot)?.get_move(bot, universe)
    }
}
