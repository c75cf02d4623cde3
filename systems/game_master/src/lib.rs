#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn scheduler for Maze CTF.
//!
//! The [`GameMaster`] owns the authoritative [`Universe`]. Each turn it hands
//! the acting team a fog-of-war snapshot, submits the chosen move to the
//! world, and forwards a private copy of the resulting state and events to
//! every registered viewer.

use maze_ctf_core::{BotId, Command, Event, PositionError, TeamId};
use maze_ctf_system_noise::Noiser;
use maze_ctf_world::{self as world, team_for_bot, LayoutError, Outcome, Universe, TEAM_COUNT};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

mod config;
mod contracts;

pub use config::{
    ConfigError, GameConfig, GameConfigBuilder, LayoutSource, DEFAULT_BOT_COUNT,
    DEFAULT_MAX_ROUNDS,
};
pub use contracts::{Player, PlayerError, SimpleTeam, Team, Viewer, ViewerError};

/// Failures surfaced by the game master.
#[derive(Debug, Error)]
pub enum GameMasterError {
    /// Fewer teams than required were registered.
    #[error("{registered} of {required} teams registered")]
    MissingTeams {
        /// Teams registered so far.
        registered: usize,
        /// Teams a game needs.
        required: usize,
    },
    /// Registration was attempted after setup.
    #[error("registration is closed once the game is set up")]
    LateRegistration,
    /// Every team slot is already taken.
    #[error("all {0} team slots are taken")]
    TooManyTeams(usize),
    /// A round other than the current one was requested.
    #[error("round {requested} requested while round {expected} is due")]
    RoundOutOfOrder {
        /// Round the universe expects next.
        expected: u32,
        /// Round that was requested.
        requested: u32,
    },
    /// The game already has an outcome.
    #[error("the game is already finished")]
    GameFinished,
    /// The configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The layout is malformed.
    #[error(transparent)]
    Layout(#[from] LayoutError),
    /// A team or player failed.
    #[error("{team} failed")]
    Player {
        /// Team whose player failed.
        team: TeamId,
        /// Underlying failure.
        #[source]
        source: PlayerError,
    },
    /// A viewer failed.
    #[error(transparent)]
    Viewer(#[from] ViewerError),
    /// Fog of war could not be applied.
    #[error("failed to apply noise")]
    Noise(#[source] PositionError),
}

/// Lifecycle of a game master.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Teams and viewers may still be registered.
    Unconfigured,
    /// Collaborators received their initial snapshots.
    Initialized,
    /// At least one turn has been played.
    Running,
    /// The game has an outcome.
    Finished,
}

struct RegisteredTeam {
    team: Box<dyn Team>,
    name: Option<String>,
}

/// Drives a game from setup to outcome.
pub struct GameMaster {
    universe: Universe,
    noiser: Option<Noiser>,
    rng: ChaCha8Rng,
    teams: Vec<RegisteredTeam>,
    viewers: Vec<Box<dyn Viewer>>,
    max_rounds: u32,
    state: GameState,
}

impl GameMaster {
    /// Creates a game over `layout` with fog of war and an entropy-seeded random source.
    ///
    /// # Errors
    ///
    /// Returns [`GameMasterError::Layout`] when the layout is malformed and
    /// [`ConfigError::NoRounds`] when `max_rounds` is zero.
    pub fn new(layout: &str, bot_count: usize, max_rounds: u32) -> Result<Self, GameMasterError> {
        if max_rounds == 0 {
            return Err(ConfigError::NoRounds.into());
        }
        let universe = Universe::from_layout(layout, bot_count)?;
        Ok(Self::assemble(
            universe,
            max_rounds,
            true,
            ChaCha8Rng::from_entropy(),
        ))
    }

    /// Creates a game from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GameMasterError::Config`] when the layout cannot be resolved
    /// and [`GameMasterError::Layout`] when it is malformed.
    pub fn from_config(config: &GameConfig) -> Result<Self, GameMasterError> {
        let mut rng = match config.seed() {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let layout = config.layout().resolve(&mut rng)?;
        let universe = Universe::from_layout(&layout, config.bot_count())?;
        Ok(Self::assemble(
            universe,
            config.max_rounds(),
            config.noise(),
            rng,
        ))
    }

    fn assemble(universe: Universe, max_rounds: u32, noise: bool, rng: ChaCha8Rng) -> Self {
        let noiser = noise.then(|| Noiser::new(universe.maze().clone()));
        Self {
            universe,
            noiser,
            rng,
            teams: Vec::with_capacity(TEAM_COUNT),
            viewers: Vec::new(),
            max_rounds,
            state: GameState::Unconfigured,
        }
    }

    /// Read-only view of the authoritative universe.
    #[must_use]
    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Rounds played before the game is decided by score.
    #[must_use]
    pub const fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Claims the next free team slot.
    ///
    /// # Errors
    ///
    /// Returns [`GameMasterError::LateRegistration`] after setup and
    /// [`GameMasterError::TooManyTeams`] when every slot is taken.
    pub fn register_team<T>(
        &mut self,
        team: T,
        name: Option<String>,
    ) -> Result<TeamId, GameMasterError>
    where
        T: Team + 'static,
    {
        if self.state != GameState::Unconfigured {
            return Err(GameMasterError::LateRegistration);
        }
        if self.teams.len() >= TEAM_COUNT {
            return Err(GameMasterError::TooManyTeams(TEAM_COUNT));
        }

        let id = team_id(self.teams.len());
        self.teams.push(RegisteredTeam {
            team: Box::new(team),
            name,
        });
        debug!(team = id.get(), "registered team");
        Ok(id)
    }

    /// Adds a viewer.
    ///
    /// The [`Viewer`] bound is the only check made here. A viewer that keeps
    /// the default [`Viewer::observe`] registers fine and fails with
    /// [`ViewerError::NotImplemented`] on the first turn it is shown.
    ///
    /// A viewer added after setup receives its initial snapshot immediately.
    ///
    /// # Errors
    ///
    /// Returns [`GameMasterError::LateRegistration`] once play has started
    /// and [`GameMasterError::Viewer`] when the viewer refuses its snapshot.
    pub fn register_viewer<V>(&mut self, viewer: V) -> Result<(), GameMasterError>
    where
        V: Viewer + 'static,
    {
        let mut viewer: Box<dyn Viewer> = Box::new(viewer);
        match self.state {
            GameState::Unconfigured => {}
            GameState::Initialized => viewer.set_initial(self.universe.clone())?,
            GameState::Running | GameState::Finished => {
                return Err(GameMasterError::LateRegistration)
            }
        }
        self.viewers.push(viewer);
        Ok(())
    }

    /// Names the teams and hands every collaborator its initial snapshot.
    ///
    /// Calling it again once set up has no effect.
    ///
    /// # Errors
    ///
    /// Returns [`GameMasterError::MissingTeams`] when a team slot is empty,
    /// or the first failure reported by a team or viewer.
    pub fn set_initial(&mut self) -> Result<(), GameMasterError> {
        if self.state != GameState::Unconfigured {
            return Ok(());
        }
        self.require_teams()?;

        let mut events = Vec::new();
        for (index, registered) in self.teams.iter().enumerate() {
            if let Some(name) = &registered.name {
                world::apply(
                    &mut self.universe,
                    Command::NameTeam {
                        team: team_id(index),
                        name: name.clone(),
                    },
                    &mut events,
                );
            }
        }

        for (index, registered) in self.teams.iter_mut().enumerate() {
            let team = team_id(index);
            registered
                .team
                .set_initial(team, self.universe.clone())
                .map_err(|source| GameMasterError::Player { team, source })?;
        }
        for viewer in &mut self.viewers {
            viewer.set_initial(self.universe.clone())?;
        }

        self.state = GameState::Initialized;
        info!(
            bots = self.universe.bots().len(),
            max_rounds = self.max_rounds,
            noise = self.noiser.is_some(),
            "game set up"
        );
        Ok(())
    }

    /// Plays every turn of `round`, stopping early when the game ends.
    ///
    /// # Errors
    ///
    /// Returns [`GameMasterError::GameFinished`] once decided,
    /// [`GameMasterError::RoundOutOfOrder`] when `round` is not the current
    /// round, or the first failure reported by a collaborator.
    pub fn play_round(&mut self, round: u32) -> Result<(), GameMasterError> {
        if self.state == GameState::Finished || self.universe.is_finished() {
            return Err(GameMasterError::GameFinished);
        }
        self.set_initial()?;
        let expected = self.universe.round();
        if round != expected {
            return Err(GameMasterError::RoundOutOfOrder {
                expected,
                requested: round,
            });
        }

        self.state = GameState::Running;
        let bots: Vec<BotId> = self.universe.bots().iter().map(|bot| bot.id()).collect();
        for bot in bots {
            self.play_turn(round, bot)?;
            if self.universe.is_finished() {
                break;
            }
        }
        Ok(())
    }

    /// Plays rounds until the game has an outcome.
    ///
    /// # Errors
    ///
    /// Returns [`GameMasterError::MissingTeams`] before any round when a team
    /// slot is empty, or the first failure reported by a collaborator.
    pub fn play(&mut self) -> Result<Outcome, GameMasterError> {
        self.require_teams()?;
        self.set_initial()?;

        loop {
            if let Some(outcome) = self.universe.outcome() {
                return Ok(outcome);
            }
            self.play_round(self.universe.round())?;
        }
    }

    fn require_teams(&self) -> Result<(), GameMasterError> {
        if self.teams.len() < TEAM_COUNT {
            return Err(GameMasterError::MissingTeams {
                registered: self.teams.len(),
                required: TEAM_COUNT,
            });
        }
        Ok(())
    }

    fn play_turn(&mut self, round: u32, bot: BotId) -> Result<(), GameMasterError> {
        let team = team_for_bot(bot);
        let snapshot = match &self.noiser {
            Some(noiser) => noiser
                .apply_noise(self.universe.clone(), team, &mut self.rng)
                .map_err(GameMasterError::Noise)?,
            None => self.universe.clone(),
        };

        let Some(registered) = self.teams.get_mut(team.index()) else {
            return Err(GameMasterError::MissingTeams {
                registered: self.teams.len(),
                required: TEAM_COUNT,
            });
        };
        let direction = registered.team.get_move(bot, snapshot).map_err(|source| {
            warn!(bot = bot.get(), %source, "player failed");
            GameMasterError::Player { team, source }
        })?;
        debug!(round, bot = bot.get(), %direction, "turn");

        let mut events = Vec::new();
        world::apply(
            &mut self.universe,
            Command::MoveBot { bot, direction },
            &mut events,
        );
        if events
            .iter()
            .any(|event| matches!(event, Event::MoveRejected { .. }))
        {
            warn!(bot = bot.get(), %direction, "illegal move replaced by stop");
        }

        let last_turn = bot.index() + 1 == self.universe.bots().len();
        if last_turn && !self.universe.is_finished() {
            world::apply(&mut self.universe, Command::AdvanceRound, &mut events);
            if self.universe.round() >= self.max_rounds {
                world::apply(&mut self.universe, Command::ConcludeGame, &mut events);
            }
        }

        for viewer in &mut self.viewers {
            viewer
                .observe(round, bot.get(), self.universe.clone(), events.clone())
                .map_err(|error| {
                    warn!(%error, "viewer failed");
                    error
                })?;
        }

        if let Some(outcome) = self.universe.outcome() {
            self.state = GameState::Finished;
            info!(?outcome, scores = ?world::query::scores(&self.universe), "game over");
        }
        Ok(())
    }
}

impl std::fmt::Debug for GameMaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameMaster")
            .field("universe", &self.universe)
            .field("teams", &self.teams.len())
            .field("viewers", &self.viewers.len())
            .field("max_rounds", &self.max_rounds)
            .field("state", &self.state)
            .finish()
    }
}

fn team_id(index: usize) -> TeamId {
    TeamId::new(u32::try_from(index).unwrap_or(u32::MAX))
}
