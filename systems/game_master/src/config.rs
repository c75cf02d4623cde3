//! Game configuration assembled before a game master is created.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use maze_ctf_world::layouts;
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

/// Default number of bots on the board.
pub const DEFAULT_BOT_COUNT: usize = 4;

/// Default number of rounds before the game is decided by score.
pub const DEFAULT_MAX_ROUNDS: u32 = 3000;

/// Reasons a configuration cannot be built or resolved.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// More than one of layout text, layout name and layout file was given.
    #[error("layout text, layout name and layout file are mutually exclusive")]
    ConflictingLayoutSources,
    /// No built-in layout carries the requested name.
    #[error("unknown layout {0:?}")]
    UnknownLayout(String),
    /// The layout file could not be read.
    #[error("failed to read layout file {path}")]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// A random layout was requested but none are built in.
    #[error("no built-in layouts are available")]
    NoLayouts,
    /// A game needs at least one round.
    #[error("max_rounds must be at least 1")]
    NoRounds,
}

/// Where the layout text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutSource {
    /// Literal layout text.
    Text(String),
    /// Name of a built-in layout.
    Named(String),
    /// Path of a file holding layout text.
    File(PathBuf),
    /// A built-in layout chosen at random.
    Random,
}

impl LayoutSource {
    /// Produces the layout text, drawing from `rng` for [`LayoutSource::Random`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the named layout does not exist, the
    /// file cannot be read or no layouts are built in.
    pub fn resolve<R>(&self, rng: &mut R) -> Result<String, ConfigError>
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Named(name) => layouts::by_name(name)
                .map(str::to_owned)
                .ok_or_else(|| ConfigError::UnknownLayout(name.clone())),
            Self::File(path) => read_layout(path),
            Self::Random => layouts::names()
                .choose(rng)
                .and_then(|name| layouts::by_name(name))
                .map(str::to_owned)
                .ok_or(ConfigError::NoLayouts),
        }
    }
}

fn read_layout(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Settings for a single game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    layout: LayoutSource,
    bot_count: usize,
    max_rounds: u32,
    noise: bool,
    seed: Option<u64>,
}

impl GameConfig {
    /// Starts a builder populated with defaults.
    #[must_use]
    pub fn builder() -> GameConfigBuilder {
        GameConfigBuilder::default()
    }

    /// Source of the layout.
    #[must_use]
    pub fn layout(&self) -> &LayoutSource {
        &self.layout
    }

    /// Number of bots taken from the layout.
    #[must_use]
    pub const fn bot_count(&self) -> usize {
        self.bot_count
    }

    /// Rounds played before the game is decided by score.
    #[must_use]
    pub const fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Whether opponents out of sight are reported with noise.
    #[must_use]
    pub const fn noise(&self) -> bool {
        self.noise
    }

    /// Seed for every random choice made by the game master, if fixed.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            layout: LayoutSource::Random,
            bot_count: DEFAULT_BOT_COUNT,
            max_rounds: DEFAULT_MAX_ROUNDS,
            noise: true,
            seed: None,
        }
    }
}

/// Builder for [`GameConfig`].
#[derive(Clone, Debug)]
pub struct GameConfigBuilder {
    layout_string: Option<String>,
    layout_name: Option<String>,
    layout_file: Option<PathBuf>,
    bot_count: usize,
    max_rounds: u32,
    noise: bool,
    seed: Option<u64>,
}

impl Default for GameConfigBuilder {
    fn default() -> Self {
        let defaults = GameConfig::default();
        Self {
            layout_string: None,
            layout_name: None,
            layout_file: None,
            bot_count: defaults.bot_count,
            max_rounds: defaults.max_rounds,
            noise: defaults.noise,
            seed: defaults.seed,
        }
    }
}

impl GameConfigBuilder {
    /// Uses literal layout text.
    #[must_use]
    pub fn layout_string(mut self, layout: impl Into<String>) -> Self {
        self.layout_string = Some(layout.into());
        self
    }

    /// Uses the built-in layout with the given name.
    #[must_use]
    pub fn layout_name(mut self, name: impl Into<String>) -> Self {
        self.layout_name = Some(name.into());
        self
    }

    /// Reads the layout from a file.
    #[must_use]
    pub fn layout_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.layout_file = Some(path.into());
        self
    }

    /// Sets the number of bots taken from the layout.
    #[must_use]
    pub fn bot_count(mut self, bot_count: usize) -> Self {
        self.bot_count = bot_count;
        self
    }

    /// Sets the number of rounds before the game is decided by score.
    #[must_use]
    pub fn max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Enables or disables fog of war.
    #[must_use]
    pub fn noise(mut self, noise: bool) -> Self {
        self.noise = noise;
        self
    }

    /// Fixes the seed of the game master's random source.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConflictingLayoutSources`] when more than one
    /// layout source was given and [`ConfigError::NoRounds`] when
    /// `max_rounds` is zero.
    pub fn build(self) -> Result<GameConfig, ConfigError> {
        let layout = match (self.layout_string, self.layout_name, self.layout_file) {
            (None, None, None) => LayoutSource::Random,
            (Some(text), None, None) => LayoutSource::Text(text),
            (None, Some(name), None) => LayoutSource::Named(name),
            (None, None, Some(path)) => LayoutSource::File(path),
            _ => return Err(ConfigError::ConflictingLayoutSources),
        };
        if self.max_rounds == 0 {
            return Err(ConfigError::NoRounds);
        }

        Ok(GameConfig {
            layout,
            bot_count: self.bot_count,
            max_rounds: self.max_rounds,
            noise: self.noise,
            seed: self.seed,
        })
    }
}
