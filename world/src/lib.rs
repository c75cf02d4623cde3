#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative universe state management for Maze CTF.
//!
//! The [`Universe`] owns the maze, the bots and the teams. It is mutated only
//! through [`apply`], which runs the capture-the-flag rules and reports what
//! happened as [`Event`] values. Cloning a universe produces a fully
//! independent copy, which is how snapshots are handed to untrusted players
//! and viewers.

use std::fmt;

use maze_ctf_core::{BotId, Command, Event, Position, TeamId};

mod layout;
pub mod layouts;
mod maze;
mod rules;

pub use layout::{LayoutError, MAX_BOTS};
pub use maze::{Maze, NEIGHBOR_ORDER};

/// Number of teams competing in every game.
pub const TEAM_COUNT: usize = 2;

/// Contiguous band of columns that is home territory for one team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Zone {
    first_column: u32,
    end_column: u32,
}

impl Zone {
    /// Creates a zone covering columns `first_column..end_column`.
    #[must_use]
    pub const fn new(first_column: u32, end_column: u32) -> Self {
        Self {
            first_column,
            end_column,
        }
    }

    /// First column belonging to the zone.
    #[must_use]
    pub const fn first_column(&self) -> u32 {
        self.first_column
    }

    /// Column just past the zone.
    #[must_use]
    pub const fn end_column(&self) -> u32 {
        self.end_column
    }

    /// Reports whether the position lies inside the zone.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x() >= self.first_column && position.x() < self.end_column
    }
}

/// Single bot taking part in the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bot {
    id: BotId,
    team: TeamId,
    initial_position: Position,
    current_position: Position,
    noisy: bool,
}

impl Bot {
    /// Identifier of the bot, which is also its turn order.
    #[must_use]
    pub const fn id(&self) -> BotId {
        self.id
    }

    /// Team the bot plays for.
    #[must_use]
    pub const fn team(&self) -> TeamId {
        self.team
    }

    /// Respawn point assigned from the layout.
    #[must_use]
    pub const fn initial_position(&self) -> Position {
        self.initial_position
    }

    /// Position the bot currently reports.
    #[must_use]
    pub const fn current_position(&self) -> Position {
        self.current_position
    }

    /// Whether the reported position was perturbed by fog of war.
    #[must_use]
    pub const fn is_noisy(&self) -> bool {
        self.noisy
    }

    /// Overwrites the reported position.
    pub fn set_current_position(&mut self, position: Position) {
        self.current_position = position;
    }

    /// Marks whether the reported position is perturbed.
    pub fn set_noisy(&mut self, noisy: bool) {
        self.noisy = noisy;
    }
}

/// One of the two competing teams.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    id: TeamId,
    name: String,
    score: u32,
    bots: Vec<BotId>,
    zone: Zone,
}

impl Team {
    /// Identifier of the team.
    #[must_use]
    pub const fn id(&self) -> TeamId {
        self.id
    }

    /// Display name of the team.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Points collected so far.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Bots owned by the team in turn order.
    #[must_use]
    pub fn bots(&self) -> &[BotId] {
        &self.bots
    }

    /// Home territory of the team.
    #[must_use]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// Adds points to the score. Scores never decrease.
    pub fn award(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

/// Final result of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The team won.
    Winner(TeamId),
    /// The game ended tied.
    Draw,
}

/// Represents the authoritative Maze CTF game state.
#[derive(Clone, Debug)]
pub struct Universe {
    maze: Maze,
    bots: Vec<Bot>,
    teams: Vec<Team>,
    round: u32,
    turn: u32,
    outcome: Option<Outcome>,
}

impl Universe {
    /// Builds a universe from a layout description holding `bot_count` bots.
    ///
    /// Bots alternate between the two teams by identifier parity. Team 0 owns
    /// the left half of the maze and team 1 the right half.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] when the layout is malformed.
    pub fn from_layout(layout: &str, bot_count: usize) -> Result<Self, LayoutError> {
        let parsed = layout::parse(layout, bot_count)?;
        let width = parsed.maze.width();
        let half = width / 2;
        let zones = [Zone::new(0, half), Zone::new(half, width)];

        let bots: Vec<Bot> = parsed
            .bots
            .iter()
            .enumerate()
            .map(|(index, position)| {
                let id = BotId::new(u32::try_from(index).unwrap_or(u32::MAX));
                Bot {
                    id,
                    team: team_for_bot(id),
                    initial_position: *position,
                    current_position: *position,
                    noisy: false,
                }
            })
            .collect();

        let teams = zones
            .into_iter()
            .enumerate()
            .map(|(index, zone)| {
                let id = TeamId::new(u32::try_from(index).unwrap_or(u32::MAX));
                Team {
                    id,
                    name: format!("team {index}"),
                    score: 0,
                    bots: bots
                        .iter()
                        .filter(|bot| bot.team == id)
                        .map(|bot| bot.id)
                        .collect(),
                    zone,
                }
            })
            .collect();

        Ok(Self {
            maze: parsed.maze,
            bots,
            teams,
            round: 0,
            turn: 0,
            outcome: None,
        })
    }

    /// Read-only access to the maze.
    #[must_use]
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Mutable access to the maze of this copy.
    pub fn maze_mut(&mut self) -> &mut Maze {
        &mut self.maze
    }

    /// Every bot in turn order.
    #[must_use]
    pub fn bots(&self) -> &[Bot] {
        &self.bots
    }

    /// Looks up a bot by identifier.
    #[must_use]
    pub fn bot(&self, id: BotId) -> Option<&Bot> {
        self.bots.get(id.index())
    }

    /// Mutable access to a bot of this copy.
    pub fn bot_mut(&mut self, id: BotId) -> Option<&mut Bot> {
        self.bots.get_mut(id.index())
    }

    /// Both teams in identifier order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Looks up a team by identifier.
    #[must_use]
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.get(id.index())
    }

    /// Mutable access to a team of this copy.
    pub fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.get_mut(id.index())
    }

    /// Zero-based index of the current round.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Identifier of the bot that moved last within the current round.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Result of the game, once decided.
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Reports whether the game has been decided.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Team whose home zone contains the position.
    #[must_use]
    pub fn zone_of(&self, position: Position) -> Option<TeamId> {
        self.teams
            .iter()
            .find(|team| team.zone.contains(position))
            .map(|team| team.id)
    }

    /// Reports whether the bot currently stands in enemy territory.
    ///
    /// Harvesters can eat food and are vulnerable; bots at home are
    /// destroyers and cannot be destroyed.
    #[must_use]
    pub fn is_harvester(&self, id: BotId) -> bool {
        self.bot(id).map_or(false, |bot| {
            self.team(bot.team)
                .map_or(false, |team| !team.zone.contains(bot.current_position))
        })
    }

    /// Bots currently reported at the position.
    pub fn bots_at(&self, position: Position) -> impl Iterator<Item = &Bot> + '_ {
        self.bots
            .iter()
            .filter(move |bot| bot.current_position == position)
    }

    /// Renders the universe in the layout text format.
    #[must_use]
    pub fn to_layout_string(&self) -> String {
        let bots: Vec<(BotId, Position)> = self
            .bots
            .iter()
            .map(|bot| (bot.id, bot.current_position))
            .collect();
        layout::render(&self.maze, &bots)
    }
}

/// Structural equality over maze contents, bot positions and team scores.
///
/// Team names, round counters, outcome and noise flags do not take part.
impl PartialEq for Universe {
    fn eq(&self, other: &Self) -> bool {
        self.maze == other.maze
            && self.bots.len() == other.bots.len()
            && self.bots.iter().zip(&other.bots).all(|(left, right)| {
                left.id == right.id
                    && left.team == right.team
                    && left.current_position == right.current_position
                    && left.initial_position == right.initial_position
            })
            && self.teams.len() == other.teams.len()
            && self
                .teams
                .iter()
                .zip(&other.teams)
                .all(|(left, right)| left.score == right.score)
    }
}

impl Eq for Universe {}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_layout_string())
    }
}

/// Team membership implied by a bot identifier.
#[must_use]
pub const fn team_for_bot(bot: BotId) -> TeamId {
    TeamId::new(bot.get() % TEAM_COUNT as u32)
}

/// Applies the provided command to the universe, mutating state deterministically.
pub fn apply(universe: &mut Universe, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::NameTeam { team, name } => {
            if let Some(team) = universe.team_mut(team) {
                team.name = name;
            }
        }
        Command::MoveBot { bot, direction } => universe.move_bot(bot, direction, out_events),
        Command::AdvanceRound => {
            universe.round = universe.round.saturating_add(1);
            universe.turn = 0;
        }
        Command::ConcludeGame => universe.conclude(out_events),
    }
}

/// Query functions that derive read-only views of a universe.
pub mod query {
    use maze_ctf_core::{BotId, Direction, Position, Tag, TeamId};

    use super::Universe;

    /// Food lying outside the team's home zone, i.e. food the team can eat.
    #[must_use]
    pub fn enemy_food(universe: &Universe, team: TeamId) -> Vec<Position> {
        let Some(team) = universe.team(team) else {
            return Vec::new();
        };
        universe
            .maze()
            .pos_of(Tag::Food)
            .into_iter()
            .filter(|position| !team.zone().contains(*position))
            .collect()
    }

    /// Food lying inside the team's home zone, i.e. food the team defends.
    #[must_use]
    pub fn home_food(universe: &Universe, team: TeamId) -> Vec<Position> {
        let Some(team) = universe.team(team) else {
            return Vec::new();
        };
        universe
            .maze()
            .pos_of(Tag::Food)
            .into_iter()
            .filter(|position| team.zone().contains(*position))
            .collect()
    }

    /// Directions the bot may take without being rejected, `Stop` included.
    #[must_use]
    pub fn legal_moves(universe: &Universe, bot: BotId) -> Vec<Direction> {
        let Some(bot) = universe.bot(bot) else {
            return Vec::new();
        };
        let origin = bot.current_position();
        Direction::ALL
            .into_iter()
            .filter(|direction| {
                origin
                    .step(*direction)
                    .map_or(false, |target| universe.maze().is_free(target))
            })
            .collect()
    }

    /// Scores of every team in identifier order.
    #[must_use]
    pub fn scores(universe: &Universe) -> Vec<u32> {
        universe.teams().iter().map(|team| team.score()).collect()
    }

    /// Bots belonging to teams other than `team`.
    pub fn opponents(universe: &Universe, team: TeamId) -> impl Iterator<Item = BotId> + '_ {
        universe
            .bots()
            .iter()
            .filter(move |bot| bot.team() != team)
            .map(|bot| bot.id())
    }
}
