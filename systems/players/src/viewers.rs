//! Viewers that discard or print what happens in a game.

use std::io::{self, Write};

use maze_ctf_core::Event;
use maze_ctf_system_game_master::{Viewer, ViewerError};
use maze_ctf_world::{Outcome, Universe};

/// Accepts every notification and keeps nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DevNullViewer;

impl Viewer for DevNullViewer {
    fn observe(
        &mut self,
        _round: u32,
        _turn: u32,
        _universe: Universe,
        _events: Vec<Event>,
    ) -> Result<(), ViewerError> {
        Ok(())
    }
}

/// Writes a plain-text transcript of the game to a sink.
#[derive(Debug)]
pub struct AsciiViewer<W> {
    sink: W,
}

impl AsciiViewer<io::Stdout> {
    /// Creates a viewer printing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> AsciiViewer<W> {
    /// Creates a viewer writing to `sink`.
    #[must_use]
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Returns the sink, e.g. to inspect what was written.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.sink
    }

    fn write_board(&mut self, universe: &Universe) -> io::Result<()> {
        let scores: Vec<String> = universe
            .teams()
            .iter()
            .map(|team| format!("{} {}", team.name(), team.score()))
            .collect();
        writeln!(self.sink, "{}", universe.to_layout_string())?;
        writeln!(self.sink, "score: {}", scores.join(" - "))?;
        match universe.outcome() {
            Some(Outcome::Winner(team)) => {
                let name = universe.team(team).map_or("?", |team| team.name());
                writeln!(self.sink, "{name} wins")?;
            }
            Some(Outcome::Draw) => writeln!(self.sink, "draw")?,
            None => {}
        }
        self.sink.flush()
    }
}

impl<W: Write> Viewer for AsciiViewer<W> {
    fn set_initial(&mut self, universe: Universe) -> Result<(), ViewerError> {
        self.write_board(&universe).map_err(io_failure)
    }

    fn observe(
        &mut self,
        round: u32,
        turn: u32,
        universe: Universe,
        events: Vec<Event>,
    ) -> Result<(), ViewerError> {
        let mut write = || -> io::Result<()> {
            writeln!(self.sink, "round {round} turn {turn}")?;
            for event in &events {
                writeln!(self.sink, "  {}", describe(event))?;
            }
            self.write_board(&universe)
        };
        write().map_err(io_failure)
    }
}

fn io_failure(error: io::Error) -> ViewerError {
    ViewerError::failed(error.to_string())
}

fn describe(event: &Event) -> String {
    match event {
        Event::BotMoved { bot, from, to } if from == to => format!("{bot} stays at {to}"),
        Event::BotMoved { bot, from, to } => format!("{bot} moves {from} -> {to}"),
        Event::MoveRejected { bot, requested } => {
            format!("{bot} cannot move {requested}, stopping instead")
        }
        Event::FoodEaten { bot, position } => format!("{bot} eats food at {position}"),
        Event::BotDestroyed {
            bot,
            destroyed_by,
            respawn,
        } => format!("{bot} destroyed by {destroyed_by}, respawns at {respawn}"),
        Event::TeamScored { team, delta } => format!("{team} scores {delta}"),
        Event::TeamWins { team } => format!("{team} wins"),
        Event::GameDraw => "game ends in a draw".to_owned(),
    }
}
