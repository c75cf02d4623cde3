//! Conversion between the ASCII layout format and maze state.
//!
//! A layout is a rectangular grid with one character per cell: `#` for walls,
//! `.` for food, a space for free cells and a decimal digit for the bot with
//! that identifier. Surrounding whitespace on every line and blank lines are
//! ignored so layouts can be indented inside source code.

use maze_ctf_core::{BotId, Position, Tag};
use thiserror::Error;

use crate::Maze;

const WALL: char = '#';
const FOOD: char = '.';
const FREE: char = ' ';

/// Largest number of bots a layout can describe with single digits.
pub const MAX_BOTS: usize = 10;

/// Reasons a layout description is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout contained no rows.
    #[error("layout is empty")]
    Empty,
    /// A row differs in length from the first row.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: u32,
        /// Width established by the first row.
        expected: u32,
        /// Width of the offending row.
        found: u32,
    },
    /// A character outside the layout alphabet was found.
    #[error("unknown layout character {character:?} at {position}")]
    UnknownCharacter {
        /// Character that was not understood.
        character: char,
        /// Cell holding the character.
        position: Position,
    },
    /// A border cell is not a wall.
    #[error("border cell {0} is not a wall")]
    OpenBorder(Position),
    /// A bot identifier below the requested bot count never appears.
    #[error("{0} is missing from the layout")]
    MissingBot(BotId),
    /// A bot identifier appears more than once.
    #[error("{0} appears more than once in the layout")]
    DuplicateBot(BotId),
    /// The requested bot count cannot be expressed or split into two teams.
    #[error("unsupported bot count {0}, expected between 2 and {MAX_BOTS}")]
    UnsupportedBotCount(usize),
}

/// Maze and bot start positions read from a layout.
#[derive(Clone, Debug)]
pub(crate) struct ParsedLayout {
    pub(crate) maze: Maze,
    pub(crate) bots: Vec<Position>,
}

/// Parses a layout, keeping the first `bot_count` bots.
///
/// Digits naming bots at or beyond `bot_count` are read as free cells.
pub(crate) fn parse(text: &str, bot_count: usize) -> Result<ParsedLayout, LayoutError> {
    if !(2..=MAX_BOTS).contains(&bot_count) {
        return Err(LayoutError::UnsupportedBotCount(bot_count));
    }

    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let Some(first) = rows.first() else {
        return Err(LayoutError::Empty);
    };

    let width = to_u32(first.chars().count());
    let height = to_u32(rows.len());
    let mut maze = Maze::walled(width, height);
    let mut bots: Vec<Option<Position>> = vec![None; bot_count];

    for (y, row) in (0..height).zip(rows.iter()) {
        let found = to_u32(row.chars().count());
        if found != width {
            return Err(LayoutError::RaggedRow {
                row: y,
                expected: width,
                found,
            });
        }

        for (x, character) in (0..width).zip(row.chars()) {
            let position = Position::new(x, y);
            let tag = match character {
                WALL => Tag::Wall,
                FOOD => Tag::Food,
                FREE => Tag::Free,
                digit if digit.is_ascii_digit() => {
                    let id = digit.to_digit(10).unwrap_or_default();
                    if let Some(slot) = bots.get_mut(id as usize) {
                        if slot.is_some() {
                            return Err(LayoutError::DuplicateBot(BotId::new(id)));
                        }
                        *slot = Some(position);
                    }
                    Tag::Free
                }
                other => {
                    return Err(LayoutError::UnknownCharacter {
                        character: other,
                        position,
                    })
                }
            };

            let on_border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
            if on_border && tag != Tag::Wall {
                return Err(LayoutError::OpenBorder(position));
            }

            // x < width and y < height, so the write is always in bounds.
            let _ = maze.set(position, tag);
        }
    }

    let bots = bots
        .into_iter()
        .enumerate()
        .map(|(id, slot)| slot.ok_or(LayoutError::MissingBot(BotId::new(to_u32(id)))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParsedLayout { maze, bots })
}

/// Renders the maze with bots drawn on top of the cells they occupy.
///
/// When bots share a cell the lowest identifier is drawn. Rows are separated
/// by newlines without a trailing newline.
pub(crate) fn render(maze: &Maze, bots: &[(BotId, Position)]) -> String {
    let width = usize::try_from(maze.width()).unwrap_or(0);
    let mut rendered = String::with_capacity(maze.cell_count() + maze.height() as usize);

    for (index, position) in maze.positions().enumerate() {
        if index > 0 && width > 0 && index % width == 0 {
            rendered.push('\n');
        }

        let occupant = bots
            .iter()
            .filter(|(_, bot_position)| *bot_position == position)
            .map(|(id, _)| *id)
            .min();

        let character = match occupant {
            Some(id) => char::from_digit(id.get(), 10).unwrap_or('?'),
            None if maze.has_at(Tag::Wall, position) == Ok(true) => WALL,
            None if maze.has_at(Tag::Food, position) == Ok(true) => FOOD,
            None => FREE,
        };
        rendered.push(character);
    }

    rendered
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
