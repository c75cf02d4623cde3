//! Static and dynamic cell contents of the maze.

use maze_ctf_core::{Direction, Position, PositionError, Tag};

/// Neighbour probing order used by every traversal over the maze.
pub const NEIGHBOR_ORDER: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    Wall,
    Free,
    Food,
}

/// Dense grid of walls, free cells and food stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Maze {
    /// Creates a maze of the given dimensions where every cell is a wall.
    #[must_use]
    pub fn walled(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![Cell::Wall; capacity],
        }
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the position lies within the maze bounds.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x() < self.width && position.y() < self.height
    }

    /// Positions carrying `tag`, in row-major order.
    #[must_use]
    pub fn pos_of(&self, tag: Tag) -> Vec<Position> {
        self.positions()
            .filter(|position| {
                self.index(*position)
                    .map_or(false, |index| cell_has(self.cells[index], tag))
            })
            .collect()
    }

    /// Reports whether `position` carries `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::OutOfBounds`] when the position lies outside the maze.
    pub fn has_at(&self, tag: Tag, position: Position) -> Result<bool, PositionError> {
        let index = self
            .index(position)
            .ok_or(PositionError::OutOfBounds(position))?;
        Ok(cell_has(self.cells[index], tag))
    }

    /// Reports whether a bot may stand on `position`.
    #[must_use]
    pub fn is_free(&self, position: Position) -> bool {
        self.index(position)
            .map_or(false, |index| self.cells[index] != Cell::Wall)
    }

    /// Verifies that `position` is an in-bounds, non-wall cell.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::OutOfBounds`] or [`PositionError::Wall`].
    pub fn ensure_free(&self, position: Position) -> Result<(), PositionError> {
        match self.has_at(Tag::Wall, position)? {
            true => Err(PositionError::Wall(position)),
            false => Ok(()),
        }
    }

    /// Free cells orthogonally adjacent to `position`, probed north, east, south, west.
    pub fn free_neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        NEIGHBOR_ORDER
            .into_iter()
            .filter_map(move |direction| position.step(direction))
            .filter(move |neighbor| self.is_free(*neighbor))
    }

    /// Overwrites the content of a cell.
    ///
    /// [`Tag::Free`] clears food, [`Tag::Food`] makes the cell free and adds food.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::OutOfBounds`] when the position lies outside the maze.
    pub fn set(&mut self, position: Position, tag: Tag) -> Result<(), PositionError> {
        let index = self
            .index(position)
            .ok_or(PositionError::OutOfBounds(position))?;
        self.cells[index] = match tag {
            Tag::Wall => Cell::Wall,
            Tag::Free => Cell::Free,
            Tag::Food => Cell::Food,
        };
        Ok(())
    }

    /// Removes food from the cell, reporting whether any was present.
    pub(crate) fn take_food(&mut self, position: Position) -> bool {
        match self.index(position) {
            Some(index) if self.cells[index] == Cell::Food => {
                self.cells[index] = Cell::Free;
                true
            }
            _ => false,
        }
    }

    /// Every position of the maze in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Row-major offset of the position, if it lies within the maze.
    #[must_use]
    pub fn index(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Number of cells in the maze.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

fn cell_has(cell: Cell, tag: Tag) -> bool {
    match tag {
        Tag::Wall => cell == Cell::Wall,
        Tag::Free => cell != Cell::Wall,
        Tag::Food => cell == Cell::Food,
    }
}
