//! Grid level data and management module.
//!
//! This module contains the [`Level`] struct and the small value types it is built from: cell
//! positions, movement directions and tiles. It also holds the built-in default level.

use std::{ffi::OsString, sync::LazyLock};

use color_eyre::eyre::{bail, eyre, OptionExt as _, Result};

/// File extension of level files, including the leading dot.
pub(crate) const LEVEL_EXTENSION: &str = ".level";

/// Largest accepted level width or height, in tiles.
pub(crate) const MAX_LEVEL_SIDE: usize = 64;

/// Cell coordinates on the level grid.
///
/// The origin is the top-left tile; `x` grows to the right and `y` grows downwards, matching the
/// order in which level rows are written in files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Position {
    /// Column index.
    pub(crate) x: u16,
    /// Row index.
    pub(crate) y: u16,
}

impl Position {
    /// Creates a position from a column and a row.
    pub(crate) const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring cell in the given direction.
    ///
    /// The result is `None` when the neighbour would fall off a grid of `width` by `height`
    /// tiles.
    pub(crate) fn step(self, direction: Direction, width: u16, height: u16) -> Option<Self> {
        let (dx, dy) = direction.offset();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;

        (x < width && y < height).then_some(Self { x, y })
    }
}

/// Movement directions on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    /// One row up.
    Up,
    /// One row down.
    Down,
    /// One column left.
    Left,
    /// One column right.
    Right,
}

impl Direction {
    /// Neighbour expansion order used by the shortest-path search.
    pub(crate) const SEARCH_ORDER: [Self; 4] = [Self::Down, Self::Right, Self::Up, Self::Left];

    /// Returns the `(dx, dy)` offset of a single step in this direction.
    pub(crate) const fn offset(self) -> (i16, i16) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Contents of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tile {
    /// A cell the player can walk on.
    Free,
    /// A static obstacle.
    Obstacle,
}

/// Level data container.
///
/// A level is a rectangular grid of tiles together with the cell the player starts on and the
/// cell the player has to reach. Levels are loaded from `.level` files or taken from the built-in
/// default, and are kept in a vector for the level menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Level {
    /// Display name of the level.
    ///
    /// This is the file name without the `.level` extension.
    pub(crate) key: String,
    /// Number of columns.
    pub(crate) width: u16,
    /// Number of rows.
    pub(crate) height: u16,
    /// Row-major tiles, `width * height` of them.
    tiles: Vec<Tile>,
    /// Cell the player starts on.
    pub(crate) start: Position,
    /// Cell the player has to reach.
    pub(crate) goal: Position,
}

impl Default for Level {
    fn default() -> Self {
        Self::parse("Default".to_owned(), *DEFAULT_LEVEL).expect("failed to parse default level")
    }
}

impl Level {
    /// Builds a new level from a file name and its text contents.
    ///
    /// The key is the file name with its `.level` extension removed.
    ///
    /// # Errors
    ///
    /// This function may return errors if:
    /// - The `OsString` cannot be converted to a string slice
    /// - The file name doesn't carry the ".level" extension
    /// - The contents are not a valid level, see [`Level::parse`]
    pub(crate) fn new(file_name: OsString, data: &str) -> Result<Self> {
        let key = file_name
            .to_str()
            .ok_or_eyre("failed to convert osstring to string slice")?
            .strip_suffix(LEVEL_EXTENSION)
            .ok_or_eyre("file name doesn't end with the level extension")?
            .to_owned();

        Self::parse(key, data)
    }

    /// Parses the text representation of a level.
    ///
    /// Each line is a row of the grid: `.` is a free tile, `#` an obstacle, `S` the start tile
    /// and `G` the goal tile. Surrounding blank lines and trailing whitespace are ignored.
    ///
    /// # Errors
    ///
    /// This function returns an error for empty input, rows of different length, unknown
    /// characters, grids larger than 64 tiles on a side, and anything but exactly one start and
    /// one goal.
    pub(crate) fn parse(key: String, data: &str) -> Result<Self> {
        let rows: Vec<&str> = data.trim().lines().map(str::trim_end).collect();

        let width = rows
            .first()
            .map(|row| row.chars().count())
            .filter(|&width| width > 0)
            .ok_or_eyre("level has no rows")?;
        let height = rows.len();

        if width > MAX_LEVEL_SIDE || height > MAX_LEVEL_SIDE {
            bail!("level is {width}x{height}, the largest supported side is {MAX_LEVEL_SIDE}");
        }

        let mut tiles = Vec::with_capacity(width * height);
        let mut start = None;
        let mut goal = None;

        for (row_idx, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                bail!("row {row_idx} has a different length than the first row");
            }

            for (col_idx, char) in row.chars().enumerate() {
                let position = Position::new(u16::try_from(col_idx)?, u16::try_from(row_idx)?);

                let tile = match char {
                    '.' => Tile::Free,
                    '#' => Tile::Obstacle,
                    'S' => {
                        if start.replace(position).is_some() {
                            bail!("level has more than one start tile");
                        }
                        Tile::Free
                    }
                    'G' => {
                        if goal.replace(position).is_some() {
                            bail!("level has more than one goal tile");
                        }
                        Tile::Free
                    }
                    other => bail!("unknown tile {other:?} at row {row_idx}, column {col_idx}"),
                };
                tiles.push(tile);
            }
        }

        Ok(Self {
            key,
            width: u16::try_from(width)?,
            height: u16::try_from(height)?,
            tiles,
            start: start.ok_or_else(|| eyre!("level has no start tile"))?,
            goal: goal.ok_or_else(|| eyre!("level has no goal tile"))?,
        })
    }

    /// Returns the tile at `position`, or `None` outside the grid.
    pub(crate) fn tile(&self, position: Position) -> Option<Tile> {
        if position.x >= self.width || position.y >= self.height {
            return None;
        }

        self.tiles
            .get(usize::from(position.y) * usize::from(self.width) + usize::from(position.x))
            .copied()
    }

    /// Checks whether the player may stand on `position`.
    pub(crate) fn is_walkable(&self, position: Position) -> bool {
        self.tile(position) == Some(Tile::Free)
    }

    /// Returns the number of cells in the grid.
    pub(crate) fn area(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Iterates over the positions of all obstacles, row by row.
    pub(crate) fn obstacles(&self) -> impl Iterator<Item = Position> + '_ {
        let width = usize::from(self.width);

        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| **tile == Tile::Obstacle)
            .filter_map(move |(idx, _)| {
                Some(Position::new(
                    u16::try_from(idx % width).ok()?,
                    u16::try_from(idx / width).ok()?,
                ))
            })
    }
}

/// Built-in 20x15 level used when no level file is chosen.
static DEFAULT_LEVEL: LazyLock<&str> = LazyLock::new(|| {
    "\
....................
.S..................
....................
...####.............
....................
....................
....................
....................
....................
....................
....................
....................
....................
..................G.
...................."
});
