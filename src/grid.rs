//! Coordinates on the 10×10 grid, line generation and king-move adjacency.
//!
//! Rows are lettered `A`..`J` and columns numbered `1`..`10`; the canonical
//! text form is the row letter followed by the column, e.g. `"A1"` or `"J10"`.
//! A `Coordinate` can only be built for a cell inside the grid.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::bitboard::BitBoard;
use crate::common::GridError;
use crate::config::BOARD_SIZE;

/// Occupancy mask sized for the game grid.
pub type GridMask = BitBoard<u128, { BOARD_SIZE as usize }>;

const ROW_LETTERS: &[u8; BOARD_SIZE as usize] = b"ABCDEFGHIJ";

/// One cell of the grid. Ordered by row, then column.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coordinate {
    row: u8,
    col: u8,
}

impl Coordinate {
    /// Build from a 1-based row and column.
    pub fn new(row: u8, col: u8) -> Result<Self, GridError> {
        if (1..=BOARD_SIZE).contains(&row) && (1..=BOARD_SIZE).contains(&col) {
            Ok(Self { row, col })
        } else {
            Err(GridError::InvalidCoordinate)
        }
    }

    /// Build from 0-based indices, as used by `GridMask`.
    pub fn from_indices(row: usize, col: usize) -> Option<Self> {
        let row = u8::try_from(row).ok()?.checked_add(1)?;
        let col = u8::try_from(col).ok()?.checked_add(1)?;
        Self::new(row, col).ok()
    }

    /// Parse the canonical text form. Row letters are case-insensitive.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let text = text.trim();
        let mut chars = text.chars();
        let letter = chars.next().ok_or(GridError::InvalidCoordinate)?;
        let row = ROW_LETTERS
            .iter()
            .position(|&l| char::from(l) == letter.to_ascii_uppercase())
            .ok_or(GridError::InvalidCoordinate)?;
        let digits = chars.as_str();
        if digits.is_empty()
            || digits.starts_with('0')
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(GridError::InvalidCoordinate);
        }
        let col: u8 = digits.parse().map_err(|_| GridError::InvalidCoordinate)?;
        Self::new(row as u8 + 1, col)
    }

    /// 1-based row number (`A` = 1).
    pub fn row(&self) -> u8 {
        self.row
    }

    /// 1-based column number.
    pub fn col(&self) -> u8 {
        self.col
    }

    pub fn row_letter(&self) -> char {
        char::from(ROW_LETTERS[self.row_index()])
    }

    pub(crate) fn row_index(&self) -> usize {
        usize::from(self.row - 1)
    }

    pub(crate) fn col_index(&self) -> usize {
        usize::from(self.col - 1)
    }

    /// The cell `(dr, dc)` steps away, if it is still on the grid.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Self> {
        let row = i16::from(self.row) + i16::from(dr);
        let col = i16::from(self.col) + i16::from(dc);
        let row = u8::try_from(row).ok()?;
        let col = u8::try_from(col).ok()?;
        Self::new(row, col).ok()
    }

    /// Every cell of the grid in row-major order.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (1..=BOARD_SIZE).flat_map(|row| (1..=BOARD_SIZE).map(move |col| Coordinate { row, col }))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_letter(), self.col)
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Coordinate {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Coordinate::parse(s)
    }
}

#[cfg(feature = "std")]
impl serde::Serialize for Coordinate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "std")]
impl<'de> serde::Deserialize<'de> for Coordinate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = <alloc::string::String as serde::Deserialize>::deserialize(deserializer)?;
        Coordinate::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Canonical text form of a coordinate.
pub fn format(coord: Coordinate) -> alloc::string::String {
    use alloc::string::ToString;
    coord.to_string()
}

/// Axis along which a ship's cells are generated from its start cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum Orientation {
    /// Increasing column.
    Horizontal,
    /// Increasing row (towards `J`).
    Vertical,
    /// Increasing column while moving up towards row `A`.
    DiagonalAscending,
    /// Increasing column while moving down towards row `J`.
    DiagonalDescending,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Horizontal,
        Orientation::Vertical,
        Orientation::DiagonalAscending,
        Orientation::DiagonalDescending,
    ];

    /// Row and column step between consecutive cells.
    pub const fn step(self) -> (i8, i8) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
            Orientation::DiagonalAscending => (-1, 1),
            Orientation::DiagonalDescending => (1, 1),
        }
    }
}

/// `length` consecutive cells starting at `start`. Fails if any step leaves the grid.
pub fn line_from(
    start: Coordinate,
    length: usize,
    orientation: Orientation,
) -> Result<Vec<Coordinate>, GridError> {
    let (dr, dc) = orientation.step();
    let mut cells = Vec::with_capacity(length);
    let mut current = start;
    for i in 0..length {
        if i > 0 {
            current = current.offset(dr, dc).ok_or(GridError::OutOfBounds)?;
        }
        cells.push(current);
    }
    Ok(cells)
}

/// The up-to-8 king-move neighbours of `coord`.
pub fn adjacent_to(coord: Coordinate) -> BTreeSet<Coordinate> {
    let mut out = BTreeSet::new();
    for dr in -1..=1 {
        for dc in -1..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }
            if let Some(n) = coord.offset(dr, dc) {
                out.insert(n);
            }
        }
    }
    out
}

/// Union of the neighbours of every cell in `coords`, minus `coords` itself.
pub fn adjacent_to_set<'a, I>(coords: I) -> BTreeSet<Coordinate>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    coords_of(mask_of(coords).neighbours())
}

pub(crate) fn mask_of<'a, I>(coords: I) -> GridMask
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    let mut mask = GridMask::new();
    for c in coords {
        // in bounds by construction
        let _ = mask.set(c.row_index(), c.col_index());
    }
    mask
}

pub(crate) fn coords_of(mask: GridMask) -> BTreeSet<Coordinate> {
    mask.iter_set_bits()
        .filter_map(|(r, c)| Coordinate::from_indices(r, c))
        .collect()
}
