//! Ship catalog and placed ships.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::fmt;

use crate::config::FLEET;
use crate::grid::Coordinate;

/// The five kinds of ship in a fleet. A board holds at most one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShipKind {
    Carrier,
    Battleship,
    Cruiser,
    Submarine,
    Destroyer,
}

impl ShipKind {
    pub const ALL: [ShipKind; 5] = [
        ShipKind::Carrier,
        ShipKind::Battleship,
        ShipKind::Cruiser,
        ShipKind::Submarine,
        ShipKind::Destroyer,
    ];

    /// Position in `FLEET` and in per-board ship arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn spec(self) -> ShipSpec {
        FLEET[self.index()]
    }

    pub const fn length(self) -> usize {
        self.spec().length
    }

    /// Shots this ship grants its owner each round while afloat.
    pub const fn shots_contributed(self) -> usize {
        self.spec().shots
    }

    /// Single-letter display code.
    pub const fn code(self) -> char {
        self.spec().code
    }

    pub const fn name(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for ShipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Constant catalog entry for one ship kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipSpec {
    kind: ShipKind,
    name: &'static str,
    length: usize,
    shots: usize,
    code: char,
}

impl ShipSpec {
    pub const fn new(
        kind: ShipKind,
        name: &'static str,
        length: usize,
        shots: usize,
        code: char,
    ) -> Self {
        Self {
            kind,
            name,
            length,
            shots,
            code,
        }
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }
}

/// A ship on a board: its ordered cells and the cells hit so far.
#[derive(Clone, PartialEq, Eq)]
pub struct Ship {
    kind: ShipKind,
    cells: Vec<Coordinate>,
    hits: BTreeSet<Coordinate>,
}

impl Ship {
    pub(crate) fn new(kind: ShipKind, cells: Vec<Coordinate>) -> Self {
        debug_assert_eq!(cells.len(), kind.length());
        Self {
            kind,
            cells,
            hits: BTreeSet::new(),
        }
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    /// Occupied cells in line order from the start cell.
    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    pub fn hits(&self) -> &BTreeSet<Coordinate> {
        &self.hits
    }

    pub fn occupies(&self, coord: Coordinate) -> bool {
        self.cells.contains(&coord)
    }

    /// Sunk once every cell has been hit.
    pub fn is_sunk(&self) -> bool {
        self.hits.len() == self.kind.length()
    }

    /// Mark `coord` as hit. Returns `true` only for the hit that sinks the ship.
    pub(crate) fn record_hit(&mut self, coord: Coordinate) -> bool {
        if !self.occupies(coord) {
            return false;
        }
        let was_sunk = self.is_sunk();
        self.hits.insert(coord);
        !was_sunk && self.is_sunk()
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ kind: {}, cells: {:?}, hits: {} }}",
            self.kind,
            self.cells,
            self.hits.len(),
        )
    }
}
