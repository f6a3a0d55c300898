//! Per-player board: ship placement under the spacing rule plus shot bookkeeping.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::common::PlacementError;
use crate::config::NUM_SHIPS;
use crate::grid::{line_from, mask_of, Coordinate, GridMask, Orientation};
use crate::ship::{Ship, ShipKind};

/// Read-only projection of a placed ship for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedShipView {
    pub kind: ShipKind,
    pub code: char,
    pub cells: Vec<Coordinate>,
    pub sunk: bool,
}

/// Ships, occupancy mask and shot history for one player.
#[derive(Debug, Clone, Default)]
pub struct Board {
    ships: [Option<Ship>; NUM_SHIPS],
    ship_map: GridMask,
    shots_received: BTreeMap<Coordinate, u32>,
    shots_fired: BTreeMap<Coordinate, u32>,
}

impl Board {
    /// Create an empty board state (no ships placed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `kind` starting at `start`. The board is untouched on error.
    pub fn place_ship(
        &mut self,
        kind: ShipKind,
        start: Coordinate,
        orientation: Orientation,
    ) -> Result<(), PlacementError> {
        let cells = self.validate_placement(kind, start, orientation)?;
        log::info!("placed {} at {} {:?}", kind, start, orientation);
        self.ship_map |= mask_of(&cells);
        self.ships[kind.index()] = Some(Ship::new(kind, cells));
        Ok(())
    }

    /// Cells `kind` would occupy, or the reason it cannot go there.
    pub fn validate_placement(
        &self,
        kind: ShipKind,
        start: Coordinate,
        orientation: Orientation,
    ) -> Result<Vec<Coordinate>, PlacementError> {
        if self.ships[kind.index()].is_some() {
            return Err(PlacementError::AlreadyPlaced(kind));
        }
        let cells = line_from(start, kind.length(), orientation)
            .map_err(|_| PlacementError::OutOfBounds)?;
        let candidate = mask_of(&cells);
        // `kind` is not placed, so the map holds other ships only
        let occupied = self.ship_map;
        if !(candidate & occupied.dilate()).is_empty() {
            return Err(PlacementError::TooClose {
                is_overlap: !(candidate & occupied).is_empty(),
            });
        }
        Ok(cells)
    }

    /// Remove `kind` from the board. Returns whether it was placed.
    pub fn remove_ship(&mut self, kind: ShipKind) -> bool {
        if self.ships[kind.index()].take().is_none() {
            return false;
        }
        self.rebuild_map();
        true
    }

    /// Remove every ship. Returns whether anything was placed.
    pub fn clear_all_ships(&mut self) -> bool {
        let any = self.ships.iter().any(Option::is_some);
        self.ships = Default::default();
        self.ship_map.clear_all();
        any
    }

    fn rebuild_map(&mut self) {
        self.ship_map = mask_of(self.placed_ships().flat_map(|s| s.cells()));
    }

    /// Placed ships in fleet order.
    pub fn placed_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter().flatten()
    }

    pub fn ship(&self, kind: ShipKind) -> Option<&Ship> {
        self.ships[kind.index()].as_ref()
    }

    /// Whether one of every kind is on the board.
    pub fn is_fleet_complete(&self) -> bool {
        self.ships.iter().all(Option::is_some)
    }

    /// Kinds not yet placed, in fleet order.
    pub fn unplaced_kinds(&self) -> impl Iterator<Item = ShipKind> + '_ {
        ShipKind::ALL
            .into_iter()
            .filter(|kind| self.ships[kind.index()].is_none())
    }

    /// Returns `true` when every placed ship is sunk.
    pub fn all_sunk(&self) -> bool {
        self.placed_ships().all(Ship::is_sunk)
    }

    /// Shots granted this round by ships still afloat.
    pub fn shots_available(&self) -> usize {
        self.placed_ships()
            .filter(|s| !s.is_sunk())
            .map(|s| s.kind().shots_contributed())
            .sum()
    }

    pub fn record_shot_received(&mut self, coord: Coordinate, round: u32) {
        self.shots_received.insert(coord, round);
    }

    pub fn record_shot_fired(&mut self, coord: Coordinate, round: u32) {
        self.shots_fired.insert(coord, round);
    }

    /// Register a hit on `kind`. Returns `true` if this hit sank it.
    pub fn record_hit(&mut self, kind: ShipKind, coord: Coordinate, round: u32) -> bool {
        let Some(ship) = self.ships[kind.index()].as_mut() else {
            return false;
        };
        let sinking = ship.record_hit(coord);
        if sinking {
            log::info!("{} sunk at {} in round {}", kind, coord, round);
        } else {
            log::debug!("{} hit at {} in round {}", kind, coord, round);
        }
        sinking
    }

    pub fn ship_kind_at(&self, coord: Coordinate) -> Option<ShipKind> {
        if !self
            .ship_map
            .get(coord.row_index(), coord.col_index())
            .unwrap_or(false)
        {
            return None;
        }
        self.placed_ships()
            .find(|s| s.occupies(coord))
            .map(Ship::kind)
    }

    /// Whether `kind` is placed and sunk.
    pub fn is_ship_kind_sunk(&self, kind: ShipKind) -> bool {
        self.ship(kind).is_some_and(Ship::is_sunk)
    }

    /// Shots taken at this board, with the round each arrived in.
    pub fn shots_received(&self) -> &BTreeMap<Coordinate, u32> {
        &self.shots_received
    }

    /// Shots this board's owner has fired, with the round each was fired in.
    pub fn shots_fired(&self) -> &BTreeMap<Coordinate, u32> {
        &self.shots_fired
    }

    pub fn has_fired_at(&self, coord: Coordinate) -> bool {
        self.shots_fired.contains_key(&coord)
    }

    pub fn placed_ships_for_display(&self) -> Vec<PlacedShipView> {
        self.placed_ships()
            .map(|s| PlacedShipView {
                kind: s.kind(),
                code: s.kind().code(),
                cells: s.cells().to_vec(),
                sunk: s.is_sunk(),
            })
            .collect()
    }
}
