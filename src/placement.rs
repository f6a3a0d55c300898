//! Random fleet placement for non-human players.

use alloc::vec::Vec;

use rand::Rng;

use crate::board::Board;
use crate::common::PlacementError;
use crate::config::BOARD_SIZE;
use crate::grid::{Coordinate, Orientation};
use crate::ship::ShipKind;

/// Restarts of the whole fleet before giving up.
const FLEET_RESTARTS: usize = 16;

/// Returns a random start and orientation where `kind` can be placed on `board`.
pub fn random_placement<R: Rng>(
    board: &Board,
    rng: &mut R,
    kind: ShipKind,
    attempts: usize,
) -> Result<(Coordinate, Orientation), PlacementError> {
    for _ in 0..attempts {
        let orientation = Orientation::ALL[rng.random_range(0..Orientation::ALL.len())];
        let start = Coordinate::new(
            rng.random_range(1..=BOARD_SIZE),
            rng.random_range(1..=BOARD_SIZE),
        )
        .map_err(|_| PlacementError::OutOfBounds)?;
        if board.validate_placement(kind, start, orientation).is_ok() {
            return Ok((start, orientation));
        }
    }
    Err(PlacementError::UnableToPlace(kind))
}

/// Place every missing ship on `board` at random, through `Board::place_ship`.
///
/// Ships already on the board stay where they are. If some kind cannot be
/// fitted, the ships placed by this call are lifted and the rest of the fleet
/// is placed again.
pub fn place_fleet_randomly<R: Rng>(
    board: &mut Board,
    rng: &mut R,
    attempts: usize,
) -> Result<(), PlacementError> {
    let missing: Vec<ShipKind> = board.unplaced_kinds().collect();
    let mut last_err = None;
    for _ in 0..FLEET_RESTARTS {
        match place_missing(board, rng, attempts) {
            Ok(()) => return Ok(()),
            Err(e) => {
                log::debug!("random placement restarting: {}", e);
                for &kind in &missing {
                    board.remove_ship(kind);
                }
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or(PlacementError::UnableToPlace(ShipKind::Carrier)))
}

fn place_missing<R: Rng>(
    board: &mut Board,
    rng: &mut R,
    attempts: usize,
) -> Result<(), PlacementError> {
    for kind in ShipKind::ALL {
        if board.ship(kind).is_some() {
            continue;
        }
        let (start, orientation) = random_placement(board, rng, kind, attempts)?;
        board.place_ship(kind, start, orientation)?;
    }
    Ok(())
}
