//! Error types shared by the grid, board, round and session layers.
//!
//! Every validating operation checks all of its preconditions before it
//! mutates anything, so none of these errors leave partial state behind.

use thiserror::Error;

use crate::grid::Coordinate;
use crate::player::PlayerId;
use crate::ship::ShipKind;

/// Failures while building coordinates or coordinate lines.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Text or indices do not name a cell on the 10×10 grid.
    #[error("invalid coordinate")]
    InvalidCoordinate,
    /// A generated line leaves the grid.
    #[error("line leaves the grid")]
    OutOfBounds,
}

/// Reason a ship could not be placed. The board is unchanged when returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// This kind already has a ship on the board.
    #[error("{0} is already placed")]
    AlreadyPlaced(ShipKind),
    /// The ship would extend past the edge of the grid.
    #[error("ship does not fit inside the grid")]
    OutOfBounds,
    /// The ship collides with, or touches, another ship.
    #[error("ship {} another ship", closeness(.is_overlap))]
    TooClose { is_overlap: bool },
    /// Random placement gave up.
    #[error("unable to find room for {0}")]
    UnableToPlace(ShipKind),
}

fn closeness(is_overlap: &bool) -> &'static str {
    if *is_overlap {
        "overlaps"
    } else {
        "is too close to"
    }
}

/// Reason an aim or fire action was refused. The round is unchanged when returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameplayError {
    /// Every available shot is already aimed.
    #[error("only {available} shots available this round")]
    ShotLimitExceeded { available: usize },
    /// Shots were already fired this round.
    #[error("shots already fired this round")]
    ActionAfterFire,
    /// Nothing is aimed.
    #[error("no shots aimed")]
    NoShotsAimed,
    /// The cell was fired at in an earlier round.
    #[error("already fired at {0}")]
    AlreadyFired(Coordinate),
    /// The player already submitted this round.
    #[error("shots already submitted")]
    AlreadySubmitted,
    /// The player does not belong to this game.
    #[error("player {0} is not part of this game")]
    UnknownPlayer(PlayerId),
}

/// Reasons a game session cannot be created.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("a player cannot play against themselves")]
    SamePlayer,
    #[error("player {0} has not placed a complete fleet")]
    FleetIncomplete(PlayerId),
}
