#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod bitboard;
mod board;
mod common;
mod config;
pub mod grid;
#[cfg(feature = "std")]
mod hub;
#[cfg(feature = "std")]
pub mod lobby;
#[cfg(feature = "std")]
mod logging;
pub mod placement;
mod player;
pub mod round;
mod session;
mod ship;
#[cfg(feature = "std")]
pub mod snapshot;

pub use bitboard::{BitBoard, BitBoardError};
pub use board::*;
pub use common::*;
pub use config::*;
pub use grid::{Coordinate, GridMask, Orientation};
#[cfg(feature = "std")]
pub use hub::{GameHub, HubError};
#[cfg(feature = "std")]
pub use lobby::{GameRequest, Lobby, LobbyError, LobbyPlayer, LobbySnapshot, PlayerStatus};
#[cfg(feature = "std")]
pub use logging::init_logging;
pub use placement::place_fleet_randomly;
pub use player::*;
pub use round::{FireOutcome, Hit, Round, RoundEngine, RoundOutcome, RoundResult, SideReport};
pub use session::*;
pub use ship::*;
#[cfg(feature = "std")]
pub use snapshot::{FinishedGame, SessionSnapshot};
