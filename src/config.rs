use core::time::Duration;

use crate::ship::{ShipKind, ShipSpec};

pub const BOARD_SIZE: u8 = 10;
pub const NUM_SHIPS: usize = 5;

/// Fleet catalog, indexed by `ShipKind::index`.
pub const FLEET: [ShipSpec; NUM_SHIPS] = [
    ShipSpec::new(ShipKind::Carrier, "Carrier", 5, 3, 'A'),
    ShipSpec::new(ShipKind::Battleship, "Battleship", 4, 2, 'B'),
    ShipSpec::new(ShipKind::Cruiser, "Cruiser", 3, 1, 'C'),
    ShipSpec::new(ShipKind::Submarine, "Submarine", 3, 1, 'S'),
    ShipSpec::new(ShipKind::Destroyer, "Destroyer", 2, 1, 'D'),
];

/// Total number of ship segments in a complete fleet.
pub const TOTAL_SHIP_CELLS: usize = 5 + 4 + 3 + 3 + 2;

/// Default cap on random placement attempts per ship.
pub const DEFAULT_PLACEMENT_ATTEMPTS: usize = 200;

/// Default long-poll timeout for lobby observers.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime settings shared by the service layer and the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How long `Lobby::wait_for_change` callers block before receiving the current snapshot.
    pub poll_timeout: Duration,
    /// Attempts per ship before the auto-placement helper starts the fleet over.
    pub placement_attempts: usize,
    /// Fixed RNG seed for reproducible bot games.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
            seed: None,
        }
    }
}
