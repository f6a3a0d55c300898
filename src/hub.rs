#![cfg(feature = "std")]

//! Process-wide service object: the lobby, boards being set up, running games
//! and finished games.
//!
//! Construct one `GameHub` at start-up and share it by `Arc`. The directory
//! lock only guards the maps; each running session has its own mutex, so
//! moves in one game never wait on another. The directory lock is never
//! taken while a session lock is held.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use thiserror::Error;

use crate::board::{Board, PlacedShipView};
use crate::common::{GameplayError, PlacementError, SessionError};
use crate::config::Config;
use crate::grid::{Coordinate, Orientation};
use crate::lobby::{Lobby, LobbyError};
use crate::placement::place_fleet_randomly;
use crate::player::PlayerId;
use crate::round::FireOutcome;
use crate::session::{GameId, GameSession};
use crate::ship::ShipKind;
use crate::snapshot::{FinishedGame, SessionSnapshot};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error(transparent)]
    Lobby(#[from] LobbyError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Gameplay(#[from] GameplayError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("player {0} has no opponent")]
    NotPaired(PlayerId),
    #[error("player {0} is already in a running game")]
    AlreadyInGame(PlayerId),
    #[error("player {0} is not in a running game")]
    NotInGame(PlayerId),
    #[error("{0} not found")]
    GameNotFound(GameId),
}

#[derive(Debug, Default)]
struct Setup {
    board: Board,
    ready: bool,
}

#[derive(Debug, Default)]
struct Directory {
    setups: HashMap<PlayerId, Setup>,
    active: HashMap<GameId, Arc<Mutex<GameSession>>>,
    by_player: HashMap<PlayerId, GameId>,
    finished: HashMap<GameId, FinishedGame>,
    last_game: HashMap<PlayerId, GameId>,
}

pub struct GameHub {
    config: Config,
    lobby: Lobby,
    directory: Mutex<Directory>,
    next_game: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl GameHub {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            lobby: Lobby::new(),
            directory: Mutex::new(Directory::default()),
            next_game: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    /// Run `op` on `player`'s setup board, after checking they are paired and not playing.
    fn with_setup<R>(
        &self,
        player: &PlayerId,
        op: impl FnOnce(&mut Board) -> Result<R, HubError>,
    ) -> Result<R, HubError> {
        if self.lobby.get_opponent(player).is_none() {
            return Err(HubError::NotPaired(player.clone()));
        }
        let mut dir = lock(&self.directory);
        if dir.by_player.contains_key(player) {
            return Err(HubError::AlreadyInGame(player.clone()));
        }
        let setup = dir.setups.entry(player.clone()).or_default();
        let out = op(&mut setup.board)?;
        setup.ready = false;
        Ok(out)
    }

    pub fn place_ship(
        &self,
        player: &PlayerId,
        kind: ShipKind,
        start: Coordinate,
        orientation: Orientation,
    ) -> Result<(), HubError> {
        self.with_setup(player, |board| Ok(board.place_ship(kind, start, orientation)?))
    }

    pub fn remove_ship(&self, player: &PlayerId, kind: ShipKind) -> Result<bool, HubError> {
        self.with_setup(player, |board| Ok(board.remove_ship(kind)))
    }

    pub fn clear_ships(&self, player: &PlayerId) -> Result<bool, HubError> {
        self.with_setup(player, |board| Ok(board.clear_all_ships()))
    }

    /// Fill the rest of `player`'s fleet at random, keeping ships already placed.
    pub fn auto_place<R: Rng>(&self, player: &PlayerId, rng: &mut R) -> Result<(), HubError> {
        let attempts = self.config.placement_attempts;
        self.with_setup(player, |board| {
            Ok(place_fleet_randomly(board, rng, attempts)?)
        })
    }

    /// Ships on `player`'s setup board, or on their board in the running game.
    pub fn placed_ships(&self, player: &PlayerId) -> Result<Vec<PlacedShipView>, HubError> {
        if let Ok(session) = self.session_of(player) {
            let guard = lock(&session);
            return Ok(guard.board(player)?.placed_ships_for_display());
        }
        let dir = lock(&self.directory);
        Ok(dir
            .setups
            .get(player)
            .map(|s| s.board.placed_ships_for_display())
            .unwrap_or_default())
    }

    /// Mark `player`'s fleet ready. Starts the game once the opponent is ready too.
    pub fn ready(&self, player: &PlayerId) -> Result<Option<GameId>, HubError> {
        let opponent = self
            .lobby
            .get_opponent(player)
            .ok_or_else(|| HubError::NotPaired(player.clone()))?;
        let mut dir = lock(&self.directory);
        if dir.by_player.contains_key(player) {
            return Err(HubError::AlreadyInGame(player.clone()));
        }
        let setup = dir.setups.entry(player.clone()).or_default();
        if !setup.board.is_fleet_complete() {
            return Err(SessionError::FleetIncomplete(player.clone()).into());
        }
        setup.ready = true;
        log::info!("{} is ready", player);

        if !dir.setups.get(&opponent).is_some_and(|s| s.ready) {
            return Ok(None);
        }
        // both entries exist: checked just above
        let (Some(theirs), Some(mine)) = (dir.setups.remove(&opponent), dir.setups.remove(player))
        else {
            return Ok(None);
        };
        let id = GameId(self.next_game.fetch_add(1, Ordering::Relaxed));
        let session = GameSession::new(
            id,
            (opponent.clone(), theirs.board),
            (player.clone(), mine.board),
        )?;
        dir.active.insert(id, Arc::new(Mutex::new(session)));
        dir.by_player.insert(opponent.clone(), id);
        dir.by_player.insert(player.clone(), id);
        dir.last_game.insert(opponent, id);
        dir.last_game.insert(player.clone(), id);
        Ok(Some(id))
    }

    fn session_of(&self, player: &PlayerId) -> Result<Arc<Mutex<GameSession>>, HubError> {
        let dir = lock(&self.directory);
        dir.by_player
            .get(player)
            .and_then(|id| dir.active.get(id))
            .cloned()
            .ok_or_else(|| HubError::NotInGame(player.clone()))
    }

    /// Run a read or aim operation against `player`'s running game.
    pub fn with_session<R>(
        &self,
        player: &PlayerId,
        op: impl FnOnce(&mut GameSession) -> Result<R, GameplayError>,
    ) -> Result<R, HubError> {
        let session = self.session_of(player)?;
        let mut guard = lock(&session);
        Ok(op(&mut guard)?)
    }

    pub fn game_id_of(&self, player: &PlayerId) -> Option<GameId> {
        lock(&self.directory).by_player.get(player).copied()
    }

    /// The most recent game `player` took part in, running or finished.
    pub fn last_game_of(&self, player: &PlayerId) -> Option<GameId> {
        lock(&self.directory).last_game.get(player).copied()
    }

    pub fn shots_available(&self, player: &PlayerId) -> Result<usize, HubError> {
        self.with_session(player, |s| s.shots_available(player))
    }

    pub fn aim_at(&self, player: &PlayerId, coord: Coordinate) -> Result<(), HubError> {
        self.with_session(player, |s| s.aim_at(player, coord))
    }

    pub fn unaim_at(&self, player: &PlayerId, coord: Coordinate) -> Result<bool, HubError> {
        self.with_session(player, |s| s.unaim_at(player, coord))
    }

    pub fn aimed_shots(&self, player: &PlayerId) -> Result<Vec<Coordinate>, HubError> {
        self.with_session(player, |s| Ok(s.aimed_shots(player)?.iter().copied().collect()))
    }

    pub fn is_waiting_for_opponent(&self, player: &PlayerId) -> Result<bool, HubError> {
        self.with_session(player, |s| s.is_waiting_for_opponent(player))
    }

    pub fn fired_shots(&self, player: &PlayerId) -> Result<Vec<(Coordinate, u32)>, HubError> {
        self.with_session(player, |s| {
            Ok(s.fired_shots(player)?.iter().map(|(c, r)| (*c, *r)).collect())
        })
    }

    pub fn current_round(&self, player: &PlayerId) -> Result<u32, HubError> {
        self.with_session(player, |s| Ok(s.round()))
    }

    /// `player`'s view of their running game; the opponent's fleet and aims stay hidden.
    pub fn session_snapshot(&self, player: &PlayerId) -> Result<SessionSnapshot, HubError> {
        self.with_session(player, |s| SessionSnapshot::for_viewer(s, player))
    }

    /// Fire `player`'s aimed shots. A game-ending resolution archives the game.
    pub fn fire_shots(&self, player: &PlayerId) -> Result<FireOutcome, HubError> {
        let session = self.session_of(player)?;
        let (outcome, finished) = {
            let mut guard = lock(&session);
            let outcome = guard.fire_shots(player)?;
            let finished = guard.is_over().then(|| FinishedGame::completed(&guard));
            (outcome, finished)
        };
        if let Some(record) = finished {
            self.archive(record);
        }
        Ok(outcome)
    }

    /// End `player`'s running game without a winner.
    pub fn abandon(&self, player: &PlayerId) -> Result<GameId, HubError> {
        let session = self.session_of(player)?;
        let record = FinishedGame::abandoned(&lock(&session), player.clone());
        let id = record.game_id;
        self.archive(record);
        Ok(id)
    }

    fn archive(&self, record: FinishedGame) {
        let players = record.players.clone();
        {
            let mut dir = lock(&self.directory);
            if dir.active.remove(&record.game_id).is_none() {
                return;
            }
            for p in &players {
                dir.by_player.remove(p);
            }
            log::info!("{} finished: {:?}", record.game_id, record.outcome);
            dir.finished.insert(record.game_id, record);
        }
        for p in &players {
            if let Err(e) = self.lobby.return_to_lobby(p) {
                log::warn!("could not return {} to the lobby: {}", p, e);
            }
        }
    }

    /// Take `player` out of the lobby. A running game is abandoned first and
    /// setup boards of both sides of the pairing are discarded.
    pub fn remove_player(&self, player: &PlayerId) -> Result<(), HubError> {
        if self.game_id_of(player).is_some() {
            self.abandon(player)?;
        }
        let opponent = self.lobby.get_opponent(player);
        self.lobby.remove_player(player)?;
        let mut dir = lock(&self.directory);
        dir.setups.remove(player);
        if let Some(opponent) = opponent {
            dir.setups.remove(&opponent);
        }
        Ok(())
    }

    pub fn finished_game(&self, id: GameId) -> Result<FinishedGame, HubError> {
        lock(&self.directory)
            .finished
            .get(&id)
            .cloned()
            .ok_or(HubError::GameNotFound(id))
    }
}
