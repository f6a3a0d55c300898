#![cfg(feature = "std")]

//! Matchmaking directory with versioned change notification.
//!
//! Every mutation bumps `version` and publishes it on a `watch` channel while
//! the directory lock is still held, so versions are gap-free and observers
//! see them in order. Long-poll observers subscribe before comparing versions,
//! which means a change landing between the comparison and the wait still
//! wakes them.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::player::PlayerId;

/// Where a player stands in the matchmaking workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    Available,
    RequestingGame,
    PendingResponse,
    InGame,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyPlayer {
    pub id: PlayerId,
    pub name: String,
    pub status: PlayerStatus,
}

/// An outstanding invitation. At most one per receiver and one per sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRequest {
    pub sender: PlayerId,
    pub receiver: PlayerId,
    pub sent_at: SystemTime,
}

/// Consistent view of the directory at one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbySnapshot {
    pub version: u64,
    pub players: Vec<LobbyPlayer>,
    pub requests: Vec<GameRequest>,
}

impl LobbySnapshot {
    pub fn player(&self, id: &PlayerId) -> Option<&LobbyPlayer> {
        self.players.iter().find(|p| &p.id == id)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LobbyError {
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),
    #[error("player {0} is not available")]
    NotAvailable(PlayerId),
    #[error("a player cannot challenge themselves")]
    SelfRequest,
    #[error("no pending request involving {0}")]
    NoPendingRequest(PlayerId),
}

#[derive(Debug, Default)]
struct LobbyState {
    version: u64,
    players: BTreeMap<PlayerId, LobbyPlayer>,
    /// Keyed by receiver.
    requests: BTreeMap<PlayerId, GameRequest>,
    opponents: HashMap<PlayerId, PlayerId>,
    /// Sender -> the receiver who declined.
    declines: HashMap<PlayerId, PlayerId>,
}

impl LobbyState {
    fn player_mut(&mut self, id: &PlayerId) -> Result<&mut LobbyPlayer, LobbyError> {
        self.players
            .get_mut(id)
            .ok_or_else(|| LobbyError::PlayerNotFound(id.clone()))
    }

    fn set_status(&mut self, id: &PlayerId, status: PlayerStatus) {
        if let Some(p) = self.players.get_mut(id) {
            p.status = status;
        }
    }

    fn require_available(&self, id: &PlayerId) -> Result<(), LobbyError> {
        match self.players.get(id) {
            None => Err(LobbyError::PlayerNotFound(id.clone())),
            Some(p) if p.status != PlayerStatus::Available => {
                Err(LobbyError::NotAvailable(id.clone()))
            }
            Some(_) => Ok(()),
        }
    }

    fn outgoing_request(&self, sender: &PlayerId) -> Option<PlayerId> {
        self.requests
            .values()
            .find(|r| &r.sender == sender)
            .map(|r| r.receiver.clone())
    }

    /// Drop a request and return both ends to `Available`.
    fn cancel_request(&mut self, receiver: &PlayerId) -> Option<GameRequest> {
        let request = self.requests.remove(receiver)?;
        self.set_status(&request.sender, PlayerStatus::Available);
        self.set_status(&request.receiver, PlayerStatus::Available);
        Some(request)
    }

    fn snapshot(&self) -> LobbySnapshot {
        LobbySnapshot {
            version: self.version,
            players: self.players.values().cloned().collect(),
            requests: self.requests.values().cloned().collect(),
        }
    }
}

/// Process-wide player directory.
#[derive(Debug)]
pub struct Lobby {
    state: Mutex<LobbyState>,
    changes: watch::Sender<u64>,
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new()
    }
}

impl Lobby {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            state: Mutex::new(LobbyState::default()),
            changes,
        }
    }

    fn lock(&self) -> MutexGuard<'_, LobbyState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a mutation; on success bump the version and wake every waiter.
    fn mutate<R>(
        &self,
        op: impl FnOnce(&mut LobbyState) -> Result<R, LobbyError>,
    ) -> Result<R, LobbyError> {
        let mut state = self.lock();
        let out = op(&mut state)?;
        state.version += 1;
        self.changes.send_replace(state.version);
        Ok(out)
    }

    /// Register a player, or rename one already present. Returns `true` if new.
    pub fn add_player(&self, id: impl Into<PlayerId>, name: impl Into<String>) -> bool {
        let id = id.into();
        let name = name.into();
        let added = self.mutate(|state| {
            if let Some(existing) = state.players.get_mut(&id) {
                existing.name = name;
                return Ok(false);
            }
            state.players.insert(
                id.clone(),
                LobbyPlayer {
                    id: id.clone(),
                    name,
                    status: PlayerStatus::Available,
                },
            );
            Ok(true)
        });
        let added = added.unwrap_or(false);
        if added {
            log::info!("lobby: {} joined", id);
        }
        added
    }

    /// Remove a player, cancelling any request they sent or received and
    /// releasing their opponent back to `Available`.
    pub fn remove_player(&self, id: &PlayerId) -> Result<LobbyPlayer, LobbyError> {
        let removed = self.mutate(|state| {
            let removed = state
                .players
                .remove(id)
                .ok_or_else(|| LobbyError::PlayerNotFound(id.clone()))?;
            state.cancel_request(id);
            if let Some(receiver) = state.outgoing_request(id) {
                state.cancel_request(&receiver);
            }
            state.declines.remove(id);
            if let Some(counterpart) = state.opponents.remove(id) {
                state.opponents.remove(&counterpart);
                state.set_status(&counterpart, PlayerStatus::Available);
            }
            Ok(removed)
        })?;
        log::info!("lobby: {} left", id);
        Ok(removed)
    }

    pub fn send_game_request(
        &self,
        sender: &PlayerId,
        receiver: &PlayerId,
    ) -> Result<(), LobbyError> {
        let result = self.mutate(|state| {
            if sender == receiver {
                return Err(LobbyError::SelfRequest);
            }
            state.require_available(sender)?;
            state.require_available(receiver)?;
            state.requests.insert(
                receiver.clone(),
                GameRequest {
                    sender: sender.clone(),
                    receiver: receiver.clone(),
                    sent_at: SystemTime::now(),
                },
            );
            state.set_status(sender, PlayerStatus::RequestingGame);
            state.set_status(receiver, PlayerStatus::PendingResponse);
            Ok(())
        });
        match &result {
            Ok(()) => log::info!("lobby: {} challenged {}", sender, receiver),
            Err(e) => log::warn!("lobby: {} -> {} rejected: {}", sender, receiver, e),
        }
        result
    }

    /// Accept the request pending for `receiver`. Returns `(sender, receiver)`.
    pub fn accept_game_request(
        &self,
        receiver: &PlayerId,
    ) -> Result<(PlayerId, PlayerId), LobbyError> {
        let pair = self.mutate(|state| {
            let request = state
                .requests
                .remove(receiver)
                .ok_or_else(|| LobbyError::NoPendingRequest(receiver.clone()))?;
            state.set_status(&request.sender, PlayerStatus::InGame);
            state.set_status(&request.receiver, PlayerStatus::InGame);
            state
                .opponents
                .insert(request.sender.clone(), request.receiver.clone());
            state
                .opponents
                .insert(request.receiver.clone(), request.sender.clone());
            Ok((request.sender, request.receiver))
        })?;
        log::info!("lobby: {} accepted {}", pair.1, pair.0);
        Ok(pair)
    }

    /// Decline the request pending for `receiver`. Returns the sender, who is notified once.
    pub fn decline_game_request(&self, receiver: &PlayerId) -> Result<PlayerId, LobbyError> {
        let sender = self.mutate(|state| {
            let request = state
                .cancel_request(receiver)
                .ok_or_else(|| LobbyError::NoPendingRequest(receiver.clone()))?;
            state
                .declines
                .insert(request.sender.clone(), request.receiver);
            Ok(request.sender)
        })?;
        log::info!("lobby: {} declined {}", receiver, sender);
        Ok(sender)
    }

    /// Withdraw the request `sender` has outstanding. Returns the receiver.
    pub fn cancel_game_request(&self, sender: &PlayerId) -> Result<PlayerId, LobbyError> {
        let receiver = self.mutate(|state| {
            let receiver = state
                .outgoing_request(sender)
                .ok_or_else(|| LobbyError::NoPendingRequest(sender.clone()))?;
            state.cancel_request(&receiver);
            Ok(receiver)
        })?;
        log::info!("lobby: {} withdrew request to {}", sender, receiver);
        Ok(receiver)
    }

    /// Put an in-game player back into the pool and forget their pairing.
    pub fn return_to_lobby(&self, id: &PlayerId) -> Result<(), LobbyError> {
        self.mutate(|state| {
            let player = state.player_mut(id)?;
            if player.status == PlayerStatus::InGame {
                player.status = PlayerStatus::Available;
            }
            state.opponents.remove(id);
            Ok(())
        })
    }

    pub fn get_opponent(&self, id: &PlayerId) -> Option<PlayerId> {
        self.lock().opponents.get(id).cloned()
    }

    /// Who declined `sender`'s last request. Returned once, then cleared.
    pub fn get_decline_notification(&self, sender: &PlayerId) -> Option<PlayerId> {
        self.lock().declines.remove(sender)
    }

    pub fn player(&self, id: &PlayerId) -> Option<LobbyPlayer> {
        self.lock().players.get(id).cloned()
    }

    pub fn get_version(&self) -> u64 {
        self.lock().version
    }

    pub fn snapshot(&self) -> LobbySnapshot {
        self.lock().snapshot()
    }

    /// Long-poll: return at once if the version moved past `since`, otherwise
    /// wait for the next mutation or `timeout`. Either way the current snapshot
    /// is returned; a timeout is not an error.
    pub async fn wait_for_change(&self, since: u64, timeout: Duration) -> LobbySnapshot {
        let mut rx = self.changes.subscribe();
        if *rx.borrow_and_update() != since {
            return self.snapshot();
        }
        if tokio::time::timeout(timeout, rx.changed()).await.is_err() {
            log::debug!("lobby: wait at version {} timed out", since);
        }
        self.snapshot()
    }
}
