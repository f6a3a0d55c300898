//! A two-player game: the pair of boards, the players they belong to, and the rounds.

use alloc::collections::{BTreeMap, BTreeSet};
use core::fmt;

use crate::board::Board;
use crate::common::{GameplayError, SessionError};
use crate::grid::Coordinate;
use crate::player::{PlayerId, Seat};
use crate::round::{FireOutcome, Round, RoundEngine, RoundOutcome, RoundResult};

/// Identifier of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(transparent))]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "game-{}", self.0)
    }
}

/// Per-player game API over two boards and the round engine.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: GameId,
    players: [PlayerId; 2],
    boards: [Board; 2],
    rounds: RoundEngine,
}

impl GameSession {
    /// Start a game between two players with fully placed fleets.
    pub fn new(
        id: GameId,
        first: (PlayerId, Board),
        second: (PlayerId, Board),
    ) -> Result<Self, SessionError> {
        if first.0 == second.0 {
            return Err(SessionError::SamePlayer);
        }
        for (player, board) in [&first, &second] {
            if !board.is_fleet_complete() {
                return Err(SessionError::FleetIncomplete(player.clone()));
            }
        }
        log::info!("{} started: {} vs {}", id, first.0, second.0);
        Ok(Self {
            id,
            players: [first.0, second.0],
            boards: [first.1, second.1],
            rounds: RoundEngine::new(),
        })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn players(&self) -> &[PlayerId; 2] {
        &self.players
    }

    pub fn seat_of(&self, player: &PlayerId) -> Result<Seat, GameplayError> {
        Seat::ALL
            .into_iter()
            .find(|seat| &self.players[seat.index()] == player)
            .ok_or_else(|| GameplayError::UnknownPlayer(player.clone()))
    }

    pub fn opponent_of(&self, player: &PlayerId) -> Result<&PlayerId, GameplayError> {
        let seat = self.seat_of(player)?;
        Ok(&self.players[seat.opponent().index()])
    }

    pub fn board(&self, player: &PlayerId) -> Result<&Board, GameplayError> {
        let seat = self.seat_of(player)?;
        Ok(&self.boards[seat.index()])
    }

    /// Current round number, starting at 1.
    pub fn round(&self) -> u32 {
        self.rounds.number()
    }

    pub fn current_round(&self) -> &Round {
        self.rounds.current()
    }

    pub fn shots_available(&self, player: &PlayerId) -> Result<usize, GameplayError> {
        Ok(self.board(player)?.shots_available())
    }

    pub fn aim_at(&mut self, player: &PlayerId, coord: Coordinate) -> Result<(), GameplayError> {
        let seat = self.seat_of(player)?;
        self.rounds.aim_at(seat, coord, &self.boards)
    }

    /// Drop `coord` from the aimed set. Returns whether it was aimed.
    pub fn unaim_at(
        &mut self,
        player: &PlayerId,
        coord: Coordinate,
    ) -> Result<bool, GameplayError> {
        let seat = self.seat_of(player)?;
        self.rounds.unaim_at(seat, coord)
    }

    pub fn aimed_shots(&self, player: &PlayerId) -> Result<&BTreeSet<Coordinate>, GameplayError> {
        let seat = self.seat_of(player)?;
        Ok(self.rounds.current().aimed(seat))
    }

    pub fn fire_shots(&mut self, player: &PlayerId) -> Result<FireOutcome, GameplayError> {
        let seat = self.seat_of(player)?;
        self.rounds.fire(seat, &self.players, &mut self.boards)
    }

    /// True once `player` has fired and the opponent has not.
    pub fn is_waiting_for_opponent(&self, player: &PlayerId) -> Result<bool, GameplayError> {
        let seat = self.seat_of(player)?;
        let round = self.rounds.current();
        Ok(round.has_submitted(seat) && !round.is_resolved())
    }

    /// Every coordinate `player` has fired at, with its round number.
    pub fn fired_shots(
        &self,
        player: &PlayerId,
    ) -> Result<&BTreeMap<Coordinate, u32>, GameplayError> {
        Ok(self.board(player)?.shots_fired())
    }

    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.rounds.outcome()
    }

    pub fn is_over(&self) -> bool {
        self.rounds.is_over()
    }

    pub fn history(&self) -> impl Iterator<Item = &RoundResult> {
        self.rounds.results()
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.rounds.results().last()
    }
}
