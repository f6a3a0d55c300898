#![cfg(feature = "std")]

//! Serializable views of games for renderers and the JSON writer.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::board::PlacedShipView;
use crate::common::GameplayError;
use crate::grid::Coordinate;
use crate::player::PlayerId;
use crate::round::{RoundOutcome, RoundResult};
use crate::session::{GameId, GameSession};
use crate::ship::ShipKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiredShot {
    pub coordinate: Coordinate,
    pub round: u32,
}

/// One player's side of a running game, as seen by the viewer.
///
/// For the viewer's own side everything is filled in. For the opponent only
/// sunk ships and shots from resolved rounds are shown and `aimed` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player: PlayerId,
    pub shots_available: usize,
    pub waiting_for_opponent: bool,
    pub aimed: Vec<Coordinate>,
    pub fired: Vec<FiredShot>,
    pub ships: Vec<PlacedShipView>,
    pub sunk: Vec<ShipKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub game_id: GameId,
    pub round: u32,
    pub viewer: PlayerId,
    pub players: Vec<PlayerView>,
    pub outcome: Option<RoundOutcome>,
    pub history: Vec<RoundResult>,
}

impl SessionSnapshot {
    /// The game as `viewer` is allowed to see it.
    pub fn for_viewer(session: &GameSession, viewer: &PlayerId) -> Result<Self, GameplayError> {
        session.seat_of(viewer)?;
        let players = session
            .players()
            .iter()
            .map(|id| player_view(session, id, id == viewer))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            game_id: session.id(),
            round: session.round(),
            viewer: viewer.clone(),
            players,
            outcome: session.outcome().cloned(),
            history: session.history().cloned().collect(),
        })
    }
}

fn player_view(
    session: &GameSession,
    id: &PlayerId,
    own: bool,
) -> Result<PlayerView, GameplayError> {
    let board = session.board(id)?;
    let current = session.current_round();
    // shots submitted in an unresolved round are still secret
    let revealed = |round: u32| own || round < current.number() || current.is_resolved();
    let ships: Vec<PlacedShipView> = board
        .placed_ships_for_display()
        .into_iter()
        .filter(|s| own || s.sunk)
        .collect();
    Ok(PlayerView {
        player: id.clone(),
        shots_available: board.shots_available(),
        waiting_for_opponent: session.is_waiting_for_opponent(id)?,
        aimed: if own {
            session.aimed_shots(id)?.iter().copied().collect()
        } else {
            Vec::new()
        },
        fired: board
            .shots_fired()
            .iter()
            .filter(|&(_, &round)| revealed(round))
            .map(|(&coordinate, &round)| FiredShot { coordinate, round })
            .collect(),
        sunk: ships.iter().filter(|s| s.sunk).map(|s| s.kind).collect(),
        ships,
    })
}

/// Archived record of a game that ended or was abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishedGame {
    pub game_id: GameId,
    pub players: Vec<PlayerId>,
    pub outcome: Option<RoundOutcome>,
    pub abandoned_by: Option<PlayerId>,
    pub rounds: Vec<RoundResult>,
    pub finished_at: SystemTime,
}

impl FinishedGame {
    pub fn completed(session: &GameSession) -> Self {
        Self::build(session, None)
    }

    pub fn abandoned(session: &GameSession, by: PlayerId) -> Self {
        Self::build(session, Some(by))
    }

    fn build(session: &GameSession, abandoned_by: Option<PlayerId>) -> Self {
        Self {
            game_id: session.id(),
            players: session.players().to_vec(),
            outcome: session.outcome().cloned(),
            abandoned_by,
            rounds: session.history().cloned().collect(),
            finished_at: SystemTime::now(),
        }
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        self.outcome.as_ref().and_then(RoundOutcome::winner)
    }
}
