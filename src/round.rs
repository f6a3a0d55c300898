//! Simultaneous rounds: both players aim, both fire, then all shots resolve at once.
//!
//! Per player a round moves from aiming to submitted when shots are fired;
//! submission cannot be undone. When the second player fires the round
//! resolves before `fire` returns. A resolved round either ends the game or
//! is archived and replaced by a fresh round with the next number.
//!
//! Fired shots are written to the shooter's own board at submission time but
//! only applied to the opponent's board during resolution, so neither player's
//! result depends on who fired first.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::mem;

use crate::board::Board;
use crate::common::GameplayError;
use crate::grid::Coordinate;
use crate::player::{PlayerId, Seat};
use crate::ship::ShipKind;

/// A shot that struck a ship.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Hit {
    pub coordinate: Coordinate,
    pub kind: ShipKind,
    pub is_sinking_hit: bool,
}

/// What one player's volley did in a round.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct SideReport {
    pub player: PlayerId,
    pub shots: Vec<Coordinate>,
    pub hits: Vec<Hit>,
    pub sunk: Vec<ShipKind>,
}

impl SideReport {
    fn new(player: PlayerId) -> Self {
        Self {
            player,
            shots: Vec::new(),
            hits: Vec::new(),
            sunk: Vec::new(),
        }
    }
}

/// Game state after a round resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "snake_case"))]
pub enum RoundOutcome {
    Continue,
    Winner(PlayerId),
    Draw,
}

impl RoundOutcome {
    pub fn is_game_over(&self) -> bool {
        !matches!(self, RoundOutcome::Continue)
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        match self {
            RoundOutcome::Winner(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        matches!(self, RoundOutcome::Draw)
    }
}

/// Immutable record of a resolved round.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundResult {
    pub number: u32,
    pub reports: [SideReport; 2],
    pub outcome: RoundOutcome,
}

impl RoundResult {
    pub fn report(&self, seat: Seat) -> &SideReport {
        &self.reports[seat.index()]
    }

    pub fn report_for(&self, player: &PlayerId) -> Option<&SideReport> {
        self.reports.iter().find(|r| &r.player == player)
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_game_over()
    }

    pub fn winner(&self) -> Option<&PlayerId> {
        self.outcome.winner()
    }

    pub fn is_draw(&self) -> bool {
        self.outcome.is_draw()
    }
}

/// Result of a successful `fire`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FireOutcome {
    /// Recorded; the opponent has not fired yet.
    Waiting,
    /// This was the second submission and the round resolved.
    Resolved(RoundResult),
}

/// One round of aiming and firing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    number: u32,
    aimed: [BTreeSet<Coordinate>; 2],
    submitted: [bool; 2],
    result: Option<RoundResult>,
}

impl Round {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            aimed: Default::default(),
            submitted: [false; 2],
            result: None,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn aimed(&self, seat: Seat) -> &BTreeSet<Coordinate> {
        &self.aimed[seat.index()]
    }

    pub fn has_submitted(&self, seat: Seat) -> bool {
        self.submitted[seat.index()]
    }

    pub fn is_resolved(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&RoundResult> {
        self.result.as_ref()
    }

    fn aim_at(&mut self, seat: Seat, coord: Coordinate, own: &Board) -> Result<(), GameplayError> {
        let aimed = &self.aimed[seat.index()];
        if aimed.contains(&coord) {
            return Ok(());
        }
        if self.submitted[seat.index()] {
            return Err(GameplayError::ActionAfterFire);
        }
        let available = own.shots_available();
        if aimed.len() >= available {
            return Err(GameplayError::ShotLimitExceeded { available });
        }
        if own.has_fired_at(coord) {
            return Err(GameplayError::AlreadyFired(coord));
        }
        self.aimed[seat.index()].insert(coord);
        Ok(())
    }

    fn unaim_at(&mut self, seat: Seat, coord: Coordinate) -> Result<bool, GameplayError> {
        if self.submitted[seat.index()] {
            return Err(GameplayError::ActionAfterFire);
        }
        Ok(self.aimed[seat.index()].remove(&coord))
    }

    /// Submit `seat`'s aimed shots; resolves the round when both have submitted.
    fn fire(
        &mut self,
        seat: Seat,
        players: &[PlayerId; 2],
        boards: &mut [Board; 2],
    ) -> Result<FireOutcome, GameplayError> {
        if self.aimed[seat.index()].is_empty() {
            return Err(GameplayError::NoShotsAimed);
        }
        if self.submitted[seat.index()] {
            return Err(GameplayError::AlreadySubmitted);
        }
        self.submitted[seat.index()] = true;
        let own = &mut boards[seat.index()];
        for &coord in &self.aimed[seat.index()] {
            own.record_shot_fired(coord, self.number);
        }
        log::info!(
            "{} fired {} shots in round {}",
            players[seat.index()],
            self.aimed[seat.index()].len(),
            self.number
        );
        if self.submitted.iter().all(|&s| s) {
            Ok(FireOutcome::Resolved(self.resolve(players, boards)))
        } else {
            Ok(FireOutcome::Waiting)
        }
    }

    fn resolve(&mut self, players: &[PlayerId; 2], boards: &mut [Board; 2]) -> RoundResult {
        let number = self.number;
        let aimed = &self.aimed;
        let reports = Seat::ALL.map(|attacker| {
            let defender = &mut boards[attacker.opponent().index()];
            let mut report = SideReport::new(players[attacker.index()].clone());
            for &coord in &aimed[attacker.index()] {
                defender.record_shot_received(coord, number);
                report.shots.push(coord);
                let Some(kind) = defender.ship_kind_at(coord) else {
                    continue;
                };
                let is_sinking_hit = defender.record_hit(kind, coord, number);
                report.hits.push(Hit {
                    coordinate: coord,
                    kind,
                    is_sinking_hit,
                });
                if is_sinking_hit {
                    report.sunk.push(kind);
                }
            }
            report
        });

        let defeated = [boards[0].all_sunk(), boards[1].all_sunk()];
        let outcome = match defeated {
            [true, true] => RoundOutcome::Draw,
            [true, false] => RoundOutcome::Winner(players[1].clone()),
            [false, true] => RoundOutcome::Winner(players[0].clone()),
            [false, false] => RoundOutcome::Continue,
        };
        log::info!(
            "round {} resolved: {} hits / {} hits, outcome {:?}",
            number,
            reports[0].hits.len(),
            reports[1].hits.len(),
            outcome
        );

        let result = RoundResult {
            number,
            reports,
            outcome,
        };
        self.result = Some(result.clone());
        result
    }
}

/// Current round plus every round resolved before it.
#[derive(Debug, Clone)]
pub struct RoundEngine {
    current: Round,
    completed: Vec<Round>,
}

impl Default for RoundEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundEngine {
    /// Start at round 1.
    pub fn new() -> Self {
        Self {
            current: Round::new(1),
            completed: Vec::new(),
        }
    }

    pub fn current(&self) -> &Round {
        &self.current
    }

    pub fn number(&self) -> u32 {
        self.current.number
    }

    /// Terminal outcome, once a round has ended the game.
    pub fn outcome(&self) -> Option<&RoundOutcome> {
        self.current
            .result()
            .map(|r| &r.outcome)
            .filter(|o| o.is_game_over())
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Every resolved round in order.
    pub fn results(&self) -> impl Iterator<Item = &RoundResult> {
        self.completed
            .iter()
            .chain(core::iter::once(&self.current))
            .filter_map(Round::result)
    }

    pub fn aim_at(
        &mut self,
        seat: Seat,
        coord: Coordinate,
        boards: &[Board; 2],
    ) -> Result<(), GameplayError> {
        self.current.aim_at(seat, coord, &boards[seat.index()])?;
        log::debug!("seat {:?} aimed at {}", seat, coord);
        Ok(())
    }

    pub fn unaim_at(&mut self, seat: Seat, coord: Coordinate) -> Result<bool, GameplayError> {
        self.current.unaim_at(seat, coord)
    }

    pub fn fire(
        &mut self,
        seat: Seat,
        players: &[PlayerId; 2],
        boards: &mut [Board; 2],
    ) -> Result<FireOutcome, GameplayError> {
        let outcome = self.current.fire(seat, players, boards)?;
        if let FireOutcome::Resolved(result) = &outcome {
            if !result.is_game_over() {
                let next = Round::new(self.current.number + 1);
                let finished = mem::replace(&mut self.current, next);
                self.completed.push(finished);
            }
        }
        Ok(outcome)
    }
}
