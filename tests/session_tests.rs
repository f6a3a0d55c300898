use broadside::{
    Board, Coordinate, FireOutcome, GameId, GameSession, GameplayError, Orientation, PlayerId,
    RoundOutcome, Seat, SessionError, ShipKind,
};

fn c(text: &str) -> Coordinate {
    text.parse().unwrap()
}

fn full_fleet() -> Board {
    let mut board = Board::new();
    let rows = ["A1", "C1", "E1", "G1", "I1"];
    for (kind, start) in ShipKind::ALL.into_iter().zip(rows) {
        board
            .place_ship(kind, c(start), Orientation::Horizontal)
            .unwrap();
    }
    board
}

fn ship_cells() -> Vec<Coordinate> {
    full_fleet()
        .placed_ships()
        .flat_map(|s| s.cells().to_vec())
        .collect()
}

/// Cells in the empty rows between the ships.
fn water() -> Vec<Coordinate> {
    Coordinate::all().filter(|c| c.row() % 2 == 0).collect()
}

fn players() -> (PlayerId, PlayerId) {
    (PlayerId::from("p1"), PlayerId::from("p2"))
}

fn new_session() -> GameSession {
    let (p1, p2) = players();
    GameSession::new(GameId(1), (p1, full_fleet()), (p2, full_fleet())).unwrap()
}

/// Aim as many of `targets` as the player may fire, skipping cells already fired at.
fn aim_from(session: &mut GameSession, player: &PlayerId, targets: &[Coordinate]) {
    let available = session.shots_available(player).unwrap();
    let open: Vec<Coordinate> = targets
        .iter()
        .copied()
        .filter(|t| !session.fired_shots(player).unwrap().contains_key(t))
        .take(available)
        .collect();
    for t in open {
        session.aim_at(player, t).unwrap();
    }
}

#[test]
fn test_new_rejects_bad_setups() {
    let (p1, p2) = players();
    let err = GameSession::new(GameId(1), (p1.clone(), full_fleet()), (p1.clone(), full_fleet()))
        .unwrap_err();
    assert_eq!(err, SessionError::SamePlayer);

    let mut partial = full_fleet();
    partial.remove_ship(ShipKind::Submarine);
    let err = GameSession::new(GameId(1), (p1, full_fleet()), (p2.clone(), partial)).unwrap_err();
    assert_eq!(err, SessionError::FleetIncomplete(p2));
}

#[test]
fn test_round_flow_waiting_flags() {
    let mut session = new_session();
    let (p1, p2) = players();
    assert_eq!(session.round(), 1);
    aim_from(&mut session, &p1, &water());
    aim_from(&mut session, &p2, &water());
    assert_eq!(session.aimed_shots(&p1).unwrap().len(), 8);

    assert_eq!(session.fire_shots(&p1).unwrap(), FireOutcome::Waiting);
    assert!(session.is_waiting_for_opponent(&p1).unwrap());
    assert!(!session.is_waiting_for_opponent(&p2).unwrap());

    let FireOutcome::Resolved(result) = session.fire_shots(&p2).unwrap() else {
        panic!("second fire should resolve the round");
    };
    assert_eq!(result.number, 1);
    assert_eq!(result.outcome, RoundOutcome::Continue);
    assert_eq!(session.round(), 2);
    assert!(!session.is_waiting_for_opponent(&p1).unwrap());
    assert!(!session.is_waiting_for_opponent(&p2).unwrap());
    assert!(session.aimed_shots(&p1).unwrap().is_empty());
    assert_eq!(session.fired_shots(&p1).unwrap().len(), 8);
    assert!(session.fired_shots(&p1).unwrap().values().all(|&r| r == 1));
}

#[test]
fn test_sinking_hit_in_second_round() {
    let mut session = new_session();
    let (p1, p2) = players();

    session.aim_at(&p1, c("I1")).unwrap();
    session.aim_at(&p2, c("B1")).unwrap();
    session.fire_shots(&p1).unwrap();
    let FireOutcome::Resolved(first) = session.fire_shots(&p2).unwrap() else {
        panic!("round 1 should resolve");
    };
    assert_eq!(first.report(Seat::First).player, p1);
    assert_eq!(first.report(Seat::Second).player, p2);
    let hits = &first.report(Seat::First).hits;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].kind, ShipKind::Destroyer);
    assert!(!hits[0].is_sinking_hit);
    assert!(first.report_for(&p2).unwrap().hits.is_empty());

    session.aim_at(&p1, c("I2")).unwrap();
    session.aim_at(&p2, c("B2")).unwrap();
    session.fire_shots(&p2).unwrap();
    let FireOutcome::Resolved(second) = session.fire_shots(&p1).unwrap() else {
        panic!("round 2 should resolve");
    };
    let report = second.report_for(&p1).unwrap();
    assert_eq!(report.hits.len(), 1);
    assert_eq!(report.hits[0].coordinate, c("I2"));
    assert!(report.hits[0].is_sinking_hit);
    assert_eq!(report.sunk, vec![ShipKind::Destroyer]);
    assert_eq!(session.shots_available(&p2).unwrap(), 7);
    assert_eq!(session.shots_available(&p1).unwrap(), 8);
    assert_eq!(session.history().count(), 2);
}

#[test]
fn test_aim_rules() {
    let mut session = new_session();
    let (p1, _) = players();

    session.aim_at(&p1, c("B1")).unwrap();
    // aiming twice is a no-op
    session.aim_at(&p1, c("B1")).unwrap();
    assert_eq!(session.aimed_shots(&p1).unwrap().len(), 1);

    assert!(session.unaim_at(&p1, c("B1")).unwrap());
    assert!(!session.unaim_at(&p1, c("B1")).unwrap());

    let targets = water();
    for t in &targets[..8] {
        session.aim_at(&p1, *t).unwrap();
    }
    assert_eq!(
        session.aim_at(&p1, targets[8]),
        Err(GameplayError::ShotLimitExceeded { available: 8 })
    );
    assert_eq!(session.aimed_shots(&p1).unwrap().len(), 8);
}

#[test]
fn test_fire_rules() {
    let mut session = new_session();
    let (p1, p2) = players();

    assert_eq!(session.fire_shots(&p1), Err(GameplayError::NoShotsAimed));
    session.aim_at(&p1, c("B1")).unwrap();
    session.fire_shots(&p1).unwrap();
    assert_eq!(session.fire_shots(&p1), Err(GameplayError::AlreadySubmitted));
    assert_eq!(session.aim_at(&p1, c("B2")), Err(GameplayError::ActionAfterFire));
    assert_eq!(session.unaim_at(&p1, c("B1")), Err(GameplayError::ActionAfterFire));

    session.aim_at(&p2, c("B1")).unwrap();
    session.fire_shots(&p2).unwrap();
    assert_eq!(session.aim_at(&p1, c("B1")), Err(GameplayError::AlreadyFired(c("B1"))));
}

#[test]
fn test_unknown_player() {
    let mut session = new_session();
    let stranger = PlayerId::from("stranger");
    assert_eq!(
        session.aim_at(&stranger, c("A1")),
        Err(GameplayError::UnknownPlayer(stranger.clone()))
    );
    assert!(session.fire_shots(&stranger).is_err());
    assert!(session.shots_available(&stranger).is_err());
}

#[test]
fn test_winner_and_terminal_round() {
    let mut session = new_session();
    let (p1, p2) = players();
    let targets = ship_cells();

    let mut rounds = 0;
    while !session.is_over() {
        aim_from(&mut session, &p1, &targets);
        aim_from(&mut session, &p2, &water());
        session.fire_shots(&p1).unwrap();
        session.fire_shots(&p2).unwrap();
        rounds += 1;
        assert!(rounds < 10, "game should end quickly");
    }
    assert_eq!(rounds, 3);
    assert_eq!(session.outcome(), Some(&RoundOutcome::Winner(p1.clone())));
    let last = session.last_result().unwrap();
    assert_eq!(last.winner(), Some(&p1));
    // the terminal round stays current
    assert_eq!(session.round(), 3);
    assert_eq!(session.fire_shots(&p1), Err(GameplayError::AlreadySubmitted));
    assert_eq!(session.aim_at(&p2, c("J10")), Err(GameplayError::ActionAfterFire));
}

#[test]
fn test_simultaneous_defeat_is_a_draw() {
    let mut session = new_session();
    let (p1, p2) = players();
    let targets = ship_cells();

    while !session.is_over() {
        aim_from(&mut session, &p1, &targets);
        aim_from(&mut session, &p2, &targets);
        session.fire_shots(&p2).unwrap();
        session.fire_shots(&p1).unwrap();
    }
    assert_eq!(session.outcome(), Some(&RoundOutcome::Draw));
    assert!(session.last_result().unwrap().is_draw());
    assert!(session.board(&p1).unwrap().all_sunk());
    assert!(session.board(&p2).unwrap().all_sunk());
}
