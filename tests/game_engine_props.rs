use broadside::{
    place_fleet_randomly, Board, Coordinate, FireOutcome, GameId, GameSession, PlayerId,
    DEFAULT_PLACEMENT_ATTEMPTS,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

fn random_board(rng: &mut SmallRng) -> Board {
    let mut board = Board::new();
    place_fleet_randomly(&mut board, rng, DEFAULT_PLACEMENT_ATTEMPTS).unwrap();
    board
}

fn random_session(seed: u64) -> (GameSession, SmallRng) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let first = random_board(&mut rng);
    let second = random_board(&mut rng);
    let session = GameSession::new(
        GameId(seed),
        (PlayerId::from("p1"), first),
        (PlayerId::from("p2"), second),
    )
    .unwrap();
    (session, rng)
}

fn aim_randomly(session: &mut GameSession, player: &PlayerId, rng: &mut SmallRng) {
    let fired = session.fired_shots(player).unwrap().clone();
    let mut open: Vec<Coordinate> = Coordinate::all().filter(|c| !fired.contains_key(c)).collect();
    open.shuffle(rng);
    let available = session.shots_available(player).unwrap();
    for coord in open.into_iter().take(available) {
        session.aim_at(player, coord).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_games_terminate_with_consistent_history(seed in any::<u64>()) {
        let (mut session, mut rng) = random_session(seed);
        let p1 = PlayerId::from("p1");
        let p2 = PlayerId::from("p2");

        let mut expected_round = 1;
        while !session.is_over() {
            prop_assert_eq!(session.round(), expected_round);
            prop_assert!(expected_round <= 100);
            aim_randomly(&mut session, &p1, &mut rng);
            aim_randomly(&mut session, &p2, &mut rng);
            prop_assert_eq!(session.fire_shots(&p1).unwrap(), FireOutcome::Waiting);
            let FireOutcome::Resolved(result) = session.fire_shots(&p2).unwrap() else {
                panic!("second fire must resolve");
            };
            prop_assert_eq!(result.number, expected_round);
            expected_round += 1;
        }

        let numbers: Vec<u32> = session.history().map(|r| r.number).collect();
        let expected: Vec<u32> = (1..expected_round).collect();
        prop_assert_eq!(numbers, expected);
        let outcome = session.outcome().unwrap();
        prop_assert!(outcome.is_game_over());
    }

    #[test]
    fn no_cell_is_fired_twice(seed in any::<u64>()) {
        let (mut session, mut rng) = random_session(seed);
        let p1 = PlayerId::from("p1");
        let p2 = PlayerId::from("p2");
        let mut shots_reported = 0;

        while !session.is_over() {
            aim_randomly(&mut session, &p1, &mut rng);
            aim_randomly(&mut session, &p2, &mut rng);
            session.fire_shots(&p2).unwrap();
            if let FireOutcome::Resolved(result) = session.fire_shots(&p1).unwrap() {
                shots_reported += result.report_for(&p1).unwrap().shots.len();
            }
        }
        prop_assert_eq!(session.fired_shots(&p1).unwrap().len(), shots_reported);
        let received = session.board(&p2).unwrap().shots_received().len();
        prop_assert_eq!(received, shots_reported);
    }

    #[test]
    fn shots_track_afloat_ships(seed in any::<u64>()) {
        let (mut session, mut rng) = random_session(seed);
        let p1 = PlayerId::from("p1");
        let p2 = PlayerId::from("p2");

        while !session.is_over() {
            aim_randomly(&mut session, &p1, &mut rng);
            aim_randomly(&mut session, &p2, &mut rng);
            session.fire_shots(&p1).unwrap();
            session.fire_shots(&p2).unwrap();
            for p in [&p1, &p2] {
                let board = session.board(p).unwrap();
                let afloat: usize = board
                    .placed_ships()
                    .filter(|s| !s.is_sunk())
                    .map(|s| s.kind().shots_contributed())
                    .sum();
                prop_assert_eq!(session.shots_available(p).unwrap(), afloat);
            }
        }
    }
}
