use broadside::{
    Board, Cell, Coord, Observation, Orientation, PlayerId, Round, Session,
};

fn board_with(ships: &[(u8, u8, usize, Orientation)]) -> Board {
    let mut board = Board::new();
    for &(x, y, length, orientation) in ships {
        board
            .place_ship(Coord::new(x, y), length, orientation)
            .unwrap();
    }
    board
}

/// What a client does each tick: take its last known state, add new shots,
/// send everything.
fn submit(session: &mut Session, slot: PlayerId, shots: &[(u8, u8)]) -> Round {
    let mut snapshot = session.player(slot).clone();
    for &(x, y) in shots {
        snapshot.record_outgoing_shot(x, y);
    }
    session.reconcile(slot, &snapshot).unwrap()
}

fn standard_session() -> Session {
    Session::from_boards(
        board_with(&[(0, 0, 2, Orientation::Horizontal), (5, 5, 3, Orientation::Vertical)]),
        board_with(&[(0, 0, 2, Orientation::Vertical), (5, 5, 3, Orientation::Horizontal)]),
    )
}

#[test]
fn test_miss_flips_turn_and_resubmission_is_noop() {
    let mut session = standard_session();
    assert_eq!(session.current_turn(), PlayerId::Zero);

    let round = submit(&mut session, PlayerId::Zero, &[(3, 4)]);
    assert_eq!(session.current_turn(), PlayerId::One);
    assert_eq!(
        round.own.opponent_view.get(Coord::new(3, 4)),
        Some(Observation::Miss)
    );
    assert_eq!(
        round.opponent.own_board.cell(Coord::new(3, 4)),
        Some(Cell::Miss)
    );
    assert!(round.own.hits.is_empty());

    let before = session.clone();
    let again = submit(&mut session, PlayerId::Zero, &[(3, 4)]);
    assert!(again.resolved.is_empty());
    assert_eq!(session, before);
}

#[test]
fn test_hit_keeps_turn_and_win_needs_whole_fleet() {
    let mut session = standard_session();

    let round = submit(&mut session, PlayerId::Zero, &[(0, 0)]);
    assert_eq!(round.resolved.len(), 1);
    assert!(round.resolved[0].hit);
    assert_eq!(session.current_turn(), PlayerId::Zero);

    // Second hit sinks the length-2 ship at the origin.
    let round = submit(&mut session, PlayerId::Zero, &[(0, 1)]);
    assert_eq!(session.current_turn(), PlayerId::Zero);
    assert_eq!(round.own.hits, vec![Coord::new(0, 0), Coord::new(0, 1)]);
    assert!(!round.opponent.game_over);
    assert_eq!(session.winner(), None);

    // Sink the remaining ship.
    let round = submit(&mut session, PlayerId::Zero, &[(5, 5), (6, 5), (7, 5)]);
    assert!(round.opponent.game_over);
    assert!(!round.own.game_over);
    assert_eq!(round.opponent.winner, Some(PlayerId::Zero));
    assert_eq!(round.own.winner, Some(PlayerId::Zero));
    assert_eq!(session.winner(), Some(PlayerId::Zero));
}

#[test]
fn test_out_of_turn_shot_waits_for_turn() {
    let mut session = standard_session();

    // Player 1 fires while it is player 0's turn.
    let round = submit(&mut session, PlayerId::One, &[(5, 5)]);
    assert!(round.resolved.is_empty());
    assert_eq!(
        round.own.opponent_view.get(Coord::new(5, 5)),
        Some(Observation::Unknown)
    );
    assert_eq!(
        session.player(PlayerId::Zero).own_board.cell(Coord::new(5, 5)),
        Some(Cell::ShipPresent)
    );

    // Player 0 hits: turn stays, the queued shot still waits.
    submit(&mut session, PlayerId::Zero, &[(0, 0)]);
    assert_eq!(
        session.player(PlayerId::Zero).own_board.cell(Coord::new(5, 5)),
        Some(Cell::ShipPresent)
    );

    // Player 0 misses: turn passes and the queued shot resolves.
    let round = submit(&mut session, PlayerId::Zero, &[(9, 9)]);
    assert_eq!(
        round.own.own_board.cell(Coord::new(5, 5)),
        Some(Cell::Hit)
    );
    assert_eq!(
        round.opponent.opponent_view.get(Coord::new(5, 5)),
        Some(Observation::Hit)
    );
    assert_eq!(session.current_turn(), PlayerId::One);

    let round = submit(&mut session, PlayerId::One, &[]);
    assert_eq!(
        round.own.opponent_view.get(Coord::new(5, 5)),
        Some(Observation::Hit)
    );
    assert_eq!(round.own.hits, vec![Coord::new(5, 5)]);
}

#[test]
fn test_turn_is_identical_in_both_copies() {
    let mut session = standard_session();
    for (slot, shot) in [
        (PlayerId::Zero, (0, 0)),
        (PlayerId::Zero, (9, 0)),
        (PlayerId::One, (9, 9)),
        (PlayerId::Zero, (4, 4)),
    ] {
        let round = submit(&mut session, slot, &[shot]);
        assert_eq!(round.own.current_turn, session.current_turn());
        assert_eq!(round.opponent.current_turn, session.current_turn());
        for id in PlayerId::BOTH {
            assert_eq!(session.player(id).current_turn, session.current_turn());
        }
    }
}

#[test]
fn test_client_turn_claim_is_overridden() {
    let mut session = standard_session();
    let mut snapshot = session.player(PlayerId::One).clone();
    snapshot.current_turn = PlayerId::One;
    snapshot.record_outgoing_shot(0, 0);

    let round = session.reconcile(PlayerId::One, &snapshot).unwrap();
    assert!(round.resolved.is_empty());
    assert_eq!(round.own.current_turn, PlayerId::Zero);
}

#[test]
fn test_shot_list_only_grows() {
    let mut session = standard_session();
    submit(&mut session, PlayerId::Zero, &[(0, 0), (9, 9)]);

    // A stale snapshot with fewer shots does not shrink the stored list.
    let mut stale = session.player(PlayerId::Zero).clone();
    stale.shots_fired.clear();
    let round = session.reconcile(PlayerId::Zero, &stale).unwrap();
    assert_eq!(round.own.shots_fired, vec![Coord::new(0, 0), Coord::new(9, 9)]);
}

#[test]
fn test_invalid_shots_in_snapshot_ignored() {
    let mut session = standard_session();
    let mut snapshot = session.player(PlayerId::Zero).clone();
    snapshot.shots_fired = vec![Coord::new(12, 0), Coord::new(0, 0), Coord::new(0, 0)];

    let round = session.reconcile(PlayerId::Zero, &snapshot).unwrap();
    assert_eq!(round.own.shots_fired, vec![Coord::new(0, 0)]);
    assert_eq!(round.resolved.len(), 1);
}

#[test]
fn test_fleetless_board_never_loses() {
    let mut session = Session::from_boards(Board::new(), Board::new());
    let round = submit(&mut session, PlayerId::Zero, &[(1, 1)]);
    assert!(!round.own.game_over);
    assert!(!round.opponent.game_over);
    assert_eq!(session.winner(), None);
}

#[test]
fn test_game_frozen_after_win() {
    let mut session = Session::from_boards(
        board_with(&[(0, 0, 2, Orientation::Horizontal)]),
        board_with(&[(0, 0, 2, Orientation::Horizontal)]),
    );
    // Player 1 queues shots that would sink player 0.
    submit(&mut session, PlayerId::One, &[(0, 0), (1, 0)]);
    // Player 0 sinks player 1 first.
    let round = submit(&mut session, PlayerId::Zero, &[(0, 0), (1, 0), (5, 5)]);
    assert_eq!(session.winner(), Some(PlayerId::Zero));
    // The trailing shot after the win is not resolved.
    assert_eq!(round.resolved.len(), 2);
    assert_eq!(session.current_turn(), PlayerId::Zero);

    let frozen = session.clone();
    submit(&mut session, PlayerId::One, &[(3, 3)]);
    submit(&mut session, PlayerId::Zero, &[(7, 7)]);
    assert_eq!(session.winner(), Some(PlayerId::Zero));
    assert_eq!(
        session.player(PlayerId::Zero).own_board,
        frozen.player(PlayerId::Zero).own_board
    );
    assert!(session.player(PlayerId::One).game_over);
    assert!(!session.player(PlayerId::Zero).game_over);
}

#[test]
fn test_own_shots_never_touch_own_board() {
    let mut session = standard_session();
    let own_before = session.player(PlayerId::Zero).own_board.clone();
    submit(&mut session, PlayerId::Zero, &[(0, 0), (0, 1), (2, 2)]);
    assert_eq!(session.player(PlayerId::Zero).own_board, own_before);
}
