use pretty_assertions::assert_eq;
use tabiya::chess::core::Move;
use tabiya::{new_game, Error, Game, GameState, Position};

fn play_all(game: &mut Game, moves: &[&str]) -> GameState {
    let mut state = game.state();
    for notation in moves {
        state = game
            .make_move(notation)
            .unwrap_or_else(|e| panic!("{notation}: {e}"));
    }
    state
}

#[test]
fn fools_mate() {
    let mut game = new_game(None).unwrap();
    assert_eq!(
        play_all(&mut game, &["f3", "e5", "g4", "Qh4#"]),
        GameState::Checkmate
    );
    assert_eq!(game.movetext(), "1. f3 e5 2. g4 Qh4#");
    assert!(game.legal_moves().is_empty());
    assert!(matches!(
        game.make_move("a3"),
        Err(Error::GameOver(GameState::Checkmate))
    ));
    let a3 = Move::from_uci(game.position_history().nth(2).unwrap(), "a2a3").unwrap();
    assert!(matches!(game.play(&a3), Err(Error::GameOver(_))));
}

#[test]
fn back_rank_mate() {
    let mut game = new_game(Some("6k1/5ppp/8/8/8/8/5PPP/R5K1 w - - 0 1")).unwrap();
    let before = game.position().clone();
    assert_eq!(game.make_move("Ra8").unwrap(), GameState::Checkmate);
    let after = game.position().clone();

    assert_eq!(game.undo().unwrap(), &before);
    assert_eq!(game.state(), GameState::InProgress);
    assert_eq!(game.redo().unwrap(), &after);
    assert_eq!(game.state(), GameState::Checkmate);
}

#[test]
fn stalemate() {
    let mut game = new_game(Some("7k/8/6Q1/8/8/8/8/K7 w - - 0 1")).unwrap();
    assert_eq!(game.make_move("Qf7").unwrap(), GameState::Stalemate);
    assert!(game.is_over());
    assert!(GameState::Stalemate.is_draw());
    assert!(matches!(
        game.make_move("Kh7"),
        Err(Error::GameOver(GameState::Stalemate))
    ));
}

#[test]
fn insufficient_material() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1").unwrap();
    assert_eq!(game.state(), GameState::Check);
    assert_eq!(
        game.make_move("Kxd2").unwrap(),
        GameState::DrawByInsufficientMaterial
    );
    assert!(game.legal_moves().is_empty());
    assert!(matches!(game.make_move("Ke7"), Err(Error::GameOver(_))));
}

#[test]
fn fifty_move_rule() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
    assert_eq!(game.claimable_draw(), None);
    assert_eq!(game.make_move("Ra2").unwrap(), GameState::DrawByFiftyMove);
    assert_eq!(game.position().halfmove_clock(), 100);
    assert_eq!(game.claimable_draw(), Some(GameState::DrawByFiftyMove));

    // The draw is not forced.
    assert_eq!(game.make_move("Kd7").unwrap(), GameState::DrawByFiftyMove);
    assert_eq!(game.claim_draw().unwrap(), GameState::DrawByFiftyMove);
    assert!(game.legal_moves().is_empty());
    assert!(matches!(
        game.make_move("Ra7+"),
        Err(Error::GameOver(GameState::DrawByFiftyMove))
    ));

    // A pawn move or a capture resets the clock.
    let _ = game.undo().unwrap();
    let mut game = Game::from_fen("4k3/8/8/8/8/8/p7/R3K3 w - - 99 80").unwrap();
    assert_eq!(game.make_move("Rxa2").unwrap(), GameState::InProgress);
    assert_eq!(game.position().halfmove_clock(), 0);
}

#[test]
fn repetition_is_counted_along_the_current_line() {
    let mut game = Game::new();
    let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8"];
    let _ = play_all(&mut game, &shuffle);
    assert_eq!(game.repetition_count(), 2);
    assert_eq!(game.state(), GameState::InProgress);

    // Going back and forth does not add occurrences.
    for _ in 0..4 {
        let _ = game.undo().unwrap();
    }
    assert_eq!(game.repetition_count(), 1);
    for _ in 0..4 {
        let _ = game.redo().unwrap();
    }
    assert_eq!(game.repetition_count(), 2);

    assert_eq!(play_all(&mut game, &shuffle), GameState::DrawByRepetition);
    assert_eq!(game.repetition_count(), 3);
    assert!(matches!(
        game.claim_draw(),
        Ok(GameState::DrawByRepetition)
    ));
    assert!(matches!(game.claim_draw(), Err(Error::NoDrawToClaim(_))));
}

#[test]
fn claim_is_withdrawn_when_leaving_the_position() {
    let mut game = Game::new();
    let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8"];
    let _ = play_all(&mut game, &shuffle);
    let _ = play_all(&mut game, &shuffle);
    assert_eq!(game.make_move("e4").unwrap(), GameState::InProgress);

    let _ = game.undo().unwrap();
    assert_eq!(game.claim_draw().unwrap(), GameState::DrawByRepetition);
    assert!(game.is_over());

    let _ = game.redo().unwrap();
    assert_eq!(
        game.to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 5"
    );
    assert_eq!(game.repetition_count(), 1);
    assert_eq!(game.state(), GameState::InProgress);
    assert!(!game.is_over());
    assert_eq!(game.claimable_draw(), None);
    assert_eq!(game.make_move("e5").unwrap(), GameState::InProgress);
}

#[test]
fn navigation_keeps_history_intact() {
    let mut game = Game::replay(None, ["e4", "c5", "Nf3", "d6", "d4"]).unwrap();
    let line: Vec<Position> = game.position_history().cloned().collect();
    let moves = game.moves().to_vec();
    assert_eq!(line.len(), 6);
    assert_eq!(moves.len(), 5);

    while game.undo().is_ok() {}
    assert_eq!(game.position(), &line[0]);
    assert!(game.moves().is_empty());
    assert!(matches!(game.undo(), Err(Error::NoHistory)));

    while game.redo().is_ok() {}
    assert_eq!(game.position(), &line[5]);
    assert_eq!(game.moves(), &moves[..]);
    assert_eq!(
        game.position_history().cloned().collect::<Vec<_>>(),
        line
    );

    // Positions are linked by the moves.
    for (played, pair) in moves.iter().zip(line.windows(2)) {
        assert_eq!(pair[0].apply_move(played).unwrap(), pair[1]);
    }
}

#[test]
fn typed_moves() {
    let mut game = Game::new();
    let position = game.position().clone();
    let e4 = Move::from_uci(&position, "e2e4").unwrap();
    assert_eq!(game.play(&e4).unwrap(), GameState::InProgress);
    // The same move is illegal for Black.
    match game.play(&e4) {
        Err(Error::IllegalMove { notation, fen }) => {
            assert_eq!(notation, "e2e4");
            assert_eq!(fen, game.to_fen());
        },
        other => panic!("expected IllegalMove, got {other:?}"),
    }
    assert_eq!(game.moves(), &[e4]);
}

#[test]
fn notation_errors() {
    let mut game = Game::from_fen("4k3/8/8/8/8/8/8/1N1K1N2 w - - 0 1").unwrap();
    assert!(matches!(
        game.make_move("Nd2"),
        Err(Error::AmbiguousOrIllegalSan { candidates: 2, .. })
    ));
    assert!(matches!(
        game.make_move("Nxd2"),
        Err(Error::AmbiguousOrIllegalSan { candidates: 0, .. })
    ));
    assert!(matches!(
        game.make_move("b1d3"),
        Err(Error::IllegalMove { .. })
    ));
    // Failed moves leave the game untouched.
    assert!(game.moves().is_empty());
    assert_eq!(game.make_move("Nbd2").unwrap(), GameState::InProgress);
    assert_eq!(game.to_fen(), "4k3/8/8/8/8/8/3N4/3K1N2 b - - 1 1");
}

#[test]
fn long_game_round_trip() {
    // Fischer vs Spassky, 1972, game 6 opening.
    let moves = [
        "c4", "e6", "Nf3", "d5", "d4", "Nf6", "Nc3", "Be7", "Bg5", "O-O", "e3", "h6", "Bh4",
        "b6", "cxd5", "Nxd5", "Bxe7", "Qxe7", "Nxd5", "exd5", "Rc1", "Be6", "Qa4", "c5", "Qa3",
        "Rc8", "Bb5", "a6",
    ];
    let game = Game::replay(None, moves).unwrap();
    assert_eq!(game.moves().len(), moves.len());
    assert_eq!(
        game.movetext(),
        "1. c4 e6 2. Nf3 d5 3. d4 Nf6 4. Nc3 Be7 5. Bg5 O-O 6. e3 h6 7. Bh4 b6 8. cxd5 Nxd5 \
         9. Bxe7 Qxe7 10. Nxd5 exd5 11. Rc1 Be6 12. Qa4 c5 13. Qa3 Rc8 14. Bb5 a6"
    );
    assert_eq!(
        game.to_fen(),
        "rnr3k1/4qpp1/pp2b2p/1Bpp4/3P4/Q3PN2/PP3PPP/2R1K2R w K - 0 15"
    );
    // Replaying the SAN produced by movetext gives the same game.
    let replayed = Game::replay(
        None,
        game.movetext()
            .split_whitespace()
            .filter(|token| !token.ends_with('.')),
    )
    .unwrap();
    assert_eq!(replayed.to_fen(), game.to_fen());
}
