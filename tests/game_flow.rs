// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use chesscore::{
    Board, CastleSide, GameState, MoveError, Outcome, Piece, PieceKind, Position, PromotionError,
    Side,
};

fn sq(name: &str) -> Position {
    name.parse().unwrap()
}

fn play_all(board: &mut Board, moves: &[(&str, &str)]) {
    for &(from, to) in moves {
        assert!(board.apply_move(sq(from), sq(to)), "{}{} rejected", from, to);
    }
}

#[test]
fn twenty_moves_from_start() {
    let mut board = Board::new();
    assert_eq!(20, board.legal_move_list().len());

    // and Black has the same twenty after any quiet White opening
    assert!(board.apply_move(sq("e2"), sq("e4")));
    assert_eq!(Side::Black, board.side_to_move());
    assert_eq!(20, board.legal_move_list().len());
}

#[test]
fn scholars_mate() {
    let mut board = Board::new();
    play_all(
        &mut board,
        &[
            ("e2", "e4"),
            ("e7", "e5"),
            ("f1", "c4"),
            ("b8", "c6"),
            ("d1", "h5"),
            ("g8", "f6"),
            ("h5", "f7"),
        ],
    );

    assert!(board.is_in_check(Side::Black));
    assert!(board.is_checkmate(Side::Black));
    assert_eq!(
        GameState::Finished(Outcome::Checkmate {
            winner: Side::White
        }),
        board.state()
    );

    // nothing moves once the game is decided
    let before = board.clone();
    assert!(!board.apply_move(sq("e8"), sq("f7")));
    assert_eq!(
        Err(MoveError::GameFinished),
        board.try_move(sq("a7"), sq("a6"))
    );
    assert_eq!(before, board);
}

#[test]
fn fools_mate() {
    let mut board = Board::new();
    play_all(
        &mut board,
        &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
    );

    assert_eq!(
        Some(Outcome::Checkmate {
            winner: Side::Black
        }),
        board.outcome()
    );
}

#[test]
fn stalemate_by_queen_move() {
    let mut board = Board::from_notation("7k/5K2/8/6Q1/8/8/8/8 w - - 0 1").unwrap();
    assert_eq!(GameState::Active, board.state());
    assert!(board.apply_move(sq("g5"), sq("g6")));

    assert!(!board.is_in_check(Side::Black));
    assert!(board.is_stalemate(Side::Black));
    assert_eq!(Some(Outcome::Stalemate), board.outcome());
    assert!(board.legal_move_list().is_empty());
}

#[test]
fn stalemate_detected_on_decode() {
    let board = Board::from_notation("7k/5K2/6Q1/8/8/8/8/8 b - - 0 1").unwrap();
    assert_eq!(GameState::Finished(Outcome::Stalemate), board.state());
}

#[test]
fn moving_into_check_is_rejected() {
    // the e-file rook pins nothing but covers e2
    let mut board = Board::from_notation("4k3/4r3/8/8/8/8/8/3K4 w - - 0 1").unwrap();
    assert_eq!(
        Err(MoveError::Illegal {
            from: sq("d1"),
            to: sq("e2")
        }),
        board.try_move(sq("d1"), sq("e2"))
    );
    assert!(board.apply_move(sq("d1"), sq("c2")));
}

#[test]
fn wrong_side_and_empty_square() {
    let mut board = Board::new();
    assert_eq!(Err(MoveError::WrongSide(sq("e7"))), board.try_move(sq("e7"), sq("e5")));
    assert_eq!(Err(MoveError::NoPiece(sq("e4"))), board.try_move(sq("e4"), sq("e5")));
    assert_eq!(Board::new(), board);
}

#[test]
fn en_passant_capture() {
    let mut board = Board::new();
    play_all(
        &mut board,
        &[("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")],
    );
    assert_eq!(Some(sq("d6")), board.en_passant_target());

    let record = board.try_move(sq("e5"), sq("d6")).unwrap();
    assert!(record.en_passant);
    assert_eq!(Some(Piece::new(PieceKind::Pawn, Side::Black)), record.captured);
    assert_eq!(None, board.piece_at(sq("d5")));
    assert_eq!(
        Some(Piece::new(PieceKind::Pawn, Side::White)),
        board.piece_at(sq("d6"))
    );
    assert_eq!(None, board.en_passant_target());
}

#[test]
fn en_passant_window_expires() {
    let mut board = Board::new();
    play_all(
        &mut board,
        &[
            ("e2", "e4"),
            ("a7", "a6"),
            ("e4", "e5"),
            ("d7", "d5"),
            ("h2", "h3"),
            ("h7", "h6"),
        ],
    );

    assert!(!board.legal_moves(sq("e5")).contains(&sq("d6")));
    assert!(!board.apply_move(sq("e5"), sq("d6")));
}

#[test]
fn castling_kingside_moves_rook() {
    let mut board = Board::from_notation("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let record = board.try_move(sq("e1"), sq("g1")).unwrap();
    assert_eq!(Some(CastleSide::Kingside), record.castle);
    assert_eq!(
        Some(Piece::new(PieceKind::Rook, Side::White)),
        board.piece_at(sq("f1"))
    );
    assert_eq!(None, board.piece_at(sq("h1")));
    assert_eq!(sq("g1"), board.king_square(Side::White));
    assert!(board.to_notation().contains(" b kq "));

    let record = board.try_move(sq("e8"), sq("c8")).unwrap();
    assert_eq!(Some(CastleSide::Queenside), record.castle);
    assert_eq!(
        Some(Piece::new(PieceKind::Rook, Side::Black)),
        board.piece_at(sq("d8"))
    );
    assert!(board.to_notation().contains(" w - "));
}

#[test]
fn castling_through_attacked_square_is_rejected() {
    // the f8 rook covers f1, so only the queenside is open
    let mut board = Board::from_notation("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1").unwrap();
    assert!(!board.legal_moves(sq("e1")).contains(&sq("g1")));
    assert!(board.apply_move(sq("e1"), sq("c1")));
}

#[test]
fn castling_blocked_by_pieces_between() {
    // g1 blocks the kingside; b1 is not on the king's path but still blocks
    let mut board = Board::from_notation("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1").unwrap();
    let targets = board.legal_moves(sq("e1"));
    assert!(!targets.contains(&sq("g1")));
    assert!(!targets.contains(&sq("c1")));
    assert!(!board.apply_move(sq("e1"), sq("g1")));

    // once the knights step away both sides open up
    play_all(&mut board, &[("g1", "f3"), ("e8", "d8"), ("b1", "c3"), ("d8", "e8")]);
    let targets = board.legal_moves(sq("e1"));
    assert!(targets.contains(&sq("g1")));
    assert!(targets.contains(&sq("c1")));
}

#[test]
fn castling_out_of_check_is_rejected() {
    let mut board = Board::from_notation("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    assert!(board.is_in_check(Side::White));
    let targets = board.legal_moves(sq("e1"));
    assert!(!targets.contains(&sq("g1")));
    assert!(!targets.contains(&sq("c1")));
}

#[test]
fn castling_rights_lost_for_good() {
    let mut board = Board::from_notation("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();

    // the king steps out and back
    play_all(&mut board, &[("e1", "f1"), ("e8", "d8"), ("f1", "e1"), ("d8", "e8")]);
    assert!(board.has_king_moved(Side::White));
    assert!(!board.can_castle_kingside(Side::Black));
    assert!(!board.legal_moves(sq("e1")).contains(&sq("g1")));
    assert!(!board.legal_moves(sq("e1")).contains(&sq("c1")));
    assert!(board.to_notation().contains(" w - "));
}

#[test]
fn rook_move_clears_one_side() {
    let mut board = Board::from_notation("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    play_all(&mut board, &[("h1", "h2"), ("a8", "a7"), ("h2", "h1"), ("a7", "a8")]);
    assert!(!board.can_castle_kingside(Side::White));
    assert!(board.can_castle_queenside(Side::White));
    assert!(board.can_castle_kingside(Side::Black));
    assert!(!board.can_castle_queenside(Side::Black));
    assert!(board.to_notation().contains(" w Qk "));
}

#[test]
fn promotion_waits_for_a_piece() {
    let mut board = Board::from_notation("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    let record = board.try_move(sq("e7"), sq("e8")).unwrap();
    assert!(record.promotion_pending);
    assert_eq!(
        GameState::AwaitingPromotion {
            side: Side::White,
            square: sq("e8")
        },
        board.state()
    );
    assert_eq!(Side::Black, board.side_to_move());

    // Black can't answer until the pawn is replaced
    assert_eq!(
        Err(MoveError::PromotionPending(sq("e8"))),
        board.try_move(sq("a2"), sq("a3"))
    );
    assert!(board.legal_move_list().is_empty());

    assert_eq!(
        Err(PromotionError::InvalidKind(PieceKind::King)),
        board.promote(PieceKind::King)
    );
    assert_eq!(
        Err(PromotionError::InvalidKind(PieceKind::Pawn)),
        board.promote(PieceKind::Pawn)
    );
    assert_eq!(Ok(()), board.promote(PieceKind::Queen));
    assert_eq!(
        Some(Piece::new(PieceKind::Queen, Side::White)),
        board.piece_at(sq("e8"))
    );
    assert_eq!(GameState::Active, board.state());
    assert_eq!(Err(PromotionError::NotPending), board.promote(PieceKind::Rook));
    assert!(board.apply_move(sq("a2"), sq("a3")));
}

#[test]
fn promotion_can_deliver_mate() {
    // the new rook on a8 mates the boxed-in king
    let mut board = Board::from_notation("7k/P5pp/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    assert!(board.apply_move(sq("a7"), sq("a8")));
    assert!(!board.is_finished());
    board.promote(PieceKind::Rook).unwrap();
    assert_eq!(
        Some(Outcome::Checkmate {
            winner: Side::White
        }),
        board.outcome()
    );
}

#[test]
fn pieces_lists_one_side() {
    let board = Board::new();
    assert_eq!(16, board.pieces(Side::White).count());
    assert!(board
        .pieces(Side::Black)
        .all(|(square, piece)| piece.side == Side::Black && square.rank() >= 6));
}
