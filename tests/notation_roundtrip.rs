// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use chesscore::notation::{self, START_NOTATION};
use chesscore::{Board, GameState, NotationError, Position, Side};

#[test]
fn start_position_encodes_to_start_notation() {
    assert_eq!(START_NOTATION, Board::new().to_notation());
    assert_eq!(Board::new(), Board::from_notation(START_NOTATION).unwrap());
}

#[test]
fn published_positions_round_trip() {
    for &text in &[
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
        "rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 1",
    ] {
        let board = Board::from_notation(text).unwrap();
        assert_eq!(text, board.to_notation());
        assert_eq!(board, notation::decode(&notation::encode(&board)).unwrap());
    }
}

#[test]
fn counters_are_accepted_and_normalized() {
    let board =
        Board::from_notation("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8").unwrap();
    assert!(board.to_notation().ends_with(" w KQ - 0 1"));
}

#[test]
fn omitted_trailing_fields_read_as_empty() {
    let board = Board::from_notation("4k3/8/8/8/8/8/8/4K3 b").unwrap();
    assert_eq!(Side::Black, board.side_to_move());
    assert!(board.castle_rights().is_empty());
    assert_eq!(None, board.en_passant_target());
}

#[test]
fn en_passant_target_survives_round_trip() {
    let mut board = Board::new();
    assert!(board.apply_move("c2".parse().unwrap(), "c4".parse().unwrap()));
    let text = board.to_notation();
    assert_eq!(
        "rnbqkbnr/pppppppp/8/8/2P5/8/PP1PPPPP/RNBQKBNR b KQkq c3 0 1",
        text
    );
    let decoded = Board::from_notation(&text).unwrap();
    assert_eq!(Some("c3".parse::<Position>().unwrap()), decoded.en_passant_target());
    assert_eq!(board, decoded);
}

#[test]
fn pending_promotion_round_trips() {
    let mut board = Board::from_notation("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    assert!(board.apply_move("e7".parse().unwrap(), "e8".parse().unwrap()));
    let text = board.to_notation();
    assert_eq!("4P3/8/8/8/8/8/k7/4K3 b - - 0 1", text);

    let decoded = Board::from_notation(&text).unwrap();
    assert_eq!(
        GameState::AwaitingPromotion {
            side: Side::White,
            square: "e8".parse().unwrap()
        },
        decoded.state()
    );
    assert_eq!(board, decoded);
}

#[test]
fn decoder_rejects_impossible_boards() {
    // missing a black king
    assert!(matches!(
        Board::from_notation("8/8/8/8/8/8/8/4K3 w - - 0 1"),
        Err(NotationError::KingCount { .. })
    ));

    // a white pawn on its own back rank
    assert!(matches!(
        Board::from_notation("4k3/8/8/8/8/8/8/P3K3 w - - 0 1"),
        Err(NotationError::MisplacedPawn(_))
    ));

    // castling right with the rook gone from h1
    assert!(matches!(
        Board::from_notation("4k3/8/8/8/8/8/8/4K3 w K - 0 1"),
        Err(NotationError::CastleWithoutPieces('K'))
    ));

    // Black is in check with White to move
    assert!(matches!(
        Board::from_notation("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1"),
        Err(NotationError::OpponentInCheck)
    ));

    // garbage after the last field
    assert!(matches!(
        Board::from_notation("4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra"),
        Err(NotationError::TrailingInput)
    ));
}

#[test]
fn board_serializes_as_notation() {
    let board = Board::new();
    let json = serde_json::to_string(&board).unwrap();
    assert_eq!(format!("\"{}\"", START_NOTATION), json);
    let back: Board = serde_json::from_str(&json).unwrap();
    assert_eq!(board, back);

    let bad: Result<Board, _> = serde_json::from_str("\"8/8/8 w\"");
    assert!(bad.is_err());
}
