// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The single-line board notation.
//!
//! The format follows FEN: eight `/`-separated ranks from rank 8 down to rank
//! 1, each a run of piece letters and empty-square counts, then the side to
//! move, castling rights, and the en-passant target. Move counters are not
//! tracked; `encode` always writes `0 1` and `decode` ignores them.

use std::convert::TryFrom;
use std::fmt::Write;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::board::{Board, GameState};
use crate::piece::{king_home, rook_home};
use crate::position::Position;
use crate::types::{CastleRights, Piece, PieceKind, Side, SIDES};

pub const START_NOTATION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Possible errors that can arise when decoding notation into a `Board`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("missing {0} field")]
    MissingField(&'static str),
    #[error("unexpected trailing input")]
    TrailingInput,
    #[error("expected 8 ranks, found {0}")]
    RankCount(usize),
    #[error("rank {0} does not sum to eight files")]
    RankLength(u8),
    #[error("invalid empty-square count '{0}'")]
    InvalidDigit(char),
    #[error("unknown piece '{0}'")]
    UnknownPiece(char),
    #[error("expected exactly one {side:?} king, found {count}")]
    KingCount { side: Side, count: usize },
    #[error("pawn cannot stand on {0}")]
    MisplacedPawn(Position),
    #[error("invalid side to move '{0}'")]
    InvalidSideToMove(String),
    #[error("invalid castling right '{0}'")]
    InvalidCastle(char),
    #[error("castling right '{0}' without king and rook on their home squares")]
    CastleWithoutPieces(char),
    #[error("invalid en passant target '{0}'")]
    InvalidEnPassant(String),
    #[error("invalid move counter '{0}'")]
    InvalidCounter(String),
    #[error("the side not to move is in check")]
    OpponentInCheck,
}

/// Writes out the full state of `board`.
pub fn encode(board: &Board) -> String {
    let mut buf = String::new();
    for rank in (0..8).rev() {
        let mut empty_squares = 0;
        for file in 0..8 {
            if let Some(piece) = board.piece_at_coords(rank, file) {
                if empty_squares != 0 {
                    write!(&mut buf, "{}", empty_squares).unwrap();
                }
                buf.push(piece.notation_char());
                empty_squares = 0;
            } else {
                empty_squares += 1;
            }
        }

        if empty_squares != 0 {
            write!(&mut buf, "{}", empty_squares).unwrap();
        }

        if rank != 0 {
            buf.push('/');
        }
    }

    buf.push(' ');
    match board.side_to_move() {
        Side::White => buf.push('w'),
        Side::Black => buf.push('b'),
    }
    buf.push(' ');
    if board.castle_rights().is_empty() {
        buf.push('-');
    }
    if board.can_castle_kingside(Side::White) {
        buf.push('K');
    }
    if board.can_castle_queenside(Side::White) {
        buf.push('Q');
    }
    if board.can_castle_kingside(Side::Black) {
        buf.push('k');
    }
    if board.can_castle_queenside(Side::Black) {
        buf.push('q');
    }
    buf.push(' ');
    if let Some(ep_square) = board.en_passant_target() {
        write!(&mut buf, "{}", ep_square).unwrap();
    } else {
        buf.push('-');
    }
    buf.push_str(" 0 1");
    buf
}

/// Reads a board back from its notation, rejecting anything that does not
/// describe a position reachable under the rules' bookkeeping.
///
/// Only the placement and side-to-move fields are required; missing castling
/// and en-passant fields read as `-`.
pub fn decode(notation: &str) -> Result<Board, NotationError> {
    decode_fields(notation).map_err(|err| {
        debug!("rejected notation {:?}: {}", notation, err);
        err
    })
}

fn decode_fields(notation: &str) -> Result<Board, NotationError> {
    let mut fields = notation.split_whitespace();
    let placement = fields.next().ok_or(NotationError::MissingField("placement"))?;
    let side_field = fields.next().ok_or(NotationError::MissingField("side to move"))?;
    let castle_field = fields.next().unwrap_or("-");
    let en_passant_field = fields.next().unwrap_or("-");
    for counter in fields.by_ref().take(2) {
        counter
            .parse::<u32>()
            .map_err(|_| NotationError::InvalidCounter(counter.to_owned()))?;
    }
    if fields.next().is_some() {
        return Err(NotationError::TrailingInput);
    }

    let mut board = Board::blank();
    eat_placement(&mut board, placement)?;

    let side = eat_side_to_move(side_field)?;
    board.set_side_to_move(side);

    for &color in &SIDES {
        let count = board
            .pieces(color)
            .filter(|&(_, piece)| piece.kind == PieceKind::King)
            .count();
        if count != 1 {
            return Err(NotationError::KingCount { side: color, count });
        }
    }

    let pending = find_pending_promotion(&board, side)?;
    board.set_castle_rights(eat_castle_rights(&board, castle_field)?);

    let en_passant_file = eat_en_passant(&board, en_passant_field)?;
    if en_passant_file.is_some() && pending.is_some() {
        return Err(NotationError::InvalidEnPassant(en_passant_field.to_owned()));
    }
    board.set_en_passant_file(en_passant_file);

    if board.is_in_check(side.toggle()) {
        return Err(NotationError::OpponentInCheck);
    }

    match pending {
        Some(square) => board.set_state(GameState::AwaitingPromotion {
            side: side.toggle(),
            square,
        }),
        None => board.refresh_state(),
    }

    Ok(board)
}

fn eat_placement(board: &mut Board, placement: &str) -> Result<(), NotationError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(NotationError::RankCount(ranks.len()));
    }

    for (row, text) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;
        let mut last_was_digit = false;
        for c in text.chars() {
            // digits 1 through 8 indicate empty squares.
            if c.is_ascii_digit() {
                if c < '1' || c > '8' || last_was_digit {
                    return Err(NotationError::InvalidDigit(c));
                }

                file += c as u8 - b'0';
                if file > 8 {
                    return Err(NotationError::RankLength(rank + 1));
                }

                last_was_digit = true;
                continue;
            }

            // if it's not a digit, it represents a piece.
            let piece = Piece::try_from(c).map_err(|_| NotationError::UnknownPiece(c))?;
            let square = Position::new(rank, file).ok_or(NotationError::RankLength(rank + 1))?;
            board.set_piece_at(square, Some(piece));
            file += 1;
            last_was_digit = false;
        }

        if file != 8 {
            return Err(NotationError::RankLength(rank + 1));
        }
    }

    Ok(())
}

fn eat_side_to_move(field: &str) -> Result<Side, NotationError> {
    match field {
        "w" => Ok(Side::White),
        "b" => Ok(Side::Black),
        _ => Err(NotationError::InvalidSideToMove(field.to_owned())),
    }
}

/// Pawns never stand on their own back rank. One may stand on its last rank
/// only if it belongs to the side that just moved: that is a promotion the
/// caller has not resolved yet.
fn find_pending_promotion(board: &Board, side: Side) -> Result<Option<Position>, NotationError> {
    let mut pending = None;
    for &color in &SIDES {
        for (sq, piece) in board.pieces(color) {
            if piece.kind != PieceKind::Pawn {
                continue;
            }

            if sq.rank() == color.home_rank() {
                return Err(NotationError::MisplacedPawn(sq));
            }

            if sq.rank() == color.promotion_rank() {
                if color == side || pending.is_some() {
                    return Err(NotationError::MisplacedPawn(sq));
                }
                pending = Some(sq);
            }
        }
    }

    Ok(pending)
}

fn eat_castle_rights(board: &Board, field: &str) -> Result<CastleRights, NotationError> {
    if field == "-" {
        return Ok(CastleRights::NONE);
    }

    let mut rights = CastleRights::NONE;
    for c in field.chars() {
        let (side, kingside) = match c {
            'K' => (Side::White, true),
            'Q' => (Side::White, false),
            'k' => (Side::Black, true),
            'q' => (Side::Black, false),
            _ => return Err(NotationError::InvalidCastle(c)),
        };

        let right = if kingside {
            CastleRights::kingside(side)
        } else {
            CastleRights::queenside(side)
        };
        // Rights are written in KQkq order, which is ascending bit order, so
        // each one must sort after everything already read.
        if right.bits() <= rights.bits() {
            return Err(NotationError::InvalidCastle(c));
        }

        // A right only survives while neither the king nor that rook has moved.
        let king_home_ok =
            board.piece_at(king_home(side)) == Some(Piece::new(PieceKind::King, side));
        let rook_home_ok = board.piece_at(rook_home(side, kingside))
            == Some(Piece::new(PieceKind::Rook, side));
        if !king_home_ok || !rook_home_ok {
            return Err(NotationError::CastleWithoutPieces(c));
        }

        rights |= right;
    }

    Ok(rights)
}

fn eat_en_passant(board: &Board, field: &str) -> Result<Option<u8>, NotationError> {
    if field == "-" {
        return Ok(None);
    }

    let invalid = || NotationError::InvalidEnPassant(field.to_owned());
    let target: Position = field.parse().map_err(|_| invalid())?;

    // The target is the square the double-stepped pawn skipped, so it sits
    // just in front of the capturing side's en-passant rank.
    let side = board.side_to_move();
    let expected_rank = side.en_passant_rank() as i8 + side.pawn_direction();
    if target.rank() as i8 != expected_rank {
        return Err(invalid());
    }

    let pawn_square = target.offset(-side.pawn_direction(), 0).ok_or_else(invalid)?;
    if board.piece_at(pawn_square) != Some(Piece::new(PieceKind::Pawn, side.toggle())) {
        return Err(invalid());
    }

    // The pawn just left its origin and passed over the target; both are empty.
    let origin = target.offset(side.pawn_direction(), 0).ok_or_else(invalid)?;
    if board.piece_at(target).is_some() || board.piece_at(origin).is_some() {
        return Err(invalid());
    }

    Ok(Some(target.file()))
}

//
// Board conveniences and trait implementations
//

impl Board {
    /// Constructs a board from its notation.
    pub fn from_notation<S: AsRef<str>>(notation: S) -> Result<Board, NotationError> {
        decode(notation.as_ref())
    }

    pub fn to_notation(&self) -> String {
        encode(self)
    }
}

impl FromStr for Board {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Board, NotationError> {
        decode(s)
    }
}

impl Serialize for Board {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(self))
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Board, D::Error> {
        let notation = String::deserialize(deserializer)?;
        decode(&notation).map_err(de::Error::custom)
    }
}
