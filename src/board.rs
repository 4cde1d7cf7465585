// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use thiserror::Error;

use crate::attacks::{self, DIAGONALS, ORTHOGONALS};
use crate::piece::{king_home, rook_home, MoveVec};
use crate::position::Position;
use crate::types::{CastleRights, Move, Piece, PieceKind, Side, TableIndex};
use crate::types::{PROMOTION_KINDS, SIDES};

/// How a game ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Checkmate { winner: Side },
    Stalemate,
}

/// Where a board is in its turn cycle.
///
/// `AwaitingPromotion` is entered when a pawn reaches the last rank. The move
/// is committed and the turn has passed, but nothing else may be played until
/// [`Board::promote`] names the replacement piece.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Active,
    AwaitingPromotion { side: Side, square: Position },
    Finished(Outcome),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastleSide {
    Kingside,
    Queenside,
}

/// What a committed move did.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Position,
    pub to: Position,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub en_passant: bool,
    pub castle: Option<CastleSide>,
    pub promotion_pending: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is over")]
    GameFinished,
    #[error("a promotion on {0} must be resolved first")]
    PromotionPending(Position),
    #[error("no piece on {0}")]
    NoPiece(Position),
    #[error("the piece on {0} belongs to the side not on move")]
    WrongSide(Position),
    #[error("{from}{to} is not a legal move")]
    Illegal { from: Position, to: Position },
    #[error("{0} cannot promote")]
    InvalidPromotion(Move),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum PromotionError {
    #[error("no promotion is pending")]
    NotPending,
    #[error("a pawn cannot promote to a {0:?}")]
    InvalidKind(PieceKind),
}

/// The cells and cached king square touched by a simulated move, enough to
/// put the board back exactly as it was.
struct Scratch {
    from: Position,
    to: Position,
    moved: Piece,
    displaced: Option<Piece>,
    en_passant_victim: Option<(Position, Piece)>,
    king_before: Position,
}

/// An 8x8 chess board together with everything needed to decide what may be
/// played next: side to move, cached king squares, the en-passant file,
/// castling rights, and the turn state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    grid: [[Option<Piece>; 8]; 8],
    side_to_move: Side,
    king_squares: [Position; 2],
    en_passant_file: Option<u8>,
    castle_rights: CastleRights,
    state: GameState,
}

//
// Construction and raw placement
//

impl Board {
    /// The standard starting position, White to move.
    pub fn new() -> Board {
        static BACK_RANK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::blank();
        for &side in &SIDES {
            for (file, &kind) in BACK_RANK.iter().enumerate() {
                board.grid[side.home_rank() as usize][file] = Some(Piece::new(kind, side));
                board.grid[side.pawn_rank() as usize][file] =
                    Some(Piece::new(PieceKind::Pawn, side));
            }
            board.king_squares[side.as_index()] = king_home(side);
        }

        board.castle_rights = CastleRights::all();
        board
    }

    /// A board with nothing on it. Only the notation decoder uses this; it
    /// places both kings before handing the board out.
    pub(crate) fn blank() -> Board {
        Board {
            grid: [[None; 8]; 8],
            side_to_move: Side::White,
            king_squares: [king_home(Side::White), king_home(Side::Black)],
            en_passant_file: None,
            castle_rights: CastleRights::NONE,
            state: GameState::Active,
        }
    }

    /// Places (or clears) a square directly, keeping the cached king square in
    /// step when a king is placed. No legality is checked.
    pub(crate) fn set_piece_at(&mut self, sq: Position, piece: Option<Piece>) {
        self.grid[sq.rank() as usize][sq.file() as usize] = piece;
        if let Some(Piece {
            kind: PieceKind::King,
            side,
        }) = piece
        {
            self.king_squares[side.as_index()] = sq;
        }
    }

    pub(crate) fn set_side_to_move(&mut self, side: Side) {
        self.side_to_move = side;
    }

    pub(crate) fn set_castle_rights(&mut self, rights: CastleRights) {
        self.castle_rights = rights;
    }

    pub(crate) fn set_en_passant_file(&mut self, file: Option<u8>) {
        self.en_passant_file = file;
    }

    pub(crate) fn set_state(&mut self, state: GameState) {
        self.state = state;
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

//
// Board state getters
//

impl Board {
    pub fn piece_at(&self, sq: Position) -> Option<Piece> {
        self.grid[sq.rank() as usize][sq.file() as usize]
    }

    /// Like `piece_at`, but coordinates off the board simply hold nothing.
    pub fn piece_at_coords(&self, rank: i8, file: i8) -> Option<Piece> {
        if rank < 0 || file < 0 {
            return None;
        }

        Position::new(rank as u8, file as u8).and_then(|sq| self.piece_at(sq))
    }

    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    pub fn king_square(&self, side: Side) -> Position {
        self.king_squares[side.as_index()]
    }

    pub fn en_passant_file(&self) -> Option<u8> {
        self.en_passant_file
    }

    /// The square a pawn of the side to move would capture onto en passant.
    pub fn en_passant_target(&self) -> Option<Position> {
        let file = self.en_passant_file?;
        let rank = self.side_to_move.en_passant_rank() as i8 + self.side_to_move.pawn_direction();
        Position::new(rank as u8, file)
    }

    pub fn castle_rights(&self) -> CastleRights {
        self.castle_rights
    }

    pub fn can_castle_kingside(&self, side: Side) -> bool {
        self.castle_rights.contains(CastleRights::kingside(side))
    }

    pub fn can_castle_queenside(&self, side: Side) -> bool {
        self.castle_rights.contains(CastleRights::queenside(side))
    }

    /// A king counts as moved once it has lost both castling rights.
    pub fn has_king_moved(&self, side: Side) -> bool {
        !self.castle_rights.intersects(CastleRights::of_side(side))
    }

    pub fn has_rook_moved(&self, side: Side, kingside: bool) -> bool {
        if kingside {
            !self.can_castle_kingside(side)
        } else {
            !self.can_castle_queenside(side)
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        match self.state {
            GameState::Finished(_) => true,
            _ => false,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            GameState::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn pending_promotion(&self) -> Option<(Side, Position)> {
        match self.state {
            GameState::AwaitingPromotion { side, square } => Some((side, square)),
            _ => None,
        }
    }

    /// Every piece of `side` with the square it stands on.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Position, Piece)> + '_ {
        Position::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(piece) if piece.side == side => Some((sq, piece)),
            _ => None,
        })
    }
}

//
// Board analysis (attacks, check, simulated moves)
//

impl Board {
    /// Is `target` attacked by any piece of `by`? Pawns count by their capture
    /// pattern, sliders only along a clear ray.
    pub fn is_attacked(&self, target: Position, by: Side) -> bool {
        let pawn = Some(Piece::new(PieceKind::Pawn, by));
        let knight = Some(Piece::new(PieceKind::Knight, by));
        let king = Some(Piece::new(PieceKind::King, by));

        // An attacking pawn stands one rank behind the target, from its point of view.
        let behind = target.rank() as i8 - by.pawn_direction();
        for &df in &[-1, 1] {
            if self.piece_at_coords(behind, target.file() as i8 + df) == pawn {
                return true;
            }
        }

        if attacks::knight_targets(target)
            .iter()
            .any(|&sq| self.piece_at(sq) == knight)
        {
            return true;
        }

        if attacks::king_targets(target)
            .iter()
            .any(|&sq| self.piece_at(sq) == king)
        {
            return true;
        }

        let rays = ORTHOGONALS
            .iter()
            .map(|dir| (dir, PieceKind::Rook))
            .chain(DIAGONALS.iter().map(|dir| (dir, PieceKind::Bishop)));
        for (&(dr, df), line_kind) in rays {
            let mut cursor = target.offset(dr, df);
            while let Some(sq) = cursor {
                if let Some(piece) = self.piece_at(sq) {
                    if piece.side == by && (piece.kind == line_kind || piece.kind == PieceKind::Queen)
                    {
                        return true;
                    }
                    break;
                }
                cursor = sq.offset(dr, df);
            }
        }

        false
    }

    pub fn is_in_check(&self, side: Side) -> bool {
        self.is_attacked(self.king_square(side), side.toggle())
    }

    /// Would moving the piece on `from` to `to` leave `side`'s king in check?
    ///
    /// The move is played on this board and then undone; the board is left
    /// exactly as it was found. Returns false when `from` is empty.
    pub fn would_be_in_check(&mut self, from: Position, to: Position, side: Side) -> bool {
        let scratch = match self.make_scratch(from, to) {
            Some(scratch) => scratch,
            None => return false,
        };

        let in_check = self.is_in_check(side);
        self.unmake_scratch(scratch);
        in_check
    }

    /// Relocates a piece and removes whatever it captures, including a pawn
    /// taken en passant, and moves the cached king square along with a king.
    fn make_scratch(&mut self, from: Position, to: Position) -> Option<Scratch> {
        let moved = self.piece_at(from)?;
        let displaced = self.piece_at(to);

        let mut en_passant_victim = None;
        if moved.kind == PieceKind::Pawn && from.file() != to.file() && displaced.is_none() {
            if let Some(victim_sq) = Position::new(from.rank(), to.file()) {
                if let Some(victim) = self.piece_at(victim_sq) {
                    self.set_piece_at(victim_sq, None);
                    en_passant_victim = Some((victim_sq, victim));
                }
            }
        }

        let king_before = self.king_square(moved.side);
        self.set_piece_at(from, None);
        self.set_piece_at(to, Some(moved));
        Some(Scratch {
            from,
            to,
            moved,
            displaced,
            en_passant_victim,
            king_before,
        })
    }

    fn unmake_scratch(&mut self, scratch: Scratch) {
        self.grid[scratch.to.rank() as usize][scratch.to.file() as usize] = scratch.displaced;
        self.grid[scratch.from.rank() as usize][scratch.from.file() as usize] =
            Some(scratch.moved);
        if let Some((sq, victim)) = scratch.en_passant_victim {
            self.grid[sq.rank() as usize][sq.file() as usize] = Some(victim);
        }

        // A displaced king (only possible on hand-built boards) had its cache
        // left alone by `set_piece_at`, so only the mover's needs restoring.
        self.king_squares[scratch.moved.side.as_index()] = scratch.king_before;
    }

    /// Raw move targets of the piece on `from`; empty when the square is empty.
    pub fn pseudo_moves(&self, from: Position) -> MoveVec {
        match self.piece_at(from) {
            Some(piece) => piece.pseudo_moves(from, self),
            None => MoveVec::new(),
        }
    }

    /// Legal move targets of the piece on `from`, regardless of whose turn it is.
    pub fn legal_moves(&mut self, from: Position) -> MoveVec {
        match self.piece_at(from) {
            Some(piece) => piece.legal_moves(from, self),
            None => MoveVec::new(),
        }
    }

    /// Does `side` have at least one legal move?
    pub fn has_legal_move(&mut self, side: Side) -> bool {
        for from in Position::all() {
            let piece = match self.piece_at(from) {
                Some(piece) if piece.side == side => piece,
                _ => continue,
            };

            for to in piece.pseudo_moves(from, self) {
                if !self.would_be_in_check(from, to, side) {
                    return true;
                }
            }
        }

        false
    }

    pub fn is_checkmate(&mut self, side: Side) -> bool {
        self.is_in_check(side) && !self.has_legal_move(side)
    }

    pub fn is_stalemate(&mut self, side: Side) -> bool {
        !self.is_in_check(side) && !self.has_legal_move(side)
    }

    /// Every move the side to move may play right now. A pawn reaching the
    /// last rank contributes one move per promotion piece. Empty once the game
    /// is over or while a promotion is pending.
    pub fn legal_move_list(&mut self) -> Vec<Move> {
        let mut list = Vec::new();
        if self.state != GameState::Active {
            return list;
        }

        let side = self.side_to_move;
        for from in Position::all() {
            let piece = match self.piece_at(from) {
                Some(piece) if piece.side == side => piece,
                _ => continue,
            };

            for to in piece.legal_moves(from, self) {
                if piece.kind == PieceKind::Pawn && to.rank() == side.promotion_rank() {
                    list.extend(
                        PROMOTION_KINDS
                            .iter()
                            .map(|&kind| Move::promoting(from, to, kind)),
                    );
                } else {
                    list.push(Move::new(from, to));
                }
            }
        }

        list
    }
}

//
// Move application
//

impl Board {
    /// Plays `from` to `to` for the side to move. Returns false, leaving the
    /// board untouched, if the move is not allowed.
    pub fn apply_move(&mut self, from: Position, to: Position) -> bool {
        self.try_move(from, to).is_ok()
    }

    /// Plays `from` to `to` for the side to move, reporting why when it can't.
    ///
    /// A pawn reaching the last rank stays a pawn and the board moves to
    /// `GameState::AwaitingPromotion` until `promote` is called.
    pub fn try_move(&mut self, from: Position, to: Position) -> Result<MoveRecord, MoveError> {
        let result = self.try_move_inner(from, to);
        match result {
            Ok(ref record) => trace!("{}: {}{} ({})", record.piece, from, to, self.state_name()),
            Err(ref err) => debug!("rejected move {}{}: {}", from, to, err),
        }
        result
    }

    fn try_move_inner(&mut self, from: Position, to: Position) -> Result<MoveRecord, MoveError> {
        match self.state {
            GameState::Finished(_) => return Err(MoveError::GameFinished),
            GameState::AwaitingPromotion { square, .. } => {
                return Err(MoveError::PromotionPending(square))
            }
            GameState::Active => {}
        }

        let piece = self.piece_at(from).ok_or(MoveError::NoPiece(from))?;
        let side = self.side_to_move;
        if piece.side != side {
            return Err(MoveError::WrongSide(from));
        }

        if !piece.legal_moves(from, self).contains(&to) {
            return Err(MoveError::Illegal { from, to });
        }

        let scratch = self
            .make_scratch(from, to)
            .expect("legal move has a piece on its source square");
        let en_passant = scratch.en_passant_victim.is_some();
        let captured = scratch
            .displaced
            .or_else(|| scratch.en_passant_victim.map(|(_, victim)| victim));

        let mut castle = None;
        if piece.kind == PieceKind::King && (to.file() as i8 - from.file() as i8).abs() == 2 {
            let kingside = to.file() > from.file();
            let rook_from = rook_home(side, kingside);
            let rook_to = Position::new(from.rank(), if kingside { 5 } else { 3 })
                .expect("castling rook lands on the home rank");
            let rook = self.piece_at(rook_from);
            self.set_piece_at(rook_from, None);
            self.set_piece_at(rook_to, rook);
            castle = Some(if kingside {
                CastleSide::Kingside
            } else {
                CastleSide::Queenside
            });
        }

        // Rights go away for good: the king leaving home clears both, and any
        // move from or onto a rook's corner clears that corner's right.
        if piece.kind == PieceKind::King {
            self.castle_rights &= !CastleRights::of_side(side);
        }
        for &corner_side in &SIDES {
            for &kingside in &[true, false] {
                let corner = rook_home(corner_side, kingside);
                if from == corner || to == corner {
                    self.castle_rights &= if kingside {
                        !CastleRights::kingside(corner_side)
                    } else {
                        !CastleRights::queenside(corner_side)
                    };
                }
            }
        }

        let double_step =
            piece.kind == PieceKind::Pawn && (to.rank() as i8 - from.rank() as i8).abs() == 2;
        self.en_passant_file = if double_step { Some(to.file()) } else { None };
        self.side_to_move = side.toggle();

        let promotion_pending = piece.kind == PieceKind::Pawn && to.rank() == side.promotion_rank();
        if promotion_pending {
            self.state = GameState::AwaitingPromotion { side, square: to };
        } else {
            self.refresh_state();
        }

        Ok(MoveRecord {
            from,
            to,
            piece,
            captured,
            en_passant,
            castle,
            promotion_pending,
        })
    }

    /// Replaces the pawn waiting on the last rank with `kind`.
    pub fn promote(&mut self, kind: PieceKind) -> Result<(), PromotionError> {
        let (side, square) = self.pending_promotion().ok_or(PromotionError::NotPending)?;
        if !kind.is_promotion_target() {
            return Err(PromotionError::InvalidKind(kind));
        }

        self.set_piece_at(square, Some(Piece::new(kind, side)));
        trace!("{} promoted to {:?}", square, kind);
        self.refresh_state();
        Ok(())
    }

    /// Plays a coordinate move, promoting in the same step if it names a piece.
    ///
    /// A promotion piece on a move that doesn't promote, or a piece a pawn may
    /// not become, is rejected before anything is played.
    pub fn play(&mut self, mv: Move) -> Result<MoveRecord, MoveError> {
        if let Some(kind) = mv.promotion {
            let promotes = match self.piece_at(mv.from) {
                Some(piece) => {
                    piece.kind == PieceKind::Pawn && mv.to.rank() == piece.side.promotion_rank()
                }
                None => false,
            };

            if !promotes || !kind.is_promotion_target() {
                return Err(MoveError::InvalidPromotion(mv));
            }
        }

        let record = self.try_move(mv.from, mv.to)?;
        if let Some(kind) = mv.promotion {
            self.promote(kind)
                .expect("promotion is pending after a pawn reached the last rank");
        }

        Ok(record)
    }

    /// Re-derives `state` for the side to move: finished on checkmate or
    /// stalemate, active otherwise.
    pub(crate) fn refresh_state(&mut self) {
        let side = self.side_to_move;
        if self.has_legal_move(side) {
            self.state = GameState::Active;
            return;
        }

        let outcome = if self.is_in_check(side) {
            info!("checkmate, {:?} wins", side.toggle());
            Outcome::Checkmate {
                winner: side.toggle(),
            }
        } else {
            info!("stalemate");
            Outcome::Stalemate
        };
        self.state = GameState::Finished(outcome);
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            GameState::Active => "active",
            GameState::AwaitingPromotion { .. } => "awaiting promotion",
            GameState::Finished(_) => "finished",
        }
    }
}

//
// Trait implementations
//

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                if let Some(piece) = self.piece_at_coords(rank, file) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank + 1)?;
        }

        for _ in 0..8 {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in b'a'..=b'h' {
            write!(f, " {} ", file as char)?;
        }

        writeln!(f)?;
        Ok(())
    }
}
