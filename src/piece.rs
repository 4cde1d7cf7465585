// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use arrayvec::ArrayVec;

use crate::attacks::{self, Offset, DIAGONALS, ORTHOGONALS};
use crate::board::Board;
use crate::position::Position;
use crate::types::{CastleRights, Piece, PieceKind, Side};

/// Destination squares for a single piece. A queen in the middle of an empty
/// board reaches 27 squares, the most of any piece.
pub type MoveVec = ArrayVec<[Position; 32]>;

//
// Move generation per piece. Nothing here checks whether the mover's king is
// left in check; `Board` filters for that by simulating each move.
//

impl Piece {
    /// Squares this piece, standing on `from`, can reach by its movement
    /// pattern. Squares held by friendly pieces are excluded; sliding pieces
    /// stop at the first occupied square and include it only when it holds an
    /// enemy.
    pub fn pseudo_moves(&self, from: Position, board: &Board) -> MoveVec {
        let mut moves = MoveVec::new();
        match self.kind {
            PieceKind::Pawn => self.pawn_moves(from, board, &mut moves),
            PieceKind::Knight => self.step(attacks::knight_targets(from), board, &mut moves),
            PieceKind::Bishop => self.slide(from, &DIAGONALS, board, &mut moves),
            PieceKind::Rook => self.slide(from, &ORTHOGONALS, board, &mut moves),
            PieceKind::Queen => {
                self.slide(from, &ORTHOGONALS, board, &mut moves);
                self.slide(from, &DIAGONALS, board, &mut moves);
            }
            PieceKind::King => {
                self.step(attacks::king_targets(from), board, &mut moves);
                self.castling_moves(from, board, &mut moves);
            }
        }

        moves
    }

    /// `pseudo_moves` with every move that would leave this piece's own king
    /// in check removed.
    pub fn legal_moves(&self, from: Position, board: &mut Board) -> MoveVec {
        let side = self.side;
        self.pseudo_moves(from, board)
            .into_iter()
            .filter(|&to| !board.would_be_in_check(from, to, side))
            .collect()
    }

    fn can_land_on(&self, board: &Board, sq: Position) -> bool {
        match board.piece_at(sq) {
            Some(occupant) => self.is_enemy_of(occupant),
            None => true,
        }
    }

    fn step(&self, targets: &[Position], board: &Board, moves: &mut MoveVec) {
        for &target in targets {
            if self.can_land_on(board, target) {
                moves.push(target);
            }
        }
    }

    fn slide(&self, from: Position, directions: &[Offset], board: &Board, moves: &mut MoveVec) {
        for &(dr, df) in directions {
            let mut cursor = from.offset(dr, df);
            while let Some(sq) = cursor {
                match board.piece_at(sq) {
                    None => moves.push(sq),
                    Some(occupant) => {
                        if self.is_enemy_of(occupant) {
                            moves.push(sq);
                        }
                        break;
                    }
                }
                cursor = sq.offset(dr, df);
            }
        }
    }

    fn pawn_moves(&self, from: Position, board: &Board, moves: &mut MoveVec) {
        let dir = self.side.pawn_direction();

        // Pushes. The double step needs both squares in front to be empty.
        if let Some(one_step) = from.offset(dir, 0) {
            if board.piece_at(one_step).is_none() {
                moves.push(one_step);
                if from.rank() == self.side.pawn_rank() {
                    if let Some(two_step) = one_step.offset(dir, 0) {
                        if board.piece_at(two_step).is_none() {
                            moves.push(two_step);
                        }
                    }
                }
            }
        }

        for target in attacks::pawn_attacks(from, self.side) {
            match board.piece_at(target) {
                Some(occupant) if self.is_enemy_of(occupant) => moves.push(target),
                Some(_) => {}
                None => {
                    // En passant: the enemy pawn that just double-stepped sits
                    // beside us, and we capture onto the square it skipped.
                    let ep_file = match board.en_passant_file() {
                        Some(file) => file,
                        None => continue,
                    };

                    if from.rank() != self.side.en_passant_rank() || target.file() != ep_file {
                        continue;
                    }

                    let beside = board.piece_at_coords(from.rank() as i8, ep_file as i8);
                    if beside == Some(Piece::new(PieceKind::Pawn, self.side.toggle())) {
                        moves.push(target);
                    }
                }
            }
        }
    }

    fn castling_moves(&self, from: Position, board: &Board, moves: &mut MoveVec) {
        let side = self.side;
        let rank = side.home_rank();
        if from != king_home(side) || board.is_in_check(side) {
            return;
        }

        let enemy = side.toggle();
        let rook = Some(Piece::new(PieceKind::Rook, side));
        let empty = |file: u8| board.piece_at_coords(rank as i8, file as i8).is_none();
        let safe = |file: u8| match Position::new(rank, file) {
            Some(sq) => !board.is_attacked(sq, enemy),
            None => false,
        };

        // Kingside: f and g empty, and the king never stands on an attacked
        // square on its way from e to g.
        if board.castle_rights().contains(CastleRights::kingside(side))
            && board.piece_at_coords(rank as i8, 7) == rook
            && (5..=6).all(|f| empty(f))
            && (5..=6).all(|f| safe(f))
        {
            moves.extend(Position::new(rank, 6));
        }

        // Queenside: b, c and d empty; only the king's path e-d-c must be safe.
        if board.castle_rights().contains(CastleRights::queenside(side))
            && board.piece_at_coords(rank as i8, 0) == rook
            && (1..=3).all(|f| empty(f))
            && (2..=3).all(|f| safe(f))
        {
            moves.extend(Position::new(rank, 2));
        }
    }
}

/// The square a king starts the game on.
pub(crate) fn king_home(side: Side) -> Position {
    Position::new(side.home_rank(), 4).expect("home rank is on the board")
}

/// The square a rook starts the game on, kingside or queenside.
pub(crate) fn rook_home(side: Side, kingside: bool) -> Position {
    let file = if kingside { 7 } else { 0 };
    Position::new(side.home_rank(), file).expect("home rank is on the board")
}
