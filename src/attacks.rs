// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use arrayvec::ArrayVec;

use crate::position::Position;
use crate::types::Side;

/// A (rank, file) step.
pub type Offset = (i8, i8);

pub static KNIGHT_OFFSETS: [Offset; 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

pub static KING_OFFSETS: [Offset; 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

pub static ORTHOGONALS: [Offset; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

pub static DIAGONALS: [Offset; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

// Targets of a stepping piece from one square. Never more than eight.
type StepTargets = ArrayVec<[Position; 8]>;

struct StepTable {
    table: Vec<StepTargets>,
}

impl StepTable {
    pub fn new(offsets: &[Offset]) -> StepTable {
        let table = Position::all()
            .map(|sq| {
                offsets
                    .iter()
                    .filter_map(|&(dr, df)| sq.offset(dr, df))
                    .collect()
            })
            .collect();
        StepTable { table }
    }

    pub fn targets(&self, sq: Position) -> &[Position] {
        &self.table[sq.as_index()]
    }
}

lazy_static! {
    static ref KING_TABLE: StepTable = StepTable::new(&KING_OFFSETS);
    static ref KNIGHT_TABLE: StepTable = StepTable::new(&KNIGHT_OFFSETS);
}

/// Squares a knight on `sq` jumps to, ignoring occupancy.
pub fn knight_targets(sq: Position) -> &'static [Position] {
    KNIGHT_TABLE.targets(sq)
}

/// Squares adjacent to `sq`.
pub fn king_targets(sq: Position) -> &'static [Position] {
    KING_TABLE.targets(sq)
}

/// Squares a pawn of `side` standing on `sq` attacks. This is the capture
/// pattern only; pawns never attack the square straight ahead.
pub fn pawn_attacks(sq: Position, side: Side) -> ArrayVec<[Position; 2]> {
    let dir = side.pawn_direction();
    [-1, 1]
        .iter()
        .filter_map(|&df| sq.offset(dir, df))
        .collect()
}
