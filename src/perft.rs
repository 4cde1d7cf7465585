// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::board::Board;
use crate::types::Move;

/// Counts the move paths of length `depth` from `board`, with each
/// promotion piece counted as its own move. The numbers match published
/// perft tables, which makes this the main correctness check for move
/// generation.
pub fn perft(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut scratch = board.clone();
    let moves = scratch.legal_move_list();
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .par_iter()
        .map(|&mov| perft(&after(board, mov), depth - 1))
        .sum()
}

/// Per-move breakdown of `perft`, in the order the moves are generated.
pub fn divide(board: &Board, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let mut scratch = board.clone();
    let moves = scratch.legal_move_list();
    moves
        .par_iter()
        .map(|&mov| (mov, perft(&after(board, mov), depth - 1)))
        .collect()
}

fn after(board: &Board, mov: Move) -> Board {
    let mut next = board.clone();
    next.play(mov)
        .expect("legal_move_list produced a move the board refused");
    next
}
