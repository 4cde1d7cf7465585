// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Move lists in coordinate notation, the form the command line and tests
//! feed to a board: `e2e4`, optional move numbers (`1.`, `12...`), and a
//! promotion suffix on pawn moves reaching the last rank (`e7e8q`, `e7e8=Q`).

use std::convert::TryFrom;

use pest::iterators::Pair;
use pest::Parser;
use thiserror::Error;

use crate::board::{Board, MoveError};
use crate::position::Position;
use crate::types::{Move, PieceKind};

#[derive(Parser)]
#[grammar = "script.pest"]
struct ScriptParser;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("move {ply} ({mv}): {source}")]
    IllegalMove {
        ply: usize,
        mv: Move,
        source: MoveError,
    },
}

/// Parses a whitespace-separated list of coordinate moves.
pub fn parse_moves(input: &str) -> Result<Vec<Move>, ScriptError> {
    let pairs = ScriptParser::parse(Rule::script, input)
        .map_err(|err| ScriptError::Syntax(err.to_string()))?;

    let mut moves = Vec::new();
    for pair in pairs.flat_map(|script| script.into_inner()) {
        if pair.as_rule() == Rule::coordinate_move {
            moves.push(coordinate_move(pair)?);
        }
    }

    Ok(moves)
}

fn coordinate_move(pair: Pair<Rule>) -> Result<Move, ScriptError> {
    let text = pair.as_str();
    let syntax = |_| ScriptError::Syntax(format!("bad move '{}'", text));

    let mut squares = Vec::with_capacity(2);
    let mut promotion = None;
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::square => {
                let sq = part.as_str().parse::<Position>().map_err(|_| syntax(()))?;
                squares.push(sq);
            }
            Rule::promotion => {
                let letter = part.as_str().chars().last().ok_or_else(|| syntax(()))?;
                promotion = Some(PieceKind::try_from(letter).map_err(syntax)?);
            }
            _ => {}
        }
    }

    match squares.as_slice() {
        [from, to] => Ok(Move {
            from: *from,
            to: *to,
            promotion,
        }),
        _ => Err(syntax(())),
    }
}

/// Plays `moves` in order. Stops at the first move the board refuses and
/// reports its 1-based ply; earlier moves stay played.
pub fn replay(board: &mut Board, moves: &[Move]) -> Result<(), ScriptError> {
    for (idx, &mv) in moves.iter().enumerate() {
        board.play(mv).map_err(|source| ScriptError::IllegalMove {
            ply: idx + 1,
            mv,
            source,
        })?;
    }

    Ok(())
}
