// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Rules enforcement for standard chess.
//!
//! The crate owns a single mutable [`Board`] that generates moves per piece,
//! filters them for legality by simulating each candidate and rolling it back,
//! recognizes checkmate and stalemate, and converts itself to and from a
//! single-line FEN-style notation.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate pest_derive;

pub mod attacks;
mod board;
pub mod notation;
mod perft;
mod piece;
mod position;
pub mod script;
mod types;

pub use board::{Board, CastleSide, GameState, MoveError, MoveRecord, Outcome, PromotionError};
pub use notation::NotationError;
pub use perft::{divide, perft};
pub use piece::MoveVec;
pub use position::{ParsePositionError, Position};
pub use types::{CastleRights, Move, Piece, PieceKind, Side, TableIndex};
pub use types::{PROMOTION_KINDS, SIDES};
