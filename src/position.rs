// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::convert::TryFrom;
use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// A square on the board. Rank 0 is White's back rank and file 0 is the a-file.
///
/// Both coordinates are always within `[0, 7]`; off-board arithmetic goes
/// through [`Position::offset`], which yields `None` instead of a square.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    rank: u8,
    file: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ParsePositionError {
    #[error("square must be two characters")]
    BadLength,
    #[error("invalid file '{0}'")]
    InvalidFile(char),
    #[error("invalid rank '{0}'")]
    InvalidRank(char),
}

impl Position {
    pub fn new(rank: u8, file: u8) -> Option<Position> {
        if rank < 8 && file < 8 {
            Some(Position { rank, file })
        } else {
            None
        }
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn file(self) -> u8 {
        self.file
    }

    pub fn offset(self, rank_delta: i8, file_delta: i8) -> Option<Position> {
        let rank = self.rank as i8 + rank_delta;
        let file = self.file as i8 + file_delta;
        if rank < 0 || file < 0 {
            return None;
        }

        Position::new(rank as u8, file as u8)
    }

    pub fn as_index(self) -> usize {
        self.rank as usize * 8 + self.file as usize
    }

    pub fn from_index(idx: usize) -> Option<Position> {
        if idx < 64 {
            Position::new((idx / 8) as u8, (idx % 8) as u8)
        } else {
            None
        }
    }

    /// Every square, a1 first, h8 last.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..64u8).map(|idx| Position {
            rank: idx / 8,
            file: idx % 8,
        })
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file) as char,
            (b'1' + self.rank) as char
        )
    }
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Position, ParsePositionError> {
        let mut chars = s.chars();
        let (file_c, rank_c) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(ParsePositionError::BadLength),
        };

        if !('a'..='h').contains(&file_c) {
            return Err(ParsePositionError::InvalidFile(file_c));
        }
        if !('1'..='8').contains(&rank_c) {
            return Err(ParsePositionError::InvalidRank(rank_c));
        }

        Ok(Position {
            rank: rank_c as u8 - b'1',
            file: file_c as u8 - b'a',
        })
    }
}

impl TryFrom<String> for Position {
    type Error = ParsePositionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Position> for String {
    fn from(pos: Position) -> String {
        pos.to_string()
    }
}
