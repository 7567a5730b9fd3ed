//! Board representation and game logic
//!
//! The wire encoding is a 9-character string over `_` (empty), `X` and `O`,
//! row-major with indices 0-8:
//!
//! ```text
//! 0 | 1 | 2
//! ---------
//! 3 | 4 | 5
//! ---------
//! 6 | 7 | 8
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::lines::WINNING_LINES;
use crate::{Error, Result};

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    X,
    O,
}

impl Cell {
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '_',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '_' => Some(Cell::Empty),
            'X' => Some(Cell::X),
            'O' => Some(Cell::O),
            _ => None,
        }
    }
}

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opposing player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Outcome of a finished episode from the agent's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// An immutable board position.
///
/// `Board` is `Copy` (9 bytes of cells); every move produces a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; 9],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; 9],
        }
    }

    /// Create a board from the 9-character wire encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBoardLength`] for anything other than exactly
    /// 9 characters, and [`Error::InvalidCellCharacter`] for characters
    /// outside `_`, `X`, `O`.
    pub fn from_encoding(encoding: &str) -> Result<Self> {
        let chars: Vec<char> = encoding.chars().collect();
        if chars.len() != 9 {
            return Err(Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: encoding.to_string(),
            });
        }

        let mut cells = [Cell::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: encoding.to_string(),
            })?;
        }

        Ok(Board { cells })
    }

    /// Create a board directly from a cell array
    pub fn from_cells(cells: [Cell; 9]) -> Self {
        Board { cells }
    }

    /// The 9-character wire encoding of this board
    pub fn encode(&self) -> String {
        self.cells.iter().map(|c| c.to_char()).collect()
    }

    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    pub fn cell(&self, position: usize) -> Option<Cell> {
        self.cells.get(position).copied()
    }

    /// All empty positions, in ascending order
    pub fn legal_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Apply a move, producing a new board.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPosition`] for indices outside 0-8 and
    /// [`Error::OccupiedCell`] for non-empty cells.
    pub fn make_move(&self, position: usize, player: Player) -> Result<Board> {
        if position > 8 {
            return Err(Error::InvalidPosition { position });
        }
        if self.cells[position] != Cell::Empty {
            return Err(Error::OccupiedCell { position });
        }

        let mut cells = self.cells;
        cells[position] = player.to_cell();
        Ok(Board { cells })
    }

    /// The winning player, if any line is uniformly non-empty
    pub fn winner(&self) -> Option<Player> {
        for line in &WINNING_LINES {
            let first = self.cells[line[0]];
            if first != Cell::Empty
                && first == self.cells[line[1]]
                && first == self.cells[line[2]]
            {
                return match first {
                    Cell::X => Some(Player::X),
                    Cell::O => Some(Player::O),
                    Cell::Empty => None,
                };
            }
        }
        None
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }

    /// True once the game has ended (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    /// The result from `player`'s perspective, or `None` while in progress
    pub fn result_for(&self, player: Player) -> Option<Outcome> {
        match self.winner() {
            Some(winner) if winner == player => Some(Outcome::Win),
            Some(_) => Some(Outcome::Loss),
            None if self.is_full() => Some(Outcome::Draw),
            None => None,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.encode();
        let b = e.as_bytes();
        for row in 0..3 {
            writeln!(
                f,
                "{} | {} | {}",
                b[row * 3] as char,
                b[row * 3 + 1] as char,
                b[row * 3 + 2] as char
            )?;
            if row < 2 {
                writeln!(f, "---------")?;
            }
        }
        Ok(())
    }
}
