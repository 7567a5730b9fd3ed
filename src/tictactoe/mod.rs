//! Tic-tac-toe board, winning lines and symmetry canonicalization

pub mod board;
pub mod lines;
pub mod symmetry;

pub use board::{Board, Cell, Outcome, Player};
pub use symmetry::{
    CanonicalContext, TRANSFORM_COUNT, canonicalize, inverse_transform_position,
    transform_position,
};
