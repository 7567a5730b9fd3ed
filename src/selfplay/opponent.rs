//! Scripted opponents for bulk self-play

use std::collections::HashMap;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::tictactoe::{Board, Player, canonicalize};
use crate::{Error, Result};

/// A scripted opponent the self-play runner can pit the agent against.
///
/// Policies receive the runner's RNG so runs stay reproducible under a
/// fixed seed.
pub trait OpponentPolicy: Send + Sync {
    fn name(&self) -> &str;

    /// Pick a move for `mark` on `board`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalMoves`] on a terminal board.
    fn select_move(&self, board: &Board, mark: Player, rng: &mut StdRng) -> Result<usize>;
}

/// Plays a uniformly random legal move.
#[derive(Debug, Default)]
pub struct RandomOpponent;

impl RandomOpponent {
    pub fn new() -> Self {
        Self
    }
}

impl OpponentPolicy for RandomOpponent {
    fn name(&self) -> &str {
        "random"
    }

    fn select_move(&self, board: &Board, _mark: Player, rng: &mut StdRng) -> Result<usize> {
        board
            .legal_moves()
            .choose(rng)
            .copied()
            .ok_or(Error::NoLegalMoves)
    }
}

/// Plays perfectly via exhaustive game-tree search.
///
/// Positions are scored from X's perspective (+1 X wins, 0 draw, -1 O wins)
/// and memoized by canonical state plus player to move, so the search is
/// cheap after warm-up. Ties between equally good moves are broken uniformly
/// at random.
#[derive(Debug, Default)]
pub struct OptimalOpponent {
    memo: Mutex<HashMap<(String, Player), i32>>,
}

impl OptimalOpponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score of `board` with `to_move` to play, from X's perspective.
    fn score(&self, board: &Board, to_move: Player) -> i32 {
        if let Some(winner) = board.winner() {
            return match winner {
                Player::X => 1,
                Player::O => -1,
            };
        }
        if board.is_full() {
            return 0;
        }

        let key = (canonicalize(board).encoding, to_move);
        if let Some(&cached) = self.memo.lock().unwrap().get(&key) {
            return cached;
        }

        let next = to_move.opponent();
        let scores = board
            .legal_moves()
            .into_iter()
            .filter_map(|m| board.make_move(m, to_move).ok())
            .map(|child| self.score(&child, next));
        let best = match to_move {
            Player::X => scores.max(),
            Player::O => scores.min(),
        };
        // legal_moves is non-empty here, so a best score always exists.
        let best = best.unwrap_or(0);

        self.memo.lock().unwrap().insert(key, best);
        best
    }
}

impl OpponentPolicy for OptimalOpponent {
    fn name(&self) -> &str {
        "optimal"
    }

    fn select_move(&self, board: &Board, mark: Player, rng: &mut StdRng) -> Result<usize> {
        let legal_moves = board.legal_moves();
        if legal_moves.is_empty() {
            return Err(Error::NoLegalMoves);
        }

        let next = mark.opponent();
        let scored: Vec<(usize, i32)> = legal_moves
            .into_iter()
            .filter_map(|m| {
                board
                    .make_move(m, mark)
                    .ok()
                    .map(|child| (m, self.score(&child, next)))
            })
            .collect();

        let best_score = match mark {
            Player::X => scored.iter().map(|&(_, s)| s).max(),
            Player::O => scored.iter().map(|&(_, s)| s).min(),
        }
        .ok_or(Error::NoLegalMoves)?;

        let best_moves: Vec<usize> = scored
            .into_iter()
            .filter(|&(_, s)| s == best_score)
            .map(|(m, _)| m)
            .collect();
        best_moves.choose(rng).copied().ok_or(Error::NoLegalMoves)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn random_opponent_picks_legal_moves() {
        let opponent = RandomOpponent::new();
        let board = Board::from_encoding("X_O_X_O__").unwrap();
        let mut rng = rng();
        for _ in 0..50 {
            let m = opponent.select_move(&board, Player::X, &mut rng).unwrap();
            assert!(board.legal_moves().contains(&m));
        }
    }

    #[test]
    fn terminal_boards_yield_no_move() {
        let opponent = RandomOpponent::new();
        let board = Board::from_encoding("XOXXOOOXX").unwrap();
        let mut rng = rng();
        assert!(matches!(
            opponent.select_move(&board, Player::X, &mut rng),
            Err(Error::NoLegalMoves)
        ));
    }

    #[test]
    fn optimal_opponent_takes_an_immediate_win() {
        let opponent = OptimalOpponent::new();
        // X to move, 2 completes the top row.
        let board = Board::from_encoding("XX__OO___").unwrap();
        let mut rng = rng();
        for _ in 0..10 {
            assert_eq!(opponent.select_move(&board, Player::X, &mut rng).unwrap(), 2);
        }
    }

    #[test]
    fn optimal_opponent_blocks_an_immediate_loss() {
        let opponent = OptimalOpponent::new();
        // O to move; X threatens the top row at 2.
        let board = Board::from_encoding("XX__O____").unwrap();
        let mut rng = rng();
        for _ in 0..10 {
            assert_eq!(opponent.select_move(&board, Player::O, &mut rng).unwrap(), 2);
        }
    }

    #[test]
    fn perfect_play_against_itself_always_draws() {
        let opponent = OptimalOpponent::new();
        let mut rng = rng();

        for _ in 0..5 {
            let mut board = Board::new();
            let mut to_move = Player::X;
            while !board.is_terminal() {
                let m = opponent.select_move(&board, to_move, &mut rng).unwrap();
                board = board.make_move(m, to_move).unwrap();
                to_move = to_move.opponent();
            }
            assert_eq!(board.winner(), None, "perfect play must draw:\n{board}");
        }
    }
}
