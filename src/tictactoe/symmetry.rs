//! D4 symmetry group operations for board canonicalization
//!
//! The 8 transforms (identity, 3 rotations, 4 reflections) are stored as
//! forward image maps: `TRANSFORMS[t][p]` is the position that cell `p`
//! lands on. Applying transform `t` to a board therefore satisfies
//! `transformed[TRANSFORMS[t][p]] == board[p]`, so the same table maps both
//! cells and move indices.

use super::board::{Board, Cell};

/// Number of symmetry transforms
pub const TRANSFORM_COUNT: usize = 8;

/// Forward image maps for the 8 D4 transforms, in canonicalization order.
pub const TRANSFORMS: [[usize; 9]; TRANSFORM_COUNT] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8], // identity
    [2, 5, 8, 1, 4, 7, 0, 3, 6], // rotate 90 degrees clockwise
    [8, 7, 6, 5, 4, 3, 2, 1, 0], // rotate 180 degrees
    [6, 3, 0, 7, 4, 1, 8, 5, 2], // rotate 270 degrees clockwise
    [2, 1, 0, 5, 4, 3, 8, 7, 6], // mirror across the vertical axis
    [6, 7, 8, 3, 4, 5, 0, 1, 2], // mirror across the horizontal axis
    [0, 3, 6, 1, 4, 7, 2, 5, 8], // mirror across the main diagonal
    [8, 5, 2, 7, 4, 1, 6, 3, 0], // mirror across the anti-diagonal
];

/// Inverse image maps: `INVERSE_TRANSFORMS[t][TRANSFORMS[t][p]] == p`.
///
/// Rotations by 90 and 270 degrees are each other's inverse; every other
/// transform is an involution.
pub const INVERSE_TRANSFORMS: [[usize; 9]; TRANSFORM_COUNT] = [
    TRANSFORMS[0],
    TRANSFORMS[3],
    TRANSFORMS[2],
    TRANSFORMS[1],
    TRANSFORMS[4],
    TRANSFORMS[5],
    TRANSFORMS[6],
    TRANSFORMS[7],
];

/// Map a concrete position into canonical coordinates
pub fn transform_position(position: usize, transform: usize) -> usize {
    TRANSFORMS[transform][position]
}

/// Map a canonical position back into concrete coordinates
pub fn inverse_transform_position(position: usize, transform: usize) -> usize {
    INVERSE_TRANSFORMS[transform][position]
}

fn apply_to_cells(cells: &[Cell; 9], transform: usize) -> [Cell; 9] {
    let mut transformed = [Cell::Empty; 9];
    for (pos, &cell) in cells.iter().enumerate() {
        transformed[TRANSFORMS[transform][pos]] = cell;
    }
    transformed
}

/// Cached result of canonicalization.
///
/// Canonicalizing searches all 8 transforms; callers that need the state,
/// the encoding and move mapping should canonicalize once and reuse this.
#[derive(Debug, Clone)]
pub struct CanonicalContext {
    /// Wire encoding of the canonical state
    pub encoding: String,
    /// Index of the transform that maps the original board to the canonical one
    pub transform: usize,
}

impl CanonicalContext {
    /// Map a move from concrete coordinates to canonical coordinates
    pub fn to_canonical(&self, position: usize) -> usize {
        transform_position(position, self.transform)
    }

    /// Map a move from canonical coordinates back to concrete coordinates
    pub fn to_concrete(&self, position: usize) -> usize {
        inverse_transform_position(position, self.transform)
    }
}

/// Canonicalize a board under the 8 D4 symmetries.
///
/// Returns the lexicographically smallest wire encoding among all 8 images
/// together with the transform that produced it. Ties break toward the
/// earliest transform index, so the result is deterministic.
pub fn canonicalize(board: &Board) -> CanonicalContext {
    let mut best_encoding: Option<String> = None;
    let mut best_transform = 0;

    for t in 0..TRANSFORM_COUNT {
        let image = Board::from_cells(apply_to_cells(board.cells(), t));
        let encoding = image.encode();
        match &best_encoding {
            Some(best) if *best <= encoding => {}
            _ => {
                best_encoding = Some(encoding);
                best_transform = t;
            }
        }
    }

    CanonicalContext {
        encoding: best_encoding.unwrap_or_else(|| board.encode()),
        transform: best_transform,
    }
}

impl Board {
    /// Apply symmetry transform `t` to the board
    pub fn transform(&self, t: usize) -> Board {
        Board::from_cells(apply_to_cells(self.cells(), t))
    }

    /// Canonicalize this board; see [`canonicalize`]
    pub fn canonical_context(&self) -> CanonicalContext {
        canonicalize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transforms_are_permutations() {
        for table in &TRANSFORMS {
            let mut seen = [false; 9];
            for &image in table {
                assert!(!seen[image], "duplicate image in {table:?}");
                seen[image] = true;
            }
        }
    }

    #[test]
    fn inverse_tables_invert_forward_tables() {
        for t in 0..TRANSFORM_COUNT {
            for p in 0..9 {
                assert_eq!(INVERSE_TRANSFORMS[t][TRANSFORMS[t][p]], p);
            }
        }
    }

    #[test]
    fn position_round_trip_holds_for_all_pairs() {
        for t in 0..TRANSFORM_COUNT {
            for p in 0..9 {
                let canonical = transform_position(p, t);
                assert_eq!(inverse_transform_position(canonical, t), p);
            }
        }
    }

    #[test]
    fn empty_board_is_its_own_canonical_form() {
        let ctx = canonicalize(&Board::new());
        assert_eq!(ctx.encoding, "_________");
        assert_eq!(ctx.transform, 0);
    }

    #[test]
    fn all_symmetric_images_share_one_canonical_state() {
        let board = Board::from_encoding("X_____O__").unwrap();
        let canonical = canonicalize(&board).encoding;
        for t in 0..TRANSFORM_COUNT {
            let image = board.transform(t);
            assert_eq!(
                canonicalize(&image).encoding,
                canonical,
                "image under transform {t} canonicalized differently"
            );
        }
    }

    #[test]
    fn canonical_move_mapping_targets_the_same_cell() {
        // Moving then canonicalizing must agree with canonicalizing then
        // moving at the transformed position.
        let board = Board::from_encoding("__X___O__").unwrap();
        let ctx = board.canonical_context();
        let canonical = board.transform(ctx.transform);

        for mv in board.legal_moves() {
            let canonical_move = ctx.to_canonical(mv);
            assert_eq!(
                canonical.cell(canonical_move),
                Some(Cell::Empty),
                "canonical move {canonical_move} should be empty"
            );
            assert_eq!(ctx.to_concrete(canonical_move), mv);
        }
    }
}
