//! The fixed winning lines of the 3x3 grid

/// All eight three-cell lines: rows, columns, diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cell_appears_in_a_line() {
        for pos in 0..9 {
            assert!(
                WINNING_LINES.iter().any(|line| line.contains(&pos)),
                "position {pos} missing from all lines"
            );
        }
    }

    #[test]
    fn center_appears_in_four_lines() {
        let count = WINNING_LINES
            .iter()
            .filter(|line| line.contains(&4))
            .count();
        assert_eq!(count, 4);
    }
}
