use crate::board::Board;

impl Board {
    /// City-block (Manhattan) distance to the solved board: for every
    /// non-zero tile, how far its cell is from the goal cell of its value
    /// (value v belongs at row `(v-1)/N`, col `(v-1)%N`). Zero iff
    /// solved. This is the heuristic the solvers rank candidates by.
    pub fn city_block_score(&self) -> u32 {
        let mut score = 0;
        for (i, row) in self.cells.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                let goal_row = (value as usize - 1) / self.size;
                let goal_col = (value as usize - 1) % self.size;
                score += (goal_row.abs_diff(i) + goal_col.abs_diff(j)) as u32;
            }
        }
        score
    }

    /// The cruder linear heuristic: sum over every cell (the empty one
    /// included) of `|row + col + 1 - value|`. Kept as an interchangeable
    /// cost function for comparison; note it is non-zero even on a solved
    /// board, so nothing ranks by it by default.
    pub fn linear_score(&self) -> u32 {
        let mut score = 0i64;
        for (i, row) in self.cells.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                score += ((i + j + 1) as i64 - i64::from(value)).abs();
            }
        }
        score as u32
    }
}

#[cfg(test)]
mod tests {
    use crate::board::{Board, Position};

    #[test]
    fn city_block_zero_iff_solved() {
        for size in 3..=5 {
            assert_eq!(Board::solved(size).city_block_score(), 0);
        }

        let one_off = Board::solved(3).apply_move(Position::new(2, 1));
        assert!(!one_off.is_solved());
        assert_eq!(one_off.city_block_score(), 1);
    }

    #[test]
    fn city_block_counts_each_displaced_tile() {
        // 7 and 8 are each one cell left of their goals.
        let board = Board::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6], vec![0, 7, 8]]);
        assert_eq!(board.city_block_score(), 2);

        // 1 in the far corner is 4 steps from home.
        let board = Board::from_rows(vec![vec![0, 2, 3], vec![4, 5, 6], vec![7, 8, 1]]);
        assert_eq!(board.city_block_score(), 4);
    }

    #[test]
    fn city_block_positive_on_unsolved_boards() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(5);
        let board = Board::solved(4).shuffle(80, &mut rng);
        if board.is_solved() {
            assert_eq!(board.city_block_score(), 0);
        } else {
            assert!(board.city_block_score() > 0);
        }
    }

    #[test]
    fn linear_score_on_the_solved_board() {
        // |i+j+1 - v| summed over all nine cells of the solved 3x3,
        // empty cell included.
        assert_eq!(Board::solved(3).linear_score(), 19);
    }
}
