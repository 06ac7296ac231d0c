use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

use crate::board::{Board, Position};

impl Board {
    /// A position is movable iff it is in bounds, is not the empty cell
    /// itself, and sits orthogonally adjacent to the empty cell.
    pub fn can_move(&self, pos: Position) -> bool {
        if pos.row >= self.size || pos.col >= self.size {
            return false;
        }
        let empty = match self.empty_position() {
            Some(empty) => empty,
            None => return false,
        };
        if pos == empty {
            return false;
        }
        pos.row.abs_diff(empty.row) + pos.col.abs_diff(empty.col) == 1
    }

    /// Slides the value at `pos` into the empty cell, returning the new
    /// board. Illegal moves are absorbed: the unchanged board comes back
    /// instead of an error, so any click is safe to forward here.
    pub fn apply_move(&self, pos: Position) -> Board {
        let empty = match self.empty_position() {
            Some(empty) if self.can_move(pos) => empty,
            _ => return self.clone(),
        };
        let mut next = self.clone();
        next.cells[empty.row][empty.col] = next.cells[pos.row][pos.col];
        next.cells[pos.row][pos.col] = 0;
        next
    }

    /// The in-bounds orthogonal neighbors of the empty cell, each of
    /// which is a legal move. Empty for a board with no empty cell.
    pub fn possible_moves(&self) -> Vec<Position> {
        let empty = match self.empty_position() {
            Some(empty) => empty,
            None => return Vec::new(),
        };
        let mut moves = Vec::with_capacity(4);
        if empty.row > 0 {
            moves.push(Position::new(empty.row - 1, empty.col));
        }
        if empty.row + 1 < self.size {
            moves.push(Position::new(empty.row + 1, empty.col));
        }
        if empty.col > 0 {
            moves.push(Position::new(empty.row, empty.col - 1));
        }
        if empty.col + 1 < self.size {
            moves.push(Position::new(empty.row, empty.col + 1));
        }
        moves
    }

    /// Applies `moves` uniform-random legal moves and returns the result.
    /// A step may undo the previous one; that only slows mixing and is
    /// part of the shuffle's contract.
    pub fn shuffle(&self, moves: usize, rng: &mut impl Rng) -> Board {
        let mut board = self.clone();
        for _ in 0..moves {
            let options = board.possible_moves();
            match options.choose(rng) {
                Some(&pos) => board = board.apply_move(pos),
                None => break,
            }
        }
        board
    }

    pub fn shuffled(&self, moves: usize) -> Board {
        self.shuffle(moves, &mut thread_rng())
    }
}

/// Recovers which clicked position turns `from` into `to`, by applying
/// each of `from`'s possible moves and comparing the results. `None` when
/// `to` is not an immediate child of `from`.
pub fn tile_moved_between(from: &Board, to: &Board) -> Option<Position> {
    from.possible_moves()
        .into_iter()
        .find(|&pos| from.apply_move(pos) == *to)
}
