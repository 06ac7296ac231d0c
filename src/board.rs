use std::fmt;

/// A cell coordinate: `row` and `col` are both in `[0, size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

/// An N×N sliding-tile board holding every value in `0..N²` exactly once,
/// with 0 marking the empty cell. Boards are never mutated in place: every
/// engine operation returns a fresh board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    pub(crate) size: usize,
    pub(crate) cells: Vec<Vec<u32>>,
}

/// Why [`Board::decode`] substituted a solved board for its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeFallback {
    /// Some token did not parse as an integer (covers empty input).
    Unparseable,
    /// The cell count is not a perfect square with side >= 2.
    NotSquare,
    /// The side differs from the caller's expected size.
    SizeMismatch,
    /// The values are not a permutation of `0..count`.
    NotPermutation,
}

/// Outcome of [`Board::decode`]. Both variants carry a valid board, so
/// callers that don't care can just take it; callers that do can tell a
/// parsed board from a substituted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedBoard {
    Parsed(Board),
    FellBack(Board, DecodeFallback),
}

impl DecodedBoard {
    pub fn board(&self) -> &Board {
        match self {
            DecodedBoard::Parsed(board) | DecodedBoard::FellBack(board, _) => board,
        }
    }

    pub fn into_board(self) -> Board {
        match self {
            DecodedBoard::Parsed(board) | DecodedBoard::FellBack(board, _) => board,
        }
    }

    pub fn fell_back(&self) -> bool {
        matches!(self, DecodedBoard::FellBack(..))
    }
}

impl Board {
    /// The canonical solved board: row-major `1..N²-1` with the empty
    /// cell last.
    ///
    /// # Panics
    /// Panics if `size < 2`.
    pub fn solved(size: usize) -> Board {
        assert!(size >= 2, "a puzzle needs at least a 2x2 board");
        let mut cells = Vec::with_capacity(size);
        let mut value = 1;
        for i in 0..size {
            let mut row = Vec::with_capacity(size);
            for j in 0..size {
                if i == size - 1 && j == size - 1 {
                    row.push(0);
                } else {
                    row.push(value);
                    value += 1;
                }
            }
            cells.push(row);
        }
        Board { size, cells }
    }

    /// Builds a board directly from nested rows without validating the
    /// permutation invariant. The caller owns that invariant; the engine
    /// treats a board with no empty cell as corrupt.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Board {
        Board {
            size: rows.len(),
            cells: rows,
        }
    }

    /// Lenient decoder for a comma-separated row-major cell list.
    ///
    /// Malformed input never errors: the result falls back to a solved
    /// board (side = `expected` if given, else the parsed side, else 3)
    /// and the outcome is tagged with the reason.
    pub fn decode(text: &str, expected: Option<usize>) -> DecodedBoard {
        let expected = expected.filter(|&n| n >= 2);
        let fall = |reason: DecodeFallback, side: Option<usize>| {
            DecodedBoard::FellBack(Board::solved(expected.or(side).unwrap_or(3)), reason)
        };

        let parsed: Result<Vec<u32>, _> = text.split(',').map(|t| t.trim().parse()).collect();
        let values = match parsed {
            Ok(values) => values,
            Err(_) => return fall(DecodeFallback::Unparseable, None),
        };

        let side = (values.len() as f64).sqrt().round() as usize;
        if side < 2 || side * side != values.len() {
            return fall(DecodeFallback::NotSquare, None);
        }
        if expected.is_some() && expected != Some(side) {
            return fall(DecodeFallback::SizeMismatch, None);
        }

        let mut seen = vec![false; values.len()];
        for &value in &values {
            let value = value as usize;
            if value >= values.len() || seen[value] {
                return fall(DecodeFallback::NotPermutation, Some(side));
            }
            seen[value] = true;
        }

        let cells = values.chunks(side).map(<[u32]>::to_vec).collect();
        DecodedBoard::Parsed(Board { size: side, cells })
    }

    /// Comma-separated row-major cells; the exact inverse of [`Board::decode`]
    /// for valid boards.
    pub fn encode(&self) -> String {
        self.cells
            .iter()
            .flatten()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.cells
    }

    /// First cell holding 0 in row-major order, or `None` for a board
    /// with no empty cell. Callers receiving `None` should treat the
    /// board as corrupt and not proceed.
    pub fn empty_position(&self) -> Option<Position> {
        for (i, row) in self.cells.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if value == 0 {
                    return Some(Position::new(i, j));
                }
            }
        }
        None
    }

    /// Whether the board equals the canonical solved board of its size.
    pub fn is_solved(&self) -> bool {
        let last = self.size * self.size - 1;
        self.cells
            .iter()
            .flatten()
            .enumerate()
            .all(|(index, &value)| {
                if index == last {
                    value == 0
                } else {
                    value as usize == index + 1
                }
            })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for &value in row {
                if value == 0 {
                    write!(f, " . ")?;
                } else {
                    write!(f, "{:2} ", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
