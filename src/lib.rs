//! npuzzle
//!
//! An N-puzzle (sliding-tile) engine: board model, move engine, scoring
//! heuristics, and three greedy auto-solvers that trade optimality for a
//! visited-set-bounded local search with a random escape valve.

mod board;
mod moves;
mod score;
mod solver;

pub use board::{Board, DecodeFallback, DecodedBoard, Position};
pub use moves::tile_moved_between;
pub use solver::{
    fingerprint, solve, solve_greedy_one_layer, solve_greedy_two_layer, solve_mean_grandchild,
    solve_with, SolveError, Strategy, DEFAULT_ITERATION_LIMIT,
};
