//! Feedback oracle and the precomputed feedback matrix
//!
//! The oracle is the single place where the game's feedback rules live. The
//! matrix caches its output for every (solution, guess) pair so the search
//! never re-derives feedback.

pub mod feedback;
pub mod matrix;

pub use feedback::remaining_candidates;
pub use matrix::{FeedbackMatrix, TableError};
