//! Exact policy search for Wordle-style guessing games
//!
//! Instead of ranking single guesses heuristically, this crate searches the
//! full game tree for a whole policy: which word to open with, and which word
//! to play after every possible feedback, optimized for win probability
//! within the guess budget, expected guesses, or both.
//!
//! The search works on interval bounds. Every position carries a `[min, max]`
//! pair for its win probability and expected remaining guesses; expanding a
//! position tightens the bounds, and tightening propagates back through every
//! path that reaches it. Positions are memoized on their candidate set, so
//! different guess orders that leave the same uncertainty share one node.
//! The search is exact at convergence and interruptible before it: bounds
//! are valid at every moment, and the graph can be checkpointed and resumed.

pub mod commands;
pub mod core;
pub mod oracle;
pub mod output;
pub mod policy;
pub mod search;
pub mod wordlists;
