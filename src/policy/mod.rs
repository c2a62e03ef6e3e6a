//! Reading a policy out of the searched graph
//!
//! The selector answers "what should be guessed here" from the current
//! bounds; the player replays the policy against a chosen answer, falling
//! back to random candidate guessing wherever the graph was never expanded.

pub mod player;
pub mod selector;

pub use player::{PlayOutcome, Player};
pub use selector::{GuessSummary, Policy, PolicySummary};
