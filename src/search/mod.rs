//! The policy search: memoized state/guess graph, expansion, and bound propagation

pub mod bounds;
pub mod checkpoint;
pub mod engine;
pub mod error;
pub mod graph;
pub mod objective;

pub use bounds::{Bounds, cmp_pairs};
pub use checkpoint::CheckpointError;
pub use engine::{Engine, ProgressReport, RunStatus, SearchConfig, StepOutcome};
pub use error::SearchError;
pub use graph::{CacheStats, Graph, Guess, GuessId, State, StateId};
pub use objective::Objective;
