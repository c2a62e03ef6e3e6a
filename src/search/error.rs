//! Search failure modes
//!
//! Both variants signal a broken invariant rather than a recoverable
//! condition: the engine never expands past the guess budget on a healthy
//! graph, and monotone tightening never crosses a node's bounds unless the
//! graph was corrupted or the update law is wrong.

use crate::search::bounds::Bounds;
use std::fmt;

/// Error type for the expansion and propagation engine
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Expansion was requested for a node that has no guesses left in budget
    ExhaustedBudget {
        depth: u8,
        num_candidates: u32,
        candidates: String,
    },
    /// A bound update crossed, leaving `min > max` on the named node
    InconsistentBounds { node: String, bounds: Bounds },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExhaustedBudget {
                depth,
                num_candidates,
                candidates,
            } => write!(
                f,
                "Guess budget exhausted at depth {depth} with {num_candidates} candidates ({candidates})"
            ),
            Self::InconsistentBounds { node, bounds } => write!(
                f,
                "Inconsistent bounds on {node}: min {} > max {}",
                bounds.min, bounds.max
            ),
        }
    }
}

impl std::error::Error for SearchError {}
