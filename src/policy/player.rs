//! Replaying a policy against a known answer
//!
//! Follows best guesses through the graph for as long as expanded states
//! exist for the observed feedback. Where the graph runs out (a pruned
//! branch, or a position that never needed expansion), play degrades to
//! uniform random guessing over the live candidates, which is exactly the
//! assumption the search's forced-position bounds encode.

use crate::core::{CandidateSet, WordList, WordListError};
use crate::oracle::FeedbackMatrix;
use crate::policy::selector::Policy;
use crate::search::{Engine, Graph, StateId};
use rand::seq::IndexedRandom;

/// One played game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    pub guesses: Vec<String>,
    pub won: bool,
}

impl PlayOutcome {
    /// Number of guesses used
    #[must_use]
    pub fn turns(&self) -> usize {
        self.guesses.len()
    }
}

/// Plays games with the searched policy
pub struct Player<'a> {
    graph: &'a Graph,
    words: &'a WordList,
    matrix: &'a FeedbackMatrix,
    policy: Policy<'a>,
    root: StateId,
    budget: u8,
}

impl<'a> Player<'a> {
    #[must_use]
    pub fn new(engine: &'a Engine<'a>) -> Self {
        Self {
            graph: engine.graph(),
            words: engine.words(),
            matrix: engine.matrix(),
            policy: Policy::new(engine),
            root: engine.root(),
            budget: engine.config().max_guesses,
        }
    }

    /// Play one game against `solution`
    ///
    /// # Errors
    /// Returns [`WordListError::Unknown`] when `solution` is not a possible
    /// answer; guess-pool words cannot be played against.
    pub fn play(&self, solution: &str) -> Result<PlayOutcome, WordListError> {
        let target = self.words.index_of(solution)?;
        if target as usize >= self.words.solution_count() {
            return Err(WordListError::Unknown(solution.to_string()));
        }

        let mut rng = rand::rng();
        let mut guesses = Vec::new();
        let mut current = Some(self.root);
        let mut fallback: Option<CandidateSet> = None;

        while guesses.len() < self.budget as usize {
            if let Some(sid) = current {
                let Some(gid) = self.policy.best_guess(sid) else {
                    // Nothing expanded here; finish the game on candidates alone
                    fallback = Some(self.graph.state(sid).candidates.clone());
                    current = None;
                    continue;
                };
                let word = self.graph.guess(gid).word;
                guesses.push(self.words.guess(word).text().to_string());
                if word == target {
                    return Ok(PlayOutcome {
                        guesses,
                        won: true,
                    });
                }
                let observed = self
                    .graph
                    .state(sid)
                    .candidates
                    .and(self.matrix.remaining(target, word));
                match self.policy.child_after(gid, &observed) {
                    Some(child) => current = Some(child),
                    None => {
                        fallback = Some(observed);
                        current = None;
                    }
                }
            } else {
                let Some(set) = fallback.clone() else { break };
                let members: Vec<u32> = set.iter().collect();
                let Some(&word) = members.choose(&mut rng) else {
                    break;
                };
                guesses.push(self.words.guess(word).text().to_string());
                if word == target {
                    return Ok(PlayOutcome {
                        guesses,
                        won: true,
                    });
                }
                fallback = Some(set.and(self.matrix.remaining(target, word)));
            }
        }
        Ok(PlayOutcome {
            guesses,
            won: false,
        })
    }
}
