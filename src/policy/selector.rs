//! Guess selection from searched bounds

use crate::core::{CandidateSet, WordList};
use crate::search::{Bounds, Engine, Graph, GuessId, Objective, StateId, cmp_pairs};
use std::cmp::Ordering;

/// One first-guess line in a policy summary
#[derive(Debug, Clone)]
pub struct GuessSummary {
    pub word: String,
    pub prob: Bounds,
    pub expected: Bounds,
    pub converged: bool,
}

/// A state's bounds plus its alternatives, best first
#[derive(Debug, Clone)]
pub struct PolicySummary {
    pub prob: Bounds,
    pub expected: Bounds,
    pub alternatives: Vec<GuessSummary>,
}

/// Read-only view that picks guesses by the search's current bounds
pub struct Policy<'a> {
    graph: &'a Graph,
    words: &'a WordList,
    objective: Objective,
    tolerance: f64,
}

impl<'a> Policy<'a> {
    #[must_use]
    pub fn new(engine: &'a Engine<'a>) -> Self {
        Self {
            graph: engine.graph(),
            words: engine.words(),
            objective: engine.config().objective,
            tolerance: engine.config().tolerance,
        }
    }

    /// The best guess tried at `sid`, or `None` where nothing was expanded
    ///
    /// Ties on the objective criteria fall to the guess leaving the fewest
    /// candidates on average.
    #[must_use]
    pub fn best_guess(&self, sid: StateId) -> Option<GuessId> {
        let state = self.graph.state(sid);
        let mut best: Option<GuessId> = None;
        for &gid in &state.alternatives {
            best = match best {
                Some(cur) if !self.better(gid, cur) => Some(cur),
                _ => Some(gid),
            };
        }
        best
    }

    /// The word the policy plays at `sid`
    #[must_use]
    pub fn best_word(&self, sid: StateId) -> Option<&'a str> {
        self.best_guess(sid)
            .map(|gid| self.words.guess(self.graph.guess(gid).word).text())
    }

    /// The child state a guess leads to for an observed candidate set
    #[must_use]
    pub fn child_after(&self, gid: GuessId, observed: &CandidateSet) -> Option<StateId> {
        self.graph
            .guess(gid)
            .children
            .iter()
            .map(|&(child, _)| child)
            .find(|&child| self.graph.state(child).candidates == *observed)
    }

    /// The state's bounds and every alternative, sorted best first
    #[must_use]
    pub fn summary(&self, sid: StateId) -> PolicySummary {
        let state = self.graph.state(sid);
        let mut ranked: Vec<GuessId> = state.alternatives.clone();
        ranked.sort_by(|&a, &b| {
            if a == b {
                Ordering::Equal
            } else if self.better(a, b) {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        let alternatives = ranked
            .into_iter()
            .map(|gid| {
                let guess = self.graph.guess(gid);
                GuessSummary {
                    word: self.words.guess(guess.word).text().to_string(),
                    prob: guess.prob,
                    expected: guess.expected,
                    converged: guess.prob.converged(self.tolerance)
                        && guess.expected.converged(self.tolerance),
                }
            })
            .collect();
        PolicySummary {
            prob: state.prob,
            expected: state.expected,
            alternatives,
        }
    }

    /// True when guess `a` ranks ahead of `b`
    fn better(&self, a: GuessId, b: GuessId) -> bool {
        let ga = self.graph.guess(a);
        let gb = self.graph.guess(b);
        if self.objective.maximize_win() {
            match cmp_pairs(ga.prob, gb.prob, self.tolerance) {
                Ordering::Greater => return true,
                Ordering::Less => return false,
                Ordering::Equal => {}
            }
        }
        if self.objective.track_guesses() {
            match cmp_pairs(ga.expected, gb.expected, self.tolerance) {
                Ordering::Less => return true,
                Ordering::Greater => return false,
                Ordering::Equal => {}
            }
        }
        self.graph.average_child_candidates(ga) < self.graph.average_child_candidates(gb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Word;
    use crate::oracle::FeedbackMatrix;
    use crate::search::SearchConfig;

    fn toy_words() -> WordList {
        let texts = [
            "abcde", "abcdf", "abcdg", "abcdh", "abcdi", "abcdj", "abcdk", "abcdl", "abcdm",
            "egikm",
        ];
        WordList::from_solutions(texts.iter().map(|t| Word::new(*t).unwrap()).collect()).unwrap()
    }

    #[test]
    fn converged_policy_picks_the_separating_opener() {
        let words = toy_words();
        let matrix = FeedbackMatrix::build(&words);
        let mut engine = Engine::new(&words, &matrix, SearchConfig::default());
        assert!(engine.run_steps(200_000).unwrap().done);

        let policy = Policy::new(&engine);
        assert_eq!(policy.best_word(engine.root()), Some("egikm"));
    }

    #[test]
    fn summary_ranks_the_best_guess_first() {
        let words = toy_words();
        let matrix = FeedbackMatrix::build(&words);
        let mut engine = Engine::new(&words, &matrix, SearchConfig::default());
        assert!(engine.run_steps(200_000).unwrap().done);

        let policy = Policy::new(&engine);
        let summary = policy.summary(engine.root());
        assert_eq!(summary.alternatives.len(), 10);
        assert_eq!(summary.alternatives[0].word, "egikm");
        assert!(summary.alternatives[0].converged);
        assert_eq!(summary.alternatives[0].prob, Bounds::point(1.0));
        // Every other opener risks running out of guesses
        for other in &summary.alternatives[1..] {
            assert!(other.prob.max < 1.0);
        }
    }

    #[test]
    fn unexpanded_state_has_no_guess() {
        let words = toy_words();
        let matrix = FeedbackMatrix::build(&words);
        let engine = Engine::new(&words, &matrix, SearchConfig::default());
        let policy = Policy::new(&engine);
        assert_eq!(policy.best_guess(engine.root()), None);
    }
}
