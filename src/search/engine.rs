//! Expansion and bound-propagation engine
//!
//! The engine grows the state/guess graph one guess at a time. Each step
//! either expands the most promising open position by one untried guess, or
//! recomputes a position whose alternatives are all expanded but not yet
//! settled. After every change, bounds are back-propagated through all
//! incoming edges with an explicit work list until nothing moves.
//!
//! Success-probability bounds only ever tighten; a crossed interval is a hard
//! [`SearchError::InconsistentBounds`]. Expected-guess bounds are estimates
//! combined by a probability-weighted law and are reassigned rather than
//! tightened, normalizing the pair order on every update.

use crate::core::{CandidateSet, WordList};
use crate::oracle::FeedbackMatrix;
use crate::search::bounds::{Bounds, cmp_pairs};
use crate::search::error::SearchError;
use crate::search::graph::{CacheStats, Graph, Guess, GuessId, StateId};
use crate::search::objective::Objective;
use std::cmp::Ordering;

/// Tunable search parameters
#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Total guesses allowed per game
    pub max_guesses: u8,
    /// Convergence tolerance on bound widths and comparisons
    pub tolerance: f64,
    pub objective: Objective,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_guesses: 6,
            tolerance: 1e-12,
            objective: Objective::default(),
        }
    }
}

/// What a single engine step did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A new guess was added under this state
    Expanded(StateId),
    /// A fully expanded state was recomputed instead of growing the graph
    Repaired { state: StateId, changed: bool },
    /// The search had already converged; nothing was done
    Converged,
}

/// Result of a bounded run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    pub done: bool,
    pub steps: u64,
    /// A repair pass changed nothing while the search was not done
    pub stalled: bool,
}

/// Snapshot of search progress at the root
#[derive(Debug, Clone)]
pub struct ProgressReport {
    pub cache: CacheStats,
    pub prob: Bounds,
    pub expected: Bounds,
    /// First guesses tried so far
    pub explored: usize,
    /// First guesses available in total
    pub total: u32,
    /// Converged first guesses that win with certainty
    pub guaranteed: Vec<String>,
    pub converged: Vec<(String, Bounds, Bounds)>,
    /// Unconverged first guesses whose win probability is already at least half
    pub promising: Vec<(String, Bounds, Bounds)>,
}

enum Selection {
    Expand(StateId),
    Refresh(StateId),
}

/// The search driver: owns the graph, borrows the word list and matrix
pub struct Engine<'a> {
    words: &'a WordList,
    matrix: &'a FeedbackMatrix,
    config: SearchConfig,
    graph: Graph,
    root: StateId,
}

impl<'a> Engine<'a> {
    /// A fresh search over the full solution set
    #[must_use]
    pub fn new(words: &'a WordList, matrix: &'a FeedbackMatrix, config: SearchConfig) -> Self {
        debug_assert_eq!(matrix.solution_count(), words.solution_count());
        debug_assert_eq!(matrix.guess_count(), words.guess_count());

        // A zero budget would underflow the depth guards; one guess is the floor
        let mut config = config;
        config.max_guesses = config.max_guesses.max(1);

        let n = words.solution_count();
        let (prob, expected) = if config.objective.maximize_win() && config.max_guesses == 1 {
            // The whole game is one forced guess spent on a candidate at random
            let p = 1.0 / n as f64;
            (Bounds::point(p), Bounds::point((n as f64 / 2.0).max(1.0)))
        } else {
            let expected_max = if config.objective.maximize_win() {
                f64::from(config.max_guesses)
            } else {
                (n as f64 / 2.0).max(1.0)
            };
            (Bounds::new(0.0, 1.0), Bounds::new(1.0, expected_max))
        };
        let mut graph = Graph::new();
        let (root, _) = graph.get_or_create(0, CandidateSet::full(n), prob, expected);
        Self {
            words,
            matrix,
            config,
            graph,
            root,
        }
    }

    /// Rebuild an engine around a previously saved graph
    ///
    /// Returns `None` when the graph has no root state for this word list.
    pub fn from_graph(
        words: &'a WordList,
        matrix: &'a FeedbackMatrix,
        config: SearchConfig,
        graph: Graph,
    ) -> Option<Self> {
        let mut config = config;
        config.max_guesses = config.max_guesses.max(1);
        let root = graph.lookup(0, &CandidateSet::full(words.solution_count()))?;
        Some(Self {
            words,
            matrix,
            config,
            graph,
            root,
        })
    }

    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[must_use]
    pub fn root(&self) -> StateId {
        self.root
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn words(&self) -> &'a WordList {
        self.words
    }

    #[must_use]
    pub fn matrix(&self) -> &'a FeedbackMatrix {
        self.matrix
    }

    /// Whether the root's alternatives are all explored and settled
    ///
    /// Settled means converged, or dominated: a first guess whose best case
    /// cannot reach the win probability another guess already guarantees needs
    /// no further work.
    #[must_use]
    pub fn is_done(&self) -> bool {
        // Converged bounds settle the root outright; a one-guess budget
        // starts there and never expands
        if self.state_converged(self.root) {
            return true;
        }
        let root = self.graph.state(self.root);
        if !root.explored_all() {
            return false;
        }
        root.alternatives
            .iter()
            .all(|&gid| self.guess_settled(gid, root.prob.min))
    }

    /// Run one step: expand the selected position, or repair it when fully
    /// expanded
    ///
    /// # Errors
    /// Returns [`SearchError`] when a graph invariant is broken.
    pub fn step(&mut self) -> Result<StepOutcome, SearchError> {
        if self.is_done() {
            return Ok(StepOutcome::Converged);
        }
        match self.select() {
            Selection::Expand(sid) => {
                self.expand(sid)?;
                Ok(StepOutcome::Expanded(sid))
            }
            Selection::Refresh(sid) => {
                let changed = self.refresh(sid)?;
                Ok(StepOutcome::Repaired {
                    state: sid,
                    changed,
                })
            }
        }
    }

    /// Run up to `limit` steps, stopping early on convergence or a stall
    ///
    /// # Errors
    /// Returns [`SearchError`] when a graph invariant is broken.
    pub fn run_steps(&mut self, limit: u64) -> Result<RunStatus, SearchError> {
        let mut steps = 0;
        while steps < limit {
            match self.step()? {
                StepOutcome::Converged => {
                    return Ok(RunStatus {
                        done: true,
                        steps,
                        stalled: false,
                    });
                }
                StepOutcome::Expanded(_) => steps += 1,
                StepOutcome::Repaired { changed, .. } => {
                    steps += 1;
                    if !changed {
                        // Selection is deterministic: a no-op repair would repeat forever
                        return Ok(RunStatus {
                            done: self.is_done(),
                            steps,
                            stalled: true,
                        });
                    }
                }
            }
        }
        Ok(RunStatus {
            done: self.is_done(),
            steps,
            stalled: false,
        })
    }

    /// Current root-level progress
    #[must_use]
    pub fn progress(&self) -> ProgressReport {
        let root = self.graph.state(self.root);
        let tol = self.config.tolerance;
        let mut guaranteed = Vec::new();
        let mut converged = Vec::new();
        let mut promising = Vec::new();
        for &gid in &root.alternatives {
            let guess = self.graph.guess(gid);
            let word = self.words.guess(guess.word).text().to_string();
            if self.bounds_converged(guess.prob, guess.expected) {
                if cmp_pairs(guess.prob, Bounds::point(1.0), tol) == Ordering::Equal {
                    guaranteed.push(word.clone());
                }
                converged.push((word, guess.prob, guess.expected));
            } else if guess.prob.min >= 0.5 {
                promising.push((word, guess.prob, guess.expected));
            }
        }
        ProgressReport {
            cache: self.graph.stats(),
            prob: root.prob,
            expected: root.expected,
            explored: root.alternatives.len(),
            total: root.num_candidates,
            guaranteed,
            converged,
            promising,
        }
    }

    /// Take ownership of the graph, consuming the engine
    #[must_use]
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Walk best open guess, then best open child, until a position that
    /// still has untried guesses
    fn select(&self) -> Selection {
        let mut sid = self.root;
        loop {
            let state = self.graph.state(sid);
            if !state.explored_all() {
                return Selection::Expand(sid);
            }
            let Some(gid) = self.best_open_guess(sid) else {
                return Selection::Refresh(sid);
            };
            match self.best_open_child(gid) {
                Some(child) => sid = child,
                None => return Selection::Refresh(sid),
            }
        }
    }

    /// Add the next untried candidate word as a guess under `sid`
    fn expand(&mut self, sid: StateId) -> Result<GuessId, SearchError> {
        let (depth, candidates, tried) = {
            let state = self.graph.state(sid);
            (state.depth, state.candidates.clone(), state.alternatives.len())
        };
        let exhausted = if self.config.objective.maximize_win() {
            // Only forced single-guess positions live this deep, and those
            // are converged at creation; expanding one is a broken invariant.
            depth >= self.config.max_guesses - 1
        } else {
            // Unbudgeted searches stop where the depth counter would wrap
            depth == u8::MAX
        };
        if exhausted {
            let state = self.graph.state(sid);
            return Err(SearchError::ExhaustedBudget {
                depth,
                num_candidates: state.num_candidates,
                candidates: state.candidates.to_string(),
            });
        }
        let word = candidates
            .nth(tried)
            .expect("expansion requested on a fully explored state");

        let gid = self.graph.add_guess(Guess {
            word,
            origin: sid,
            prob: Bounds::new(0.0, 1.0),
            expected: Bounds::new(1.0, f64::from(self.config.max_guesses)),
            children: Vec::new(),
        });
        self.graph.state_mut(sid).alternatives.push(gid);

        let universe = self.words.solution_count();
        let child_depth = depth + 1;
        let mut children: Vec<(StateId, u32)> = Vec::new();
        for solution in candidates.iter() {
            let won = solution == word;
            let child_set = if won {
                CandidateSet::empty(universe)
            } else {
                candidates.and(self.matrix.remaining(solution, word))
            };
            let count = child_set.count();
            let (prob, expected) = self.child_init_bounds(won, child_depth, count);
            let (child, _) = self.graph.get_or_create(child_depth, child_set, prob, expected);
            if let Some(entry) = children.iter_mut().find(|(c, _)| *c == child) {
                entry.1 += 1;
            } else {
                children.push((child, 1));
                self.graph.state_mut(child).incoming.push(gid);
            }
        }
        self.graph.guess_mut(gid).children = children;

        self.recompute_guess(gid)?;
        self.propagate(sid)?;
        Ok(gid)
    }

    /// Initial bounds for a newly created child state
    fn child_init_bounds(&self, won: bool, child_depth: u8, count: u32) -> (Bounds, Bounds) {
        if won {
            return (Bounds::point(1.0), Bounds::point(0.0));
        }
        let n = f64::from(count.max(1));
        let p = 1.0 / n;
        let maximize_win = self.config.objective.maximize_win();
        let pessimistic = if maximize_win {
            (n / 2.0).max(1.0)
        } else {
            (n / 2.0)
                .max(1.0)
                .min(f64::from(self.config.max_guesses) - f64::from(child_depth))
        };
        if maximize_win && child_depth == self.config.max_guesses - 1 {
            // One guess left: spend it on one candidate at random
            (Bounds::point(p), Bounds::point(pessimistic))
        } else {
            // One guess if the first try is right, at least two otherwise
            let optimistic = 2.0 - p;
            (Bounds::new(p, 1.0), Bounds::ordered(optimistic, pessimistic))
        }
    }

    /// Recompute all of a state's guesses from their children, then propagate
    fn refresh(&mut self, sid: StateId) -> Result<bool, SearchError> {
        let before = {
            let state = self.graph.state(sid);
            (state.prob, state.expected)
        };
        let alternatives = self.graph.state(sid).alternatives.clone();
        let mut changed = false;
        for gid in alternatives {
            changed |= self.recompute_guess(gid)?;
        }
        self.propagate(sid)?;
        let after = {
            let state = self.graph.state(sid);
            (state.prob, state.expected)
        };
        let tol = self.config.tolerance;
        Ok(changed
            || cmp_pairs(before.0, after.0, tol) != Ordering::Equal
            || cmp_pairs(before.1, after.1, tol) != Ordering::Equal)
    }

    /// Work-list back-propagation from `start` through all incoming edges
    fn propagate(&mut self, start: StateId) -> Result<(), SearchError> {
        let mut stack = vec![start];
        while let Some(sid) = stack.pop() {
            if !self.refresh_state(sid)? {
                continue;
            }
            let incoming = self.graph.state(sid).incoming.clone();
            for gid in incoming {
                if self.recompute_guess(gid)? {
                    stack.push(self.graph.guess(gid).origin);
                }
            }
        }
        Ok(())
    }

    /// Recombine a guess's bounds from its children's
    ///
    /// Win probability is the solution-weighted average of child probability,
    /// tightened against the stored interval. Expected guesses use the
    /// probability-weighted law: the optimistic end weights child optimism by
    /// child probability upper bounds, the pessimistic end weights pessimism
    /// by lower bounds.
    fn recompute_guess(&mut self, gid: GuessId) -> Result<bool, SearchError> {
        let tol = self.config.tolerance;
        let guess = self.graph.guess(gid);
        if guess.children.is_empty() {
            return Ok(false);
        }
        let total = f64::from(guess.total_weight());
        let mut prob_min = 0.0;
        let mut prob_max = 0.0;
        let mut opt_num = 0.0;
        let mut opt_den = 0.0;
        let mut pess_num = 0.0;
        let mut pess_den = 0.0;
        for &(child, n) in &guess.children {
            let c = self.graph.state(child);
            let w = f64::from(n);
            prob_min += c.prob.min * w;
            prob_max += c.prob.max * w;
            opt_num += c.expected.min * c.prob.max * w;
            opt_den += c.prob.max * w;
            pess_num += c.expected.max * c.prob.min * w;
            pess_den += c.prob.min * w;
        }
        let old_prob = guess.prob;
        let old_expected = guess.expected;

        let new_prob = old_prob.tightened(Bounds::new(prob_min / total, prob_max / total));
        if !new_prob.is_valid(tol) {
            return Err(SearchError::InconsistentBounds {
                node: self.guess_label(gid),
                bounds: new_prob,
            });
        }
        let optimistic = if opt_den > 0.0 {
            opt_num / opt_den
        } else {
            old_expected.min
        };
        let pessimistic = if pess_den > 0.0 {
            pess_num / pess_den
        } else {
            old_expected.max
        };
        let new_expected = Bounds::ordered(optimistic, pessimistic);

        let guess = self.graph.guess_mut(gid);
        guess.prob = new_prob;
        guess.expected = new_expected;
        Ok(cmp_pairs(old_prob, new_prob, tol) != Ordering::Equal
            || cmp_pairs(old_expected, new_expected, tol) != Ordering::Equal)
    }

    /// Recombine a state's bounds from its alternatives'
    fn refresh_state(&mut self, sid: StateId) -> Result<bool, SearchError> {
        let tol = self.config.tolerance;
        let state = self.graph.state(sid);
        if state.alternatives.is_empty() {
            return Ok(false);
        }
        let explored_all = state.explored_all();
        let maximize_win = self.config.objective.maximize_win();

        let mut best_min = f64::NEG_INFINITY;
        let mut best_max = f64::NEG_INFINITY;
        for &gid in &state.alternatives {
            let guess = self.graph.guess(gid);
            best_min = best_min.max(guess.prob.min);
            best_max = best_max.max(guess.prob.max);
        }
        // An untried guess could still win outright, so the upper bound stays
        // at 1 until every alternative exists.
        let cap = if explored_all { best_max } else { 1.0 };
        let old_prob = state.prob;
        let new_prob = old_prob.tightened(Bounds::new(best_min, cap));
        if !new_prob.is_valid(tol) {
            return Err(SearchError::InconsistentBounds {
                node: self.state_label(sid),
                bounds: new_prob,
            });
        }

        // Expected guesses: only alternatives that can still realize the
        // state's win probability count, then one guess is added for the
        // guess made here.
        let mut opt = f64::INFINITY;
        let mut pess = f64::INFINITY;
        for &gid in &state.alternatives {
            let guess = self.graph.guess(gid);
            let eligible = if !maximize_win {
                true
            } else if explored_all && new_prob.converged(tol) {
                guess.prob.max >= new_prob.max - tol
            } else {
                guess.prob.max >= new_prob.min - tol
            };
            if eligible {
                opt = opt.min(guess.expected.min);
                pess = pess.min(guess.expected.max);
            }
        }
        let old_expected = state.expected;
        let new_expected = if pess.is_finite() {
            let lower = if explored_all { opt + 1.0 } else { 1.0 };
            Bounds::ordered(lower, pess + 1.0)
        } else {
            old_expected
        };

        let state = self.graph.state_mut(sid);
        state.prob = new_prob;
        state.expected = new_expected;
        Ok(cmp_pairs(old_prob, new_prob, tol) != Ordering::Equal
            || cmp_pairs(old_expected, new_expected, tol) != Ordering::Equal)
    }

    fn bounds_converged(&self, prob: Bounds, expected: Bounds) -> bool {
        let tol = self.config.tolerance;
        prob.converged(tol) && (!self.config.objective.track_guesses() || expected.converged(tol))
    }

    fn state_converged(&self, sid: StateId) -> bool {
        let state = self.graph.state(sid);
        self.bounds_converged(state.prob, state.expected)
    }

    /// Converged, or dominated by a sibling that already guarantees more
    fn guess_settled(&self, gid: GuessId, state_prob_min: f64) -> bool {
        let guess = self.graph.guess(gid);
        self.bounds_converged(guess.prob, guess.expected)
            || (self.config.objective.maximize_win()
                && guess.prob.max < state_prob_min - self.config.tolerance)
    }

    /// True when `a` should be worked on before `b`
    fn better_guess(&self, a: GuessId, b: GuessId) -> bool {
        let tol = self.config.tolerance;
        let ga = self.graph.guess(a);
        let gb = self.graph.guess(b);
        if self.config.objective.maximize_win() {
            match cmp_pairs(ga.prob, gb.prob, tol) {
                Ordering::Greater => return true,
                Ordering::Less => return false,
                Ordering::Equal => {}
            }
        }
        if self.config.objective.track_guesses() {
            match cmp_pairs(ga.expected, gb.expected, tol) {
                Ordering::Less => return true,
                Ordering::Greater => return false,
                Ordering::Equal => {}
            }
        }
        self.graph.average_child_candidates(ga) < self.graph.average_child_candidates(gb)
    }

    fn best_open_guess(&self, sid: StateId) -> Option<GuessId> {
        let state = self.graph.state(sid);
        let mut best: Option<GuessId> = None;
        for &gid in &state.alternatives {
            if self.guess_settled(gid, state.prob.min) {
                continue;
            }
            best = match best {
                Some(cur) if !self.better_guess(gid, cur) => Some(cur),
                _ => Some(gid),
            };
        }
        best
    }

    fn best_open_child(&self, gid: GuessId) -> Option<StateId> {
        let tol = self.config.tolerance;
        let maximize_win = self.config.objective.maximize_win();
        let track_guesses = self.config.objective.track_guesses();
        let guess = self.graph.guess(gid);
        let mut best: Option<StateId> = None;
        for &(child, _) in &guess.children {
            if self.state_converged(child) {
                continue;
            }
            let better = match best {
                None => true,
                Some(cur) => {
                    let a = self.graph.state(child);
                    let b = self.graph.state(cur);
                    let by_prob = if maximize_win {
                        cmp_pairs(a.prob, b.prob, tol)
                    } else {
                        Ordering::Equal
                    };
                    match by_prob {
                        Ordering::Greater => true,
                        Ordering::Less => false,
                        Ordering::Equal => {
                            let by_expected = if track_guesses {
                                cmp_pairs(a.expected, b.expected, tol)
                            } else {
                                Ordering::Equal
                            };
                            match by_expected {
                                Ordering::Less => true,
                                Ordering::Greater => false,
                                Ordering::Equal => a.num_candidates < b.num_candidates,
                            }
                        }
                    }
                }
            };
            if better {
                best = Some(child);
            }
        }
        best
    }

    fn guess_label(&self, gid: GuessId) -> String {
        let guess = self.graph.guess(gid);
        let origin = self.graph.state(guess.origin);
        format!(
            "guess '{}' at depth {} over {} candidates",
            self.words.guess(guess.word),
            origin.depth,
            origin.num_candidates
        )
    }

    fn state_label(&self, sid: StateId) -> String {
        let state = self.graph.state(sid);
        format!(
            "state at depth {} with {} candidates ({})",
            state.depth, state.num_candidates, state.candidates
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Word;

    /// Ten words where "egikm" separates everything it touches: five of the
    /// abcdX words echo one of its letters, the other four share nothing.
    fn toy_words() -> WordList {
        let texts = [
            "abcde", "abcdf", "abcdg", "abcdh", "abcdi", "abcdj", "abcdk", "abcdl", "abcdm",
            "egikm",
        ];
        WordList::from_solutions(texts.iter().map(|t| Word::new(*t).unwrap()).collect()).unwrap()
    }

    fn small_words(texts: &[&str]) -> WordList {
        WordList::from_solutions(texts.iter().map(|t| Word::new(*t).unwrap()).collect()).unwrap()
    }

    #[test]
    fn terminal_win_state_has_point_bounds() {
        let words = toy_words();
        let matrix = FeedbackMatrix::build(&words);
        let mut engine = Engine::new(&words, &matrix, SearchConfig::default());

        // First step expands the root's first candidate word
        assert!(matches!(
            engine.step().unwrap(),
            StepOutcome::Expanded(sid) if sid == engine.root()
        ));
        let gid = engine.graph().state(engine.root()).alternatives[0];
        let win = engine
            .graph()
            .guess(gid)
            .children
            .iter()
            .map(|&(c, _)| c)
            .find(|&c| engine.graph().state(c).is_win())
            .unwrap();

        let state = engine.graph().state(win);
        assert_eq!(state.prob, Bounds::point(1.0));
        assert_eq!(state.expected, Bounds::point(0.0));
    }

    #[test]
    fn root_probability_bounds_tighten_monotonically() {
        let words = toy_words();
        let matrix = FeedbackMatrix::build(&words);
        let mut engine = Engine::new(&words, &matrix, SearchConfig::default());

        let mut last = engine.graph().state(engine.root()).prob;
        for _ in 0..500 {
            if matches!(engine.step().unwrap(), StepOutcome::Converged) {
                break;
            }
            let prob = engine.graph().state(engine.root()).prob;
            assert!(prob.min >= last.min - 1e-12, "lower bound loosened");
            assert!(prob.max <= last.max + 1e-12, "upper bound loosened");
            last = prob;
        }
    }

    #[test]
    fn propagation_is_idempotent() {
        let words = toy_words();
        let matrix = FeedbackMatrix::build(&words);
        let mut engine = Engine::new(&words, &matrix, SearchConfig::default());
        engine.run_steps(50).unwrap();

        let snapshot: Vec<(Bounds, Bounds)> = engine
            .graph
            .states_with_ids()
            .map(|(_, s)| (s.prob, s.expected))
            .collect();
        let changed = engine.refresh(engine.root).unwrap();
        assert!(!changed);
        for ((before_p, before_e), (_, after)) in
            snapshot.iter().zip(engine.graph.states_with_ids())
        {
            assert_eq!(cmp_pairs(*before_p, after.prob, 1e-12), Ordering::Equal);
            assert_eq!(cmp_pairs(*before_e, after.expected, 1e-12), Ordering::Equal);
        }
    }

    #[test]
    fn search_converges_with_shared_histories() {
        let words = toy_words();
        let matrix = FeedbackMatrix::build(&words);
        let mut engine = Engine::new(&words, &matrix, SearchConfig::default());

        let status = engine.run_steps(200_000).unwrap();
        assert!(status.done, "toy search did not converge: {status:?}");
        assert!(engine.is_done());

        // Swapping the order of two guesses lands on the same key, so the
        // cache must have been hit and the unshared tree must be larger than
        // the stored graph.
        let stats = engine.graph().stats();
        assert!(stats.hits > 0);
        assert!(engine.graph().tree_size(engine.root()) > stats.states as u64);
    }

    #[test]
    fn separating_guess_is_found_and_guaranteed() {
        let words = toy_words();
        let matrix = FeedbackMatrix::build(&words);
        let mut engine = Engine::new(&words, &matrix, SearchConfig::default());
        let status = engine.run_steps(200_000).unwrap();
        assert!(status.done);

        // egikm splits the field into five singletons plus one four-word
        // group, which four more guesses always finish. No abcdX opener can.
        let root = engine.graph().state(engine.root());
        assert_eq!(
            cmp_pairs(root.prob, Bounds::point(1.0), 1e-12),
            Ordering::Equal
        );
        let report = engine.progress();
        assert_eq!(report.guaranteed, vec!["egikm".to_string()]);
    }

    #[test]
    fn fewest_guesses_objective_converges_to_exact_expectation() {
        // Four mutually confusable words: every guess resolves only itself,
        // so the best policy averages (1+2+3+4)/4 guesses.
        let words = small_words(&["abcde", "abcdf", "abcdg", "abcdh"]);
        let matrix = FeedbackMatrix::build(&words);
        let config = SearchConfig {
            objective: Objective::FewestGuesses,
            ..SearchConfig::default()
        };
        let mut engine = Engine::new(&words, &matrix, config);

        let status = engine.run_steps(50_000).unwrap();
        assert!(status.done, "search did not converge: {status:?}");
        let root = engine.graph().state(engine.root());
        assert!(root.expected.converged(1e-9));
        assert!((root.expected.min - 2.5).abs() < 1e-9, "{:?}", root.expected);
    }

    #[test]
    fn expanding_past_the_budget_is_an_error() {
        let words = toy_words();
        let matrix = FeedbackMatrix::build(&words);
        let mut engine = Engine::new(&words, &matrix, SearchConfig::default());

        let mut deep_set = CandidateSet::empty(words.solution_count());
        deep_set.insert(0);
        deep_set.insert(1);
        let (deep, _) = engine.graph.get_or_create(
            5,
            deep_set,
            Bounds::new(0.5, 1.0),
            Bounds::new(1.0, 1.0),
        );
        assert!(matches!(
            engine.expand(deep),
            Err(SearchError::ExhaustedBudget { depth: 5, .. })
        ));
    }

    #[test]
    fn one_guess_budget_converges_to_a_forced_root() {
        let words = small_words(&["abcde", "abcdf", "abcdg"]);
        let matrix = FeedbackMatrix::build(&words);
        let config = SearchConfig {
            max_guesses: 1,
            ..SearchConfig::default()
        };
        let mut engine = Engine::new(&words, &matrix, config);

        // The only move is one random candidate; nothing gets expanded
        let status = engine.run_steps(10).unwrap();
        assert!(status.done, "{status:?}");
        assert_eq!(status.steps, 0);
        let root = engine.graph().state(engine.root());
        assert_eq!(root.prob, Bounds::point(1.0 / 3.0));
        assert_eq!(root.expected, Bounds::point(1.5));
    }

    #[test]
    fn zero_budget_is_clamped_to_one_guess() {
        let words = small_words(&["abcde", "abcdf"]);
        let matrix = FeedbackMatrix::build(&words);
        let config = SearchConfig {
            max_guesses: 0,
            ..SearchConfig::default()
        };
        let mut engine = Engine::new(&words, &matrix, config);
        assert_eq!(engine.config().max_guesses, 1);
        assert!(engine.run_steps(10).unwrap().done);
    }

    #[test]
    fn unbudgeted_expansion_stops_where_depth_would_wrap() {
        let words = toy_words();
        let matrix = FeedbackMatrix::build(&words);
        let config = SearchConfig {
            objective: Objective::FewestGuesses,
            ..SearchConfig::default()
        };
        let mut engine = Engine::new(&words, &matrix, config);

        let mut deep_set = CandidateSet::empty(words.solution_count());
        deep_set.insert(0);
        deep_set.insert(1);
        let (deep, _) = engine.graph.get_or_create(
            u8::MAX,
            deep_set,
            Bounds::new(0.0, 1.0),
            Bounds::new(1.0, 2.0),
        );
        assert!(matches!(
            engine.expand(deep),
            Err(SearchError::ExhaustedBudget { depth: u8::MAX, .. })
        ));
    }

    #[test]
    fn crossed_bounds_are_rejected() {
        let words = toy_words();
        let matrix = FeedbackMatrix::build(&words);
        let mut engine = Engine::new(&words, &matrix, SearchConfig::default());
        engine.step().unwrap();

        let gid = engine.graph.state(engine.root).alternatives[0];
        let children: Vec<StateId> = engine
            .graph
            .guess(gid)
            .children
            .iter()
            .map(|&(c, _)| c)
            .collect();
        // Contradict the already established lower bound on the guess
        for child in children {
            engine.graph.state_mut(child).prob = Bounds::point(0.0);
        }
        assert!(matches!(
            engine.recompute_guess(gid),
            Err(SearchError::InconsistentBounds { .. })
        ));
    }
}
