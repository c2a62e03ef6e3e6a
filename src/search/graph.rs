//! Arena-backed state/guess graph with memoized states
//!
//! States and guesses live in two flat arenas and refer to each other through
//! `u32` handles, so the graph is a plain DAG with no reference counting.
//! States are memoized on their `(depth, candidate set)` key: two different
//! guess histories that leave the same candidates at the same depth share one
//! node, and every bound tightened there is tightened for all of them.

use crate::core::CandidateSet;
use crate::search::bounds::Bounds;
use rustc_hash::FxHashMap;

/// Handle to a state in the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(u32);

/// Handle to a guess in the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GuessId(u32);

/// A game position: some candidates remain after some number of guesses
#[derive(Debug, Clone)]
pub struct State {
    pub depth: u8,
    pub candidates: CandidateSet,
    pub num_candidates: u32,
    /// Success probability within the remaining budget
    pub prob: Bounds,
    /// Expected guesses still needed, counting from this position
    pub expected: Bounds,
    /// Guesses tried from this state so far, in candidate index order
    pub alternatives: Vec<GuessId>,
    /// Every guess (from any parent state) with an edge into this state
    pub incoming: Vec<GuessId>,
}

impl State {
    /// A win: no candidates left to distinguish, the answer was guessed
    #[must_use]
    pub fn is_win(&self) -> bool {
        self.num_candidates == 0
    }

    /// Whether every candidate word has been tried as a guess here
    #[must_use]
    pub fn explored_all(&self) -> bool {
        self.alternatives.len() >= self.num_candidates as usize
    }
}

/// One guess tried from one state, with the child states it can lead to
#[derive(Debug, Clone)]
pub struct Guess {
    /// Word index of the guessed word
    pub word: u32,
    /// The state this guess was made from
    pub origin: StateId,
    pub prob: Bounds,
    pub expected: Bounds,
    /// Child states keyed by outcome, with how many solutions map to each
    pub children: Vec<(StateId, u32)>,
}

impl Guess {
    /// Total solution weight across children (the origin's candidate count)
    #[must_use]
    pub fn total_weight(&self) -> u32 {
        self.children.iter().map(|&(_, n)| n).sum()
    }
}

/// Memoization counters and arena sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub states: usize,
    pub guesses: usize,
    pub hits: u64,
    pub misses: u64,
}

/// The search graph: state and guess arenas plus the memoization cache
#[derive(Debug, Default)]
pub struct Graph {
    states: Vec<State>,
    guesses: Vec<Guess>,
    cache: FxHashMap<(u8, CandidateSet), StateId>,
    hits: u64,
    misses: u64,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the state for `(depth, candidates)`, creating it with the given
    /// initial bounds when absent
    ///
    /// Returns the handle and whether the state was newly created. An existing
    /// state keeps its current bounds; the initializers only apply to new
    /// nodes.
    pub fn get_or_create(
        &mut self,
        depth: u8,
        candidates: CandidateSet,
        prob: Bounds,
        expected: Bounds,
    ) -> (StateId, bool) {
        if let Some(&id) = self.cache.get(&(depth, candidates.clone())) {
            self.hits += 1;
            return (id, false);
        }
        self.misses += 1;
        let id = StateId(self.states.len() as u32);
        let num_candidates = candidates.count();
        self.states.push(State {
            depth,
            candidates: candidates.clone(),
            num_candidates,
            prob,
            expected,
            alternatives: Vec::new(),
            incoming: Vec::new(),
        });
        self.cache.insert((depth, candidates), id);
        (id, true)
    }

    /// Look up a state without creating it, bypassing the hit counters
    #[must_use]
    pub fn lookup(&self, depth: u8, candidates: &CandidateSet) -> Option<StateId> {
        self.cache.get(&(depth, candidates.clone())).copied()
    }

    pub fn add_guess(&mut self, guess: Guess) -> GuessId {
        let id = GuessId(self.guesses.len() as u32);
        self.guesses.push(guess);
        id
    }

    #[must_use]
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0 as usize]
    }

    pub fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id.0 as usize]
    }

    #[must_use]
    pub fn guess(&self, id: GuessId) -> &Guess {
        &self.guesses[id.0 as usize]
    }

    pub fn guess_mut(&mut self, id: GuessId) -> &mut Guess {
        &mut self.guesses[id.0 as usize]
    }

    /// All states with their handles, in arena order
    pub fn states_with_ids(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateId(i as u32), s))
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            states: self.states.len(),
            guesses: self.guesses.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    /// Mean candidate count across a guess's children, solution-weighted
    #[must_use]
    pub fn average_child_candidates(&self, guess: &Guess) -> f64 {
        let total = guess.total_weight();
        if total == 0 {
            return f64::INFINITY;
        }
        let sum: f64 = guess
            .children
            .iter()
            .map(|&(child, n)| f64::from(self.state(child).num_candidates) * f64::from(n))
            .sum();
        sum / f64::from(total)
    }

    /// Node count of the tree rooted at `id`, counting shared subtrees once
    /// per path
    ///
    /// This measures how large the graph would be without memoization, so it
    /// deliberately revisits shared nodes. Only meant for small graphs and
    /// diagnostics.
    #[must_use]
    pub fn tree_size(&self, id: StateId) -> u64 {
        let state = self.state(id);
        let mut count = state.alternatives.len() as u64;
        for &gid in &state.alternatives {
            let guess = self.guess(gid);
            count += guess.children.len() as u64;
            for &(child, _) in &guess.children {
                count += self.tree_size(child);
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(universe: usize, members: &[u32]) -> CandidateSet {
        let mut s = CandidateSet::empty(universe);
        for &m in members {
            s.insert(m);
        }
        s
    }

    #[test]
    fn identical_keys_share_one_state() {
        let mut graph = Graph::new();
        let key = set(10, &[1, 3, 5]);
        let (a, created_a) =
            graph.get_or_create(2, key.clone(), Bounds::new(0.0, 1.0), Bounds::new(1.0, 6.0));
        let (b, created_b) =
            graph.get_or_create(2, key, Bounds::point(0.5), Bounds::point(2.0));

        assert!(created_a);
        assert!(!created_b);
        assert_eq!(a, b);
        // The second call's initializers were ignored
        assert_eq!(graph.state(b).prob, Bounds::new(0.0, 1.0));
        assert_eq!(graph.stats().hits, 1);
        assert_eq!(graph.stats().misses, 1);
    }

    #[test]
    fn same_set_at_different_depth_is_a_different_state() {
        let mut graph = Graph::new();
        let key = set(10, &[1, 3, 5]);
        let (a, _) =
            graph.get_or_create(1, key.clone(), Bounds::new(0.0, 1.0), Bounds::new(1.0, 6.0));
        let (b, _) = graph.get_or_create(2, key, Bounds::new(0.0, 1.0), Bounds::new(1.0, 6.0));
        assert_ne!(a, b);
        assert_eq!(graph.stats().states, 2);
    }

    #[test]
    fn win_state_and_exploration_tracking() {
        let mut graph = Graph::new();
        let (win, _) = graph.get_or_create(3, set(10, &[]), Bounds::point(1.0), Bounds::point(0.0));
        assert!(graph.state(win).is_win());
        assert!(graph.state(win).explored_all());

        let (open, _) = graph.get_or_create(
            1,
            set(10, &[2, 4]),
            Bounds::new(0.5, 1.0),
            Bounds::new(1.0, 6.0),
        );
        assert!(!graph.state(open).explored_all());
    }

    #[test]
    fn tree_size_counts_shared_children_per_path() {
        let mut graph = Graph::new();
        let (root, _) = graph.get_or_create(
            0,
            set(4, &[0, 1, 2, 3]),
            Bounds::new(0.0, 1.0),
            Bounds::new(1.0, 6.0),
        );
        let (shared, _) = graph.get_or_create(
            1,
            set(4, &[2, 3]),
            Bounds::new(0.5, 1.0),
            Bounds::new(1.0, 2.0),
        );
        for word in [0, 1] {
            let gid = graph.add_guess(Guess {
                word,
                origin: root,
                prob: Bounds::new(0.0, 1.0),
                expected: Bounds::new(1.0, 6.0),
                children: vec![(shared, 2)],
            });
            graph.state_mut(root).alternatives.push(gid);
            graph.state_mut(shared).incoming.push(gid);
        }

        // 2 guesses + 2 child edges, shared child counted once per edge
        assert_eq!(graph.tree_size(root), 4);
        assert_eq!(graph.stats().states, 2);
        assert_eq!(graph.state(shared).incoming.len(), 2);
    }
}
