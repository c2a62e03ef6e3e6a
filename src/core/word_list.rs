//! Ordered word lists and the dense word index
//!
//! The search addresses every word by a `u32` index. Solutions occupy indices
//! `0..solution_count()`; guess-only words (words that may be guessed but can
//! never be the answer) follow. Candidate bitsets cover solution indices only,
//! while the feedback matrix has one column per guessable word.

use super::{CandidateSet, Word};
use rustc_hash::FxHashMap;
use std::fmt;

/// The configured solution and guess-only word lists
#[derive(Debug, Clone)]
pub struct WordList {
    solutions: Vec<Word>,
    pool: Vec<Word>,
    index: FxHashMap<String, u32>,
}

/// Error type for word-list construction and lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordListError {
    /// The same word appears twice across the solution list and guess pool
    Duplicate(String),
    /// A word is not present in the configured index
    Unknown(String),
}

impl fmt::Display for WordListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate(w) => write!(f, "Duplicate word in lists: {w}"),
            Self::Unknown(w) => write!(f, "Word not in the configured index: {w}"),
        }
    }
}

impl std::error::Error for WordListError {}

impl WordList {
    /// Build a word list from solutions and an optional guess-only pool
    ///
    /// # Errors
    /// Returns [`WordListError::Duplicate`] if any word appears twice.
    pub fn new(solutions: Vec<Word>, pool: Vec<Word>) -> Result<Self, WordListError> {
        let mut index = FxHashMap::default();
        for (i, word) in solutions.iter().chain(pool.iter()).enumerate() {
            if index.insert(word.text().to_string(), i as u32).is_some() {
                return Err(WordListError::Duplicate(word.text().to_string()));
            }
        }
        Ok(Self {
            solutions,
            pool,
            index,
        })
    }

    /// Solutions only, no guess pool
    ///
    /// # Errors
    /// Returns [`WordListError::Duplicate`] if any word appears twice.
    pub fn from_solutions(solutions: Vec<Word>) -> Result<Self, WordListError> {
        Self::new(solutions, Vec::new())
    }

    /// Number of possible answers
    #[must_use]
    pub fn solution_count(&self) -> usize {
        self.solutions.len()
    }

    /// Number of guessable words (solutions plus the guess-only pool)
    #[must_use]
    pub fn guess_count(&self) -> usize {
        self.solutions.len() + self.pool.len()
    }

    /// The solution word at `index`
    ///
    /// # Panics
    /// Panics if `index >= solution_count()`.
    #[must_use]
    pub fn solution(&self, index: u32) -> &Word {
        &self.solutions[index as usize]
    }

    /// The guessable word at `index` (solutions first, then the pool)
    ///
    /// # Panics
    /// Panics if `index >= guess_count()`.
    #[must_use]
    pub fn guess(&self, index: u32) -> &Word {
        let index = index as usize;
        if index < self.solutions.len() {
            &self.solutions[index]
        } else {
            &self.pool[index - self.solutions.len()]
        }
    }

    /// All solution words in index order
    #[must_use]
    pub fn solutions(&self) -> &[Word] {
        &self.solutions
    }

    /// Look up a word's index by text
    ///
    /// # Errors
    /// Returns [`WordListError::Unknown`] if the word is not in either list.
    pub fn index_of(&self, text: &str) -> Result<u32, WordListError> {
        self.index
            .get(text)
            .copied()
            .ok_or_else(|| WordListError::Unknown(text.to_string()))
    }

    /// The full candidate set: every solution still possible
    #[must_use]
    pub fn all_solutions(&self) -> CandidateSet {
        CandidateSet::full(self.solutions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(texts: &[&str]) -> Vec<Word> {
        texts.iter().map(|t| Word::new(*t).unwrap()).collect()
    }

    #[test]
    fn indices_are_dense_solutions_first() {
        let list = WordList::new(words(&["crane", "slate"]), words(&["soare"])).unwrap();

        assert_eq!(list.solution_count(), 2);
        assert_eq!(list.guess_count(), 3);
        assert_eq!(list.index_of("crane").unwrap(), 0);
        assert_eq!(list.index_of("slate").unwrap(), 1);
        assert_eq!(list.index_of("soare").unwrap(), 2);
        assert_eq!(list.guess(2).text(), "soare");
        assert_eq!(list.solution(1).text(), "slate");
    }

    #[test]
    fn duplicates_are_rejected() {
        assert!(matches!(
            WordList::from_solutions(words(&["crane", "crane"])),
            Err(WordListError::Duplicate(w)) if w == "crane"
        ));
        assert!(matches!(
            WordList::new(words(&["crane"]), words(&["crane"])),
            Err(WordListError::Duplicate(_))
        ));
    }

    #[test]
    fn unknown_word_lookup() {
        let list = WordList::from_solutions(words(&["crane"])).unwrap();
        assert!(matches!(
            list.index_of("slate"),
            Err(WordListError::Unknown(w)) if w == "slate"
        ));
    }

    #[test]
    fn all_solutions_covers_every_index() {
        let list = WordList::new(words(&["crane", "slate"]), words(&["soare"])).unwrap();
        let all = list.all_solutions();
        // The bitset universe is solutions only, never the guess pool
        assert_eq!(all.count(), 2);
        assert!(all.contains(0));
        assert!(all.contains(1));
    }
}
