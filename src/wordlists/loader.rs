//! Loading word lists from disk
//!
//! One word per line, case-insensitive; blank lines and lines that are not
//! five ASCII letters are skipped. Guess-pool words that already appear in
//! the solution list are dropped rather than rejected, since published pool
//! files often include the answers.

use crate::core::{Word, WordList};
use anyhow::{Context, Result, ensure};
use rustc_hash::FxHashSet;
use std::fs;
use std::io;
use std::path::Path;

/// Read every usable word from a file
///
/// # Errors
/// Returns any underlying I/O error.
pub fn load_words<P: AsRef<Path>>(path: P) -> io::Result<Vec<Word>> {
    Ok(words_from_lines(&fs::read_to_string(path)?))
}

/// Parse words from newline-separated text, skipping unusable lines
#[must_use]
pub fn words_from_lines(content: &str) -> Vec<Word> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| Word::new(&line.to_ascii_lowercase()).ok())
        .collect()
}

/// Load the solution list and optional guess pool into one indexed list
///
/// # Errors
/// Fails on unreadable files, an empty solution list, or duplicate words
/// within a list.
pub fn load_word_list(solutions: &Path, pool: Option<&Path>) -> Result<WordList> {
    let solutions = load_words(solutions)
        .with_context(|| format!("reading solution list {}", solutions.display()))?;
    ensure!(!solutions.is_empty(), "solution list is empty");

    let pool = match pool {
        Some(path) => {
            let known: FxHashSet<&str> = solutions.iter().map(Word::text).collect();
            let mut pool = load_words(path)
                .with_context(|| format!("reading guess pool {}", path.display()))?;
            pool.retain(|word| !known.contains(word.text()));
            pool
        }
        None => Vec::new(),
    };
    WordList::new(solutions, pool).context("building the word index")
}
