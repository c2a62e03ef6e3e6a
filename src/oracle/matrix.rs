//! Precomputed feedback matrix with binary persistence
//!
//! One row per solution, one column per guessable word; each cell is the
//! candidate set the oracle leaves after that guess against that solution.
//! Building the table is quadratic in the word-list size and by far the most
//! expensive one-off step, so it is persisted and reloaded across runs.
//!
//! File format: 16-byte header (magic, version, solution count, guess count)
//! followed by the raw little-endian u64 words of every cell in row-major
//! order. Any shape mismatch on load is treated as corruption and the caller
//! rebuilds from scratch.

use crate::core::{CandidateSet, WordList};
use crate::oracle::feedback::remaining_candidates;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

const MAGIC: u32 = u32::from_le_bytes(*b"WFBM");
const VERSION: u32 = 1;
const HEADER_LEN: usize = 16;

/// Cached oracle output for every (solution, guess) pair
#[derive(Debug, Clone)]
pub struct FeedbackMatrix {
    solution_count: usize,
    guess_count: usize,
    cells: Vec<CandidateSet>,
}

/// Error type for loading a persisted matrix
#[derive(Debug)]
pub enum TableError {
    Io(io::Error),
    /// The file's shape or identity does not match the current word list
    Corrupt(String),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Feedback matrix I/O error: {e}"),
            Self::Corrupt(detail) => write!(f, "Corrupt feedback matrix: {detail}"),
        }
    }
}

impl std::error::Error for TableError {}

impl From<io::Error> for TableError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl FeedbackMatrix {
    /// Compute the full table from scratch
    ///
    /// Rows are computed in parallel; the diagonal shortcuts to the singleton
    /// set since guessing the solution leaves only the solution.
    #[must_use]
    pub fn build(words: &WordList) -> Self {
        let solution_count = words.solution_count();
        let guess_count = words.guess_count();

        let pb = ProgressBar::new(solution_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} feedback rows")
                .unwrap()
                .progress_chars("█▓▒░"),
        );

        let cells: Vec<CandidateSet> = (0..solution_count as u32)
            .into_par_iter()
            .flat_map_iter(|sol| {
                let row: Vec<CandidateSet> = (0..guess_count as u32)
                    .map(|guess| {
                        if sol == guess {
                            CandidateSet::singleton(solution_count, sol)
                        } else {
                            remaining_candidates(
                                words.solution(sol),
                                words.guess(guess),
                                words.solutions(),
                            )
                        }
                    })
                    .collect();
                pb.inc(1);
                row
            })
            .collect();
        pb.finish_and_clear();

        Self {
            solution_count,
            guess_count,
            cells,
        }
    }

    /// The candidates left after guessing `guess` when the answer is `solution`
    ///
    /// # Panics
    /// Panics if either index is out of range.
    #[inline]
    #[must_use]
    pub fn remaining(&self, solution: u32, guess: u32) -> &CandidateSet {
        &self.cells[solution as usize * self.guess_count + guess as usize]
    }

    /// Number of solution rows
    #[must_use]
    pub fn solution_count(&self) -> usize {
        self.solution_count
    }

    /// Number of guess columns
    #[must_use]
    pub fn guess_count(&self) -> usize {
        self.guess_count
    }

    /// Write the table to `path`
    ///
    /// # Errors
    /// Returns any underlying I/O error.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = io::BufWriter::new(fs::File::create(path)?);
        out.write_all(&MAGIC.to_le_bytes())?;
        out.write_all(&VERSION.to_le_bytes())?;
        out.write_all(&(self.solution_count as u32).to_le_bytes())?;
        out.write_all(&(self.guess_count as u32).to_le_bytes())?;
        for cell in &self.cells {
            for word in cell.raw() {
                out.write_all(&word.to_le_bytes())?;
            }
        }
        out.flush()
    }

    /// Load a table persisted by [`FeedbackMatrix::save`]
    ///
    /// # Errors
    /// Returns [`TableError::Corrupt`] when the header or payload does not
    /// match the current word list, [`TableError::Io`] on read failure.
    pub fn load<P: AsRef<Path>>(path: P, words: &WordList) -> Result<Self, TableError> {
        let bytes = fs::read(path)?;
        if bytes.len() < HEADER_LEN {
            return Err(TableError::Corrupt("file shorter than header".into()));
        }

        let field = |i: usize| u32::from_le_bytes(bytes[i * 4..i * 4 + 4].try_into().unwrap());
        if field(0) != MAGIC {
            return Err(TableError::Corrupt("bad magic".into()));
        }
        if field(1) != VERSION {
            return Err(TableError::Corrupt(format!("unsupported version {}", field(1))));
        }

        let solution_count = field(2) as usize;
        let guess_count = field(3) as usize;
        if solution_count != words.solution_count() || guess_count != words.guess_count() {
            return Err(TableError::Corrupt(format!(
                "table is {solution_count}x{guess_count}, word list is {}x{}",
                words.solution_count(),
                words.guess_count()
            )));
        }

        let width = solution_count.div_ceil(64);
        let expected = HEADER_LEN + solution_count * guess_count * width * 8;
        if bytes.len() != expected {
            return Err(TableError::Corrupt(format!(
                "expected {expected} bytes, found {}",
                bytes.len()
            )));
        }

        let mut cells = Vec::with_capacity(solution_count * guess_count);
        let mut offset = HEADER_LEN;
        for _ in 0..solution_count * guess_count {
            let raw: Vec<u64> = (0..width)
                .map(|w| {
                    let at = offset + w * 8;
                    u64::from_le_bytes(bytes[at..at + 8].try_into().unwrap())
                })
                .collect();
            offset += width * 8;
            let cell = CandidateSet::from_raw(solution_count, raw)
                .ok_or_else(|| TableError::Corrupt("cell width mismatch".into()))?;
            cells.push(cell);
        }

        Ok(Self {
            solution_count,
            guess_count,
            cells,
        })
    }

    /// Load the persisted table, or rebuild and persist it when missing or corrupt
    ///
    /// A corrupt or stale file is never used: the table is recomputed from the
    /// oracle, which is expensive but always correct.
    ///
    /// # Errors
    /// Returns an I/O error only from writing the rebuilt table.
    pub fn load_or_build<P: AsRef<Path>>(path: P, words: &WordList) -> io::Result<Self> {
        match Self::load(&path, words) {
            Ok(matrix) => Ok(matrix),
            Err(e) => {
                println!("Recomputing feedback matrix ({e})");
                let matrix = Self::build(words);
                matrix.save(&path)?;
                Ok(matrix)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Word;

    fn list(texts: &[&str]) -> WordList {
        WordList::from_solutions(texts.iter().map(|t| Word::new(*t).unwrap()).collect()).unwrap()
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("wordle_policy_{}_{name}", std::process::id()))
    }

    #[test]
    fn diagonal_is_singleton() {
        let words = list(&["crane", "slate", "crate"]);
        let matrix = FeedbackMatrix::build(&words);
        for i in 0..3 {
            let cell = matrix.remaining(i, i);
            assert_eq!(cell.count(), 1);
            assert!(cell.contains(i));
        }
    }

    #[test]
    fn every_cell_contains_its_solution() {
        let words = list(&["crane", "slate", "crate", "speed", "erase"]);
        let matrix = FeedbackMatrix::build(&words);
        for sol in 0..5 {
            for guess in 0..5 {
                assert!(
                    matrix.remaining(sol, guess).contains(sol),
                    "cell ({sol},{guess}) lost its solution"
                );
            }
        }
    }

    #[test]
    fn guess_pool_columns_are_present() {
        let solutions: Vec<Word> = ["crane", "slate"]
            .iter()
            .map(|t| Word::new(*t).unwrap())
            .collect();
        let pool = vec![Word::new("soare").unwrap()];
        let words = WordList::new(solutions, pool).unwrap();

        let matrix = FeedbackMatrix::build(&words);
        assert_eq!(matrix.guess_count(), 3);
        // Pool guesses still constrain candidates over the solution universe
        assert!(matrix.remaining(0, 2).contains(0));
    }

    #[test]
    fn save_load_round_trip() {
        let words = list(&["crane", "slate", "crate"]);
        let matrix = FeedbackMatrix::build(&words);
        let path = temp_path("roundtrip.bin");

        matrix.save(&path).unwrap();
        let loaded = FeedbackMatrix::load(&path, &words).unwrap();
        for sol in 0..3 {
            for guess in 0..3 {
                assert_eq!(loaded.remaining(sol, guess), matrix.remaining(sol, guess));
            }
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn stale_table_is_rejected() {
        let words = list(&["crane", "slate", "crate"]);
        let matrix = FeedbackMatrix::build(&words);
        let path = temp_path("stale.bin");
        matrix.save(&path).unwrap();

        // Same file, different word list: shape check must fail
        let other = list(&["crane", "slate"]);
        assert!(matches!(
            FeedbackMatrix::load(&path, &other),
            Err(TableError::Corrupt(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn truncated_file_is_corrupt() {
        let words = list(&["crane", "slate"]);
        let path = temp_path("truncated.bin");
        std::fs::write(&path, b"WFBM").unwrap();
        assert!(matches!(
            FeedbackMatrix::load(&path, &words),
            Err(TableError::Corrupt(_))
        ));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_or_build_recovers_from_missing_file() {
        let words = list(&["crane", "slate"]);
        let path = temp_path("rebuild.bin");
        std::fs::remove_file(&path).ok();

        let matrix = FeedbackMatrix::load_or_build(&path, &words).unwrap();
        assert_eq!(matrix.solution_count(), 2);
        // Second call loads the file written by the first
        let again = FeedbackMatrix::load_or_build(&path, &words).unwrap();
        assert_eq!(again.remaining(0, 1), matrix.remaining(0, 1));
        std::fs::remove_file(&path).ok();
    }
}
