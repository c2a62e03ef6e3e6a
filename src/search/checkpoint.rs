//! Graph persistence as JSON lines
//!
//! One record per state, in arena order: the state's key and bounds plus
//! every guess tried there with its child edges. Children are written as
//! `(weight, candidate set)` pairs and resolved through the memoization cache
//! on load, so shared nodes deserialize back to one node and the DAG survives
//! the round trip.
//!
//! A checkpoint that does not match the current word list, or that references
//! a state it never defines, is rejected outright; resuming from a suspect
//! file is never worth a silently wrong policy.

use crate::core::{CandidateSet, WordList};
use crate::oracle::FeedbackMatrix;
use crate::search::bounds::Bounds;
use crate::search::engine::{Engine, SearchConfig};
use crate::search::graph::{Graph, Guess, StateId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

/// Error type for saving and loading checkpoints
#[derive(Debug)]
pub enum CheckpointError {
    Io(io::Error),
    /// A record could not be encoded while saving
    Encode(serde_json::Error),
    /// The file is malformed or inconsistent with the current word list
    Corrupt(String),
}

impl fmt::Display for CheckpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Checkpoint I/O error: {e}"),
            Self::Encode(e) => write!(f, "Checkpoint encoding error: {e}"),
            Self::Corrupt(detail) => write!(f, "Corrupt checkpoint: {detail}"),
        }
    }
}

impl std::error::Error for CheckpointError {}

impl From<io::Error> for CheckpointError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[derive(Serialize, Deserialize)]
struct StateRecord {
    depth: u8,
    candidates: Vec<u64>,
    prob: (f64, f64),
    expected: (f64, f64),
    guesses: Vec<GuessRecord>,
}

#[derive(Serialize, Deserialize)]
struct GuessRecord {
    word: String,
    prob: (f64, f64),
    expected: (f64, f64),
    children: Vec<ChildRecord>,
}

#[derive(Serialize, Deserialize)]
struct ChildRecord {
    /// How many solutions lead from the guess to this child
    count: u32,
    candidates: Vec<u64>,
}

/// Write the whole graph to `path`, one state per line
///
/// # Errors
/// Returns [`CheckpointError::Io`] on write failure, [`CheckpointError::Encode`]
/// when a record cannot be serialized.
pub fn save<P: AsRef<Path>>(
    graph: &Graph,
    words: &WordList,
    path: P,
) -> Result<(), CheckpointError> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    for (_, state) in graph.states_with_ids() {
        let guesses = state
            .alternatives
            .iter()
            .map(|&gid| {
                let guess = graph.guess(gid);
                GuessRecord {
                    word: words.guess(guess.word).text().to_string(),
                    prob: (guess.prob.min, guess.prob.max),
                    expected: (guess.expected.min, guess.expected.max),
                    children: guess
                        .children
                        .iter()
                        .map(|&(child, count)| ChildRecord {
                            count,
                            candidates: graph.state(child).candidates.raw().to_vec(),
                        })
                        .collect(),
                }
            })
            .collect();
        let record = StateRecord {
            depth: state.depth,
            candidates: state.candidates.raw().to_vec(),
            prob: (state.prob.min, state.prob.max),
            expected: (state.expected.min, state.expected.max),
            guesses,
        };
        let line = serde_json::to_string(&record).map_err(CheckpointError::Encode)?;
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Read a graph saved by [`save`], resolving shared states through the cache
///
/// # Errors
/// Returns [`CheckpointError::Corrupt`] on any mismatch with the current word
/// list, malformed record, or a child state the file never defines.
pub fn load<P: AsRef<Path>>(path: P, words: &WordList) -> Result<Graph, CheckpointError> {
    let universe = words.solution_count();
    let reader = io::BufReader::new(fs::File::open(path)?);
    let mut graph = Graph::new();
    let mut recorded: FxHashSet<StateId> = FxHashSet::default();

    // Bounds for a child created before its own record arrives; always
    // overwritten when that record is read, or the file is rejected.
    let placeholder = (Bounds::new(0.0, 1.0), Bounds::new(0.0, f64::MAX));

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let record: StateRecord = serde_json::from_str(&line)
            .map_err(|e| CheckpointError::Corrupt(format!("line {}: {e}", line_no + 1)))?;

        let candidates = CandidateSet::from_raw(universe, record.candidates).ok_or_else(|| {
            CheckpointError::Corrupt(format!("line {}: set width mismatch", line_no + 1))
        })?;
        let (sid, _) = graph.get_or_create(
            record.depth,
            candidates,
            Bounds::new(record.prob.0, record.prob.1),
            Bounds::new(record.expected.0, record.expected.1),
        );
        // The key may have been created as a placeholder child already
        let state = graph.state_mut(sid);
        state.prob = Bounds::new(record.prob.0, record.prob.1);
        state.expected = Bounds::new(record.expected.0, record.expected.1);
        recorded.insert(sid);

        for guess_record in record.guesses {
            let word = words.index_of(&guess_record.word).map_err(|e| {
                CheckpointError::Corrupt(format!("line {}: {e}", line_no + 1))
            })?;
            let mut children = Vec::with_capacity(guess_record.children.len());
            let mut child_ids = Vec::with_capacity(guess_record.children.len());
            for child_record in guess_record.children {
                let child_set =
                    CandidateSet::from_raw(universe, child_record.candidates).ok_or_else(|| {
                        CheckpointError::Corrupt(format!(
                            "line {}: child set width mismatch",
                            line_no + 1
                        ))
                    })?;
                let (child, _) = graph.get_or_create(
                    record.depth + 1,
                    child_set,
                    placeholder.0,
                    placeholder.1,
                );
                children.push((child, child_record.count));
                child_ids.push(child);
            }
            let gid = graph.add_guess(Guess {
                word,
                origin: sid,
                prob: Bounds::new(guess_record.prob.0, guess_record.prob.1),
                expected: Bounds::new(guess_record.expected.0, guess_record.expected.1),
                children,
            });
            graph.state_mut(sid).alternatives.push(gid);
            for child in child_ids {
                graph.state_mut(child).incoming.push(gid);
            }
        }
    }

    for (sid, state) in graph.states_with_ids() {
        if !recorded.contains(&sid) {
            return Err(CheckpointError::Corrupt(format!(
                "state at depth {} with {} candidates is referenced but never defined",
                state.depth, state.num_candidates
            )));
        }
    }
    Ok(graph)
}

/// Load a checkpoint and rebuild an engine around it
///
/// # Errors
/// Returns [`CheckpointError::Corrupt`] when the file does not contain a root
/// state for this word list, plus everything [`load`] rejects.
pub fn resume<'a, P: AsRef<Path>>(
    path: P,
    words: &'a WordList,
    matrix: &'a FeedbackMatrix,
    config: SearchConfig,
) -> Result<Engine<'a>, CheckpointError> {
    let graph = load(path, words)?;
    Engine::from_graph(words, matrix, config, graph)
        .ok_or_else(|| CheckpointError::Corrupt("no root state for this word list".into()))
}
