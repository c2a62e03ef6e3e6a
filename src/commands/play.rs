//! The `play` subcommand: replay a searched policy
//!
//! Plays either one named answer or every solution in the list, reporting
//! the guess-count distribution. Requires a checkpoint; the search itself is
//! never run here.

use crate::core::WordList;
use crate::oracle::FeedbackMatrix;
use crate::output::display;
use crate::policy::Player;
use crate::search::{SearchConfig, checkpoint};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub struct PlayOptions {
    pub matrix_path: PathBuf,
    pub checkpoint_path: PathBuf,
    /// A single answer to play; every solution when absent
    pub word: Option<String>,
}

pub fn run(words: &WordList, search: SearchConfig, options: &PlayOptions) -> Result<()> {
    let matrix = FeedbackMatrix::load_or_build(&options.matrix_path, words)
        .context("preparing the feedback matrix")?;
    let engine = checkpoint::resume(&options.checkpoint_path, words, &matrix, search)
        .with_context(|| format!("loading checkpoint {}", options.checkpoint_path.display()))?;
    let player = Player::new(&engine);

    match &options.word {
        Some(word) => {
            let outcome = player.play(word)?;
            display::print_outcome(word, &outcome);
        }
        None => {
            let mut turns: BTreeMap<usize, usize> = BTreeMap::new();
            let mut losses = 0;
            for index in 0..words.solution_count() as u32 {
                let solution = words.solution(index).text().to_string();
                let outcome = player.play(&solution)?;
                if outcome.won {
                    *turns.entry(outcome.turns()).or_insert(0) += 1;
                } else {
                    losses += 1;
                    display::print_outcome(&solution, &outcome);
                }
            }
            display::print_histogram(&turns, losses, words.solution_count());
        }
    }
    Ok(())
}
