//! The `stats` subcommand: inspect a saved checkpoint

use crate::core::WordList;
use crate::output::display;
use crate::search::checkpoint;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct StatsOptions {
    pub checkpoint_path: PathBuf,
    /// Also compute the unshared tree size; slow on large graphs
    pub tree_size: bool,
}

pub fn run(words: &WordList, options: &StatsOptions) -> Result<()> {
    let graph = checkpoint::load(&options.checkpoint_path, words)
        .with_context(|| format!("loading checkpoint {}", options.checkpoint_path.display()))?;
    let root = graph
        .lookup(0, &words.all_solutions())
        .context("checkpoint has no root state for this word list")?;

    let stats = graph.stats();
    let state = graph.state(root);
    println!("states:  {}", stats.states);
    println!("guesses: {}", stats.guesses);
    println!(
        "root: {}/{} first guesses explored",
        state.alternatives.len(),
        state.num_candidates
    );
    println!(
        "  win probability:  [{:.6}, {:.6}]",
        state.prob.min, state.prob.max
    );
    println!(
        "  expected guesses: [{:.6}, {:.6}]",
        state.expected.min, state.expected.max
    );
    if options.tree_size {
        println!("unshared tree size: {}", graph.tree_size(root));
    }
    Ok(())
}
