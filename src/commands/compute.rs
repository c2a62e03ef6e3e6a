//! The `compute` subcommand: run the policy search
//!
//! Prepares the feedback matrix (loading the cached file when it matches,
//! rebuilding otherwise), then runs the engine in chunks. After every chunk
//! a progress block is printed and, when configured, a checkpoint is written,
//! so a long search can be interrupted and resumed at will.

use crate::core::WordList;
use crate::oracle::FeedbackMatrix;
use crate::output::display;
use crate::policy::Policy;
use crate::search::{Engine, SearchConfig, checkpoint};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

pub struct ComputeOptions {
    pub matrix_path: PathBuf,
    pub checkpoint_path: Option<PathBuf>,
    pub resume: bool,
    /// Stop after roughly this many steps even when unconverged
    pub step_limit: Option<u64>,
    /// Steps per chunk between reports and checkpoint saves
    pub report_every: u64,
}

pub fn run(words: &WordList, search: SearchConfig, options: &ComputeOptions) -> Result<()> {
    println!(
        "Searching over {} solutions, {} guessable words ({})",
        words.solution_count(),
        words.guess_count(),
        search.objective.name()
    );
    let matrix = FeedbackMatrix::load_or_build(&options.matrix_path, words)
        .context("preparing the feedback matrix")?;

    let mut engine = match &options.checkpoint_path {
        Some(path) if options.resume && path.exists() => {
            println!("Resuming from {}", path.display());
            checkpoint::resume(path, words, &matrix, search)
                .with_context(|| format!("resuming from {}", path.display()))?
        }
        _ => Engine::new(words, &matrix, search),
    };

    let mut total: u64 = 0;
    loop {
        let status = engine.run_steps(options.report_every)?;
        total += status.steps;
        display::print_progress(&engine.progress());
        println!("  {total} steps so far");
        if let Some(path) = &options.checkpoint_path {
            checkpoint::save(engine.graph(), words, path)
                .with_context(|| format!("writing checkpoint {}", path.display()))?;
        }

        if status.done {
            println!("{}", "Search converged".green().bold());
            break;
        }
        if status.stalled {
            println!("{}", "Search stalled before convergence".yellow().bold());
            break;
        }
        if options.step_limit.is_some_and(|limit| total >= limit) {
            println!("Step limit reached after {total} steps");
            break;
        }
    }

    let policy = Policy::new(&engine);
    display::print_summary(&policy.summary(engine.root()), 10);
    Ok(())
}
