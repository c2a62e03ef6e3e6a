//! Colored progress and result printing

use crate::policy::{PlayOutcome, PolicySummary};
use crate::search::{Bounds, ProgressReport};
use colored::Colorize;
use std::collections::BTreeMap;

fn interval(b: Bounds) -> String {
    format!("[{:.6}, {:.6}]", b.min, b.max)
}

/// One progress block, printed between search chunks
pub fn print_progress(report: &ProgressReport) {
    println!("{}", "Search progress".bold());
    println!(
        "  graph: {} states, {} guesses ({} hits / {} misses)",
        report.cache.states, report.cache.guesses, report.cache.hits, report.cache.misses
    );
    println!(
        "  first guesses explored: {}/{}",
        report.explored, report.total
    );
    println!("  win probability:  {}", interval(report.prob));
    println!("  expected guesses: {}", interval(report.expected));
    if !report.guaranteed.is_empty() {
        println!(
            "  {} {}",
            "guaranteed wins:".green().bold(),
            report.guaranteed.join(" ")
        );
    }
    for (word, prob, expected) in &report.promising {
        println!(
            "  {} {} prob {} expected {}",
            "promising:".yellow(),
            word.bold(),
            interval(*prob),
            interval(*expected)
        );
    }
}

/// The ranked first guesses of a finished or interrupted search
pub fn print_summary(summary: &PolicySummary, limit: usize) {
    println!("{}", "Policy".bold());
    println!("  win probability:  {}", interval(summary.prob));
    println!("  expected guesses: {}", interval(summary.expected));
    for (rank, guess) in summary.alternatives.iter().take(limit).enumerate() {
        let marker = if guess.converged {
            "converged".green()
        } else {
            "open".yellow()
        };
        println!(
            "  {:>2}. {} prob {} expected {} ({marker})",
            rank + 1,
            guess.word.bold(),
            interval(guess.prob),
            interval(guess.expected)
        );
    }
    if summary.alternatives.len() > limit {
        println!("  ... and {} more", summary.alternatives.len() - limit);
    }
}

/// One played game
pub fn print_outcome(solution: &str, outcome: &PlayOutcome) {
    let status = if outcome.won {
        format!("won in {}", outcome.turns()).green().bold()
    } else {
        "lost".red().bold()
    };
    println!("{}: {status} ({})", solution.bold(), outcome.guesses.join(", "));
}

/// Guess-count distribution over a full replay
pub fn print_histogram(turns: &BTreeMap<usize, usize>, losses: usize, total: usize) {
    println!("{}", "Results".bold());
    let max = turns.values().copied().max().unwrap_or(0).max(1);
    for (count, games) in turns {
        let width = games * 40 / max;
        println!(
            "  {count} guesses: {:>6} {}",
            games,
            "█".repeat(width.max(1)).cyan()
        );
    }
    if losses > 0 {
        println!("  {} {losses}", "losses:".red().bold());
    }
    let wins = total - losses;
    let weighted: usize = turns.iter().map(|(count, games)| count * games).sum();
    if wins > 0 {
        println!(
            "  {wins}/{total} won ({:.2}%), {:.4} average guesses per win",
            wins as f64 * 100.0 / total as f64,
            weighted as f64 / wins as f64
        );
    } else {
        println!("  0/{total} won");
    }
}
