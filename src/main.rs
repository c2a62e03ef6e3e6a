use anyhow::{Result, anyhow, ensure};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wordle_policy::commands::{compute, play, stats};
use wordle_policy::core::WordList;
use wordle_policy::search::{Objective, SearchConfig};
use wordle_policy::wordlists::load_word_list;

#[derive(Parser)]
#[command(
    name = "wordle_policy",
    version,
    about = "Exact policy search for Wordle-style games"
)]
struct Cli {
    /// Solution word list, one five-letter word per line
    #[arg(short, long, global = true, default_value = "data/solutions.txt")]
    solutions: PathBuf,

    /// Extra guessable words that can never be the answer
    #[arg(short = 'g', long, global = true)]
    guess_pool: Option<PathBuf>,

    /// win-rate, fewest-guesses, or win-then-guesses
    #[arg(short, long, global = true, default_value = "win-then-guesses")]
    objective: String,

    /// Guesses allowed per game
    #[arg(short, long, global = true, default_value_t = 6)]
    budget: u8,

    /// Convergence tolerance on bound widths
    #[arg(long, global = true, default_value_t = 1e-12)]
    tolerance: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the policy search
    Compute {
        /// Feedback matrix cache file (derived from the list size by default)
        #[arg(short, long)]
        matrix: Option<PathBuf>,

        /// Checkpoint file, written after every progress report
        #[arg(short, long)]
        checkpoint: Option<PathBuf>,

        /// Continue from the checkpoint instead of starting fresh
        #[arg(short, long, default_value_t = false)]
        resume: bool,

        /// Stop after this many steps even when unconverged
        #[arg(long)]
        steps: Option<u64>,

        /// Steps between progress reports and checkpoint saves
        #[arg(long, default_value_t = 5000)]
        report_every: u64,
    },
    /// Replay a searched policy against one answer or all of them
    Play {
        /// Feedback matrix cache file (derived from the list size by default)
        #[arg(short, long)]
        matrix: Option<PathBuf>,

        /// Checkpoint written by a previous compute run
        #[arg(short, long)]
        checkpoint: PathBuf,

        /// The answer to play against; every solution when omitted
        word: Option<String>,
    },
    /// Inspect a saved checkpoint
    Stats {
        /// Checkpoint written by a previous compute run
        #[arg(short, long)]
        checkpoint: PathBuf,

        /// Also walk the unshared tree size (slow on large graphs)
        #[arg(long, default_value_t = false)]
        tree_size: bool,
    },
}

fn default_matrix_path(words: &WordList) -> PathBuf {
    PathBuf::from(format!(
        "feedback_matrix_{}x{}.bin",
        words.solution_count(),
        words.guess_count()
    ))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    ensure!(cli.budget >= 1, "the guess budget must be at least 1");
    let words = load_word_list(&cli.solutions, cli.guess_pool.as_deref())?;
    let objective = Objective::from_name(&cli.objective)
        .ok_or_else(|| anyhow!("unknown objective '{}'", cli.objective))?;
    let search = SearchConfig {
        max_guesses: cli.budget,
        tolerance: cli.tolerance,
        objective,
    };

    match cli.command {
        Commands::Compute {
            matrix,
            checkpoint,
            resume,
            steps,
            report_every,
        } => {
            let options = compute::ComputeOptions {
                matrix_path: matrix.unwrap_or_else(|| default_matrix_path(&words)),
                checkpoint_path: checkpoint,
                resume,
                step_limit: steps,
                report_every: report_every.max(1),
            };
            compute::run(&words, search, &options)
        }
        Commands::Play {
            matrix,
            checkpoint,
            word,
        } => {
            let options = play::PlayOptions {
                matrix_path: matrix.unwrap_or_else(|| default_matrix_path(&words)),
                checkpoint_path: checkpoint,
                word,
            };
            play::run(&words, search, &options)
        }
        Commands::Stats {
            checkpoint,
            tree_size,
        } => {
            let options = stats::StatsOptions {
                checkpoint_path: checkpoint,
                tree_size,
            };
            stats::run(&words, &options)
        }
    }
}
