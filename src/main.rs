use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;

use quipsolve::mapping::Mapping;
use quipsolve::solver;
use quipsolve::word_list::WordList;

// The amount of time (in seconds) we allow the search to run
const TIME_BUDGET: u64 = 30;

/// Quipsolve cryptogram solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The ciphertext phrase to solve (lowercase words, single spaces)
    phrase: String,

    /// Path to the word list file (one word per line)
    #[arg(short, long, default_value = "/usr/share/dict/words")]
    word_list: String,

    /// Seed partial solution, as comma-separated cipher=PLAIN pairs
    /// (e.g. "q=H,l=A")
    #[arg(short, long)]
    seed: Option<String>,

    /// Maximum number of solutions to print
    #[arg(short = 'n', long, default_value_t = 100)]
    num_results_requested: usize,
}

/// Outcome of consuming the lazy solution sequence.
#[derive(Debug, Clone, PartialEq)]
enum SolveStatus {
    /// The search space was fully explored.
    SearchExhausted,

    /// Stopped early because the requested number of solutions was found.
    FoundEnough,

    /// Stopped because the time budget expired. Contains the elapsed time.
    TimedOut { elapsed: Duration },
}

/// Simple helper to enforce a wall-clock time limit on consuming the
/// solution sequence. The search core itself is unbounded; this is the
/// external cancellation wrapper around it.
struct TimeBudget {
    start: Instant,  // when the budget began
    limit: Duration, // maximum allowed elapsed time
}

impl TimeBudget {
    fn new(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    /// How long this budget has been running.
    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns true if the allowed time has fully elapsed.
    fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }
}

/// Entry point of the quipsolve CLI.
///
/// Delegates to [`try_main`], catching any errors and printing them
/// in a user-friendly way before exiting with code 1.
fn main() -> ExitCode {
    // Set up logging
    let debug_enabled = std::env::var("QUIPSOLVE_DEBUG").is_ok();
    quipsolve::log::init_logger(debug_enabled);

    log::debug!("Starting quipsolve");

    if let Err(e) = try_main() {
        // Print the error message to stderr, with detailed formatting for
        // the error types that carry codes and help text
        if let Some(solver_err) = e.downcast_ref::<solver::SolverError>() {
            eprintln!("Error: {}", solver_err.display_detailed());
        } else if let Some(input_err) = e.downcast_ref::<quipsolve::errors::InputError>() {
            eprintln!("Error: {}", input_err.display_detailed());
        } else if let Some(dict_err) = e.downcast_ref::<quipsolve::errors::DictionaryError>() {
            eprintln!("Error: {}", dict_err.display_detailed());
        } else {
            eprintln!("Error: {e}");
        }
        // Exit explicitly with a nonzero code so scripts can detect failure
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Core application logic for the quipsolve CLI.
///
/// Steps:
/// 1. Parse CLI arguments with Clap.
/// 2. Load the word list from disk.
/// 3. Parse the seed spec, if given.
/// 4. Solve the phrase, printing each solution as it is found, under a
///    wall-clock time budget and a result cap.
/// 5. Print performance metrics (timings, counts) on stderr.
///
/// Returns `Ok(())` on success or an error (e.g., invalid phrase, malformed
/// seed, missing word-list file) which bubbles up to [`main`].
fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // 1. Load the word list from disk
    let t_load = Instant::now();
    let word_list = WordList::load_from_path(&cli.word_list)?;
    let load_secs = t_load.elapsed().as_secs_f64();

    // Build a Vec<&str> of word references for the solver
    let words_ref: Vec<_> = word_list.entries.iter().map(String::as_str).collect();

    // 2. Parse the seed spec, if any
    let seed: Option<Mapping> = cli.seed.as_deref().map(str::parse).transpose()?;

    // 3. Solve, consuming the lazy sequence under the time budget
    let t_solve = Instant::now();
    let mut solutions = solver::solve(&cli.phrase, &words_ref, seed.as_ref())?;

    let budget = TimeBudget::new(Duration::from_secs(TIME_BUDGET));
    let mut num_found = 0usize;

    let status = loop {
        if budget.expired() {
            break SolveStatus::TimedOut {
                elapsed: budget.elapsed(),
            };
        }
        match solutions.next() {
            Some(solution) => {
                println!("{solution}");
                num_found += 1;
                if num_found >= cli.num_results_requested {
                    break SolveStatus::FoundEnough;
                }
            }
            None => break SolveStatus::SearchExhausted,
        }
    };
    let solve_secs = t_solve.elapsed().as_secs_f64();

    match status {
        SolveStatus::TimedOut { elapsed } => {
            eprintln!(
                "⚠️  Timed out after {:.1}s; some solutions may not have been found",
                elapsed.as_secs_f64()
            );
        }
        SolveStatus::FoundEnough => {
            eprintln!(
                "✓ Stopped after finding {}/{} requested solutions",
                num_found, cli.num_results_requested
            );
        }
        SolveStatus::SearchExhausted => {
            eprintln!("✓ Search space exhausted ({num_found} solution(s))");
        }
    }

    // 4. Print diagnostics (word-list size, timings, number of results) to stderr
    eprintln!(
        "Loaded {} words in {:.3}s; solved in {:.3}s ({} solution(s)).",
        word_list.entries.len(),
        load_secs,
        solve_secs,
        num_found
    );

    Ok(())
}
