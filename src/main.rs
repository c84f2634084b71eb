//! KokoWord CLI
//!
//! Command-line interface for the partition-search Wordle solver.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use kokoword::config::default_worker_count;
use kokoword::scorer::partition;
use kokoword::{
    Clue, Game, LogSink, SolverConfig, SolverError, Vocabulary, Word, WordleSolver,
};

/// Wordle solver that picks the guess which best splits the remaining answers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Solution list (one word per line); defaults to the bundled list
    #[arg(long, requires = "guesses")]
    solutions: Option<PathBuf>,

    /// Guess list (one word per line); defaults to the bundled list
    #[arg(long, requires = "solutions")]
    guesses: Option<PathBuf>,

    /// Number of search workers
    #[arg(short = 'j', long, default_value_t = default_worker_count())]
    workers: usize,

    /// Seed for the random choices, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Number of top guesses to show each round
    #[arg(short = 'n', long, default_value_t = 5)]
    top: usize,

    /// Enable debug logging (also enabled by KOKOWORD_DEBUG)
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a full game against a hidden solution
    Play {
        solution: String,
        /// Fixed first guess instead of a random opening
        #[arg(long)]
        opening: Option<String>,
    },
    /// Suggest the next guess for a clue history such as O?R+A-T-E-
    Suggest { clues: Vec<String> },
    /// Print the clue a guess receives against a solution
    Clue { solution: String, guess: String },
    /// Show how a guess splits the candidates left by a clue history
    Groups { guess: String, clues: Vec<String> },
    /// Play every solution and print the guess-count distribution
    Bench {
        /// Only play the first N solutions
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    kokoword::logging::init_logger(cli.debug || std::env::var("KOKOWORD_DEBUG").is_ok());

    if let Err(e) = try_main(cli) {
        eprintln!("Error: {}", e.display_detailed());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main(cli: Cli) -> Result<(), SolverError> {
    let command = match cli.command {
        Command::Clue { solution, guess } => {
            let clue = Clue::compute(&solution.parse()?, &guess.parse()?);
            println!("{clue} {}", clue.to_emoji_string());
            return Ok(());
        }
        command => command,
    };

    let vocabulary = match (&cli.solutions, &cli.guesses) {
        (Some(solutions), Some(guesses)) => Vocabulary::load_from_paths(solutions, guesses)?,
        _ => Vocabulary::embedded()?,
    };
    log::debug!(
        "loaded {} solutions and {} guesses",
        vocabulary.solutions().len(),
        vocabulary.guesses().len()
    );

    let config = SolverConfig {
        workers: cli.workers.max(1),
        top_n: cli.top,
        seed: cli.seed,
    };
    let mut solver = WordleSolver::new(vocabulary, config)?;

    match command {
        Command::Play { solution, opening } => {
            let hidden: Word = solution.parse()?;
            let game = match opening {
                Some(opening) => solver.play_with_opening(&hidden, opening.parse()?, &mut LogSink)?,
                None => {
                    let game = Game::new(hidden, solver.vocabulary())?;
                    solver.play(game, &mut LogSink)?
                }
            };
            println!();
            for (i, clue) in game.clues().iter().enumerate() {
                println!("Guess {}: {} → {} {}", i + 1, clue.guess(), clue, clue.to_emoji_string());
            }
            println!("Solved in {} guesses.", game.guess_count());
        }
        Command::Suggest { clues } => {
            let clues = parse_clues(&clues)?;
            let suggestion = solver.suggest(&clues, &mut LogSink)?;
            println!("{}", suggestion.guess);
        }
        Command::Groups { guess, clues } => {
            let guess: Word = guess.parse()?;
            let clues = parse_clues(&clues)?;
            let candidates = solver.candidates_for(&clues);
            let groups = partition(&candidates, &guess);
            println!(
                "{guess} splits {} candidates into {} groups:",
                candidates.len(),
                groups.len()
            );
            for (pattern, words) in &groups {
                let clue = Clue::new(guess, *pattern);
                let listed: Vec<String> = words.iter().map(Word::to_string).collect();
                println!("  {clue} ({:>4}) {}", words.len(), listed.join(" "));
            }
        }
        Command::Bench { limit } => {
            let start = Instant::now();
            let distribution = solver.benchmark_guess_distribution(limit)?;
            let elapsed = start.elapsed();

            let total: usize = distribution.iter().map(|(_, c)| c).sum();
            let total_guesses: usize = distribution.iter().map(|(g, c)| g * c).sum();
            println!("Guess distribution:");
            for (guesses, count) in &distribution {
                let pct = *count as f64 / total as f64 * 100.0;
                let bar = "█".repeat((*count * 40 / total).max(1));
                println!("  {} guesses: {:>5} ({:>5.1}%) {}", guesses, count, pct, bar);
            }
            if total > 0 {
                println!("Average guesses: {:.3}", total_guesses as f64 / total as f64);
            }
            println!("Total words: {}", total);
            println!("Time elapsed: {:.2?}", elapsed);
        }
        Command::Clue { .. } => {}
    }

    Ok(())
}

/// Accepts clues separately (`O?R+A-T-E-`) or concatenated.
fn parse_clues(raw: &[String]) -> Result<Vec<Clue>, SolverError> {
    let mut clues = Vec::new();
    for arg in raw {
        clues.extend(Clue::parse_history(arg)?);
    }
    Ok(clues)
}
