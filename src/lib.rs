//! # KokoWord
//!
//! A parallel Wordle solver that picks, each round, the guess which best
//! partitions the remaining candidate solutions.
//!
//! A guess is scored by the sum of squared sizes of the groups of candidates
//! that would give the same clue; lower means fewer candidates left on
//! average. The search is spread across a fixed pool of workers and prunes a
//! guess as soon as its running score exceeds the best one found so far.

pub mod config;
pub mod constraints;
pub mod distribute;
pub mod errors;
pub mod feedback;
pub mod logging;
pub mod scorer;
pub mod search;
pub mod solver;
pub mod vocabulary;
pub mod word;

pub use config::SolverConfig;
pub use constraints::{compile, compile_history, filter, ConstraintSet, CountSpec, PositionFilter};
pub use distribute::{distribute, WorkRange};
pub use errors::SolverError;
pub use feedback::{Clue, Outcome, Pattern};
pub use scorer::{score_guess, PartitionScore};
pub use search::{rank_guesses, GuessEvaluation, RankedGuess, SearchPool};
pub use solver::{Game, GameState, LogSink, NullSink, ProgressEvent, ProgressSink, WordleSolver};
pub use vocabulary::Vocabulary;
pub use word::Word;

/// Word length for Wordle
pub const WORD_LENGTH: usize = 5;

/// Compute the clue `guess` receives when the hidden word is `solution`.
pub fn compute_clue(solution: &Word, guess: &Word) -> Clue {
    Clue::compute(solution, guess)
}
