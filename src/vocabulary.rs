//! The solution and guess word lists.
//!
//! Lists are plain text with one word per line. Blank lines and lines
//! starting with `#` are skipped; anything else must be a five-letter word.
//! Both lists are sorted and deduplicated, and every solution is also added
//! to the guess list.

use std::fs;
use std::path::Path;

use crate::errors::SolverError;
use crate::word::Word;

#[derive(Debug, Clone)]
pub struct Vocabulary {
    solutions: Vec<Word>,
    guesses: Vec<Word>,
}

impl Vocabulary {
    pub fn new(mut solutions: Vec<Word>, mut guesses: Vec<Word>) -> Self {
        solutions.sort();
        solutions.dedup();
        guesses.extend_from_slice(&solutions);
        guesses.sort();
        guesses.dedup();
        Self { solutions, guesses }
    }

    /// Parse both lists from in-memory text.
    pub fn parse(solutions: &str, guesses: &str) -> Result<Self, SolverError> {
        Ok(Self::new(parse_word_list(solutions)?, parse_word_list(guesses)?))
    }

    pub fn load_from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        solutions: P,
        guesses: Q,
    ) -> Result<Self, SolverError> {
        Self::parse(&read_list(solutions.as_ref())?, &read_list(guesses.as_ref())?)
    }

    /// The word lists bundled with the crate.
    pub fn embedded() -> Result<Self, SolverError> {
        Self::parse(
            include_str!("../dictionary/solutions.txt"),
            include_str!("../dictionary/guesses.txt"),
        )
    }

    pub fn solutions(&self) -> &[Word] {
        &self.solutions
    }

    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    pub fn is_solution(&self, word: &Word) -> bool {
        self.solutions.binary_search(word).is_ok()
    }

    pub fn is_guess(&self, word: &Word) -> bool {
        self.guesses.binary_search(word).is_ok()
    }
}

/// One word per line; blank lines and `#` comments are skipped.
pub fn parse_word_list(contents: &str) -> Result<Vec<Word>, SolverError> {
    contents
        .lines()
        .enumerate()
        .map(|(number, line)| (number, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            line.parse::<Word>().map_err(|err| match err {
                SolverError::InvalidWord { word, reason } => SolverError::InvalidWord {
                    word,
                    reason: format!("line {}: {reason}", number + 1),
                },
                other => other,
            })
        })
        .collect()
}

fn read_list(path: &Path) -> Result<String, SolverError> {
    fs::read_to_string(path).map_err(|source| SolverError::Io {
        path: path.display().to_string(),
        source,
    })
}
