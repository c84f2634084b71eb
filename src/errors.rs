//! Error types for the solver, each with a stable code and optional help text.
//!
//! # Error Codes
//!
//! - W001: `InvalidWord` (not five ASCII letters, or not in the expected vocabulary)
//! - C001: `InvalidClueFormat` (malformed encoded clue)
//! - C002: `InconsistentClue` (a computed clue rejected its own solution)
//! - S001: `SearchIncomplete` (a worker failed during a search round)
//! - S002: `NoCandidates` (the clue history eliminated every solution)
//! - S003: `WorkerPool` (the search thread pool could not be started)
//! - V001: `Io` (a word list could not be read)

use std::io;

/// Every failure the library can report.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("invalid word \"{word}\": {reason}")]
    InvalidWord { word: String, reason: String },

    #[error("invalid clue \"{clue}\": {reason}")]
    InvalidClueFormat { clue: String, reason: String },

    #[error("clue {clue} does not accept its own solution {solution}")]
    InconsistentClue { clue: String, solution: String },

    #[error("search incomplete: worker {worker} failed ({reason})")]
    SearchIncomplete { worker: usize, reason: String },

    #[error("no candidate solutions remain for clue history \"{history}\"")]
    NoCandidates { history: String },

    #[error("could not start search workers: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to read word list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl SolverError {
    pub(crate) fn invalid_word(word: impl Into<String>, reason: impl Into<String>) -> Self {
        SolverError::InvalidWord {
            word: word.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_clue(clue: impl Into<String>, reason: impl Into<String>) -> Self {
        SolverError::InvalidClueFormat {
            clue: clue.into(),
            reason: reason.into(),
        }
    }

    /// Stable identifier for documentation lookup.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::InvalidWord { .. } => "W001",
            SolverError::InvalidClueFormat { .. } => "C001",
            SolverError::InconsistentClue { .. } => "C002",
            SolverError::SearchIncomplete { .. } => "S001",
            SolverError::NoCandidates { .. } => "S002",
            SolverError::WorkerPool(_) => "S003",
            SolverError::Io { .. } => "V001",
        }
    }

    pub fn help(&self) -> Option<&'static str> {
        match self {
            SolverError::InvalidWord { .. } => {
                Some("Words are exactly five letters A-Z; hidden solutions must come from the solution list")
            }
            SolverError::InvalidClueFormat { .. } => Some(
                "Clues alternate letter and marker, e.g. O?R+A-T-E- (+ = hit, ? = present, - = miss)",
            ),
            SolverError::NoCandidates { .. } => {
                Some("Check the clues for typos; no word in the solution list satisfies all of them")
            }
            _ => None,
        }
    }

    /// Message, code and help text on separate lines.
    pub fn display_detailed(&self) -> String {
        let mut out = format!("{self}\n  code: {}", self.code());
        if let Some(help) = self.help() {
            out.push_str("\n  help: ");
            out.push_str(help);
        }
        out
    }
}
