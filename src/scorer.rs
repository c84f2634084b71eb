//! Partition scoring for a single guess.
//!
//! A guess splits the candidate set into groups of candidates that would
//! produce the same clue. The score is the sum of squared group sizes, which
//! divided by the candidate count is the expected number of candidates left
//! after making the guess. Lower is better.

use std::collections::BTreeMap;

use crate::constraints::ClueCache;
use crate::errors::SolverError;
use crate::feedback::{Clue, Pattern};
use crate::word::Word;

/// Score and number of distinct clue groups for one guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionScore {
    pub score: u64,
    pub groups: usize,
}

/// Score `guess` against `candidates`, giving up as soon as the running
/// score exceeds `best_known`.
///
/// Returns `Ok(None)` when pruned. The candidate equal to `guess` is skipped.
/// Every clue is re-checked against its own compiled constraint set; a clue
/// that rejects the candidate it came from is reported as
/// [`SolverError::InconsistentClue`].
pub fn score_guess(
    candidates: &[Word],
    guess: &Word,
    best_known: u64,
    cache: &mut ClueCache,
) -> Result<Option<PartitionScore>, SolverError> {
    let mut group_sizes = [0u32; Pattern::COUNT];
    let mut groups = 0usize;
    let mut score = 0u64;

    for candidate in candidates {
        if candidate == guess {
            continue;
        }
        let clue = Clue::compute(candidate, guess);
        if !cache.get_or_compile(&clue).matches(candidate) {
            return Err(SolverError::InconsistentClue {
                clue: clue.to_string(),
                solution: candidate.to_string(),
            });
        }

        let size = &mut group_sizes[clue.pattern().0 as usize];
        *size += 1;
        if *size == 1 {
            groups += 1;
        }
        // x^2 - (x-1)^2 = 2x - 1
        score += 2 * u64::from(*size) - 1;
        if score > best_known {
            return Ok(None);
        }
    }

    Ok(Some(PartitionScore { score, groups }))
}

/// Group `candidates` by the clue `guess` would receive against each one.
pub fn partition(candidates: &[Word], guess: &Word) -> BTreeMap<Pattern, Vec<Word>> {
    let mut groups: BTreeMap<Pattern, Vec<Word>> = BTreeMap::new();
    for candidate in candidates {
        groups
            .entry(Clue::compute(candidate, guess).pattern())
            .or_default()
            .push(*candidate);
    }
    groups
}
