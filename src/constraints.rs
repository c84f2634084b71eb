//! Constraint sets compiled from clue histories, and candidate filtering.
//!
//! A [`ConstraintSet`] is the structured form of everything a clue history
//! says about the solution: one [`PositionFilter`] per position plus a
//! [`CountSpec`] for letters whose number of occurrences is known. A word is
//! consistent with the history iff [`ConstraintSet::matches`] accepts it.
//!
//! Compilation of a single clue:
//!
//! 1. Hits pin their position to the letter and add to that letter's
//!    known-hit count.
//! 2. Scanning left to right, hits and presents add to the letter's tally;
//!    a present also excludes the letter from its position. A miss with no
//!    prior tally excludes the letter from every unpinned position. A miss
//!    after a tally makes the tally exact and excludes the letter from its
//!    position.
//! 3. A tally is only emitted as a count spec when the positional filters
//!    do not already imply it (an at-least tally equal to the known-hit
//!    count is implied by the pins).
//!
//! Histories are compiled clue by clue and intersected with
//! [`ConstraintSet::merge`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::errors::SolverError;
use crate::feedback::{history_key, Clue, Outcome};
use crate::word::{letter_index, LetterSet, Word, ALPHABET_SIZE};
use crate::WORD_LENGTH;

/// Requirement on the letter at one position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionFilter {
    Any,
    Equals(u8),
    NoneOf(LetterSet),
}

impl PositionFilter {
    pub fn accepts(&self, letter: u8) -> bool {
        match *self {
            PositionFilter::Any => true,
            PositionFilter::Equals(required) => letter == required,
            PositionFilter::NoneOf(excluded) => !excluded.contains(letter),
        }
    }

    /// Both filters at once, or `None` if no letter satisfies both.
    fn intersect(self, other: Self) -> Option<Self> {
        use PositionFilter::*;
        match (self, other) {
            (Any, f) | (f, Any) => Some(f),
            (Equals(a), Equals(b)) => (a == b).then_some(Equals(a)),
            (Equals(a), NoneOf(set)) | (NoneOf(set), Equals(a)) => {
                (!set.contains(a)).then_some(Equals(a))
            }
            (NoneOf(a), NoneOf(b)) => Some(NoneOf(a.union(b))),
        }
    }
}

/// Requirement on how many times a letter occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountSpec {
    AtLeast(u8),
    Exactly(u8),
}

impl CountSpec {
    pub fn accepts(self, count: u8) -> bool {
        match self {
            CountSpec::AtLeast(n) => count >= n,
            CountSpec::Exactly(n) => count == n,
        }
    }

    fn intersect(self, other: Self) -> Option<Self> {
        use CountSpec::*;
        match (self, other) {
            (AtLeast(a), AtLeast(b)) => Some(AtLeast(a.max(b))),
            (Exactly(a), AtLeast(b)) | (AtLeast(b), Exactly(a)) => (a >= b).then_some(Exactly(a)),
            (Exactly(a), Exactly(b)) => (a == b).then_some(Exactly(a)),
        }
    }
}

/// Positional filters plus per-letter count specs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    positions: [PositionFilter; WORD_LENGTH],
    counts: BTreeMap<u8, CountSpec>,
    satisfiable: bool,
}

impl Default for ConstraintSet {
    fn default() -> Self {
        Self::unconstrained()
    }
}

impl ConstraintSet {
    /// Accepts every word.
    pub fn unconstrained() -> Self {
        Self {
            positions: [PositionFilter::Any; WORD_LENGTH],
            counts: BTreeMap::new(),
            satisfiable: true,
        }
    }

    fn contradiction() -> Self {
        Self {
            satisfiable: false,
            ..Self::unconstrained()
        }
    }

    pub fn from_clue(clue: &Clue) -> Self {
        let cells: Vec<(u8, Outcome)> = clue.cells().collect();

        let mut pinned: [Option<u8>; WORD_LENGTH] = [None; WORD_LENGTH];
        let mut hit_counts = [0u8; ALPHABET_SIZE];
        for (i, &(letter, outcome)) in cells.iter().enumerate() {
            if outcome == Outcome::Hit {
                pinned[i] = Some(letter);
                hit_counts[letter_index(letter)] += 1;
            }
        }

        let mut tallies = [0u8; ALPHABET_SIZE];
        let mut exact = [false; ALPHABET_SIZE];
        let mut excluded = [LetterSet::EMPTY; WORD_LENGTH];
        for (i, &(letter, outcome)) in cells.iter().enumerate() {
            let idx = letter_index(letter);
            match outcome {
                Outcome::Hit => tallies[idx] += 1,
                Outcome::Present => {
                    excluded[i].insert(letter);
                    tallies[idx] += 1;
                }
                Outcome::Miss if tallies[idx] > 0 => {
                    exact[idx] = true;
                    excluded[i].insert(letter);
                }
                Outcome::Miss => {
                    for (j, pin) in pinned.iter().enumerate() {
                        if pin.is_none() {
                            excluded[j].insert(letter);
                        }
                    }
                }
            }
        }

        let mut positions = [PositionFilter::Any; WORD_LENGTH];
        for i in 0..WORD_LENGTH {
            positions[i] = match pinned[i] {
                Some(letter) => PositionFilter::Equals(letter),
                None if excluded[i].is_empty() => PositionFilter::Any,
                None => PositionFilter::NoneOf(excluded[i]),
            };
        }

        let mut counts = BTreeMap::new();
        for idx in 0..ALPHABET_SIZE {
            let tally = tallies[idx];
            if tally == 0 || (!exact[idx] && tally == hit_counts[idx]) {
                continue;
            }
            let spec = if exact[idx] {
                CountSpec::Exactly(tally)
            } else {
                CountSpec::AtLeast(tally)
            };
            counts.insert(b'A' + idx as u8, spec);
        }

        Self {
            positions,
            counts,
            satisfiable: true,
        }
    }

    /// Intersection of two constraint sets: a word matches the result iff it
    /// matches both inputs.
    pub fn merge(self, other: &Self) -> Self {
        if !self.satisfiable || !other.satisfiable {
            return Self::contradiction();
        }

        let mut positions = self.positions;
        for (slot, theirs) in positions.iter_mut().zip(other.positions) {
            match slot.intersect(theirs) {
                Some(filter) => *slot = filter,
                None => return Self::contradiction(),
            }
        }

        let mut counts = self.counts;
        for (&letter, &theirs) in &other.counts {
            let merged = match counts.get(&letter) {
                Some(&ours) => ours.intersect(theirs),
                None => Some(theirs),
            };
            match merged {
                Some(spec) => {
                    counts.insert(letter, spec);
                }
                None => return Self::contradiction(),
            }
        }

        Self {
            positions,
            counts,
            satisfiable: true,
        }
    }

    pub fn matches(&self, word: &Word) -> bool {
        if !self.satisfiable {
            return false;
        }
        let letters = word.letters();
        if !self
            .positions
            .iter()
            .zip(letters)
            .all(|(filter, &letter)| filter.accepts(letter))
        {
            return false;
        }
        if self.counts.is_empty() {
            return true;
        }
        let word_counts = word.letter_counts();
        self.counts
            .iter()
            .all(|(&letter, spec)| spec.accepts(word_counts[letter_index(letter)]))
    }

    pub fn positions(&self) -> &[PositionFilter; WORD_LENGTH] {
        &self.positions
    }

    pub fn count_specs(&self) -> &BTreeMap<u8, CountSpec> {
        &self.counts
    }

    pub fn is_satisfiable(&self) -> bool {
        self.satisfiable
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.satisfiable {
            return write!(f, "<unsatisfiable>");
        }
        for filter in &self.positions {
            match filter {
                PositionFilter::Any => write!(f, ".")?,
                PositionFilter::Equals(letter) => write!(f, "{}", *letter as char)?,
                PositionFilter::NoneOf(set) => write!(f, "[^{set}]")?,
            }
        }
        for (&letter, spec) in &self.counts {
            match spec {
                CountSpec::AtLeast(n) => write!(f, " {}>={n}", letter as char)?,
                CountSpec::Exactly(n) => write!(f, " {}={n}", letter as char)?,
            }
        }
        Ok(())
    }
}

/// Compile an ordered clue history.
pub fn compile(clues: &[Clue]) -> ConstraintSet {
    clues
        .iter()
        .fold(ConstraintSet::unconstrained(), |acc, clue| {
            acc.merge(&ConstraintSet::from_clue(clue))
        })
}

/// Decode a concatenated history key and compile it.
pub fn compile_history(history: &str) -> Result<ConstraintSet, SolverError> {
    let clues = Clue::parse_history(history)?;
    Ok(compile(&clues))
}

/// Words from `words` consistent with `constraints`, in input order.
pub fn filter(words: &[Word], constraints: &ConstraintSet) -> Vec<Word> {
    words
        .iter()
        .copied()
        .filter(|word| constraints.matches(word))
        .collect()
}

/// Compiled histories keyed by their concatenated encoding.
#[derive(Debug, Default)]
pub struct ConstraintCache {
    compiled: HashMap<String, Arc<ConstraintSet>>,
}

impl ConstraintCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(&mut self, clues: &[Clue]) -> Arc<ConstraintSet> {
        self.compiled
            .entry(history_key(clues))
            .or_insert_with(|| Arc::new(compile(clues)))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }

    pub fn clear(&mut self) {
        self.compiled.clear();
    }
}

/// Single-clue constraint sets owned by one search worker.
#[derive(Debug, Default)]
pub struct ClueCache {
    compiled: HashMap<Clue, ConstraintSet>,
}

impl ClueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(&mut self, clue: &Clue) -> &ConstraintSet {
        self.compiled
            .entry(*clue)
            .or_insert_with(|| ConstraintSet::from_clue(clue))
    }

    pub fn clear(&mut self) {
        self.compiled.clear();
    }
}
