//! Clue calculation for guesses.
//!
//! This module computes the per-position outcome (hit/present/miss) of a
//! guess against a solution, and converts clues to and from the compact
//! ten-character form `O?R+A-T-E-`.

use std::fmt;
use std::str::FromStr;

use crate::errors::SolverError;
use crate::word::{letter_index, Word, ALPHABET_SIZE};
use crate::WORD_LENGTH;

/// Outcome for a single letter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Correct letter in correct position
    Hit,
    /// Letter occurs elsewhere in the solution
    Present,
    /// Letter not in the solution (or every occurrence already accounted for)
    Miss,
}

impl Outcome {
    /// Marker used in the encoded clue form.
    pub fn marker(self) -> char {
        match self {
            Outcome::Hit => '+',
            Outcome::Present => '?',
            Outcome::Miss => '-',
        }
    }

    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            '+' => Some(Outcome::Hit),
            '?' => Some(Outcome::Present),
            '-' => Some(Outcome::Miss),
            _ => None,
        }
    }

    /// Convert to a character for display
    pub fn to_emoji(self) -> char {
        match self {
            Outcome::Hit => '🟩',
            Outcome::Present => '🟨',
            Outcome::Miss => '⬛',
        }
    }
}

/// The five outcomes of a clue packed into a single byte (0-242).
/// Each position is 0 (miss), 1 (present) or 2 (hit).
/// Pattern = p0 + 3*p1 + 9*p2 + 27*p3 + 81*p4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pattern(pub u8);

impl Pattern {
    /// The pattern indicating all hits (solved)
    pub const ALL_HIT: Self = Self(2 + 2 * 3 + 2 * 9 + 2 * 27 + 2 * 81);

    /// Total number of possible patterns (3^5)
    pub const COUNT: usize = 243;

    pub fn new(outcomes: [Outcome; WORD_LENGTH]) -> Self {
        let mut pattern: u8 = 0;
        let mut multiplier: u8 = 1;
        for outcome in outcomes {
            let value = match outcome {
                Outcome::Miss => 0,
                Outcome::Present => 1,
                Outcome::Hit => 2,
            };
            pattern += value * multiplier;
            multiplier *= 3;
        }
        Self(pattern)
    }

    pub fn outcomes(self) -> [Outcome; WORD_LENGTH] {
        let mut pattern = self.0;
        let mut outcomes = [Outcome::Miss; WORD_LENGTH];
        for outcome in outcomes.iter_mut() {
            *outcome = match pattern % 3 {
                0 => Outcome::Miss,
                1 => Outcome::Present,
                _ => Outcome::Hit,
            };
            pattern /= 3;
        }
        outcomes
    }

    pub fn is_solved(self) -> bool {
        self == Self::ALL_HIT
    }
}

/// A guess together with the outcome at each of its positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Clue {
    guess: Word,
    pattern: Pattern,
}

impl Clue {
    pub fn new(guess: Word, pattern: Pattern) -> Self {
        Self { guess, pattern }
    }

    /// Calculate the clue a guess receives against a solution.
    ///
    /// Hits are marked in a first pass and consume their letter before any
    /// present/miss decision is made, so a guess repeating a letter the
    /// solution holds once gets exactly one non-miss for it.
    pub fn compute(solution: &Word, guess: &Word) -> Self {
        let solution_letters = solution.letters();
        let guess_letters = guess.letters();

        let mut outcomes = [Outcome::Miss; WORD_LENGTH];
        let mut remaining = [0u8; ALPHABET_SIZE];

        for i in 0..WORD_LENGTH {
            if guess_letters[i] == solution_letters[i] {
                outcomes[i] = Outcome::Hit;
            } else {
                remaining[letter_index(solution_letters[i])] += 1;
            }
        }

        for i in 0..WORD_LENGTH {
            if outcomes[i] != Outcome::Hit {
                let idx = letter_index(guess_letters[i]);
                if remaining[idx] > 0 {
                    outcomes[i] = Outcome::Present;
                    remaining[idx] -= 1;
                }
            }
        }

        Self::new(*guess, Pattern::new(outcomes))
    }

    pub fn guess(&self) -> Word {
        self.guess
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn outcomes(&self) -> [Outcome; WORD_LENGTH] {
        self.pattern.outcomes()
    }

    /// `(letter, outcome)` per position, left to right.
    pub fn cells(&self) -> impl Iterator<Item = (u8, Outcome)> + '_ {
        self.guess
            .letters()
            .iter()
            .copied()
            .zip(self.pattern.outcomes())
    }

    pub fn is_solved(&self) -> bool {
        self.pattern.is_solved()
    }

    /// Split a concatenated history key such as `O?R+A-T-E-S-L?I-C-K+`.
    pub fn parse_history(history: &str) -> Result<Vec<Clue>, SolverError> {
        let history = history.trim();
        let chars: Vec<char> = history.chars().collect();
        if chars.len() % (2 * WORD_LENGTH) != 0 {
            return Err(SolverError::invalid_clue(
                history,
                format!("length {} is not a multiple of {}", chars.len(), 2 * WORD_LENGTH),
            ));
        }
        chars
            .chunks(2 * WORD_LENGTH)
            .map(|chunk| chunk.iter().collect::<String>().parse())
            .collect()
    }

    /// Display as emoji string
    pub fn to_emoji_string(&self) -> String {
        self.outcomes().iter().map(|o| o.to_emoji()).collect()
    }
}

impl FromStr for Clue {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 * WORD_LENGTH {
            return Err(SolverError::invalid_clue(
                s,
                format!("expected {} characters, found {}", 2 * WORD_LENGTH, chars.len()),
            ));
        }

        let mut letters = String::with_capacity(WORD_LENGTH);
        let mut outcomes = [Outcome::Miss; WORD_LENGTH];
        for (i, pair) in chars.chunks(2).enumerate() {
            let (letter, marker) = (pair[0], pair[1]);
            if !letter.is_ascii_alphabetic() {
                return Err(SolverError::invalid_clue(
                    s,
                    format!("'{letter}' at position {} is not a letter", i + 1),
                ));
            }
            letters.push(letter);
            outcomes[i] = Outcome::from_marker(marker).ok_or_else(|| {
                SolverError::invalid_clue(s, format!("unknown outcome marker '{marker}' after '{letter}'"))
            })?;
        }

        let guess: Word = letters.parse()?;
        Ok(Self::new(guess, Pattern::new(outcomes)))
    }
}

impl fmt::Display for Clue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (letter, outcome) in self.cells() {
            write!(f, "{}{}", letter as char, outcome.marker())?;
        }
        Ok(())
    }
}

/// Concatenated encoding of a clue history, used as a cache key.
pub fn history_key(clues: &[Clue]) -> String {
    clues.iter().map(Clue::to_string).collect()
}
