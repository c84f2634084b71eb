//! Fixed-length uppercase words and small letter sets.

use std::fmt;
use std::str::FromStr;

use crate::errors::SolverError;
use crate::WORD_LENGTH;

/// Number of letters in the alphabet.
pub const ALPHABET_SIZE: usize = 26;

/// A five-letter word of uppercase ASCII letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Word([u8; WORD_LENGTH]);

impl Word {
    /// Letter bytes (`b'A'..=b'Z'`).
    pub fn letters(&self) -> &[u8; WORD_LENGTH] {
        &self.0
    }

    pub fn letter(&self, position: usize) -> u8 {
        self.0[position]
    }

    /// Occurrence count per letter, indexed by `letter - b'A'`.
    pub fn letter_counts(&self) -> [u8; ALPHABET_SIZE] {
        let mut counts = [0u8; ALPHABET_SIZE];
        for &letter in &self.0 {
            counts[letter_index(letter)] += 1;
        }
        counts
    }

    pub fn count(&self, letter: u8) -> u8 {
        self.0.iter().filter(|&&l| l == letter).count() as u8
    }
}

impl FromStr for Word {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bytes = trimmed.as_bytes();
        if bytes.len() != WORD_LENGTH {
            return Err(SolverError::invalid_word(
                trimmed,
                format!("expected {WORD_LENGTH} letters, found {}", trimmed.chars().count()),
            ));
        }
        let mut letters = [0u8; WORD_LENGTH];
        for (slot, &b) in letters.iter_mut().zip(bytes) {
            if !b.is_ascii_alphabetic() {
                return Err(SolverError::invalid_word(
                    trimmed,
                    format!("'{}' is not a letter A-Z", b as char),
                ));
            }
            *slot = b.to_ascii_uppercase();
        }
        Ok(Word(letters))
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &letter in &self.0 {
            write!(f, "{}", letter as char)?;
        }
        Ok(())
    }
}

#[inline]
pub(crate) fn letter_index(letter: u8) -> usize {
    (letter - b'A') as usize
}

/// A set of letters packed into the low 26 bits of a `u32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LetterSet(u32);

impl LetterSet {
    pub const EMPTY: Self = Self(0);

    pub fn insert(&mut self, letter: u8) {
        self.0 |= 1 << letter_index(letter);
    }

    pub fn contains(self, letter: u8) -> bool {
        self.0 & (1 << letter_index(letter)) != 0
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in alphabetical order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..ALPHABET_SIZE as u8)
            .filter(move |i| self.0 & (1 << i) != 0)
            .map(|i| b'A' + i)
    }
}

impl fmt::Display for LetterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for letter in self.iter() {
            write!(f, "{}", letter as char)?;
        }
        Ok(())
    }
}
