//! The game loop: pick a guess, read its clue, narrow the candidates, repeat.
//!
//! The first guess comes from a short list of strong openings, drawn with a
//! triangular weighting toward the top of the list. Later guesses come from
//! the parallel partition search, except that with two or fewer candidates
//! left one of them is guessed at random.
//!
//! Guesses are chosen with the same ranking used for display (see
//! [`rank_guesses`]): the chosen guess is always the first ranked entry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::SolverConfig;
use crate::constraints::{filter, ConstraintCache};
use crate::errors::SolverError;
use crate::feedback::{history_key, Clue};
use crate::search::{rank_guesses, RankedGuess, SearchPool};
use crate::vocabulary::Vocabulary;
use crate::word::Word;

/// Strong opening guesses, best first.
pub const FIRST_GUESSES: [&str; 47] = [
    "RAISE", "ROATE", "RAILE", "SALET", "REAST", "SOARE", "SLATE", "CRATE", "TRACE", "ORATE",
    "CARTE", "TALER", "IRATE", "CARLE", "RAINE", "RATEL", "ARISE", "CARET", "ARIEL", "ARTEL",
    "LATER", "TASER", "SAINE", "SANER", "EARST", "CARSE", "STALE", "STARE", "SNARE", "AROSE",
    "ALTER", "ALERT", "ANTRE", "OATER", "SLANE", "TARES", "RESAT", "CRANE", "LEAST", "TORSE",
    "SERAL", "LATEN", "STRAE", "REACT", "PAIRE", "LIANE", "CATER",
];

/// Draw an opening, weighting the k-th entry (1-indexed) of `openings` by
/// `n - k + 1`.
pub fn pick_first_guess<R: Rng + ?Sized>(openings: &[Word], rng: &mut R) -> Option<Word> {
    let n = openings.len();
    if n == 0 {
        return None;
    }
    let total = n * (n + 1) / 2;
    let r = rng.gen_range(0..total);
    let mut cumulative = 0;
    for (i, opening) in openings.iter().enumerate() {
        cumulative += n - i;
        if cumulative > r {
            return Some(*opening);
        }
    }
    openings.first().copied()
}

/// Points at which the game loop reports progress.
#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent<'a> {
    FirstGuess { guess: Word },
    Candidates { candidates: &'a [Word] },
    /// The first `shown.len()` of `total` tied guesses, in ranked order.
    TopGuesses { shown: &'a [RankedGuess], total: usize },
    Guessed { round: usize, clue: &'a Clue },
    Solved { guesses: usize, elapsed: Duration },
}

/// Receiver of progress events.
pub trait ProgressSink {
    fn report(&mut self, event: ProgressEvent<'_>);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressEvent<'_>),
{
    fn report(&mut self, event: ProgressEvent<'_>) {
        self(event)
    }
}

/// Writes progress through the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn report(&mut self, event: ProgressEvent<'_>) {
        match event {
            ProgressEvent::FirstGuess { guess } => info!("Here's a good first guess: {guess}"),
            ProgressEvent::Candidates { candidates } => {
                const LISTED: usize = 50;
                let mut listed: Vec<String> =
                    candidates.iter().take(LISTED).map(Word::to_string).collect();
                if candidates.len() > LISTED {
                    listed.push("...".to_string());
                }
                info!("Possible answers ({}): {}", candidates.len(), listed.join(", "));
            }
            ProgressEvent::TopGuesses { shown, total } => {
                info!("Best next guesses:");
                for ranked in shown {
                    info!(
                        "{} - {:.2} avg answers left, {} groups{}",
                        ranked.guess,
                        ranked.average_remaining,
                        ranked.groups,
                        if ranked.is_candidate { " (possible answer)" } else { "" }
                    );
                }
                if total > shown.len() {
                    info!("... ({} more tied)", total - shown.len());
                }
            }
            ProgressEvent::Guessed { round, clue } => {
                info!("guess {round}: {} => {clue} {}", clue.guess(), clue.to_emoji_string());
            }
            ProgressEvent::Solved { guesses, elapsed } => info!(
                "done in {guesses} {}, {:.0?}",
                if guesses == 1 { "guess" } else { "guesses" },
                elapsed
            ),
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn report(&mut self, _event: ProgressEvent<'_>) {}
}

/// The next guess for a clue history, with the evidence behind it.
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub guess: Word,
    pub candidates: Arc<Vec<Word>>,
    /// Every guess tied for the best score, in ranked order. Empty when the
    /// guess was not searched for (opening, or two or fewer candidates).
    pub ranked: Vec<RankedGuess>,
}

/// Where a game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    AwaitingFirstGuess,
    Narrowing,
    Solved,
}

/// One game against a known hidden solution.
#[derive(Debug, Clone)]
pub struct Game {
    hidden: Word,
    opening: Option<Word>,
    clues: Vec<Clue>,
    state: GameState,
}

impl Game {
    /// Fails with [`SolverError::InvalidWord`] unless `hidden` is a solution.
    pub fn new(hidden: Word, vocabulary: &Vocabulary) -> Result<Self, SolverError> {
        if !vocabulary.is_solution(&hidden) {
            return Err(SolverError::invalid_word(
                hidden.to_string(),
                "not in the solution list",
            ));
        }
        Ok(Self {
            hidden,
            opening: None,
            clues: Vec::new(),
            state: GameState::AwaitingFirstGuess,
        })
    }

    /// Use `opening` instead of a random first guess. Fails with
    /// [`SolverError::InvalidWord`] unless `opening` is in the guess list.
    pub fn with_opening(
        mut self,
        opening: Word,
        vocabulary: &Vocabulary,
    ) -> Result<Self, SolverError> {
        if !vocabulary.is_guess(&opening) {
            return Err(SolverError::invalid_word(
                opening.to_string(),
                "not in the guess list",
            ));
        }
        self.opening = Some(opening);
        Ok(self)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    pub fn guess_count(&self) -> usize {
        self.clues.len()
    }

    /// Make one guess and advance the state.
    pub fn step(
        &mut self,
        solver: &mut WordleSolver,
        sink: &mut dyn ProgressSink,
    ) -> Result<GameState, SolverError> {
        let guess = match self.state {
            GameState::Solved => return Ok(GameState::Solved),
            GameState::AwaitingFirstGuess => match self.opening {
                Some(opening) => {
                    sink.report(ProgressEvent::FirstGuess { guess: opening });
                    opening
                }
                None => solver.suggest(&[], sink)?.guess,
            },
            GameState::Narrowing => solver.suggest(&self.clues, sink)?.guess,
        };

        let clue = Clue::compute(&self.hidden, &guess);
        self.clues.push(clue);
        sink.report(ProgressEvent::Guessed {
            round: self.clues.len(),
            clue: &clue,
        });

        self.state = if guess == self.hidden {
            GameState::Solved
        } else {
            GameState::Narrowing
        };
        Ok(self.state)
    }
}

/// Solver state shared across games: vocabulary, search workers and caches.
pub struct WordleSolver {
    vocabulary: Vocabulary,
    config: SolverConfig,
    pool: SearchPool,
    openings: Vec<Word>,
    constraints: ConstraintCache,
    candidates: HashMap<String, Arc<Vec<Word>>>,
    rng: StdRng,
}

impl WordleSolver {
    pub fn new(vocabulary: Vocabulary, config: SolverConfig) -> Result<Self, SolverError> {
        let pool = SearchPool::new(vocabulary.guesses(), config.workers)?;
        let openings: Vec<Word> = FIRST_GUESSES
            .iter()
            .filter_map(|s| s.parse::<Word>().ok())
            .filter(|word| vocabulary.is_guess(word))
            .collect();
        if openings.len() < FIRST_GUESSES.len() {
            warn!(
                "{} of {} openings are not in the guess list",
                FIRST_GUESSES.len() - openings.len(),
                FIRST_GUESSES.len()
            );
        }
        let rng = config.rng();
        Ok(Self {
            vocabulary,
            config,
            pool,
            openings,
            constraints: ConstraintCache::new(),
            candidates: HashMap::new(),
            rng,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn openings(&self) -> &[Word] {
        &self.openings
    }

    /// Solutions consistent with every clue in `clues`.
    ///
    /// Each history is filtered from the memoized survivors of its prefix,
    /// using the constraint set of the whole history.
    pub fn candidates_for(&mut self, clues: &[Clue]) -> Arc<Vec<Word>> {
        let mut current = self
            .candidates
            .entry(String::new())
            .or_insert_with(|| Arc::new(self.vocabulary.solutions().to_vec()))
            .clone();
        for end in 1..=clues.len() {
            let prefix = &clues[..end];
            let key = history_key(prefix);
            if let Some(cached) = self.candidates.get(&key) {
                current = Arc::clone(cached);
                continue;
            }
            let constraints = self.constraints.get_or_compile(prefix);
            debug!("constraints for {key}: {constraints}");
            let narrowed = Arc::new(filter(&current, &constraints));
            self.candidates.insert(key, Arc::clone(&narrowed));
            current = narrowed;
        }
        current
    }

    /// Pick the next guess for `clues`, reporting candidates and ranked
    /// guesses to `sink`.
    pub fn suggest(
        &mut self,
        clues: &[Clue],
        sink: &mut dyn ProgressSink,
    ) -> Result<Suggestion, SolverError> {
        let candidates = self.candidates_for(clues);

        if clues.is_empty() {
            if let Some(guess) = pick_first_guess(&self.openings, &mut self.rng) {
                sink.report(ProgressEvent::FirstGuess { guess });
                return Ok(Suggestion {
                    guess,
                    candidates,
                    ranked: Vec::new(),
                });
            }
        } else {
            sink.report(ProgressEvent::Candidates {
                candidates: &candidates,
            });
        }

        if candidates.len() <= 2 {
            let guess = *candidates.choose(&mut self.rng).ok_or_else(|| {
                SolverError::NoCandidates {
                    history: history_key(clues),
                }
            })?;
            return Ok(Suggestion {
                guess,
                candidates,
                ranked: Vec::new(),
            });
        }

        let outcome = self.pool.evaluate_guesses(&candidates)?;
        let ranked = rank_guesses(&outcome.evaluations, &candidates, &mut self.rng);
        let shown = ranked.len().min(self.config.top_n);
        sink.report(ProgressEvent::TopGuesses {
            shown: &ranked[..shown],
            total: ranked.len(),
        });

        let guess = ranked
            .first()
            .map(|best| best.guess)
            .ok_or_else(|| SolverError::NoCandidates {
                history: history_key(clues),
            })?;
        if clues.is_empty() {
            sink.report(ProgressEvent::FirstGuess { guess });
        }
        Ok(Suggestion {
            guess,
            candidates,
            ranked,
        })
    }

    /// Play a game against `hidden` and return the number of guesses taken.
    pub fn play_one_game(
        &mut self,
        hidden: &Word,
        sink: &mut dyn ProgressSink,
    ) -> Result<usize, SolverError> {
        let game = Game::new(*hidden, &self.vocabulary)?;
        Ok(self.play(game, sink)?.guess_count())
    }

    /// Play a game starting with a fixed `opening`.
    pub fn play_with_opening(
        &mut self,
        hidden: &Word,
        opening: Word,
        sink: &mut dyn ProgressSink,
    ) -> Result<Game, SolverError> {
        let game = Game::new(*hidden, &self.vocabulary)?.with_opening(opening, &self.vocabulary)?;
        self.play(game, sink)
    }

    /// Run `game` to completion.
    pub fn play(&mut self, mut game: Game, sink: &mut dyn ProgressSink) -> Result<Game, SolverError> {
        let start = Instant::now();
        while game.step(self, sink)? != GameState::Solved {}
        sink.report(ProgressEvent::Solved {
            guesses: game.guess_count(),
            elapsed: start.elapsed(),
        });
        Ok(game)
    }

    /// Play every solution (or the first `limit`) and return
    /// `(guesses, games)` pairs for each guess count that occurred.
    ///
    /// Memoized constraint and candidate sets are dropped after each game.
    pub fn benchmark_guess_distribution(
        &mut self,
        limit: Option<usize>,
    ) -> Result<Vec<(usize, usize)>, SolverError> {
        let targets: Vec<Word> = self
            .vocabulary
            .solutions()
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .copied()
            .collect();

        let mut distribution: Vec<usize> = Vec::new();
        for target in &targets {
            let guesses = self.play_one_game(target, &mut NullSink)?;
            self.clear_caches();
            if distribution.len() <= guesses {
                distribution.resize(guesses + 1, 0);
            }
            distribution[guesses] += 1;
        }

        Ok(distribution
            .into_iter()
            .enumerate()
            .filter(|(_, count)| *count > 0)
            .collect())
    }

    /// Number of clue histories with memoized candidates.
    pub fn memoized_histories(&self) -> usize {
        self.candidates.len()
    }

    /// Drop memoized constraint sets and candidate sets.
    pub fn clear_caches(&mut self) {
        self.constraints.clear();
        self.candidates.clear();
    }
}
