//! Parallel two-phase search for the guesses with the lowest partition score.
//!
//! Phase 1 scores every current candidate as a guess. Unless its best score
//! is already at most the candidate count (no guess can do better), phase 2
//! scores the rest of the guess vocabulary, pruning against the phase 1 best.
//!
//! Each phase splits its index range with [`distribute`] and hands one range
//! to each worker of a fixed pool. Workers own their clue caches and never
//! share mutable state; the orchestrator waits for every worker before
//! merging, and a worker that fails or panics fails the whole round.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

use crate::constraints::ClueCache;
use crate::distribute::{distribute, WorkRange};
use crate::errors::SolverError;
use crate::scorer::score_guess;
use crate::word::Word;

/// A guess tied for the best score, with its partition statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuessEvaluation {
    pub guess: Word,
    pub score: u64,
    pub groups: usize,
}

impl GuessEvaluation {
    /// Expected number of candidates left after making this guess.
    pub fn average_remaining(&self, candidate_count: usize) -> f64 {
        if candidate_count == 0 {
            return 0.0;
        }
        self.score as f64 / candidate_count as f64
    }
}

/// A [`GuessEvaluation`] in presentation order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedGuess {
    pub guess: Word,
    pub score: u64,
    pub groups: usize,
    pub average_remaining: f64,
    /// The guess is itself one of the current candidates.
    pub is_candidate: bool,
}

/// Which list a phase draws its guesses from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Candidates,
    Vocabulary,
}

/// Result of one search round.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub best_score: Option<u64>,
    /// Every guess scoring `best_score`.
    pub evaluations: Vec<GuessEvaluation>,
    pub vocabulary_searched: bool,
}

impl SearchOutcome {
    fn absorb(&mut self, best: u64, evaluations: Vec<GuessEvaluation>) {
        if evaluations.is_empty() {
            return;
        }
        match self.best_score {
            Some(current) if best > current => {}
            Some(current) if best == current => self.evaluations.extend(evaluations),
            _ => {
                self.best_score = Some(best);
                self.evaluations = evaluations;
            }
        }
    }
}

struct Task<'a> {
    phase: SearchPhase,
    range: WorkRange,
    threshold: u64,
    candidates: &'a [Word],
    candidate_set: &'a HashSet<Word>,
}

#[derive(Debug)]
struct WorkerReport {
    best: u64,
    evaluations: Vec<GuessEvaluation>,
    scored: usize,
    pruned: usize,
}

#[derive(Debug)]
struct Worker {
    id: usize,
    guesses: Arc<[Word]>,
    cache: ClueCache,
    #[cfg(test)]
    fault: Option<tests::Fault>,
}

impl Worker {
    fn begin_round(&mut self) {
        self.cache.clear();
    }

    fn run(&mut self, task: &Task<'_>) -> Result<WorkerReport, SolverError> {
        #[cfg(test)]
        if let Some(fault) = self.fault {
            fault.trigger()?;
        }

        let mut report = WorkerReport {
            best: task.threshold,
            evaluations: Vec::new(),
            scored: 0,
            pruned: 0,
        };

        match task.phase {
            SearchPhase::Candidates => {
                for guess in &task.candidates[task.range.as_range()] {
                    self.test_guess(guess, task.candidates, &mut report)?;
                }
            }
            SearchPhase::Vocabulary => {
                let guesses = Arc::clone(&self.guesses);
                for guess in &guesses[task.range.as_range()] {
                    if task.candidate_set.contains(guess) {
                        continue;
                    }
                    self.test_guess(guess, task.candidates, &mut report)?;
                }
            }
        }

        debug!(
            "worker {} {:?} {}..{}: scored {}, pruned {}, {} at best",
            self.id,
            task.phase,
            task.range.start,
            task.range.end,
            report.scored,
            report.pruned,
            report.evaluations.len()
        );
        Ok(report)
    }

    /// Keeps the guess if it ties or beats this worker's best so far.
    fn test_guess(
        &mut self,
        guess: &Word,
        candidates: &[Word],
        report: &mut WorkerReport,
    ) -> Result<(), SolverError> {
        let Some(stats) = score_guess(candidates, guess, report.best, &mut self.cache)? else {
            report.pruned += 1;
            return Ok(());
        };
        report.scored += 1;
        if stats.score < report.best {
            report.evaluations.clear();
            report.best = stats.score;
        }
        if stats.score == report.best {
            report.evaluations.push(GuessEvaluation {
                guess: *guess,
                score: stats.score,
                groups: stats.groups,
            });
        }
        Ok(())
    }
}

/// A fixed pool of search workers, each initialised once with the guess
/// vocabulary.
pub struct SearchPool {
    pool: rayon::ThreadPool,
    workers: Vec<Worker>,
    guesses: Arc<[Word]>,
}

impl SearchPool {
    pub fn new(guesses: &[Word], worker_count: usize) -> Result<Self, SolverError> {
        let worker_count = worker_count.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("search-{i}"))
            .build()?;
        let guesses: Arc<[Word]> = Arc::from(guesses);
        let workers = (0..worker_count)
            .map(|id| Worker {
                id,
                guesses: Arc::clone(&guesses),
                cache: ClueCache::new(),
                #[cfg(test)]
                fault: None,
            })
            .collect();
        debug!("search pool ready: {worker_count} workers, {} guesses", guesses.len());
        Ok(Self {
            pool,
            workers,
            guesses,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    /// Find every guess tied for the lowest partition score over `candidates`.
    pub fn evaluate_guesses(&mut self, candidates: &[Word]) -> Result<SearchOutcome, SolverError> {
        let mut outcome = SearchOutcome::default();
        if candidates.is_empty() {
            return Ok(outcome);
        }

        let start = Instant::now();
        for worker in &mut self.workers {
            worker.begin_round();
        }
        let candidate_set: HashSet<Word> = candidates.iter().copied().collect();

        self.run_phase(
            SearchPhase::Candidates,
            candidates,
            &candidate_set,
            u64::MAX,
            &mut outcome,
        )?;

        // A perfect split scores the candidate count, so nothing outside the
        // candidates can beat a phase 1 best at or below it.
        let threshold = outcome.best_score.unwrap_or(u64::MAX);
        if threshold > candidates.len() as u64 {
            outcome.vocabulary_searched = true;
            self.run_phase(
                SearchPhase::Vocabulary,
                candidates,
                &candidate_set,
                threshold,
                &mut outcome,
            )?;
        }

        debug!(
            "search over {} candidates: best {:?}, {} tied, vocabulary searched: {}, {:.2?}",
            candidates.len(),
            outcome.best_score,
            outcome.evaluations.len(),
            outcome.vocabulary_searched,
            start.elapsed()
        );
        Ok(outcome)
    }

    fn run_phase(
        &mut self,
        phase: SearchPhase,
        candidates: &[Word],
        candidate_set: &HashSet<Word>,
        threshold: u64,
        outcome: &mut SearchOutcome,
    ) -> Result<(), SolverError> {
        let len = match phase {
            SearchPhase::Candidates => candidates.len(),
            SearchPhase::Vocabulary => self.guesses.len(),
        };
        let tasks: Vec<Task<'_>> = distribute(0, len, self.workers.len())
            .into_iter()
            .map(|range| Task {
                phase,
                range,
                threshold,
                candidates,
                candidate_set,
            })
            .collect();

        let workers = &mut self.workers;
        let reports: Vec<(usize, Result<WorkerReport, SolverError>)> = self.pool.install(|| {
            workers
                .par_iter_mut()
                .zip(tasks.par_iter())
                .map(|(worker, task)| {
                    let id = worker.id;
                    let result = panic::catch_unwind(AssertUnwindSafe(|| worker.run(task)))
                        .unwrap_or_else(|payload| {
                            Err(SolverError::SearchIncomplete {
                                worker: id,
                                reason: panic_message(payload.as_ref()),
                            })
                        });
                    (id, result)
                })
                .collect()
        });

        if reports.len() != tasks.len() {
            return Err(SolverError::SearchIncomplete {
                worker: reports.len(),
                reason: format!("{} of {} ranges reported", reports.len(), tasks.len()),
            });
        }

        for (id, result) in reports {
            let report = result.map_err(|err| match err {
                incomplete @ SolverError::SearchIncomplete { .. } => incomplete,
                other => SolverError::SearchIncomplete {
                    worker: id,
                    reason: other.to_string(),
                },
            })?;
            outcome.absorb(report.best, report.evaluations);
        }
        Ok(())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Order tied guesses for presentation: candidates first, then more groups,
/// with remaining ties in random order.
pub fn rank_guesses<R: Rng + ?Sized>(
    evaluations: &[GuessEvaluation],
    candidates: &[Word],
    rng: &mut R,
) -> Vec<RankedGuess> {
    let candidate_set: HashSet<&Word> = candidates.iter().collect();
    let mut ranked: Vec<RankedGuess> = evaluations
        .iter()
        .map(|eval| RankedGuess {
            guess: eval.guess,
            score: eval.score,
            groups: eval.groups,
            average_remaining: eval.average_remaining(candidates.len()),
            is_candidate: candidate_set.contains(&eval.guess),
        })
        .collect();
    ranked.shuffle(rng);
    ranked.sort_by(|a, b| {
        b.is_candidate
            .cmp(&a.is_candidate)
            .then_with(|| b.groups.cmp(&a.groups))
    });
    ranked
}
