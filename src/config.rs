//! Solver settings.

use std::num::NonZeroUsize;
use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Tunables shared by the library and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Number of search workers (threads in the search pool).
    pub workers: usize,
    /// How many ranked guesses to announce each round.
    pub top_n: usize,
    /// Seed for every random choice; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            workers: default_worker_count(),
            top_n: 5,
            seed: None,
        }
    }
}

impl SolverConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Available hardware parallelism, or 1 when it cannot be queried.
pub fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
