//! Splitting an index range across workers.

use std::ops::Range;

/// Half-open index interval `[start, end)` handed to one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkRange {
    pub start: usize,
    pub end: usize,
}

impl WorkRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `[start, end)` into at most `worker_count` contiguous ranges.
///
/// With no more items than workers every item gets its own range. Otherwise
/// each range holds `len / worker_count` items and the first
/// `len % worker_count` ranges hold one more.
pub fn distribute(start: usize, end: usize, worker_count: usize) -> Vec<WorkRange> {
    let len = end.saturating_sub(start);
    let worker_count = worker_count.max(1);

    if len <= worker_count {
        return (start..start + len)
            .map(|i| WorkRange::new(i, i + 1))
            .collect();
    }

    let per_worker = len / worker_count;
    let remainder = len % worker_count;
    let mut ranges = Vec::with_capacity(worker_count);
    let mut next = start;
    for worker in 0..worker_count {
        let size = if worker < remainder { per_worker + 1 } else { per_worker };
        ranges.push(WorkRange::new(next, next + size));
        next += size;
    }
    debug_assert_eq!(next, end);
    ranges
}
