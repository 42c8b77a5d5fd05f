//! Progress reporting for long-running operations.
//!
//! Split reports once per page, merge once per input document. Any
//! `FnMut(usize, usize)` closure is a reporter, so callers usually just pass
//! a closure.

use serde::Serialize;

/// Receives `(current, total)` after each unit of work.
pub trait ProgressReporter {
    /// Called with the number of finished units and the total.
    fn report(&mut self, current: usize, total: usize);
}

impl<F> ProgressReporter for F
where
    F: FnMut(usize, usize),
{
    fn report(&mut self, current: usize, total: usize) {
        self(current, total)
    }
}

/// Reporter that ignores every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&mut self, _current: usize, _total: usize) {}
}

/// Snapshot of an operation's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ProgressState {
    /// Finished units.
    pub current: usize,
    /// Total units.
    pub total: usize,
}

impl ProgressState {
    /// Whether every unit has finished.
    pub fn is_complete(&self) -> bool {
        self.current == self.total
    }

    /// Finished share in `0.0..=1.0`. An empty operation counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// Counts finished units and forwards each step to a reporter.
pub(crate) struct ProgressTracker<'a, P: ProgressReporter + ?Sized> {
    reporter: &'a mut P,
    state: ProgressState,
}

impl<'a, P: ProgressReporter + ?Sized> ProgressTracker<'a, P> {
    pub(crate) fn new(reporter: &'a mut P, total: usize) -> Self {
        Self {
            reporter,
            state: ProgressState { current: 0, total },
        }
    }

    /// Mark one more unit finished.
    pub(crate) fn advance(&mut self) {
        debug_assert!(self.state.current < self.state.total);
        self.state.current += 1;
        self.reporter.report(self.state.current, self.state.total);
    }
}
