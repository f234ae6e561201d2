use log::trace;

/// Which iteration loop produced a [`Sweep`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A sweep of the Bellman expectation backup for a fixed policy
    PolicyEvaluation,
    /// One improve-then-evaluate round of policy iteration
    PolicyIteration,
    /// A sweep of the Bellman optimality backup
    ValueIteration,
}

/// Progress report handed to a [`SweepObserver`] after each sweep or round
#[derive(Debug, Clone, Copy)]
pub struct Sweep<'a> {
    pub phase: Phase,
    /// 1-based sweep (or round) index within the current loop
    pub index: usize,
    /// Sup-norm gap between this sweep's values and the previous sweep's
    pub gap: f64,
    /// Values produced by this sweep
    pub values: &'a [f64],
}

/// Hook for watching the planners converge without putting I/O in the algorithms
pub trait SweepObserver {
    fn on_sweep(&mut self, sweep: &Sweep);
}

impl<F: FnMut(&Sweep)> SweepObserver for F {
    fn on_sweep(&mut self, sweep: &Sweep) {
        self(sweep)
    }
}

/// Ignores all progress
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SweepObserver for Silent {
    fn on_sweep(&mut self, _sweep: &Sweep) {}
}

/// Logs every sweep at `trace` level through the [`log`] facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl SweepObserver for LogObserver {
    fn on_sweep(&mut self, sweep: &Sweep) {
        trace!(
            "{:?} sweep {}: gap = {:.3e}, values = {:.3?}",
            sweep.phase,
            sweep.index,
            sweep.gap,
            sweep.values
        );
    }
}
