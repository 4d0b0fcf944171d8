use std::fmt;

/// Point-in-time view of a running pivot loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    /// Steps taken in the current invocation
    pub step: u64,
    /// Objective value `tableau[0][0]`
    pub objective: f64,
    /// Artificial variables still present
    pub n_artificial: usize,
    /// Worker threads participating; always 0 for the single-threaded kernel
    pub workers: usize,
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iter {:8}  objf={:.8e}  Z={}  [nthreads={}]",
            self.step, self.objective, self.n_artificial, self.workers
        )
    }
}

/// Receives progress snapshots from the pivot loop.
pub trait ProgressObserver {
    fn observe(&mut self, snapshot: &ProgressSnapshot);
}

impl<F: FnMut(&ProgressSnapshot)> ProgressObserver for F {
    fn observe(&mut self, snapshot: &ProgressSnapshot) {
        self(snapshot)
    }
}

/// Discards every snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn observe(&mut self, _snapshot: &ProgressSnapshot) {}
}

/// Writes each snapshot to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn observe(&mut self, snapshot: &ProgressSnapshot) {
        log::info!("{snapshot}");
    }
}
