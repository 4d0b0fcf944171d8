//! Cross-thread progress sharing.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::observer::ProgressSnapshot;
use crate::error::{SamplexError, SamplexResult};

/// Lock-free progress cell written by the pivot loop.
///
/// Fields are updated independently with relaxed ordering; a reader may see
/// a step count from one iteration paired with the objective of the next.
/// That is acceptable for display.
#[derive(Debug)]
pub struct SharedProgress {
    step: AtomicU64,
    objective_bits: AtomicU64,
    n_artificial: AtomicUsize,
    workers: AtomicUsize,
}

impl Default for SharedProgress {
    fn default() -> Self {
        Self {
            step: AtomicU64::new(0),
            objective_bits: AtomicU64::new(0f64.to_bits()),
            n_artificial: AtomicUsize::new(0),
            workers: AtomicUsize::new(0),
        }
    }
}

impl SharedProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: &ProgressSnapshot) {
        self.step.store(snapshot.step, Ordering::Relaxed);
        self.objective_bits.store(snapshot.objective.to_bits(), Ordering::Relaxed);
        self.n_artificial.store(snapshot.n_artificial, Ordering::Relaxed);
        self.workers.store(snapshot.workers, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            step: self.step.load(Ordering::Relaxed),
            objective: f64::from_bits(self.objective_bits.load(Ordering::Relaxed)),
            n_artificial: self.n_artificial.load(Ordering::Relaxed),
            workers: self.workers.load(Ordering::Relaxed),
        }
    }
}

/// Background thread that logs the shared snapshot on a fixed cadence.
///
/// Dropping the monitor stops and joins the thread.
#[derive(Debug)]
pub struct ProgressMonitor {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
}

impl ProgressMonitor {
    pub fn spawn(shared: Arc<SharedProgress>, interval: Duration) -> SamplexResult<Self> {
        if interval.is_zero() {
            return Err(SamplexError::InvalidSettings(
                "monitor interval must be non-zero".to_string(),
            ));
        }
        let (tx, rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("samplex-progress".to_string())
            .spawn(move || {
                let mut ticks = 0u64;
                loop {
                    match rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            ticks += 1;
                            log::info!("{}", shared.snapshot());
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                ticks
            })?;
        Ok(Self { stop: Some(tx), handle: Some(handle) })
    }

    /// Stop the thread and return how many snapshots it logged.
    pub fn stop(mut self) -> u64 {
        self.shutdown()
    }

    fn shutdown(&mut self) -> u64 {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or(0),
            None => 0,
        }
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_then_snapshot() {
        let shared = SharedProgress::new();
        let snap = ProgressSnapshot { step: 11, objective: -3.25, n_artificial: 2, workers: 0 };
        shared.publish(&snap);
        assert_eq!(shared.snapshot(), snap);
    }

    #[test]
    fn test_monitor_ticks_and_stops() {
        let shared = Arc::new(SharedProgress::new());
        let monitor = ProgressMonitor::spawn(shared.clone(), Duration::from_millis(5)).unwrap();
        std::thread::sleep(Duration::from_millis(40));
        let ticks = monitor.stop();
        assert!(ticks >= 1);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let shared = Arc::new(SharedProgress::new());
        assert!(ProgressMonitor::spawn(shared, Duration::ZERO).is_err());
    }
}
