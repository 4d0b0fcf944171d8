//! Progress reporting.
//!
//! The pivot loop hands a [`ProgressSnapshot`] to a [`ProgressObserver`] at
//! most once per report interval, and can also publish every step into a
//! [`SharedProgress`] cell that a [`ProgressMonitor`] thread samples on its own
//! cadence. Both paths are off the hot loop's critical path.

pub mod monitor;
pub mod observer;

pub use monitor::{ProgressMonitor, SharedProgress};
pub use observer::{LogObserver, NoopObserver, ProgressObserver, ProgressSnapshot};
