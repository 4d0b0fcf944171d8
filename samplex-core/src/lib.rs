//! Samplex: a dense two-phase simplex pivoting kernel
//!
//! The kernel repeatedly pivots a host-owned simplex tableau until it reaches
//! an optimum, detects unboundedness, eliminates the last artificial
//! variable, or exhausts a per-invocation step budget. Building tableaux,
//! installing objectives, and interpreting solutions are left to the host.
//!
//! # Tableau convention
//!
//! - Column-major, `(L + 1) × (R + 1)`; row 0 is the objective, column 0 the RHS
//! - Row `k` reads `x_left[k] = rhs[k] + Σ_r tableau[r][k] · x_right[r]`
//! - Negative variable ids are artificial; phase 1 drives them out
//! - The kernel maximizes `tableau[0][0]`
//!
//! # Algorithm
//!
//! - **Entering column**: any column with a positive objective entry
//! - **Leaving row**: min-ratio test over the column's negative entries
//! - **Column choice**: largest projected gain, except that evicting an
//!   artificial variable is accepted at once
//! - **Degeneracy**: zero-length steps are taken on a seeded coin flip,
//!   which avoids cycling
//! - **Compaction**: a column holding an eliminated artificial variable is
//!   removed from the tableau
//!
//! # Example
//!
//! ```
//! use samplex_core::{PivotLoop, PivotSettings, PivotState, PivotStatus, SeedSource, Tableau};
//!
//! // x3 = 2 - x1 - x2 is artificial (id -1); x3' = 3 - x1 is a slack (id 3).
//! let tab = Tableau::from_rows(&[
//!     vec![-2.0, 1.0, 1.0],
//!     vec![2.0, -1.0, -1.0],
//!     vec![3.0, -1.0, 0.0],
//! ])?;
//! let mut state = PivotState::new(tab, vec![-1, 3], vec![1, 2], 1)?;
//!
//! let mut driver = PivotLoop::new(PivotSettings::default(), SeedSource::Fixed(7))?;
//! let outcome = driver.run(&mut state);
//!
//! assert_eq!(outcome.status, PivotStatus::Feasible);
//! assert_eq!(state.n_artificial(), 0);
//! # Ok::<(), samplex_core::SamplexError>(())
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod pivot;
pub mod problem;
pub mod report;
pub mod scalar;
pub mod tableau;
pub mod util;

// Re-export main types
pub use error::{SamplexError, SamplexResult};
pub use pivot::driver::pivot;
pub use pivot::{PivotChoice, PivotLoop, PivotSelector, Selection, StepResult, TableauUpdater};
pub use problem::{
    Phase, PivotOutcome, PivotSettings, PivotState, PivotStatus, StepBudget,
};
pub use report::{
    LogObserver, NoopObserver, ProgressMonitor, ProgressObserver, ProgressSnapshot, SharedProgress,
};
pub use scalar::{is_artificial, Real};
pub use tableau::Tableau;
pub use util::rng::{PivotRng, SeedSource};
