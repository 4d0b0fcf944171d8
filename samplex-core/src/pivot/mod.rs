//! The pivot loop and its two workhorses.
//!
//! One step: [`PivotSelector`] picks an entering column and leaving row,
//! [`TableauUpdater`] performs the Gauss-Jordan elimination, and
//! [`PivotLoop`] relabels the basis and compacts away eliminated artificial
//! columns.

pub mod diagnostics;
pub mod driver;
pub mod perf;
pub mod select;
pub mod update;

pub use diagnostics::DiagnosticsConfig;
pub use driver::{PivotLoop, StepResult};
pub use perf::{PerfSection, PerfTimers};
pub use select::{PivotChoice, PivotSelector, Selection};
pub use update::TableauUpdater;

use crate::problem::PivotSettings;
use crate::scalar::Real;

/// Settings thresholds converted to the tableau's scalar type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds<T> {
    pub eps_objective: T,
    pub prec: T,
    pub pivot_tol: T,
    pub ratio_tie_tol: T,
    pub degenerate_tol: T,
}

impl<T: Real> Thresholds<T> {
    pub fn from_settings(settings: &PivotSettings) -> Self {
        Self {
            eps_objective: T::of_f64(settings.eps_objective),
            prec: T::of_f64(settings.prec),
            pivot_tol: T::of_f64(settings.pivot_tol),
            ratio_tie_tol: T::of_f64(settings.ratio_tie_tol),
            degenerate_tol: T::of_f64(settings.degenerate_tol),
        }
    }
}
