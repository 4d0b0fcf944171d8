//! Kernel state, settings, and results.
//!
//! This module defines the data contract between a host driver and the
//! pivoting kernel:
//!
//! ```text
//! tableau  (L+1) × (R+1), column-major, row 0 = objective, column 0 = RHS
//! left[k]  variable id basic in constraint row k      (k = 1..L)
//! right[r] variable id non-basic in tableau column r  (r = 1..R)
//! Z        artificial variables still present
//! ```
//!
//! Variable ids are `i32`; negative ids are artificial.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use rand::Rng;

use crate::error::{SamplexError, SamplexResult};
use crate::scalar::{is_artificial, Real};
use crate::tableau::Tableau;
use crate::util::env;

/// Tableau plus basis labels, exclusively owned by one pivot invocation at a time.
#[derive(Debug, Clone)]
pub struct PivotState<T> {
    tableau: Tableau<T>,
    /// `left[k - 1]` labels constraint row `k`.
    left: Vec<i32>,
    /// `right[r - 1]` labels tableau column `r`.
    right: Vec<i32>,
    /// Artificial variables not yet eliminated (Z).
    n_artificial: usize,
}

impl<T: Real> PivotState<T> {
    /// Bundle host buffers into a kernel state, validating the data contract.
    pub fn new(
        tableau: Tableau<T>,
        left: Vec<i32>,
        right: Vec<i32>,
        n_artificial: usize,
    ) -> SamplexResult<Self> {
        let state = Self {
            tableau,
            left,
            right,
            n_artificial,
        };
        state.validate()?;
        Ok(state)
    }

    /// Check dimensions, label uniqueness, and the artificial count.
    pub fn validate(&self) -> SamplexResult<()> {
        let l = self.tableau.n_rows();
        let r = self.tableau.n_cols();

        if self.left.len() != l {
            return Err(SamplexError::DimensionMismatch {
                what: "left labels",
                expected: l,
                actual: self.left.len(),
            });
        }
        if self.right.len() != r {
            return Err(SamplexError::DimensionMismatch {
                what: "right labels",
                expected: r,
                actual: self.right.len(),
            });
        }

        let mut seen = HashSet::with_capacity(l + r);
        for &id in self.left.iter().chain(&self.right) {
            if !seen.insert(id) {
                return Err(SamplexError::DuplicateLabel(id));
            }
        }

        let negatives = self
            .left
            .iter()
            .chain(&self.right)
            .filter(|&&id| is_artificial(id))
            .count();
        if negatives != self.n_artificial {
            return Err(SamplexError::ArtificialCount {
                expected: self.n_artificial,
                actual: negatives,
            });
        }
        if self.n_artificial > r {
            return Err(SamplexError::TooManyArtificial {
                z: self.n_artificial,
                n_right: r,
            });
        }

        if let Some((col, row)) = self.tableau.find_non_finite() {
            return Err(SamplexError::NonFinite { col, row });
        }

        Ok(())
    }

    #[inline]
    pub fn tableau(&self) -> &Tableau<T> {
        &self.tableau
    }

    /// Mutable access for hosts, e.g. to install a phase-2 objective row
    /// between invocations. The shape cannot be changed through this.
    #[inline]
    pub fn tableau_mut(&mut self) -> &mut Tableau<T> {
        &mut self.tableau
    }

    #[inline]
    pub fn left(&self) -> &[i32] {
        &self.left
    }

    #[inline]
    pub fn right(&self) -> &[i32] {
        &self.right
    }

    /// Label of constraint row `row` (1-based, as in the tableau).
    #[inline]
    pub fn left_label(&self, row: usize) -> i32 {
        self.left[row - 1]
    }

    /// Label of tableau column `col` (1-based, as in the tableau).
    #[inline]
    pub fn right_label(&self, col: usize) -> i32 {
        self.right[col - 1]
    }

    /// Number of constraint rows (L).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.tableau.n_rows()
    }

    /// Number of variable columns (R).
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.tableau.n_cols()
    }

    /// Artificial variables still present (Z).
    #[inline]
    pub fn n_artificial(&self) -> usize {
        self.n_artificial
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        if self.n_artificial == 0 {
            Phase::Two
        } else {
            Phase::One
        }
    }

    /// All labels currently present, sorted.
    pub fn sorted_labels(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.left.iter().chain(&self.right).copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Exchange the labels of row `row` and column `col`.
    ///
    /// Returns the id that moved into the column.
    pub(crate) fn swap_labels(&mut self, row: usize, col: usize) -> i32 {
        let leaving = self.left[row - 1];
        self.left[row - 1] = self.right[col - 1];
        self.right[col - 1] = leaving;
        leaving
    }

    /// Drop column `col`, which must hold an artificial variable.
    pub(crate) fn drop_artificial_column(&mut self, col: usize) {
        let id = self.right[col - 1];
        assert!(is_artificial(id), "column {col} holds structural variable {id}");
        assert!(self.n_artificial > 0, "artificial count underflow");
        self.right.remove(col - 1);
        self.tableau.remove_column(col);
        self.n_artificial -= 1;
    }

    /// Hand the buffers back to the host.
    pub fn into_parts(self) -> (Tableau<T>, Vec<i32>, Vec<i32>, usize) {
        (self.tableau, self.left, self.right, self.n_artificial)
    }
}

/// Which phase of the two-phase method a state is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Artificial variables remain; driving them out.
    One,
    /// Feasible basis; optimizing the true objective.
    Two,
}

/// Per-invocation step budget, applied only once the basis is feasible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepBudget {
    /// Never yield on step count.
    Unlimited,
    /// Yield after exactly this many steps.
    Fixed(u64),
    /// Draw the limit uniformly from `min..=max` at the start of each invocation.
    Random {
        /// Smallest possible budget
        min: u64,
        /// Largest possible budget
        max: u64,
    },
}

impl StepBudget {
    /// Random budget in `1..=max`; a `max` of 0 is raised to 1.
    pub fn up_to(max: u64) -> Self {
        StepBudget::Random { min: 1, max: max.max(1) }
    }

    /// Resolve the budget for one invocation. `None` means unlimited.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u64> {
        match *self {
            StepBudget::Unlimited => None,
            StepBudget::Fixed(n) => Some(n),
            StepBudget::Random { min, max } => Some(rng.gen_range(min..=max)),
        }
    }
}

impl Default for StepBudget {
    fn default() -> Self {
        StepBudget::Random { min: 1, max: 1000 }
    }
}

/// Pivot loop settings.
///
/// Thresholds are stored as `f64` and converted to the tableau's scalar type
/// when a loop starts. Use [`PivotSettings::for_scalar`] to pick defaults
/// matching a non-`f64` tableau.
#[derive(Debug, Clone)]
pub struct PivotSettings {
    /// Objective-row entries must exceed this to enter the basis
    pub eps_objective: f64,

    /// Updated entries with |v| <= prec are snapped to exact zero
    pub prec: f64,

    /// Column entries must be below -pivot_tol to bound the entering variable
    pub pivot_tol: f64,

    /// Ratios within this of the running minimum count as tied
    pub ratio_tie_tol: f64,

    /// A minimum ratio at or below this marks the candidate degenerate
    pub degenerate_tol: f64,

    /// Compute eliminations with fused multiply-add
    pub fused_update: bool,

    /// Steps per invocation once feasible
    pub step_budget: StepBudget,

    /// Keep pivoting into phase 2 instead of returning Feasible when Z hits 0
    pub continue_after_feasible: bool,

    /// Assert the RHS feasibility invariant after every update
    pub check_invariants: bool,

    /// Cadence of progress observer callbacks
    pub report_interval: Duration,

    /// Log phase transitions and per-invocation summaries at info level
    pub verbose: bool,
}

impl Default for PivotSettings {
    fn default() -> Self {
        Self::for_scalar::<f64>()
    }
}

impl PivotSettings {
    /// Defaults tuned for scalar type `T`, with environment overrides applied.
    ///
    /// Recognized variables: `SAMPLEX_PREC`, `SAMPLEX_EPS_OBJECTIVE`,
    /// `SAMPLEX_CHECK_INVARIANTS`, `SAMPLEX_MAX_BUDGET`.
    pub fn for_scalar<T: Real>() -> Self {
        let prec = env::parse("SAMPLEX_PREC").unwrap_or(T::DEFAULT_PREC);
        let eps_objective = env::parse("SAMPLEX_EPS_OBJECTIVE").unwrap_or(T::DEFAULT_EPS_OBJECTIVE);

        // Always on in debug builds; release builds opt in.
        let check_invariants =
            env::flag("SAMPLEX_CHECK_INVARIANTS").unwrap_or(cfg!(debug_assertions));

        let step_budget = env::parse("SAMPLEX_MAX_BUDGET")
            .map(StepBudget::up_to)
            .unwrap_or_default();

        Self {
            eps_objective,
            prec,
            pivot_tol: 0.0,
            ratio_tie_tol: T::DEFAULT_RATIO_TIE_TOL,
            degenerate_tol: 0.0,
            fused_update: true,
            step_budget,
            continue_after_feasible: false,
            check_invariants,
            report_interval: Duration::from_secs(1),
            verbose: false,
        }
    }

    /// Settings with verbose logging enabled.
    pub fn verbose() -> Self {
        Self { verbose: true, ..Self::default() }
    }

    /// Set the per-invocation step budget.
    pub fn with_budget(mut self, budget: StepBudget) -> Self {
        self.step_budget = budget;
        self
    }

    /// Set the zero-snapping threshold.
    pub fn with_prec(mut self, prec: f64) -> Self {
        self.prec = prec;
        self
    }

    /// Continue into phase 2 in the same invocation.
    pub fn with_continue_after_feasible(mut self, yes: bool) -> Self {
        self.continue_after_feasible = yes;
        self
    }

    /// Set the progress observer cadence.
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Reject nonsensical thresholds and budgets.
    pub fn validate(&self) -> SamplexResult<()> {
        let thresholds = [
            ("eps_objective", self.eps_objective),
            ("prec", self.prec),
            ("pivot_tol", self.pivot_tol),
            ("ratio_tie_tol", self.ratio_tie_tol),
            ("degenerate_tol", self.degenerate_tol),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(SamplexError::InvalidSettings(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        // A zero budget would return BudgetExhausted without ever pivoting.
        match self.step_budget {
            StepBudget::Fixed(0) => {
                return Err(SamplexError::InvalidSettings(
                    "fixed step budget must be at least 1".to_string(),
                ));
            }
            StepBudget::Random { min, max } if min == 0 || min > max => {
                return Err(SamplexError::InvalidSettings(format!(
                    "step budget range {}..={} must be non-empty and start at 1 or more",
                    min, max
                )));
            }
            _ => {}
        }
        if self.report_interval.is_zero() {
            return Err(SamplexError::InvalidSettings(
                "report_interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Terminal status of one pivot invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotStatus {
    /// The last artificial variable was eliminated during this invocation.
    Feasible,

    /// No column can improve the objective. If artificial variables remain,
    /// phase 1 stalled and the problem is infeasible.
    Optimal,

    /// An improving column has no bounding row.
    Unbounded,

    /// The feasible-phase step budget ran out; re-invoke to continue.
    BudgetExhausted,
}

impl PivotStatus {
    /// Whether re-invoking can make further progress.
    pub fn is_resumable(&self) -> bool {
        matches!(self, PivotStatus::Feasible | PivotStatus::BudgetExhausted)
    }
}

impl fmt::Display for PivotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PivotStatus::Feasible => write!(f, "Feasible"),
            PivotStatus::Optimal => write!(f, "Optimal"),
            PivotStatus::Unbounded => write!(f, "Unbounded"),
            PivotStatus::BudgetExhausted => write!(f, "Budget Exhausted"),
        }
    }
}

/// Result of one pivot invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotOutcome {
    /// Terminal status
    pub status: PivotStatus,

    /// Pivots performed in this invocation
    pub steps: u64,

    /// Variable columns remaining (R)
    pub n_right: usize,

    /// Artificial variables remaining (Z)
    pub n_artificial: usize,

    /// Objective value `tableau[0][0]` at exit
    pub objective: f64,
}

impl PivotOutcome {
    /// Phase 1 ended at an optimum with artificial variables still present.
    pub fn is_infeasible(&self) -> bool {
        self.status == PivotStatus::Optimal && self.n_artificial > 0
    }
}
