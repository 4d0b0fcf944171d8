//! Pivot selection.
//!
//! Scan the objective row for improving columns. For each, the min-ratio
//! test over the negative column entries gives the row that limits how far
//! the entering variable can grow before some RHS entry would turn negative.
//! Among columns, keep the one with the largest projected objective gain,
//! but accept at once any pivot that evicts an artificial variable.
//!
//! Degenerate candidates (zero step length) are accepted by a coin flip
//! against the current best, which breaks the deterministic patterns that
//! make the simplex method cycle on degenerate vertices.

use rand::Rng;

use super::Thresholds;
use crate::problem::{PivotSettings, PivotState};
use crate::scalar::{is_artificial, Real};

/// A chosen pivot element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotChoice<T> {
    /// Leaving row, in `1..=L`
    pub row: usize,
    /// Entering column, in `1..=R`
    pub col: usize,
    /// Pivot element `tableau[col][row]`, always negative
    pub value: T,
    /// Step length of the entering variable, `RHS[row] / |value|`
    pub ratio: T,
    /// Projected objective increase, `tableau[col][0] * ratio`
    pub gain: T,
    /// Ratio at or below the degeneracy threshold
    pub degenerate: bool,
    /// The leaving row currently holds an artificial variable
    pub evicts_artificial: bool,
}

/// Outcome of a selection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<T> {
    /// A pivot was found.
    FoundPivot(PivotChoice<T>),
    /// Column `col` improves the objective but nothing bounds it.
    Unbounded { col: usize },
    /// No column improves the objective.
    NoPivot,
}

#[derive(Debug, Clone, Copy)]
struct LeavingRow<T> {
    row: usize,
    ratio: T,
    value: T,
}

/// Chooses entering columns and leaving rows.
#[derive(Debug, Clone, Copy)]
pub struct PivotSelector<T> {
    eps_objective: T,
    pivot_tol: T,
    ratio_tie_tol: T,
    degenerate_tol: T,
    prec: T,
}

impl<T: Real> PivotSelector<T> {
    pub fn new(thresholds: &Thresholds<T>) -> Self {
        Self {
            eps_objective: thresholds.eps_objective,
            pivot_tol: thresholds.pivot_tol,
            ratio_tie_tol: thresholds.ratio_tie_tol,
            degenerate_tol: thresholds.degenerate_tol,
            prec: thresholds.prec,
        }
    }

    pub fn from_settings(settings: &PivotSettings) -> Self {
        Self::new(&Thresholds::from_settings(settings))
    }

    /// Select the next pivot. Never mutates the state.
    ///
    /// Returns [`Selection::Unbounded`] as soon as an improving column with
    /// no bounding row is met, without looking at later columns.
    pub fn select<R: Rng + ?Sized>(&self, state: &PivotState<T>, rng: &mut R) -> Selection<T> {
        let tab = state.tableau();
        let rhs = tab.rhs();
        let left = state.left();

        let mut best: Option<PivotChoice<T>> = None;

        for r in 1..tab.cols() {
            let col = tab.column(r);
            let objective = col[0];
            if objective <= self.eps_objective {
                continue;
            }

            let Some(leave) = self.leaving_row(col, rhs, left) else {
                return Selection::Unbounded { col: r };
            };

            let candidate = PivotChoice {
                row: leave.row,
                col: r,
                value: leave.value,
                ratio: leave.ratio,
                gain: objective * leave.ratio,
                degenerate: leave.ratio <= self.degenerate_tol,
                evicts_artificial: is_artificial(left[leave.row - 1]),
            };

            let mut good_enough = candidate.evicts_artificial;
            if candidate.degenerate && !good_enough {
                good_enough = best.is_none() || rng.gen_bool(0.5);
            }

            let improves = best.map_or(true, |b| candidate.gain > b.gain);
            if good_enough || improves {
                best = Some(candidate);
                if good_enough {
                    break;
                }
            }
        }

        match best {
            Some(choice) => Selection::FoundPivot(choice),
            None => Selection::NoPivot,
        }
    }

    /// Min-ratio test over the negative entries of one column.
    ///
    /// Exact ties keep the first row. An artificial row within
    /// `ratio_tie_tol` of the minimum replaces a structural one only if
    /// pivoting on it leaves every RHS entry at or above `-prec`.
    fn leaving_row(&self, col: &[T], rhs: &[T], left: &[i32]) -> Option<LeavingRow<T>> {
        let limit = -self.pivot_tol;
        let bounding = || {
            col.iter()
                .zip(rhs)
                .enumerate()
                .skip(1)
                .filter(move |&(_, (&entry, _))| entry < limit)
                .map(|(k, (&entry, &b))| (k, entry, b.max(T::zero())))
        };

        // Largest step that keeps every bounding row within `prec` of feasible.
        let mut min: Option<LeavingRow<T>> = None;
        let mut feasible_step = T::infinity();
        for (k, entry, b) in bounding() {
            let ratio = b / entry.abs();
            if min.map_or(true, |cur| ratio < cur.ratio) {
                min = Some(LeavingRow { row: k, ratio, value: entry });
            }
            feasible_step = feasible_step.min((b + self.prec) / entry.abs());
        }

        let min = min?;
        if is_artificial(left[min.row - 1]) {
            return Some(min);
        }

        let tied_artificial = bounding().find_map(|(k, entry, b)| {
            let ratio = b / entry.abs();
            let usable = is_artificial(left[k - 1])
                && ratio - min.ratio <= self.ratio_tie_tol
                && ratio <= feasible_step;
            usable.then_some(LeavingRow { row: k, ratio, value: entry })
        });

        Some(tied_artificial.unwrap_or(min))
    }
}
