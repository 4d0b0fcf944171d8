//! Gauss-Jordan update of the tableau around a pivot element.
//!
//! With the tableau read as `basic = rhs + sum(col * nonbasic)`, exchanging
//! the basic variable of row `l` with the nonbasic variable of column `r`
//! rewrites every other column `j` as
//!
//! ```text
//! a[j][k] <- a[j][k] - a[r][k] * a[j][l] / p    (k != l)
//! a[j][l] <- -a[j][l] / p
//! ```
//!
//! and the pivot column as `a[r][k] <- a[r][k] / p`, `a[r][l] <- 1 / p`,
//! where `p = a[r][l]`. Column 0 (the RHS) is treated like any other column.

use super::Thresholds;
use crate::scalar::Real;
use crate::tableau::Tableau;

/// Applies pivots in place.
#[derive(Debug, Clone, Copy)]
pub struct TableauUpdater<T> {
    prec: T,
    fused: bool,
}

impl<T: Real> TableauUpdater<T> {
    pub fn new(thresholds: &Thresholds<T>, fused: bool) -> Self {
        Self { prec: thresholds.prec, fused }
    }

    /// Updated entries with magnitude at or below `prec` become exactly zero.
    #[inline]
    fn snap(&self, v: T) -> T {
        if v.abs() <= self.prec {
            T::zero()
        } else {
            v
        }
    }

    /// Pivot on `tableau[col][row]` and return the pivot value.
    ///
    /// # Panics
    ///
    /// Panics if the pivot position is out of range or the element is zero.
    pub fn apply(&self, tab: &mut Tableau<T>, row: usize, col: usize) -> T {
        let rows = tab.rows();
        assert!(row >= 1 && row < rows, "pivot row {row} out of range");
        assert!(col >= 1 && col < tab.cols(), "pivot column {col} out of range");

        let piv = tab.get(col, row);
        assert!(piv != T::zero() && piv.is_finite(), "bad pivot element {piv} at ({row}, {col})");

        let (before, rest) = tab.as_mut_slice().split_at_mut(col * rows);
        let (pcol, after) = rest.split_at_mut(rows);

        for other in before.chunks_exact_mut(rows).chain(after.chunks_exact_mut(rows)) {
            self.eliminate(other, pcol, row, piv);
        }

        for v in pcol.iter_mut() {
            *v = self.snap(*v / piv);
        }
        pcol[row] = self.snap(T::one() / piv);

        piv
    }

    fn eliminate(&self, col: &mut [T], pcol: &[T], row: usize, piv: T) {
        let col_l = col[row];
        if col_l == T::zero() {
            return;
        }
        let factor = -col_l / piv;

        if self.fused {
            for (v, &p) in col.iter_mut().zip(pcol) {
                *v = self.snap(p.mul_add(factor, *v));
            }
        } else {
            for (v, &p) in col.iter_mut().zip(pcol) {
                *v = self.snap(*v - p * col_l / piv);
            }
        }
        col[row] = self.snap(factor);
    }

    /// Panic if any RHS entry went below `-prec`.
    ///
    /// A negative RHS after a pivot means the selection rule was violated,
    /// so continuing would silently produce garbage.
    pub fn assert_feasible(&self, tab: &Tableau<T>, row: usize, col: usize) {
        if let Some(k) = tab.check_feasible(self.prec) {
            let v = tab.get(0, k);
            log::error!("rhs[{k}] = {v:e} after pivot on ({row}, {col})");
            panic!("rhs row {k} became negative ({v:e}) after pivot on ({row}, {col})");
        }
    }
}
