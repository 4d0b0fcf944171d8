//! Dense column-major simplex tableau.
//!
//! Layout: `rows = L + 1`, `cols = R + 1`, each column stored as a contiguous
//! stride of `rows` values. Row 0 is the objective row and column 0 is the
//! right-hand side. Indexing is always `(col, row)`, matching the storage
//! order.

use crate::error::{SamplexError, SamplexResult};
use crate::scalar::Real;

/// Dense simplex tableau.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Real> Tableau<T> {
    /// Create an all-zero tableau with `rows` rows and `cols` columns.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        assert!(rows >= 1 && cols >= 1, "tableau must have at least one row and column");
        Self {
            rows,
            cols,
            data: vec![T::zero(); rows * cols],
        }
    }

    /// Wrap an existing column-major buffer.
    pub fn from_column_major(rows: usize, cols: usize, data: Vec<T>) -> SamplexResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(SamplexError::DimensionMismatch {
                what: "tableau shape",
                expected: 1,
                actual: 0,
            });
        }
        if data.len() != rows * cols {
            return Err(SamplexError::DimensionMismatch {
                what: "tableau data",
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a tableau from row-major data (`rows[r][c]`).
    ///
    /// Convenient for hosts and tests that write tableaux out by hand.
    pub fn from_rows(rows: &[Vec<T>]) -> SamplexResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, |r| r.len());
        let mut tab = Self::from_column_major(n_rows, n_cols, vec![T::zero(); n_rows * n_cols])?;
        for (r, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(SamplexError::DimensionMismatch {
                    what: "tableau row",
                    expected: n_cols,
                    actual: row.len(),
                });
            }
            for (c, &v) in row.iter().enumerate() {
                tab.set(c, r, v);
            }
        }
        Ok(tab)
    }

    /// Total number of rows, objective row included (`L + 1`).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of columns, RHS column included (`R + 1`).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of constraint rows (`L`).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows - 1
    }

    /// Number of variable columns (`R`).
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.cols - 1
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> T {
        debug_assert!(col < self.cols && row < self.rows);
        self.data[col * self.rows + row]
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, value: T) {
        debug_assert!(col < self.cols && row < self.rows);
        self.data[col * self.rows + row] = value;
    }

    /// Contiguous view of column `col`.
    #[inline]
    pub fn column(&self, col: usize) -> &[T] {
        &self.data[col * self.rows..(col + 1) * self.rows]
    }

    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [T] {
        &mut self.data[col * self.rows..(col + 1) * self.rows]
    }

    /// Right-hand-side column. Entry 0 is the objective value.
    #[inline]
    pub fn rhs(&self) -> &[T] {
        self.column(0)
    }

    /// Current objective value, `tableau[0][0]`.
    #[inline]
    pub fn objective_value(&self) -> T {
        self.data[0]
    }

    /// Objective-row entries for columns `0..cols`.
    pub fn objective_row(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().step_by(self.rows).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Give the column-major buffer back to the host.
    pub fn into_column_major(self) -> (usize, usize, Vec<T>) {
        (self.rows, self.cols, self.data)
    }

    /// Physically remove column `col`, shifting later columns down by one.
    ///
    /// The underlying allocation is kept; only the logical length shrinks.
    pub(crate) fn remove_column(&mut self, col: usize) {
        assert!(col >= 1 && col < self.cols, "cannot remove column {col}");
        self.data.drain(col * self.rows..(col + 1) * self.rows);
        self.cols -= 1;
    }

    /// Smallest RHS entry over the constraint rows, or `None` when `L = 0`.
    pub fn min_rhs(&self) -> Option<T> {
        self.rhs().iter().skip(1).copied().reduce(|a, b| a.min(b))
    }

    /// First constraint row whose RHS is below `-prec`, if any.
    pub fn check_feasible(&self, prec: T) -> Option<usize> {
        let limit = -prec;
        self.rhs()
            .iter()
            .enumerate()
            .skip(1)
            .find(|&(_, &v)| v < limit || v.is_nan())
            .map(|(k, _)| k)
    }

    /// First non-finite entry as `(col, row)`.
    pub fn find_non_finite(&self) -> Option<(usize, usize)> {
        self.data
            .iter()
            .position(|v| !v.is_finite())
            .map(|i| (i / self.rows, i % self.rows))
    }

    /// Largest entrywise absolute difference against a tableau of the same shape.
    pub fn max_abs_diff(&self, other: &Self) -> T {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols), "shape mismatch");
        self.data
            .iter()
            .zip(&other.data)
            .fold(T::zero(), |acc, (&a, &b)| acc.max((a - b).abs()))
    }
}
