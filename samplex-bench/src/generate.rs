//! Synthetic two-phase LPs.
//!
//! ```text
//! maximize    c^T x
//! subject to  A_le x <= b_le
//!             A_eq x  = b_eq
//!             1^T x  <= u
//!             x >= 0
//! ```
//!
//! `b` is computed from a strictly positive `x_feas`, so every instance is
//! feasible, and the `1^T x <= u` row keeps it bounded. Slacks are basic from
//! the start; each equality row gets an artificial variable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use samplex_core::{PivotState, Real, SamplexResult, Tableau};

#[derive(Debug, Clone, Copy)]
pub struct LpShape {
    pub vars: usize,
    pub le_rows: usize,
    pub eq_rows: usize,
    pub density: f64,
}

/// Generated instance in row-major form, independent of the scalar type.
#[derive(Debug, Clone)]
pub struct GeneratedLp {
    /// Phase-1 tableau rows, row 0 first
    rows: Vec<Vec<f64>>,
    left: Vec<i32>,
    right: Vec<i32>,
    n_artificial: usize,
    /// Cost of structural variable `j + 1`
    pub costs: Vec<f64>,
    /// `c^T x_feas`, a lower bound on the optimum
    pub feasible_objective: f64,
}

pub fn generate(shape: LpShape, seed: u64) -> GeneratedLp {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = shape.vars.max(1);
    // Z <= R is part of the kernel's contract.
    let m_eq = shape.eq_rows.min(n);
    let m_le = shape.le_rows;

    let x_feas: Vec<f64> = (0..n).map(|_| rng.gen_range(0.1..1.1)).collect();
    let costs: Vec<f64> = (0..n).map(|_| rng.gen_range(0.1..1.0)).collect();

    let density = shape.density.clamp(0.0, 1.0);
    let random_row = |rng: &mut StdRng| -> Vec<f64> {
        let mut a: Vec<f64> = (0..n)
            .map(|_| {
                if rng.gen_bool(density) {
                    rng.gen_range(-1.0..1.0)
                } else {
                    0.0
                }
            })
            .collect();
        // At least one nonzero per row.
        let j = rng.gen_range(0..n);
        if a[j] == 0.0 {
            a[j] = rng.gen_range(0.5..1.5);
        }
        a
    };
    let dot = |a: &[f64], x: &[f64]| a.iter().zip(x).map(|(p, q)| p * q).sum::<f64>();

    let mut rows = Vec::with_capacity(1 + m_le + m_eq + 1);
    let mut left = Vec::with_capacity(m_le + m_eq + 1);
    let mut objective = vec![0.0; n + 1];

    for i in 0..m_le {
        let a = random_row(&mut rng);
        let b = dot(&a, &x_feas).max(0.0) + rng.gen_range(0.0..1.0);
        rows.push(tableau_row(b, &a));
        left.push((n + 1 + i) as i32);
    }

    let u: f64 = x_feas.iter().sum::<f64>() * 2.0;
    let ones = [1.0].repeat(n);
    rows.push(tableau_row(u, &ones));
    left.push((n + 1 + m_le) as i32);

    for i in 0..m_eq {
        let mut a = random_row(&mut rng);
        let mut b = dot(&a, &x_feas);
        if b < 0.0 {
            a.iter_mut().for_each(|v| *v = -*v);
            b = -b;
        }
        // Phase-1 objective: maximize -sum(artificials).
        objective[0] -= b;
        for (o, &v) in objective[1..].iter_mut().zip(&a) {
            *o += v;
        }
        rows.push(tableau_row(b, &a));
        left.push(-(i as i32 + 1));
    }

    rows.insert(0, objective);
    let right = (1..=n as i32).collect();

    GeneratedLp {
        rows,
        left,
        right,
        n_artificial: m_eq,
        feasible_objective: dot(&costs, &x_feas),
        costs,
    }
}

/// `s = b - a x` as a tableau row.
fn tableau_row(b: f64, a: &[f64]) -> Vec<f64> {
    std::iter::once(b).chain(a.iter().map(|v| -v)).collect()
}

impl GeneratedLp {
    pub fn n_rows(&self) -> usize {
        self.left.len()
    }

    pub fn n_artificial(&self) -> usize {
        self.n_artificial
    }

    pub fn to_state<T: Real>(&self) -> SamplexResult<PivotState<T>> {
        let rows: Vec<Vec<T>> = self
            .rows
            .iter()
            .map(|r| r.iter().map(|&v| T::of_f64(v)).collect())
            .collect();
        PivotState::new(
            Tableau::from_rows(&rows)?,
            self.left.clone(),
            self.right.clone(),
            self.n_artificial,
        )
    }

    fn cost(&self, id: i32) -> f64 {
        if id >= 1 && (id as usize) <= self.costs.len() {
            self.costs[id as usize - 1]
        } else {
            0.0
        }
    }

    /// Replace row 0 with the phase-2 objective expressed in the current basis.
    pub fn install_objective<T: Real>(&self, state: &mut PivotState<T>) {
        let basic_costs: Vec<f64> = state.left().iter().map(|&id| self.cost(id)).collect();
        let column_costs: Vec<f64> = std::iter::once(0.0)
            .chain(state.right().iter().map(|&id| self.cost(id)))
            .collect();

        let tab = state.tableau_mut();
        for (c, &own) in column_costs.iter().enumerate() {
            let column = tab.column(c);
            let reduced = column[1..]
                .iter()
                .zip(&basic_costs)
                .fold(own, |acc, (&v, &cb)| acc + cb * v.as_f64());
            tab.set(c, 0, T::of_f64(reduced));
        }
    }
}
