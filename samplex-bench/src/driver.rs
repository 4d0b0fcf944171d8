//! Two-phase solve of a generated LP through repeated kernel invocations.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};

use samplex_core::pivot::PerfTimers;
use samplex_core::{
    PivotLoop, PivotSettings, PivotStatus, ProgressMonitor, Real, SeedSource,
};

use crate::generate::{generate, LpShape};

/// Hard cap on invocations per phase, so a cycling instance cannot hang the bench.
const MAX_INVOCATIONS: u64 = 100_000;

#[derive(Debug, Clone)]
pub struct TrialResult {
    pub seed: u64,
    pub status: PivotStatus,
    pub infeasible: bool,
    pub objective: f64,
    pub feasible_objective: f64,
    pub phase1_steps: u64,
    pub phase2_steps: u64,
    pub invocations: u64,
    pub elapsed: Duration,
    pub timers: PerfTimers,
}

pub struct TrialConfig {
    pub shape: LpShape,
    pub settings: PivotSettings,
    pub progress: Option<Duration>,
}

pub fn run_trial<T: Real>(config: &TrialConfig, seed: u64) -> Result<TrialResult> {
    let lp = generate(config.shape, seed);
    let mut state = lp
        .to_state::<T>()
        .with_context(|| format!("building {} tableau for seed {}", T::NAME, seed))?;
    let mut driver = PivotLoop::new(config.settings.clone(), SeedSource::Fixed(seed))
        .context("invalid pivot settings")?;

    let _monitor = match config.progress {
        Some(interval) => Some(ProgressMonitor::spawn(driver.share_progress(), interval)?),
        None => None,
    };

    let start = Instant::now();

    let mut outcome = driver.run(&mut state);
    let phase1_steps = outcome.steps;
    if outcome.status == PivotStatus::Unbounded {
        bail!("seed {seed}: phase 1 reported unbounded");
    }

    // Z == 0 here means phase 1 succeeded, or there were no artificials to begin with.
    let mut phase2_steps = 0;
    if outcome.n_artificial == 0 {
        lp.install_objective(&mut state);
        let mut invocations = 0;
        loop {
            outcome = driver.run(&mut state);
            phase2_steps += outcome.steps;
            invocations += 1;
            if outcome.status != PivotStatus::BudgetExhausted {
                break;
            }
            if invocations >= MAX_INVOCATIONS {
                bail!("seed {seed}: no convergence after {invocations} phase-2 invocations");
            }
        }
    }

    let elapsed = start.elapsed();

    if outcome.status == PivotStatus::Optimal
        && outcome.n_artificial == 0
        && outcome.objective < lp.feasible_objective - 1e-6 * (1.0 + lp.feasible_objective.abs())
    {
        log::warn!(
            "seed {}: objective {:e} below known feasible value {:e}",
            seed,
            outcome.objective,
            lp.feasible_objective
        );
    }

    Ok(TrialResult {
        seed,
        status: outcome.status,
        infeasible: outcome.is_infeasible(),
        objective: outcome.objective,
        feasible_objective: lp.feasible_objective,
        phase1_steps,
        phase2_steps,
        invocations: driver.invocations(),
        elapsed,
        timers: driver.timers().clone(),
    })
}
