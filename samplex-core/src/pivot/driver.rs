//! The pivot loop.
//!
//! Each invocation runs select → update → relabel → compact until one of:
//!
//! - no column improves the objective ([`PivotStatus::Optimal`]),
//! - an improving column is unbounded ([`PivotStatus::Unbounded`]),
//! - the last artificial variable leaves ([`PivotStatus::Feasible`]),
//! - the step budget runs out in phase 2 ([`PivotStatus::BudgetExhausted`]).
//!
//! Phase 1 is never interrupted by the budget: a host may only regain
//! control mid-phase through the progress observer.

use std::sync::Arc;
use std::time::Instant;

use super::diagnostics::DiagnosticsConfig;
use super::perf::{PerfSection, PerfTimers};
use super::select::{PivotChoice, PivotSelector, Selection};
use super::update::TableauUpdater;
use super::Thresholds;
use crate::error::SamplexResult;
use crate::problem::{Phase, PivotOutcome, PivotSettings, PivotState, PivotStatus};
use crate::report::{NoopObserver, ProgressObserver, ProgressSnapshot, SharedProgress};
use crate::scalar::{is_artificial, Real};
use crate::util::rng::{PivotRng, SeedSource};

/// Result of a single pivot step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepResult<T> {
    /// A pivot was applied. `eliminated` holds the artificial id that left
    /// the problem, if any.
    Pivoted {
        choice: PivotChoice<T>,
        eliminated: Option<i32>,
    },
    /// No improving column; the state is unchanged.
    Optimal,
    /// Column `col` is unbounded; the state is unchanged.
    Unbounded { col: usize },
}

/// Reusable pivot driver.
///
/// Owns the random generator, so that consecutive budgeted invocations
/// continue one random sequence.
#[derive(Debug)]
pub struct PivotLoop {
    settings: PivotSettings,
    rng: PivotRng,
    diag: DiagnosticsConfig,
    timers: PerfTimers,
    shared: Option<Arc<SharedProgress>>,
    total_steps: u64,
    invocations: u64,
}

impl PivotLoop {
    pub fn new(settings: PivotSettings, seed: SeedSource) -> SamplexResult<Self> {
        Self::with_rng(settings, seed.rng())
    }

    pub fn with_rng(settings: PivotSettings, rng: PivotRng) -> SamplexResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            rng,
            diag: DiagnosticsConfig::from_env(),
            timers: PerfTimers::default(),
            shared: None,
            total_steps: 0,
            invocations: 0,
        })
    }

    pub fn with_diagnostics(mut self, diag: DiagnosticsConfig) -> Self {
        self.diag = diag;
        self
    }

    pub fn settings(&self) -> &PivotSettings {
        &self.settings
    }

    pub fn reseed(&mut self, seed: SeedSource) {
        self.rng = seed.rng();
    }

    pub fn rng_mut(&mut self) -> &mut PivotRng {
        &mut self.rng
    }

    pub fn into_rng(self) -> PivotRng {
        self.rng
    }

    pub fn timers(&self) -> &PerfTimers {
        &self.timers
    }

    /// Pivots performed over the lifetime of this loop.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    /// Shared progress cell updated before every step, created on first use.
    pub fn share_progress(&mut self) -> Arc<SharedProgress> {
        self.shared.get_or_insert_with(|| Arc::new(SharedProgress::new())).clone()
    }

    /// Perform one pivot step without budget or status handling.
    pub fn step<T: Real>(&mut self, state: &mut PivotState<T>) -> StepResult<T> {
        let thresholds = Thresholds::from_settings(&self.settings);
        let selector = PivotSelector::new(&thresholds);
        let updater = TableauUpdater::new(&thresholds, self.settings.fused_update);
        self.step_with(state, &selector, &updater)
    }

    fn step_with<T: Real>(
        &mut self,
        state: &mut PivotState<T>,
        selector: &PivotSelector<T>,
        updater: &TableauUpdater<T>,
    ) -> StepResult<T> {
        let selection = {
            let _g = self.timers.scoped(PerfSection::Select);
            selector.select(state, &mut self.rng)
        };

        let choice = match selection {
            Selection::FoundPivot(choice) => choice,
            Selection::Unbounded { col } => return StepResult::Unbounded { col },
            Selection::NoPivot => return StepResult::Optimal,
        };

        {
            let _g = self.timers.scoped(PerfSection::Update);
            updater.apply(state.tableau_mut(), choice.row, choice.col);
            if self.settings.check_invariants {
                updater.assert_feasible(state.tableau(), choice.row, choice.col);
            }
        }

        let moved_out = {
            let _g = self.timers.scoped(PerfSection::Relabel);
            state.swap_labels(choice.row, choice.col)
        };

        let eliminated = if is_artificial(moved_out) {
            let _g = self.timers.scoped(PerfSection::Compact);
            state.drop_artificial_column(choice.col);
            log::debug!(
                "artificial {} eliminated at column {}, Z={}",
                moved_out,
                choice.col,
                state.n_artificial()
            );
            Some(moved_out)
        } else {
            None
        };

        if self.settings.check_invariants {
            if let Err(e) = state.validate() {
                panic!("pivot state corrupted after pivot on ({}, {}): {e}", choice.row, choice.col);
            }
        }

        self.total_steps += 1;
        StepResult::Pivoted { choice, eliminated }
    }

    pub fn run<T: Real>(&mut self, state: &mut PivotState<T>) -> PivotOutcome {
        self.run_with_observer(state, &mut NoopObserver)
    }

    /// Run one invocation, calling `observer` at most once per report interval.
    pub fn run_with_observer<T, O>(&mut self, state: &mut PivotState<T>, observer: &mut O) -> PivotOutcome
    where
        T: Real,
        O: ProgressObserver + ?Sized,
    {
        let thresholds = Thresholds::from_settings(&self.settings);
        let selector = PivotSelector::new(&thresholds);
        let updater = TableauUpdater::new(&thresholds, self.settings.fused_update);

        self.invocations += 1;
        let budget = self.settings.step_budget.draw(&mut self.rng);
        let interval = self.settings.report_interval;
        let mut last_report = Instant::now();
        let mut steps = 0u64;

        if self.settings.verbose {
            log::info!(
                "pivot[{}]: {}x{} {} tableau, phase {:?}, Z={}, budget={:?}",
                self.invocations,
                state.n_rows(),
                state.n_cols(),
                T::NAME,
                state.phase(),
                state.n_artificial(),
                budget
            );
        }

        let status = loop {
            if state.phase() == Phase::Two {
                if let Some(limit) = budget {
                    if steps >= limit {
                        log::debug!("step budget of {limit} exhausted");
                        break PivotStatus::BudgetExhausted;
                    }
                }
            }

            let due = last_report.elapsed() >= interval;
            if due || self.shared.is_some() {
                let _g = self.timers.scoped(PerfSection::Report);
                let snapshot = snapshot_of(state, steps);
                if let Some(shared) = &self.shared {
                    shared.publish(&snapshot);
                }
                if due {
                    observer.observe(&snapshot);
                    last_report = Instant::now();
                }
            }

            match self.step_with(state, &selector, &updater) {
                StepResult::Optimal => break PivotStatus::Optimal,
                StepResult::Unbounded { col } => {
                    log::debug!("column {} (id {}) is unbounded", col, state.right_label(col));
                    break PivotStatus::Unbounded;
                }
                StepResult::Pivoted { choice, eliminated } => {
                    steps += 1;

                    if self.diag.should_log(steps) {
                        self.log_step(state, steps, &choice);
                    }

                    if eliminated.is_some() && state.n_artificial() == 0 {
                        log::info!(
                            "feasible basis after {} steps, objective={:e}",
                            steps,
                            state.tableau().objective_value()
                        );
                        if !self.settings.continue_after_feasible {
                            break PivotStatus::Feasible;
                        }
                    }
                }
            }
        };

        if let Some(shared) = &self.shared {
            shared.publish(&snapshot_of(state, steps));
        }

        let outcome = PivotOutcome {
            status,
            steps,
            n_right: state.n_cols(),
            n_artificial: state.n_artificial(),
            objective: state.tableau().objective_value().as_f64(),
        };

        if outcome.is_infeasible() {
            log::warn!("phase 1 stalled with Z={} artificial variables", outcome.n_artificial);
        }
        if self.settings.verbose {
            log::info!(
                "pivot[{}]: {} after {} steps, objective={:e}, R={}, Z={}",
                self.invocations,
                outcome.status,
                outcome.steps,
                outcome.objective,
                outcome.n_right,
                outcome.n_artificial
            );
            log::debug!("pivot[{}] timers: {}", self.invocations, self.timers);
        }

        outcome
    }

    fn log_step<T: Real>(&self, state: &PivotState<T>, steps: u64, choice: &PivotChoice<T>) {
        let tab = state.tableau();
        if self.diag.print_pivots {
            log::debug!(
                "step {:6}: objf={:.8e} Z={} pivot=({}, {}) value={:e} ratio={:e} gain={:e}{}",
                steps,
                tab.objective_value(),
                state.n_artificial(),
                choice.row,
                choice.col,
                choice.value,
                choice.ratio,
                choice.gain,
                if choice.degenerate { " degenerate" } else { "" }
            );
        } else {
            log::debug!(
                "step {:6}: objf={:.8e} Z={}",
                steps,
                tab.objective_value(),
                state.n_artificial()
            );
        }
    }
}

fn snapshot_of<T: Real>(state: &PivotState<T>, steps: u64) -> ProgressSnapshot {
    ProgressSnapshot {
        step: steps,
        objective: state.tableau().objective_value().as_f64(),
        n_artificial: state.n_artificial(),
        workers: 0,
    }
}

/// Run one pivot invocation with a caller-owned generator.
///
/// The generator is advanced in place so that the next call continues the
/// same random sequence.
pub fn pivot<T, O>(
    state: &mut PivotState<T>,
    settings: &PivotSettings,
    rng: &mut PivotRng,
    observer: &mut O,
) -> SamplexResult<PivotOutcome>
where
    T: Real,
    O: ProgressObserver + ?Sized,
{
    let mut driver = PivotLoop::with_rng(settings.clone(), rng.clone())?;
    let outcome = driver.run_with_observer(state, observer);
    *rng = driver.into_rng();
    Ok(outcome)
}
