//! End-to-end tests for the pivot loop.
//!
//! Each test builds a small tableau by hand, runs one or more invocations,
//! and checks the terminal status together with the final tableau and
//! labels.

use std::sync::Arc;
use std::time::Duration;

use samplex_core::{
    pivot, LogObserver, PivotLoop, PivotSettings, PivotState, PivotStatus, ProgressMonitor,
    ProgressSnapshot, SeedSource, StepBudget, StepResult, Tableau,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn settings() -> PivotSettings {
    let mut s = PivotSettings::default().with_budget(StepBudget::Unlimited);
    s.check_invariants = true;
    s
}

fn state(rows: &[Vec<f64>], left: Vec<i32>, right: Vec<i32>) -> PivotState<f64> {
    let z = left.iter().chain(&right).filter(|&&id| id < 0).count();
    PivotState::new(Tableau::from_rows(rows).unwrap(), left, right, z).unwrap()
}

/// Phase 1 for `x1 + x2 = 2`, `x1 <= 3` with artificial `a = 2 - x1 - x2`.
fn one_artificial() -> PivotState<f64> {
    state(
        &[
            vec![-2.0, 1.0, 1.0],
            vec![2.0, -1.0, -1.0],
            vec![3.0, -1.0, 0.0],
        ],
        vec![-1, 3],
        vec![1, 2],
    )
}

/// max 3 x1 + 2 x2 s.t. x1 + x2 <= 4, x1 + 3 x2 <= 6, x1 <= 3. Optimum 11.
fn small_lp() -> PivotState<f64> {
    state(
        &[
            vec![0.0, 3.0, 2.0],
            vec![4.0, -1.0, -1.0],
            vec![6.0, -1.0, -3.0],
            vec![3.0, -1.0, 0.0],
        ],
        vec![3, 4, 5],
        vec![1, 2],
    )
}

#[test]
fn test_phase1_feasible_in_one_step() {
    init_logging();
    let mut st = one_artificial();
    let mut lp = PivotLoop::new(settings(), SeedSource::Fixed(0)).unwrap();
    let out = lp.run(&mut st);

    assert_eq!(out.status, PivotStatus::Feasible);
    assert_eq!(out.steps, 1);
    assert_eq!(out.n_right, 1);
    assert_eq!(out.n_artificial, 0);
    assert!(!out.is_infeasible());

    assert_eq!(st.left(), &[1, 3]);
    assert_eq!(st.right(), &[2]);
    assert_eq!(st.tableau().rhs(), &[0.0, 2.0, 1.0]);
    assert_eq!(st.tableau().column(1), &[0.0, -1.0, 1.0]);
}

#[test]
fn test_unbounded_leaves_tableau_unchanged() {
    init_logging();
    let mut st = state(&[vec![0.0, 1.0], vec![1.0, 2.0]], vec![2], vec![1]);
    let before = st.clone();
    let mut lp = PivotLoop::new(settings(), SeedSource::Fixed(0)).unwrap();
    let out = lp.run(&mut st);

    assert_eq!(out.status, PivotStatus::Unbounded);
    assert_eq!(out.steps, 0);
    assert_eq!(st.tableau(), before.tableau());
    assert_eq!(st.left(), before.left());
    assert_eq!(st.right(), before.right());
}

#[test]
fn test_optimal_leaves_tableau_unchanged() {
    init_logging();
    let mut st = state(
        &[vec![5.0, -1.0, 0.0], vec![1.0, -1.0, -1.0]],
        vec![3],
        vec![1, 2],
    );
    let before = st.clone();
    let mut lp = PivotLoop::new(settings(), SeedSource::Fixed(0)).unwrap();
    let out = lp.run(&mut st);

    assert_eq!(out.status, PivotStatus::Optimal);
    assert_eq!(out.steps, 0);
    assert_eq!(out.objective, 5.0);
    assert_eq!(st.tableau(), before.tableau());
}

#[test]
fn test_phase1_stall_reports_infeasible() {
    init_logging();
    // a = 1 + x1 can never be driven to zero.
    let mut st = state(&[vec![-1.0, -1.0], vec![1.0, 1.0]], vec![-1], vec![1]);
    let mut lp = PivotLoop::new(settings(), SeedSource::Fixed(0)).unwrap();
    let out = lp.run(&mut st);

    assert_eq!(out.status, PivotStatus::Optimal);
    assert_eq!(out.n_artificial, 1);
    assert!(out.is_infeasible());
}

#[test]
fn test_small_lp_reaches_optimum() {
    init_logging();
    let mut st = small_lp();
    let mut lp = PivotLoop::new(settings(), SeedSource::Fixed(0)).unwrap();
    let out = lp.run(&mut st);

    assert_eq!(out.status, PivotStatus::Optimal);
    assert!((out.objective - 11.0).abs() < 1e-12);
    // x1 = 3 and x2 = 1 are basic at the optimum.
    let mut basic: Vec<i32> = st.left().to_vec();
    basic.sort_unstable();
    assert!(basic.contains(&1) && basic.contains(&2));
}

#[test]
fn test_fixed_budget_resumes_to_same_optimum() {
    init_logging();
    let mut unlimited = small_lp();
    let reference = PivotLoop::new(settings(), SeedSource::Fixed(3))
        .unwrap()
        .run(&mut unlimited);

    let mut st = small_lp();
    let mut lp =
        PivotLoop::new(settings().with_budget(StepBudget::Fixed(1)), SeedSource::Fixed(3)).unwrap();

    let mut statuses = Vec::new();
    let mut total = 0;
    for _ in 0..20 {
        let out = lp.run(&mut st);
        assert!(out.steps <= 1);
        total += out.steps;
        statuses.push(out.status);
        if out.status != PivotStatus::BudgetExhausted {
            break;
        }
    }

    assert_eq!(statuses.first(), Some(&PivotStatus::BudgetExhausted));
    assert_eq!(statuses.last(), Some(&PivotStatus::Optimal));
    assert_eq!(total, reference.steps);
    assert_eq!(lp.total_steps(), total);
    assert!((st.tableau().objective_value() - reference.objective).abs() < 1e-12);
}

#[test]
fn test_large_entry_row_stays_feasible_over_artificial_near_tie() {
    init_logging();
    let mut st = state(
        &[vec![-1.0, 1.0], vec![1.0, -1e6], vec![1e-6 + 5e-15, -1.0]],
        vec![1, -1],
        vec![2],
    );
    let mut lp = PivotLoop::new(settings(), SeedSource::Fixed(0)).unwrap();

    match lp.step(&mut st) {
        StepResult::Pivoted { choice, eliminated } => {
            assert_eq!(choice.row, 1);
            assert_eq!(eliminated, None);
        }
        other => panic!("expected pivot, got {:?}", other),
    }
    assert!(st.tableau().rhs()[1..].iter().all(|&b| b >= 0.0));
    assert_eq!(st.left(), &[2, -1]);

    let out = lp.run(&mut st);
    assert!(st.tableau().check_feasible(1e-12).is_none());
    assert_eq!(out.n_artificial, st.n_artificial());
}

#[test]
fn test_same_seed_same_pivot_sequence() {
    init_logging();
    // Degenerate rows (zero RHS) make the coin flip matter.
    let rows = vec![
        vec![0.0, 1.0, 2.0, 1.5, 0.5],
        vec![0.0, -1.0, -1.0, 0.0, -2.0],
        vec![0.0, 0.0, -1.0, -1.0, 1.0],
        vec![4.0, -1.0, -2.0, -1.0, -1.0],
        vec![6.0, -2.0, 1.0, -3.0, -1.0],
    ];
    let trace = |seed: u64| {
        let mut st = state(&rows, vec![5, 6, 7, 8], vec![1, 2, 3, 4]);
        let mut lp = PivotLoop::new(settings(), SeedSource::Fixed(seed)).unwrap();
        let mut picks = Vec::new();
        for _ in 0..50 {
            match lp.step(&mut st) {
                StepResult::Pivoted { choice, .. } => picks.push((choice.row, choice.col)),
                _ => break,
            }
        }
        (picks, st.tableau().clone())
    };

    for seed in [0, 1, 17, 12345] {
        let (a, ta) = trace(seed);
        let (b, tb) = trace(seed);
        assert_eq!(a, b);
        assert_eq!(ta, tb);
    }
}

#[test]
fn test_continue_after_feasible_runs_phase_two() {
    init_logging();
    let mut st = one_artificial();
    // A positive x2 entry keeps the objective improvable once the artificial leaves.
    st.tableau_mut().set(2, 0, 2.0);
    st.tableau_mut().set(1, 0, 1.0);
    st.tableau_mut().set(0, 0, -2.0);

    let mut lp = PivotLoop::new(
        settings().with_continue_after_feasible(true),
        SeedSource::Fixed(0),
    )
    .unwrap();
    let out = lp.run(&mut st);

    assert_ne!(out.status, PivotStatus::Feasible);
    assert_eq!(out.n_artificial, 0);
    assert!(out.steps >= 1);
}

#[test]
fn test_observer_called_at_cadence() {
    init_logging();
    let mut st = small_lp();
    let s = settings().with_report_interval(Duration::from_nanos(1));
    let mut rng = SeedSource::Fixed(5).rng();

    let mut snaps: Vec<ProgressSnapshot> = Vec::new();
    let mut obs = |snap: &ProgressSnapshot| snaps.push(*snap);
    let out = pivot(&mut st, &s, &mut rng, &mut obs).unwrap();

    assert_eq!(out.status, PivotStatus::Optimal);
    assert!(!snaps.is_empty());
    assert!(snaps.iter().all(|s| s.step <= out.steps));
    assert!(snaps.iter().all(|s| s.workers == 0 && s.n_artificial == 0));
    assert!(snaps.windows(2).all(|w| w[0].step < w[1].step));

    // Long interval: never due inside a short run.
    let mut quiet = 0;
    let mut st = small_lp();
    let s = settings().with_report_interval(Duration::from_secs(3600));
    let mut count = |_: &ProgressSnapshot| quiet += 1;
    pivot(&mut st, &s, &mut rng, &mut count).unwrap();
    assert_eq!(quiet, 0);

    let mut st = small_lp();
    pivot(&mut st, &s, &mut rng, &mut LogObserver).unwrap();
}

#[test]
fn test_invalid_settings_rejected_by_entry_point() {
    let mut st = small_lp();
    let mut s = settings();
    s.eps_objective = f64::NAN;
    let mut rng = SeedSource::Fixed(0).rng();
    let mut obs = |_: &ProgressSnapshot| {};
    assert!(pivot(&mut st, &s, &mut rng, &mut obs).is_err());
}

#[test]
fn test_monitor_samples_shared_progress() {
    init_logging();
    let mut st = small_lp();
    let mut lp = PivotLoop::new(settings(), SeedSource::Fixed(0)).unwrap();
    let shared = lp.share_progress();
    let monitor = ProgressMonitor::spawn(Arc::clone(&shared), Duration::from_millis(1)).unwrap();

    let out = lp.run(&mut st);
    std::thread::sleep(Duration::from_millis(10));
    monitor.stop();

    let snap = shared.snapshot();
    assert_eq!(snap.step, out.steps);
    assert!((snap.objective - 11.0).abs() < 1e-12);
}

#[test]
fn test_single_precision_tableau() {
    init_logging();
    let tab = Tableau::<f32>::from_rows(&[
        vec![-2.0, 1.0, 1.0],
        vec![2.0, -1.0, -1.0],
        vec![3.0, -1.0, 0.0],
    ])
    .unwrap();
    let mut st = PivotState::new(tab, vec![-1, 3], vec![1, 2], 1).unwrap();
    let mut s = PivotSettings::for_scalar::<f32>().with_budget(StepBudget::Unlimited);
    s.check_invariants = true;
    let out = PivotLoop::new(s, SeedSource::Fixed(0)).unwrap().run(&mut st);

    assert_eq!(out.status, PivotStatus::Feasible);
    assert_eq!(st.right(), &[2]);
    assert_eq!(st.tableau().rhs(), &[0.0f32, 2.0, 1.0]);
}

#[test]
fn test_reseed_restarts_random_sequence() {
    let mut lp = PivotLoop::new(settings(), SeedSource::Fixed(8)).unwrap();
    let mut st = small_lp();
    let first = lp.run(&mut st);
    lp.reseed(SeedSource::Fixed(8));
    let mut st2 = small_lp();
    let second = lp.run(&mut st2);
    assert_eq!(first, second);
    assert_eq!(st.tableau(), st2.tableau());
}
