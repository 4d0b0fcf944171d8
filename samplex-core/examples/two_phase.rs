//! Two-phase solve of a tiny LP, installing the real objective between phases.
//!
//! ```text
//! maximize    x1 + 2 x2
//! subject to  x1 + x2 = 2
//!             x1     <= 3
//!             x1, x2 >= 0
//! ```
//!
//! Run with `RUST_LOG=debug cargo run --example two_phase`.

use samplex_core::{
    LogObserver, PivotLoop, PivotSettings, PivotState, PivotStatus, SamplexResult, SeedSource,
    StepBudget, Tableau,
};

fn cost(id: i32) -> f64 {
    match id {
        1 => 1.0,
        2 => 2.0,
        _ => 0.0,
    }
}

/// Express `sum(cost(id) * x_id)` in the current basis and write it to row 0.
fn install_objective(state: &mut PivotState<f64>) {
    let basic: Vec<f64> = state.left().iter().map(|&id| cost(id)).collect();
    let own: Vec<f64> = std::iter::once(0.0)
        .chain(state.right().iter().map(|&id| cost(id)))
        .collect();
    let tab = state.tableau_mut();
    for (c, &own_cost) in own.iter().enumerate() {
        let reduced = own_cost
            + tab.column(c)[1..]
                .iter()
                .zip(&basic)
                .map(|(v, cb)| v * cb)
                .sum::<f64>();
        tab.set(c, 0, reduced);
    }
}

fn main() -> SamplexResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Row 1: artificial a = 2 - x1 - x2. Row 2: slack s = 3 - x1.
    // Row 0 maximizes -a.
    let tab = Tableau::from_rows(&[
        vec![-2.0, 1.0, 1.0],
        vec![2.0, -1.0, -1.0],
        vec![3.0, -1.0, 0.0],
    ])?;
    let mut state = PivotState::new(tab, vec![-1, 3], vec![1, 2], 1)?;

    let settings = PivotSettings::verbose().with_budget(StepBudget::Fixed(1));
    let mut driver = PivotLoop::new(settings, SeedSource::Fixed(2024))?;

    let phase1 = driver.run_with_observer(&mut state, &mut LogObserver);
    println!("phase 1: {} in {} steps", phase1.status, phase1.steps);
    if phase1.status != PivotStatus::Feasible {
        println!("no feasible basis");
        return Ok(());
    }

    install_objective(&mut state);
    loop {
        let out = driver.run_with_observer(&mut state, &mut LogObserver);
        println!("phase 2: {} after {} steps, objective {}", out.status, out.steps, out.objective);
        if out.status != PivotStatus::BudgetExhausted {
            break;
        }
    }

    for (k, id) in state.left().iter().enumerate() {
        println!("x{} = {}", id, state.tableau().get(0, k + 1));
    }
    Ok(())
}
