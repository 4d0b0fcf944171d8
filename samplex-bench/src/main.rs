//! Benchmarking CLI for the samplex pivoting kernel.

mod driver;
mod generate;
mod regression;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};

use samplex_core::{PivotSettings, Real, StepBudget};

use driver::{run_trial, TrialConfig, TrialResult};
use generate::{generate, LpShape};
use regression::{compare_perf_baseline, load_summary, perf_summary, save_summary};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Precision {
    F32,
    F64,
}

#[derive(Parser, Debug)]
#[command(name = "samplex-bench", about = "Run the pivot kernel on synthetic two-phase LPs")]
struct Args {
    /// Structural variables per instance
    #[arg(long, default_value_t = 60)]
    vars: usize,

    /// Inequality rows per instance
    #[arg(long, default_value_t = 40)]
    le_rows: usize,

    /// Equality rows (one artificial each, capped at `vars`)
    #[arg(long, default_value_t = 10)]
    eq_rows: usize,

    /// Probability that a constraint entry is nonzero
    #[arg(long, default_value_t = 0.5)]
    density: f64,

    #[arg(long, default_value_t = 5)]
    trials: usize,

    /// Seed of the first trial; trial i uses seed + i
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    #[arg(long, value_enum, default_value_t = Precision::F64)]
    precision: Precision,

    /// Fixed phase-2 step budget per invocation (default: random 1..=1000)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    budget: Option<u64>,

    /// Log a progress line from a monitor thread every N milliseconds
    #[arg(long)]
    progress_ms: Option<u64>,

    /// Write the perf summary as JSON
    #[arg(long)]
    save_summary: Option<PathBuf>,

    /// Compare against a saved perf summary
    #[arg(long)]
    baseline: Option<PathBuf>,

    /// Allowed per-step slowdown against the baseline
    #[arg(long, default_value_t = 0.25)]
    max_regression: f64,

    #[arg(long)]
    verbose: bool,
}

fn run_all<T: Real>(args: &Args, config: &TrialConfig) -> Result<Vec<TrialResult>> {
    println!(
        "{:>8} {:>10} {:>8} {:>8} {:>6} {:>16} {:>10}",
        "seed", "status", "phase1", "phase2", "calls", "objective", "time_ms"
    );
    println!("{}", "-".repeat(74));

    let mut results = Vec::with_capacity(args.trials);
    for i in 0..args.trials {
        let res = run_trial::<T>(config, args.seed + i as u64)?;
        println!(
            "{:>8} {:>10} {:>8} {:>8} {:>6} {:>16.8e} {:>10.3}",
            res.seed,
            if res.infeasible { "Infeasible".to_string() } else { res.status.to_string() },
            res.phase1_steps,
            res.phase2_steps,
            res.invocations,
            res.objective,
            res.elapsed.as_secs_f64() * 1e3
        );
        log::debug!(
            "seed {}: x_feas objective {:e}, timers: {}",
            res.seed,
            res.feasible_objective,
            res.timers
        );
        results.push(res);
    }
    Ok(results)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = match args.precision {
        Precision::F32 => PivotSettings::for_scalar::<f32>(),
        Precision::F64 => PivotSettings::for_scalar::<f64>(),
    };
    if let Some(n) = args.budget {
        settings = settings.with_budget(StepBudget::Fixed(n));
    }
    settings.verbose = args.verbose;

    let config = TrialConfig {
        shape: LpShape {
            vars: args.vars,
            le_rows: args.le_rows,
            eq_rows: args.eq_rows,
            density: args.density,
        },
        settings,
        progress: args.progress_ms.map(Duration::from_millis),
    };

    let probe = generate(config.shape, args.seed);
    println!("Samplex Benchmarks");
    println!("==================\n");
    println!(
        "{:?} precision, {} rows x {} vars, Z={}, {} trials\n",
        args.precision,
        probe.n_rows(),
        args.vars,
        probe.n_artificial(),
        args.trials
    );

    let results = match args.precision {
        Precision::F32 => run_all::<f32>(&args, &config)?,
        Precision::F64 => run_all::<f64>(&args, &config)?,
    };

    let summary = perf_summary(&results);
    println!(
        "\n{} trials, {} steps, {} invocations, {:.3} ms",
        summary.trials, summary.total_steps, summary.invocations, summary.total_ms
    );

    if let Some(path) = &args.save_summary {
        save_summary(path, &summary)?;
        log::info!("perf summary written to {}", path.display());
    }

    if let Some(path) = &args.baseline {
        let baseline = load_summary(path)?;
        let failures = compare_perf_baseline(&baseline, &summary, args.max_regression);
        if !failures.is_empty() {
            for msg in &failures {
                log::error!("{msg}");
            }
            bail!("{} perf regression(s) against {}", failures.len(), path.display());
        }
        log::info!("no perf regression against {}", path.display());
    }

    Ok(())
}
