use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::driver::TrialResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerfSummary {
    pub total_ms: f64,
    pub select_ms: f64,
    pub update_ms: f64,
    pub compact_ms: f64,
    pub total_steps: u64,
    pub invocations: u64,
    pub trials: usize,
}

impl PerfSummary {
    fn empty() -> Self {
        Self {
            total_ms: 0.0,
            select_ms: 0.0,
            update_ms: 0.0,
            compact_ms: 0.0,
            total_steps: 0,
            invocations: 0,
            trials: 0,
        }
    }
}

pub fn perf_summary(results: &[TrialResult]) -> PerfSummary {
    let mut summary = PerfSummary::empty();
    for res in results {
        summary.total_ms += res.elapsed.as_secs_f64() * 1e3;
        summary.select_ms += res.timers.select.as_secs_f64() * 1e3;
        summary.update_ms += res.timers.update.as_secs_f64() * 1e3;
        summary.compact_ms += res.timers.compact.as_secs_f64() * 1e3;
        summary.total_steps += res.phase1_steps + res.phase2_steps;
        summary.invocations += res.invocations;
        summary.trials += 1;
    }
    summary
}

pub fn save_summary(path: &Path, summary: &PerfSummary) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("serializing perf summary")?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

pub fn load_summary(path: &Path) -> Result<PerfSummary> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn compare_perf_baseline(
    baseline: &PerfSummary,
    current: &PerfSummary,
    max_regression: f64,
) -> Vec<String> {
    let mut failures = Vec::new();
    // Per-step time, so baselines taken with a different trial count still compare.
    let per_step = |ms: f64, steps: u64| if steps == 0 { 0.0 } else { ms / steps as f64 };
    let guard = |name: &str, base: f64, cur: f64| {
        if base <= 0.0 {
            return None;
        }
        let ratio = cur / base;
        if ratio > 1.0 + max_regression {
            Some(format!(
                "{} regression {:.2}x (baseline {:.4}ms/step, current {:.4}ms/step)",
                name, ratio, base, cur
            ))
        } else {
            None
        }
    };

    let pairs = [
        ("total_time", baseline.total_ms, current.total_ms),
        ("select_time", baseline.select_ms, current.select_ms),
        ("update_time", baseline.update_ms, current.update_ms),
    ];
    for (name, base, cur) in pairs {
        if let Some(msg) = guard(
            name,
            per_step(base, baseline.total_steps),
            per_step(cur, current.total_steps),
        ) {
            failures.push(msg);
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(total_ms: f64, steps: u64) -> PerfSummary {
        PerfSummary {
            total_ms,
            select_ms: total_ms / 2.0,
            update_ms: total_ms / 2.0,
            compact_ms: 0.0,
            total_steps: steps,
            invocations: 1,
            trials: 1,
        }
    }

    #[test]
    fn test_regression_detected_per_step() {
        let base = summary(100.0, 1000);
        assert!(compare_perf_baseline(&base, &summary(110.0, 1000), 0.25).is_empty());
        // Same total over half the steps is a 2x per-step slowdown.
        let failures = compare_perf_baseline(&base, &summary(100.0, 500), 0.25);
        assert_eq!(failures.len(), 3);
        assert!(failures[0].starts_with("total_time regression"));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("samplex-perf-{}.json", std::process::id()));
        let s = summary(12.5, 40);
        save_summary(&path, &s).unwrap();
        assert_eq!(load_summary(&path).unwrap(), s);
        let _ = fs::remove_file(&path);
    }
}
